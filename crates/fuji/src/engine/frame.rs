//! Per-frame sequencing: wait, acquire, record, submit, present
//!
//! One frame is in flight at a time. The in-flight fence starts signalled,
//! so the first call to [`FrameLoop::draw_frame`] does not block.

use ash::extensions::khr;
use ash::{vk, Device};

use super::{ActiveRenderPass, CommandPool, CommandRecorder, FrameSync, RenderTarget};
use crate::config::FrameConfig;
use crate::error::{FujiError, FujiResult};

/// Queues used by the frame loop
#[derive(Debug, Clone, Copy)]
pub struct FrameQueues {
    /// Queue command buffers are submitted to
    pub graphics: vk::Queue,
    /// Queue images are presented on
    pub present: vk::Queue,
}

/// Drives one swapchain through the draw loop
pub struct FrameLoop {
    device: Device,
    swapchain_loader: khr::Swapchain,
    swapchain: vk::SwapchainKHR,
    queues: FrameQueues,
    // Dropped before `sync`: the pool waits for the device to go idle first
    command_pool: CommandPool,
    recorder: CommandRecorder,
    sync: FrameSync,
    config: FrameConfig,
}

impl FrameLoop {
    /// Create the command pool, command buffer and sync objects for `swapchain`
    pub fn new(
        device: Device,
        swapchain_loader: &khr::Swapchain,
        swapchain: vk::SwapchainKHR,
        queues: FrameQueues,
        graphics_queue_family: u32,
        config: FrameConfig,
    ) -> FujiResult<Self> {
        let command_pool = CommandPool::new(device.clone(), graphics_queue_family)?;
        let recorder = command_pool.allocate_recorder()?;
        let sync = FrameSync::new(&device)?;
        log::info!(
            "Frame loop ready (fence timeout {} ns, acquire timeout {} ns)",
            config.fence_timeout_ns,
            config.acquire_timeout()
        );

        Ok(Self {
            device,
            swapchain_loader: swapchain_loader.clone(),
            swapchain,
            queues,
            command_pool,
            recorder,
            sync,
            config,
        })
    }

    /// Render and present one frame
    ///
    /// `record` is called inside the target's render pass, which is begun with
    /// the configured clear colour. Returns the index of the presented
    /// swapchain image. A fence that stays unsignalled past the configured
    /// timeout fails with [`FujiError::FrameTimeout`]; swapchain errors such
    /// as `ERROR_OUT_OF_DATE_KHR` come back as [`FujiError::Api`].
    ///
    /// Once an image is acquired it is always handed back before returning.
    /// If `record` fails, the image is presented with only the clear applied
    /// and the closure's error is returned. If not even that can be recorded,
    /// the pending acquire signal is consumed by an empty submission, so the
    /// next call can acquire again; the image then stays acquired until the
    /// swapchain is recreated.
    pub fn draw_frame<F>(&mut self, target: &RenderTarget, record: F) -> FujiResult<u32>
    where
        F: FnOnce(&mut ActiveRenderPass<'_>) -> FujiResult<()>,
    {
        if target.image_count() == 0 {
            return Err(FujiError::InvalidOperation {
                reason: "render target has no framebuffers".to_string(),
            });
        }

        self.sync.in_flight.wait(self.config.fence_timeout_ns)?;

        let (image_index, suboptimal) = unsafe {
            self.swapchain_loader.acquire_next_image(
                self.swapchain,
                self.config.acquire_timeout(),
                self.sync.image_available.handle(),
                vk::Fence::null(),
            )?
        };
        if suboptimal {
            log::warn!("Swapchain is suboptimal for image {}", image_index);
        }

        let Some(framebuffer) = target.framebuffer(image_index) else {
            self.release_acquire_wait();
            return Err(FujiError::InvalidOperation {
                reason: format!("render target has no framebuffer for swapchain image {image_index}"),
            });
        };

        match self.record_frame(target, framebuffer, record) {
            Ok(command_buffer) => {
                self.submit_and_present(image_index, command_buffer)?;
                Ok(image_index)
            }
            Err(err) => {
                log::warn!("Recording frame {} failed, presenting a cleared image: {}", image_index, err);
                match self.record_frame(target, framebuffer, |_| Ok(())) {
                    Ok(command_buffer) => self.submit_and_present(image_index, command_buffer)?,
                    Err(_) => self.release_acquire_wait(),
                }
                Err(err)
            }
        }
    }

    fn record_frame<F>(&mut self, target: &RenderTarget, framebuffer: vk::Framebuffer, record: F) -> FujiResult<vk::CommandBuffer>
    where
        F: FnOnce(&mut ActiveRenderPass<'_>) -> FujiResult<()>,
    {
        if self.recorder.is_recording() {
            self.recorder.end()?;
        }
        self.recorder.reset()?;
        self.recorder.begin(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT)?;
        let recorded = Self::record_pass(&mut self.recorder, target, framebuffer, self.config.clear_color, record);
        let ended = self.recorder.end();
        recorded?;
        ended
    }

    fn submit_and_present(&mut self, image_index: u32, command_buffer: vk::CommandBuffer) -> FujiResult<()> {
        // Reset only once there is work to signal it again
        self.sync.in_flight.reset()?;

        let wait_semaphores = [self.sync.image_available.handle()];
        let wait_stages = [vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT];
        let command_buffers = [command_buffer];
        let signal_semaphores = [self.sync.render_finished.handle()];
        let submit_info = vk::SubmitInfo::builder()
            .wait_semaphores(&wait_semaphores)
            .wait_dst_stage_mask(&wait_stages)
            .command_buffers(&command_buffers)
            .signal_semaphores(&signal_semaphores);
        unsafe {
            self.device
                .queue_submit(self.queues.graphics, &[submit_info.build()], self.sync.in_flight.handle())?;
        }

        let swapchains = [self.swapchain];
        let image_indices = [image_index];
        let present_info = vk::PresentInfoKHR::builder()
            .wait_semaphores(&signal_semaphores)
            .swapchains(&swapchains)
            .image_indices(&image_indices);
        let suboptimal = unsafe { self.swapchain_loader.queue_present(self.queues.present, &present_info)? };
        if suboptimal {
            log::warn!("Swapchain became suboptimal while presenting image {}", image_index);
        }
        Ok(())
    }

    /// Consume the pending signal on `image_available` without rendering
    ///
    /// The in-flight fence is still signalled at this point, so the
    /// submission carries no fence.
    fn release_acquire_wait(&self) {
        let wait_semaphores = [self.sync.image_available.handle()];
        let wait_stages = [vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT];
        let submit_info = acquire_release_submit(&wait_semaphores, &wait_stages);
        let result = unsafe {
            self.device
                .queue_submit(self.queues.graphics, &[submit_info.build()], vk::Fence::null())
        };
        if let Err(err) = result {
            log::error!("Failed to release the acquire semaphore of an abandoned frame: {:?}", err);
        }
    }

    fn record_pass<F>(
        recorder: &mut CommandRecorder,
        target: &RenderTarget,
        framebuffer: vk::Framebuffer,
        clear_color: [f32; 4],
        record: F,
    ) -> FujiResult<()>
    where
        F: FnOnce(&mut ActiveRenderPass<'_>) -> FujiResult<()>,
    {
        let clear_values = [vk::ClearValue {
            color: vk::ClearColorValue { float32: clear_color },
        }];
        let mut pass = recorder.begin_render_pass(target.render_pass(), framebuffer, target.full_area(), &clear_values)?;
        record(&mut pass)
    }

    /// Block until the device has finished all submitted work
    pub fn wait_idle(&self) -> FujiResult<()> {
        unsafe { self.device.device_wait_idle()? };
        Ok(())
    }

    /// Pool the frame's command buffer was allocated from
    pub const fn command_pool(&self) -> &CommandPool {
        &self.command_pool
    }

    /// Timeouts and clear colour in use
    pub const fn config(&self) -> &FrameConfig {
        &self.config
    }
}

/// Submission that only waits on the acquire semaphore
fn acquire_release_submit<'a>(
    wait_semaphores: &'a [vk::Semaphore],
    wait_stages: &'a [vk::PipelineStageFlags],
) -> vk::SubmitInfoBuilder<'a> {
    vk::SubmitInfo::builder()
        .wait_semaphores(wait_semaphores)
        .wait_dst_stage_mask(wait_stages)
}
