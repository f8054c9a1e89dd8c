//! Command pool and command buffer recording

use ash::{vk, Device};

use crate::error::{FujiError, FujiResult};

/// Command pool with RAII cleanup
///
/// Buffers allocated from the pool can be reset individually.
pub struct CommandPool {
    device: Device,
    command_pool: vk::CommandPool,
}

impl CommandPool {
    /// Create a pool for the given queue family
    pub fn new(device: Device, queue_family_index: u32) -> FujiResult<Self> {
        let create_info = vk::CommandPoolCreateInfo::builder()
            .flags(vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER)
            .queue_family_index(queue_family_index);
        let command_pool = unsafe { device.create_command_pool(&create_info, None)? };

        Ok(Self { device, command_pool })
    }

    /// Allocate `count` primary command buffers
    pub fn allocate_command_buffers(&self, count: u32) -> FujiResult<Vec<vk::CommandBuffer>> {
        let alloc_info = vk::CommandBufferAllocateInfo::builder()
            .command_pool(self.command_pool)
            .level(vk::CommandBufferLevel::PRIMARY)
            .command_buffer_count(count);

        Ok(unsafe { self.device.allocate_command_buffers(&alloc_info)? })
    }

    /// Allocate one primary command buffer wrapped in a recorder
    pub fn allocate_recorder(&self) -> FujiResult<CommandRecorder> {
        let command_buffer = self
            .allocate_command_buffers(1)?
            .into_iter()
            .next()
            .ok_or(FujiError::Api(vk::Result::ERROR_OUT_OF_POOL_MEMORY))?;
        Ok(CommandRecorder::new(self.device.clone(), command_buffer))
    }

    /// Get command pool handle
    pub const fn handle(&self) -> vk::CommandPool {
        self.command_pool
    }
}

impl Drop for CommandPool {
    fn drop(&mut self) {
        unsafe {
            // Buffers from this pool may still be executing
            if let Err(err) = self.device.device_wait_idle() {
                log::warn!("device_wait_idle failed while destroying command pool: {:?}", err);
            }
            self.device.destroy_command_pool(self.command_pool, None);
        }
    }
}

/// Records one command buffer, tracking whether recording is open
pub struct CommandRecorder {
    device: Device,
    command_buffer: vk::CommandBuffer,
    recording: bool,
}

impl CommandRecorder {
    /// Wrap a command buffer that is not currently recording
    pub const fn new(device: Device, command_buffer: vk::CommandBuffer) -> Self {
        Self {
            device,
            command_buffer,
            recording: false,
        }
    }

    /// Discard previously recorded commands
    pub fn reset(&mut self) -> FujiResult<()> {
        if self.recording {
            return Err(FujiError::InvalidOperation {
                reason: "cannot reset a command buffer while recording".to_string(),
            });
        }
        unsafe {
            self.device
                .reset_command_buffer(self.command_buffer, vk::CommandBufferResetFlags::empty())?;
        }
        Ok(())
    }

    /// Start recording
    pub fn begin(&mut self, flags: vk::CommandBufferUsageFlags) -> FujiResult<()> {
        if self.recording {
            return Err(FujiError::InvalidOperation {
                reason: "command buffer is already recording".to_string(),
            });
        }
        let begin_info = vk::CommandBufferBeginInfo::builder().flags(flags);
        unsafe { self.device.begin_command_buffer(self.command_buffer, &begin_info)? };

        self.recording = true;
        Ok(())
    }

    /// Begin a render pass; it ends when the returned guard is dropped
    pub fn begin_render_pass(
        &mut self,
        render_pass: vk::RenderPass,
        framebuffer: vk::Framebuffer,
        render_area: vk::Rect2D,
        clear_values: &[vk::ClearValue],
    ) -> FujiResult<ActiveRenderPass<'_>> {
        if !self.recording {
            return Err(FujiError::InvalidOperation {
                reason: "command buffer is not recording".to_string(),
            });
        }
        let begin_info = vk::RenderPassBeginInfo::builder()
            .render_pass(render_pass)
            .framebuffer(framebuffer)
            .render_area(render_area)
            .clear_values(clear_values);
        unsafe {
            self.device
                .cmd_begin_render_pass(self.command_buffer, &begin_info, vk::SubpassContents::INLINE);
        }

        Ok(ActiveRenderPass { recorder: self })
    }

    /// Finish recording
    pub fn end(&mut self) -> FujiResult<vk::CommandBuffer> {
        if !self.recording {
            return Err(FujiError::InvalidOperation {
                reason: "command buffer is not recording".to_string(),
            });
        }
        // Clear the flag first so a failed end does not leave the recorder stuck
        self.recording = false;
        unsafe { self.device.end_command_buffer(self.command_buffer)? };

        Ok(self.command_buffer)
    }

    /// Whether `begin` has been called without a matching `end`
    pub const fn is_recording(&self) -> bool {
        self.recording
    }

    /// Get command buffer handle
    pub const fn handle(&self) -> vk::CommandBuffer {
        self.command_buffer
    }
}

/// Render pass being recorded; ends the pass when dropped
pub struct ActiveRenderPass<'a> {
    recorder: &'a mut CommandRecorder,
}

impl ActiveRenderPass<'_> {
    /// Command buffer the pass is recorded into
    pub const fn command_buffer(&self) -> vk::CommandBuffer {
        self.recorder.command_buffer
    }

    /// Set viewport 0, for pipelines with a dynamic viewport
    pub fn set_viewport(&mut self, viewport: vk::Viewport) {
        unsafe {
            self.recorder
                .device
                .cmd_set_viewport(self.recorder.command_buffer, 0, &[viewport]);
        }
    }

    /// Set scissor 0, for pipelines with a dynamic scissor
    pub fn set_scissor(&mut self, scissor: vk::Rect2D) {
        unsafe {
            self.recorder
                .device
                .cmd_set_scissor(self.recorder.command_buffer, 0, &[scissor]);
        }
    }

    /// Bind a graphics pipeline
    pub fn bind_pipeline(&mut self, pipeline: vk::Pipeline) {
        unsafe {
            self.recorder.device.cmd_bind_pipeline(
                self.recorder.command_buffer,
                vk::PipelineBindPoint::GRAPHICS,
                pipeline,
            );
        }
    }

    /// Bind vertex buffers starting at `first_binding`
    pub fn bind_vertex_buffers(&mut self, first_binding: u32, buffers: &[vk::Buffer], offsets: &[vk::DeviceSize]) {
        unsafe {
            self.recorder
                .device
                .cmd_bind_vertex_buffers(self.recorder.command_buffer, first_binding, buffers, offsets);
        }
    }

    /// Bind an index buffer
    pub fn bind_index_buffer(&mut self, buffer: vk::Buffer, offset: vk::DeviceSize, index_type: vk::IndexType) {
        unsafe {
            self.recorder
                .device
                .cmd_bind_index_buffer(self.recorder.command_buffer, buffer, offset, index_type);
        }
    }

    /// Push constant data
    pub fn push_constants(
        &mut self,
        layout: vk::PipelineLayout,
        stage_flags: vk::ShaderStageFlags,
        offset: u32,
        data: &[u8],
    ) {
        unsafe {
            self.recorder
                .device
                .cmd_push_constants(self.recorder.command_buffer, layout, stage_flags, offset, data);
        }
    }

    /// Non-indexed draw
    pub fn draw(&mut self, vertex_count: u32, instance_count: u32, first_vertex: u32, first_instance: u32) {
        unsafe {
            self.recorder.device.cmd_draw(
                self.recorder.command_buffer,
                vertex_count,
                instance_count,
                first_vertex,
                first_instance,
            );
        }
    }

    /// Indexed draw
    pub fn draw_indexed(
        &mut self,
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        vertex_offset: i32,
        first_instance: u32,
    ) {
        unsafe {
            self.recorder.device.cmd_draw_indexed(
                self.recorder.command_buffer,
                index_count,
                instance_count,
                first_index,
                vertex_offset,
                first_instance,
            );
        }
    }
}

impl Drop for ActiveRenderPass<'_> {
    fn drop(&mut self) {
        unsafe {
            self.recorder.device.cmd_end_render_pass(self.recorder.command_buffer);
        }
    }
}
