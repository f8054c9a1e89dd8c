//! Render pass and framebuffers for presenting to a swapchain

use ash::{vk, Device};

use crate::error::FujiResult;

/// Render pass with RAII cleanup
pub struct RenderPass {
    device: Device,
    render_pass: vk::RenderPass,
}

impl RenderPass {
    /// Single-subpass pass with one colour attachment that is cleared on
    /// load and left ready for presentation
    pub fn single_color(device: Device, color_format: vk::Format) -> FujiResult<Self> {
        let attachments = [vk::AttachmentDescription::builder()
            .format(color_format)
            .samples(vk::SampleCountFlags::TYPE_1)
            .load_op(vk::AttachmentLoadOp::CLEAR)
            .store_op(vk::AttachmentStoreOp::STORE)
            .stencil_load_op(vk::AttachmentLoadOp::DONT_CARE)
            .stencil_store_op(vk::AttachmentStoreOp::DONT_CARE)
            .initial_layout(vk::ImageLayout::UNDEFINED)
            .final_layout(vk::ImageLayout::PRESENT_SRC_KHR)
            .build()];

        let color_refs = [vk::AttachmentReference {
            attachment: 0,
            layout: vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
        }];
        let subpasses = [vk::SubpassDescription::builder()
            .pipeline_bind_point(vk::PipelineBindPoint::GRAPHICS)
            .color_attachments(&color_refs)
            .build()];

        // The image layout transition must wait for the acquire semaphore
        let dependencies = [vk::SubpassDependency::builder()
            .src_subpass(vk::SUBPASS_EXTERNAL)
            .dst_subpass(0)
            .src_stage_mask(vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT)
            .src_access_mask(vk::AccessFlags::empty())
            .dst_stage_mask(vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT)
            .dst_access_mask(vk::AccessFlags::COLOR_ATTACHMENT_WRITE)
            .build()];

        let create_info = vk::RenderPassCreateInfo::builder()
            .attachments(&attachments)
            .subpasses(&subpasses)
            .dependencies(&dependencies);
        let render_pass = unsafe { device.create_render_pass(&create_info, None)? };
        log::debug!("Created single colour render pass {:?} ({:?})", render_pass, color_format);

        Ok(Self { device, render_pass })
    }

    /// Get render pass handle
    pub const fn handle(&self) -> vk::RenderPass {
        self.render_pass
    }
}

impl Drop for RenderPass {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_render_pass(self.render_pass, None);
        }
    }
}

/// Framebuffer with RAII cleanup
pub struct Framebuffer {
    device: Device,
    framebuffer: vk::Framebuffer,
}

impl Framebuffer {
    /// Create a single-layer framebuffer
    pub fn new(
        device: Device,
        render_pass: vk::RenderPass,
        attachments: &[vk::ImageView],
        extent: vk::Extent2D,
    ) -> FujiResult<Self> {
        let create_info = vk::FramebufferCreateInfo::builder()
            .render_pass(render_pass)
            .attachments(attachments)
            .width(extent.width)
            .height(extent.height)
            .layers(1);
        let framebuffer = unsafe { device.create_framebuffer(&create_info, None)? };

        Ok(Self { device, framebuffer })
    }

    /// Get framebuffer handle
    pub const fn handle(&self) -> vk::Framebuffer {
        self.framebuffer
    }
}

impl Drop for Framebuffer {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_framebuffer(self.framebuffer, None);
        }
    }
}

/// One framebuffer per swapchain image, all sharing a render pass
pub struct RenderTarget {
    render_pass: vk::RenderPass,
    framebuffers: Vec<Framebuffer>,
    extent: vk::Extent2D,
}

impl RenderTarget {
    /// Create a framebuffer for each image view of the swapchain
    pub fn new(device: &Device, render_pass: &RenderPass, image_views: &[vk::ImageView], extent: vk::Extent2D) -> FujiResult<Self> {
        let framebuffers = image_views
            .iter()
            .map(|&view| Framebuffer::new(device.clone(), render_pass.handle(), &[view], extent))
            .collect::<FujiResult<Vec<_>>>()?;

        Ok(Self {
            render_pass: render_pass.handle(),
            framebuffers,
            extent,
        })
    }

    /// Framebuffer of the swapchain image at `image_index`
    pub fn framebuffer(&self, image_index: u32) -> Option<vk::Framebuffer> {
        self.framebuffers.get(image_index as usize).map(Framebuffer::handle)
    }

    /// Number of swapchain images with a framebuffer
    pub fn image_count(&self) -> usize {
        self.framebuffers.len()
    }

    /// Render pass the framebuffers were created for
    pub const fn render_pass(&self) -> vk::RenderPass {
        self.render_pass
    }

    /// Size of every framebuffer
    pub const fn extent(&self) -> vk::Extent2D {
        self.extent
    }

    /// Area covering the whole target
    pub const fn full_area(&self) -> vk::Rect2D {
        vk::Rect2D {
            offset: vk::Offset2D { x: 0, y: 0 },
            extent: self.extent,
        }
    }
}
