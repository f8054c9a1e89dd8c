//! Pipeline layout wrapper

use ash::vk;

use crate::device::RenderDevice;
use crate::error::FujiResult;

/// Pipeline layout with RAII cleanup
pub struct PipelineLayout<D: RenderDevice> {
    device: D,
    layout: vk::PipelineLayout,
}

impl<D: RenderDevice> PipelineLayout<D> {
    /// Create a layout over descriptor set layouts and push constant ranges
    pub fn new(
        device: D,
        set_layouts: &[vk::DescriptorSetLayout],
        push_constant_ranges: &[vk::PushConstantRange],
    ) -> FujiResult<Self> {
        let create_info = vk::PipelineLayoutCreateInfo::builder()
            .set_layouts(set_layouts)
            .push_constant_ranges(push_constant_ranges);
        let layout = device.create_pipeline_layout(&create_info)?;

        Ok(Self { device, layout })
    }

    /// Layout without descriptor sets or push constants
    pub fn empty(device: D) -> FujiResult<Self> {
        Self::new(device, &[], &[])
    }

    /// Get layout handle
    pub const fn handle(&self) -> vk::PipelineLayout {
        self.layout
    }
}

impl<D: RenderDevice> Drop for PipelineLayout<D> {
    fn drop(&mut self) {
        self.device.destroy_pipeline_layout(self.layout);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockDevice;

    #[test]
    fn test_layout_lifecycle() {
        let device = MockDevice::new();
        let ranges = [vk::PushConstantRange {
            stage_flags: vk::ShaderStageFlags::VERTEX,
            offset: 0,
            size: 64,
        }];
        let layout = PipelineLayout::new(device.clone(), &[], &ranges).unwrap();
        let empty = PipelineLayout::empty(device.clone()).unwrap();

        assert_ne!(layout.handle(), empty.handle());
        assert_eq!(device.live_pipeline_layouts(), 2);

        drop(layout);
        drop(empty);
        assert_eq!(device.live_pipeline_layouts(), 0);
    }
}
