//! Fixed-function pipeline state
//!
//! Everything a graphics pipeline needs besides its shader stages and vertex
//! input. Defaults match a plain opaque triangle-list pass with a single
//! colour attachment.
//!
//! The default has no viewport or scissor. Pipelines with static viewport
//! state need [`FixedFunctionState::with_extent`]; otherwise use a template
//! that makes both dynamic, such as
//! [`DynamicViewportTemplate`](crate::pipeline::DynamicViewportTemplate).

use ash::vk;

/// Rasterization, blending and viewport settings of a graphics pipeline
#[derive(Debug, Clone)]
pub struct FixedFunctionState {
    /// Primitive topology
    pub topology: vk::PrimitiveTopology,
    /// Primitive restart for strip topologies
    pub primitive_restart: bool,
    /// Polygon fill mode
    pub polygon_mode: vk::PolygonMode,
    /// Face culling
    pub cull_mode: vk::CullModeFlags,
    /// Winding order of front faces
    pub front_face: vk::FrontFace,
    /// Rasterized line width
    pub line_width: f32,
    /// Sample count of the attachments
    pub samples: vk::SampleCountFlags,
    /// Depth test and write with this compare op, `None` disables depth
    pub depth_compare_op: Option<vk::CompareOp>,
    /// Static viewports, ignored when the viewport is dynamic
    pub viewports: Vec<vk::Viewport>,
    /// Static scissors, ignored when the scissor is dynamic
    pub scissors: Vec<vk::Rect2D>,
    /// One blend state per colour attachment of the subpass
    pub color_blend_attachments: Vec<vk::PipelineColorBlendAttachmentState>,
}

impl Default for FixedFunctionState {
    fn default() -> Self {
        Self {
            topology: vk::PrimitiveTopology::TRIANGLE_LIST,
            primitive_restart: false,
            polygon_mode: vk::PolygonMode::FILL,
            cull_mode: vk::CullModeFlags::BACK,
            front_face: vk::FrontFace::CLOCKWISE,
            line_width: 1.0,
            samples: vk::SampleCountFlags::TYPE_1,
            depth_compare_op: None,
            viewports: Vec::new(),
            scissors: Vec::new(),
            color_blend_attachments: vec![Self::opaque_attachment()],
        }
    }
}

impl FixedFunctionState {
    /// Blend state that writes all channels without blending
    pub fn opaque_attachment() -> vk::PipelineColorBlendAttachmentState {
        vk::PipelineColorBlendAttachmentState::builder()
            .color_write_mask(vk::ColorComponentFlags::RGBA)
            .blend_enable(false)
            .build()
    }

    /// Blend state for straight alpha blending
    pub fn alpha_blend_attachment() -> vk::PipelineColorBlendAttachmentState {
        vk::PipelineColorBlendAttachmentState::builder()
            .color_write_mask(vk::ColorComponentFlags::RGBA)
            .blend_enable(true)
            .src_color_blend_factor(vk::BlendFactor::SRC_ALPHA)
            .dst_color_blend_factor(vk::BlendFactor::ONE_MINUS_SRC_ALPHA)
            .color_blend_op(vk::BlendOp::ADD)
            .src_alpha_blend_factor(vk::BlendFactor::ONE)
            .dst_alpha_blend_factor(vk::BlendFactor::ZERO)
            .alpha_blend_op(vk::BlendOp::ADD)
            .build()
    }

    /// Use one viewport and scissor covering `extent`
    #[must_use]
    pub fn with_extent(mut self, extent: vk::Extent2D) -> Self {
        self.viewports = vec![vk::Viewport {
            x: 0.0,
            y: 0.0,
            width: extent.width as f32,
            height: extent.height as f32,
            min_depth: 0.0,
            max_depth: 1.0,
        }];
        self.scissors = vec![vk::Rect2D {
            offset: vk::Offset2D { x: 0, y: 0 },
            extent,
        }];
        self
    }

    /// Enable depth test and write with `compare_op`
    #[must_use]
    pub const fn with_depth_test(mut self, compare_op: vk::CompareOp) -> Self {
        self.depth_compare_op = Some(compare_op);
        self
    }

    /// Replace the culling mode
    #[must_use]
    pub const fn with_cull_mode(mut self, cull_mode: vk::CullModeFlags, front_face: vk::FrontFace) -> Self {
        self.cull_mode = cull_mode;
        self.front_face = front_face;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = FixedFunctionState::default();
        assert_eq!(state.topology, vk::PrimitiveTopology::TRIANGLE_LIST);
        assert!(state.viewports.is_empty());
        assert!(state.depth_compare_op.is_none());
        assert_eq!(state.color_blend_attachments.len(), 1);
        assert_eq!(state.color_blend_attachments[0].blend_enable, vk::FALSE);
    }

    #[test]
    fn test_with_extent() {
        let extent = vk::Extent2D { width: 500, height: 400 };
        let state = FixedFunctionState::default().with_extent(extent);

        assert_eq!(state.viewports.len(), 1);
        assert_eq!(state.viewports[0].width, 500.0);
        assert_eq!(state.viewports[0].height, 400.0);
        assert_eq!(state.scissors[0].extent, extent);
    }

    #[test]
    fn test_alpha_blend_attachment() {
        let attachment = FixedFunctionState::alpha_blend_attachment();
        assert_eq!(attachment.blend_enable, vk::TRUE);
        assert_eq!(attachment.src_color_blend_factor, vk::BlendFactor::SRC_ALPHA);
    }
}
