//! The device seam used by shader modules and pipeline templates
//!
//! Everything in [`crate::shader`] and [`crate::pipeline`] talks to the logical
//! device through [`RenderDevice`], so those types work with a plain
//! `ash::Device` as well as with an in-memory stand-in.

use ash::{vk, Device};

/// Logical device operations consumed by the core helpers
///
/// Implementors are cheap handles: the wrappers clone the device into every
/// resource they own so the resource can release itself on drop.
pub trait RenderDevice: Clone {
    /// Create a shader module from SPIR-V words
    fn create_shader_module(&self, code: &[u32]) -> Result<vk::ShaderModule, vk::Result>;

    /// Destroy a shader module created by this device
    fn destroy_shader_module(&self, module: vk::ShaderModule);

    /// Create a pipeline layout
    fn create_pipeline_layout(&self, create_info: &vk::PipelineLayoutCreateInfo) -> Result<vk::PipelineLayout, vk::Result>;

    /// Destroy a pipeline layout created by this device
    fn destroy_pipeline_layout(&self, layout: vk::PipelineLayout);

    /// Create one pipeline per create info, in order
    ///
    /// Either every pipeline is returned or none is: on failure nothing
    /// created by the call may be left alive.
    fn create_graphics_pipelines(
        &self,
        cache: vk::PipelineCache,
        create_infos: &[vk::GraphicsPipelineCreateInfo],
    ) -> Result<Vec<vk::Pipeline>, vk::Result>;

    /// Destroy a pipeline created by this device
    fn destroy_pipeline(&self, pipeline: vk::Pipeline);
}

impl RenderDevice for Device {
    fn create_shader_module(&self, code: &[u32]) -> Result<vk::ShaderModule, vk::Result> {
        let create_info = vk::ShaderModuleCreateInfo::builder().code(code);
        unsafe { Self::create_shader_module(self, &create_info, None) }
    }

    fn destroy_shader_module(&self, module: vk::ShaderModule) {
        unsafe { Self::destroy_shader_module(self, module, None) }
    }

    fn create_pipeline_layout(&self, create_info: &vk::PipelineLayoutCreateInfo) -> Result<vk::PipelineLayout, vk::Result> {
        unsafe { Self::create_pipeline_layout(self, create_info, None) }
    }

    fn destroy_pipeline_layout(&self, layout: vk::PipelineLayout) {
        unsafe { Self::destroy_pipeline_layout(self, layout, None) }
    }

    fn create_graphics_pipelines(
        &self,
        cache: vk::PipelineCache,
        create_infos: &[vk::GraphicsPipelineCreateInfo],
    ) -> Result<Vec<vk::Pipeline>, vk::Result> {
        unsafe { Self::create_graphics_pipelines(self, cache, create_infos, None) }.map_err(|(partial, err)| {
            for pipeline in partial.into_iter().filter(|pipeline| *pipeline != vk::Pipeline::null()) {
                unsafe { Self::destroy_pipeline(self, pipeline, None) };
            }
            err
        })
    }

    fn destroy_pipeline(&self, pipeline: vk::Pipeline) {
        unsafe { Self::destroy_pipeline(self, pipeline, None) }
    }
}
