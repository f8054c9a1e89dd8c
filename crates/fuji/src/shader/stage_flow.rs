//! Shader stage flow
//!
//! A [`ShaderStageFlow`] owns the shader modules of one pipeline and the
//! vertex input layout their vertex stage reads. On construction it flattens
//! the layout into Vulkan binding and attribute descriptions and builds one
//! stage create info per module.
//!
//! Attribute locations come from a single counter shared by every binding,
//! so a layout with attribute counts `[2, 1]` gets locations `0, 1` on
//! binding 0 and `2` on binding 1.

use std::ffi::CStr;

use ash::vk;

use super::ShaderModule;
use crate::config::ShaderConfig;
use crate::device::RenderDevice;
use crate::error::FujiResult;
use crate::vertex::VertexShaderInputLayout;

/// Entry point every stage is created with
pub const SHADER_ENTRY_POINT: &CStr = c"main";

/// Shader modules plus vertex input layout, flattened for pipeline creation
pub struct ShaderStageFlow<D: RenderDevice> {
    shader_modules: Vec<ShaderModule<D>>,
    input_layout: VertexShaderInputLayout,
    binding_descriptions: Vec<vk::VertexInputBindingDescription>,
    attribute_descriptions: Vec<vk::VertexInputAttributeDescription>,
    shader_stage_create_infos: Vec<vk::PipelineShaderStageCreateInfo>,
    // Points into the two description vectors above, which are never
    // modified after construction.
    vertex_input_state: vk::PipelineVertexInputStateCreateInfo,
}

impl<D: RenderDevice> ShaderStageFlow<D> {
    /// Take ownership of `shader_modules` and `input_layout`
    pub fn new(shader_modules: Vec<ShaderModule<D>>, input_layout: VertexShaderInputLayout) -> Self {
        let shader_stage_create_infos = shader_modules
            .iter()
            .map(|module| {
                vk::PipelineShaderStageCreateInfo::builder()
                    .stage(module.stage())
                    .module(module.handle())
                    .name(SHADER_ENTRY_POINT)
                    .build()
            })
            .collect();

        let mut binding_descriptions = Vec::with_capacity(input_layout.bindings().len());
        let mut attribute_descriptions = Vec::with_capacity(input_layout.attribute_count());
        let mut location = 0;
        for (index, binding) in (0u32..).zip(input_layout.bindings()) {
            binding_descriptions.push(vk::VertexInputBindingDescription {
                binding: index,
                stride: binding.stride(),
                input_rate: binding.input_rate(),
            });

            for attribute in binding.attribute_descriptions() {
                attribute_descriptions.push(vk::VertexInputAttributeDescription {
                    location,
                    binding: index,
                    format: attribute.format,
                    offset: attribute.offset,
                });
                location += 1;
            }
        }

        let vertex_input_state = vk::PipelineVertexInputStateCreateInfo::builder()
            .vertex_binding_descriptions(&binding_descriptions)
            .vertex_attribute_descriptions(&attribute_descriptions)
            .build();

        log::debug!(
            "Shader stage flow: {} stages, {} bindings, {} attributes",
            shader_modules.len(),
            binding_descriptions.len(),
            attribute_descriptions.len()
        );

        Self {
            shader_modules,
            input_layout,
            binding_descriptions,
            attribute_descriptions,
            shader_stage_create_infos,
            vertex_input_state,
        }
    }

    /// Load a vertex + fragment flow from the SPIR-V files named in `config`
    pub fn from_config(device: &D, config: &ShaderConfig, input_layout: VertexShaderInputLayout) -> FujiResult<Self> {
        let shader_modules = vec![
            ShaderModule::from_file(device.clone(), &config.vertex_shader_path, vk::ShaderStageFlags::VERTEX)?,
            ShaderModule::from_file(device.clone(), &config.fragment_shader_path, vk::ShaderStageFlags::FRAGMENT)?,
        ];
        Ok(Self::new(shader_modules, input_layout))
    }

    /// One stage create info per module, in module order
    pub fn shader_stage_create_infos(&self) -> &[vk::PipelineShaderStageCreateInfo] {
        &self.shader_stage_create_infos
    }

    /// Vertex input state referencing this flow's descriptions
    pub const fn vertex_input_state(&self) -> &vk::PipelineVertexInputStateCreateInfo {
        &self.vertex_input_state
    }

    /// One description per binding, in layout order
    pub fn binding_descriptions(&self) -> &[vk::VertexInputBindingDescription] {
        &self.binding_descriptions
    }

    /// One description per attribute across all bindings, in location order
    pub fn attribute_descriptions(&self) -> &[vk::VertexInputAttributeDescription] {
        &self.attribute_descriptions
    }

    /// Owned shader modules
    pub fn shader_modules(&self) -> &[ShaderModule<D>] {
        &self.shader_modules
    }

    /// Layout the descriptions were derived from
    pub const fn input_layout(&self) -> &VertexShaderInputLayout {
        &self.input_layout
    }
}
