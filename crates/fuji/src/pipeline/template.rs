//! Graphics pipeline creation templates
//!
//! A template owns a [`ShaderStageFlow`] and knows the remaining state of the
//! pipeline it describes. [`PipelineTemplate::dynamic_states`] is the
//! override point: the base template declares no dynamic state, and wrappers
//! such as [`DynamicViewportTemplate`] move selected state to draw time.
//!
//! [`create_graphics_pipelines`] turns a batch of templates into pipelines
//! with a single device call.

use ash::vk;

use super::FixedFunctionState;
use crate::device::RenderDevice;
use crate::error::{FujiError, FujiResult};
use crate::shader::ShaderStageFlow;

/// Layout and render pass a pipeline is created against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineTarget {
    /// Pipeline layout
    pub layout: vk::PipelineLayout,
    /// Render pass the pipeline is used in
    pub render_pass: vk::RenderPass,
    /// Subpass index within `render_pass`
    pub subpass: u32,
}

impl PipelineTarget {
    /// Target subpass 0 of `render_pass`
    pub const fn new(layout: vk::PipelineLayout, render_pass: vk::RenderPass) -> Self {
        Self {
            layout,
            render_pass,
            subpass: 0,
        }
    }
}

/// Everything needed to describe one graphics pipeline
pub trait PipelineTemplate<D: RenderDevice> {
    /// Shader stages and vertex input
    fn shader_stage_flow(&self) -> &ShaderStageFlow<D>;

    /// Rasterization, blending and viewport state
    fn fixed_function_state(&self) -> &FixedFunctionState;

    /// Layout and render pass
    fn target(&self) -> PipelineTarget;

    /// State supplied at draw time instead of at creation time
    fn dynamic_states(&self) -> Vec<vk::DynamicState> {
        Vec::new()
    }

    /// Assemble the create info, borrowing from this template
    fn create_info<'a>(&'a self) -> GraphicsPipelineCreateInfo<'a>
    where
        D: 'a,
    {
        let flow = self.shader_stage_flow();
        GraphicsPipelineCreateInfo::new(
            flow.shader_stage_create_infos(),
            flow.vertex_input_state(),
            self.fixed_function_state(),
            self.target(),
            self.dynamic_states(),
        )
    }
}

/// Base template: a stage flow plus fixed-function state, no dynamic state
pub struct GraphicsPipelineCreateInfoTemplate<D: RenderDevice> {
    shader_stage_flow: ShaderStageFlow<D>,
    fixed_function_state: FixedFunctionState,
    target: PipelineTarget,
}

impl<D: RenderDevice> GraphicsPipelineCreateInfoTemplate<D> {
    /// Template over `shader_stage_flow` with default fixed-function state
    pub fn new(shader_stage_flow: ShaderStageFlow<D>, target: PipelineTarget) -> Self {
        Self {
            shader_stage_flow,
            fixed_function_state: FixedFunctionState::default(),
            target,
        }
    }

    /// Replace the fixed-function state
    #[must_use]
    pub fn with_fixed_function_state(mut self, state: FixedFunctionState) -> Self {
        self.fixed_function_state = state;
        self
    }
}

impl<D: RenderDevice> PipelineTemplate<D> for GraphicsPipelineCreateInfoTemplate<D> {
    fn shader_stage_flow(&self) -> &ShaderStageFlow<D> {
        &self.shader_stage_flow
    }

    fn fixed_function_state(&self) -> &FixedFunctionState {
        &self.fixed_function_state
    }

    fn target(&self) -> PipelineTarget {
        self.target
    }
}

/// Template whose viewport and scissor are set while recording
pub struct DynamicViewportTemplate<D: RenderDevice> {
    base: GraphicsPipelineCreateInfoTemplate<D>,
}

impl<D: RenderDevice> DynamicViewportTemplate<D> {
    /// Wrap `base`, moving its viewport and scissor to draw time
    pub const fn new(base: GraphicsPipelineCreateInfoTemplate<D>) -> Self {
        Self { base }
    }
}

impl<D: RenderDevice> PipelineTemplate<D> for DynamicViewportTemplate<D> {
    fn shader_stage_flow(&self) -> &ShaderStageFlow<D> {
        self.base.shader_stage_flow()
    }

    fn fixed_function_state(&self) -> &FixedFunctionState {
        self.base.fixed_function_state()
    }

    fn target(&self) -> PipelineTarget {
        self.base.target()
    }

    fn dynamic_states(&self) -> Vec<vk::DynamicState> {
        vec![vk::DynamicState::VIEWPORT, vk::DynamicState::SCISSOR]
    }
}

/// Create info assembled from a template
///
/// Stage list, vertex input and fixed-function state are borrowed from the
/// template for `'a`; nothing is copied. The Vulkan sub-state structs built
/// here point either into that borrowed data or into `dynamic_states`, whose
/// buffer is never modified after construction.
pub struct GraphicsPipelineCreateInfo<'a> {
    stages: &'a [vk::PipelineShaderStageCreateInfo],
    vertex_input_state: &'a vk::PipelineVertexInputStateCreateInfo,
    target: PipelineTarget,
    dynamic_states: Vec<vk::DynamicState>,
    input_assembly: vk::PipelineInputAssemblyStateCreateInfo,
    viewport_state: vk::PipelineViewportStateCreateInfo,
    rasterization: vk::PipelineRasterizationStateCreateInfo,
    multisample: vk::PipelineMultisampleStateCreateInfo,
    depth_stencil: Option<vk::PipelineDepthStencilStateCreateInfo>,
    color_blend: vk::PipelineColorBlendStateCreateInfo,
    dynamic_state: vk::PipelineDynamicStateCreateInfo,
}

impl<'a> GraphicsPipelineCreateInfo<'a> {
    /// Assemble a create info from its parts
    pub fn new(
        stages: &'a [vk::PipelineShaderStageCreateInfo],
        vertex_input_state: &'a vk::PipelineVertexInputStateCreateInfo,
        fixed: &'a FixedFunctionState,
        target: PipelineTarget,
        dynamic_states: Vec<vk::DynamicState>,
    ) -> Self {
        let input_assembly = vk::PipelineInputAssemblyStateCreateInfo::builder()
            .topology(fixed.topology)
            .primitive_restart_enable(fixed.primitive_restart)
            .build();

        let dynamic_viewport = dynamic_states.contains(&vk::DynamicState::VIEWPORT);
        let dynamic_scissor = dynamic_states.contains(&vk::DynamicState::SCISSOR);
        // Dynamic viewports still need a count, but no static data
        let (viewport_count, p_viewports) = if dynamic_viewport {
            (fixed.viewports.len().max(1), std::ptr::null())
        } else {
            (fixed.viewports.len(), fixed.viewports.as_ptr())
        };
        let (scissor_count, p_scissors) = if dynamic_scissor {
            (fixed.scissors.len().max(1), std::ptr::null())
        } else {
            (fixed.scissors.len(), fixed.scissors.as_ptr())
        };
        let viewport_state = vk::PipelineViewportStateCreateInfo {
            viewport_count: viewport_count as u32,
            p_viewports,
            scissor_count: scissor_count as u32,
            p_scissors,
            ..Default::default()
        };

        let rasterization = vk::PipelineRasterizationStateCreateInfo::builder()
            .depth_clamp_enable(false)
            .rasterizer_discard_enable(false)
            .polygon_mode(fixed.polygon_mode)
            .line_width(fixed.line_width)
            .cull_mode(fixed.cull_mode)
            .front_face(fixed.front_face)
            .depth_bias_enable(false)
            .build();

        let multisample = vk::PipelineMultisampleStateCreateInfo::builder()
            .sample_shading_enable(false)
            .rasterization_samples(fixed.samples)
            .build();

        let depth_stencil = fixed.depth_compare_op.map(|compare_op| {
            vk::PipelineDepthStencilStateCreateInfo::builder()
                .depth_test_enable(true)
                .depth_write_enable(true)
                .depth_compare_op(compare_op)
                .depth_bounds_test_enable(false)
                .stencil_test_enable(false)
                .build()
        });

        let color_blend = vk::PipelineColorBlendStateCreateInfo::builder()
            .logic_op_enable(false)
            .attachments(&fixed.color_blend_attachments)
            .build();

        let dynamic_state = vk::PipelineDynamicStateCreateInfo::builder()
            .dynamic_states(&dynamic_states)
            .build();

        Self {
            stages,
            vertex_input_state,
            target,
            dynamic_states,
            input_assembly,
            viewport_state,
            rasterization,
            multisample,
            depth_stencil,
            color_blend,
            dynamic_state,
        }
    }

    /// Shader stages borrowed from the template
    pub const fn stages(&self) -> &'a [vk::PipelineShaderStageCreateInfo] {
        self.stages
    }

    /// Vertex input state borrowed from the template
    pub const fn vertex_input_state(&self) -> &'a vk::PipelineVertexInputStateCreateInfo {
        self.vertex_input_state
    }

    /// Dynamic states of the pipeline
    pub fn dynamic_states(&self) -> &[vk::DynamicState] {
        &self.dynamic_states
    }

    /// Layout and render pass
    pub const fn target(&self) -> PipelineTarget {
        self.target
    }

    /// Reject state the device would refuse
    ///
    /// A pipeline with static viewport or scissor state needs at least one of
    /// each; see [`FixedFunctionState::with_extent`].
    pub fn validate(&self) -> FujiResult<()> {
        if self.viewport_state.viewport_count == 0 || self.viewport_state.scissor_count == 0 {
            return Err(FujiError::InvalidOperation {
                reason: format!(
                    "static viewport state needs at least one viewport and scissor (got {} and {})",
                    self.viewport_state.viewport_count, self.viewport_state.scissor_count
                ),
            });
        }
        Ok(())
    }

    /// Vulkan create info, valid for as long as `self` is borrowed
    pub fn builder(&self) -> vk::GraphicsPipelineCreateInfoBuilder<'_> {
        let mut builder = vk::GraphicsPipelineCreateInfo::builder()
            .stages(self.stages)
            .vertex_input_state(self.vertex_input_state)
            .input_assembly_state(&self.input_assembly)
            .viewport_state(&self.viewport_state)
            .rasterization_state(&self.rasterization)
            .multisample_state(&self.multisample)
            .color_blend_state(&self.color_blend)
            .layout(self.target.layout)
            .render_pass(self.target.render_pass)
            .subpass(self.target.subpass);

        if let Some(depth_stencil) = &self.depth_stencil {
            builder = builder.depth_stencil_state(depth_stencil);
        }
        if !self.dynamic_states.is_empty() {
            builder = builder.dynamic_state(&self.dynamic_state);
        }
        builder
    }
}

/// Graphics pipeline with RAII cleanup
pub struct Pipeline<D: RenderDevice> {
    device: D,
    pipeline: vk::Pipeline,
}

impl<D: RenderDevice> Pipeline<D> {
    /// Take ownership of a pipeline created on `device`
    pub const fn from_raw(device: D, pipeline: vk::Pipeline) -> Self {
        Self { device, pipeline }
    }

    /// Get pipeline handle
    pub const fn handle(&self) -> vk::Pipeline {
        self.pipeline
    }
}

impl<D: RenderDevice> Drop for Pipeline<D> {
    fn drop(&mut self) {
        log::debug!("Destroying pipeline {:?}", self.pipeline);
        self.device.destroy_pipeline(self.pipeline);
    }
}

impl<D: RenderDevice> std::fmt::Debug for Pipeline<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline").field("pipeline", &self.pipeline).finish_non_exhaustive()
    }
}

/// Create one pipeline per template with a single device call
///
/// Pipelines come back in template order. If the device call fails the
/// error carries its status and no pipeline is returned; the batch does not
/// report which template was at fault. Templates that fail
/// [`GraphicsPipelineCreateInfo::validate`] are rejected with
/// [`FujiError::InvalidOperation`] before the device is called.
pub fn create_graphics_pipelines<D: RenderDevice>(
    device: &D,
    templates: &[&dyn PipelineTemplate<D>],
) -> FujiResult<Vec<Pipeline<D>>> {
    if templates.is_empty() {
        return Ok(Vec::new());
    }

    let create_infos: Vec<GraphicsPipelineCreateInfo<'_>> = templates.iter().map(|template| template.create_info()).collect();
    for info in &create_infos {
        info.validate()?;
    }
    let raw_create_infos: Vec<vk::GraphicsPipelineCreateInfo> = create_infos.iter().map(|info| info.builder().build()).collect();

    let handles = device
        .create_graphics_pipelines(vk::PipelineCache::null(), &raw_create_infos)
        .map_err(|err| {
            log::error!("Batched creation of {} graphics pipelines failed: {:?}", templates.len(), err);
            FujiError::PipelineCreationFailed(err)
        })?;

    if handles.len() != templates.len() {
        log::error!("Device returned {} pipelines for a batch of {}", handles.len(), templates.len());
        for handle in handles {
            device.destroy_pipeline(handle);
        }
        return Err(FujiError::PipelineCreationFailed(vk::Result::ERROR_UNKNOWN));
    }

    log::debug!("Created {} graphics pipelines", handles.len());
    Ok(handles.into_iter().map(|handle| Pipeline::from_raw(device.clone(), handle)).collect())
}
