//! # Fuji
//!
//! Thin helpers over Vulkan (through `ash`) that take the boilerplate out of
//! building graphics demo programs.
//!
//! ## Features
//!
//! - **Vertex input layouts**: describe vertex records field by field and get
//!   binding and attribute descriptions with stable location numbering
//! - **Shader stage flows**: own a set of shader modules plus their vertex
//!   input layout and expose everything a pipeline needs
//! - **Pipeline templates**: overridable pipeline creation templates with
//!   batched, all-or-nothing pipeline creation
//! - **Frame loop**: fence/semaphore sequencing for record, submit and present
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fuji::prelude::*;
//! use nalgebra::{Vector2, Vector4};
//!
//! #[repr(C)]
//! struct Vertex {
//!     pos: Vector2<f32>,
//!     color: Vector4<f32>,
//! }
//!
//! fn build(device: ash::Device, vert: &[u8], frag: &[u8], target: PipelineTarget) -> FujiResult<()> {
//!     let modules = vec![
//!         ShaderModule::new(device.clone(), vert, vk::ShaderStageFlags::VERTEX)?,
//!         ShaderModule::new(device.clone(), frag, vk::ShaderStageFlags::FRAGMENT)?,
//!     ];
//!     let layout = VertexShaderInputLayout::new(vec![
//!         fuji::binding!(vk::VertexInputRate::VERTEX, Vertex { pos, color }),
//!     ]);
//!     let template = GraphicsPipelineCreateInfoTemplate::new(ShaderStageFlow::new(modules, layout), target)
//!         .with_fixed_function_state(FixedFunctionState::default().with_extent(vk::Extent2D { width: 800, height: 600 }));
//!     let _pipelines = create_graphics_pipelines(&device, &[&template])?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod device;
pub mod engine;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod shader;
pub mod vertex;

#[cfg(test)]
pub(crate) mod testing;

pub use ash::vk;
#[doc(hidden)]
pub use memoffset;

pub use device::RenderDevice;
pub use error::{FujiError, FujiResult};

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, ConfigFormat, FrameConfig, ShaderConfig},
        device::RenderDevice,
        engine::{ActiveRenderPass, CommandPool, CommandRecorder, FrameLoop, FrameQueues, FrameSync, RenderPass, RenderTarget},
        error::{FujiError, FujiResult},
        pipeline::{
            create_graphics_pipelines, DynamicViewportTemplate, FixedFunctionState, GraphicsPipelineCreateInfo,
            GraphicsPipelineCreateInfoTemplate, Pipeline, PipelineLayout, PipelineTarget, PipelineTemplate,
        },
        shader::{ShaderModule, ShaderStageFlow, SHADER_ENTRY_POINT},
        vertex::{AttributeDescription, Binding, VertexFormat, VertexShaderInputLayout},
        vk,
    };
}
