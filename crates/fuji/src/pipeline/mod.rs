//! Graphics pipeline construction
//!
//! Templates describe a pipeline; [`create_graphics_pipelines`] builds a
//! batch of them in one device call.

mod fixed_function;
mod layout;
mod template;

pub use fixed_function::FixedFunctionState;
pub use layout::PipelineLayout;
pub use template::{
    create_graphics_pipelines, DynamicViewportTemplate, GraphicsPipelineCreateInfo, GraphicsPipelineCreateInfoTemplate,
    Pipeline, PipelineTarget, PipelineTemplate,
};
