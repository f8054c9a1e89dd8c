//! Shader modules and the stage flows built from them

mod module;
mod stage_flow;

pub use module::ShaderModule;
pub use stage_flow::{ShaderStageFlow, SHADER_ENTRY_POINT};
