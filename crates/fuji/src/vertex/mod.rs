//! Vertex input description
//!
//! Record types are described field by field with the [`binding!`](crate::binding)
//! macro. Field formats come from the [`VertexFormat`] table and offsets from
//! `offset_of!`, so a layout always matches the record it describes.

mod format;
mod layout;

pub use format::VertexFormat;
pub use layout::{AttributeDescription, Binding, VertexShaderInputLayout};
