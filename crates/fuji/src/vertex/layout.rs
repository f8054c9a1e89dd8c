//! Vertex bindings and input layouts
//!
//! A [`Binding`] describes one vertex buffer: the record type's stride, how
//! the buffer advances and one [`AttributeDescription`] per field. A
//! [`VertexShaderInputLayout`] is the ordered list of bindings a vertex shader
//! reads from; binding indices and attribute locations are handed out later by
//! [`ShaderStageFlow`](crate::shader::ShaderStageFlow).

use ash::vk;

use super::VertexFormat;

/// Format and byte offset of one field within a vertex record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeDescription {
    /// Format the shader reads the field with
    pub format: vk::Format,
    /// Byte offset of the field from the start of the record
    pub offset: u32,
}

impl AttributeDescription {
    /// Describe an attribute from an explicit format and offset
    pub const fn new(format: vk::Format, offset: u32) -> Self {
        Self { format, offset }
    }

    /// Describe the field reached by `field`, which lives `offset` bytes into `T`
    ///
    /// The accessor is only used to infer the field type; [`binding!`](crate::binding)
    /// pairs it with the matching `offset_of!` so the two cannot drift apart.
    pub fn for_field<T, U, F>(offset: usize, _field: F) -> Self
    where
        U: VertexFormat,
        F: Fn(&T) -> &U,
    {
        Self {
            format: U::FORMAT,
            offset: offset as u32,
        }
    }
}

/// One vertex buffer binding: input rate, attributes and record stride
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    input_rate: vk::VertexInputRate,
    attributes: Vec<AttributeDescription>,
    stride: u32,
}

impl Binding {
    /// Binding over records of type `T`; the stride is `size_of::<T>()`
    ///
    /// Attributes keep the order they are given in. Overlapping or
    /// out-of-stride offsets are not checked.
    pub fn new<T>(input_rate: vk::VertexInputRate, attributes: Vec<AttributeDescription>) -> Self {
        Self::with_stride(input_rate, std::mem::size_of::<T>() as u32, attributes)
    }

    /// Binding with a hand-computed stride
    pub const fn with_stride(input_rate: vk::VertexInputRate, stride: u32, attributes: Vec<AttributeDescription>) -> Self {
        Self {
            input_rate,
            attributes,
            stride,
        }
    }

    /// Whether the buffer advances per vertex or per instance
    pub const fn input_rate(&self) -> vk::VertexInputRate {
        self.input_rate
    }

    /// Attributes in declaration order
    pub fn attribute_descriptions(&self) -> &[AttributeDescription] {
        &self.attributes
    }

    /// Size of one record in bytes
    pub const fn stride(&self) -> u32 {
        self.stride
    }
}

/// Build a [`Binding`] from a `#[repr(C)]` record type and a list of its fields
///
/// ```
/// use fuji::vk;
/// use nalgebra::{Vector2, Vector4};
///
/// #[repr(C)]
/// struct Vertex {
///     pos: Vector2<f32>,
///     color: Vector4<f32>,
/// }
///
/// let binding = fuji::binding!(vk::VertexInputRate::VERTEX, Vertex { pos, color });
/// assert_eq!(binding.stride(), 24);
/// assert_eq!(binding.attribute_descriptions()[1].offset, 8);
/// ```
///
/// Every listed field must have a [`VertexFormat`] implementation, otherwise
/// the call does not compile.
#[macro_export]
macro_rules! binding {
    ($input_rate:expr, $record:path { $($field:ident),+ $(,)? }) => {
        $crate::vertex::Binding::new::<$record>(
            $input_rate,
            ::std::vec![
                $(
                    $crate::vertex::AttributeDescription::for_field(
                        $crate::memoffset::offset_of!($record, $field),
                        |record: &$record| &record.$field,
                    )
                ),+
            ],
        )
    };
}

/// Ordered bindings read by a vertex shader; binding index = position
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexShaderInputLayout {
    bindings: Vec<Binding>,
}

impl VertexShaderInputLayout {
    /// Layout over `bindings`, kept verbatim
    pub const fn new(bindings: Vec<Binding>) -> Self {
        Self { bindings }
    }

    /// Bindings in binding-index order
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Total number of attributes across all bindings
    pub fn attribute_count(&self) -> usize {
        self.bindings.iter().map(|binding| binding.attribute_descriptions().len()).sum()
    }
}

impl FromIterator<Binding> for VertexShaderInputLayout {
    fn from_iter<I: IntoIterator<Item = Binding>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Matrix4, Vector2, Vector3, Vector4};

    #[repr(C)]
    struct Vertex1 {
        attribute1: Vector2<f32>,
        attribute2: Vector4<f32>,
    }

    #[repr(C)]
    struct Vertex2 {
        attribute1: u8,
        attribute2: Matrix4<f32>,
    }

    #[repr(C)]
    struct Mixed {
        position: [f32; 3],
        normal: Vector3<f32>,
        joints: [u16; 4],
        weight: f64,
        id: i32,
    }

    #[test]
    fn test_binding_vec2_vec4() {
        let binding = binding!(vk::VertexInputRate::VERTEX, Vertex1 { attribute1, attribute2 });

        assert_eq!(binding.stride(), 24);
        assert_eq!(binding.input_rate(), vk::VertexInputRate::VERTEX);
        assert_eq!(
            binding.attribute_descriptions(),
            &[
                AttributeDescription::new(vk::Format::R32G32_SFLOAT, 0),
                AttributeDescription::new(vk::Format::R32G32B32A32_SFLOAT, 8),
            ]
        );
    }

    #[test]
    fn test_binding_byte_and_matrix() {
        let binding = binding!(vk::VertexInputRate::INSTANCE, Vertex2 { attribute1, attribute2 });

        assert_eq!(binding.stride(), 4 + std::mem::size_of::<Matrix4<f32>>() as u32);
        assert_eq!(binding.input_rate(), vk::VertexInputRate::INSTANCE);
        assert_eq!(binding.attribute_descriptions()[0], AttributeDescription::new(vk::Format::R8_UINT, 0));
        assert_eq!(
            binding.attribute_descriptions()[1],
            AttributeDescription::new(vk::Format::ASTC_4X4_SFLOAT_BLOCK, 4)
        );
    }

    #[test]
    fn test_binding_offsets_match_layout() {
        let binding = binding!(vk::VertexInputRate::VERTEX, Mixed { position, normal, joints, weight, id });
        let offsets: Vec<u32> = binding.attribute_descriptions().iter().map(|a| a.offset).collect();

        assert_eq!(binding.attribute_descriptions().len(), 5);
        assert_eq!(
            offsets,
            vec![
                memoffset::offset_of!(Mixed, position) as u32,
                memoffset::offset_of!(Mixed, normal) as u32,
                memoffset::offset_of!(Mixed, joints) as u32,
                memoffset::offset_of!(Mixed, weight) as u32,
                memoffset::offset_of!(Mixed, id) as u32,
            ]
        );
        assert_eq!(binding.stride(), std::mem::size_of::<Mixed>() as u32);
    }

    #[test]
    fn test_attribute_order_follows_arguments() {
        let binding = binding!(vk::VertexInputRate::VERTEX, Vertex1 { attribute2, attribute1 });

        assert_eq!(binding.attribute_descriptions()[0].offset, 8);
        assert_eq!(binding.attribute_descriptions()[1].offset, 0);
    }

    #[test]
    fn test_layout_keeps_bindings_verbatim() {
        let first = binding!(vk::VertexInputRate::VERTEX, Vertex1 { attribute1, attribute2 });
        let second = binding!(vk::VertexInputRate::VERTEX, Vertex2 { attribute1, attribute2 });
        let layout = VertexShaderInputLayout::new(vec![first.clone(), second.clone(), first.clone()]);

        assert_eq!(layout.bindings(), &[first.clone(), second, first]);
        assert_eq!(layout.attribute_count(), 6);
    }

    #[test]
    fn test_layout_from_iterator() {
        let layout: VertexShaderInputLayout = (0..3)
            .map(|i| Binding::with_stride(vk::VertexInputRate::VERTEX, 4 * (i + 1), vec![]))
            .collect();

        let strides: Vec<u32> = layout.bindings().iter().map(Binding::stride).collect();
        assert_eq!(strides, vec![4, 8, 12]);
        assert_eq!(layout.attribute_count(), 0);
    }
}
