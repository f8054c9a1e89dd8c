//! Static mapping from vertex field types to Vulkan formats
//!
//! The table is closed: a field type without a [`VertexFormat`]
//! implementation cannot be placed in a [`Binding`](super::Binding), and the
//! mistake is reported by the compiler rather than at runtime.

use ash::vk;
use nalgebra::{Matrix4, Vector2, Vector3, Vector4};

/// Field types that can be read by a vertex shader input
pub trait VertexFormat {
    /// Format the attribute is described with
    const FORMAT: vk::Format;
}

macro_rules! vertex_formats {
    ($($scalar:ty => [$one:ident, $two:ident, $three:ident, $four:ident]),* $(,)?) => {
        $(
            impl VertexFormat for $scalar {
                const FORMAT: vk::Format = vk::Format::$one;
            }
            impl VertexFormat for [$scalar; 2] {
                const FORMAT: vk::Format = vk::Format::$two;
            }
            impl VertexFormat for [$scalar; 3] {
                const FORMAT: vk::Format = vk::Format::$three;
            }
            impl VertexFormat for [$scalar; 4] {
                const FORMAT: vk::Format = vk::Format::$four;
            }
            impl VertexFormat for Vector2<$scalar> {
                const FORMAT: vk::Format = vk::Format::$two;
            }
            impl VertexFormat for Vector3<$scalar> {
                const FORMAT: vk::Format = vk::Format::$three;
            }
            impl VertexFormat for Vector4<$scalar> {
                const FORMAT: vk::Format = vk::Format::$four;
            }
        )*
    };
}

vertex_formats! {
    f32 => [R32_SFLOAT, R32G32_SFLOAT, R32G32B32_SFLOAT, R32G32B32A32_SFLOAT],
    f64 => [R64_SFLOAT, R64G64_SFLOAT, R64G64B64_SFLOAT, R64G64B64A64_SFLOAT],
    i8 => [R8_SINT, R8G8_SINT, R8G8B8_SINT, R8G8B8A8_SINT],
    i16 => [R16_SINT, R16G16_SINT, R16G16B16_SINT, R16G16B16A16_SINT],
    i32 => [R32_SINT, R32G32_SINT, R32G32B32_SINT, R32G32B32A32_SINT],
    i64 => [R64_SINT, R64G64_SINT, R64G64B64_SINT, R64G64B64A64_SINT],
    u8 => [R8_UINT, R8G8_UINT, R8G8B8_UINT, R8G8B8A8_UINT],
    u16 => [R16_UINT, R16G16_UINT, R16G16B16_UINT, R16G16B16A16_UINT],
    u32 => [R32_UINT, R32G32_UINT, R32G32B32_UINT, R32G32B32A32_UINT],
    u64 => [R64_UINT, R64G64_UINT, R64G64B64_UINT, R64G64B64A64_UINT],
}

/// A whole 4x4 matrix is described as a single 16-float block attribute.
impl VertexFormat for Matrix4<f32> {
    const FORMAT: vk::Format = vk::Format::ASTC_4X4_SFLOAT_BLOCK;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format_of<T: VertexFormat>() -> vk::Format {
        T::FORMAT
    }

    #[test]
    fn test_float_formats() {
        assert_eq!(format_of::<f32>(), vk::Format::R32_SFLOAT);
        assert_eq!(format_of::<Vector2<f32>>(), vk::Format::R32G32_SFLOAT);
        assert_eq!(format_of::<[f32; 3]>(), vk::Format::R32G32B32_SFLOAT);
        assert_eq!(format_of::<Vector4<f32>>(), vk::Format::R32G32B32A32_SFLOAT);
        assert_eq!(format_of::<Vector3<f64>>(), vk::Format::R64G64B64_SFLOAT);
    }

    #[test]
    fn test_integer_formats() {
        assert_eq!(format_of::<u8>(), vk::Format::R8_UINT);
        assert_eq!(format_of::<[i8; 4]>(), vk::Format::R8G8B8A8_SINT);
        assert_eq!(format_of::<Vector2<i16>>(), vk::Format::R16G16_SINT);
        assert_eq!(format_of::<[u32; 3]>(), vk::Format::R32G32B32_UINT);
        assert_eq!(format_of::<Vector4<u64>>(), vk::Format::R64G64B64A64_UINT);
        assert_eq!(format_of::<i64>(), vk::Format::R64_SINT);
    }

    #[test]
    fn test_matrix_format() {
        assert_eq!(format_of::<Matrix4<f32>>(), vk::Format::ASTC_4X4_SFLOAT_BLOCK);
    }
}
