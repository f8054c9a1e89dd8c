//! Shader module wrapper
//!
//! SPIR-V validation and loading following the device's RAII rules: the
//! module is released when the wrapper is dropped.

use std::io::Cursor;
use std::path::Path;

use ash::vk;

use crate::device::RenderDevice;
use crate::error::{FujiError, FujiResult};

const SPIRV_MAGIC: u32 = 0x0723_0203;

/// One compiled shader bound to one pipeline stage
pub struct ShaderModule<D: RenderDevice> {
    device: D,
    module: vk::ShaderModule,
    stage: vk::ShaderStageFlags,
}

impl<D: RenderDevice> ShaderModule<D> {
    /// Create a shader module from SPIR-V bytecode
    ///
    /// Empty buffers, buffers whose length is not a multiple of four and
    /// buffers without the SPIR-V magic number fail with
    /// [`FujiError::InvalidShaderCode`] before the device is called.
    pub fn new(device: D, code: &[u8], stage: vk::ShaderStageFlags) -> FujiResult<Self> {
        let words = decode_spirv(code)?;

        let module = device.create_shader_module(&words).map_err(|err| match err {
            vk::Result::ERROR_INVALID_SHADER_NV => FujiError::InvalidShaderCode {
                reason: "rejected by the device".to_string(),
            },
            other => FujiError::Api(other),
        })?;
        log::debug!("Created {:?} shader module {:?} ({} words)", stage, module, words.len());

        Ok(Self { device, module, stage })
    }

    /// Load shader from SPIR-V file
    pub fn from_file(device: D, path: impl AsRef<Path>, stage: vk::ShaderStageFlags) -> FujiResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| FujiError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::new(device, &bytes, stage)
    }

    /// Get shader module handle
    pub const fn handle(&self) -> vk::ShaderModule {
        self.module
    }

    /// Pipeline stage this module runs in
    pub const fn stage(&self) -> vk::ShaderStageFlags {
        self.stage
    }
}

impl<D: RenderDevice> Drop for ShaderModule<D> {
    fn drop(&mut self) {
        log::debug!("Destroying shader module {:?}", self.module);
        self.device.destroy_shader_module(self.module);
    }
}

impl<D: RenderDevice> std::fmt::Debug for ShaderModule<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShaderModule")
            .field("module", &self.module)
            .field("stage", &self.stage)
            .finish_non_exhaustive()
    }
}

fn decode_spirv(code: &[u8]) -> FujiResult<Vec<u32>> {
    if code.is_empty() {
        return Err(FujiError::InvalidShaderCode {
            reason: "shader code is empty".to_string(),
        });
    }
    if code.len() % 4 != 0 {
        return Err(FujiError::InvalidShaderCode {
            reason: format!("{} bytes is not a whole number of SPIR-V words", code.len()),
        });
    }

    // read_spv also swaps byte order when the blob was written big-endian
    let words = ash::util::read_spv(&mut Cursor::new(code)).map_err(|e| FujiError::InvalidShaderCode {
        reason: e.to_string(),
    })?;
    if words.first() != Some(&SPIRV_MAGIC) {
        return Err(FujiError::InvalidShaderCode {
            reason: "missing SPIR-V magic number".to_string(),
        });
    }

    Ok(words)
}
