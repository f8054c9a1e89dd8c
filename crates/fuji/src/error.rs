//! Error types shared by every module of the crate

use std::path::PathBuf;

use ash::vk;

use crate::config::ConfigError;

/// Errors produced by fuji operations
#[derive(thiserror::Error, Debug)]
pub enum FujiError {
    /// Device call failed with the given result code
    #[error("Vulkan API error: {0:?}")]
    Api(vk::Result),

    /// Shader bytecode was empty, badly sized or rejected by the device
    #[error("Invalid shader code: {reason}")]
    InvalidShaderCode {
        /// Why the code was rejected
        reason: String,
    },

    /// Batched graphics pipeline creation did not report success
    #[error("Failed to create graphics pipelines: {0:?}")]
    PipelineCreationFailed(vk::Result),

    /// The in-flight fence was not signalled in time
    #[error("Timed out after {timeout_ns} ns waiting for the in-flight frame")]
    FrameTimeout {
        /// Timeout that elapsed, in nanoseconds
        timeout_ns: u64,
    },

    /// Invalid operation attempted
    #[error("Invalid operation: {reason}")]
    InvalidOperation {
        /// Description of why the operation is invalid
        reason: String,
    },

    /// Reading a file from disk failed
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<vk::Result> for FujiError {
    fn from(result: vk::Result) -> Self {
        Self::Api(result)
    }
}

/// Result type for fuji operations
pub type FujiResult<T> = Result<T, FujiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_from_result() {
        let error: FujiError = vk::Result::ERROR_DEVICE_LOST.into();
        assert!(matches!(error, FujiError::Api(vk::Result::ERROR_DEVICE_LOST)));
    }

    #[test]
    fn test_display_messages() {
        let error = FujiError::InvalidShaderCode { reason: "shader code is empty".to_string() };
        assert_eq!(error.to_string(), "Invalid shader code: shader code is empty");

        let error = FujiError::FrameTimeout { timeout_ns: 10 };
        assert_eq!(error.to_string(), "Timed out after 10 ns waiting for the in-flight frame");
    }
}
