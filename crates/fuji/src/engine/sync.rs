//! Semaphores and fences for frame sequencing

use ash::prelude::VkResult;
use ash::{vk, Device};

use crate::error::{FujiError, FujiResult};

/// Binary semaphore with RAII cleanup
pub struct Semaphore {
    device: Device,
    semaphore: vk::Semaphore,
}

impl Semaphore {
    /// Create an unsignalled semaphore
    pub fn new(device: Device) -> FujiResult<Self> {
        let create_info = vk::SemaphoreCreateInfo::builder();
        let semaphore = unsafe { device.create_semaphore(&create_info, None)? };

        Ok(Self { device, semaphore })
    }

    /// Get semaphore handle
    pub const fn handle(&self) -> vk::Semaphore {
        self.semaphore
    }
}

impl Drop for Semaphore {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_semaphore(self.semaphore, None);
        }
    }
}

/// Fence with RAII cleanup
pub struct Fence {
    device: Device,
    fence: vk::Fence,
}

impl Fence {
    /// Create a fence, optionally already signalled
    pub fn new(device: Device, signaled: bool) -> FujiResult<Self> {
        let flags = if signaled {
            vk::FenceCreateFlags::SIGNALED
        } else {
            vk::FenceCreateFlags::empty()
        };
        let create_info = vk::FenceCreateInfo::builder().flags(flags);
        let fence = unsafe { device.create_fence(&create_info, None)? };

        Ok(Self { device, fence })
    }

    /// Block until the fence is signalled or `timeout_ns` elapses
    ///
    /// An elapsed timeout is reported as [`FujiError::FrameTimeout`].
    pub fn wait(&self, timeout_ns: u64) -> FujiResult<()> {
        let result = unsafe { self.device.wait_for_fences(&[self.fence], true, timeout_ns) };
        fence_wait_result(self.fence, result, timeout_ns)
    }

    /// Return the fence to the unsignalled state
    pub fn reset(&self) -> FujiResult<()> {
        unsafe { self.device.reset_fences(&[self.fence])? };
        Ok(())
    }

    /// Get fence handle
    pub const fn handle(&self) -> vk::Fence {
        self.fence
    }
}

impl Drop for Fence {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_fence(self.fence, None);
        }
    }
}

/// Synchronization objects of the single frame in flight
pub struct FrameSync {
    /// Signalled when the acquired swapchain image is ready
    pub image_available: Semaphore,
    /// Signalled when rendering to the image has finished
    pub render_finished: Semaphore,
    /// Signalled when the frame's command buffer has completed
    pub in_flight: Fence,
}

impl FrameSync {
    /// Create the objects; the fence starts signalled so the first wait returns
    pub fn new(device: &Device) -> FujiResult<Self> {
        Ok(Self {
            image_available: Semaphore::new(device.clone())?,
            render_finished: Semaphore::new(device.clone())?,
            in_flight: Fence::new(device.clone(), true)?,
        })
    }
}

fn fence_wait_result(fence: vk::Fence, result: VkResult<()>, timeout_ns: u64) -> FujiResult<()> {
    match result {
        Ok(()) => Ok(()),
        Err(vk::Result::TIMEOUT) => {
            log::warn!("Fence {:?} not signalled within {} ns", fence, timeout_ns);
            Err(FujiError::FrameTimeout { timeout_ns })
        }
        Err(err) => Err(FujiError::Api(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ash::vk::Handle;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_signalled_fence_waits_cleanly() {
        init_logging();
        assert!(fence_wait_result(vk::Fence::from_raw(1), Ok(()), 1_000).is_ok());
    }

    #[test]
    fn test_timeout_maps_to_frame_timeout() {
        init_logging();
        let err = fence_wait_result(vk::Fence::from_raw(1), Err(vk::Result::TIMEOUT), 5_000_000).unwrap_err();
        assert!(matches!(err, FujiError::FrameTimeout { timeout_ns: 5_000_000 }));
    }

    #[test]
    fn test_device_loss_stays_an_api_error() {
        init_logging();
        let err = fence_wait_result(vk::Fence::from_raw(1), Err(vk::Result::ERROR_DEVICE_LOST), 1_000).unwrap_err();
        assert!(matches!(err, FujiError::Api(vk::Result::ERROR_DEVICE_LOST)));
    }
}
