//! Frame loop over a real `ash` device
//!
//! RAII wrappers for the objects a presenting application needs besides its
//! pipelines, plus [`FrameLoop`], which sequences one frame in flight.

mod commands;
mod frame;
mod render_pass;
mod sync;

pub use commands::{ActiveRenderPass, CommandPool, CommandRecorder};
pub use frame::{FrameLoop, FrameQueues};
pub use render_pass::{Framebuffer, RenderPass, RenderTarget};
pub use sync::{Fence, FrameSync, Semaphore};
