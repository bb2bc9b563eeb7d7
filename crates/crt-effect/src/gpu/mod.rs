//! GPU resource ownership for the effect.
//!
//! - `context` wires up instance/surface/device with the fixed capability
//!   set (no depth, no MSAA, vsync-paced presentation) and rebuilds the
//!   swapchain on resize.
//! - `quad` holds the write-once full-screen quad buffers.
//! - `frame` owns the single reusable texture the source bitmap is copied
//!   into every tick.
//! - `uniforms` is the per-frame uniform block written through the queue.

mod context;
mod frame;
mod quad;
mod uniforms;

pub(crate) use context::GpuContext;
pub(crate) use frame::FrameTexture;
pub(crate) use quad::QuadGeometry;
pub(crate) use uniforms::EffectUniforms;
