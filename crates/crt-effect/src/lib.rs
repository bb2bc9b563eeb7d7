//! CRT post-processing for CPU-rendered arcade frames.
//!
//! The crate takes whatever bitmap the game loop produced for the current
//! tick and composites it to the visible surface through a fragment shader
//! that simulates a curved CRT tube: bezel corner mask, barrel distortion,
//! chromatic aberration, phosphor blur, drifting scanlines, vignette, grain,
//! and bloom. The overall flow is:
//!
//! ```text
//!   game loop (one fresh FrameImage per tick)
//!          │ render(frame)
//!          ▼
//!   CrtEffect ──▶ FrameTexture upload ──▶ fullscreen quad draw ──▶ surface
//!                        ▲
//!                        └─ EffectUniforms (resolution, time, scale)
//! ```
//!
//! `CrtEffect` owns every GPU resource (surface, device, pipeline, quad,
//! texture, uniforms); nothing is shared across instances and nothing is
//! global, so multiple independent effects can coexist on separate surfaces.
//! All failures are construction-time and fatal ([`EffectError`]); the
//! per-frame path never raises beyond recoverable [`SurfaceError`]s.

mod effect;
mod error;
mod gpu;
pub mod math;
mod shader;
mod types;

pub use effect::CrtEffect;
pub use error::EffectError;
pub use math::CrtTuning;
pub use types::FrameImage;

// Re-exported so callers can match on recoverable per-frame errors without
// depending on wgpu directly.
pub use wgpu::SurfaceError;
