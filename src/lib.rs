//! Streaming CRT simulation filter.
//!
//! Raw frames of packed `0x00RRGGBB` pixels go in, CRT-looking frames at another resolution come
//! out. Each frame is linearized, resampled to a virtual scanline count, expanded through an RGB
//! subpixel mask with a Gaussian beam profile, Lanczos-resampled to the output size, then
//! normalized, glowed and clamped with hue-preserving desaturation.
//!
//! - Build a [`FilterSession`] from a [`FrameLayout`] and [`SessionOpts`]
//! - Feed it [`Frame`]s directly, or pump a byte stream through [`run_stream`]
#![forbid(unsafe_code)]

mod foundation;

/// Recently-seen frame memoization.
pub mod cache;
/// Post-processing kernels: glow blur and gamut-safe clamping.
pub mod effects;
/// Subpixel mask and scanline beam model.
pub mod raster;
/// Per-frame pipeline orchestration.
pub mod render;
/// Separable band-limited resampling.
pub mod resample;
/// Session-oriented filtering API.
pub mod session;
/// Raw frame stream plumbing.
pub mod stream;

pub use crate::foundation::core::{CHANNELS, Frame, FrameLayout, Plane, Size};
pub use crate::foundation::error::{CrtError, CrtResult};
pub use crate::foundation::math::{gamma_decode_lut, lanczos};

pub use crate::raster::geometry::{CellSpan, RasterGeometry};
pub use crate::render::pipeline::CrtPipeline;
pub use crate::session::filter_session::{FilterSession, FilterStats, SessionOpts};
pub use crate::stream::io::{
    FrameReader, FrameWriter, StreamEnd, StreamSummary, WriteOutcome, run_stream,
};
