/// Serde-loadable mask and beam parameters.
pub mod geometry;
pub mod mask;
