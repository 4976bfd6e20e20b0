pub mod clamp;
pub mod glow;
