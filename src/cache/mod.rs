pub mod fingerprint;
pub mod frame_cache;
