use xxhash_rust::xxh32::{Xxh32, xxh32};

use crate::foundation::core::Frame;

const XXH32_SEED: u32 = 0x9e37_79b9;

/// Pixels hashed per update when fingerprinting a frame.
const CHUNK_PIXELS: usize = 1024;

/// Content digest of a raw frame, used only to pre-filter cache lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameFingerprint(pub u32);

pub fn fingerprint_bytes(bytes: &[u8]) -> FrameFingerprint {
    FrameFingerprint(xxh32(bytes, XXH32_SEED))
}

/// Fingerprint of a frame's native-endian byte image; equal to [`fingerprint_bytes`] over the
/// same bytes.
pub fn fingerprint_frame(frame: &Frame) -> FrameFingerprint {
    let mut h = Xxh32::new(XXH32_SEED);
    let mut buf = [0u8; CHUNK_PIXELS * 4];
    for chunk in frame.pixels().chunks(CHUNK_PIXELS) {
        for (dst, px) in buf.chunks_exact_mut(4).zip(chunk) {
            dst.copy_from_slice(&px.to_ne_bytes());
        }
        h.update(&buf[..chunk.len() * 4]);
    }
    FrameFingerprint(h.digest())
}

#[cfg(test)]
#[path = "../../tests/unit/cache/fingerprint.rs"]
mod tests;
