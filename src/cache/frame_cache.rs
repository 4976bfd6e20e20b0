use crate::cache::fingerprint::FrameFingerprint;
use crate::foundation::core::Frame;
use crate::foundation::error::{CrtError, CrtResult};

/// Number of recent frames remembered when the caller does not choose.
pub const DEFAULT_CACHE_FRAMES: usize = 4;

#[derive(Debug)]
struct CacheEntry {
    fingerprint: FrameFingerprint,
    input: Frame,
    output: Frame,
}

/// Fixed-capacity ring of recently processed frames and their outputs.
///
/// A lookup only hits when both the fingerprint and the full input bytes match, so a hash
/// collision can never surface a stale output. Inserting into a full ring overwrites the
/// oldest entry and reuses its buffers.
#[derive(Debug)]
pub struct FrameCache {
    slots: Vec<Option<CacheEntry>>,
    cursor: usize,
}

impl FrameCache {
    pub fn new(capacity: usize) -> CrtResult<Self> {
        if capacity == 0 {
            return Err(CrtError::validation("frame cache capacity must be positive"));
        }
        Ok(Self {
            slots: std::iter::repeat_with(|| None).take(capacity).collect(),
            cursor: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Occupied slots.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Slot index of a stored frame identical to `input`.
    pub fn find(&self, fingerprint: FrameFingerprint, input: &Frame) -> Option<usize> {
        self.slots.iter().position(|slot| {
            slot.as_ref()
                .is_some_and(|e| e.fingerprint == fingerprint && e.input == *input)
        })
    }

    pub fn output(&self, slot: usize) -> Option<&Frame> {
        self.slots.get(slot)?.as_ref().map(|e| &e.output)
    }

    pub fn insert(&mut self, fingerprint: FrameFingerprint, input: &Frame, output: &Frame) {
        let slot = &mut self.slots[self.cursor];
        match slot {
            Some(entry) => {
                entry.fingerprint = fingerprint;
                entry.input.copy_from(input);
                entry.output.copy_from(output);
            }
            None => {
                *slot = Some(CacheEntry {
                    fingerprint,
                    input: input.clone(),
                    output: output.clone(),
                });
            }
        }
        self.cursor = (self.cursor + 1) % self.slots.len();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cache/frame_cache.rs"]
mod tests;
