use crate::cache::fingerprint::fingerprint_frame;
use crate::cache::frame_cache::{DEFAULT_CACHE_FRAMES, FrameCache};
use crate::foundation::core::{Frame, FrameLayout};
use crate::foundation::error::{CrtError, CrtResult};
use crate::raster::geometry::RasterGeometry;
use crate::render::pipeline::CrtPipeline;

#[derive(Clone, Debug)]
/// Construction options for a [`FilterSession`].
pub struct SessionOpts {
    /// Raster geometry shared by the mask, the normalization factor and the glow.
    pub geometry: RasterGeometry,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
    /// Frame cache capacity; `0` disables the cache.
    pub cache_frames: usize,
}

impl Default for SessionOpts {
    fn default() -> Self {
        Self {
            geometry: RasterGeometry::default(),
            threads: None,
            cache_frames: DEFAULT_CACHE_FRAMES,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Aggregated per-session counters.
pub struct FilterStats {
    /// Frames handed to [`FilterSession::process_frame`].
    pub frames_total: u64,
    /// Frames that ran the full pipeline.
    pub frames_rendered: u64,
    /// Frames answered from the frame cache.
    pub frames_reused: u64,
}

/// One input stream's worth of filter state: pipeline, cache and output buffer.
#[derive(Debug)]
pub struct FilterSession {
    pipeline: CrtPipeline,
    cache: Option<FrameCache>,
    output: Frame,
    stats: FilterStats,
}

impl FilterSession {
    pub fn new(layout: FrameLayout, opts: SessionOpts) -> CrtResult<Self> {
        let pipeline = CrtPipeline::new(layout, opts.geometry, opts.threads)?;
        let cache = match opts.cache_frames {
            0 => None,
            n => Some(FrameCache::new(n)?),
        };
        if let Some(cache) = &cache {
            tracing::debug!(capacity = cache.capacity(), "frame cache enabled");
        }
        Ok(Self {
            pipeline,
            cache,
            output: Frame::new(layout.output),
            stats: FilterStats::default(),
        })
    }

    pub fn layout(&self) -> FrameLayout {
        self.pipeline.layout()
    }

    pub fn stats(&self) -> FilterStats {
        self.stats
    }

    /// Filter one frame. Byte-identical repeats of a recently seen frame are answered from the
    /// cache without running the pipeline.
    #[tracing::instrument(level = "trace", skip_all, fields(frame = self.stats.frames_total))]
    pub fn process_frame(&mut self, input: &Frame) -> CrtResult<&Frame> {
        let expected = self.pipeline.layout().input;
        if input.size() != expected {
            return Err(CrtError::validation(format!(
                "input frame is {}, expected {expected}",
                input.size()
            )));
        }
        self.stats.frames_total += 1;

        let Some(cache) = self.cache.as_mut() else {
            self.pipeline.process(input, &mut self.output)?;
            self.stats.frames_rendered += 1;
            return Ok(&self.output);
        };

        let fingerprint = fingerprint_frame(input);
        if let Some(slot) = cache.find(fingerprint, input) {
            tracing::debug!(fingerprint = fingerprint.0, slot, "frame cache hit");
            self.stats.frames_reused += 1;
            return cache
                .output(slot)
                .ok_or_else(|| CrtError::pipeline("frame cache slot vanished"));
        }

        self.pipeline.process(input, &mut self.output)?;
        cache.insert(fingerprint, input, &self.output);
        tracing::debug!(
            fingerprint = fingerprint.0,
            cached = cache.len(),
            "frame cache miss"
        );
        self.stats.frames_rendered += 1;
        Ok(&self.output)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/filter_session.rs"]
mod tests;
