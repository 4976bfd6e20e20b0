use rayon::prelude::*;

use crate::foundation::core::{Frame, FrameLayout, Plane};
use crate::foundation::error::{CrtError, CrtResult};
use crate::foundation::math::gamma_decode_lut;
use crate::raster::geometry::RasterGeometry;
use crate::raster::mask::{RasterMask, ScanlineProfile, normalization_factor};
use crate::render::post::PostProcessor;
use crate::resample::lanczos::{FilterBank, Strides, resample};

/// Two-stage CRT raster filter for one fixed frame layout.
///
/// Frames go through: linearize -> vertical resample to the virtual scanline count -> per-row
/// beam blend, mask and horizontal resample on the virtual raster -> vertical resample to the
/// output height -> post-processing. All intermediate planes are allocated once here.
pub struct CrtPipeline {
    layout: FrameLayout,
    geometry: RasterGeometry,
    mask: RasterMask,
    beam: ScanlineProfile,
    virtual_width: usize,
    normalization: f32,
    decode: [f32; 256],
    /// Input-resolution planes, only needed when the scanline count differs from input height.
    source: Option<Plane>,
    scanlines: Plane,
    raster: Plane,
    linear: Plane,
    post: PostProcessor,
    pool: rayon::ThreadPool,
}

impl std::fmt::Debug for CrtPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrtPipeline")
            .field("layout", &self.layout)
            .field("geometry", &self.geometry)
            .field("normalization", &self.normalization)
            .field("threads", &self.pool.current_num_threads())
            .finish_non_exhaustive()
    }
}

impl CrtPipeline {
    pub fn new(
        layout: FrameLayout,
        geometry: RasterGeometry,
        threads: Option<usize>,
    ) -> CrtResult<Self> {
        geometry.validate()?;

        let in_w = layout.input.width as usize;
        let in_h = layout.input.height as usize;
        let out_w = layout.output.width as usize;
        let out_h = layout.output.height as usize;
        let virtual_h = geometry.virtual_height(layout.scanlines);
        let normalization = normalization_factor(&geometry);

        // Largest plane first.
        let raster = Plane::new(out_w, virtual_h)?;
        let source = (layout.input.height != layout.scanlines)
            .then(|| Plane::new(in_w, in_h))
            .transpose()?;
        let scanlines = Plane::new(in_w, layout.scanlines as usize)?;
        let linear = Plane::new(out_w, out_h)?;
        let post = PostProcessor::new(&geometry, layout.output, normalization)?;

        tracing::info!(
            input = %layout.input,
            output = %layout.output,
            scanlines = layout.scanlines,
            virtual_width = geometry.virtual_width(),
            virtual_height = virtual_h,
            normalization,
            glow_taps = post.glow_taps(),
            "crt pipeline ready"
        );

        Ok(Self {
            layout,
            mask: RasterMask::new(&geometry),
            beam: ScanlineProfile::new(geometry.scanline_sigma),
            virtual_width: geometry.virtual_width(),
            normalization,
            decode: gamma_decode_lut(geometry.gamma),
            source,
            scanlines,
            raster,
            linear,
            post,
            pool: build_thread_pool(threads)?,
            geometry,
        })
    }

    pub fn layout(&self) -> FrameLayout {
        self.layout
    }

    pub fn geometry(&self) -> &RasterGeometry {
        &self.geometry
    }

    pub fn normalization(&self) -> f32 {
        self.normalization
    }

    /// Filter `input` into `output`. Both frames must match the pipeline layout.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn process(&mut self, input: &Frame, output: &mut Frame) -> CrtResult<()> {
        if input.size() != self.layout.input {
            return Err(CrtError::validation(format!(
                "input frame is {}, pipeline expects {}",
                input.size(),
                self.layout.input
            )));
        }
        if output.size() != self.layout.output {
            return Err(CrtError::validation(format!(
                "output frame is {}, pipeline expects {}",
                output.size(),
                self.layout.output
            )));
        }

        let Self {
            mask,
            beam,
            virtual_width,
            decode,
            source,
            scanlines,
            raster,
            linear,
            post,
            pool,
            ..
        } = self;

        pool.install(|| {
            linearize(decode, input, source.as_mut(), scanlines);
            expand_rows(mask, beam, *virtual_width, scanlines, raster);
            resample_to_output(raster, linear);
            post.run(linear, output);
        });
        Ok(())
    }
}

/// Stage 1: unpack channels through the gamma table, then fit the scanline count.
fn linearize(
    decode: &[f32; 256],
    input: &Frame,
    source: Option<&mut Plane>,
    scanlines: &mut Plane,
) {
    let Some(source) = source else {
        decode_planes(decode, input.pixels(), scanlines);
        return;
    };

    decode_planes(decode, input.pixels(), source);
    let (width, in_h, n_lines) = (source.width(), source.height(), scanlines.height());
    let source = &*source;
    scanlines
        .channels_mut()
        .into_par_iter()
        .enumerate()
        .for_each(|(c, dst)| {
            resample(in_h, n_lines, Strides::vertical(width), source.channel(c), dst);
        });
}

fn decode_planes(decode: &[f32; 256], pixels: &[u32], plane: &mut Plane) {
    for (c, dst) in plane.channels_mut().into_iter().enumerate() {
        let shift = 16 - 8 * c as u32;
        dst.par_iter_mut()
            .zip(pixels.par_iter())
            .for_each(|(d, &p)| *d = decode[((p >> shift) & 0xFF) as usize]);
    }
}

/// Per-worker buffers for one virtual raster row.
struct RowScratch {
    beam_row: Vec<f32>,
    expanded: Vec<f32>,
}

/// Stage 2: every virtual raster row blends its scanline beams, is replicated across the
/// virtual horizontal raster, masked, and filtered down to the output width.
fn expand_rows(
    mask: &RasterMask,
    beam: &ScanlineProfile,
    virtual_w: usize,
    scanlines: &Plane,
    raster: &mut Plane,
) {
    let in_w = scanlines.width();
    let n_lines = scanlines.height();
    let out_w = raster.width();
    let virtual_h = raster.height();

    let bank = FilterBank::lanczos(virtual_w, out_w);
    let ratio = n_lines as f32 / virtual_h as f32;
    let last_line = n_lines as isize - 1;

    let [r, g, b] = raster.channels_mut();
    r.par_chunks_mut(out_w)
        .zip(g.par_chunks_mut(out_w))
        .zip(b.par_chunks_mut(out_w))
        .enumerate()
        .for_each_init(
            || RowScratch {
                beam_row: vec![0.0; in_w],
                expanded: vec![0.0; virtual_w],
            },
            |scratch, (y, ((r_out, g_out), b_out))| {
                let src_y_f = y as f32 * ratio;
                let src_y = (src_y_f as usize).min(n_lines - 1);
                let taps = beam.taps(src_y_f - src_y as f32);
                let near = (src_y as isize + taps.neighbor_offset).clamp(0, last_line) as usize;

                for (c, out) in [r_out, g_out, b_out].into_iter().enumerate() {
                    let plane = scanlines.channel(c);
                    let own = &plane[src_y * in_w..(src_y + 1) * in_w];
                    let other = &plane[near * in_w..(near + 1) * in_w];
                    for ((dst, &o), &n) in scratch.beam_row.iter_mut().zip(own).zip(other) {
                        *dst = o * taps.own + n * taps.neighbor;
                    }

                    for (x, dst) in scratch.expanded.iter_mut().enumerate() {
                        let v = scratch.beam_row[x * in_w / virtual_w];
                        *dst = v * mask.weight(c, x as u32, y as u32);
                    }

                    bank.apply(Strides::single(), &scratch.expanded, out);
                }
            },
        );
}

/// Stage 3: vertical resample of the virtual raster down to the output height, per channel.
fn resample_to_output(raster: &Plane, linear: &mut Plane) {
    let width = raster.width();
    let bank = FilterBank::lanczos(raster.height(), linear.height());
    linear
        .channels_mut()
        .into_par_iter()
        .enumerate()
        .for_each(|(c, dst)| bank.par_apply(Strides::vertical(width), raster.channel(c), dst));
}

fn build_thread_pool(threads: Option<usize>) -> CrtResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(CrtError::validation("'threads' must be >= 1 when set"));
    }

    let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("crt-filter-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| CrtError::pipeline(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
