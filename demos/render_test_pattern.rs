//! Render the rainbow and copper-bar test patterns through the filter and save PNGs.
//!
//! `cargo run --release --example render_test_pattern [out-dir]`

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use crt_filter::{FilterSession, Frame, FrameLayout, SessionOpts, Size};

const IN: Size = Size::new(160, 100);
const OUT: Size = Size::new(640, 400);
const SCANLINES: u32 = 100;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let out_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("target").join("demos"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("create output dir '{}'", out_dir.display()))?;

    let layout = FrameLayout::new(IN, OUT, SCANLINES)?;
    let mut session = FilterSession::new(layout, SessionOpts::default())?;

    for (name, frame) in [("rainbow", rainbow(IN)), ("coppers", coppers(IN))] {
        save_png(&out_dir.join(format!("{name}-source.png")), &frame)?;
        let filtered = session.process_frame(&frame)?;
        save_png(&out_dir.join(format!("{name}-crt.png")), filtered)?;
        eprintln!("wrote {name} to {}", out_dir.display());
    }
    Ok(())
}

/// Hue sweeps left to right, brightness falls top to bottom.
fn rainbow(size: Size) -> Frame {
    let mut frame = Frame::new(size);
    let w = size.width as usize;
    for (i, px) in frame.pixels_mut().iter_mut().enumerate() {
        let (x, y) = (i % w, i / w);
        let hue = 360.0 * x as f32 / size.width as f32;
        let value = 1.0 - y as f32 / size.height as f32;
        *px = hsv_to_rgb(hue, 1.0, value);
    }
    frame
}

fn hsv_to_rgb(hue: f32, s: f32, v: f32) -> u32 {
    let h = (hue.rem_euclid(360.0)) / 60.0;
    let sector = h as u32;
    let frac = h - sector as f32;
    let (p, q, t) = (v * (1.0 - s), v * (1.0 - s * frac), v * (1.0 - s * (1.0 - frac)));
    let (r, g, b) = match sector {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    pack(r, g, b)
}

/// Three panels of Gaussian "copper" bars with increasing beam width.
fn coppers(size: Size) -> Frame {
    const BARS: f32 = 4.0;
    let mut frame = Frame::new(size);
    let w = size.width as usize;
    let panel = w.div_ceil(3);
    for (i, px) in frame.pixels_mut().iter_mut().enumerate() {
        let (x, y) = (i % w, i / w);
        let sigma = [0.1f32, 0.3, 0.5][(x / panel).min(2)];
        let line = y as f32 * BARS / size.height as f32;
        let n = line.fract() - 0.5;
        let eq = (-0.5 * n * n / (sigma * sigma)).exp();
        *px = pack(eq * 200.0 / 255.0, eq * 50.0 / 255.0, eq);
    }
    frame
}

fn pack(r: f32, g: f32, b: f32) -> u32 {
    let q = |c: f32| (c * 255.0).round().clamp(0.0, 255.0) as u32;
    (q(r) << 16) | (q(g) << 8) | q(b)
}

fn save_png(path: &Path, frame: &Frame) -> anyhow::Result<()> {
    let size = frame.size();
    let mut rgb = Vec::with_capacity(size.area() * 3);
    for &px in frame.pixels() {
        rgb.extend_from_slice(&[(px >> 16) as u8, (px >> 8) as u8, px as u8]);
    }
    image::save_buffer_with_format(
        path,
        &rgb,
        size.width,
        size.height,
        image::ColorType::Rgb8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}
