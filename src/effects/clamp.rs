//! Gamut-safe quantization of glowing RGB values.
//!
//! Instead of clipping each channel on its own (which shifts hue), out-of-range energy is moved
//! between channels in proportion to Rec. 709 luma weights.

const LUMA: [i64; 3] = [2126, 7152, 722];
const LUMA_SUM: i64 = 2126 + 7152 + 722;

/// Quantize `(r, g, b)` to a packed `0x00RRGGBB` pixel, desaturating rather than clipping.
///
/// Overflow is resolved first, then underflow, using the channel values left by the first pass.
pub fn clamp_with_desaturation(r: i32, g: i32, b: i32) -> u32 {
    let mut rgb = [i64::from(r), i64::from(g), i64::from(b)];
    let luma: i64 = LUMA.iter().zip(&rgb).map(|(w, c)| w * c).sum();
    if luma > 255 * LUMA_SUM {
        return 0x00FF_FFFF;
    }
    if luma <= 0 {
        return 0;
    }

    // Excess above 255 flows into channels with headroom.
    spread(&mut rgb, |c| c - 255, |c| 255 - c, 1);
    // Debt below 0 is borrowed from channels with value to lend.
    spread(&mut rgb, |c| -c, |c| c, -1);

    pack_rgb(rgb[0], rgb[1], rgb[2])
}

fn spread(
    rgb: &mut [i64; 3],
    excess: impl Fn(i64) -> i64,
    capacity: impl Fn(i64) -> i64,
    sign: i64,
) {
    let work: i64 = LUMA.iter().zip(rgb.iter()).map(|(w, &c)| w * excess(c).max(0)).sum();
    if work == 0 {
        return;
    }
    let caps = rgb.map(&capacity);
    let room: i64 = LUMA.iter().zip(&caps).map(|(w, &c)| w * c.max(0)).sum();
    if room == 0 {
        return;
    }

    let act = work.min(room);
    for (c, cap) in rgb.iter_mut().zip(caps) {
        let denom = if cap > 0 { room } else { work };
        *c += cap * sign * act / denom;
    }
}

/// Pack channels into `0x00RRGGBB`, clamping each into `[0, 255]`.
pub fn pack_rgb(r: i64, g: i64, b: i64) -> u32 {
    let q = |c: i64| c.clamp(0, 255) as u32;
    (q(r) << 16) | (q(g) << 8) | q(b)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/clamp.rs"]
mod tests;
