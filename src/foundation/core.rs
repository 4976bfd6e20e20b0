use crate::foundation::error::{CrtError, CrtResult};

/// Number of color channels carried by frames and planes.
pub const CHANNELS: usize = 3;

/// Width and height of a frame or plane, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn area(self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    /// Pixel count, or `None` when it does not fit in `usize`.
    pub fn checked_area(self) -> Option<usize> {
        (self.width as usize).checked_mul(self.height as usize)
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// The five startup parameters of a filter run.
///
/// Fixed for the lifetime of a pipeline: every buffer is sized from it once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameLayout {
    pub input: Size,
    pub output: Size,
    /// Number of virtual scanlines the input is resampled to before masking.
    pub scanlines: u32,
}

impl FrameLayout {
    pub fn new(input: Size, output: Size, scanlines: u32) -> CrtResult<Self> {
        if input.is_empty() {
            return Err(CrtError::validation(format!(
                "input size must be positive, got {input}"
            )));
        }
        if output.is_empty() {
            return Err(CrtError::validation(format!(
                "output size must be positive, got {output}"
            )));
        }
        if scanlines == 0 {
            return Err(CrtError::validation("scanline count must be positive"));
        }
        for (what, size) in [("input", input), ("output", output)] {
            if size.checked_area().and_then(|n| n.checked_mul(4)).is_none() {
                return Err(CrtError::validation(format!(
                    "{what} size {size} is too large to address"
                )));
            }
        }
        Ok(Self {
            input,
            output,
            scanlines,
        })
    }

    pub fn input_frame_bytes(&self) -> usize {
        self.input.area().saturating_mul(4)
    }

    pub fn output_frame_bytes(&self) -> usize {
        self.output.area().saturating_mul(4)
    }
}

/// Row-major buffer of packed `0x00RRGGBB` pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    size: Size,
    pixels: Vec<u32>,
}

impl Frame {
    /// Allocate an all-black frame.
    pub fn new(size: Size) -> Self {
        Self::filled(size, 0)
    }

    pub fn filled(size: Size, pixel: u32) -> Self {
        Self {
            size,
            pixels: vec![pixel; size.area()],
        }
    }

    pub fn from_pixels(size: Size, pixels: Vec<u32>) -> CrtResult<Self> {
        if pixels.len() != size.area() {
            return Err(CrtError::validation(format!(
                "frame {size} expects {} pixels, got {}",
                size.area(),
                pixels.len()
            )));
        }
        Ok(Self { size, pixels })
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        self.pixels[y as usize * self.size.width as usize + x as usize]
    }

    pub fn byte_len(&self) -> usize {
        self.pixels.len() * 4
    }

    /// Become a copy of `other`, reusing this frame's allocation when it is large enough.
    pub fn copy_from(&mut self, other: &Frame) {
        self.size = other.size;
        self.pixels.clone_from(&other.pixels);
    }

    /// Overwrite the pixels from native-endian raw bytes.
    pub fn load_ne_bytes(&mut self, bytes: &[u8]) -> CrtResult<()> {
        if bytes.len() != self.byte_len() {
            return Err(CrtError::validation(format!(
                "frame {} expects {} bytes, got {}",
                self.size,
                self.byte_len(),
                bytes.len()
            )));
        }
        for (px, raw) in self.pixels.iter_mut().zip(bytes.chunks_exact(4)) {
            *px = u32::from_ne_bytes([raw[0], raw[1], raw[2], raw[3]]);
        }
        Ok(())
    }

    /// Serialize the pixels as native-endian raw bytes into `out`, replacing its contents.
    pub fn store_ne_bytes(&self, out: &mut Vec<u8>) {
        out.clear();
        out.reserve(self.byte_len());
        for px in &self.pixels {
            out.extend_from_slice(&px.to_ne_bytes());
        }
    }
}

/// Planar single-precision buffer: one `width * height` slab per color channel.
#[derive(Clone, Debug, PartialEq)]
pub struct Plane {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl Plane {
    /// Zeroed plane. Fails instead of aborting when the sample count overflows or the
    /// allocation is refused.
    pub fn new(width: usize, height: usize) -> CrtResult<Self> {
        let len = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(CHANNELS))
            .ok_or_else(|| CrtError::validation(format!("plane {width}x{height} is too large")))?;
        Ok(Self {
            width,
            height,
            data: zeroed(len)?,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channel_len(&self) -> usize {
        self.width * self.height
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn channel(&self, c: usize) -> &[f32] {
        let n = self.channel_len();
        &self.data[c * n..(c + 1) * n]
    }

    pub fn channel_mut(&mut self, c: usize) -> &mut [f32] {
        let n = self.channel_len();
        &mut self.data[c * n..(c + 1) * n]
    }

    /// Split into the three disjoint channel slabs.
    pub fn channels_mut(&mut self) -> [&mut [f32]; CHANNELS] {
        let n = self.channel_len();
        let (r, rest) = self.data.split_at_mut(n);
        let (g, b) = rest.split_at_mut(n);
        [r, g, b]
    }
}

/// Zero-filled buffer of `len` elements, reporting allocation failure as an error.
pub(crate) fn zeroed<T: Copy + Default>(len: usize) -> CrtResult<Vec<T>> {
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|e| CrtError::validation(format!("buffer of {len} samples: {e}")))?;
    data.resize(len, T::default());
    Ok(data)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
