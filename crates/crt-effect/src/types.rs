use anyhow::Result;

/// CPU-side RGBA8 bitmap handed to the effect once per tick.
///
/// Row 0 is the top of the image; pixels are tightly packed with no row
/// padding. The upstream producer owns drawing into it, the effect only
/// reads it during [`crate::CrtEffect::render`].
#[derive(Clone)]
pub struct FrameImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

pub const BYTES_PER_PIXEL: u32 = 4;

impl FrameImage {
    /// Creates an opaque black frame of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let mut frame = Self {
            width,
            height,
            pixels: vec![0; (width * height * BYTES_PER_PIXEL) as usize],
        };
        frame.fill([0, 0, 0, 255]);
        frame
    }

    /// Wraps an existing RGBA byte buffer, validating its length.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            anyhow::bail!("frame dimensions must be non-zero, got {width}x{height}");
        }
        let expected = (width * height * BYTES_PER_PIXEL) as usize;
        if pixels.len() != expected {
            anyhow::bail!(
                "frame byte length {} does not match {width}x{height} RGBA ({expected})",
                pixels.len()
            );
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Sets every pixel to `rgba`.
    pub fn fill(&mut self, rgba: [u8; 4]) {
        for pixel in self.pixels.chunks_exact_mut(BYTES_PER_PIXEL as usize) {
            pixel.copy_from_slice(&rgba);
        }
    }

    /// Writes a single pixel; out-of-bounds coordinates are ignored.
    pub fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let offset = ((y * self.width + x) * BYTES_PER_PIXEL) as usize;
        self.pixels[offset..offset + 4].copy_from_slice(&rgba);
    }

    /// Fills the axis-aligned rectangle `[x0, x1) x [y0, y1)`, clamped to
    /// the frame bounds.
    pub fn fill_rect(&mut self, x0: u32, y0: u32, x1: u32, y1: u32, rgba: [u8; 4]) {
        let x1 = x1.min(self.width);
        let y1 = y1.min(self.height);
        for y in y0.min(y1)..y1 {
            for x in x0.min(x1)..x1 {
                let offset = ((y * self.width + x) * BYTES_PER_PIXEL) as usize;
                self.pixels[offset..offset + 4].copy_from_slice(&rgba);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_frame_is_opaque_black() {
        let frame = FrameImage::new(4, 2);
        assert_eq!(frame.pixels().len(), 4 * 2 * 4);
        for pixel in frame.pixels().chunks_exact(4) {
            assert_eq!(pixel, [0, 0, 0, 255]);
        }
    }

    #[test]
    fn from_rgba_rejects_mismatched_length() {
        assert!(FrameImage::from_rgba(2, 2, vec![0; 15]).is_err());
        assert!(FrameImage::from_rgba(0, 2, vec![]).is_err());
        assert!(FrameImage::from_rgba(2, 2, vec![0; 16]).is_ok());
    }

    #[test]
    fn put_pixel_ignores_out_of_bounds() {
        let mut frame = FrameImage::new(2, 2);
        frame.put_pixel(5, 5, [255, 0, 0, 255]);
        frame.put_pixel(1, 1, [255, 0, 0, 255]);
        let offset = ((1 * 2 + 1) * 4) as usize;
        assert_eq!(&frame.pixels()[offset..offset + 4], [255, 0, 0, 255]);
    }

    #[test]
    fn fill_rect_clamps_to_bounds() {
        let mut frame = FrameImage::new(3, 3);
        frame.fill_rect(1, 1, 10, 10, [0, 255, 0, 255]);
        assert_eq!(&frame.pixels()[0..4], [0, 0, 0, 255]);
        let offset = ((2 * 3 + 2) * 4) as usize;
        assert_eq!(&frame.pixels()[offset..offset + 4], [0, 255, 0, 255]);
    }
}
