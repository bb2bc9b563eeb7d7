use std::path::Path;

use anyhow::{Context, Result};
use crt_effect::FrameImage;

/// Stand-in for the game-state renderer: produces one fresh bitmap per
/// tick, which is the whole contract the effect expects from upstream.
pub trait FrameSource {
    fn next_frame(&mut self, elapsed: f32) -> &FrameImage;
    fn resize(&mut self, width: u32, height: u32);
}

const SKY_TOP: [u8; 4] = [94, 197, 229, 255];
const SKY_BOTTOM: [u8; 4] = [188, 230, 242, 255];
const COLUMN: [u8; 4] = [96, 186, 74, 255];
const COLUMN_LIP: [u8; 4] = [70, 150, 54, 255];
const GROUND: [u8; 4] = [222, 206, 134, 255];
const SPRITE: [u8; 4] = [240, 196, 60, 255];

/// Procedural side-scroller test card: gradient sky, scrolling obstacle
/// columns with a gap, a bobbing sprite block, and a ground strip.
pub struct TestScene {
    frame: FrameImage,
}

impl TestScene {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            frame: FrameImage::new(width, height),
        }
    }
}

impl FrameSource for TestScene {
    fn next_frame(&mut self, elapsed: f32) -> &FrameImage {
        let width = self.frame.width();
        let height = self.frame.height();
        let ground_top = height - height / 8;

        // Sky gradient, top to bottom.
        for y in 0..ground_top {
            let t = y as f32 / ground_top.max(1) as f32;
            let color = lerp_color(SKY_TOP, SKY_BOTTOM, t);
            self.frame.fill_rect(0, y, width, y + 1, color);
        }
        self.frame.fill_rect(0, ground_top, width, height, GROUND);

        // Scrolling obstacle columns with a vertical gap.
        let spacing = (width / 3).max(1);
        let column_width = width / 12;
        let scroll = (elapsed * width as f32 * 0.25) as u32;
        let gap_half = height / 8;
        for slot in 0..4 {
            let x = (slot * spacing + spacing).saturating_sub(scroll % (spacing * 4));
            if x >= width {
                continue;
            }
            let gap_center =
                height / 3 + (slot * 977 % gap_half.max(1)) + ((slot * 53) % (height / 6 + 1));
            let gap_top = gap_center.saturating_sub(gap_half);
            let gap_bottom = (gap_center + gap_half).min(ground_top);
            self.frame.fill_rect(x, 0, x + column_width, gap_top, COLUMN);
            self.frame
                .fill_rect(x, gap_bottom, x + column_width, ground_top, COLUMN);
            // Lip accents at the gap mouth.
            self.frame
                .fill_rect(x, gap_top.saturating_sub(8), x + column_width, gap_top, COLUMN_LIP);
            self.frame
                .fill_rect(x, gap_bottom, x + column_width, (gap_bottom + 8).min(ground_top), COLUMN_LIP);
        }

        // Bobbing sprite block a third of the way in.
        let sprite_size = (height / 16).max(4);
        let bob = ((elapsed * 2.0).sin() * height as f32 * 0.1) as i32;
        // The sprite may be taller than a tiny frame; keep the clamp range valid.
        let max_y = (ground_top as i32 - sprite_size as i32).max(0);
        let sprite_y = ((height / 2) as i32 + bob).clamp(0, max_y) as u32;
        let sprite_x = width / 3;
        self.frame.fill_rect(
            sprite_x,
            sprite_y,
            sprite_x + sprite_size,
            sprite_y + sprite_size,
            SPRITE,
        );

        &self.frame
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width != self.frame.width() || height != self.frame.height() {
            self.frame = FrameImage::new(width, height);
        }
    }
}

/// A still image fed through the filter unchanged each tick.
pub struct StillImage {
    frame: FrameImage,
}

impl StillImage {
    pub fn load(path: &Path) -> Result<Self> {
        let decoded = image::ImageReader::open(path)
            .with_context(|| format!("failed to open image at {}", path.display()))?
            .decode()
            .with_context(|| format!("failed to decode image at {}", path.display()))?
            .to_rgba8();
        let (width, height) = decoded.dimensions();
        let frame = FrameImage::from_rgba(width, height, decoded.into_raw())?;
        Ok(Self { frame })
    }
}

impl FrameSource for StillImage {
    fn next_frame(&mut self, _elapsed: f32) -> &FrameImage {
        &self.frame
    }

    fn resize(&mut self, _width: u32, _height: u32) {
        // The frame texture rescales independently of the surface size.
    }
}

fn lerp_color(from: [u8; 4], to: [u8; 4], t: f32) -> [u8; 4] {
    let t = t.clamp(0.0, 1.0);
    let mut out = [0u8; 4];
    for channel in 0..4 {
        let a = from[channel] as f32;
        let b = to[channel] as f32;
        out[channel] = (a + (b - a) * t).round() as u8;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_produces_frames_of_the_requested_size() {
        let mut scene = TestScene::new(320, 240);
        let frame = scene.next_frame(0.0);
        assert_eq!(frame.width(), 320);
        assert_eq!(frame.height(), 240);
        assert_eq!(frame.pixels().len(), 320 * 240 * 4);
    }

    #[test]
    fn scene_animates_between_ticks() {
        let mut scene = TestScene::new(320, 240);
        let first = scene.next_frame(0.0).pixels().to_vec();
        let second = scene.next_frame(1.0).pixels().to_vec();
        assert_ne!(first, second);
    }

    #[test]
    fn resize_reallocates_the_frame() {
        let mut scene = TestScene::new(320, 240);
        scene.resize(640, 480);
        let frame = scene.next_frame(0.5);
        assert_eq!((frame.width(), frame.height()), (640, 480));
    }

    #[test]
    fn tiny_frames_render_without_panicking() {
        // Frames shorter than the sprite used to overflow the clamp range.
        let mut scene = TestScene::new(8, 2);
        let frame = scene.next_frame(0.0);
        assert_eq!((frame.width(), frame.height()), (8, 2));

        let mut resized = TestScene::new(320, 240);
        resized.resize(4, 3);
        resized.next_frame(1.0);
    }

    #[test]
    fn lerp_color_hits_both_endpoints() {
        assert_eq!(lerp_color(SKY_TOP, SKY_BOTTOM, 0.0), SKY_TOP);
        assert_eq!(lerp_color(SKY_TOP, SKY_BOTTOM, 1.0), SKY_BOTTOM);
    }
}
