//! CPU mirror of the coordinate math the fragment shader performs.
//!
//! The shader hard-codes the same constants as [`CrtTuning::default`]; the
//! functions here exist so callers can reason about the effect geometry
//! without a GPU, e.g. deciding whether a click landed inside the bezel
//! silhouette, or testing the remap properties directly.

/// Numeric tuning of the CRT stack.
///
/// The defaults reproduce the reference visuals and are what the shader
/// bakes in; the struct documents them rather than feeding the GPU.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CrtTuning {
    /// Radial barrel-distortion strength.
    pub distortion: f32,
    /// Quadratic curvature correction applied on top of the radial term.
    pub curvature: f32,
    /// Fixed contraction applied after the remap.
    pub contraction: f32,
    /// Rounded bezel corner radius in [-1, 1] screen space.
    pub corner_radius: f32,
    /// Width of the smoothing band at the bezel edge.
    pub corner_smooth: f32,
    /// Chromatic aberration offset gain (scales with distance from center).
    pub aberration: f32,
    /// Fraction of the 3x3 blur mixed into the raw chromatic sample.
    pub blur_mix: f32,
    /// Scanline darkening intensity.
    pub scanline_intensity: f32,
    /// Vignette mix strength.
    pub vignette_intensity: f32,
    /// Grain brightness perturbation amplitude.
    pub noise_intensity: f32,
    /// Side length of one noise cell in output pixels.
    pub noise_cell: f32,
    /// Flat gain compensating for the darkening stages.
    pub brightness: f32,
    /// Contribution of the 5x5 bloom sample added back to the color.
    pub bloom_strength: f32,
    /// Additional direct mix toward the bloom value.
    pub bloom_mix: f32,
    /// Quad overscan factor hiding curvature edge artifacts.
    pub overscan: f32,
}

impl Default for CrtTuning {
    fn default() -> Self {
        Self {
            distortion: 0.12,
            curvature: 0.25,
            contraction: 0.98,
            corner_radius: 0.15,
            corner_smooth: 0.15,
            aberration: 0.015,
            blur_mix: 0.3,
            scanline_intensity: 0.15,
            vignette_intensity: 0.6,
            noise_intensity: 0.015,
            noise_cell: 3.0,
            brightness: 1.35,
            bloom_strength: 0.45,
            bloom_mix: 0.1,
            overscan: 1.2,
        }
    }
}

impl CrtTuning {
    /// Bezel silhouette mask at `uv` in [0, 1]²: 0 outside the rounded
    /// rectangle, 1 well inside, smoothed over `corner_smooth`.
    pub fn corner_mask(&self, uv: [f32; 2]) -> f32 {
        let cx = (uv[0] * 2.0 - 1.0).abs();
        let cy = (uv[1] * 2.0 - 1.0).abs();
        let inner = 1.0 - self.corner_radius;
        let dx = (cx - inner).max(0.0);
        let dy = (cy - inner).max(0.0);
        let dist = (dx * dx + dy * dy).sqrt();
        1.0 - smoothstep(
            self.corner_radius - self.corner_smooth,
            self.corner_radius,
            dist,
        )
    }

    /// Barrel-distortion remap of a sample coordinate. Coordinates that
    /// leave [0, 1] on either axis fall outside the visible screen area.
    pub fn curve_remap(&self, uv: [f32; 2]) -> [f32; 2] {
        let x = uv[0] * 2.0 - 1.0;
        let y = uv[1] * 2.0 - 1.0;
        let r2 = x * x + y * y;
        let factor = (1.0 + self.distortion * r2 + self.curvature * r2 * r2) * self.contraction;
        [
            (x * factor) * 0.5 + 0.5,
            (y * factor) * 0.5 + 0.5,
        ]
    }

    /// Scanline brightness multiplier at `uv` and elapsed `time` seconds.
    /// Always within `[1 - scanline_intensity, 1]`.
    pub fn scanline_factor(&self, uv: [f32; 2], time: f32) -> f32 {
        let wobble = (uv[0] * 12.0).sin() * 0.5;
        let s1 = (uv[1] * 640.0 + wobble).sin();
        let s2 = (uv[1] * 320.0 + time * 1.5).sin();
        let wave = 0.5 * (s1 + s2);
        1.0 - self.scanline_intensity * (0.5 + 0.5 * wave)
    }

    /// Vignette multiplier: 1 at the center, darkening toward the edges
    /// along an elliptical falloff.
    pub fn vignette_factor(&self, uv: [f32; 2]) -> f32 {
        let x = uv[0] * 2.0 - 1.0;
        let y = (uv[1] * 2.0 - 1.0) * 0.75;
        let fall = 1.0 - smoothstep(0.6, 1.5, (x * x + y * y).sqrt());
        fall.powf(1.5)
    }

    /// Hash-based grain value in [0, 1), bucketed into `noise_cell`-sized
    /// pixel cells and animated by the fractional part of `time`.
    pub fn grain(&self, uv: [f32; 2], resolution: [f32; 2], time: f32) -> f32 {
        let cell_x = (uv[0] * resolution[0] / self.noise_cell).floor();
        let cell_y = (uv[1] * resolution[1] / self.noise_cell).floor();
        let seed = cell_x * 12.9898 + cell_y * 78.233 + time.fract() * 43.0;
        fract(seed.sin() * 43758.547)
    }
}

// GLSL-style fract: always in [0, 1), also for negative inputs.
fn fract(x: f32) -> f32 {
    x - x.floor()
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn corner_mask_zero_at_corners_one_at_center() {
        let tuning = CrtTuning::default();
        for corner in [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]] {
            assert!(tuning.corner_mask(corner) < EPSILON, "corner {corner:?}");
        }
        assert!((tuning.corner_mask([0.5, 0.5]) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn corner_mask_monotone_from_corner_to_center() {
        let tuning = CrtTuning::default();
        let mut previous = -1.0f32;
        for step in 0..=100 {
            let s = step as f32 / 200.0;
            let mask = tuning.corner_mask([s, s]);
            assert!(
                mask >= previous - EPSILON,
                "mask regressed at s={s}: {mask} < {previous}"
            );
            previous = mask;
        }
    }

    #[test]
    fn curve_remap_fixes_the_center() {
        let tuning = CrtTuning::default();
        let remapped = tuning.curve_remap([0.5, 0.5]);
        assert!((remapped[0] - 0.5).abs() < EPSILON);
        assert!((remapped[1] - 0.5).abs() < EPSILON);
    }

    #[test]
    fn curve_remap_pushes_edge_midpoints_out_of_range() {
        let tuning = CrtTuning::default();
        let right = tuning.curve_remap([1.0, 0.5]);
        assert!(right[0] > 1.0, "right midpoint stayed inside: {right:?}");
        let top = tuning.curve_remap([0.5, 0.0]);
        assert!(top[1] < 0.0, "top midpoint stayed inside: {top:?}");
        let bottom = tuning.curve_remap([0.5, 1.0]);
        assert!(bottom[1] > 1.0, "bottom midpoint stayed inside: {bottom:?}");
    }

    #[test]
    fn scanline_factor_stays_within_intensity_bounds() {
        let tuning = CrtTuning::default();
        let lower = 1.0 - tuning.scanline_intensity;
        let mut sum = 0.0;
        let samples = 1000;
        for step in 0..samples {
            let v = step as f32 / (samples - 1) as f32;
            let factor = tuning.scanline_factor([0.37, v], 1.25);
            assert!(factor >= lower - EPSILON && factor <= 1.0 + EPSILON);
            sum += factor;
        }
        let average = sum / samples as f32;
        assert!(average >= lower && average <= 1.0);
    }

    #[test]
    fn scanline_factor_animates_over_time() {
        let tuning = CrtTuning::default();
        let at_zero = tuning.scanline_factor([0.5, 0.123], 0.0);
        let at_tau = tuning.scanline_factor([0.5, 0.123], std::f32::consts::TAU);
        assert!((at_zero - at_tau).abs() > EPSILON);
    }

    #[test]
    fn grain_is_deterministic_per_cell_and_varies_with_time() {
        let tuning = CrtTuning::default();
        let resolution = [256.0, 256.0];
        let a = tuning.grain([0.25, 0.25], resolution, 0.4);
        let b = tuning.grain([0.25, 0.25], resolution, 0.4);
        assert_eq!(a, b);
        // Two coordinates inside the same 3x3 pixel cell hash identically.
        let cell_a = tuning.grain([0.2500, 0.2500], resolution, 0.4);
        let cell_b = tuning.grain([0.2505, 0.2505], resolution, 0.4);
        assert_eq!(cell_a, cell_b);
        let later = tuning.grain([0.25, 0.25], resolution, 0.9);
        assert!((a - later).abs() > EPSILON);
    }

    #[test]
    fn vignette_is_full_brightness_at_center() {
        let tuning = CrtTuning::default();
        assert!((tuning.vignette_factor([0.5, 0.5]) - 1.0).abs() < EPSILON);
        assert!(tuning.vignette_factor([0.0, 0.5]) < 1.0);
    }
}
