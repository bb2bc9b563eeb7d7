use bytemuck::{Pod, Zeroable};

/// Per-frame uniform block; layout must match the `EffectParams` GLSL
/// block declared in both shader stages.
#[repr(C, align(16))]
#[derive(Clone, Copy)]
pub(crate) struct EffectUniforms {
    pub resolution: [f32; 2],
    pub time: f32,
    pub scale: f32,
}

unsafe impl Zeroable for EffectUniforms {}
unsafe impl Pod for EffectUniforms {}

impl EffectUniforms {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            resolution: [width as f32, height as f32],
            time: 0.0,
            // Reserved for dynamic zoom; fixed at 1.0 in normal operation.
            scale: 1.0,
        }
    }

    pub fn set_resolution(&mut self, width: f32, height: f32) {
        self.resolution = [width, height];
    }

    pub fn set_time(&mut self, seconds: f32) {
        self.time = seconds;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_the_std140_block() {
        assert_eq!(std::mem::size_of::<EffectUniforms>(), 16);
        assert_eq!(std::mem::align_of::<EffectUniforms>(), 16);
    }

    #[test]
    fn scale_defaults_to_identity() {
        let uniforms = EffectUniforms::new(640, 480);
        assert_eq!(uniforms.scale, 1.0);
        assert_eq!(uniforms.resolution, [640.0, 480.0]);
    }
}
