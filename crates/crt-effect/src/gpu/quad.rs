use wgpu::util::DeviceExt;

// Full-screen quad as a 4-vertex triangle strip. Positions are homogeneous
// clip-space corners; texture coordinates map the top-left texel to the
// top-left corner once the vertex stage has flipped Y.
const QUAD_POSITIONS: [[f32; 4]; 4] = [
    [-1.0, -1.0, 0.0, 1.0],
    [1.0, -1.0, 0.0, 1.0],
    [-1.0, 1.0, 0.0, 1.0],
    [1.0, 1.0, 0.0, 1.0],
];

const QUAD_TEX_COORDS: [[f32; 2]; 4] = [
    [0.0, 0.0],
    [1.0, 0.0],
    [0.0, 1.0],
    [1.0, 1.0],
];

const POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] =
    wgpu::vertex_attr_array![0 => Float32x4];
const TEX_COORD_ATTRIBUTES: [wgpu::VertexAttribute; 1] =
    wgpu::vertex_attr_array![1 => Float32x2];

/// Write-once quad geometry; uploaded at initialization, never mutated.
pub(crate) struct QuadGeometry {
    pub position_buffer: wgpu::Buffer,
    pub tex_coord_buffer: wgpu::Buffer,
}

impl QuadGeometry {
    pub(crate) const VERTEX_COUNT: u32 = 4;

    pub(crate) fn new(device: &wgpu::Device) -> Self {
        let position_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad positions"),
            contents: bytemuck::cast_slice(&QUAD_POSITIONS),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let tex_coord_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad texture coordinates"),
            contents: bytemuck::cast_slice(&QUAD_TEX_COORDS),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Self {
            position_buffer,
            tex_coord_buffer,
        }
    }

    pub(crate) fn buffer_layouts() -> [wgpu::VertexBufferLayout<'static>; 2] {
        [
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &POSITION_ATTRIBUTES,
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &TEX_COORD_ATTRIBUTES,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_spans_the_full_clip_square() {
        for axis in 0..2 {
            let values: Vec<f32> = QUAD_POSITIONS.iter().map(|p| p[axis]).collect();
            assert!(values.contains(&-1.0) && values.contains(&1.0));
        }
        for position in QUAD_POSITIONS {
            assert_eq!(position[2], 0.0);
            assert_eq!(position[3], 1.0);
        }
    }

    #[test]
    fn tex_coords_cover_the_unit_square() {
        for axis in 0..2 {
            let values: Vec<f32> = QUAD_TEX_COORDS.iter().map(|t| t[axis]).collect();
            assert!(values.contains(&0.0) && values.contains(&1.0));
        }
    }

    #[test]
    fn strip_vertices_pair_positions_with_tex_coords() {
        // Each strip vertex must map the clip corner to the same texture
        // corner (before the vertex stage flips Y).
        for (position, tex) in QUAD_POSITIONS.iter().zip(QUAD_TEX_COORDS.iter()) {
            assert_eq!(position[0] > 0.0, tex[0] > 0.5);
            assert_eq!(position[1] > 0.0, tex[1] > 0.5);
        }
    }
}
