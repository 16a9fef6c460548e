use bytemuck::{Pod, Zeroable};

/// Vertex layout shared by every batcher and by the GPU backend.
///
/// `position` is already in clip space: batchers apply `projection * modelview`
/// on the CPU when geometry is submitted, so a draw never depends on the
/// transform state current at flush time.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct BatchVertex {
    pub position: [f32; 4],
    pub color: [f32; 4], // premultiplied
    pub tex_coord: [f32; 2],
}

impl BatchVertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x4, // position
        1 => Float32x4, // color
        2 => Float32x2  // tex_coord
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<BatchVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}
