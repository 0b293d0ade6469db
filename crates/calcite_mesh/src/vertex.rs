//! The vertex record and per-layer output buffers.

use bitfield_struct::bitfield;
use calcite_assets::RenderLayer;

/// One mesh vertex as the renderer consumes it.
#[derive(Copy, Clone, PartialEq, Debug)]
#[repr(C)]
pub struct Vertex {
    pub position: [f32; 3],
    /// UV in 1/16 fixed point: `x << 5 | y`, five bits per component.
    pub packed_uv: u16,
    /// Base layer in the block texture array.
    pub texture_id: u32,
    pub packed_light: PackedVertexLight,
}

/// Everything per-vertex besides position and UV, packed into one word.
#[bitfield(u32)]
#[derive(PartialEq, Eq)]
pub struct PackedVertexLight {
    /// See [`pack_light`] for the field layout.
    #[bits(16)]
    pub light: u16,
    /// Biome color table index; 0xff for untinted.
    #[bits(8)]
    pub tint_index: u8,
    /// Tells the shader the UVs wrap; set with texture randomization.
    #[bits(1)]
    pub repeat: bool,
    #[bits(7)]
    pub anim_count: u8,
}

/// Packs one vertex's lighting: six bits of sky, six of block light, two
/// of ambient occlusion, and the directional-shade flag in bit 15.
pub fn pack_light(sky: u8, block: u8, ao: u8, shade: bool) -> u16 {
    u16::from(sky & 0x3f)
        | u16::from(block & 0x3f) << 6
        | u16::from(ao & 0x3) << 12
        | u16::from(shade) << 15
}

/// Packs a UV pair into 1/16 fixed point.
pub fn pack_uv(u: f32, v: f32) -> u16 {
    let ux = (u * 16.0).round().clamp(0.0, 31.0) as u16;
    let vy = (v * 16.0).round().clamp(0.0, 31.0) as u16;
    ux << 5 | vy & 0x1f
}

/// Vertex and index data for one render layer.
#[derive(Clone, Default, Debug)]
pub struct MeshBuffer {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl MeshBuffer {
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    /// Appends one quad: four corners in bottom-left, bottom-right,
    /// top-right, top-left order, indexed as two triangles.
    pub fn push_quad(&mut self, corners: [Vertex; 4]) {
        let base = self.vertices.len();

        // Sixteen-bit indices bound a layer to 65535 vertices. A full
        // chunk worst case is 16^3 cells * 6 faces * 4 vertices = 24576.
        debug_assert!(base + 4 <= u16::MAX as usize + 1);

        self.vertices.extend_from_slice(&corners);

        let [bl, br, tr, tl] = [base, base + 1, base + 2, base + 3].map(|i| i as u16);
        self.indices.extend_from_slice(&[bl, br, tr, tr, tl, bl]);
    }

    pub fn quad_count(&self) -> usize {
        self.indices.len() / 6
    }
}

/// The mesher's output: one buffer per render layer.
#[derive(Clone, Default, Debug)]
pub struct MeshData {
    layers: [MeshBuffer; RenderLayer::COUNT],
}

impl MeshData {
    pub fn layer(&self, layer: RenderLayer) -> &MeshBuffer {
        &self.layers[layer.index()]
    }

    pub fn layer_mut(&mut self, layer: RenderLayer) -> &mut MeshBuffer {
        &mut self.layers[layer.index()]
    }

    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(MeshBuffer::is_empty)
    }

    pub fn clear(&mut self) {
        for layer in &mut self.layers {
            layer.clear();
        }
    }

    pub fn total_quads(&self) -> usize {
        self.layers.iter().map(MeshBuffer::quad_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_packing_layout() {
        let light = pack_light(15, 7, 3, true);
        assert_eq!(light & 0x3f, 15);
        assert_eq!(light >> 6 & 0x3f, 7);
        assert_eq!(light >> 12 & 0x3, 3);
        assert_eq!(light >> 15, 1);
    }

    #[test]
    fn uv_packing_is_sixteenths() {
        assert_eq!(pack_uv(0.0, 0.0), 0);
        assert_eq!(pack_uv(1.0, 0.0), 16 << 5);
        assert_eq!(pack_uv(0.5, 1.0), (8 << 5) | 16);
    }

    #[test]
    fn quads_index_as_two_triangles() {
        let mut buffer = MeshBuffer::default();

        let v = Vertex {
            position: [0.0; 3],
            packed_uv: 0,
            texture_id: 0,
            packed_light: PackedVertexLight::new(),
        };

        buffer.push_quad([v; 4]);
        buffer.push_quad([v; 4]);

        assert_eq!(buffer.vertices.len(), 8);
        assert_eq!(buffer.indices, &[0, 1, 2, 2, 3, 0, 4, 5, 6, 6, 7, 4]);
        assert_eq!(buffer.quad_count(), 2);
    }
}
