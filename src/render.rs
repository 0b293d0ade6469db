//! The narrow interface the core drives the renderer through. The actual
//! GPU implementation lives outside this crate; tests use the recording
//! null renderer.

use calcite_assets::TextureUploader;
use calcite_mesh::MeshData;

/// An opaque handle to GPU-resident chunk buffers.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct MeshHandle(pub u64);

/// Per-texture upload options.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct TextureConfig {
    /// Off for leaves: mip generation would brighten the cutout edges.
    pub brighten_mipping: bool,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            brighten_mipping: true,
        }
    }
}

/// What the core needs from a renderer: the block texture array built once
/// at load, and immutable per-chunk mesh buffers swapped as chunks remesh.
pub trait Renderer {
    fn create_texture_array(&mut self, width: u32, height: u32, layers: u32);

    fn push_array_texture(&mut self, layer: u32, rgba: &[u8], config: TextureConfig);

    fn commit_texture_push(&mut self);

    fn allocate_mesh(&mut self, cx: i32, cy: i32, cz: i32, data: &MeshData) -> MeshHandle;

    fn free_mesh(&mut self, handle: MeshHandle);
}

/// Bridges the asset loader's upload stream onto a [`Renderer`].
pub struct RendererUploader<'a> {
    pub renderer: &'a mut dyn Renderer,
}

impl TextureUploader for RendererUploader<'_> {
    fn begin(&mut self, width: u32, height: u32, layers: u32) {
        self.renderer.create_texture_array(width, height, layers);
    }

    fn push_layer(&mut self, layer: u32, rgba: &[u8], brighten_mipping: bool) {
        self.renderer
            .push_array_texture(layer, rgba, TextureConfig { brighten_mipping });
    }

    fn commit(&mut self) {
        self.renderer.commit_texture_push();
    }
}

/// Headless renderer: accepts everything, draws nothing. Counts handed-out
/// meshes so tests can assert allocation behavior.
#[derive(Default)]
pub struct NullRenderer {
    next_handle: u64,
    pub live_meshes: usize,
    pub texture_layers: u32,
}

impl Renderer for NullRenderer {
    fn create_texture_array(&mut self, _width: u32, _height: u32, layers: u32) {
        self.texture_layers = layers;
    }

    fn push_array_texture(&mut self, _layer: u32, _rgba: &[u8], _config: TextureConfig) {}

    fn commit_texture_push(&mut self) {}

    fn allocate_mesh(&mut self, _cx: i32, _cy: i32, _cz: i32, _data: &MeshData) -> MeshHandle {
        self.next_handle += 1;
        self.live_meshes += 1;
        MeshHandle(self.next_handle)
    }

    fn free_mesh(&mut self, _handle: MeshHandle) {
        self.live_meshes -= 1;
    }
}
