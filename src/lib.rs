#![doc = include_str!("../README.md")]

pub mod connection;
pub mod game;
mod interpreter;
pub mod render;

use std::collections::HashMap;
use std::io::{Read, Seek};

use calcite_assets::{AssetLoader, BlockRegistry};
use calcite_mesh::{FluidTextures, Mesher};
use calcite_world::{DimensionRegistry, WorldCache};
use render::RendererUploader;
use tracing::debug;

pub use calcite_assets as assets;
pub use calcite_mesh as mesh;
pub use calcite_nbt as nbt;
pub use calcite_protocol as protocol;
pub use calcite_world as world;
pub use connection::{Connection, ProtocolState};
pub use game::GameState;
pub use render::{MeshHandle, NullRenderer, Renderer, TextureConfig};

/// How many chunk meshes are rebuilt per tick at most, keeping frame time
/// bounded while a burst of chunk data streams in.
pub const MESH_BUDGET_PER_TICK: usize = 16;

/// The client engine: connection, world state, and the session-lifetime
/// registries, driven by a cooperative [`tick`](Self::tick).
#[derive(Default)]
pub struct Client {
    pub connection: Connection,
    pub world: WorldCache,
    pub dimensions: DimensionRegistry,
    pub game: GameState,
    /// The JSON document from a server list ping, once it arrives.
    pub status_response: Option<String>,
    meshes: HashMap<(i32, i32, i32), MeshHandle>,
}

/// Runs the one-shot asset build: scans the game jar, streams texture
/// layers into the renderer, and resolves the block registry against
/// blocks.json. Returns the registry plus the fluid texture ranges the
/// mesher needs.
pub fn load_assets<R: Read + Seek>(
    jar: R,
    blocks_json: &str,
    renderer: &mut dyn Renderer,
) -> anyhow::Result<(BlockRegistry, FluidTextures)> {
    let mut loader = AssetLoader::new();

    loader.load_jar(jar, &mut RendererUploader { renderer })?;

    let fluids = FluidTextures {
        water: loader.textures().get("water_still").unwrap_or_default(),
        lava: loader.textures().get("lava_still").unwrap_or_default(),
    };

    let registry = loader.finish(blocks_json)?;

    Ok((registry, fluids))
}

impl Client {
    pub fn new() -> Self {
        Self::default()
    }

    /// One cooperative tick: drain the socket, interpret whole packets,
    /// send the player position, and flush outbound bytes.
    pub fn tick(&mut self) -> anyhow::Result<usize> {
        self.connection.fill_from_socket()?;

        let processed = self.interpret()?;

        if self.connection.state() == ProtocolState::Play && self.game.take_position_dirty() {
            self.send_position()?;
        }

        self.connection.flush()?;

        Ok(processed)
    }

    /// Meshes up to `MESH_BUDGET_PER_TICK` dirty chunks and swaps their
    /// GPU buffers through the renderer.
    pub fn rebuild_meshes(
        &mut self,
        mesher: &mut Mesher,
        registry: &BlockRegistry,
        renderer: &mut dyn Renderer,
    ) {
        for (cx, cy, cz) in self.world.drain_dirty(MESH_BUDGET_PER_TICK) {
            let data = mesher.mesh(&self.world, registry, cx, cy, cz);

            if let Some(old) = self.meshes.remove(&(cx, cy, cz)) {
                renderer.free_mesh(old);
            }

            if data.is_empty() {
                continue;
            }

            let handle = renderer.allocate_mesh(cx, cy, cz, &data);
            self.meshes.insert((cx, cy, cz), handle);
            debug!(cx, cy, cz, quads = data.total_quads(), "chunk remeshed");
        }
    }
}

#[cfg(test)]
mod tests {
    use calcite_assets::TextureIdRange;
    use calcite_protocol::{BlockPos, ChunkPos};
    use calcite_world::{ChunkColumn, DimensionType};

    use super::*;

    fn block_fixture() -> BlockRegistry {
        let mut loader = AssetLoader::new();
        loader
            .add_model_json(
                "stone",
                r##"{ "textures": { "all": "block/stone" }, "elements": [{
                    "from": [0, 0, 0], "to": [16, 16, 16],
                    "faces": {
                        "down":  { "texture": "#all", "cullface": "down" },
                        "up":    { "texture": "#all", "cullface": "up" },
                        "north": { "texture": "#all", "cullface": "north" },
                        "south": { "texture": "#all", "cullface": "south" },
                        "west":  { "texture": "#all", "cullface": "west" },
                        "east":  { "texture": "#all", "cullface": "east" }
                    }
                }] }"##,
            )
            .unwrap();
        loader.add_texture("stone", 1, false);
        loader
            .add_blockstate_json("stone", r##"{ "variants": { "": { "model": "block/stone" } } }"##)
            .unwrap();

        loader
            .finish(r##"{ "minecraft:stone": { "states": [{ "id": 1, "default": true }] } }"##)
            .unwrap()
    }

    #[test]
    fn dirty_chunks_swap_their_gpu_buffers() {
        let registry = block_fixture();
        let mut mesher = Mesher::new(FluidTextures {
            water: Default::default(),
            lava: Default::default(),
        });
        let mut renderer = NullRenderer::default();

        let mut client = Client::new();
        client.world.set_dimension(&DimensionType {
            name: "minecraft:flat".into(),
            min_y: 0,
            height: 64,
            has_skylight: true,
            ambient_light: 0.0,
        });

        for dz in -1..=1 {
            for dx in -1..=1 {
                client.world.insert_column(ChunkColumn::new(ChunkPos::new(dx, dz)));
            }
        }

        client.world.set_block(BlockPos::new(8, 8, 8), 1);

        client.rebuild_meshes(&mut mesher, &registry, &mut renderer);
        assert_eq!(renderer.live_meshes, 1);

        // A second edit dirties the same chunk; the rebuild frees the old
        // buffers and allocates fresh ones.
        client.world.set_block(BlockPos::new(8, 9, 8), 1);
        client.rebuild_meshes(&mut mesher, &registry, &mut renderer);
        assert_eq!(renderer.live_meshes, 1);

        // Clearing the block leaves an empty chunk, which frees the mesh
        // without replacing it.
        client.world.set_block(BlockPos::new(8, 8, 8), 0);
        client.world.set_block(BlockPos::new(8, 9, 8), 0);
        client.rebuild_meshes(&mut mesher, &registry, &mut renderer);
        assert_eq!(renderer.live_meshes, 0);
    }
}
