//! The mesher's scratch copy of one chunk plus a one-cell halo.

use calcite_protocol::{BlockPos, ChunkPos};
use calcite_world::{WorldCache, CHUNK_SIZE};

/// Side length of the bordered scratch: a chunk plus one cell each way.
pub const BORDERED_SIZE: usize = CHUNK_SIZE + 2;

const BORDERED_VOLUME: usize = BORDERED_SIZE * BORDERED_SIZE * BORDERED_SIZE;

/// An 18x18x18 snapshot of block ids and packed light around one chunk.
///
/// Coordinates are offset by one: `(1, 1, 1)` is the chunk's own origin
/// cell, `0` and `17` are the halo sampled from the neighbors. Cells whose
/// neighbor chunk is absent read as air and darkness. The snapshot lives
/// for one meshing call and is reused across calls.
pub struct BorderedChunk {
    blocks: [u32; BORDERED_VOLUME],
    light: [u8; BORDERED_VOLUME],
}

impl Default for BorderedChunk {
    fn default() -> Self {
        Self {
            blocks: [0; BORDERED_VOLUME],
            light: [0; BORDERED_VOLUME],
        }
    }
}

#[inline]
const fn cell_index(x: usize, y: usize, z: usize) -> usize {
    debug_assert!(x < BORDERED_SIZE && y < BORDERED_SIZE && z < BORDERED_SIZE);
    (y * BORDERED_SIZE + z) * BORDERED_SIZE + x
}

impl BorderedChunk {
    /// Snapshots the chunk at section coordinates and its halo.
    ///
    /// Returns false without touching the buffers when the column or any of
    /// its eight horizontal neighbors is not loaded; meshing against a
    /// partial halo would bake seams that never heal.
    pub fn fill(&mut self, world: &WorldCache, cx: i32, cy: i32, cz: i32) -> bool {
        for dz in -1..=1 {
            for dx in -1..=1 {
                if world.column(ChunkPos::new(cx + dx, cz + dz)).is_none() {
                    return false;
                }
            }
        }

        let base_x = cx * CHUNK_SIZE as i32 - 1;
        let base_y = world.min_y() + cy * CHUNK_SIZE as i32 - 1;
        let base_z = cz * CHUNK_SIZE as i32 - 1;

        for y in 0..BORDERED_SIZE {
            for z in 0..BORDERED_SIZE {
                for x in 0..BORDERED_SIZE {
                    let pos = BlockPos::new(
                        base_x + x as i32,
                        base_y + y as i32,
                        base_z + z as i32,
                    );

                    let i = cell_index(x, y, z);
                    self.blocks[i] = world.block(pos);
                    self.light[i] = world.light(pos);
                }
            }
        }

        true
    }

    /// Block id at bordered coordinates (interior is `1..=16`).
    #[inline]
    pub fn block(&self, x: usize, y: usize, z: usize) -> u32 {
        self.blocks[cell_index(x, y, z)]
    }

    /// Block id at a signed offset from an interior cell.
    #[inline]
    pub fn block_at(&self, x: i32, y: i32, z: i32) -> u32 {
        self.blocks[cell_index(x as usize, y as usize, z as usize)]
    }

    #[inline]
    pub fn sky_light(&self, x: i32, y: i32, z: i32) -> u8 {
        self.light[cell_index(x as usize, y as usize, z as usize)] & 0x0f
    }

    #[inline]
    pub fn block_light(&self, x: i32, y: i32, z: i32) -> u8 {
        self.light[cell_index(x as usize, y as usize, z as usize)] >> 4
    }
}

#[cfg(test)]
mod tests {
    use calcite_world::{ChunkColumn, DimensionType};

    use super::*;

    fn world() -> WorldCache {
        let mut world = WorldCache::new();
        world.set_dimension(&DimensionType {
            name: "minecraft:flat".into(),
            min_y: 0,
            height: 64,
            has_skylight: true,
            ambient_light: 0.0,
        });

        for dz in -1..=1 {
            for dx in -1..=1 {
                world.insert_column(ChunkColumn::new(ChunkPos::new(dx, dz)));
            }
        }

        world
    }

    #[test]
    fn missing_neighbor_refuses_to_fill() {
        let mut world = world();
        world.unload_column(ChunkPos::new(1, 0));

        let mut bordered = BorderedChunk::default();
        assert!(!bordered.fill(&world, 0, 0, 0));
    }

    #[test]
    fn every_cell_matches_the_world() {
        let mut world = world();

        // A diagonal stripe crossing the chunk and both bordering columns.
        for i in -1..17 {
            world.set_block(BlockPos::new(i, 5, i.rem_euclid(16)), (i + 2) as u32 + 100);
        }
        world.set_block(BlockPos::new(-1, 0, -1), 7);
        world.set_block(BlockPos::new(16, 15, 16), 9);

        let mut bordered = BorderedChunk::default();
        assert!(bordered.fill(&world, 0, 0, 0));

        let mut checked = 0;
        for y in 0..BORDERED_SIZE {
            for z in 0..BORDERED_SIZE {
                for x in 0..BORDERED_SIZE {
                    let pos =
                        BlockPos::new(x as i32 - 1, y as i32 - 1, z as i32 - 1);
                    assert_eq!(
                        bordered.block(x, y, z),
                        world.block(pos),
                        "mismatch at {pos}"
                    );
                    checked += 1;
                }
            }
        }

        assert_eq!(checked, 5832);

        // Spot checks: interior, edge, corner.
        assert_eq!(bordered.block(0, 1, 0), 7);
        assert_eq!(bordered.block(17, 16, 17), 9);
    }

    #[test]
    fn absent_vertical_neighbors_read_as_air() {
        let world = world();

        let mut bordered = BorderedChunk::default();
        // Chunk 0 of a 4-chunk column: y = -1 is below the world.
        assert!(bordered.fill(&world, 0, 0, 0));
        assert_eq!(bordered.block(5, 0, 5), 0);
    }
}
