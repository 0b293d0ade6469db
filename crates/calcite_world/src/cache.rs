use calcite_protocol::{BlockPos, ChunkPos};
use tracing::trace;

use crate::chunk::CHUNK_SIZE;
use crate::column::{ChunkColumn, MAX_COLUMN_CHUNKS};
use crate::dimension::DimensionType;

/// Side length of the sliding cache grid. Must exceed twice the server's
/// view distance so a column is never evicted while still in range.
pub const CACHE_SIZE: usize = 32;

/// The sliding cache of chunk columns around the player.
///
/// Columns are keyed by chunk position modulo [`CACHE_SIZE`] with signs
/// normalized, so the grid follows the player without any explicit
/// recentering. Receiving a column whose slot holds a different position
/// simply replaces it; the packet interpreter is the single writer.
pub struct WorldCache {
    columns: Vec<Option<ChunkColumn>>,
    min_y: i32,
    height: u32,
}

impl Default for WorldCache {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldCache {
    pub fn new() -> Self {
        Self {
            columns: std::iter::repeat_with(|| None)
                .take(CACHE_SIZE * CACHE_SIZE)
                .collect(),
            min_y: 0,
            height: 0,
        }
    }

    /// Lowest world y of the active dimension.
    pub fn min_y(&self) -> i32 {
        self.min_y
    }

    /// World height of the active dimension in blocks.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Chunks per column in the active dimension.
    pub fn chunks_per_column(&self) -> usize {
        self.height as usize / CHUNK_SIZE
    }

    /// Switches to a dimension, dropping every cached column. Fired on both
    /// login and respawn.
    pub fn set_dimension(&mut self, dimension: &DimensionType) {
        assert!(
            dimension.height as usize / CHUNK_SIZE <= MAX_COLUMN_CHUNKS,
            "dimension height of {} exceeds column capacity",
            dimension.height
        );

        self.min_y = dimension.min_y;
        self.height = dimension.height;
        self.clear();

        trace!(
            min_y = self.min_y,
            height = self.height,
            "world cache dimension set"
        );
    }

    pub fn clear(&mut self) {
        for slot in &mut self.columns {
            *slot = None;
        }
    }

    #[inline]
    fn slot_index(pos: ChunkPos) -> usize {
        // Masking normalizes both signs for a power-of-two grid.
        let x = pos.x as usize & (CACHE_SIZE - 1);
        let z = pos.z as usize & (CACHE_SIZE - 1);
        z * CACHE_SIZE + x
    }

    pub fn column(&self, pos: ChunkPos) -> Option<&ChunkColumn> {
        self.columns[Self::slot_index(pos)]
            .as_ref()
            .filter(|col| col.pos == pos)
    }

    pub fn column_mut(&mut self, pos: ChunkPos) -> Option<&mut ChunkColumn> {
        self.columns[Self::slot_index(pos)]
            .as_mut()
            .filter(|col| col.pos == pos)
    }

    /// Installs a column, implicitly evicting whatever shared its slot.
    pub fn insert_column(&mut self, column: ChunkColumn) {
        let slot = &mut self.columns[Self::slot_index(column.pos)];

        if let Some(old) = slot.as_ref() {
            if old.pos != column.pos {
                trace!(old = %format!("{},{}", old.pos.x, old.pos.z), "column evicted");
            }
        }

        *slot = Some(column);
    }

    pub fn unload_column(&mut self, pos: ChunkPos) {
        let slot = &mut self.columns[Self::slot_index(pos)];

        if slot.as_ref().is_some_and(|col| col.pos == pos) {
            *slot = None;
        }
    }

    /// Converts a world y to a chunk slot in the active dimension. `None`
    /// when outside the world's vertical range.
    pub fn chunk_y(&self, y: i32) -> Option<usize> {
        let rel = y - self.min_y;
        if rel < 0 || rel as u32 >= self.height {
            return None;
        }
        Some(rel as usize / CHUNK_SIZE)
    }

    /// Reads one block; absent columns and chunks read as air.
    pub fn block(&self, pos: BlockPos) -> u32 {
        let Some(chunk_y) = self.chunk_y(pos.y) else {
            return 0;
        };

        let Some(column) = self.column(ChunkPos::from(pos)) else {
            return 0;
        };

        match column.chunk(chunk_y) {
            Some(chunk) => chunk.block(
                pos.x.rem_euclid(16) as usize,
                pos.y.rem_euclid(16) as usize,
                pos.z.rem_euclid(16) as usize,
            ),
            None => 0,
        }
    }

    /// Drops every column whose Chebyshev distance from `center` exceeds
    /// `radius`. Fired when the server recenters the interest window.
    pub fn retain_near(&mut self, center: ChunkPos, radius: i32) {
        for slot in &mut self.columns {
            if let Some(column) = slot {
                if (column.pos.x - center.x).abs() > radius
                    || (column.pos.z - center.z).abs() > radius
                {
                    *slot = None;
                }
            }
        }
    }

    /// Collects up to `budget` dirty chunks for remeshing, clearing their
    /// dirty bits. Returned as `(chunk_x, chunk_y, chunk_z)` section
    /// coordinates with `chunk_y` counted from the dimension bottom.
    pub fn drain_dirty(&mut self, budget: usize) -> Vec<(i32, i32, i32)> {
        let mut drained = Vec::new();

        'scan: for slot in &mut self.columns {
            let Some(column) = slot else {
                continue;
            };

            let mut mask = column.dirty_mask();

            while mask != 0 {
                if drained.len() >= budget {
                    break 'scan;
                }

                let chunk_y = mask.trailing_zeros() as usize;
                mask &= mask - 1;

                column.clear_dirty(chunk_y);
                drained.push((column.pos.x, chunk_y as i32, column.pos.z));
            }
        }

        drained
    }

    /// Reads one cell's packed light byte (sky in the low nibble, block
    /// light in the high nibble); absent columns and chunks read as dark.
    pub fn light(&self, pos: BlockPos) -> u8 {
        let Some(chunk_y) = self.chunk_y(pos.y) else {
            return 0;
        };

        let Some(column) = self.column(ChunkPos::from(pos)) else {
            return 0;
        };

        match column.chunk(chunk_y) {
            Some(chunk) => chunk.light(
                pos.x.rem_euclid(16) as usize,
                pos.y.rem_euclid(16) as usize,
                pos.z.rem_euclid(16) as usize,
            ),
            None => 0,
        }
    }

    /// Writes one block, allocating the chunk if needed, and marks the
    /// surrounding chunks dirty for remeshing.
    pub fn set_block(&mut self, pos: BlockPos, id: u32) {
        let Some(chunk_y) = self.chunk_y(pos.y) else {
            return;
        };

        let chunk_pos = ChunkPos::from(pos);
        let chunks_per_column = self.chunks_per_column();

        let Some(column) = self.column_mut(chunk_pos) else {
            return;
        };

        let x = pos.x.rem_euclid(16) as usize;
        let y = pos.y.rem_euclid(16) as usize;
        let z = pos.z.rem_euclid(16) as usize;

        if id == 0 && column.chunk(chunk_y).is_none() {
            return;
        }

        column.chunk_or_insert(chunk_y).set_block(x, y, z, id);
        column.mark_dirty(chunk_y);

        // A border write also invalidates the neighbor it abuts.
        if y == 0 && chunk_y > 0 {
            column.mark_dirty(chunk_y - 1);
        }
        if y == 15 && chunk_y + 1 < chunks_per_column {
            column.mark_dirty(chunk_y + 1);
        }

        for (dx, dz) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
            let on_edge = match (dx, dz) {
                (-1, 0) => x == 0,
                (1, 0) => x == 15,
                (0, -1) => z == 0,
                (0, 1) => z == 15,
                _ => unreachable!(),
            };

            if on_edge {
                let neighbor = ChunkPos::new(chunk_pos.x + dx, chunk_pos.z + dz);
                if let Some(col) = self.column_mut(neighbor) {
                    col.mark_dirty(chunk_y);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overworld() -> DimensionType {
        DimensionType {
            name: "minecraft:overworld".into(),
            min_y: -64,
            height: 384,
            has_skylight: true,
            ambient_light: 0.0,
        }
    }

    fn cache() -> WorldCache {
        let mut world = WorldCache::new();
        world.set_dimension(&overworld());
        world
    }

    #[test]
    fn modular_slots_normalize_negative_coordinates() {
        let mut world = cache();

        world.insert_column(ChunkColumn::new(ChunkPos::new(-1, -1)));

        assert!(world.column(ChunkPos::new(-1, -1)).is_some());
        // (31, 31) shares the slot but is a different column.
        assert!(world.column(ChunkPos::new(31, 31)).is_none());
    }

    #[test]
    fn slot_collision_evicts_the_old_column() {
        let mut world = cache();

        world.insert_column(ChunkColumn::new(ChunkPos::new(0, 0)));
        world.insert_column(ChunkColumn::new(ChunkPos::new(32, 0)));

        assert!(world.column(ChunkPos::new(0, 0)).is_none());
        assert!(world.column(ChunkPos::new(32, 0)).is_some());
    }

    #[test]
    fn block_reads_follow_dimension_min_y() {
        let mut world = cache();

        world.insert_column(ChunkColumn::new(ChunkPos::new(0, 0)));
        world.set_block(BlockPos::new(3, -64, 5), 7);

        assert_eq!(world.block(BlockPos::new(3, -64, 5)), 7);
        // Below the world.
        assert_eq!(world.block(BlockPos::new(3, -65, 5)), 0);
        // Top of the range is exclusive.
        assert_eq!(world.block(BlockPos::new(3, 320, 5)), 0);
    }

    #[test]
    fn air_write_into_missing_chunk_allocates_nothing() {
        let mut world = cache();

        world.insert_column(ChunkColumn::new(ChunkPos::new(0, 0)));
        world.set_block(BlockPos::new(0, 0, 0), 0);

        let column = world.column(ChunkPos::new(0, 0)).unwrap();
        assert_eq!(column.occupancy_mask(), 0);
    }

    #[test]
    fn edge_writes_dirty_the_adjacent_column() {
        let mut world = cache();

        world.insert_column(ChunkColumn::new(ChunkPos::new(0, 0)));
        world.insert_column(ChunkColumn::new(ChunkPos::new(-1, 0)));

        world.set_block(BlockPos::new(0, 0, 8), 5);

        let chunk_y = world.chunk_y(0).unwrap();
        assert!(world.column(ChunkPos::new(0, 0)).unwrap().is_dirty(chunk_y));
        assert!(world
            .column(ChunkPos::new(-1, 0))
            .unwrap()
            .is_dirty(chunk_y));
    }
}
