//! Decodes the payload of full chunk loads and light updates into the world
//! cache.

use anyhow::{bail, ensure};
use calcite_protocol::bit_set::BitSet;
use calcite_protocol::packets::play::{ChunkData, UpdateLight};
use calcite_protocol::var_int::VarInt;
use calcite_protocol::{ChunkPos, Decode};
use tracing::{debug, warn};

use crate::cache::WorldCache;
use crate::chunk::{Chunk, SECTION_BLOCKS};
use crate::column::ChunkColumn;

/// Ingests one full chunk column: palette-coded block sections plus the
/// masked light arrays. Replaces whatever column occupied the cache slot.
pub fn apply_chunk_data(world: &mut WorldCache, pkt: &ChunkData) -> anyhow::Result<()> {
    ensure!(world.height() > 0, "chunk data received before a dimension was set");

    let chunks_per_column = world.chunks_per_column();

    let mut column = ChunkColumn::new(pkt.pos);

    decode_sections(pkt.data, chunks_per_column, &mut column)?;

    apply_light(
        &mut column,
        chunks_per_column,
        &pkt.sky_light_mask,
        &pkt.sky_light_arrays,
        LightKind::Sky,
    )?;
    apply_light(
        &mut column,
        chunks_per_column,
        &pkt.block_light_mask,
        &pkt.block_light_arrays,
        LightKind::Block,
    )?;

    // Everything in the column meshes fresh, and the neighbors that were
    // waiting on this column can now complete their halos.
    for chunk_y in 0..chunks_per_column {
        if column.is_occupied(chunk_y) {
            column.mark_dirty(chunk_y);
        }
    }

    world.insert_column(column);

    for (dx, dz) in [(-1, 0), (1, 0), (0, -1), (0, 1), (-1, -1), (-1, 1), (1, -1), (1, 1)] {
        let neighbor = ChunkPos::new(pkt.pos.x + dx, pkt.pos.z + dz);
        if let Some(col) = world.column_mut(neighbor) {
            for chunk_y in 0..chunks_per_column {
                if col.is_occupied(chunk_y) {
                    col.mark_dirty(chunk_y);
                }
            }
        }
    }

    Ok(())
}

/// Replaces light sections of an already loaded column.
pub fn apply_update_light(world: &mut WorldCache, pkt: &UpdateLight) -> anyhow::Result<()> {
    let chunks_per_column = world.chunks_per_column();
    let pos = ChunkPos::new(pkt.chunk_x.0, pkt.chunk_z.0);

    let Some(column) = world.column_mut(pos) else {
        debug!("light update for unloaded column at {},{}", pos.x, pos.z);
        return Ok(());
    };

    apply_light(
        column,
        chunks_per_column,
        &pkt.sky_light_mask,
        &pkt.sky_light_arrays,
        LightKind::Sky,
    )?;
    apply_light(
        column,
        chunks_per_column,
        &pkt.block_light_mask,
        &pkt.block_light_arrays,
        LightKind::Block,
    )?;

    for chunk_y in 0..chunks_per_column {
        if column.is_occupied(chunk_y) {
            column.mark_dirty(chunk_y);
        }
    }

    Ok(())
}

/// Decodes `chunks_per_column` back-to-back palette-coded sections.
///
/// A chunk is allocated only when the section claims a nonzero block count,
/// so all-air sections stay null in the column.
fn decode_sections(
    mut data: &[u8],
    chunks_per_column: usize,
    column: &mut ChunkColumn,
) -> anyhow::Result<()> {
    let r = &mut data;

    for chunk_y in 0..chunks_per_column {
        let block_count = u16::decode(r)?;

        let chunk = decode_block_container(r, block_count)?;

        if let Some(chunk) = chunk {
            column.insert_chunk(chunk_y, chunk);
        }

        skip_biome_container(r)?;
    }

    if !r.is_empty() {
        // The declared size may exceed the encoded sections; the frame
        // boundary is authoritative.
        debug!("{} trailing bytes after chunk sections", r.len());
    }

    Ok(())
}

/// One block-state paletted container. Returns the decoded chunk, or `None`
/// for a section claiming zero blocks (whose payload is still consumed).
fn decode_block_container(
    r: &mut &[u8],
    block_count: u16,
) -> anyhow::Result<Option<Box<Chunk>>> {
    let bpb = u8::decode(r)?;

    // Palette layout by bits-per-block: single value at zero, an id list
    // below nine (indices clamped to at least four bits), direct ids
    // otherwise.
    let mut palette: Vec<u64> = Vec::new();
    let mut single = 0_u64;
    let mut effective_bits = usize::from(bpb);

    if bpb == 0 {
        single = VarInt::decode(r)?.0 as u32 as u64;
    } else if bpb < 9 {
        if effective_bits < 4 {
            effective_bits = 4;
        }

        let palette_len = VarInt::decode(r)?.0;
        ensure!(palette_len >= 0, "negative palette length of {palette_len}");
        ensure!(
            palette_len as usize <= SECTION_BLOCKS,
            "palette length of {palette_len} is out of bounds"
        );

        palette.reserve(palette_len as usize);
        for _ in 0..palette_len {
            palette.push(VarInt::decode(r)?.0 as u32 as u64);
        }
    } else if bpb > 32 {
        bail!("bits per block of {bpb} is out of bounds");
    }

    let data_len = VarInt::decode(r)?.0;
    ensure!(data_len >= 0, "negative data array length of {data_len}");

    let mut chunk = if block_count > 0 {
        let mut chunk = Chunk::new();

        // A single-value section has no data words to loop over.
        if bpb == 0 {
            for i in 0..SECTION_BLOCKS {
                chunk.set_block(i & 15, i >> 8, i >> 4 & 15, single as u32);
            }
        }

        Some(chunk)
    } else {
        None
    };

    if bpb > 0 {
        let id_mask = (1_u64 << effective_bits) - 1;
        let per_word = 64 / effective_bits;
        let mut cell = 0_usize;

        for _ in 0..data_len {
            let word = u64::decode(r)?;

            if let Some(chunk) = chunk.as_deref_mut() {
                for j in 0..per_word {
                    if cell >= SECTION_BLOCKS {
                        break;
                    }

                    let index = (word >> (j * effective_bits)) & id_mask;

                    let id = if palette.is_empty() {
                        index
                    } else {
                        *palette.get(index as usize).ok_or_else(|| {
                            anyhow::anyhow!("palette index of {index} is out of bounds")
                        })?
                    };

                    chunk.set_block(cell & 15, cell >> 8, cell >> 4 & 15, id as u32);
                    cell += 1;
                }
            }
        }
    } else {
        // Consume the (normally empty) data array.
        for _ in 0..data_len {
            u64::decode(r)?;
        }
    }

    Ok(chunk)
}

/// Consumes a biome paletted container without retaining it. Biomes use the
/// same layout over 4x4x4 cells with a direct threshold of four bits.
fn skip_biome_container(r: &mut &[u8]) -> anyhow::Result<()> {
    let bpe = u8::decode(r)?;

    if bpe == 0 {
        VarInt::decode(r)?;
    } else if bpe < 4 {
        let palette_len = VarInt::decode(r)?.0;
        ensure!(
            (0..=64).contains(&palette_len),
            "biome palette length of {palette_len} is out of bounds"
        );
        for _ in 0..palette_len {
            VarInt::decode(r)?;
        }
    }

    let data_len = VarInt::decode(r)?.0;
    ensure!(data_len >= 0, "negative biome data length of {data_len}");

    for _ in 0..data_len {
        u64::decode(r)?;
    }

    Ok(())
}

#[derive(Copy, Clone)]
enum LightKind {
    Sky,
    Block,
}

/// Applies masked 2048-byte nibble arrays to the column's chunks.
///
/// Light sections cover the column plus one padding section below and
/// above; mask bit `s` maps to chunk `s - 1`. Padding sections and sections
/// whose chunk is null are consumed and dropped, matching how the lightmap
/// is stored only alongside block data.
fn apply_light(
    column: &mut ChunkColumn,
    chunks_per_column: usize,
    mask: &BitSet,
    arrays: &[&[u8]],
    kind: LightKind,
) -> anyhow::Result<()> {
    let light_sections = chunks_per_column + 2;
    let mut next_array = 0_usize;

    for s in 0..light_sections {
        if !mask.bit(s) {
            continue;
        }

        let Some(nibbles) = arrays.get(next_array) else {
            bail!(
                "light mask names {} sections but only {} arrays arrived",
                mask.count_ones(),
                arrays.len()
            );
        };
        next_array += 1;

        ensure!(
            nibbles.len() == SECTION_BLOCKS / 2,
            "light array of {} bytes (expected {})",
            nibbles.len(),
            SECTION_BLOCKS / 2
        );

        if s == 0 || s == light_sections - 1 {
            continue;
        }

        let chunk_y = s - 1;

        let Some(chunk) = column.chunk_mut(chunk_y) else {
            continue;
        };

        match kind {
            LightKind::Sky => chunk.fill_sky_light(nibbles),
            LightKind::Block => chunk.fill_block_light(nibbles),
        }
    }

    if next_array < arrays.len() {
        warn!(
            "{} unused light arrays past the mask",
            arrays.len() - next_array
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use calcite_protocol::Encode;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::dimension::DimensionType;

    fn world() -> WorldCache {
        let mut world = WorldCache::new();
        world.set_dimension(&DimensionType {
            name: "minecraft:test".into(),
            min_y: -64,
            height: 384,
            has_skylight: true,
            ambient_light: 0.0,
        });
        world
    }

    /// Encodes one section: block container plus an all-air biome container.
    fn push_section(buf: &mut Vec<u8>, block_count: u16, bpb: u8, palette: &[i32], data: &[u64]) {
        block_count.encode(&mut *buf).unwrap();
        bpb.encode(&mut *buf).unwrap();

        if bpb == 0 {
            assert_eq!(palette.len(), 1);
            VarInt(palette[0]).encode(&mut *buf).unwrap();
        } else if bpb < 9 {
            VarInt(palette.len() as i32).encode(&mut *buf).unwrap();
            for &id in palette {
                VarInt(id).encode(&mut *buf).unwrap();
            }
        }

        VarInt(data.len() as i32).encode(&mut *buf).unwrap();
        for &word in data {
            word.encode(&mut *buf).unwrap();
        }

        // Biome container: single biome, no data.
        0_u8.encode(&mut *buf).unwrap();
        VarInt(0).encode(&mut *buf).unwrap();
        VarInt(0).encode(&mut *buf).unwrap();
    }

    fn empty_column_payload(world: &WorldCache) -> Vec<u8> {
        let mut buf = vec![];
        for _ in 0..world.chunks_per_column() {
            push_section(&mut buf, 0, 0, &[0], &[]);
        }
        buf
    }

    #[test]
    fn single_value_section_fills_every_cell() {
        let mut buf = vec![];
        push_section(&mut buf, 4096, 0, &[42], &[]);

        let mut data = buf.as_slice();
        let block_count = u16::decode(&mut data).unwrap();
        let chunk = decode_block_container(&mut data, block_count)
            .unwrap()
            .unwrap();

        for y in 0..16 {
            for z in 0..16 {
                for x in 0..16 {
                    assert_eq!(chunk.block(x, y, z), 42);
                }
            }
        }
    }

    #[test]
    fn zero_block_count_allocates_no_chunk() {
        let mut buf = vec![];
        push_section(&mut buf, 0, 0, &[42], &[]);

        let mut data = buf.as_slice();
        let block_count = u16::decode(&mut data).unwrap();
        let chunk = decode_block_container(&mut data, block_count).unwrap();

        assert!(chunk.is_none());
        // The biome container must still have been consumed exactly.
        assert!(skip_biome_container(&mut data).is_ok());
        assert!(data.is_empty());
    }

    #[test]
    fn four_bit_palette_indices_decode_lsb_first() {
        // Indices 0,1,2,3 repeating, sixteen per word.
        let mut word = 0_u64;
        for j in 0..16 {
            word |= ((j % 4) as u64) << (j * 4);
        }

        let mut buf = vec![];
        push_section(&mut buf, 64, 4, &[100, 200, 300, 400], &[word; 256]);

        let mut data = buf.as_slice();
        let block_count = u16::decode(&mut data).unwrap();
        let chunk = decode_block_container(&mut data, block_count)
            .unwrap()
            .unwrap();

        let expected = [100, 200, 300, 400];
        for i in 0..16 {
            let (x, y, z) = (i & 15, i >> 8, i >> 4 & 15);
            assert_eq!(chunk.block(x, y, z), expected[i % 4], "cell {i}");
        }
    }

    #[test]
    fn sub_four_bpb_is_clamped_to_four() {
        // Declared bpb of 2 still packs indices at 4 bits.
        let mut word = 0_u64;
        for j in 0..16 {
            word |= ((j % 2) as u64) << (j * 4);
        }

        let mut buf = vec![];
        push_section(&mut buf, 64, 2, &[7, 8], &[word; 256]);

        let mut data = buf.as_slice();
        let block_count = u16::decode(&mut data).unwrap();
        let chunk = decode_block_container(&mut data, block_count)
            .unwrap()
            .unwrap();

        assert_eq!(chunk.block(0, 0, 0), 7);
        assert_eq!(chunk.block(1, 0, 0), 8);
        assert_eq!(chunk.block(2, 0, 0), 7);
    }

    #[test]
    fn full_column_with_light_lands_in_cache() {
        let mut world = world();

        let mut buf = vec![];
        // Chunk 0 (world y -64..-48) solid stone, everything above air.
        push_section(&mut buf, 4096, 0, &[1], &[]);
        for _ in 1..world.chunks_per_column() {
            push_section(&mut buf, 0, 0, &[0], &[]);
        }

        // Sky light over chunk 0 only: mask bit 1 (bit 0 is the padding
        // section below the world).
        let mut sky_mask = BitSet::new();
        sky_mask.set_bit(1);

        let nibbles = vec![0xff_u8; SECTION_BLOCKS / 2];

        let pkt = ChunkData {
            pos: ChunkPos::new(3, -7),
            heightmaps: calcite_nbt::Compound::new(),
            data: &buf,
            block_entities: vec![],
            sky_light_mask: sky_mask,
            block_light_mask: BitSet::new(),
            empty_sky_light_mask: BitSet::new(),
            empty_block_light_mask: BitSet::new(),
            sky_light_arrays: vec![&nibbles],
            block_light_arrays: vec![],
        };

        apply_chunk_data(&mut world, &pkt).unwrap();

        let column = world.column(ChunkPos::new(3, -7)).unwrap();
        assert!(column.is_occupied(0));
        assert!(!column.is_occupied(1));

        let chunk = column.chunk(0).unwrap();
        assert_eq!(chunk.block(0, 0, 0), 1);
        assert_eq!(chunk.sky_light(5, 5, 5), 15);
        assert_eq!(chunk.block_light(5, 5, 5), 0);

        assert_eq!(
            world.block(calcite_protocol::BlockPos::new(3 * 16 + 1, -64, -7 * 16 + 1)),
            1
        );
    }

    #[test]
    fn light_update_replaces_existing_light() {
        let mut world = world();

        let mut buf = vec![];
        push_section(&mut buf, 4096, 0, &[1], &[]);
        for _ in 1..world.chunks_per_column() {
            push_section(&mut buf, 0, 0, &[0], &[]);
        }

        let pkt = ChunkData {
            pos: ChunkPos::new(0, 0),
            heightmaps: calcite_nbt::Compound::new(),
            data: &buf,
            block_entities: vec![],
            sky_light_mask: BitSet::new(),
            block_light_mask: BitSet::new(),
            empty_sky_light_mask: BitSet::new(),
            empty_block_light_mask: BitSet::new(),
            sky_light_arrays: vec![],
            block_light_arrays: vec![],
        };

        apply_chunk_data(&mut world, &pkt).unwrap();

        let mut block_mask = BitSet::new();
        block_mask.set_bit(1);
        let nibbles = vec![0x77_u8; SECTION_BLOCKS / 2];

        let update = UpdateLight {
            chunk_x: VarInt(0),
            chunk_z: VarInt(0),
            sky_light_mask: BitSet::new(),
            block_light_mask: block_mask,
            empty_sky_light_mask: BitSet::new(),
            empty_block_light_mask: BitSet::new(),
            sky_light_arrays: vec![],
            block_light_arrays: vec![&nibbles],
        };

        apply_update_light(&mut world, &update).unwrap();

        let chunk = world.column(ChunkPos::new(0, 0)).unwrap().chunk(0).unwrap();
        assert_eq!(chunk.block_light(0, 0, 0), 7);
        assert_eq!(chunk.sky_light(0, 0, 0), 0);
    }

    #[test]
    fn truncated_section_data_is_an_error() {
        let mut world = world();

        let buf = empty_column_payload(&world);

        let pkt = ChunkData {
            pos: ChunkPos::new(0, 0),
            heightmaps: calcite_nbt::Compound::new(),
            data: &buf[..buf.len() / 2],
            block_entities: vec![],
            sky_light_mask: BitSet::new(),
            block_light_mask: BitSet::new(),
            empty_sky_light_mask: BitSet::new(),
            empty_block_light_mask: BitSet::new(),
            sky_light_arrays: vec![],
            block_light_arrays: vec![],
        };

        assert!(apply_chunk_data(&mut world, &pkt).is_err());
    }
}
