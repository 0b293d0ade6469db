use std::fmt;
use std::io::Write;

use bitfield_struct::bitfield;

use crate::block_pos::BlockPos;
use crate::chunk_pos::ChunkPos;
use crate::{Decode, Encode};

/// The position of one 16x16x16 chunk section.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ChunkSectionPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl ChunkSectionPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

/// The wire form used by section-relative block updates: 22 bits of x and z,
/// 20 bits of y, two's-complement.
#[bitfield(u64)]
#[derive(PartialEq, Eq, PartialOrd, Ord)]
pub struct PackedChunkSectionPos {
    #[bits(20)]
    pub y: i32,
    #[bits(22)]
    pub z: i32,
    #[bits(22)]
    pub x: i32,
}

impl Encode for ChunkSectionPos {
    fn encode(&self, w: impl Write) -> anyhow::Result<()> {
        PackedChunkSectionPos::new()
            .with_x(self.x)
            .with_y(self.y)
            .with_z(self.z)
            .into_bits()
            .encode(w)
    }
}

impl Decode<'_> for ChunkSectionPos {
    fn decode(r: &mut &[u8]) -> anyhow::Result<Self> {
        let p = PackedChunkSectionPos::from_bits(u64::decode(r)?);
        Ok(Self {
            x: p.x(),
            y: p.y(),
            z: p.z(),
        })
    }
}

impl From<BlockPos> for ChunkSectionPos {
    fn from(pos: BlockPos) -> Self {
        Self {
            x: pos.x.div_euclid(16),
            y: pos.y.div_euclid(16),
            z: pos.z.div_euclid(16),
        }
    }
}

impl From<ChunkSectionPos> for ChunkPos {
    fn from(pos: ChunkSectionPos) -> Self {
        ChunkPos {
            x: pos.x,
            z: pos.z,
        }
    }
}

impl fmt::Display for ChunkSectionPos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(&(self.x, self.y, self.z), f)
    }
}
