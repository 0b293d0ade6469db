use std::fmt;
use std::io::Write;

use anyhow::bail;
use bitfield_struct::bitfield;
use thiserror::Error;

use crate::{Decode, Encode};

/// An absolute block position in world space.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub const fn offset(self, x: i32, y: i32, z: i32) -> Self {
        Self::new(self.x + x, self.y + y, self.z + z)
    }

    /// The 64-bit wire form: 26 bits of x, 26 bits of z, 12 bits of y, all
    /// two's-complement.
    pub const fn packed(self) -> Result<PackedBlockPos, Error> {
        match (self.x, self.y, self.z) {
            (-0x2000000..=0x1ffffff, -0x800..=0x7ff, -0x2000000..=0x1ffffff) => {
                Ok(PackedBlockPos::new()
                    .with_x(self.x)
                    .with_y(self.y)
                    .with_z(self.z))
            }
            _ => Err(Error(self)),
        }
    }
}

#[bitfield(u64)]
#[derive(PartialEq, Eq, PartialOrd, Ord)]
pub struct PackedBlockPos {
    #[bits(12)]
    pub y: i32,
    #[bits(26)]
    pub z: i32,
    #[bits(26)]
    pub x: i32,
}

impl Encode for PackedBlockPos {
    fn encode(&self, w: impl Write) -> anyhow::Result<()> {
        self.into_bits().encode(w)
    }
}

impl Decode<'_> for PackedBlockPos {
    fn decode(r: &mut &[u8]) -> anyhow::Result<Self> {
        Ok(Self::from_bits(u64::decode(r)?))
    }
}

impl Encode for BlockPos {
    fn encode(&self, w: impl Write) -> anyhow::Result<()> {
        match self.packed() {
            Ok(p) => p.encode(w),
            Err(e) => bail!("{e}"),
        }
    }
}

impl Decode<'_> for BlockPos {
    fn decode(r: &mut &[u8]) -> anyhow::Result<Self> {
        PackedBlockPos::decode(r).map(Into::into)
    }
}

impl From<PackedBlockPos> for BlockPos {
    fn from(p: PackedBlockPos) -> Self {
        Self {
            x: p.x(),
            y: p.y(),
            z: p.z(),
        }
    }
}

impl From<(i32, i32, i32)> for BlockPos {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        BlockPos::new(x, y, z)
    }
}

impl From<BlockPos> for (i32, i32, i32) {
    fn from(pos: BlockPos) -> Self {
        (pos.x, pos.y, pos.z)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Error)]
#[error("block position of {0} is out of range")]
pub struct Error(pub BlockPos);

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&(self.x, self.y, self.z), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_position_packing() {
        let xzs = [
            (-33554432, true),
            (-33554433, false),
            (33554431, true),
            (33554432, false),
            (0, true),
            (1, true),
            (-1, true),
        ];
        let ys = [
            (-2048, true),
            (-2049, false),
            (2047, true),
            (2048, false),
            (0, true),
            (1, true),
            (-1, true),
        ];

        for (x, x_valid) in xzs {
            for (y, y_valid) in ys {
                for (z, z_valid) in xzs {
                    let pos = BlockPos::new(x, y, z);
                    if x_valid && y_valid && z_valid {
                        let c = pos.packed().unwrap();
                        assert_eq!((c.x(), c.y(), c.z()), (pos.x, pos.y, pos.z));
                    } else {
                        assert_eq!(pos.packed(), Err(Error(pos)));
                    }
                }
            }
        }
    }

    #[test]
    fn packed_max_positive() {
        // All three fields at their positive extremes.
        let packed = PackedBlockPos::from_bits(0x7fff_ffff_ffff_ffff);
        assert_eq!(packed.x(), 33554431);
        assert_eq!(packed.y(), 2047);
        assert_eq!(packed.z(), 33554431);
    }

    #[test]
    fn packed_sign_extension() {
        let pos = BlockPos::new(-1, -1, -1);
        let bits = pos.packed().unwrap().into_bits();
        assert_eq!(BlockPos::from(PackedBlockPos::from_bits(bits)), pos);
    }
}
