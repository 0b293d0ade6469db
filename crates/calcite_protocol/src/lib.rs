//! Wire-level building blocks for the Minecraft Java Edition protocol:
//! primitive codecs, packet framing with optional zlib compression, and the
//! packet definitions the calcite client speaks.
//!
//! The crate targets a single protocol version (see [`PROTOCOL_VERSION`]).

use std::io::Write;

use anyhow::Context;

pub mod bit_set;
pub mod block_pos;
pub mod chunk_pos;
pub mod chunk_section_pos;
pub mod decoder;
pub mod encoder;
mod impls;
pub mod packet_id;
pub mod packets;
mod raw;
pub mod var_int;
pub mod var_long;

pub use bit_set::BitSet;
pub use block_pos::BlockPos;
pub use chunk_pos::ChunkPos;
pub use chunk_section_pos::ChunkSectionPos;
pub use decoder::{PacketDecoder, PacketFrame};
pub use encoder::PacketEncoder;
pub use raw::RawBytes;
pub use var_int::VarInt;
pub use var_long::VarLong;
pub use {anyhow, bytes, calcite_nbt as nbt, uuid};

/// The maximum number of bytes in a single Minecraft packet.
pub const MAX_PACKET_SIZE: i32 = 2097152;

/// The Minecraft protocol version this crate targets.
pub const PROTOCOL_VERSION: i32 = 764;

/// The stringified name of the Minecraft version this crate targets.
pub const MINECRAFT_VERSION: &str = "1.20.2";

/// How large a packet body must be before the encoder compresses it.
///
/// If the inner value is >= 0, packets with encoded lengths >= the value are
/// compressed. A negative value disables compression entirely.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct CompressionThreshold(pub i32);

impl CompressionThreshold {
    /// No compression.
    pub const DEFAULT: Self = Self(-1);

    pub fn is_enabled(self) -> bool {
        self.0 >= 0
    }
}

impl Default for CompressionThreshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<i32> for CompressionThreshold {
    fn from(i: i32) -> Self {
        Self(i)
    }
}

/// Types that can be written to the Minecraft protocol. The inverse of
/// [`Decode`].
///
/// If a type also implements `Decode`, then encoding followed by decoding must
/// reproduce the original value while consuming exactly the written bytes.
pub trait Encode {
    fn encode(&self, w: impl Write) -> anyhow::Result<()>;

    /// Encodes a whole slice of values with no length prefix.
    ///
    /// Equivalent to encoding each element in sequence, but `u8` overrides
    /// this with a single `write_all`.
    fn encode_slice(slice: &[Self], mut w: impl Write) -> anyhow::Result<()>
    where
        Self: Sized,
    {
        for value in slice {
            value.encode(&mut w)?;
        }

        Ok(())
    }
}

/// Types that can be read from the Minecraft protocol. The inverse of
/// [`Encode`].
///
/// The lifetime parameter allows decoded values to borrow from the input byte
/// slice. Implementations shrink the slice from the front as bytes are
/// consumed.
pub trait Decode<'a>: Sized {
    fn decode(r: &mut &'a [u8]) -> anyhow::Result<Self>;
}

/// A Minecraft packet: a [`VarInt`] id followed by a body. The `Encode` and
/// `Decode` impls on the type cover only the body.
pub trait Packet: std::fmt::Debug {
    /// The leading VarInt id of this packet.
    const ID: i32;
    /// The name of this packet for debugging purposes.
    const NAME: &'static str;

    /// Encodes this packet's VarInt id followed by its body.
    fn encode_with_id(&self, mut w: impl Write) -> anyhow::Result<()>
    where
        Self: Encode,
    {
        VarInt(Self::ID)
            .encode(&mut w)
            .context("failed to encode packet id")?;

        self.encode(w)
    }
}
