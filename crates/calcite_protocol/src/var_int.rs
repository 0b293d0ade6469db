use std::io::{Read, Write};

use anyhow::bail;
use byteorder::{ReadBytesExt, WriteBytesExt};
use thiserror::Error;

use crate::{Decode, Encode};

/// An `i32` encoded with variable length. LEB128 with seven data bits per
/// byte; the high bit marks continuation.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(transparent)]
pub struct VarInt(pub i32);

impl VarInt {
    /// The maximum number of bytes a VarInt can occupy on the wire.
    pub const MAX_SIZE: usize = 5;

    /// The exact number of bytes [`Encode::encode`] will write for this
    /// value.
    pub fn written_size(self) -> usize {
        match self.0 {
            0 => 1,
            n => (31 - n.leading_zeros() as usize) / 7 + 1,
        }
    }

    /// Decodes from a reader that may not hold a whole VarInt yet. The
    /// distinction between "ran dry" and "malformed" lets the packet framer
    /// wait for more bytes rather than fail.
    pub fn decode_partial(mut r: impl Read) -> Result<i32, VarIntDecodeError> {
        let mut val = 0;
        for i in 0..Self::MAX_SIZE {
            let byte = r.read_u8().map_err(|_| VarIntDecodeError::Incomplete)?;
            val |= (i32::from(byte) & 0b0111_1111) << (i * 7);
            if byte & 0b1000_0000 == 0 {
                return Ok(val);
            }
        }

        Err(VarIntDecodeError::TooLarge)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Error)]
pub enum VarIntDecodeError {
    #[error("incomplete VarInt decode")]
    Incomplete,
    #[error("VarInt is too large")]
    TooLarge,
}

impl Encode for VarInt {
    fn encode(&self, mut w: impl Write) -> anyhow::Result<()> {
        let mut n = self.0 as u32;

        loop {
            if n & !0b0111_1111 == 0 {
                w.write_u8(n as u8)?;
                return Ok(());
            }

            w.write_u8(n as u8 & 0b0111_1111 | 0b1000_0000)?;
            n >>= 7;
        }
    }
}

impl Decode<'_> for VarInt {
    fn decode(r: &mut &[u8]) -> anyhow::Result<Self> {
        let mut val = 0;
        for i in 0..Self::MAX_SIZE {
            let byte = r.read_u8()?;
            val |= (i32::from(byte) & 0b0111_1111) << (i * 7);
            if byte & 0b1000_0000 == 0 {
                return Ok(VarInt(val));
            }
        }
        bail!("VarInt is too large")
    }
}

impl From<i32> for VarInt {
    fn from(i: i32) -> Self {
        VarInt(i)
    }
}

impl From<VarInt> for i32 {
    fn from(i: VarInt) -> Self {
        i.0
    }
}

#[cfg(test)]
mod tests {
    use rand::{thread_rng, Rng};

    use super::*;

    #[test]
    fn varint_boundary_encodings() {
        let cases: &[(i32, &[u8])] = &[
            (0, &[0x00]),
            (1, &[0x01]),
            (127, &[0x7f]),
            (128, &[0x80, 0x01]),
            (255, &[0xff, 0x01]),
            (25565, &[0xdd, 0xc7, 0x01]),
            (2097151, &[0xff, 0xff, 0x7f]),
            (i32::MAX, &[0xff, 0xff, 0xff, 0xff, 0x07]),
            (-1, &[0xff, 0xff, 0xff, 0xff, 0x0f]),
            (i32::MIN, &[0x80, 0x80, 0x80, 0x80, 0x08]),
        ];

        for (n, expected) in cases {
            let mut buf = vec![];
            VarInt(*n).encode(&mut buf).unwrap();
            assert_eq!(&buf, expected, "encoding of {n}");
        }
    }

    #[test]
    fn varint_written_size() {
        let mut rng = thread_rng();
        let mut buf = vec![];

        for n in (0..100_000)
            .map(|_| rng.gen())
            .chain([0, i32::MIN, i32::MAX])
            .map(VarInt)
        {
            buf.clear();
            n.encode(&mut buf).unwrap();
            assert_eq!(buf.len(), n.written_size());
        }
    }

    #[test]
    fn varint_round_trip() {
        let mut rng = thread_rng();
        let mut buf = vec![];

        for n in (0..1_000_000)
            .map(|_| rng.gen())
            .chain([0, i32::MIN, i32::MAX])
        {
            VarInt(n).encode(&mut buf).unwrap();

            let mut slice = buf.as_slice();
            assert!(slice.len() <= VarInt::MAX_SIZE);

            assert_eq!(n, VarInt::decode(&mut slice).unwrap().0);

            assert!(slice.is_empty());
            buf.clear();
        }
    }

    #[test]
    fn varint_incomplete_vs_malformed() {
        // A lone continuation byte is incomplete, not malformed.
        assert_eq!(
            VarInt::decode_partial(&[0x80][..]),
            Err(VarIntDecodeError::Incomplete)
        );

        // Six continuation bytes overflow the 32-bit range.
        assert_eq!(
            VarInt::decode_partial(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x01][..]),
            Err(VarIntDecodeError::TooLarge)
        );
    }
}
