use std::io::Write;

use anyhow::bail;
use byteorder::{ReadBytesExt, WriteBytesExt};

use crate::{Decode, Encode};

/// An `i64` encoded with variable length.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(transparent)]
pub struct VarLong(pub i64);

impl VarLong {
    /// The maximum number of bytes a VarLong can occupy on the wire.
    pub const MAX_SIZE: usize = 10;

    /// The exact number of bytes [`Encode::encode`] will write for this
    /// value.
    pub fn written_size(self) -> usize {
        match self.0 {
            0 => 1,
            n => (63 - n.leading_zeros() as usize) / 7 + 1,
        }
    }
}

impl Encode for VarLong {
    fn encode(&self, mut w: impl Write) -> anyhow::Result<()> {
        let mut n = self.0 as u64;

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

impl Decode<'_> for VarLong {
    fn decode(r: &mut &[u8]) -> anyhow::Result<Self> {
        let mut val = 0;
        for i in 0..Self::MAX_SIZE {
            let byte = r.read_u8()?;
            val |= (i64::from(byte) & 0b0111_1111) << (i * 7);
            if byte & 0b1000_0000 == 0 {
                return Ok(VarLong(val));
            }
        }
        bail!("VarLong is too large")
    }
}

impl From<i64> for VarLong {
    fn from(i: i64) -> Self {
        VarLong(i)
    }
}

impl From<VarLong> for i64 {
    fn from(i: VarLong) -> Self {
        i.0
    }
}

#[cfg(test)]
mod tests {
    use rand::{thread_rng, Rng};

    use super::*;

    #[test]
    fn varlong_boundary_encodings() {
        let cases: &[(i64, &[u8])] = &[
            (0, &[0x00]),
            (127, &[0x7f]),
            (128, &[0x80, 0x01]),
            (
                i64::MIN, // 2^63 as an unsigned quantity
                &[0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x01],
            ),
            (
                -1,
                &[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01],
            ),
        ];

        for (n, expected) in cases {
            let mut buf = vec![];
            VarLong(*n).encode(&mut buf).unwrap();
            assert_eq!(&buf, expected, "encoding of {n}");
        }
    }

    #[test]
    fn varlong_round_trip() {
        let mut rng = thread_rng();
        let mut buf = vec![];

        for n in (0..1_000_000)
            .map(|_| rng.gen())
            .chain([0, i64::MIN, i64::MAX])
        {
            VarLong(n).encode(&mut buf).unwrap();

            let mut slice = buf.as_slice();
            assert!(slice.len() <= VarLong::MAX_SIZE);
            assert_eq!(buf.len(), VarLong(n).written_size());

            assert_eq!(n, VarLong::decode(&mut slice).unwrap().0);

            assert!(slice.is_empty());
            buf.clear();
        }
    }
}
