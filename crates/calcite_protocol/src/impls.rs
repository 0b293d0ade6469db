//! Implementations of [`Encode`] and [`Decode`] for primitives and common
//! foreign types.

use std::io::Write;
use std::mem;

use anyhow::ensure;
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use calcite_nbt::Compound;
use uuid::Uuid;

use crate::var_int::VarInt;
use crate::{Decode, Encode};

/// The protocol caps strings at this many characters unless a packet says
/// otherwise.
const MAX_STRING_CHARS: usize = 32767;

/// Prevents preallocating too much memory in case we get a malicious or
/// invalid sequence length.
fn cautious_capacity<Element>(size_hint: usize) -> usize {
    const MAX_PREALLOC_BYTES: usize = 1024 * 1024;

    if mem::size_of::<Element>() == 0 {
        0
    } else {
        size_hint.min(MAX_PREALLOC_BYTES / mem::size_of::<Element>())
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode(&self, w: impl Write) -> anyhow::Result<()> {
        (**self).encode(w)
    }
}

impl Encode for bool {
    fn encode(&self, mut w: impl Write) -> anyhow::Result<()> {
        Ok(w.write_u8(u8::from(*self))?)
    }
}

impl Decode<'_> for bool {
    fn decode(r: &mut &[u8]) -> anyhow::Result<Self> {
        let n = r.read_u8()?;
        ensure!(n <= 1, "boolean is not 0 or 1 (got {n})");
        Ok(n == 1)
    }
}

impl Encode for u8 {
    fn encode(&self, mut w: impl Write) -> anyhow::Result<()> {
        Ok(w.write_u8(*self)?)
    }

    fn encode_slice(slice: &[u8], mut w: impl Write) -> anyhow::Result<()> {
        Ok(w.write_all(slice)?)
    }
}

impl Decode<'_> for u8 {
    fn decode(r: &mut &[u8]) -> anyhow::Result<Self> {
        Ok(r.read_u8()?)
    }
}

impl Encode for i8 {
    fn encode(&self, mut w: impl Write) -> anyhow::Result<()> {
        Ok(w.write_i8(*self)?)
    }
}

impl Decode<'_> for i8 {
    fn decode(r: &mut &[u8]) -> anyhow::Result<Self> {
        Ok(r.read_i8()?)
    }
}

macro_rules! impl_int {
    ($ty:ty, $write:ident, $read:ident) => {
        impl Encode for $ty {
            fn encode(&self, mut w: impl Write) -> anyhow::Result<()> {
                Ok(w.$write::<BigEndian>(*self)?)
            }
        }

        impl Decode<'_> for $ty {
            fn decode(r: &mut &[u8]) -> anyhow::Result<Self> {
                Ok(r.$read::<BigEndian>()?)
            }
        }
    };
}

impl_int!(u16, write_u16, read_u16);
impl_int!(i16, write_i16, read_i16);
impl_int!(u32, write_u32, read_u32);
impl_int!(i32, write_i32, read_i32);
impl_int!(u64, write_u64, read_u64);
impl_int!(i64, write_i64, read_i64);
impl_int!(u128, write_u128, read_u128);
impl_int!(f32, write_f32, read_f32);
impl_int!(f64, write_f64, read_f64);

impl<T: Encode> Encode for Option<T> {
    fn encode(&self, mut w: impl Write) -> anyhow::Result<()> {
        match self {
            Some(t) => {
                true.encode(&mut w)?;
                t.encode(w)
            }
            None => false.encode(w),
        }
    }
}

impl<'a, T: Decode<'a>> Decode<'a> for Option<T> {
    fn decode(r: &mut &'a [u8]) -> anyhow::Result<Self> {
        Ok(if bool::decode(r)? {
            Some(T::decode(r)?)
        } else {
            None
        })
    }
}

impl Encode for str {
    fn encode(&self, mut w: impl Write) -> anyhow::Result<()> {
        let char_count = self.chars().count();

        ensure!(
            char_count <= MAX_STRING_CHARS,
            "char count of string exceeds maximum (expected <= {MAX_STRING_CHARS}, got \
             {char_count})"
        );

        VarInt(self.len() as i32).encode(&mut w)?;
        Ok(w.write_all(self.as_bytes())?)
    }
}

impl<'a> Decode<'a> for &'a str {
    fn decode(r: &mut &'a [u8]) -> anyhow::Result<Self> {
        let len = VarInt::decode(r)?.0;
        ensure!(len >= 0, "attempt to decode string with negative length");
        let len = len as usize;
        ensure!(
            len <= r.len(),
            "not enough data remaining to decode string of {len} bytes"
        );

        let (res, remaining) = r.split_at(len);
        let res = std::str::from_utf8(res)?;

        let char_count = res.chars().count();
        ensure!(
            char_count <= MAX_STRING_CHARS,
            "char count of string exceeds maximum (expected <= {MAX_STRING_CHARS}, got \
             {char_count})"
        );

        *r = remaining;

        Ok(res)
    }
}

impl Encode for String {
    fn encode(&self, w: impl Write) -> anyhow::Result<()> {
        self.as_str().encode(w)
    }
}

impl Decode<'_> for String {
    fn decode(r: &mut &[u8]) -> anyhow::Result<Self> {
        Ok(<&str>::decode(r)?.into())
    }
}

/// Slices are encoded with a leading VarInt element count.
impl<T: Encode> Encode for [T] {
    fn encode(&self, mut w: impl Write) -> anyhow::Result<()> {
        let len = self.len();
        ensure!(
            i32::try_from(len).is_ok(),
            "length of slice exceeds i32::MAX (got {len})"
        );

        VarInt(len as i32).encode(&mut w)?;
        T::encode_slice(self, w)
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, w: impl Write) -> anyhow::Result<()> {
        self.as_slice().encode(w)
    }
}

impl<'a, T: Decode<'a>> Decode<'a> for Vec<T> {
    fn decode(r: &mut &'a [u8]) -> anyhow::Result<Self> {
        let len = VarInt::decode(r)?.0;
        ensure!(len >= 0, "attempt to decode slice with negative length");
        let len = len as usize;

        let mut vec = Self::with_capacity(cautious_capacity::<T>(len));

        for _ in 0..len {
            vec.push(T::decode(r)?);
        }

        Ok(vec)
    }
}

/// A VarInt length prefix followed by that many raw bytes, borrowed from the
/// input.
impl<'a> Decode<'a> for &'a [u8] {
    fn decode(r: &mut &'a [u8]) -> anyhow::Result<Self> {
        let len = VarInt::decode(r)?.0;
        ensure!(len >= 0, "attempt to decode byte slice with negative length");
        let len = len as usize;
        ensure!(
            len <= r.len(),
            "not enough data remaining to decode byte slice of {len} bytes"
        );

        let (res, remaining) = r.split_at(len);
        *r = remaining;
        Ok(res)
    }
}

impl Encode for Uuid {
    fn encode(&self, w: impl Write) -> anyhow::Result<()> {
        self.as_u128().encode(w)
    }
}

impl<'a> Decode<'a> for Uuid {
    fn decode(r: &mut &'a [u8]) -> anyhow::Result<Self> {
        u128::decode(r).map(Uuid::from_u128)
    }
}

/// Network NBT: an unnamed root compound, or a single end tag for the empty
/// compound.
impl Encode for Compound {
    fn encode(&self, w: impl Write) -> anyhow::Result<()> {
        Ok(calcite_nbt::to_network(self, w)?)
    }
}

impl Decode<'_> for Compound {
    fn decode(r: &mut &[u8]) -> anyhow::Result<Self> {
        if r.first() == Some(&0) {
            *r = &r[1..];
            return Ok(Compound::new());
        }

        Ok(calcite_nbt::from_network(r)?)
    }
}
