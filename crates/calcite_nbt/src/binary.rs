//! The raw binary NBT codec.
//!
//! Decoding reads from a `&mut &[u8]`, shrinking the slice from the front so
//! it composes with the packet decode path. Recursion over compounds and
//! lists is capped at [`MAX_DEPTH`] to keep adversarial input from
//! overflowing the call stack.

use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};

use crate::compound::Compound;
use crate::error::{Error, Result};
use crate::list::List;
use crate::tag::Tag;
use crate::value::Value;

/// Maximum nesting depth of compounds and lists.
const MAX_DEPTH: usize = 512;

/// Decodes classic framing: a root tag byte, the root's name, then the root
/// compound. Returns the root name alongside the compound; an `End` root
/// yields an empty compound and empty name.
pub fn from_binary(r: &mut &[u8]) -> Result<(String, Compound)> {
    let mut state = DecodeState { r, depth: 0 };

    let tag = state.read_tag()?;

    if tag == Tag::End {
        return Ok((String::new(), Compound::new()));
    }

    if tag != Tag::Compound {
        return Err(Error::malformed(format!(
            "root tag must be a compound (got {})",
            tag.name()
        )));
    }

    let name = state.read_string()?;
    let compound = state.read_compound()?;

    debug_assert_eq!(state.depth, 0);

    Ok((name, compound))
}

/// Decodes network framing: as [`from_binary`] but with no root name.
pub fn from_network(r: &mut &[u8]) -> Result<Compound> {
    let mut state = DecodeState { r, depth: 0 };

    let tag = state.read_tag()?;

    if tag == Tag::End {
        return Ok(Compound::new());
    }

    if tag != Tag::Compound {
        return Err(Error::malformed(format!(
            "root tag must be a compound (got {})",
            tag.name()
        )));
    }

    let compound = state.read_compound()?;

    debug_assert_eq!(state.depth, 0);

    Ok(compound)
}

struct DecodeState<'a, 'b> {
    r: &'b mut &'a [u8],
    depth: usize,
}

impl<'a> DecodeState<'a, '_> {
    #[inline]
    fn check_depth<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= MAX_DEPTH {
            return Err(Error::TooDeep);
        }

        self.depth += 1;
        let res = f(self);
        self.depth -= 1;
        res
    }

    fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        if count > self.r.len() {
            return Err(Error::Incomplete);
        }

        let (bytes, remaining) = self.r.split_at(count);
        *self.r = remaining;
        Ok(bytes)
    }

    fn remaining(&self) -> usize {
        self.r.len()
    }

    fn read_tag(&mut self) -> Result<Tag> {
        Tag::from_byte(self.read_byte()? as u8)
    }

    fn read_byte(&mut self) -> Result<i8> {
        Ok(self.read_bytes(1)?[0] as i8)
    }

    fn read_short(&mut self) -> Result<i16> {
        Ok(i16::from_be_bytes(
            self.read_bytes(2)?.try_into().unwrap(),
        ))
    }

    fn read_int(&mut self) -> Result<i32> {
        Ok(i32::from_be_bytes(
            self.read_bytes(4)?.try_into().unwrap(),
        ))
    }

    fn read_long(&mut self) -> Result<i64> {
        Ok(i64::from_be_bytes(
            self.read_bytes(8)?.try_into().unwrap(),
        ))
    }

    fn read_float(&mut self) -> Result<f32> {
        Ok(f32::from_be_bytes(
            self.read_bytes(4)?.try_into().unwrap(),
        ))
    }

    fn read_double(&mut self) -> Result<f64> {
        Ok(f64::from_be_bytes(
            self.read_bytes(8)?.try_into().unwrap(),
        ))
    }

    /// Guards a length prefix against both negative values and values larger
    /// than what remains, so a hostile length can neither wrap nor trigger a
    /// huge preallocation.
    fn read_len(&mut self, what: &str, elem_size: usize) -> Result<usize> {
        let len = self.read_int()?;

        if len.is_negative() {
            return Err(Error::malformed(format!(
                "negative {what} length of {len}"
            )));
        }

        let len = len as usize;

        if len.saturating_mul(elem_size) > self.remaining() {
            return Err(Error::Incomplete);
        }

        Ok(len)
    }

    /// Names and string payloads are length-prefixed Java "modified UTF-8".
    fn read_string(&mut self) -> Result<String> {
        let len = self.read_short()? as u16 as usize;
        let bytes = self.read_bytes(len)?;

        match cesu8::from_java_cesu8(bytes) {
            Ok(str) => Ok(str.into_owned()),
            Err(_) => Err(Error::malformed("string is not valid modified UTF-8")),
        }
    }

    fn read_value(&mut self, tag: Tag) -> Result<Value> {
        Ok(match tag {
            Tag::End => {
                return Err(Error::malformed("unexpected end tag in value position"))
            }
            Tag::Byte => self.read_byte()?.into(),
            Tag::Short => self.read_short()?.into(),
            Tag::Int => self.read_int()?.into(),
            Tag::Long => self.read_long()?.into(),
            Tag::Float => self.read_float()?.into(),
            Tag::Double => self.read_double()?.into(),
            Tag::ByteArray => self.read_byte_array()?.into(),
            Tag::String => Value::String(self.read_string()?),
            Tag::List => self.check_depth(|st| st.read_any_list())?.into(),
            Tag::Compound => self.check_depth(|st| st.read_compound())?.into(),
            Tag::IntArray => self.read_int_array()?.into(),
            Tag::LongArray => self.read_long_array()?.into(),
        })
    }

    fn read_byte_array(&mut self) -> Result<Vec<i8>> {
        let len = self.read_len("byte array", 1)?;
        Ok(self.read_bytes(len)?.iter().map(|&b| b as i8).collect())
    }

    fn read_int_array(&mut self) -> Result<Vec<i32>> {
        let len = self.read_len("int array", 4)?;
        (0..len).map(|_| self.read_int()).collect()
    }

    fn read_long_array(&mut self) -> Result<Vec<i64>> {
        let len = self.read_len("long array", 8)?;
        (0..len).map(|_| self.read_long()).collect()
    }

    fn read_any_list(&mut self) -> Result<List> {
        let elem_tag = self.read_tag()?;

        Ok(match elem_tag {
            Tag::End => {
                let len = self.read_int()?;
                if len > 0 {
                    return Err(Error::malformed(format!(
                        "list of end tags has nonzero length of {len}"
                    )));
                }
                List::End
            }
            Tag::Byte => List::Byte(self.read_byte_array()?),
            Tag::Short => {
                let len = self.read_len("short list", 2)?;
                List::Short((0..len).map(|_| self.read_short()).collect::<Result<_>>()?)
            }
            Tag::Int => List::Int(self.read_int_array()?),
            Tag::Long => List::Long(self.read_long_array()?),
            Tag::Float => {
                let len = self.read_len("float list", 4)?;
                List::Float((0..len).map(|_| self.read_float()).collect::<Result<_>>()?)
            }
            Tag::Double => {
                let len = self.read_len("double list", 8)?;
                List::Double(
                    (0..len)
                        .map(|_| self.read_double())
                        .collect::<Result<_>>()?,
                )
            }
            Tag::ByteArray => {
                let len = self.read_len("byte array list", 4)?;
                List::ByteArray(
                    (0..len)
                        .map(|_| self.read_byte_array())
                        .collect::<Result<_>>()?,
                )
            }
            Tag::String => {
                let len = self.read_len("string list", 2)?;
                List::String(
                    (0..len)
                        .map(|_| self.read_string())
                        .collect::<Result<_>>()?,
                )
            }
            Tag::List => {
                let len = self.read_len("list list", 1)?;
                self.check_depth(|st| {
                    Ok(List::List(
                        (0..len)
                            .map(|_| st.read_any_list())
                            .collect::<Result<_>>()?,
                    ))
                })?
            }
            Tag::Compound => {
                let len = self.read_len("compound list", 1)?;
                self.check_depth(|st| {
                    Ok(List::Compound(
                        (0..len)
                            .map(|_| st.read_compound())
                            .collect::<Result<_>>()?,
                    ))
                })?
            }
            Tag::IntArray => {
                let len = self.read_len("int array list", 4)?;
                List::IntArray(
                    (0..len)
                        .map(|_| self.read_int_array())
                        .collect::<Result<_>>()?,
                )
            }
            Tag::LongArray => {
                let len = self.read_len("long array list", 8)?;
                List::LongArray(
                    (0..len)
                        .map(|_| self.read_long_array())
                        .collect::<Result<_>>()?,
                )
            }
        })
    }

    /// Reads name/value pairs until the end sentinel.
    fn read_compound(&mut self) -> Result<Compound> {
        let mut compound = Compound::new();

        loop {
            let tag = self.read_tag()?;

            if tag == Tag::End {
                return Ok(compound);
            }

            let name = self.read_string()?;
            let value = self.read_value(tag)?;

            compound.insert(name, value);
        }
    }
}

/// Encodes classic framing: root tag, root name, compound payload.
pub fn to_binary(compound: &Compound, mut w: impl Write, root_name: &str) -> Result<()> {
    w.write_u8(Tag::Compound as u8)?;
    write_string(&mut w, root_name)?;
    write_compound(&mut w, compound)
}

/// Encodes network framing: as [`to_binary`] without the root name.
pub fn to_network(compound: &Compound, mut w: impl Write) -> Result<()> {
    w.write_u8(Tag::Compound as u8)?;
    write_compound(&mut w, compound)
}

fn write_string(w: &mut impl Write, s: &str) -> Result<()> {
    let bytes = cesu8::to_java_cesu8(s);

    if bytes.len() > u16::MAX as usize {
        return Err(Error::malformed(format!(
            "string of {} bytes exceeds maximum length",
            bytes.len()
        )));
    }

    w.write_u16::<BigEndian>(bytes.len() as u16)?;
    Ok(w.write_all(&bytes)?)
}

fn write_compound(w: &mut impl Write, compound: &Compound) -> Result<()> {
    for (name, value) in compound {
        w.write_u8(value.tag() as u8)?;
        write_string(w, name)?;
        write_value(w, value)?;
    }

    w.write_u8(Tag::End as u8)?;
    Ok(())
}

fn write_value(w: &mut impl Write, value: &Value) -> Result<()> {
    match value {
        Value::Byte(v) => w.write_i8(*v)?,
        Value::Short(v) => w.write_i16::<BigEndian>(*v)?,
        Value::Int(v) => w.write_i32::<BigEndian>(*v)?,
        Value::Long(v) => w.write_i64::<BigEndian>(*v)?,
        Value::Float(v) => w.write_f32::<BigEndian>(*v)?,
        Value::Double(v) => w.write_f64::<BigEndian>(*v)?,
        Value::ByteArray(v) => {
            w.write_i32::<BigEndian>(v.len() as i32)?;
            for b in v {
                w.write_i8(*b)?;
            }
        }
        Value::String(v) => write_string(w, v)?,
        Value::List(v) => write_list(w, v)?,
        Value::Compound(v) => write_compound(w, v)?,
        Value::IntArray(v) => {
            w.write_i32::<BigEndian>(v.len() as i32)?;
            for n in v {
                w.write_i32::<BigEndian>(*n)?;
            }
        }
        Value::LongArray(v) => {
            w.write_i32::<BigEndian>(v.len() as i32)?;
            for n in v {
                w.write_i64::<BigEndian>(*n)?;
            }
        }
    }

    Ok(())
}

fn write_list(w: &mut impl Write, list: &List) -> Result<()> {
    w.write_u8(list.element_tag() as u8)?;
    w.write_i32::<BigEndian>(list.len() as i32)?;

    match list {
        List::End => {}
        List::Byte(v) => {
            for n in v {
                w.write_i8(*n)?;
            }
        }
        List::Short(v) => {
            for n in v {
                w.write_i16::<BigEndian>(*n)?;
            }
        }
        List::Int(v) => {
            for n in v {
                w.write_i32::<BigEndian>(*n)?;
            }
        }
        List::Long(v) => {
            for n in v {
                w.write_i64::<BigEndian>(*n)?;
            }
        }
        List::Float(v) => {
            for n in v {
                w.write_f32::<BigEndian>(*n)?;
            }
        }
        List::Double(v) => {
            for n in v {
                w.write_f64::<BigEndian>(*n)?;
            }
        }
        List::ByteArray(v) => {
            for arr in v {
                write_value(w, &Value::ByteArray(arr.clone()))?;
            }
        }
        List::String(v) => {
            for s in v {
                write_string(w, s)?;
            }
        }
        List::List(v) => {
            for l in v {
                write_list(w, l)?;
            }
        }
        List::Compound(v) => {
            for c in v {
                write_compound(w, c)?;
            }
        }
        List::IntArray(v) => {
            for arr in v {
                write_value(w, &Value::IntArray(arr.clone()))?;
            }
        }
        List::LongArray(v) => {
            for arr in v {
                write_value(w, &Value::LongArray(arr.clone()))?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::{thread_rng, Rng};

    use super::*;

    fn example_compound() -> Compound {
        let mut level = Compound::new();
        level.insert("byte", 5_i8);
        level.insert("short", -300_i16);
        level.insert("int", 0x7fff_ffff_i32);
        level.insert("long", -1_i64);
        level.insert("float", 1.5_f32);
        level.insert("double", -0.25_f64);
        level.insert("string", "hello \u{1F600} \0 world");
        level.insert("byte_array", vec![-1_i8, 0, 1]);
        level.insert("int_array", vec![1_i32, 2, 3]);
        level.insert("long_array", vec![i64::MIN, i64::MAX]);
        level.insert(
            "list",
            List::Compound(vec![
                [("name", Value::from("a"))].into_iter().collect(),
                [("name", Value::from("b"))].into_iter().collect(),
            ]),
        );

        let mut root = Compound::new();
        root.insert("level", level);
        root.insert("empty_list", List::End);
        root
    }

    #[test]
    fn binary_round_trip() {
        let compound = example_compound();

        let mut buf = vec![];
        to_binary(&compound, &mut buf, "root").unwrap();

        let mut slice = buf.as_slice();
        let (name, decoded) = from_binary(&mut slice).unwrap();

        assert!(slice.is_empty());
        assert_eq!(name, "root");
        assert_eq!(decoded, compound);
    }

    #[test]
    fn network_round_trip() {
        let compound = example_compound();

        let mut buf = vec![];
        to_network(&compound, &mut buf).unwrap();

        let mut slice = buf.as_slice();
        let decoded = from_network(&mut slice).unwrap();

        assert!(slice.is_empty());
        assert_eq!(decoded, compound);
    }

    #[test]
    fn every_prefix_is_incomplete() {
        let mut buf = vec![];
        to_network(&example_compound(), &mut buf).unwrap();

        for split in 1..buf.len() {
            let mut slice = &buf[..split];
            match from_network(&mut slice) {
                Err(Error::Incomplete) => {}
                other => panic!("prefix of {split} bytes: expected Incomplete, got {other:?}"),
            }
        }
    }

    #[test]
    fn random_bytes_terminate() {
        let mut rng = thread_rng();

        for _ in 0..10_000 {
            let len = rng.gen_range(0..256);
            let mut bytes: Vec<u8> = (0..len).map(|_| rng.gen()).collect();

            // Bias toward plausible structure so the fuzz reaches deeper
            // than the root tag check.
            if !bytes.is_empty() {
                bytes[0] = 10;
            }

            let mut slice = bytes.as_slice();
            let _ = from_network(&mut slice);
        }
    }

    #[test]
    fn deep_nesting_is_rejected() {
        let mut buf = vec![10_u8]; // root compound

        // A chain of single-entry compounds far past the depth bound.
        for _ in 0..MAX_DEPTH + 8 {
            buf.push(10); // child tag: compound
            buf.extend_from_slice(&[0, 1]); // name length 1
            buf.push(b'a');
        }

        let mut slice = buf.as_slice();
        match from_network(&mut slice) {
            Err(Error::TooDeep) => {}
            other => panic!("expected TooDeep, got {other:?}"),
        }
    }

    #[test]
    fn invalid_tag_byte_is_malformed() {
        // Root compound with an entry of tag 13.
        let buf = [10_u8, 13, 0, 1, b'x'];

        let mut slice = &buf[..];
        match from_network(&mut slice) {
            Err(Error::Malformed(_)) => {}
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn end_root_is_empty() {
        let mut slice = &[0_u8][..];
        assert_eq!(from_network(&mut slice).unwrap(), Compound::new());
        assert!(slice.is_empty());
    }
}
