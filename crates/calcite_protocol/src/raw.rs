use std::io::Write;

use crate::{Decode, Encode};

/// The remaining bytes of a packet body, without a length prefix. Used for
/// payloads the client passes through or ignores.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RawBytes<'a>(pub &'a [u8]);

impl Encode for RawBytes<'_> {
    fn encode(&self, mut w: impl Write) -> anyhow::Result<()> {
        Ok(w.write_all(self.0)?)
    }
}

impl<'a> Decode<'a> for RawBytes<'a> {
    fn decode(r: &mut &'a [u8]) -> anyhow::Result<Self> {
        let bytes = *r;
        *r = &[];
        Ok(Self(bytes))
    }
}

impl<'a> From<&'a [u8]> for RawBytes<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self(bytes)
    }
}
