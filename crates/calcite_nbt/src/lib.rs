//! Minecraft's Named Binary Tag (NBT) format.
//!
//! The client only ever meets NBT embedded in packets: registry codecs,
//! chunk heightmaps, block entity data. This crate therefore implements the
//! raw binary form without a GZIP/ZLIB envelope, in both the classic framing
//! (a named root compound) and the network framing introduced alongside the
//! Configuration state (an unnamed root).

mod binary;
mod compound;
mod error;
mod list;
mod tag;
mod value;

pub use binary::{from_binary, from_network, to_binary, to_network};
pub use compound::Compound;
pub use error::{Error, Result};
pub use list::List;
pub use tag::Tag;
pub use value::Value;
