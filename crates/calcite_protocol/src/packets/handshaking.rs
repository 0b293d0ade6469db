use std::io::Write;

use anyhow::bail;

use crate::packet_id;
use crate::packets::impl_packet;
use crate::var_int::VarInt;
use crate::{Decode, Encode};

/// The first packet of every connection. `next_state` selects whether the
/// connection proceeds to the Status or Login state.
#[derive(Clone, PartialEq, Debug)]
pub struct Handshake<'a> {
    pub protocol_version: VarInt,
    pub server_address: &'a str,
    pub server_port: u16,
    pub next_state: HandshakeNextState,
}

impl_packet!(Handshake<'_>, packet_id::handshaking::serverbound::INTENTION);

impl Encode for Handshake<'_> {
    fn encode(&self, mut w: impl Write) -> anyhow::Result<()> {
        self.protocol_version.encode(&mut w)?;
        self.server_address.encode(&mut w)?;
        self.server_port.encode(&mut w)?;
        self.next_state.encode(w)
    }
}

impl<'a> Decode<'a> for Handshake<'a> {
    fn decode(r: &mut &'a [u8]) -> anyhow::Result<Self> {
        Ok(Self {
            protocol_version: VarInt::decode(r)?,
            server_address: <&str>::decode(r)?,
            server_port: u16::decode(r)?,
            next_state: HandshakeNextState::decode(r)?,
        })
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum HandshakeNextState {
    Status,
    Login,
}

impl Encode for HandshakeNextState {
    fn encode(&self, w: impl Write) -> anyhow::Result<()> {
        let tag = match self {
            Self::Status => 1,
            Self::Login => 2,
        };
        VarInt(tag).encode(w)
    }
}

impl Decode<'_> for HandshakeNextState {
    fn decode(r: &mut &[u8]) -> anyhow::Result<Self> {
        match VarInt::decode(r)?.0 {
            1 => Ok(Self::Status),
            2 => Ok(Self::Login),
            n => bail!("invalid handshake next state of {n}"),
        }
    }
}
