use std::io::Write;

use crate::packet_id::status::{clientbound, serverbound};
use crate::packets::impl_packet;
use crate::{Decode, Encode};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct StatusRequest;

impl_packet!(StatusRequest, serverbound::STATUS_REQUEST);

impl Encode for StatusRequest {
    fn encode(&self, _w: impl Write) -> anyhow::Result<()> {
        Ok(())
    }
}

impl Decode<'_> for StatusRequest {
    fn decode(_r: &mut &[u8]) -> anyhow::Result<Self> {
        Ok(Self)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct PingRequest {
    pub payload: i64,
}

impl_packet!(PingRequest, serverbound::PING_REQUEST);

impl Encode for PingRequest {
    fn encode(&self, w: impl Write) -> anyhow::Result<()> {
        self.payload.encode(w)
    }
}

impl Decode<'_> for PingRequest {
    fn decode(r: &mut &[u8]) -> anyhow::Result<Self> {
        Ok(Self {
            payload: i64::decode(r)?,
        })
    }
}

/// The server list ping response. The payload is a JSON document the client
/// surfaces as-is.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct StatusResponse<'a> {
    pub json: &'a str,
}

impl_packet!(StatusResponse<'_>, clientbound::STATUS_RESPONSE);

impl Encode for StatusResponse<'_> {
    fn encode(&self, w: impl Write) -> anyhow::Result<()> {
        self.json.encode(w)
    }
}

impl<'a> Decode<'a> for StatusResponse<'a> {
    fn decode(r: &mut &'a [u8]) -> anyhow::Result<Self> {
        Ok(Self {
            json: <&str>::decode(r)?,
        })
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct PongResponse {
    pub payload: i64,
}

impl_packet!(PongResponse, clientbound::PONG_RESPONSE);

impl Encode for PongResponse {
    fn encode(&self, w: impl Write) -> anyhow::Result<()> {
        self.payload.encode(w)
    }
}

impl Decode<'_> for PongResponse {
    fn decode(r: &mut &[u8]) -> anyhow::Result<Self> {
        Ok(Self {
            payload: i64::decode(r)?,
        })
    }
}
