use std::io::Write;

use uuid::Uuid;

use crate::packet_id::login::{clientbound, serverbound};
use crate::packets::impl_packet;
use crate::raw::RawBytes;
use crate::var_int::VarInt;
use crate::{Decode, Encode};

/// Begins login. The profile id is the offline-mode UUID of the player.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LoginHello<'a> {
    pub username: &'a str,
    pub profile_id: Uuid,
}

impl_packet!(LoginHello<'_>, serverbound::HELLO);

impl Encode for LoginHello<'_> {
    fn encode(&self, mut w: impl Write) -> anyhow::Result<()> {
        self.username.encode(&mut w)?;
        self.profile_id.encode(w)
    }
}

impl<'a> Decode<'a> for LoginHello<'a> {
    fn decode(r: &mut &'a [u8]) -> anyhow::Result<Self> {
        Ok(Self {
            username: <&str>::decode(r)?,
            profile_id: Uuid::decode(r)?,
        })
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct LoginAcknowledged;

impl_packet!(LoginAcknowledged, serverbound::LOGIN_ACKNOWLEDGED);

impl Encode for LoginAcknowledged {
    fn encode(&self, _w: impl Write) -> anyhow::Result<()> {
        Ok(())
    }
}

impl Decode<'_> for LoginAcknowledged {
    fn decode(_r: &mut &[u8]) -> anyhow::Result<Self> {
        Ok(Self)
    }
}

/// A JSON text component explaining why login was refused.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LoginDisconnect<'a> {
    pub reason: &'a str,
}

impl_packet!(LoginDisconnect<'_>, clientbound::DISCONNECT);

impl Encode for LoginDisconnect<'_> {
    fn encode(&self, w: impl Write) -> anyhow::Result<()> {
        self.reason.encode(w)
    }
}

impl<'a> Decode<'a> for LoginDisconnect<'a> {
    fn decode(r: &mut &'a [u8]) -> anyhow::Result<Self> {
        Ok(Self {
            reason: <&str>::decode(r)?,
        })
    }
}

/// Online-mode authentication request. The client does not implement
/// encryption and disconnects when it receives this.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct EncryptionRequest<'a> {
    pub server_id: &'a str,
    pub public_key: &'a [u8],
    pub verify_token: &'a [u8],
}

impl_packet!(EncryptionRequest<'_>, clientbound::ENCRYPTION_REQUEST);

impl Encode for EncryptionRequest<'_> {
    fn encode(&self, mut w: impl Write) -> anyhow::Result<()> {
        self.server_id.encode(&mut w)?;
        self.public_key.encode(&mut w)?;
        self.verify_token.encode(w)
    }
}

impl<'a> Decode<'a> for EncryptionRequest<'a> {
    fn decode(r: &mut &'a [u8]) -> anyhow::Result<Self> {
        Ok(Self {
            server_id: <&str>::decode(r)?,
            public_key: <&[u8]>::decode(r)?,
            verify_token: <&[u8]>::decode(r)?,
        })
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LoginSuccess<'a> {
    pub uuid: Uuid,
    pub username: &'a str,
    pub properties: Vec<Property<'a>>,
}

impl_packet!(LoginSuccess<'_>, clientbound::LOGIN_SUCCESS);

impl Encode for LoginSuccess<'_> {
    fn encode(&self, mut w: impl Write) -> anyhow::Result<()> {
        self.uuid.encode(&mut w)?;
        self.username.encode(&mut w)?;
        self.properties.encode(w)
    }
}

impl<'a> Decode<'a> for LoginSuccess<'a> {
    fn decode(r: &mut &'a [u8]) -> anyhow::Result<Self> {
        Ok(Self {
            uuid: Uuid::decode(r)?,
            username: <&str>::decode(r)?,
            properties: Vec::decode(r)?,
        })
    }
}

/// A signed profile property, such as the skin blob.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Property<'a> {
    pub name: &'a str,
    pub value: &'a str,
    pub signature: Option<&'a str>,
}

impl Encode for Property<'_> {
    fn encode(&self, mut w: impl Write) -> anyhow::Result<()> {
        self.name.encode(&mut w)?;
        self.value.encode(&mut w)?;
        self.signature.encode(w)
    }
}

impl<'a> Decode<'a> for Property<'a> {
    fn decode(r: &mut &'a [u8]) -> anyhow::Result<Self> {
        Ok(Self {
            name: <&str>::decode(r)?,
            value: <&str>::decode(r)?,
            signature: Option::decode(r)?,
        })
    }
}

/// Enables compression for all packets after this one.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct SetCompression {
    pub threshold: VarInt,
}

impl_packet!(SetCompression, clientbound::SET_COMPRESSION);

impl Encode for SetCompression {
    fn encode(&self, w: impl Write) -> anyhow::Result<()> {
        self.threshold.encode(w)
    }
}

impl Decode<'_> for SetCompression {
    fn decode(r: &mut &[u8]) -> anyhow::Result<Self> {
        Ok(Self {
            threshold: VarInt::decode(r)?,
        })
    }
}

/// The client's answer to a plugin request; `data` is absent when the
/// channel was not understood.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LoginPluginResponse<'a> {
    pub message_id: VarInt,
    pub data: Option<RawBytes<'a>>,
}

impl_packet!(LoginPluginResponse<'_>, serverbound::PLUGIN_RESPONSE);

impl Encode for LoginPluginResponse<'_> {
    fn encode(&self, mut w: impl Write) -> anyhow::Result<()> {
        self.message_id.encode(&mut w)?;
        self.data.encode(w)
    }
}

impl<'a> Decode<'a> for LoginPluginResponse<'a> {
    fn decode(r: &mut &'a [u8]) -> anyhow::Result<Self> {
        Ok(Self {
            message_id: VarInt::decode(r)?,
            data: Option::decode(r)?,
        })
    }
}

/// A custom login plugin exchange. The client answers every request with
/// "not understood".
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LoginPluginRequest<'a> {
    pub message_id: VarInt,
    pub channel: &'a str,
    pub data: RawBytes<'a>,
}

impl_packet!(LoginPluginRequest<'_>, clientbound::PLUGIN_REQUEST);

impl Encode for LoginPluginRequest<'_> {
    fn encode(&self, mut w: impl Write) -> anyhow::Result<()> {
        self.message_id.encode(&mut w)?;
        self.channel.encode(&mut w)?;
        self.data.encode(w)
    }
}

impl<'a> Decode<'a> for LoginPluginRequest<'a> {
    fn decode(r: &mut &'a [u8]) -> anyhow::Result<Self> {
        Ok(Self {
            message_id: VarInt::decode(r)?,
            channel: <&str>::decode(r)?,
            data: RawBytes::decode(r)?,
        })
    }
}
