use std::io::Write;

use calcite_nbt::Compound;

use crate::packet_id::configuration::{clientbound, serverbound};
use crate::packets::impl_packet;
use crate::raw::RawBytes;
use crate::var_int::VarInt;
use crate::{Decode, Encode};

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PluginMessageS2c<'a> {
    pub channel: &'a str,
    pub data: RawBytes<'a>,
}

impl_packet!(PluginMessageS2c<'_>, clientbound::PLUGIN_MESSAGE);

impl Encode for PluginMessageS2c<'_> {
    fn encode(&self, mut w: impl Write) -> anyhow::Result<()> {
        self.channel.encode(&mut w)?;
        self.data.encode(w)
    }
}

impl<'a> Decode<'a> for PluginMessageS2c<'a> {
    fn decode(r: &mut &'a [u8]) -> anyhow::Result<Self> {
        Ok(Self {
            channel: <&str>::decode(r)?,
            data: RawBytes::decode(r)?,
        })
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PluginMessageC2s<'a> {
    pub channel: &'a str,
    pub data: RawBytes<'a>,
}

impl_packet!(PluginMessageC2s<'_>, serverbound::PLUGIN_MESSAGE);

impl Encode for PluginMessageC2s<'_> {
    fn encode(&self, mut w: impl Write) -> anyhow::Result<()> {
        self.channel.encode(&mut w)?;
        self.data.encode(w)
    }
}

impl<'a> Decode<'a> for PluginMessageC2s<'a> {
    fn decode(r: &mut &'a [u8]) -> anyhow::Result<Self> {
        Ok(Self {
            channel: <&str>::decode(r)?,
            data: RawBytes::decode(r)?,
        })
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DisconnectS2c<'a> {
    pub reason: &'a str,
}

impl_packet!(DisconnectS2c<'_>, clientbound::DISCONNECT);

impl Encode for DisconnectS2c<'_> {
    fn encode(&self, w: impl Write) -> anyhow::Result<()> {
        self.reason.encode(w)
    }
}

impl<'a> Decode<'a> for DisconnectS2c<'a> {
    fn decode(r: &mut &'a [u8]) -> anyhow::Result<Self> {
        Ok(Self {
            reason: <&str>::decode(r)?,
        })
    }
}

/// Ends the Configuration state. The client acknowledges with
/// [`FinishConfigurationC2s`] and enters Play.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct FinishConfigurationS2c;

impl_packet!(FinishConfigurationS2c, clientbound::FINISH_CONFIGURATION);

impl Encode for FinishConfigurationS2c {
    fn encode(&self, _w: impl Write) -> anyhow::Result<()> {
        Ok(())
    }
}

impl Decode<'_> for FinishConfigurationS2c {
    fn decode(_r: &mut &[u8]) -> anyhow::Result<Self> {
        Ok(Self)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct FinishConfigurationC2s;

impl_packet!(FinishConfigurationC2s, serverbound::FINISH_CONFIGURATION);

impl Encode for FinishConfigurationC2s {
    fn encode(&self, _w: impl Write) -> anyhow::Result<()> {
        Ok(())
    }
}

impl Decode<'_> for FinishConfigurationC2s {
    fn decode(_r: &mut &[u8]) -> anyhow::Result<Self> {
        Ok(Self)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct KeepAliveS2c {
    pub id: i64,
}

impl_packet!(KeepAliveS2c, clientbound::KEEP_ALIVE);

impl Encode for KeepAliveS2c {
    fn encode(&self, w: impl Write) -> anyhow::Result<()> {
        self.id.encode(w)
    }
}

impl Decode<'_> for KeepAliveS2c {
    fn decode(r: &mut &[u8]) -> anyhow::Result<Self> {
        Ok(Self {
            id: i64::decode(r)?,
        })
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct KeepAliveC2s {
    pub id: i64,
}

impl_packet!(KeepAliveC2s, serverbound::KEEP_ALIVE);

impl Encode for KeepAliveC2s {
    fn encode(&self, w: impl Write) -> anyhow::Result<()> {
        self.id.encode(w)
    }
}

impl Decode<'_> for KeepAliveC2s {
    fn decode(r: &mut &[u8]) -> anyhow::Result<Self> {
        Ok(Self {
            id: i64::decode(r)?,
        })
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct PingS2c {
    pub id: i32,
}

impl_packet!(PingS2c, clientbound::PING);

impl Encode for PingS2c {
    fn encode(&self, w: impl Write) -> anyhow::Result<()> {
        self.id.encode(w)
    }
}

impl Decode<'_> for PingS2c {
    fn decode(r: &mut &[u8]) -> anyhow::Result<Self> {
        Ok(Self {
            id: i32::decode(r)?,
        })
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct PongC2s {
    pub id: i32,
}

impl_packet!(PongC2s, serverbound::PONG);

impl Encode for PongC2s {
    fn encode(&self, w: impl Write) -> anyhow::Result<()> {
        self.id.encode(w)
    }
}

impl Decode<'_> for PongC2s {
    fn decode(r: &mut &[u8]) -> anyhow::Result<Self> {
        Ok(Self {
            id: i32::decode(r)?,
        })
    }
}

/// The registry codec: one NBT compound holding every registry, including
/// the dimension types the world model needs.
#[derive(Clone, PartialEq, Debug)]
pub struct RegistryData {
    pub codec: Compound,
}

impl_packet!(RegistryData, clientbound::REGISTRY_DATA);

impl Encode for RegistryData {
    fn encode(&self, w: impl Write) -> anyhow::Result<()> {
        self.codec.encode(w)
    }
}

impl Decode<'_> for RegistryData {
    fn decode(r: &mut &[u8]) -> anyhow::Result<Self> {
        Ok(Self {
            codec: Compound::decode(r)?,
        })
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FeatureFlags<'a> {
    pub flags: Vec<&'a str>,
}

impl_packet!(FeatureFlags<'_>, clientbound::FEATURE_FLAGS);

impl Encode for FeatureFlags<'_> {
    fn encode(&self, w: impl Write) -> anyhow::Result<()> {
        self.flags.encode(w)
    }
}

impl<'a> Decode<'a> for FeatureFlags<'a> {
    fn decode(r: &mut &'a [u8]) -> anyhow::Result<Self> {
        Ok(Self {
            flags: Vec::decode(r)?,
        })
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ClientInformation<'a> {
    pub locale: &'a str,
    pub view_distance: i8,
    pub chat_mode: VarInt,
    pub chat_colors: bool,
    pub displayed_skin_parts: u8,
    pub main_hand: VarInt,
    pub enable_text_filtering: bool,
    pub allow_server_listings: bool,
}

impl_packet!(ClientInformation<'_>, serverbound::CLIENT_INFORMATION);

impl Encode for ClientInformation<'_> {
    fn encode(&self, mut w: impl Write) -> anyhow::Result<()> {
        self.locale.encode(&mut w)?;
        self.view_distance.encode(&mut w)?;
        self.chat_mode.encode(&mut w)?;
        self.chat_colors.encode(&mut w)?;
        self.displayed_skin_parts.encode(&mut w)?;
        self.main_hand.encode(&mut w)?;
        self.enable_text_filtering.encode(&mut w)?;
        self.allow_server_listings.encode(w)
    }
}

impl<'a> Decode<'a> for ClientInformation<'a> {
    fn decode(r: &mut &'a [u8]) -> anyhow::Result<Self> {
        Ok(Self {
            locale: <&str>::decode(r)?,
            view_distance: i8::decode(r)?,
            chat_mode: VarInt::decode(r)?,
            chat_colors: bool::decode(r)?,
            displayed_skin_parts: u8::decode(r)?,
            main_hand: VarInt::decode(r)?,
            enable_text_filtering: bool::decode(r)?,
            allow_server_listings: bool::decode(r)?,
        })
    }
}
