use std::io::Write;

use calcite_nbt::Compound;

use crate::bit_set::BitSet;
use crate::block_pos::BlockPos;
use crate::chunk_pos::ChunkPos;
use crate::chunk_section_pos::ChunkSectionPos;
use crate::packet_id::play::{clientbound, serverbound};
use crate::packets::impl_packet;
use crate::var_int::VarInt;
use crate::var_long::VarLong;
use crate::{Decode, Encode};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct BlockUpdate {
    pub position: BlockPos,
    pub block_id: VarInt,
}

impl_packet!(BlockUpdate, clientbound::BLOCK_UPDATE);

impl Encode for BlockUpdate {
    fn encode(&self, mut w: impl Write) -> anyhow::Result<()> {
        self.position.encode(&mut w)?;
        self.block_id.encode(w)
    }
}

impl Decode<'_> for BlockUpdate {
    fn decode(r: &mut &[u8]) -> anyhow::Result<Self> {
        Ok(Self {
            position: BlockPos::decode(r)?,
            block_id: VarInt::decode(r)?,
        })
    }
}

/// Relative block offsets cleared by an explosion, followed by the knockback
/// applied to the player.
#[derive(Clone, PartialEq, Debug)]
pub struct Explosion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub strength: f32,
    pub records: Vec<ExplosionRecord>,
    pub player_motion_x: f32,
    pub player_motion_y: f32,
    pub player_motion_z: f32,
}

impl_packet!(Explosion, clientbound::EXPLOSION);

impl Encode for Explosion {
    fn encode(&self, mut w: impl Write) -> anyhow::Result<()> {
        self.x.encode(&mut w)?;
        self.y.encode(&mut w)?;
        self.z.encode(&mut w)?;
        self.strength.encode(&mut w)?;
        self.records.encode(&mut w)?;
        self.player_motion_x.encode(&mut w)?;
        self.player_motion_y.encode(&mut w)?;
        self.player_motion_z.encode(w)
    }
}

impl Decode<'_> for Explosion {
    fn decode(r: &mut &[u8]) -> anyhow::Result<Self> {
        Ok(Self {
            x: f64::decode(r)?,
            y: f64::decode(r)?,
            z: f64::decode(r)?,
            strength: f32::decode(r)?,
            records: Vec::decode(r)?,
            player_motion_x: f32::decode(r)?,
            player_motion_y: f32::decode(r)?,
            player_motion_z: f32::decode(r)?,
        })
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ExplosionRecord {
    pub dx: i8,
    pub dy: i8,
    pub dz: i8,
}

impl Encode for ExplosionRecord {
    fn encode(&self, mut w: impl Write) -> anyhow::Result<()> {
        self.dx.encode(&mut w)?;
        self.dy.encode(&mut w)?;
        self.dz.encode(w)
    }
}

impl Decode<'_> for ExplosionRecord {
    fn decode(r: &mut &[u8]) -> anyhow::Result<Self> {
        Ok(Self {
            dx: i8::decode(r)?,
            dy: i8::decode(r)?,
            dz: i8::decode(r)?,
        })
    }
}

/// Drops one chunk column. The wire order is z before x.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct UnloadChunk {
    pub pos: ChunkPos,
}

impl_packet!(UnloadChunk, clientbound::UNLOAD_CHUNK);

impl Encode for UnloadChunk {
    fn encode(&self, mut w: impl Write) -> anyhow::Result<()> {
        self.pos.z.encode(&mut w)?;
        self.pos.x.encode(w)
    }
}

impl Decode<'_> for UnloadChunk {
    fn decode(r: &mut &[u8]) -> anyhow::Result<Self> {
        let z = i32::decode(r)?;
        let x = i32::decode(r)?;
        Ok(Self {
            pos: ChunkPos::new(x, z),
        })
    }
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct GameEvent {
    pub event: u8,
    pub value: f32,
}

impl_packet!(GameEvent, clientbound::GAME_EVENT);

impl Encode for GameEvent {
    fn encode(&self, mut w: impl Write) -> anyhow::Result<()> {
        self.event.encode(&mut w)?;
        self.value.encode(w)
    }
}

impl Decode<'_> for GameEvent {
    fn decode(r: &mut &[u8]) -> anyhow::Result<Self> {
        Ok(Self {
            event: u8::decode(r)?,
            value: f32::decode(r)?,
        })
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

/// One full chunk column plus its light data. The palette-coded section
/// payload in `data` is opaque at this layer; the world model decodes it.
#[derive(Clone, PartialEq, Debug)]
pub struct ChunkData<'a> {
    pub pos: ChunkPos,
    pub heightmaps: Compound,
    pub data: &'a [u8],
    pub block_entities: Vec<BlockEntity>,
    pub sky_light_mask: BitSet,
    pub block_light_mask: BitSet,
    pub empty_sky_light_mask: BitSet,
    pub empty_block_light_mask: BitSet,
    pub sky_light_arrays: Vec<&'a [u8]>,
    pub block_light_arrays: Vec<&'a [u8]>,
}

impl_packet!(ChunkData<'_>, clientbound::CHUNK_DATA);

impl Encode for ChunkData<'_> {
    fn encode(&self, mut w: impl Write) -> anyhow::Result<()> {
        self.pos.x.encode(&mut w)?;
        self.pos.z.encode(&mut w)?;
        self.heightmaps.encode(&mut w)?;
        self.data.encode(&mut w)?;
        self.block_entities.encode(&mut w)?;
        self.sky_light_mask.encode(&mut w)?;
        self.block_light_mask.encode(&mut w)?;
        self.empty_sky_light_mask.encode(&mut w)?;
        self.empty_block_light_mask.encode(&mut w)?;
        self.sky_light_arrays.encode(&mut w)?;
        self.block_light_arrays.encode(w)
    }
}

impl<'a> Decode<'a> for ChunkData<'a> {
    fn decode(r: &mut &'a [u8]) -> anyhow::Result<Self> {
        Ok(Self {
            pos: ChunkPos::decode(r)?,
            heightmaps: Compound::decode(r)?,
            data: <&[u8]>::decode(r)?,
            block_entities: Vec::decode(r)?,
            sky_light_mask: BitSet::decode(r)?,
            block_light_mask: BitSet::decode(r)?,
            empty_sky_light_mask: BitSet::decode(r)?,
            empty_block_light_mask: BitSet::decode(r)?,
            sky_light_arrays: Vec::decode(r)?,
            block_light_arrays: Vec::decode(r)?,
        })
    }
}

/// A block entity within a chunk column. The x and z nibbles share one byte.
#[derive(Clone, PartialEq, Debug)]
pub struct BlockEntity {
    pub packed_xz: u8,
    pub y: i16,
    pub kind: VarInt,
    pub data: Compound,
}

impl Encode for BlockEntity {
    fn encode(&self, mut w: impl Write) -> anyhow::Result<()> {
        self.packed_xz.encode(&mut w)?;
        self.y.encode(&mut w)?;
        self.kind.encode(&mut w)?;
        self.data.encode(w)
    }
}

impl Decode<'_> for BlockEntity {
    fn decode(r: &mut &[u8]) -> anyhow::Result<Self> {
        Ok(Self {
            packed_xz: u8::decode(r)?,
            y: i16::decode(r)?,
            kind: VarInt::decode(r)?,
            data: Compound::decode(r)?,
        })
    }
}

/// Replaces light sections of an already loaded column.
#[derive(Clone, PartialEq, Debug)]
pub struct UpdateLight<'a> {
    pub chunk_x: VarInt,
    pub chunk_z: VarInt,
    pub sky_light_mask: BitSet,
    pub block_light_mask: BitSet,
    pub empty_sky_light_mask: BitSet,
    pub empty_block_light_mask: BitSet,
    pub sky_light_arrays: Vec<&'a [u8]>,
    pub block_light_arrays: Vec<&'a [u8]>,
}

impl_packet!(UpdateLight<'_>, clientbound::UPDATE_LIGHT);

impl Encode for UpdateLight<'_> {
    fn encode(&self, mut w: impl Write) -> anyhow::Result<()> {
        self.chunk_x.encode(&mut w)?;
        self.chunk_z.encode(&mut w)?;
        self.sky_light_mask.encode(&mut w)?;
        self.block_light_mask.encode(&mut w)?;
        self.empty_sky_light_mask.encode(&mut w)?;
        self.empty_block_light_mask.encode(&mut w)?;
        self.sky_light_arrays.encode(&mut w)?;
        self.block_light_arrays.encode(w)
    }
}

impl<'a> Decode<'a> for UpdateLight<'a> {
    fn decode(r: &mut &'a [u8]) -> anyhow::Result<Self> {
        Ok(Self {
            chunk_x: VarInt::decode(r)?,
            chunk_z: VarInt::decode(r)?,
            sky_light_mask: BitSet::decode(r)?,
            block_light_mask: BitSet::decode(r)?,
            empty_sky_light_mask: BitSet::decode(r)?,
            empty_block_light_mask: BitSet::decode(r)?,
            sky_light_arrays: Vec::decode(r)?,
            block_light_arrays: Vec::decode(r)?,
        })
    }
}

/// Starts the Play state. At this protocol version the dimension type is a
/// namespaced identifier into the registry codec, not a numeric id.
#[derive(Clone, PartialEq, Debug)]
pub struct GameJoin<'a> {
    pub entity_id: i32,
    pub is_hardcore: bool,
    pub dimension_names: Vec<&'a str>,
    pub max_players: VarInt,
    pub view_distance: VarInt,
    pub simulation_distance: VarInt,
    pub reduced_debug_info: bool,
    pub enable_respawn_screen: bool,
    pub do_limited_crafting: bool,
    pub dimension_type: &'a str,
    pub dimension_name: &'a str,
    pub hashed_seed: i64,
    pub game_mode: u8,
    pub previous_game_mode: i8,
    pub is_debug: bool,
    pub is_flat: bool,
    pub death_location: Option<DeathLocation<'a>>,
    pub portal_cooldown: VarInt,
}

impl_packet!(GameJoin<'_>, clientbound::LOGIN);

impl Encode for GameJoin<'_> {
    fn encode(&self, mut w: impl Write) -> anyhow::Result<()> {
        self.entity_id.encode(&mut w)?;
        self.is_hardcore.encode(&mut w)?;
        self.dimension_names.encode(&mut w)?;
        self.max_players.encode(&mut w)?;
        self.view_distance.encode(&mut w)?;
        self.simulation_distance.encode(&mut w)?;
        self.reduced_debug_info.encode(&mut w)?;
        self.enable_respawn_screen.encode(&mut w)?;
        self.do_limited_crafting.encode(&mut w)?;
        self.dimension_type.encode(&mut w)?;
        self.dimension_name.encode(&mut w)?;
        self.hashed_seed.encode(&mut w)?;
        self.game_mode.encode(&mut w)?;
        self.previous_game_mode.encode(&mut w)?;
        self.is_debug.encode(&mut w)?;
        self.is_flat.encode(&mut w)?;
        self.death_location.encode(&mut w)?;
        self.portal_cooldown.encode(w)
    }
}

impl<'a> Decode<'a> for GameJoin<'a> {
    fn decode(r: &mut &'a [u8]) -> anyhow::Result<Self> {
        Ok(Self {
            entity_id: i32::decode(r)?,
            is_hardcore: bool::decode(r)?,
            dimension_names: Vec::decode(r)?,
            max_players: VarInt::decode(r)?,
            view_distance: VarInt::decode(r)?,
            simulation_distance: VarInt::decode(r)?,
            reduced_debug_info: bool::decode(r)?,
            enable_respawn_screen: bool::decode(r)?,
            do_limited_crafting: bool::decode(r)?,
            dimension_type: <&str>::decode(r)?,
            dimension_name: <&str>::decode(r)?,
            hashed_seed: i64::decode(r)?,
            game_mode: u8::decode(r)?,
            previous_game_mode: i8::decode(r)?,
            is_debug: bool::decode(r)?,
            is_flat: bool::decode(r)?,
            death_location: Option::decode(r)?,
            portal_cooldown: VarInt::decode(r)?,
        })
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DeathLocation<'a> {
    pub dimension_name: &'a str,
    pub position: BlockPos,
}

impl Encode for DeathLocation<'_> {
    fn encode(&self, mut w: impl Write) -> anyhow::Result<()> {
        self.dimension_name.encode(&mut w)?;
        self.position.encode(w)
    }
}

impl<'a> Decode<'a> for DeathLocation<'a> {
    fn decode(r: &mut &'a [u8]) -> anyhow::Result<Self> {
        Ok(Self {
            dimension_name: <&str>::decode(r)?,
            position: BlockPos::decode(r)?,
        })
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct Respawn<'a> {
    pub dimension_type: &'a str,
    pub dimension_name: &'a str,
    pub hashed_seed: i64,
    pub game_mode: u8,
    pub previous_game_mode: i8,
    pub is_debug: bool,
    pub is_flat: bool,
    pub death_location: Option<DeathLocation<'a>>,
    pub portal_cooldown: VarInt,
    pub data_kept: u8,
}

impl_packet!(Respawn<'_>, clientbound::RESPAWN);

impl Encode for Respawn<'_> {
    fn encode(&self, mut w: impl Write) -> anyhow::Result<()> {
        self.dimension_type.encode(&mut w)?;
        self.dimension_name.encode(&mut w)?;
        self.hashed_seed.encode(&mut w)?;
        self.game_mode.encode(&mut w)?;
        self.previous_game_mode.encode(&mut w)?;
        self.is_debug.encode(&mut w)?;
        self.is_flat.encode(&mut w)?;
        self.death_location.encode(&mut w)?;
        self.portal_cooldown.encode(&mut w)?;
        self.data_kept.encode(w)
    }
}

impl<'a> Decode<'a> for Respawn<'a> {
    fn decode(r: &mut &'a [u8]) -> anyhow::Result<Self> {
        Ok(Self {
            dimension_type: <&str>::decode(r)?,
            dimension_name: <&str>::decode(r)?,
            hashed_seed: i64::decode(r)?,
            game_mode: u8::decode(r)?,
            previous_game_mode: i8::decode(r)?,
            is_debug: bool::decode(r)?,
            is_flat: bool::decode(r)?,
            death_location: Option::decode(r)?,
            portal_cooldown: VarInt::decode(r)?,
            data_kept: u8::decode(r)?,
        })
    }
}

/// Absolute or relative player teleport. The client must confirm with
/// [`ConfirmTeleportation`] echoing `teleport_id`.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SynchronizePlayerPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f32,
    pub pitch: f32,
    pub flags: u8,
    pub teleport_id: VarInt,
}

impl_packet!(
    SynchronizePlayerPosition,
    clientbound::SYNCHRONIZE_PLAYER_POSITION
);

impl Encode for SynchronizePlayerPosition {
    fn encode(&self, mut w: impl Write) -> anyhow::Result<()> {
        self.x.encode(&mut w)?;
        self.y.encode(&mut w)?;
        self.z.encode(&mut w)?;
        self.yaw.encode(&mut w)?;
        self.pitch.encode(&mut w)?;
        self.flags.encode(&mut w)?;
        self.teleport_id.encode(w)
    }
}

impl Decode<'_> for SynchronizePlayerPosition {
    fn decode(r: &mut &[u8]) -> anyhow::Result<Self> {
        Ok(Self {
            x: f64::decode(r)?,
            y: f64::decode(r)?,
            z: f64::decode(r)?,
            yaw: f32::decode(r)?,
            pitch: f32::decode(r)?,
            flags: u8::decode(r)?,
            teleport_id: VarInt::decode(r)?,
        })
    }
}

/// Batched relative block changes within one chunk section. Each entry packs
/// `id << 12 | x << 8 | z << 4 | y`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct UpdateSectionBlocks {
    pub section: ChunkSectionPos,
    pub blocks: Vec<VarLong>,
}

impl_packet!(UpdateSectionBlocks, clientbound::UPDATE_SECTION_BLOCKS);

impl Encode for UpdateSectionBlocks {
    fn encode(&self, mut w: impl Write) -> anyhow::Result<()> {
        self.section.encode(&mut w)?;
        self.blocks.encode(w)
    }
}

impl Decode<'_> for UpdateSectionBlocks {
    fn decode(r: &mut &[u8]) -> anyhow::Result<Self> {
        Ok(Self {
            section: ChunkSectionPos::decode(r)?,
            blocks: Vec::decode(r)?,
        })
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct SetCenterChunk {
    pub chunk_x: VarInt,
    pub chunk_z: VarInt,
}

impl_packet!(SetCenterChunk, clientbound::SET_CENTER_CHUNK);

impl Encode for SetCenterChunk {
    fn encode(&self, mut w: impl Write) -> anyhow::Result<()> {
        self.chunk_x.encode(&mut w)?;
        self.chunk_z.encode(w)
    }
}

impl Decode<'_> for SetCenterChunk {
    fn decode(r: &mut &[u8]) -> anyhow::Result<Self> {
        Ok(Self {
            chunk_x: VarInt::decode(r)?,
            chunk_z: VarInt::decode(r)?,
        })
    }
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SetHealth {
    pub health: f32,
    pub food: VarInt,
    pub saturation: f32,
}

impl_packet!(SetHealth, clientbound::SET_HEALTH);

impl Encode for SetHealth {
    fn encode(&self, mut w: impl Write) -> anyhow::Result<()> {
        self.health.encode(&mut w)?;
        self.food.encode(&mut w)?;
        self.saturation.encode(w)
    }
}

impl Decode<'_> for SetHealth {
    fn decode(r: &mut &[u8]) -> anyhow::Result<Self> {
        Ok(Self {
            health: f32::decode(r)?,
            food: VarInt::decode(r)?,
            saturation: f32::decode(r)?,
        })
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct UpdateTime {
    pub world_age: i64,
    pub time_of_day: i64,
}

impl_packet!(UpdateTime, clientbound::UPDATE_TIME);

impl Encode for UpdateTime {
    fn encode(&self, mut w: impl Write) -> anyhow::Result<()> {
        self.world_age.encode(&mut w)?;
        self.time_of_day.encode(w)
    }
}

impl Decode<'_> for UpdateTime {
    fn decode(r: &mut &[u8]) -> anyhow::Result<Self> {
        Ok(Self {
            world_age: i64::decode(r)?,
            time_of_day: i64::decode(r)?,
        })
    }
}

/// Moves the connection back into the Configuration state. Acknowledged with
/// [`AcknowledgeConfiguration`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct StartConfiguration;

impl_packet!(StartConfiguration, clientbound::START_CONFIGURATION);

impl Encode for StartConfiguration {
    fn encode(&self, _w: impl Write) -> anyhow::Result<()> {
        Ok(())
    }
}

impl Decode<'_> for StartConfiguration {
    fn decode(_r: &mut &[u8]) -> anyhow::Result<Self> {
        Ok(Self)
    }
}

/// A chat message not attributed to any player, as a JSON text component.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SystemChat<'a> {
    pub content: &'a str,
    pub overlay: bool,
}

impl_packet!(SystemChat<'_>, clientbound::SYSTEM_CHAT);

impl Encode for SystemChat<'_> {
    fn encode(&self, mut w: impl Write) -> anyhow::Result<()> {
        self.content.encode(&mut w)?;
        self.overlay.encode(w)
    }
}

impl<'a> Decode<'a> for SystemChat<'a> {
    fn decode(r: &mut &'a [u8]) -> anyhow::Result<Self> {
        Ok(Self {
            content: <&str>::decode(r)?,
            overlay: bool::decode(r)?,
        })
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ChunkBatchStart;

impl_packet!(ChunkBatchStart, clientbound::CHUNK_BATCH_START);

impl Encode for ChunkBatchStart {
    fn encode(&self, _w: impl Write) -> anyhow::Result<()> {
        Ok(())
    }
}

impl Decode<'_> for ChunkBatchStart {
    fn decode(_r: &mut &[u8]) -> anyhow::Result<Self> {
        Ok(Self)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ChunkBatchFinished {
    pub batch_size: VarInt,
}

impl_packet!(ChunkBatchFinished, clientbound::CHUNK_BATCH_FINISHED);

impl Encode for ChunkBatchFinished {
    fn encode(&self, w: impl Write) -> anyhow::Result<()> {
        self.batch_size.encode(w)
    }
}

impl Decode<'_> for ChunkBatchFinished {
    fn decode(r: &mut &[u8]) -> anyhow::Result<Self> {
        Ok(Self {
            batch_size: VarInt::decode(r)?,
        })
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ConfirmTeleportation {
    pub teleport_id: VarInt,
}

impl_packet!(ConfirmTeleportation, serverbound::CONFIRM_TELEPORTATION);

impl Encode for ConfirmTeleportation {
    fn encode(&self, w: impl Write) -> anyhow::Result<()> {
        self.teleport_id.encode(w)
    }
}

impl Decode<'_> for ConfirmTeleportation {
    fn decode(r: &mut &[u8]) -> anyhow::Result<Self> {
        Ok(Self {
            teleport_id: VarInt::decode(r)?,
        })
    }
}

/// Tells the server how many chunks per tick the client is willing to
/// receive in the next batch.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct ChunkBatchReceived {
    pub chunks_per_tick: f32,
}

impl_packet!(ChunkBatchReceived, serverbound::CHUNK_BATCH_RECEIVED);

impl Encode for ChunkBatchReceived {
    fn encode(&self, w: impl Write) -> anyhow::Result<()> {
        self.chunks_per_tick.encode(w)
    }
}

impl Decode<'_> for ChunkBatchReceived {
    fn decode(r: &mut &[u8]) -> anyhow::Result<Self> {
        Ok(Self {
            chunks_per_tick: f32::decode(r)?,
        })
    }
}

/// Action 0 requests respawn after death; action 1 opens the statistics
/// menu.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ClientStatus {
    pub action: VarInt,
}

impl_packet!(ClientStatus, serverbound::CLIENT_STATUS);

impl Encode for ClientStatus {
    fn encode(&self, w: impl Write) -> anyhow::Result<()> {
        self.action.encode(w)
    }
}

impl Decode<'_> for ClientStatus {
    fn decode(r: &mut &[u8]) -> anyhow::Result<Self> {
        Ok(Self {
            action: VarInt::decode(r)?,
        })
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct AcknowledgeConfiguration;

impl_packet!(
    AcknowledgeConfiguration,
    serverbound::ACKNOWLEDGE_CONFIGURATION
);

impl Encode for AcknowledgeConfiguration {
    fn encode(&self, _w: impl Write) -> anyhow::Result<()> {
        Ok(())
    }
}

impl Decode<'_> for AcknowledgeConfiguration {
    fn decode(_r: &mut &[u8]) -> anyhow::Result<Self> {
        Ok(Self)
    }
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SetPlayerPositionAndRotation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f32,
    pub pitch: f32,
    pub on_ground: bool,
}

impl_packet!(
    SetPlayerPositionAndRotation,
    serverbound::SET_PLAYER_POSITION_AND_ROTATION
);

impl Encode for SetPlayerPositionAndRotation {
    fn encode(&self, mut w: impl Write) -> anyhow::Result<()> {
        self.x.encode(&mut w)?;
        self.y.encode(&mut w)?;
        self.z.encode(&mut w)?;
        self.yaw.encode(&mut w)?;
        self.pitch.encode(&mut w)?;
        self.on_ground.encode(w)
    }
}

impl Decode<'_> for SetPlayerPositionAndRotation {
    fn decode(r: &mut &[u8]) -> anyhow::Result<Self> {
        Ok(Self {
            x: f64::decode(r)?,
            y: f64::decode(r)?,
            z: f64::decode(r)?,
            yaw: f32::decode(r)?,
            pitch: f32::decode(r)?,
            on_ground: bool::decode(r)?,
        })
    }
}
