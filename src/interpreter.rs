//! The packet interpreter: drains whole frames from the connection and
//! dispatches them by protocol state and id.
//!
//! A handler that fails aborts only its own packet. The frame was already
//! split out of the stream, so the next packet is unaffected; the failure
//! is logged and interpretation continues.

use calcite_protocol::packet_id;
use calcite_protocol::packets::{configuration, login, play, status};
use calcite_protocol::{BlockPos, ChunkPos, PacketFrame, VarInt};
use calcite_world::ingest;
use tracing::{debug, info, trace, warn};

use crate::connection::ProtocolState;
use crate::game::flatten_text;
use crate::Client;

/// The chunks-per-tick rate the client advertises after each chunk batch.
const CHUNK_BATCH_RATE: f32 = 16.0;

impl Client {
    /// Interprets every complete packet queued on the connection. Returns
    /// the number of packets processed this call.
    pub fn interpret(&mut self) -> anyhow::Result<usize> {
        let mut processed = 0;

        loop {
            if self.connection.state() == ProtocolState::Closed {
                break;
            }

            let frame = match self.connection.try_next_packet() {
                Ok(Some(frame)) => frame,
                Ok(None) => break,
                Err(e) => {
                    // Framing is unrecoverable: the stream position is no
                    // longer trustworthy.
                    self.connection.close();
                    return Err(e.context("malformed packet framing"));
                }
            };

            if let Err(e) = self.dispatch(&frame) {
                warn!(
                    id = format!("{:#04x}", frame.id),
                    state = ?self.connection.state(),
                    "packet handler failed: {e:#}"
                );
            }

            processed += 1;
        }

        Ok(processed)
    }

    fn dispatch(&mut self, frame: &PacketFrame) -> anyhow::Result<()> {
        match self.connection.state() {
            ProtocolState::Status => self.handle_status(frame),
            ProtocolState::Login => self.handle_login(frame),
            ProtocolState::Configuration => self.handle_configuration(frame),
            ProtocolState::Play => self.handle_play(frame),
            ProtocolState::Handshake | ProtocolState::Closed => Ok(()),
        }
    }

    fn handle_status(&mut self, frame: &PacketFrame) -> anyhow::Result<()> {
        use packet_id::status::clientbound as id;

        match frame.id {
            id::STATUS_RESPONSE => {
                let pkt: status::StatusResponse = frame.decode()?;
                self.status_response = Some(pkt.json.to_owned());

                self.connection.send_packet(&status::PingRequest { payload: 0 })?;
            }
            id::PONG_RESPONSE => {
                let _pkt: status::PongResponse = frame.decode()?;
                self.connection.close();
            }
            other => trace!("ignoring status packet {other:#04x}"),
        }

        Ok(())
    }

    fn handle_login(&mut self, frame: &PacketFrame) -> anyhow::Result<()> {
        use packet_id::login::clientbound as id;

        match frame.id {
            id::DISCONNECT => {
                let pkt: login::LoginDisconnect = frame.decode()?;
                info!("disconnected during login: {}", flatten_text(pkt.reason));
                self.connection.close();
            }
            id::ENCRYPTION_REQUEST => {
                // Online-mode authentication is out of scope; bail out
                // cleanly rather than feeding the server garbage.
                warn!("server requires encryption, which is unsupported");
                self.connection.close();
            }
            id::SET_COMPRESSION => {
                let pkt: login::SetCompression = frame.decode()?;
                debug!(threshold = pkt.threshold.0, "compression enabled");
                self.connection.set_compression(pkt.threshold.0.into());
            }
            id::LOGIN_SUCCESS => {
                let pkt: login::LoginSuccess = frame.decode()?;
                info!(username = pkt.username, "login succeeded");

                self.connection.send_packet(&login::LoginAcknowledged)?;
                self.connection.set_state(ProtocolState::Configuration);

                self.connection.send_packet(&configuration::ClientInformation {
                    locale: "en_us",
                    view_distance: 12,
                    chat_mode: VarInt(0),
                    chat_colors: true,
                    displayed_skin_parts: 0x7f,
                    main_hand: VarInt(1),
                    enable_text_filtering: false,
                    allow_server_listings: true,
                })?;
            }
            id::PLUGIN_REQUEST => {
                let pkt: login::LoginPluginRequest = frame.decode()?;
                debug!(channel = pkt.channel, "login plugin request");

                self.connection.send_packet(&login::LoginPluginResponse {
                    message_id: pkt.message_id,
                    data: None,
                })?;
            }
            other => trace!("ignoring login packet {other:#04x}"),
        }

        Ok(())
    }

    fn handle_configuration(&mut self, frame: &PacketFrame) -> anyhow::Result<()> {
        use packet_id::configuration::clientbound as id;

        match frame.id {
            id::PLUGIN_MESSAGE => {
                let pkt: configuration::PluginMessageS2c = frame.decode()?;
                debug!(channel = pkt.channel, "configuration plugin message");

                if pkt.channel == "minecraft:brand" {
                    let mut data = Vec::new();
                    calcite_protocol::Encode::encode("calcite", &mut data)?;

                    self.connection.send_packet(&configuration::PluginMessageC2s {
                        channel: "minecraft:brand",
                        data: data.as_slice().into(),
                    })?;
                }
            }
            id::DISCONNECT => {
                let pkt: configuration::DisconnectS2c = frame.decode()?;
                info!(
                    "disconnected during configuration: {}",
                    flatten_text(pkt.reason)
                );
                self.connection.close();
            }
            id::FINISH_CONFIGURATION => {
                frame.decode::<configuration::FinishConfigurationS2c>()?;

                self.connection
                    .send_packet(&configuration::FinishConfigurationC2s)?;
                self.connection.set_state(ProtocolState::Play);
            }
            id::KEEP_ALIVE => {
                let pkt: configuration::KeepAliveS2c = frame.decode()?;
                self.connection
                    .send_packet(&configuration::KeepAliveC2s { id: pkt.id })?;
            }
            id::PING => {
                let pkt: configuration::PingS2c = frame.decode()?;
                self.connection
                    .send_packet(&configuration::PongC2s { id: pkt.id })?;
            }
            id::REGISTRY_DATA => {
                let pkt: configuration::RegistryData = frame.decode()?;

                match calcite_world::DimensionRegistry::from_codec(&pkt.codec) {
                    Ok(registry) => {
                        info!(dimension_types = registry.len(), "registry data received");
                        self.dimensions = registry;
                    }
                    Err(e) => warn!("failed to parse registry data: {e}"),
                }
            }
            id::RESOURCE_PACK | id::FEATURE_FLAGS | id::UPDATE_TAGS => {
                trace!("ignoring configuration packet {:#04x}", frame.id);
            }
            other => trace!("ignoring configuration packet {other:#04x}"),
        }

        Ok(())
    }

    fn handle_play(&mut self, frame: &PacketFrame) -> anyhow::Result<()> {
        use packet_id::play::clientbound as id;

        match frame.id {
            id::LOGIN => {
                let pkt: play::GameJoin = frame.decode()?;

                self.game.entity_id = pkt.entity_id;
                self.game.dimension_name = pkt.dimension_name.to_owned();

                self.select_dimension(pkt.dimension_type);
            }
            id::RESPAWN => {
                let pkt: play::Respawn = frame.decode()?;

                self.game.dimension_name = pkt.dimension_name.to_owned();
                self.select_dimension(pkt.dimension_type);
            }
            id::CHUNK_DATA => {
                let pkt: play::ChunkData = frame.decode()?;
                ingest::apply_chunk_data(&mut self.world, &pkt)?;
            }
            id::UNLOAD_CHUNK => {
                let pkt: play::UnloadChunk = frame.decode()?;
                self.world.unload_column(pkt.pos);
            }
            id::UPDATE_LIGHT => {
                let pkt: play::UpdateLight = frame.decode()?;
                ingest::apply_update_light(&mut self.world, &pkt)?;
            }
            id::BLOCK_UPDATE => {
                let pkt: play::BlockUpdate = frame.decode()?;
                self.world.set_block(pkt.position, pkt.block_id.0 as u32);
            }
            id::UPDATE_SECTION_BLOCKS => {
                let pkt: play::UpdateSectionBlocks = frame.decode()?;

                for entry in &pkt.blocks {
                    let value = entry.0 as u64;

                    let block_id = (value >> 12) as u32;
                    let x = (value >> 8 & 0xf) as i32;
                    let z = (value >> 4 & 0xf) as i32;
                    let y = (value & 0xf) as i32;

                    self.world.set_block(
                        BlockPos::new(
                            pkt.section.x * 16 + x,
                            pkt.section.y * 16 + y,
                            pkt.section.z * 16 + z,
                        ),
                        block_id,
                    );
                }
            }
            id::EXPLOSION => {
                let pkt: play::Explosion = frame.decode()?;

                let base = BlockPos::new(
                    pkt.x.floor() as i32,
                    pkt.y.floor() as i32,
                    pkt.z.floor() as i32,
                );

                for record in &pkt.records {
                    self.world.set_block(
                        base.offset(
                            i32::from(record.dx),
                            i32::from(record.dy),
                            i32::from(record.dz),
                        ),
                        0,
                    );
                }
            }
            id::KEEP_ALIVE => {
                let pkt: play::KeepAliveS2c = frame.decode()?;
                self.connection
                    .send_packet(&play::KeepAliveC2s { id: pkt.id })?;
            }
            id::SYNCHRONIZE_PLAYER_POSITION => {
                let pkt: play::SynchronizePlayerPosition = frame.decode()?;

                self.game
                    .apply_teleport(pkt.x, pkt.y, pkt.z, pkt.yaw, pkt.pitch, pkt.flags);

                self.connection.send_packet(&play::ConfirmTeleportation {
                    teleport_id: pkt.teleport_id,
                })?;
            }
            id::SET_CENTER_CHUNK => {
                let pkt: play::SetCenterChunk = frame.decode()?;

                self.game.center_chunk = ChunkPos::new(pkt.chunk_x.0, pkt.chunk_z.0);

                // Columns past half the cache grid would alias new arrivals
                // anyway; drop them as the window moves.
                self.world.retain_near(
                    self.game.center_chunk,
                    calcite_world::CACHE_SIZE as i32 / 2,
                );
            }
            id::SET_HEALTH => {
                let pkt: play::SetHealth = frame.decode()?;

                self.game.health = pkt.health;
                self.game.food = pkt.food.0;

                if pkt.health <= 0.0 {
                    // Request the respawn immediately; there is no death
                    // screen to sit on.
                    self.connection
                        .send_packet(&play::ClientStatus { action: VarInt(0) })?;
                }
            }
            id::UPDATE_TIME => {
                let pkt: play::UpdateTime = frame.decode()?;
                self.game.world_age = pkt.world_age;
                self.game.time_of_day = pkt.time_of_day;
            }
            id::SYSTEM_CHAT => {
                let pkt: play::SystemChat = frame.decode()?;

                if !pkt.overlay {
                    self.game.push_message(flatten_text(pkt.content));
                }
            }
            id::CHUNK_BATCH_START => {
                frame.decode::<play::ChunkBatchStart>()?;
            }
            id::CHUNK_BATCH_FINISHED => {
                let pkt: play::ChunkBatchFinished = frame.decode()?;
                trace!(chunks = pkt.batch_size.0, "chunk batch finished");

                self.connection.send_packet(&play::ChunkBatchReceived {
                    chunks_per_tick: CHUNK_BATCH_RATE,
                })?;
            }
            id::START_CONFIGURATION => {
                frame.decode::<play::StartConfiguration>()?;

                self.connection
                    .send_packet(&play::AcknowledgeConfiguration)?;
                self.connection.set_state(ProtocolState::Configuration);
                self.world.clear();
            }
            id::DISCONNECT => {
                let pkt: play::DisconnectS2c = frame.decode()?;
                info!("disconnected: {}", flatten_text(pkt.reason));
                self.connection.close();
            }
            id::GAME_EVENT => {
                let pkt: play::GameEvent = frame.decode()?;
                trace!(event = pkt.event, "game event");
            }
            other => trace!("ignoring play packet {other:#04x}"),
        }

        Ok(())
    }

    /// Switches the world to a dimension type from the registry codec,
    /// clearing the chunk cache.
    fn select_dimension(&mut self, dimension_type: &str) {
        match self.dimensions.by_name(dimension_type) {
            Some(dimension) => {
                info!(
                    name = dimension_type,
                    min_y = dimension.min_y,
                    height = dimension.height,
                    "dimension selected"
                );
                let dimension = dimension.clone();
                self.world.set_dimension(&dimension);
            }
            None => warn!("unknown dimension type {dimension_type:?}"),
        }
    }

    pub(crate) fn send_position(&mut self) -> anyhow::Result<()> {
        self.connection
            .send_packet(&play::SetPlayerPositionAndRotation {
                x: self.game.position.x,
                y: self.game.position.y,
                z: self.game.position.z,
                yaw: self.game.yaw,
                pitch: self.game.pitch,
                on_ground: self.game.on_ground,
            })
    }
}
