//! The TCP connection: blocking connect and handshake, then a non-blocking
//! drain into the packet decoder each tick.

use std::io::{ErrorKind, Read, Write};
use std::net::TcpStream;

use calcite_protocol::packets::handshaking::{Handshake, HandshakeNextState};
use calcite_protocol::packets::login::LoginHello;
use calcite_protocol::packets::status::StatusRequest;
use calcite_protocol::var_int::VarInt;
use calcite_protocol::{
    CompressionThreshold, Encode, Packet, PacketDecoder, PacketEncoder, PacketFrame,
    PROTOCOL_VERSION,
};
use tracing::{debug, info};
use uuid::Uuid;

/// The protocol state machine. `Closed` is terminal.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum ProtocolState {
    #[default]
    Handshake,
    Status,
    Login,
    Configuration,
    Play,
    Closed,
}

/// One server connection and its framing state.
#[derive(Default)]
pub struct Connection {
    stream: Option<TcpStream>,
    decoder: PacketDecoder,
    encoder: PacketEncoder,
    state: ProtocolState,
    /// Framed bytes the non-blocking socket has not accepted yet.
    outbound: Vec<u8>,
}

impl Connection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ProtocolState {
        self.state
    }

    pub fn set_state(&mut self, state: ProtocolState) {
        debug!(?state, "protocol state change");
        self.state = state;
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some() && self.state != ProtocolState::Closed
    }

    /// Opens the socket. The connect itself is blocking; the stream goes
    /// non-blocking once the handshake is on the wire.
    pub fn connect(&mut self, host: &str, port: u16) -> anyhow::Result<()> {
        let stream = TcpStream::connect((host, port))?;
        stream.set_nodelay(true)?;

        info!(host, port, "connected");

        self.stream = Some(stream);
        self.state = ProtocolState::Handshake;
        Ok(())
    }

    /// Sends the handshake and login start, then switches to non-blocking
    /// reads for the rest of the session.
    pub fn begin_login(
        &mut self,
        host: &str,
        port: u16,
        username: &str,
        profile_id: Uuid,
    ) -> anyhow::Result<()> {
        self.send_packet(&Handshake {
            protocol_version: VarInt(PROTOCOL_VERSION),
            server_address: host,
            server_port: port,
            next_state: HandshakeNextState::Login,
        })?;

        self.set_state(ProtocolState::Login);

        self.send_packet(&LoginHello {
            username,
            profile_id,
        })?;

        self.flush_blocking()?;

        if let Some(stream) = &self.stream {
            stream.set_nonblocking(true)?;
        }

        Ok(())
    }

    /// Sends the handshake and status request for a server list ping.
    pub fn begin_status(&mut self, host: &str, port: u16) -> anyhow::Result<()> {
        self.send_packet(&Handshake {
            protocol_version: VarInt(PROTOCOL_VERSION),
            server_address: host,
            server_port: port,
            next_state: HandshakeNextState::Status,
        })?;

        self.set_state(ProtocolState::Status);
        self.send_packet(&StatusRequest)?;
        self.flush_blocking()?;

        if let Some(stream) = &self.stream {
            stream.set_nonblocking(true)?;
        }

        Ok(())
    }

    /// Drains whatever the socket has into the decoder without blocking.
    /// A zero-length read means the server hung up.
    pub fn fill_from_socket(&mut self) -> anyhow::Result<()> {
        let Some(stream) = &mut self.stream else {
            return Ok(());
        };

        let mut buf = [0_u8; 4096];

        loop {
            match stream.read(&mut buf) {
                Ok(0) => {
                    info!("server closed the connection");
                    self.close();
                    return Ok(());
                }
                Ok(n) => self.decoder.queue_slice(&buf[..n]),
                Err(e) if e.kind() == ErrorKind::WouldBlock => return Ok(()),
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    self.close();
                    return Err(e.into());
                }
            }
        }
    }

    pub fn try_next_packet(&mut self) -> anyhow::Result<Option<PacketFrame>> {
        self.decoder.try_next_packet()
    }

    /// Frames a packet into the outbound buffer. Bytes leave on the next
    /// [`flush`](Self::flush).
    pub fn send_packet<P>(&mut self, pkt: &P) -> anyhow::Result<()>
    where
        P: Packet + Encode,
    {
        self.encoder.append_packet(pkt)?;
        self.outbound.extend_from_slice(&self.encoder.take());
        Ok(())
    }

    /// Writes as much outbound data as the socket accepts.
    pub fn flush(&mut self) -> anyhow::Result<()> {
        let Some(stream) = &mut self.stream else {
            self.outbound.clear();
            return Ok(());
        };

        while !self.outbound.is_empty() {
            match stream.write(&self.outbound) {
                Ok(0) => {
                    self.close();
                    anyhow::bail!("socket closed while writing");
                }
                Ok(n) => {
                    self.outbound.drain(..n);
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => return Ok(()),
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    self.close();
                    return Err(e.into());
                }
            }
        }

        Ok(())
    }

    fn flush_blocking(&mut self) -> anyhow::Result<()> {
        if let Some(stream) = &mut self.stream {
            stream.write_all(&self.outbound)?;
            self.outbound.clear();
        }
        Ok(())
    }

    /// Enables compression on both directions.
    pub fn set_compression(&mut self, threshold: CompressionThreshold) {
        self.decoder.set_compression(threshold);
        self.encoder.set_compression(threshold);
    }

    pub fn compression(&self) -> CompressionThreshold {
        self.encoder.compression()
    }

    pub fn close(&mut self) {
        self.stream = None;
        self.state = ProtocolState::Closed;
    }
}
