//! Drives a client against a scripted server through the full
//! Login -> Configuration -> Play sequence, with compression enabled
//! mid-login and a dimension registered from the registry codec.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::{Duration, Instant};

use calcite::nbt::{Compound, List, Value};
use calcite::protocol::packets::configuration::{FinishConfigurationS2c, RegistryData};
use calcite::protocol::packets::handshaking::{Handshake, HandshakeNextState};
use calcite::protocol::packets::login::{LoginHello, LoginSuccess, SetCompression};
use calcite::protocol::packets::play::{GameJoin, SynchronizePlayerPosition};
use calcite::protocol::{
    packet_id, Encode, Packet, PacketDecoder, PacketEncoder, PacketFrame, VarInt,
};
use calcite::{Client, ProtocolState};
use uuid::Uuid;

const COMPRESSION_THRESHOLD: i32 = 256;
const TELEPORT_ID: i32 = 7;

fn next_frame(stream: &mut TcpStream, decoder: &mut PacketDecoder) -> PacketFrame {
    loop {
        if let Some(frame) = decoder.try_next_packet().unwrap() {
            return frame;
        }

        let mut buf = [0_u8; 4096];
        let n = stream.read(&mut buf).unwrap();
        assert!(n > 0, "client closed the connection early");
        decoder.queue_slice(&buf[..n]);
    }
}

fn send<P: Packet + Encode>(stream: &mut TcpStream, encoder: &mut PacketEncoder, pkt: &P) {
    encoder.append_packet(pkt).unwrap();
    stream.write_all(&encoder.take()).unwrap();
}

fn dimension_codec() -> Compound {
    let mut element = Compound::new();
    element.insert("min_y", -64_i32);
    element.insert("height", 384_i32);
    element.insert("has_skylight", 1_i8);
    element.insert("ambient_light", 0.0_f32);

    let mut entry = Compound::new();
    entry.insert("name", "minecraft:overworld");
    entry.insert("id", 0_i32);
    entry.insert("element", element);

    let mut registry = Compound::new();
    registry.insert("type", "minecraft:dimension_type");
    registry.insert("value", Value::List(List::Compound(vec![entry])));

    let mut codec = Compound::new();
    codec.insert("minecraft:dimension_type", registry);
    codec
}

/// The scripted server half. Returns the serverbound packet ids it saw, in
/// order, tagged with the state they arrived in.
fn run_server(listener: TcpListener) -> Vec<(&'static str, i32)> {
    let (mut stream, _) = listener.accept().unwrap();
    stream.set_nodelay(true).unwrap();

    let mut decoder = PacketDecoder::new();
    let mut encoder = PacketEncoder::new();
    let mut received = Vec::new();

    // Handshake.
    let frame = next_frame(&mut stream, &mut decoder);
    received.push(("handshake", frame.id));
    let handshake: Handshake = frame.decode().unwrap();
    assert_eq!(handshake.next_state, HandshakeNextState::Login);
    assert_eq!(handshake.protocol_version.0, 764);

    // Login start.
    let frame = next_frame(&mut stream, &mut decoder);
    received.push(("login", frame.id));
    let hello: LoginHello = frame.decode().unwrap();
    assert_eq!(hello.username, "player");

    // Enable compression, then complete login under it.
    send(
        &mut stream,
        &mut encoder,
        &SetCompression {
            threshold: VarInt(COMPRESSION_THRESHOLD),
        },
    );
    encoder.set_compression(COMPRESSION_THRESHOLD.into());
    decoder.set_compression(COMPRESSION_THRESHOLD.into());

    send(
        &mut stream,
        &mut encoder,
        &LoginSuccess {
            uuid: Uuid::nil(),
            username: "player",
            properties: vec![],
        },
    );

    // Login acknowledged moves the connection to Configuration.
    let frame = next_frame(&mut stream, &mut decoder);
    assert_eq!(frame.id, packet_id::login::serverbound::LOGIN_ACKNOWLEDGED);
    received.push(("login", frame.id));

    send(&mut stream, &mut encoder, &RegistryData {
        codec: dimension_codec(),
    });
    send(&mut stream, &mut encoder, &FinishConfigurationS2c);

    // Read until the client acknowledges the end of configuration; it
    // also volunteers client information in this state.
    loop {
        let frame = next_frame(&mut stream, &mut decoder);
        received.push(("configuration", frame.id));

        if frame.id == packet_id::configuration::serverbound::FINISH_CONFIGURATION {
            break;
        }
    }

    send(&mut stream, &mut encoder, &GameJoin {
        entity_id: 1,
        is_hardcore: false,
        dimension_names: vec!["minecraft:overworld"],
        max_players: VarInt(20),
        view_distance: VarInt(12),
        simulation_distance: VarInt(12),
        reduced_debug_info: false,
        enable_respawn_screen: true,
        do_limited_crafting: false,
        dimension_type: "minecraft:overworld",
        dimension_name: "minecraft:overworld",
        hashed_seed: 0,
        game_mode: 0,
        previous_game_mode: -1,
        is_debug: false,
        is_flat: false,
        death_location: None,
        portal_cooldown: VarInt(0),
    });

    send(&mut stream, &mut encoder, &SynchronizePlayerPosition {
        x: 8.5,
        y: 65.0,
        z: 8.5,
        yaw: 0.0,
        pitch: 0.0,
        flags: 0,
        teleport_id: VarInt(TELEPORT_ID),
    });

    // The teleport confirmation proves the client reached Play.
    loop {
        let frame = next_frame(&mut stream, &mut decoder);
        received.push(("play", frame.id));

        if frame.id == packet_id::play::serverbound::CONFIRM_TELEPORTATION {
            let confirm: calcite::protocol::packets::play::ConfirmTeleportation =
                frame.decode().unwrap();
            assert_eq!(confirm.teleport_id.0, TELEPORT_ID);
            break;
        }
    }

    received
}

#[test]
fn login_to_play() {
    tracing_subscriber::fmt().with_test_writer().try_init().ok();

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let server = thread::spawn(move || run_server(listener));

    let mut client = Client::new();
    client.connection.connect("127.0.0.1", addr.port()).unwrap();
    client
        .connection
        .begin_login("127.0.0.1", addr.port(), "player", Uuid::nil())
        .unwrap();

    let deadline = Instant::now() + Duration::from_secs(10);
    let mut reached_configuration = false;

    while Instant::now() < deadline {
        client.tick().unwrap();

        reached_configuration |= client.connection.state() == ProtocolState::Configuration;

        if client.connection.state() == ProtocolState::Play
            && client.world.height() > 0
            && client.game.entity_id == 1
            && client.game.position.y == 65.0
        {
            break;
        }

        thread::sleep(Duration::from_millis(1));
    }

    // State walk: Login -> Configuration -> Play, nothing skipped.
    assert!(reached_configuration, "configuration state was never entered");
    assert_eq!(client.connection.state(), ProtocolState::Play);

    // Compression was enabled mid-login.
    assert_eq!(client.connection.compression().0, COMPRESSION_THRESHOLD);

    // The dimension registry came through the codec, and the world sized
    // itself to it: y range [-64, 320).
    let overworld = client.dimensions.by_name("minecraft:overworld").unwrap();
    assert_eq!(overworld.min_y, -64);
    assert_eq!(overworld.height, 384);
    assert_eq!(client.world.min_y(), -64);
    assert_eq!(client.world.min_y() + client.world.height() as i32, 320);

    assert_eq!(client.game.dimension_name, "minecraft:overworld");
    assert_eq!(client.game.position.y, 65.0);

    // The server saw the acks in protocol order.
    let received = server.join().unwrap();

    let login_ack = received
        .iter()
        .position(|&(state, id)| {
            state == "login" && id == packet_id::login::serverbound::LOGIN_ACKNOWLEDGED
        })
        .expect("login acknowledged");
    let finish_ack = received
        .iter()
        .position(|&(state, id)| {
            state == "configuration"
                && id == packet_id::configuration::serverbound::FINISH_CONFIGURATION
        })
        .expect("finish configuration acknowledged");
    let teleport = received
        .iter()
        .position(|&(state, id)| {
            state == "play" && id == packet_id::play::serverbound::CONFIRM_TELEPORTATION
        })
        .expect("teleport confirmed");

    assert!(login_ack < finish_ack);
    assert!(finish_ack < teleport);

    // The client also volunteered its settings during configuration.
    assert!(received.contains(&(
        "configuration",
        packet_id::configuration::serverbound::CLIENT_INFORMATION
    )));
}
