//! Packet id constants for protocol 764 (Minecraft 1.20.2), grouped by
//! protocol state and direction. Only the ids the client sends or interprets
//! are listed.

pub mod handshaking {
    pub mod serverbound {
        pub const INTENTION: i32 = 0x00;
    }
}

pub mod status {
    pub mod clientbound {
        pub const STATUS_RESPONSE: i32 = 0x00;
        pub const PONG_RESPONSE: i32 = 0x01;
    }

    pub mod serverbound {
        pub const STATUS_REQUEST: i32 = 0x00;
        pub const PING_REQUEST: i32 = 0x01;
    }
}

pub mod login {
    pub mod clientbound {
        pub const DISCONNECT: i32 = 0x00;
        pub const ENCRYPTION_REQUEST: i32 = 0x01;
        pub const LOGIN_SUCCESS: i32 = 0x02;
        pub const SET_COMPRESSION: i32 = 0x03;
        pub const PLUGIN_REQUEST: i32 = 0x04;
    }

    pub mod serverbound {
        pub const HELLO: i32 = 0x00;
        pub const PLUGIN_RESPONSE: i32 = 0x02;
        pub const LOGIN_ACKNOWLEDGED: i32 = 0x03;
    }
}

pub mod configuration {
    pub mod clientbound {
        pub const PLUGIN_MESSAGE: i32 = 0x00;
        pub const DISCONNECT: i32 = 0x01;
        pub const FINISH_CONFIGURATION: i32 = 0x02;
        pub const KEEP_ALIVE: i32 = 0x03;
        pub const PING: i32 = 0x04;
        pub const REGISTRY_DATA: i32 = 0x05;
        pub const RESOURCE_PACK: i32 = 0x06;
        pub const FEATURE_FLAGS: i32 = 0x07;
        pub const UPDATE_TAGS: i32 = 0x08;
    }

    pub mod serverbound {
        pub const CLIENT_INFORMATION: i32 = 0x00;
        pub const PLUGIN_MESSAGE: i32 = 0x01;
        pub const FINISH_CONFIGURATION: i32 = 0x02;
        pub const KEEP_ALIVE: i32 = 0x03;
        pub const PONG: i32 = 0x04;
    }
}

pub mod play {
    pub mod clientbound {
        pub const BLOCK_UPDATE: i32 = 0x09;
        pub const CHUNK_BATCH_FINISHED: i32 = 0x0c;
        pub const CHUNK_BATCH_START: i32 = 0x0d;
        pub const DISCONNECT: i32 = 0x1b;
        pub const EXPLOSION: i32 = 0x1e;
        pub const UNLOAD_CHUNK: i32 = 0x1f;
        pub const GAME_EVENT: i32 = 0x20;
        pub const KEEP_ALIVE: i32 = 0x24;
        pub const CHUNK_DATA: i32 = 0x25;
        pub const UPDATE_LIGHT: i32 = 0x28;
        pub const LOGIN: i32 = 0x29;
        pub const SYNCHRONIZE_PLAYER_POSITION: i32 = 0x3e;
        pub const RESPAWN: i32 = 0x43;
        pub const UPDATE_SECTION_BLOCKS: i32 = 0x45;
        pub const SET_CENTER_CHUNK: i32 = 0x50;
        pub const SET_HEALTH: i32 = 0x59;
        pub const UPDATE_TIME: i32 = 0x60;
        pub const START_CONFIGURATION: i32 = 0x65;
        pub const SYSTEM_CHAT: i32 = 0x67;
    }

    pub mod serverbound {
        pub const CONFIRM_TELEPORTATION: i32 = 0x00;
        pub const CHUNK_BATCH_RECEIVED: i32 = 0x07;
        pub const CLIENT_STATUS: i32 = 0x08;
        pub const ACKNOWLEDGE_CONFIGURATION: i32 = 0x0b;
        pub const KEEP_ALIVE: i32 = 0x14;
        pub const SET_PLAYER_POSITION_AND_ROTATION: i32 = 0x17;
    }
}
