//! Session-scoped player and world-clock state outside the chunk cache.

use calcite_protocol::ChunkPos;
use glam::DVec3;

/// Bits of the teleport flags byte marking coordinates as relative.
const RELATIVE_X: u8 = 0x01;
const RELATIVE_Y: u8 = 0x02;
const RELATIVE_Z: u8 = 0x04;
const RELATIVE_YAW: u8 = 0x08;
const RELATIVE_PITCH: u8 = 0x10;

#[derive(Debug)]
pub struct GameState {
    pub entity_id: i32,
    pub position: DVec3,
    pub yaw: f32,
    pub pitch: f32,
    pub on_ground: bool,
    pub health: f32,
    pub food: i32,
    pub world_age: i64,
    pub time_of_day: i64,
    pub center_chunk: ChunkPos,
    pub dimension_name: String,
    /// Flattened system chat lines since the last
    /// [`take_messages`](Self::take_messages).
    messages: Vec<String>,
    position_dirty: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            entity_id: -1,
            position: DVec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            on_ground: false,
            health: 20.0,
            food: 20,
            world_age: 0,
            time_of_day: 0,
            center_chunk: ChunkPos::new(0, 0),
            dimension_name: String::new(),
            messages: Vec::new(),
            position_dirty: false,
        }
    }
}

impl GameState {
    /// Applies a server teleport, honoring the per-component relative
    /// bits.
    pub fn apply_teleport(&mut self, x: f64, y: f64, z: f64, yaw: f32, pitch: f32, flags: u8) {
        self.position.x = if flags & RELATIVE_X != 0 {
            self.position.x + x
        } else {
            x
        };
        self.position.y = if flags & RELATIVE_Y != 0 {
            self.position.y + y
        } else {
            y
        };
        self.position.z = if flags & RELATIVE_Z != 0 {
            self.position.z + z
        } else {
            z
        };

        self.yaw = if flags & RELATIVE_YAW != 0 {
            self.yaw + yaw
        } else {
            yaw
        };
        self.pitch = if flags & RELATIVE_PITCH != 0 {
            self.pitch + pitch
        } else {
            pitch
        };

        self.position_dirty = true;
    }

    /// Marks the position as needing a serverbound movement packet.
    pub fn mark_moved(&mut self) {
        self.position_dirty = true;
    }

    pub fn take_position_dirty(&mut self) -> bool {
        std::mem::take(&mut self.position_dirty)
    }

    pub fn push_message(&mut self, message: String) {
        self.messages.push(message);
    }

    pub fn take_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }
}

/// Flattens a JSON text component to its plain text: the `text` field plus
/// every `extra` child, depth first. Non-object payloads pass through.
pub fn flatten_text(json: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(json) {
        Ok(value) => {
            let mut out = String::new();
            collect_text(&value, &mut out);
            out
        }
        Err(_) => json.to_owned(),
    }
}

fn collect_text(value: &serde_json::Value, out: &mut String) {
    match value {
        serde_json::Value::String(s) => out.push_str(s),
        serde_json::Value::Array(items) => {
            for item in items {
                collect_text(item, out);
            }
        }
        serde_json::Value::Object(map) => {
            if let Some(serde_json::Value::String(text)) = map.get("text") {
                out.push_str(text);
            }
            if let Some(extra) = map.get("extra") {
                collect_text(extra, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn teleport_relative_bits() {
        let mut game = GameState::default();
        game.apply_teleport(100.0, 64.0, -20.0, 90.0, 10.0, 0);

        assert_eq!(game.position, DVec3::new(100.0, 64.0, -20.0));
        assert_eq!(game.yaw, 90.0);

        // Relative y and pitch only.
        game.apply_teleport(0.0, 1.5, 0.0, 0.0, -5.0, RELATIVE_Y | RELATIVE_PITCH);

        assert_eq!(game.position, DVec3::new(0.0, 65.5, 0.0));
        assert_eq!(game.yaw, 0.0);
        assert_eq!(game.pitch, 5.0);

        assert!(game.take_position_dirty());
        assert!(!game.take_position_dirty());
    }

    #[test]
    fn text_component_flattening() {
        assert_eq!(flatten_text(r#"{"text":"hello"}"#), "hello");
        assert_eq!(
            flatten_text(r#"{"text":"a","extra":[{"text":"b"},{"text":"c"}]}"#),
            "abc"
        );
        assert_eq!(flatten_text(r#""plain""#), "plain");
        assert_eq!(flatten_text("not json"), "not json");
    }
}
