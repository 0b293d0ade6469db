//! The block texture array layout: every 16x16 sprite (or animation frame)
//! becomes one layer, and textures are addressed by their base layer.

use std::collections::HashMap;

/// Block sprites are 16x16; taller images are animation strips.
pub const TEXTURE_SIZE: u32 = 16;

/// `count` consecutive layers in the block texture array starting at
/// `base`. Animated textures own one layer per frame.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct TextureIdRange {
    pub base: u32,
    pub count: u32,
}

/// Destination for decoded texture layers; implemented by the renderer.
///
/// `brighten_mipping` is disabled for leaves so mip generation does not
/// wash out the cutout edges.
pub trait TextureUploader {
    fn begin(&mut self, width: u32, height: u32, layers: u32);
    fn push_layer(&mut self, layer: u32, rgba: &[u8], brighten_mipping: bool);
    fn commit(&mut self);
}

/// No-op sink for headless use and tests.
#[derive(Default)]
pub struct NullUploader;

impl TextureUploader for NullUploader {
    fn begin(&mut self, _width: u32, _height: u32, _layers: u32) {}
    fn push_layer(&mut self, _layer: u32, _rgba: &[u8], _brighten_mipping: bool) {}
    fn commit(&mut self) {}
}

/// Name-to-layer-range map for every block texture, with per-layer
/// transparency derived from the alpha channel.
#[derive(Default, Debug)]
pub struct TextureTable {
    ranges: HashMap<String, TextureIdRange>,
    transparent: Vec<bool>,
    layer_count: u32,
}

/// Zip path prefix that texture names are also interned without.
pub const TEXTURE_PATH_PREFIX: &str = "assets/minecraft/textures/block/";

impl TextureTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a texture of `count` animation frames, keyed both with and
    /// without the jar path prefix. Returns its layer range.
    pub fn insert(&mut self, name: &str, count: u32, is_transparent: bool) -> TextureIdRange {
        let range = TextureIdRange {
            base: self.layer_count,
            count,
        };

        self.layer_count += count;
        self.transparent
            .resize(self.layer_count as usize, is_transparent);

        let stem = name
            .strip_prefix(TEXTURE_PATH_PREFIX)
            .unwrap_or(name)
            .trim_end_matches(".png");

        self.ranges.insert(stem.to_owned(), range);
        self.ranges
            .insert(format!("{TEXTURE_PATH_PREFIX}{stem}.png"), range);

        range
    }

    pub fn get(&self, name: &str) -> Option<TextureIdRange> {
        self.ranges
            .get(name.trim_end_matches(".png"))
            .or_else(|| self.ranges.get(name))
            .copied()
    }

    pub fn is_transparent(&self, texture_id: u32) -> bool {
        self.transparent
            .get(texture_id as usize)
            .copied()
            .unwrap_or(false)
    }

    pub fn layer_count(&self) -> u32 {
        self.layer_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn textures_are_keyed_with_and_without_prefix() {
        let mut table = TextureTable::new();

        let stone = table.insert("assets/minecraft/textures/block/stone.png", 1, false);
        let water = table.insert("assets/minecraft/textures/block/water_still.png", 32, true);

        assert_eq!(table.get("stone"), Some(stone));
        assert_eq!(
            table.get("assets/minecraft/textures/block/stone.png"),
            Some(stone)
        );

        assert_eq!(water.base, 1);
        assert_eq!(water.count, 32);
        assert_eq!(table.layer_count(), 33);

        assert!(!table.is_transparent(stone.base));
        assert!(table.is_transparent(water.base));
        assert!(table.is_transparent(water.base + 31));
    }
}
