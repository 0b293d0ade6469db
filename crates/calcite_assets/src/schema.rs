//! Serde schemas for the asset JSON the jar carries: block models,
//! blockstate selectors, and the blocks.json state-id index.

use std::collections::BTreeMap;

use serde::Deserialize;

/// One `assets/minecraft/models/block/*.json` document.
#[derive(Clone, Default, Debug, Deserialize)]
pub(crate) struct JsonModel {
    pub parent: Option<String>,
    #[serde(default, alias = "ambientocclusion")]
    pub ambient_occlusion: Option<bool>,
    #[serde(default)]
    pub textures: BTreeMap<String, String>,
    pub elements: Option<Vec<JsonElement>>,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct JsonElement {
    pub from: [f32; 3],
    pub to: [f32; 3],
    pub rotation: Option<JsonRotation>,
    #[serde(default = "default_true")]
    pub shade: bool,
    #[serde(default)]
    pub faces: BTreeMap<String, JsonFace>,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct JsonRotation {
    pub origin: [f32; 3],
    pub axis: String,
    pub angle: f32,
    #[serde(default)]
    pub rescale: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct JsonFace {
    /// Texel rectangle `[u0, v0, u1, v1]` in [0,16]^2.
    pub uv: Option<[f32; 4]>,
    pub texture: String,
    pub cullface: Option<String>,
    #[serde(default)]
    pub rotation: i32,
    #[serde(default = "default_tint")]
    pub tintindex: i32,
}

fn default_true() -> bool {
    true
}

fn default_tint() -> i32 {
    -1
}

/// One `assets/minecraft/blockstates/*.json` document: either a variant
/// table or a multipart list.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct JsonBlockstates {
    pub variants: Option<BTreeMap<String, JsonVariantList>>,
    pub multipart: Option<Vec<JsonMultipartCase>>,
}

/// A selector maps to one model or a weighted list; only the first of a
/// weighted list is used.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum JsonVariantList {
    Single(JsonVariant),
    Weighted(Vec<JsonVariant>),
}

impl JsonVariantList {
    pub(crate) fn first(&self) -> Option<&JsonVariant> {
        match self {
            JsonVariantList::Single(v) => Some(v),
            JsonVariantList::Weighted(list) => list.first(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct JsonVariant {
    pub model: String,
    #[serde(default)]
    pub x: u16,
    #[serde(default)]
    pub y: u16,
    #[serde(default)]
    pub z: u16,
    #[serde(default)]
    pub uvlock: bool,
    #[serde(default)]
    pub weight: Option<i32>,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct JsonMultipartCase {
    pub when: Option<serde_json::Value>,
    pub apply: JsonVariantList,
}

/// blocks.json: block name to its state-id assignments.
pub(crate) type JsonBlocks = BTreeMap<String, JsonBlock>;

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct JsonBlock {
    #[serde(default)]
    pub properties: Option<BTreeMap<String, Vec<String>>>,
    pub states: Vec<JsonBlockState>,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct JsonBlockState {
    pub id: u32,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub properties: Option<BTreeMap<String, String>>,
}
