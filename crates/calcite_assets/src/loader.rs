//! The one-shot asset build: jar in, block registry and texture array out.
//!
//! Load order follows the dependency chain: model JSON is parsed and
//! parent-resolved first, textures are interned next so faces can bake
//! their layer ids, then blocks.json fixes the state-id space and the
//! blockstate selectors attach a model to every state.

use std::collections::{BTreeMap, HashMap};
use std::io::{Read, Seek};

use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{
    Axis, BlockElement, BlockModel, ElementRotation, Face, RenderLayer, RenderableFace,
    VariantRotation,
};
use crate::registry::{has_property_set, BlockRegistry, BlockState, BlockStateInfo, StateIdRange};
use crate::schema::{
    JsonBlockstates, JsonElement, JsonModel, JsonVariant, JsonBlocks,
};
use crate::texture::{TextureTable, TextureUploader, TEXTURE_SIZE};

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read the game jar: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("i/o error while loading assets: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON in {name}: {source}")]
    Json {
        name: String,
        source: serde_json::Error,
    },

    #[error("model parent cycle through \"{0}\"")]
    ParentCycle(String),
}

/// Jar path prefixes the loader scans.
const MODEL_PREFIX: &str = "assets/minecraft/models/block/";
const BLOCKSTATE_PREFIX: &str = "assets/minecraft/blockstates/";
const TEXTURE_PREFIX: &str = "assets/minecraft/textures/block/";

/// Filename-keyed render behavior the asset pack cannot express, carried
/// over from how the vanilla client treats these blocks.
#[derive(Copy, Clone, Default, Debug)]
struct ModelTraits {
    is_leaves: bool,
    is_spruce: bool,
    is_birch: bool,
    is_glass: bool,
    is_prismarine: bool,
    random_horizontal_offset: bool,
    random_vertical_offset: bool,
}

/// Small plants receive a per-position horizontal offset so fields do not
/// read as a grid. Matched against the model file stem.
const HORIZONTAL_OFFSET_STEMS: &[&str] = &[
    "mangrove_propagule",
    "grass",
    "fern",
    "dandelion",
    "poppy",
    "blue_orchid",
    "allium",
    "azure_bluet",
    "oxeye_daisy",
    "cornflower",
    "lily_of_the_valley",
    "bamboo_sapling",
    "wither_rose",
    "crimson_roots",
    "warped_roots",
    "nether_sprouts",
];

const HORIZONTAL_OFFSET_PREFIXES: &[&str] = &[
    "bamboo1_age",
    "bamboo2_age",
    "bamboo3_age",
    "bamboo4_age",
    "tall_grass_",
    "large_fern_",
    "sunflower_",
    "lilac_",
    "rose_bush_",
    "peony_",
];

fn model_traits(stem: &str) -> ModelTraits {
    let is_leaves = stem.contains("leaves");

    ModelTraits {
        is_leaves,
        is_spruce: is_leaves && stem.contains("spruce"),
        is_birch: is_leaves && stem.contains("birch"),
        is_glass: stem == "glass" || stem.contains("stained_glass"),
        is_prismarine: stem.contains("prismarine"),
        random_horizontal_offset: HORIZONTAL_OFFSET_STEMS.contains(&stem)
            || stem.ends_with("_tulip")
            || HORIZONTAL_OFFSET_PREFIXES
                .iter()
                .any(|prefix| stem.starts_with(prefix)),
        random_vertical_offset: stem == "grass" || stem == "fern",
    }
}

/// Per-texture render classification, from the texture file name.
fn classify_face(face: &mut RenderableFace, texture_stem: &str) {
    if texture_stem.contains("leaves") {
        face.render_layer = RenderLayer::Leaves;
    } else if texture_stem == "water_still"
        || texture_stem == "nether_portal"
        || texture_stem.contains("stained_glass")
    {
        face.render_layer = RenderLayer::Alpha;
    } else if texture_stem == "grass"
        || texture_stem == "sugar_cane"
        || texture_stem == "fern"
        || texture_stem.ends_with("grass_bottom")
        || texture_stem.ends_with("grass_top")
    {
        face.render_layer = RenderLayer::Flora;
    } else if texture_stem == "grass_block_top"
        || texture_stem == "stone"
        || texture_stem == "sand"
    {
        face.random_flip = true;
    }
}

struct ParsedModel {
    json: JsonModel,
    resolved: bool,
    /// Merged `#variable` table after parent resolution.
    textures: BTreeMap<String, String>,
    /// Inherited element list after parent resolution.
    elements: Vec<JsonElement>,
    ambient_occlusion: bool,
    /// Render-ready elements after face baking.
    baked: Vec<BlockElement>,
    traits: ModelTraits,
}

/// The one-shot builder described at the top of the crate.
#[derive(Default)]
pub struct AssetLoader {
    models: HashMap<String, ParsedModel>,
    blockstates: HashMap<String, JsonBlockstates>,
    textures: TextureTable,
}

impl AssetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses one block model document. `stem` is the filename without
    /// directory or extension.
    pub fn add_model_json(&mut self, stem: &str, json: &str) -> Result<(), AssetError> {
        let parsed: JsonModel = serde_json::from_str(json).map_err(|source| AssetError::Json {
            name: format!("models/block/{stem}.json"),
            source,
        })?;

        self.models.insert(
            stem.to_owned(),
            ParsedModel {
                json: parsed,
                resolved: false,
                textures: BTreeMap::new(),
                elements: Vec::new(),
                ambient_occlusion: true,
                baked: Vec::new(),
                traits: model_traits(stem),
            },
        );

        Ok(())
    }

    /// Parses one blockstate document.
    pub fn add_blockstate_json(&mut self, stem: &str, json: &str) -> Result<(), AssetError> {
        let parsed: JsonBlockstates =
            serde_json::from_str(json).map_err(|source| AssetError::Json {
                name: format!("blockstates/{stem}.json"),
                source,
            })?;

        self.blockstates.insert(stem.to_owned(), parsed);
        Ok(())
    }

    /// Interns one texture without decoding pixels; the jar path does the
    /// decoding and calls this.
    pub fn add_texture(&mut self, name: &str, frame_count: u32, transparent: bool) {
        self.textures.insert(name, frame_count, transparent);
    }

    pub fn textures(&self) -> &TextureTable {
        &self.textures
    }

    /// Scans the game jar: model and blockstate JSON plus every block
    /// texture, whose decoded layers stream into `uploader`.
    pub fn load_jar<R: Read + Seek>(
        &mut self,
        reader: R,
        uploader: &mut dyn TextureUploader,
    ) -> Result<(), AssetError> {
        let mut archive = zip::ZipArchive::new(reader)?;

        // Texture ids must not depend on zip entry order.
        let mut texture_names: Vec<String> = Vec::new();

        for i in 0..archive.len() {
            let file = archive.by_index(i)?;
            let name = file.name().to_owned();

            if let Some(stem) = name
                .strip_prefix(MODEL_PREFIX)
                .and_then(|n| n.strip_suffix(".json"))
            {
                let stem = stem.to_owned();
                let mut json = String::new();
                let mut file = file;
                file.read_to_string(&mut json)?;
                self.add_model_json(&stem, &json)?;
            } else if let Some(stem) = name
                .strip_prefix(BLOCKSTATE_PREFIX)
                .and_then(|n| n.strip_suffix(".json"))
            {
                let stem = stem.to_owned();
                let mut json = String::new();
                let mut file = file;
                file.read_to_string(&mut json)?;
                self.add_blockstate_json(&stem, &json)?;
            } else if name.starts_with(TEXTURE_PREFIX) && name.ends_with(".png") {
                texture_names.push(name);
            }
        }

        texture_names.sort_unstable();

        // Decode first so the total layer count is known before upload.
        let mut decoded = Vec::with_capacity(texture_names.len());
        let mut total_layers = 0_u32;

        for name in &texture_names {
            let mut bytes = Vec::new();
            archive.by_name(name)?.read_to_end(&mut bytes)?;

            let image = match image::load_from_memory(&bytes) {
                Ok(image) => image.to_rgba8(),
                Err(e) => {
                    warn!("skipping unreadable texture {name}: {e}");
                    continue;
                }
            };

            let (width, height) = image.dimensions();

            if width % TEXTURE_SIZE != 0 || height % TEXTURE_SIZE != 0 {
                warn!("skipping texture {name} with odd dimensions {width}x{height}");
                continue;
            }

            total_layers += height / TEXTURE_SIZE;
            decoded.push((name.clone(), image));
        }

        uploader.begin(TEXTURE_SIZE, TEXTURE_SIZE, total_layers);

        for (name, image) in decoded {
            let frames = image.height() / TEXTURE_SIZE;
            let transparent = image.pixels().any(|p| p.0[3] < 255);
            let brighten_mipping = !name.contains("leaves");

            let range = self.textures.insert(&name, frames, transparent);

            let raw = image.as_raw();
            let frame_bytes = (TEXTURE_SIZE * TEXTURE_SIZE * 4) as usize;

            for frame in 0..frames {
                let start = frame as usize * frame_bytes;
                uploader.push_layer(
                    range.base + frame,
                    &raw[start..start + frame_bytes],
                    brighten_mipping,
                );
            }
        }

        uploader.commit();

        debug!(
            models = self.models.len(),
            blockstates = self.blockstates.len(),
            texture_layers = self.textures.layer_count(),
            "jar scan complete"
        );

        Ok(())
    }

    /// Runs the remaining phases against blocks.json and produces the
    /// registry. Consumes the loader; a registry is built at most once
    /// per session.
    pub fn finish(mut self, blocks_json: &str) -> Result<BlockRegistry, AssetError> {
        self.resolve_parents()?;
        self.bake_models();

        let blocks: JsonBlocks =
            serde_json::from_str(blocks_json).map_err(|source| AssetError::Json {
                name: "blocks.json".into(),
                source,
            })?;

        let mut registry = self.build_registry(&blocks);
        self.resolve_blockstates(&mut registry);

        Ok(registry)
    }

    /// Phase 2: walk every parent chain with an explicit worklist, merging
    /// textures downward and inheriting elements where a child has none.
    fn resolve_parents(&mut self) -> Result<(), AssetError> {
        let stems: Vec<String> = self.models.keys().cloned().collect();

        for stem in stems {
            if self.models[&stem].resolved {
                continue;
            }

            // Chain from this model up to the first resolved ancestor.
            let mut chain = vec![stem.clone()];

            loop {
                let current = chain.last().unwrap();
                let model = &self.models[current];

                if model.resolved {
                    break;
                }

                let Some(parent_ref) = model.json.parent.clone() else {
                    break;
                };

                // "builtin/generated" and friends have no block geometry.
                if parent_ref.contains("builtin/") {
                    break;
                }

                let parent_stem = model_stem(&parent_ref);

                if chain.iter().any(|s| *s == parent_stem) {
                    return Err(AssetError::ParentCycle(parent_stem));
                }

                if !self.models.contains_key(&parent_stem) {
                    warn!("model {current} references missing parent {parent_stem}");
                    break;
                }

                chain.push(parent_stem);
            }

            // Merge top-down so each link sees a fully resolved parent.
            for link in chain.iter().rev() {
                let parent_stem = self.models[link]
                    .json
                    .parent
                    .as_deref()
                    .map(model_stem)
                    .filter(|p| self.models.get(p).is_some_and(|m| m.resolved));

                let (parent_textures, parent_elements, parent_ao) = match parent_stem {
                    Some(ref p) => {
                        let parent = &self.models[p];
                        (
                            parent.textures.clone(),
                            parent.elements.clone(),
                            parent.ambient_occlusion,
                        )
                    }
                    None => (BTreeMap::new(), Vec::new(), true),
                };

                let model = self.models.get_mut(link).unwrap();

                model.textures = parent_textures;
                model.textures.extend(model.json.textures.clone());

                model.elements = match &model.json.elements {
                    Some(own) => own.clone(),
                    None => parent_elements,
                };

                model.ambient_occlusion = model.json.ambient_occlusion.unwrap_or(parent_ao);
                model.resolved = true;
            }
        }

        Ok(())
    }

    /// Phase 5: resolve every face's texture reference and build the
    /// render-ready elements.
    fn bake_models(&mut self) {
        let stems: Vec<String> = self.models.keys().cloned().collect();

        for stem in stems {
            let model = &self.models[&stem];
            let traits = model.traits;
            let textures = model.textures.clone();
            let elements = model.elements.clone();

            let mut baked = Vec::with_capacity(elements.len());

            for json_element in &elements {
                baked.push(self.bake_element(&stem, json_element, &textures, traits));
            }

            self.models.get_mut(&stem).unwrap().baked = baked;
        }
    }

    fn bake_element(
        &self,
        model_stem: &str,
        json: &JsonElement,
        textures: &BTreeMap<String, String>,
        traits: ModelTraits,
    ) -> BlockElement {
        let from = [json.from[0] / 16.0, json.from[1] / 16.0, json.from[2] / 16.0];
        let to = [json.to[0] / 16.0, json.to[1] / 16.0, json.to[2] / 16.0];

        let rotation = json.rotation.as_ref().and_then(|r| {
            let axis = match r.axis.as_str() {
                "x" => Axis::X,
                "y" => Axis::Y,
                "z" => Axis::Z,
                other => {
                    warn!("model {model_stem} has element with invalid axis {other:?}");
                    return None;
                }
            };

            Some(ElementRotation {
                origin: [r.origin[0] / 16.0, r.origin[1] / 16.0, r.origin[2] / 16.0],
                axis,
                angle: r.angle,
                rescale: r.rescale,
            })
        });

        let mut faces: [RenderableFace; Face::COUNT] = Default::default();

        for face in Face::ALL {
            let name = match face {
                Face::Down => "down",
                Face::Up => "up",
                Face::North => "north",
                Face::South => "south",
                Face::West => "west",
                Face::East => "east",
            };

            // Some models use the bottom/top aliases.
            let json_face = json.faces.get(name).or_else(|| match face {
                Face::Down => json.faces.get("bottom"),
                Face::Up => json.faces.get("top"),
                _ => None,
            });

            let Some(json_face) = json_face else {
                continue;
            };

            let out = &mut faces[face.index()];

            out.uv = match json_face.uv {
                Some(uv) => [uv[0] / 16.0, uv[1] / 16.0, uv[2] / 16.0, uv[3] / 16.0],
                None => default_uv(face, from, to),
            };

            out.rotation = json_face.rotation.rem_euclid(360) as u16;
            out.cullface = json_face
                .cullface
                .as_deref()
                .and_then(Face::from_name);
            out.tint_index = json_face.tintindex;

            match self.resolve_texture_ref(&json_face.texture, textures) {
                Some(texture_stem) => match self.textures.get(&texture_stem) {
                    Some(range) => {
                        out.render = true;
                        out.texture_id = range.base;
                        out.frame_count = if traits.is_prismarine {
                            // The animation metadata is never parsed, and
                            // prismarine is the one block whose sheet would
                            // otherwise animate wrongly.
                            1
                        } else {
                            range.count
                        };
                        out.transparency = self.textures.is_transparent(range.base);

                        classify_face(out, &texture_stem);
                    }
                    None => {
                        warn!("model {model_stem}: unknown texture {texture_stem}");
                        out.render = false;
                        out.texture_id = 0;
                    }
                },
                None => {
                    warn!(
                        "model {model_stem}: unresolved texture reference {}",
                        json_face.texture
                    );
                    out.render = false;
                    out.texture_id = 0;
                }
            }

            if traits.is_leaves {
                out.render_layer = RenderLayer::Leaves;
                out.tint_index = if traits.is_spruce {
                    2
                } else if traits.is_birch {
                    3
                } else {
                    1
                };
            }
        }

        let mut element = BlockElement {
            from,
            to,
            faces,
            rotation,
            variant_rotation: VariantRotation::default(),
            occluding: false,
            shade: json.shade,
        };
        element.occluding = element.covers_unit_cube();
        element
    }

    /// Follows `#variable` indirection until a concrete texture name.
    fn resolve_texture_ref(
        &self,
        reference: &str,
        textures: &BTreeMap<String, String>,
    ) -> Option<String> {
        let mut current = reference.to_owned();

        // Chains are short; the bound only guards against reference loops.
        for _ in 0..16 {
            if let Some(variable) = current.strip_prefix('#') {
                current = textures.get(variable)?.clone();
                continue;
            }

            return Some(texture_stem(&current).to_owned());
        }

        None
    }

    /// Phase 4: size the state space from blocks.json and fill in names,
    /// properties, and default bits.
    fn build_registry(&self, blocks: &JsonBlocks) -> BlockRegistry {
        let state_count = blocks
            .values()
            .flat_map(|b| b.states.iter())
            .map(|s| s.id as usize + 1)
            .max()
            .unwrap_or(0);

        let mut registry = BlockRegistry::with_state_count(state_count);

        for (name, block) in blocks {
            let info_index = registry.infos.len() as u32;
            registry.infos.push(BlockStateInfo { name: name.clone() });

            let base = block.states.iter().map(|s| s.id).min().unwrap_or(0);

            registry.insert_range(
                name,
                StateIdRange {
                    base,
                    count: block.states.len() as u32,
                },
            );

            let leveled = block
                .properties
                .as_ref()
                .is_some_and(|props| props.contains_key("level"));

            for state in &block.states {
                let id = state.id;

                let mut properties = String::new();
                let mut level = 0_u8;

                if let Some(props) = &state.properties {
                    for (key, value) in props {
                        if key == "waterlogged" {
                            continue;
                        }

                        if key == "level" {
                            level = value.parse().unwrap_or(0);
                        }

                        if !properties.is_empty() {
                            properties.push(',');
                        }
                        properties.push_str(key);
                        properties.push('=');
                        properties.push_str(value);
                    }
                }

                if state.default {
                    registry.mark_default(id);
                }

                registry.properties[id as usize] = properties;
                registry.states[id as usize] = BlockState {
                    id,
                    info: info_index,
                    model: BlockModel::default(),
                    leveled,
                    level,
                };
            }
        }

        registry
    }

    /// Phase 6: attach a model to every state via its blockstate document.
    fn resolve_blockstates(&self, registry: &mut BlockRegistry) {
        for info_index in 0..registry.infos.len() {
            let path = registry.infos[info_index].path().to_owned();
            let name = registry.infos[info_index].name.clone();

            let Some(blockstates) = self.blockstates.get(&path) else {
                debug!("no blockstate document for {name}");
                continue;
            };

            let Some(range) = registry.range_for(&name) else {
                continue;
            };

            for id in range.base..range.base + range.count {
                if registry.states[id as usize].info != info_index as u32 {
                    continue;
                }

                let properties = registry.properties[id as usize].clone();
                let mut model = BlockModel::default();

                if let Some(variants) = &blockstates.variants {
                    // First matching selector wins; the empty selector is
                    // the unconditional fallback.
                    let matched = variants
                        .iter()
                        .find(|(selector, _)| has_property_set(&properties, selector));

                    if let Some((_, list)) = matched {
                        if let Some(variant) = list.first() {
                            self.apply_variant(&mut model, variant);
                        }
                    }
                }

                if let Some(multipart) = &blockstates.multipart {
                    for case in multipart {
                        let matched = match &case.when {
                            Some(when) => when_matches(when, &properties),
                            None => true,
                        };

                        if matched {
                            if let Some(variant) = case.apply.first() {
                                self.apply_variant(&mut model, variant);
                            }
                        }
                    }
                }

                model.refresh_flags();
                registry.states[id as usize].model = model;
            }
        }
    }

    /// Appends one applied model's elements, stamped with the variant's
    /// rotation, and merges the model-level flags.
    fn apply_variant(&self, model: &mut BlockModel, variant: &JsonVariant) {
        let stem = model_stem(&variant.model);

        let Some(parsed) = self.models.get(&stem) else {
            warn!("blockstate references missing model {stem}");
            return;
        };

        let rotation = VariantRotation {
            x: variant.x % 360 / 90 * 90,
            y: variant.y % 360 / 90 * 90,
            z: variant.z % 360 / 90 * 90,
            uvlock: variant.uvlock,
        };

        for element in &parsed.baked {
            let mut element = element.clone();
            element.variant_rotation = rotation;
            model.elements.push(element);
        }

        model.ambient_occlusion |= parsed.ambient_occlusion;
        model.has_glass |= parsed.traits.is_glass;
        model.has_leaves |= parsed.traits.is_leaves;
        model.random_horizontal_offset |= parsed.traits.random_horizontal_offset;
        model.random_vertical_offset |= parsed.traits.random_vertical_offset;
    }
}

/// "minecraft:block/stone" -> "stone"; bare stems pass through.
fn model_stem(reference: &str) -> String {
    let reference = reference
        .split_once(':')
        .map_or(reference, |(_, path)| path);

    reference
        .rsplit_once('/')
        .map_or(reference, |(_, stem)| stem)
        .to_owned()
}

/// Texture references resolve the same way model references do.
fn texture_stem(reference: &str) -> &str {
    let reference = reference
        .split_once(':')
        .map_or(reference, |(_, path)| path);

    reference
        .rsplit_once('/')
        .map_or(reference, |(_, stem)| stem)
}

/// Default UVs project the element extent onto the face plane, in the
/// orientation vanilla uses when a face omits `uv`.
fn default_uv(face: Face, from: [f32; 3], to: [f32; 3]) -> [f32; 4] {
    match face {
        Face::Down | Face::Up => [from[0], from[2], to[0], to[2]],
        Face::North => [1.0 - to[0], 1.0 - to[1], 1.0 - from[0], 1.0 - from[1]],
        Face::South => [from[0], 1.0 - to[1], to[0], 1.0 - from[1]],
        Face::West => [from[2], 1.0 - to[1], to[2], 1.0 - from[1]],
        Face::East => [1.0 - to[2], 1.0 - to[1], 1.0 - from[2], 1.0 - from[1]],
    }
}

/// Evaluates a multipart `when` clause against a state's properties.
/// A flat object is an AND of equalities; `OR`/`AND` wrap lists of such
/// objects; values may offer `|`-separated alternatives.
fn when_matches(when: &JsonValue, properties: &str) -> bool {
    let Some(object) = when.as_object() else {
        return true;
    };

    if let Some(list) = object.get("OR").and_then(|v| v.as_array()) {
        return list.iter().any(|v| when_matches(v, properties));
    }

    if let Some(list) = object.get("AND").and_then(|v| v.as_array()) {
        return list.iter().all(|v| when_matches(v, properties));
    }

    object.iter().all(|(key, value)| {
        let value = match value {
            JsonValue::String(s) => s.clone(),
            JsonValue::Bool(b) => b.to_string(),
            JsonValue::Number(n) => n.to_string(),
            _ => return false,
        };

        value
            .split('|')
            .any(|alt| has_property_set(properties, &format!("{key}={alt}")))
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const CUBE: &str = r##"{
        "textures": { "particle": "#all" },
        "elements": [{
            "from": [0, 0, 0],
            "to": [16, 16, 16],
            "faces": {
                "down":  { "texture": "#down", "cullface": "down" },
                "up":    { "texture": "#up", "cullface": "up" },
                "north": { "texture": "#north", "cullface": "north" },
                "south": { "texture": "#south", "cullface": "south" },
                "west":  { "texture": "#west", "cullface": "west" },
                "east":  { "texture": "#east", "cullface": "east" }
            }
        }]
    }"##;

    const CUBE_ALL: &str = r##"{
        "parent": "block/cube",
        "textures": {
            "down": "#all", "up": "#all", "north": "#all",
            "south": "#all", "west": "#all", "east": "#all"
        }
    }"##;

    fn loader_with_stone() -> AssetLoader {
        let mut loader = AssetLoader::new();
        loader.add_model_json("cube", CUBE).unwrap();
        loader.add_model_json("cube_all", CUBE_ALL).unwrap();
        loader
            .add_model_json(
                "stone",
                r##"{ "parent": "minecraft:block/cube_all", "textures": { "all": "minecraft:block/stone" } }"##,
            )
            .unwrap();
        loader.add_texture("stone", 1, false);
        loader
    }

    const STONE_BLOCKS_JSON: &str = r##"{
        "minecraft:stone": { "states": [{ "id": 1, "default": true }] }
    }"##;

    #[test]
    fn parent_chain_resolves_through_texture_variables() {
        let mut loader = loader_with_stone();
        loader
            .add_blockstate_json(
                "stone",
                r##"{ "variants": { "": { "model": "minecraft:block/stone" } } }"##,
            )
            .unwrap();

        let registry = loader.finish(STONE_BLOCKS_JSON).unwrap();

        assert_eq!(registry.state_count(), 2);

        let stone = registry.state(1).unwrap();
        assert_eq!(registry.info(stone).name, "minecraft:stone");
        assert_eq!(stone.model.elements.len(), 1);

        let element = &stone.model.elements[0];
        assert!(element.occluding);

        for face in Face::ALL {
            let f = element.face(face);
            assert!(f.render, "{face:?} should render");
            assert_eq!(f.cullface, Some(face));
            // The stone texture carries the random flip bit.
            assert!(f.random_flip);
        }

        assert!(stone.model.has_occluding);
        assert!(registry.is_default(1));
    }

    #[test]
    fn missing_texture_leaves_face_unrendered() {
        let mut loader = AssetLoader::new();
        loader.add_model_json("cube", CUBE).unwrap();
        loader.add_model_json("cube_all", CUBE_ALL).unwrap();
        loader
            .add_model_json(
                "mystery",
                r##"{ "parent": "block/cube_all", "textures": { "all": "block/missing" } }"##,
            )
            .unwrap();
        loader
            .add_blockstate_json(
                "mystery",
                r##"{ "variants": { "": { "model": "block/mystery" } } }"##,
            )
            .unwrap();

        let registry = loader
            .finish(r##"{ "minecraft:mystery": { "states": [{ "id": 0, "default": true }] } }"##)
            .unwrap();

        let state = registry.state(0).unwrap();
        let element = &state.model.elements[0];

        for face in Face::ALL {
            assert!(!element.face(face).render);
            assert_eq!(element.face(face).texture_id, 0);
        }
    }

    #[test]
    fn parent_cycles_abort_the_load() {
        let mut loader = AssetLoader::new();
        loader
            .add_model_json("a", r##"{ "parent": "block/b" }"##)
            .unwrap();
        loader
            .add_model_json("b", r##"{ "parent": "block/a" }"##)
            .unwrap();

        assert!(matches!(
            loader.finish("{}"),
            Err(AssetError::ParentCycle(_))
        ));
    }

    #[test]
    fn variant_selectors_match_on_properties() {
        let mut loader = loader_with_stone();
        loader
            .add_model_json(
                "lever_on",
                r##"{ "elements": [{ "from": [5, 0, 4], "to": [11, 3, 12],
                     "faces": { "up": { "texture": "minecraft:block/stone" } } }] }"##,
            )
            .unwrap();
        loader
            .add_model_json(
                "lever_off",
                r##"{ "elements": [{ "from": [5, 0, 4], "to": [11, 10, 12],
                     "faces": { "up": { "texture": "minecraft:block/stone" } } }] }"##,
            )
            .unwrap();
        loader
            .add_blockstate_json(
                "lever",
                r##"{ "variants": {
                    "powered=true": { "model": "block/lever_on" },
                    "powered=false": { "model": "block/lever_off", "y": 90, "uvlock": true }
                } }"##,
            )
            .unwrap();

        let registry = loader
            .finish(
                r##"{ "minecraft:lever": {
                    "properties": { "powered": ["true", "false"] },
                    "states": [
                        { "id": 3, "properties": { "powered": "true" } },
                        { "id": 4, "default": true, "properties": { "powered": "false" } }
                    ]
                } }"##,
            )
            .unwrap();

        let on = registry.state(3).unwrap();
        assert_eq!(on.model.elements[0].to[1], 3.0 / 16.0);
        assert!(!on.model.has_variant_rotation);

        let off = registry.state(4).unwrap();
        assert_eq!(off.model.elements[0].to[1], 10.0 / 16.0);
        assert!(off.model.has_variant_rotation);
        assert_eq!(off.model.elements[0].variant_rotation.y, 90);
        assert!(off.model.elements[0].variant_rotation.uvlock);
        assert!(!off.model.elements[0].occluding);
    }

    #[test]
    fn multipart_accumulates_matching_entries() {
        let mut loader = loader_with_stone();
        loader
            .add_model_json(
                "post",
                r##"{ "elements": [{ "from": [7, 0, 7], "to": [9, 16, 9],
                     "faces": { "north": { "texture": "minecraft:block/stone" } } }] }"##,
            )
            .unwrap();
        loader
            .add_model_json(
                "side",
                r##"{ "elements": [{ "from": [7, 12, 0], "to": [9, 15, 8],
                     "faces": { "up": { "texture": "minecraft:block/stone" } } }] }"##,
            )
            .unwrap();
        loader
            .add_blockstate_json(
                "fence",
                r##"{ "multipart": [
                    { "apply": { "model": "block/post" } },
                    { "when": { "north": "true" }, "apply": { "model": "block/side" } },
                    { "when": { "OR": [ { "east": "true" }, { "west": "true" } ] },
                      "apply": { "model": "block/side", "y": 90 } }
                ] }"##,
            )
            .unwrap();

        let registry = loader
            .finish(
                r##"{ "minecraft:fence": {
                    "properties": { "north": ["true", "false"], "east": ["true", "false"], "west": ["true", "false"] },
                    "states": [
                        { "id": 10, "properties": { "north": "false", "east": "false", "west": "false" } },
                        { "id": 11, "properties": { "north": "true", "east": "false", "west": "true" } }
                    ]
                } }"##,
            )
            .unwrap();

        // Post only.
        assert_eq!(registry.state(10).unwrap().model.elements.len(), 1);

        // Post + north side + rotated side from the OR clause.
        let busy = registry.state(11).unwrap();
        assert_eq!(busy.model.elements.len(), 3);
        assert_eq!(busy.model.elements[2].variant_rotation.y, 90);
    }

    #[test]
    fn waterlogged_is_omitted_and_level_retained() {
        let mut loader = loader_with_stone();
        loader
            .add_blockstate_json(
                "water",
                r##"{ "variants": { "": { "model": "block/stone" } } }"##,
            )
            .unwrap();

        let registry = loader
            .finish(
                r##"{ "minecraft:water": {
                    "properties": { "level": ["0", "3"] },
                    "states": [
                        { "id": 5, "default": true, "properties": { "level": "0", "waterlogged": "true" } },
                        { "id": 6, "properties": { "level": "3" } }
                    ]
                } }"##,
            )
            .unwrap();

        assert_eq!(registry.properties[5], "level=0");
        assert!(registry.state(5).unwrap().leveled);
        assert_eq!(registry.state(6).unwrap().level, 3);
    }

    #[test]
    fn leaves_models_classify_and_tint() {
        let mut loader = AssetLoader::new();
        loader.add_model_json("cube", CUBE).unwrap();
        loader.add_model_json("cube_all", CUBE_ALL).unwrap();
        loader
            .add_model_json(
                "birch_leaves",
                r##"{ "parent": "block/cube_all", "textures": { "all": "block/birch_leaves" } }"##,
            )
            .unwrap();
        loader.add_texture("birch_leaves", 1, true);
        loader
            .add_blockstate_json(
                "birch_leaves",
                r##"{ "variants": { "": { "model": "block/birch_leaves" } } }"##,
            )
            .unwrap();

        let registry = loader
            .finish(
                r##"{ "minecraft:birch_leaves": { "states": [{ "id": 0, "default": true }] } }"##,
            )
            .unwrap();

        let state = registry.state(0).unwrap();
        assert!(state.model.has_leaves);

        let face = state.model.elements[0].face(Face::Up);
        assert_eq!(face.render_layer, RenderLayer::Leaves);
        assert_eq!(face.tint_index, 3);
        assert!(face.transparency);
    }
}
