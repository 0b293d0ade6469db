//! Dimension types, parsed out of the registry codec the server sends
//! during configuration.

use calcite_nbt::Compound;
use thiserror::Error;
use tracing::warn;

/// The subset of a dimension type the client core consumes.
#[derive(Clone, PartialEq, Debug)]
pub struct DimensionType {
    pub name: String,
    pub min_y: i32,
    pub height: u32,
    pub has_skylight: bool,
    pub ambient_light: f32,
}

impl Default for DimensionType {
    fn default() -> Self {
        Self {
            name: "minecraft:overworld".into(),
            min_y: -64,
            height: 384,
            has_skylight: true,
            ambient_light: 0.0,
        }
    }
}

#[derive(Clone, Debug, Error)]
pub enum RegistryError {
    #[error("registry codec has no dimension type registry")]
    MissingDimensionTypes,
    #[error("dimension type entry is missing \"{0}\"")]
    MissingField(&'static str),
    #[error("dimension height of {0} is not a positive multiple of 16")]
    BadHeight(i32),
}

/// The dimension types known this session, in registry order so play-state
/// packets can reference them by name or index.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct DimensionRegistry {
    types: Vec<DimensionType>,
}

impl DimensionRegistry {
    pub const CODEC_KEY: &'static str = "minecraft:dimension_type";

    /// Parses the dimension type registry out of the registry codec.
    /// Malformed entries are skipped with a warning; an absent registry is
    /// an error because the client cannot size the world without one.
    pub fn from_codec(codec: &Compound) -> Result<Self, RegistryError> {
        let registry = codec
            .get_compound(Self::CODEC_KEY)
            .ok_or(RegistryError::MissingDimensionTypes)?;

        let entries = registry
            .get_list("value")
            .ok_or(RegistryError::MissingDimensionTypes)?;

        let mut types = Vec::with_capacity(entries.len());

        for entry in entries.compounds() {
            match parse_entry(entry) {
                Ok(dimension) => types.push(dimension),
                Err(e) => warn!("skipping dimension type entry: {e}"),
            }
        }

        Ok(Self { types })
    }

    pub fn get(&self, index: usize) -> Option<&DimensionType> {
        self.types.get(index)
    }

    pub fn by_name(&self, name: &str) -> Option<&DimensionType> {
        self.types.iter().find(|d| d.name == name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

fn parse_entry(entry: &Compound) -> Result<DimensionType, RegistryError> {
    let name = entry
        .get_string("name")
        .ok_or(RegistryError::MissingField("name"))?;

    let element = entry
        .get_compound("element")
        .ok_or(RegistryError::MissingField("element"))?;

    let min_y = element
        .get_int("min_y")
        .ok_or(RegistryError::MissingField("min_y"))?;

    let height = element
        .get_int("height")
        .ok_or(RegistryError::MissingField("height"))?;

    if height <= 0 || height % 16 != 0 {
        return Err(RegistryError::BadHeight(height));
    }

    Ok(DimensionType {
        name: name.into(),
        min_y,
        height: height as u32,
        has_skylight: element.get_byte("has_skylight").unwrap_or(1) != 0,
        ambient_light: element.get_float("ambient_light").unwrap_or(0.0),
    })
}
