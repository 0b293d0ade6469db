//! The block-asset resolver: reads the blockmodel/blockstate/texture JSON
//! hierarchy out of the game jar, resolves parent inheritance and state
//! selectors, and produces the dense block registry plus the block texture
//! array the renderer consumes.

mod loader;
mod model;
mod registry;
mod schema;
mod texture;

pub use loader::{AssetError, AssetLoader};
pub use model::{
    Axis, BlockElement, BlockModel, ElementRotation, Face, RenderLayer, RenderableFace,
    VariantRotation,
};
pub use registry::{has_property_set, BlockRegistry, BlockState, BlockStateInfo, StateIdRange};
pub use texture::{NullUploader, TextureIdRange, TextureTable, TextureUploader, TEXTURE_SIZE};
