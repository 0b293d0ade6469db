//! The client's model of the world it is connected to: a sliding cache of
//! chunk columns fed by the packet interpreter and read by the mesher.

mod cache;
mod chunk;
mod column;
pub mod dimension;
pub mod ingest;

pub use cache::{WorldCache, CACHE_SIZE};
pub use chunk::{Chunk, CHUNK_SIZE, SECTION_BLOCKS};
pub use column::{ChunkColumn, MAX_COLUMN_CHUNKS};
pub use dimension::{DimensionRegistry, DimensionType};
