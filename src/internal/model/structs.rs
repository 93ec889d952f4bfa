pub mod chunk;
pub mod ids;

pub use chunk::Chunk;
pub use ids::{CombinedId, ObjectId, SourceId, DEFAULT_SEPARATOR};
