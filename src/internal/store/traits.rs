pub mod chunk_store;
pub mod header_store;
pub mod object_serializer;

pub use chunk_store::{ChunkIter, ChunkStore};
pub use header_store::HeaderStore;
pub use object_serializer::ObjectSerializer;
