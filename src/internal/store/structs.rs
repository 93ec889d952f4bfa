pub mod bincode_serializer;
pub mod memory_chunk_store;
pub mod memory_header_store;
pub mod store_error;

pub use bincode_serializer::BincodeSerializer;
pub use memory_chunk_store::MemoryChunkStore;
pub use memory_header_store::MemoryHeaderStore;
pub use store_error::StoreError;
