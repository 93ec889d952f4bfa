pub mod buffer;
pub mod codec;
pub mod coordinator;
pub mod deserializer;
pub mod model;
pub mod reassembler;
pub mod states;
pub mod store;
