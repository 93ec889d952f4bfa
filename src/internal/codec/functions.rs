pub mod compact_size;
pub mod encode_object;

pub use compact_size::{compact_size_len, peek_compact_size, write_compact_size};
pub use encode_object::encode_object;
