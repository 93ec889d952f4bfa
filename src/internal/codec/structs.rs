pub mod compact_size_codec;
pub mod raw_header;
pub mod raw_item;

pub use compact_size_codec::{CompactSizeCodec, DEFAULT_HEADER_SIZE, DEFAULT_MAX_ITEM_SIZE};
pub use raw_header::RawHeader;
pub use raw_item::RawItem;
