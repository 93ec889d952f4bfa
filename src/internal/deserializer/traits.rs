pub mod object_codec;

pub use object_codec::{Decoded, ObjectCodec};
