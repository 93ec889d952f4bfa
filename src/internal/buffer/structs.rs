pub mod buffer_config;
pub mod buffer_error;
pub mod byte_segment;
pub mod segmented_buffer;

// 重导出公共类型
pub use buffer_config::{SegmentedBufferConfig, DEFAULT_SEGMENT_SIZE};
pub use buffer_error::BufferError;
pub use byte_segment::ByteSegment;
pub use segmented_buffer::SegmentedBuffer;
