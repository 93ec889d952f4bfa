/// 默认段大小：64KB
pub const DEFAULT_SEGMENT_SIZE: usize = 64 * 1024;

/// 分段缓冲的配置。
#[derive(Debug, Clone)]
pub struct SegmentedBufferConfig {
    /// 每个字节段的固定容量（字节），至少为 1
    pub segment_size: usize,
}

impl Default for SegmentedBufferConfig {
    fn default() -> Self {
        Self {
            segment_size: DEFAULT_SEGMENT_SIZE,
        }
    }
}
