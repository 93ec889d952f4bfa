use crate::internal::buffer::structs::DEFAULT_SEGMENT_SIZE;

/// 默认分批阈值：10MB
pub const DEFAULT_BATCH_BYTES: usize = 10 * 1024 * 1024;

/// 分批策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchPolicy {
    /// 当前批次已解析字节数超过阈值时吐出
    MaxBytes(usize),
    /// 当前批次条目数达到阈值时吐出
    MaxItems(usize),
}

impl BatchPolicy {
    pub(crate) fn is_full(&self, batch_items: usize, batch_bytes: usize) -> bool {
        match *self {
            BatchPolicy::MaxBytes(limit) => batch_bytes > limit,
            BatchPolicy::MaxItems(limit) => batch_items >= limit.max(1),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeserializerConfig {
    pub batch_policy: BatchPolicy,
    /// 内部接收缓冲的段大小
    pub segment_size: usize,
}

impl Default for DeserializerConfig {
    fn default() -> Self {
        Self {
            batch_policy: BatchPolicy::MaxBytes(DEFAULT_BATCH_BYTES),
            segment_size: DEFAULT_SEGMENT_SIZE,
        }
    }
}
