//! 反序列化错误类型。

use thiserror::Error;

use crate::internal::buffer::structs::BufferError;

/// 解析失败只中止当前对象，经 `DeserializerEvent::Error` 上报。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("长度前缀不合法: {0}")]
    MalformedLengthPrefix(String),

    #[error("数据被截断: 已消费 {consumed} 字节，声明总长 {budget} 字节")]
    Truncated { consumed: u64, budget: u64 },

    #[error("条目数与数据长度不符: 声明 {declared} 条，已消费 {consumed}/{budget} 字节")]
    ItemCountMismatch {
        declared: u64,
        consumed: u64,
        budget: u64,
    },

    #[error("头部不合法: {0}")]
    InvalidHeader(String),

    #[error("条目不合法: {0}")]
    InvalidItem(String),

    #[error("{0}")]
    Buffer(#[from] BufferError),
}
