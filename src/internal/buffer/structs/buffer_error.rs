//! 分段缓冲相关错误类型。

use thiserror::Error;

/// 缓冲读取错误。两种情况都属于调用方的编程错误，内部不会重试。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    #[error("缓冲数据不足: 需要 {requested} 字节，当前仅有 {available} 字节")]
    InsufficientData { requested: usize, available: usize },

    #[error("目标数组空间不足: 需要 {required} 字节，实际 {actual} 字节")]
    DestinationTooSmall { required: usize, actual: usize },
}
