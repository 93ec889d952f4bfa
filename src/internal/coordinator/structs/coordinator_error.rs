//! 协调器相关错误类型。

use thiserror::Error;

use crate::internal::deserializer::structs::ParseError;
use crate::internal::reassembler::structs::ReassemblerError;
use crate::internal::store::structs::StoreError;

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Reassembler(#[from] ReassemblerError),

    /// 经 `apply_event` 转交的解析失败
    #[error("对象解析失败: {0}")]
    Parse(#[from] ParseError),

    /// 经 `apply_event` 转交的取消
    #[error("对象解析被取消")]
    Cancelled,

    #[error("获取协调器锁失败")]
    LockPoisoned,
}
