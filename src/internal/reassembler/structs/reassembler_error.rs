//! 集合重组相关错误类型。

use thiserror::Error;

use crate::internal::store::structs::StoreError;

#[derive(Debug, Error)]
pub enum ReassemblerError {
    /// 存储错误原样上抛
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("重组器尚未启动")]
    NotStarted,

    #[error("获取重组器锁失败")]
    LockPoisoned,
}
