//! 存储相关错误类型。

use thiserror::Error;

/// 存储失败原样上抛给触发它的调用方，内部不重试。
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("存储读写失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("序列化失败: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("获取存储锁失败")]
    LockPoisoned,

    /// 第三方存储实现的自定义错误。
    #[error("存储后端错误: {0}")]
    Backend(String),
}
