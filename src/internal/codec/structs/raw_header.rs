use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::internal::model::structs::ObjectId;

/// 未解释字段的原始头部字节。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawHeader {
    pub bytes: Vec<u8>,
}

impl RawHeader {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// 头部两次 SHA-256 后按字节倒序的十六进制串，即常见的区块哈希写法。
    pub fn object_id(&self) -> ObjectId {
        let mut digest = Sha256::digest(Sha256::digest(&self.bytes));
        digest.reverse();
        ObjectId::new(format!("{:x}", digest))
    }
}
