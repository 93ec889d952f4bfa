use std::io::{Read, Write};

use super::super::structs::StoreError;

/// 存储值的可插拔序列化器。
pub trait ObjectSerializer<T>: Send + Sync {
    fn serialize(&self, value: &T, writer: &mut dyn Write) -> Result<(), StoreError>;

    fn deserialize(&self, reader: &mut dyn Read) -> Result<T, StoreError>;
}
