use std::io::{Read, Write};
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::super::traits::ObjectSerializer;
use super::store_error::StoreError;

/// 基于 bincode 的序列化器，适用于任意 serde 类型。
pub struct BincodeSerializer<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> BincodeSerializer<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for BincodeSerializer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ObjectSerializer<T> for BincodeSerializer<T>
where
    T: Serialize + DeserializeOwned,
{
    fn serialize(&self, value: &T, writer: &mut dyn Write) -> Result<(), StoreError> {
        bincode::serialize_into(writer, value)?;
        Ok(())
    }

    fn deserialize(&self, reader: &mut dyn Read) -> Result<T, StoreError> {
        Ok(bincode::deserialize_from(reader)?)
    }
}
