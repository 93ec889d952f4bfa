use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Mutex, MutexGuard};

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::internal::model::structs::ObjectId;

use super::super::traits::{HeaderStore, ObjectSerializer};
use super::bincode_serializer::BincodeSerializer;
use super::store_error::StoreError;

/// 内存头部存储，头部同样以序列化后的字节保存。
pub struct MemoryHeaderStore<H, S = BincodeSerializer<H>> {
    serializer: S,
    headers: Mutex<HashMap<ObjectId, Bytes>>,
    _marker: PhantomData<fn() -> H>,
}

impl<H> MemoryHeaderStore<H>
where
    H: Serialize + DeserializeOwned,
{
    pub fn new() -> Self {
        Self::with_serializer(BincodeSerializer::new())
    }
}

impl<H> Default for MemoryHeaderStore<H>
where
    H: Serialize + DeserializeOwned,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<H, S> MemoryHeaderStore<H, S>
where
    S: ObjectSerializer<H>,
{
    pub fn with_serializer(serializer: S) -> Self {
        Self {
            serializer,
            headers: Mutex::new(HashMap::new()),
            _marker: PhantomData,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<ObjectId, Bytes>>, StoreError> {
        self.headers.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

impl<H, S> HeaderStore<H> for MemoryHeaderStore<H, S>
where
    S: ObjectSerializer<H>,
{
    fn save(&self, object_id: &ObjectId, header: &H) -> Result<(), StoreError> {
        let mut raw = Vec::new();
        self.serializer.serialize(header, &mut raw)?;
        self.lock()?.insert(object_id.clone(), Bytes::from(raw));
        Ok(())
    }

    fn get(&self, object_id: &ObjectId) -> Result<Option<H>, StoreError> {
        let Some(bytes) = self.lock()?.get(object_id).cloned() else {
            return Ok(None);
        };
        let mut reader: &[u8] = &bytes;
        Ok(Some(self.serializer.deserialize(&mut reader)?))
    }

    fn remove(&self, object_id: &ObjectId) -> Result<(), StoreError> {
        self.lock()?.remove(object_id);
        Ok(())
    }

    fn contains(&self, object_id: &ObjectId) -> Result<bool, StoreError> {
        Ok(self.lock()?.contains_key(object_id))
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.lock()?.clear();
        Ok(())
    }

    fn destroy(&self) -> Result<(), StoreError> {
        let mut headers = self.lock()?;
        headers.clear();
        headers.shrink_to_fit();
        Ok(())
    }

    fn compact(&self) -> Result<(), StoreError> {
        self.lock()?.shrink_to_fit();
        Ok(())
    }

    fn size_in_bytes(&self) -> u64 {
        match self.lock() {
            Ok(headers) => headers.values().map(|b| b.len() as u64).sum(),
            Err(_) => 0,
        }
    }
}
