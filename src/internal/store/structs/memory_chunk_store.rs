//! 内存分块存储：数据块序列化后以 `Bytes` 保存，容量统计基于序列化后的长度。

use std::collections::{BTreeMap, HashMap, HashSet};
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard};

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::internal::model::structs::{Chunk, CombinedId};

use super::super::traits::{ChunkIter, ChunkStore, ObjectSerializer};
use super::bincode_serializer::BincodeSerializer;
use super::store_error::StoreError;

#[derive(Debug, Default)]
struct StoredCollection {
    /// order_number -> 序列化后的数据块
    chunks: BTreeMap<u64, Bytes>,
    completed: bool,
}

impl StoredCollection {
    fn size_in_bytes(&self) -> u64 {
        self.chunks.values().map(|b| b.len() as u64).sum()
    }
}

pub struct MemoryChunkStore<I, S = BincodeSerializer<Chunk<I>>> {
    serializer: Arc<S>,
    collections: Mutex<HashMap<CombinedId, StoredCollection>>,
    _marker: PhantomData<fn() -> I>,
}

impl<I> MemoryChunkStore<I>
where
    I: Serialize + DeserializeOwned,
{
    /// 使用 bincode 序列化的内存存储。
    pub fn new() -> Self {
        Self::with_serializer(BincodeSerializer::new())
    }
}

impl<I> Default for MemoryChunkStore<I>
where
    I: Serialize + DeserializeOwned,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<I, S> MemoryChunkStore<I, S>
where
    S: ObjectSerializer<Chunk<I>>,
{
    pub fn with_serializer(serializer: S) -> Self {
        Self {
            serializer: Arc::new(serializer),
            collections: Mutex::new(HashMap::new()),
            _marker: PhantomData,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<CombinedId, StoredCollection>>, StoreError> {
        self.collections.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

impl<I, S> ChunkStore<I> for MemoryChunkStore<I, S>
where
    I: 'static,
    S: ObjectSerializer<Chunk<I>> + 'static,
{
    fn save(&self, key: &CombinedId, chunk: &Chunk<I>) -> Result<(), StoreError> {
        let mut raw = Vec::new();
        self.serializer.serialize(chunk, &mut raw)?;
        let mut collections = self.lock()?;
        collections
            .entry(key.clone())
            .or_default()
            .chunks
            .insert(chunk.order_number, Bytes::from(raw));
        Ok(())
    }

    fn get(&self, key: &CombinedId) -> Result<ChunkIter<I>, StoreError> {
        // 只克隆 Bytes 句柄，反序列化延迟到迭代时
        let raw: Vec<Bytes> = self
            .lock()?
            .get(key)
            .map(|c| c.chunks.values().cloned().collect())
            .unwrap_or_default();
        let serializer = Arc::clone(&self.serializer);
        Ok(Box::new(raw.into_iter().map(move |bytes| {
            let mut reader: &[u8] = &bytes;
            serializer.deserialize(&mut reader)
        })))
    }

    fn remove(&self, key: &CombinedId) -> Result<(), StoreError> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn contains(&self, key: &CombinedId) -> Result<bool, StoreError> {
        Ok(self.lock()?.contains_key(key))
    }

    fn register_as_completed(&self, key: &CombinedId) -> Result<(), StoreError> {
        self.lock()?.entry(key.clone()).or_default().completed = true;
        Ok(())
    }

    fn is_completed(&self, key: &CombinedId) -> Result<bool, StoreError> {
        Ok(self.lock()?.get(key).is_some_and(|c| c.completed))
    }

    fn collection_ids(&self) -> Result<HashSet<CombinedId>, StoreError> {
        Ok(self.lock()?.keys().cloned().collect())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.lock()?.clear();
        Ok(())
    }

    fn destroy(&self) -> Result<(), StoreError> {
        let mut collections = self.lock()?;
        collections.clear();
        collections.shrink_to_fit();
        debug!("内存分块存储已销毁");
        Ok(())
    }

    fn compact(&self) -> Result<(), StoreError> {
        let mut collections = self.lock()?;
        collections.retain(|_, c| c.completed || !c.chunks.is_empty());
        collections.shrink_to_fit();
        Ok(())
    }

    fn size_in_bytes(&self) -> u64 {
        match self.lock() {
            Ok(collections) => collections.values().map(StoredCollection::size_in_bytes).sum(),
            Err(_) => 0,
        }
    }
}
