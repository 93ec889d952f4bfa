//! 分块存储接口：以 CombinedId 为键，按序保存一个集合的所有数据块。

use std::collections::HashSet;

use crate::internal::model::structs::{Chunk, CombinedId};

use super::super::structs::StoreError;

/// 惰性、有限、只进的数据块迭代器，按 `order_number` 升序。
pub type ChunkIter<I> = Box<dyn Iterator<Item = Result<Chunk<I>, StoreError>> + Send>;

pub trait ChunkStore<I>: Send + Sync {
    /// 绑定底层存储；默认无操作。
    fn start(&self) -> Result<(), StoreError> {
        Ok(())
    }

    /// 解绑底层存储；默认无操作。
    fn stop(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn save(&self, key: &CombinedId, chunk: &Chunk<I>) -> Result<(), StoreError>;

    /// 该键下的全部数据块；键不存在时返回空迭代器。
    fn get(&self, key: &CombinedId) -> Result<ChunkIter<I>, StoreError>;

    fn remove(&self, key: &CombinedId) -> Result<(), StoreError>;

    fn contains(&self, key: &CombinedId) -> Result<bool, StoreError>;

    fn register_as_completed(&self, key: &CombinedId) -> Result<(), StoreError>;

    fn is_completed(&self, key: &CombinedId) -> Result<bool, StoreError>;

    /// 当前保存的所有集合键。
    fn collection_ids(&self) -> Result<HashSet<CombinedId>, StoreError>;

    fn clear(&self) -> Result<(), StoreError>;

    /// 清空并释放底层资源。
    fn destroy(&self) -> Result<(), StoreError>;

    fn compact(&self) -> Result<(), StoreError>;

    fn size_in_bytes(&self) -> u64;
}
