use crate::internal::model::structs::ObjectId;

use super::super::structs::StoreError;

/// 头部存储：每个对象一条，不分块。
pub trait HeaderStore<H>: Send + Sync {
    fn start(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn stop(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn save(&self, object_id: &ObjectId, header: &H) -> Result<(), StoreError>;

    fn get(&self, object_id: &ObjectId) -> Result<Option<H>, StoreError>;

    fn remove(&self, object_id: &ObjectId) -> Result<(), StoreError>;

    fn contains(&self, object_id: &ObjectId) -> Result<bool, StoreError>;

    fn clear(&self) -> Result<(), StoreError>;

    fn destroy(&self) -> Result<(), StoreError>;

    fn compact(&self) -> Result<(), StoreError>;

    fn size_in_bytes(&self) -> u64;
}
