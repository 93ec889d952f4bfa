//! 完成标记：两组按对象记录的临时集合，一旦同一对象两边都到齐即同时清除。

use std::collections::HashSet;

use crate::internal::model::structs::ObjectId;

/// 标记种类。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    HeaderReceived,
    CollectionCompleted,
}

#[derive(Debug, Default)]
pub struct CompletionMarkers {
    headers_received: HashSet<ObjectId>,
    collections_completed: HashSet<ObjectId>,
}

impl CompletionMarkers {
    /// 记下一个标记；若另一种标记已在，则两边一起清除并返回 true。
    ///
    /// 调用方须在同一把锁内完成本次调用，检查与清除才是原子的。
    pub fn mark(&mut self, marker: Marker, object_id: &ObjectId) -> bool {
        let (own, other) = match marker {
            Marker::HeaderReceived => (&mut self.headers_received, &mut self.collections_completed),
            Marker::CollectionCompleted => {
                (&mut self.collections_completed, &mut self.headers_received)
            }
        };
        if other.remove(object_id) {
            own.remove(object_id);
            return true;
        }
        own.insert(object_id.clone());
        false
    }

    pub fn contains(&self, marker: Marker, object_id: &ObjectId) -> bool {
        match marker {
            Marker::HeaderReceived => self.headers_received.contains(object_id),
            Marker::CollectionCompleted => self.collections_completed.contains(object_id),
        }
    }

    pub fn remove(&mut self, object_id: &ObjectId) {
        self.headers_received.remove(object_id);
        self.collections_completed.remove(object_id);
    }

    pub fn clear(&mut self) {
        self.headers_received.clear();
        self.collections_completed.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.headers_received.is_empty() && self.collections_completed.is_empty()
    }
}
