use serde::{Deserialize, Serialize};

/// 一批有序条目。同一 CombinedId 下 `order_number` 从 0 单调递增，
/// 各批次首尾相接、无空洞无重叠地覆盖整个集合。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk<I> {
    pub items: Vec<I>,
    pub order_number: u64,
}

impl<I> Chunk<I> {
    pub fn new(items: Vec<I>, order_number: u64) -> Self {
        Self {
            items,
            order_number,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
