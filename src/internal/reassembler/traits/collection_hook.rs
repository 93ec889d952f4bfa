//! 集合重组钩子。

use crate::internal::model::structs::{Chunk, ObjectId, SourceId};

/// 集合重组过程中的回调，按需覆盖默认空实现。
///
/// 可注册多个钩子，按注册顺序依次执行；钩子在重组器的状态锁释放之后调用。
/// 钩子里可以查询、登记或追加钩子：由此产生的通知排在当前通知之后，
/// 当前钩子返回后才执行；追加的钩子从下一轮分发开始生效。
pub trait CollectionHook<I>: Send {
    /// 某个 (对象, 来源) 的集合刚好收齐，每对恰好一次。
    fn on_collection_completed(&mut self, _object_id: &ObjectId, _source: &SourceId) {}

    /// 一批条目已落盘。
    fn on_items_received(&mut self, _object_id: &ObjectId, _chunk: &Chunk<I>, _source: &SourceId) {}

    /// 对象出现了此前未见过的来源。
    fn on_source_changed(&mut self, _object_id: &ObjectId, _source: &SourceId) {}
}
