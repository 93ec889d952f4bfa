use crate::internal::model::structs::{ObjectId, SourceId};

/// 协调器回调，按需覆盖默认空实现。
///
/// 钩子在协调器的锁之外调用，可以在钩子里再登记头部或条目。
pub trait ObjectHook<H>: Send {
    /// 头部已保存。
    fn on_header_received(&mut self, _object_id: &ObjectId, _header: &H, _source: &SourceId) {}

    /// 头部与集合都已到齐，每个对象每轮恰好一次；`source` 为后到的那个信号的来源。
    fn on_object_received(&mut self, _object_id: &ObjectId, _source: &SourceId) {}
}
