//! 单回调适配器：将闭包包装成 [`ObjectHook`]。

use crate::internal::model::structs::{ObjectId, SourceId};

use super::super::traits::ObjectHook;

/// 仅实现「头部已保存」的钩子适配器。
pub(crate) struct OnHeaderReceivedHookAdapter<F>(pub(crate) F);

impl<H, F> ObjectHook<H> for OnHeaderReceivedHookAdapter<F>
where
    F: FnMut(&ObjectId, &H, &SourceId) + Send,
{
    fn on_header_received(&mut self, object_id: &ObjectId, header: &H, source: &SourceId) {
        (self.0)(object_id, header, source);
    }
}

/// 仅实现「对象已接收」的钩子适配器。
pub(crate) struct OnObjectReceivedHookAdapter<F>(pub(crate) F);

impl<H, F> ObjectHook<H> for OnObjectReceivedHookAdapter<F>
where
    F: FnMut(&ObjectId, &SourceId) + Send,
{
    fn on_object_received(&mut self, object_id: &ObjectId, source: &SourceId) {
        (self.0)(object_id, source);
    }
}
