//! 单回调适配器：将闭包包装成 [`CollectionHook`]，供 `with_xx_hook` 使用。

use crate::internal::model::structs::{Chunk, ObjectId, SourceId};

use super::super::traits::CollectionHook;

/// 仅实现「集合收齐」的钩子适配器。
pub(crate) struct OnCollectionCompletedHookAdapter<F>(pub(crate) F);

impl<I, F> CollectionHook<I> for OnCollectionCompletedHookAdapter<F>
where
    F: FnMut(&ObjectId, &SourceId) + Send,
{
    fn on_collection_completed(&mut self, object_id: &ObjectId, source: &SourceId) {
        (self.0)(object_id, source);
    }
}

/// 仅实现「收到一批条目」的钩子适配器。
pub(crate) struct OnItemsReceivedHookAdapter<F>(pub(crate) F);

impl<I, F> CollectionHook<I> for OnItemsReceivedHookAdapter<F>
where
    F: FnMut(&ObjectId, &Chunk<I>, &SourceId) + Send,
{
    fn on_items_received(&mut self, object_id: &ObjectId, chunk: &Chunk<I>, source: &SourceId) {
        (self.0)(object_id, chunk, source);
    }
}

/// 仅实现「来源切换」的钩子适配器。
pub(crate) struct OnSourceChangedHookAdapter<F>(pub(crate) F);

impl<I, F> CollectionHook<I> for OnSourceChangedHookAdapter<F>
where
    F: FnMut(&ObjectId, &SourceId) + Send,
{
    fn on_source_changed(&mut self, object_id: &ObjectId, source: &SourceId) {
        (self.0)(object_id, source);
    }
}
