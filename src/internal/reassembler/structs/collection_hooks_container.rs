use crate::internal::model::structs::{Chunk, ObjectId, SourceId};
use crate::internal::states::hook_dispatcher::HookList;

use super::super::traits::CollectionHook;

/// 钩子容器：多个订阅者，按添加顺序执行。
pub struct CollectionHooksContainer<I> {
    hooks: Vec<Box<dyn CollectionHook<I>>>,
}

impl<I> Default for CollectionHooksContainer<I> {
    fn default() -> Self {
        Self { hooks: Vec::new() }
    }
}

impl<I> HookList for CollectionHooksContainer<I> {
    fn append(&mut self, mut later: Self) {
        self.hooks.append(&mut later.hooks);
    }
}

impl<I> CollectionHooksContainer<I> {
    pub fn add(&mut self, hook: impl CollectionHook<I> + 'static) {
        self.hooks.push(Box::new(hook));
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    pub fn run_on_collection_completed(&mut self, object_id: &ObjectId, source: &SourceId) {
        for h in self.hooks.iter_mut() {
            h.on_collection_completed(object_id, source);
        }
    }

    pub fn run_on_items_received(&mut self, object_id: &ObjectId, chunk: &Chunk<I>, source: &SourceId) {
        for h in self.hooks.iter_mut() {
            h.on_items_received(object_id, chunk, source);
        }
    }

    pub fn run_on_source_changed(&mut self, object_id: &ObjectId, source: &SourceId) {
        for h in self.hooks.iter_mut() {
            h.on_source_changed(object_id, source);
        }
    }
}
