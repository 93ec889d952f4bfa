use crate::internal::model::structs::{ObjectId, SourceId};
use crate::internal::states::hook_dispatcher::HookList;

use super::super::traits::ObjectHook;

/// 协调器钩子容器：多个订阅者，按添加顺序执行。
pub struct ObjectHooksContainer<H> {
    hooks: Vec<Box<dyn ObjectHook<H>>>,
}

impl<H> Default for ObjectHooksContainer<H> {
    fn default() -> Self {
        Self { hooks: Vec::new() }
    }
}

impl<H> HookList for ObjectHooksContainer<H> {
    fn append(&mut self, mut later: Self) {
        self.hooks.append(&mut later.hooks);
    }
}

impl<H> ObjectHooksContainer<H> {
    pub fn add(&mut self, hook: impl ObjectHook<H> + 'static) {
        self.hooks.push(Box::new(hook));
    }

    pub fn run_on_header_received(&mut self, object_id: &ObjectId, header: &H, source: &SourceId) {
        for h in self.hooks.iter_mut() {
            h.on_header_received(object_id, header, source);
        }
    }

    pub fn run_on_object_received(&mut self, object_id: &ObjectId, source: &SourceId) {
        for h in self.hooks.iter_mut() {
            h.on_object_received(object_id, source);
        }
    }
}
