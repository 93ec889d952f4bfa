//! 对象协调器
//!
//! 大对象由头部与条目集合两部分组成，两者到达顺序不定。协调器保存头部，
//! 包装一个 [`CollectionReassembler`]，并在两边都到齐时发出一次 `on_object_received`：
//!
//! - `register_header`：保存头部，记下「头部已到」；若「集合已收齐」已在，则发出通知并清除两边标记
//! - 重组器的完成回调：记下「集合已收齐」；若「头部已到」已在，则发出通知并清除两边标记
//!
//! 两条路径对称，后到的那个信号触发通知。两组标记由同一把锁保护，
//! 检查与清除在锁内一次完成，因此每个对象每轮恰好通知一次。
//!
//! 钩子经 [`HookDispatcher`] 在锁外执行，钩子里可以再登记头部或条目。

use std::sync::{Arc, Mutex};

use tracing::{error, info};

use crate::internal::deserializer::structs::DeserializerEvent;
use crate::internal::model::structs::{Chunk, ObjectId, SourceId};
use crate::internal::reassembler::structs::{CollectionReassembler, CollectionState};
use crate::internal::reassembler::traits::CollectionHook;
use crate::internal::states::hook_dispatcher::HookDispatcher;
use crate::internal::store::traits::{ChunkIter, ChunkStore, HeaderStore};

use super::super::traits::ObjectHook;
use super::completion_markers::{CompletionMarkers, Marker};
use super::coordinator_error::CoordinatorError;
use super::hook_adapters::{OnHeaderReceivedHookAdapter, OnObjectReceivedHookAdapter};
use super::object_hooks_container::ObjectHooksContainer;

enum ObjectNotice<H> {
    HeaderReceived(ObjectId, H, SourceId),
    ObjectReceived(ObjectId, SourceId),
}

impl<H> ObjectNotice<H> {
    fn deliver(self, hooks: &mut ObjectHooksContainer<H>) {
        match self {
            ObjectNotice::HeaderReceived(object_id, header, source) => {
                hooks.run_on_header_received(&object_id, &header, &source)
            }
            ObjectNotice::ObjectReceived(object_id, source) => {
                hooks.run_on_object_received(&object_id, &source)
            }
        }
    }
}

/// 协调器与其挂在重组器上的完成回调共享的部分。
struct Shared<H> {
    markers: Mutex<CompletionMarkers>,
    hooks: HookDispatcher<ObjectHooksContainer<H>, ObjectNotice<H>>,
}

impl<H> Shared<H> {
    fn dispatch(&self, notice: ObjectNotice<H>) -> Result<(), CoordinatorError> {
        self.hooks
            .dispatch([notice], |hooks, notice| notice.deliver(hooks))
            .map_err(|_| CoordinatorError::LockPoisoned)
    }

    /// 记下标记；两边到齐时在锁外通知订阅者。
    fn mark(
        &self,
        marker: Marker,
        object_id: &ObjectId,
        source: &SourceId,
    ) -> Result<bool, CoordinatorError> {
        let received = self
            .markers
            .lock()
            .map_err(|_| CoordinatorError::LockPoisoned)?
            .mark(marker, object_id);
        if received {
            info!(object_id = %object_id, source = %source, "对象已完整接收");
            self.dispatch(ObjectNotice::ObjectReceived(object_id.clone(), source.clone()))?;
        }
        Ok(received)
    }
}

/// 挂到重组器上的完成回调，把集合收齐转成完成标记。
struct CollectionCompletedBridge<H> {
    shared: Arc<Shared<H>>,
}

impl<H, I> CollectionHook<I> for CollectionCompletedBridge<H>
where
    H: Send + 'static,
{
    fn on_collection_completed(&mut self, object_id: &ObjectId, source: &SourceId) {
        if let Err(e) = self
            .shared
            .mark(Marker::CollectionCompleted, object_id, source)
        {
            error!(object_id = %object_id, error = %e, "记录集合完成标记失败");
        }
    }
}

pub struct ObjectCoordinator<H, I> {
    header_store: Arc<dyn HeaderStore<H>>,
    reassembler: CollectionReassembler<I>,
    shared: Arc<Shared<H>>,
}

impl<H, I> ObjectCoordinator<H, I>
where
    H: Send + 'static,
    I: 'static,
{
    pub fn new(header_store: Arc<dyn HeaderStore<H>>, chunk_store: Arc<dyn ChunkStore<I>>) -> Self {
        let shared = Arc::new(Shared {
            markers: Mutex::new(CompletionMarkers::default()),
            hooks: HookDispatcher::default(),
        });
        let reassembler = CollectionReassembler::new(chunk_store).with_hook(CollectionCompletedBridge {
            shared: Arc::clone(&shared),
        });
        Self {
            header_store,
            reassembler,
            shared,
        }
    }

    /// 添加完整的协调器钩子。
    pub fn with_hook(self, hook: impl ObjectHook<H> + 'static) -> Self {
        if let Err(e) = self.shared.hooks.modify(|hooks| hooks.add(hook)) {
            error!(error = %e, "添加钩子失败");
        }
        self
    }

    /// 注册「对象已接收」钩子，参数为 (对象, 来源)。
    pub fn with_on_object_received_hook<F>(self, f: F) -> Self
    where
        F: FnMut(&ObjectId, &SourceId) + Send + 'static,
    {
        self.with_hook(OnObjectReceivedHookAdapter(f))
    }

    /// 注册「头部已保存」钩子。
    pub fn with_on_header_received_hook<F>(self, f: F) -> Self
    where
        F: FnMut(&ObjectId, &H, &SourceId) + Send + 'static,
    {
        self.with_hook(OnHeaderReceivedHookAdapter(f))
    }

    /// 透传给内部重组器的集合钩子。
    pub fn with_collection_hook(mut self, hook: impl CollectionHook<I> + 'static) -> Self {
        self.reassembler = self.reassembler.with_hook(hook);
        self
    }

    pub fn with_on_collection_completed_hook<F>(mut self, f: F) -> Self
    where
        F: FnMut(&ObjectId, &SourceId) + Send + 'static,
    {
        self.reassembler = self.reassembler.with_on_collection_completed_hook(f);
        self
    }

    pub fn with_on_items_received_hook<F>(mut self, f: F) -> Self
    where
        F: FnMut(&ObjectId, &Chunk<I>, &SourceId) + Send + 'static,
    {
        self.reassembler = self.reassembler.with_on_items_received_hook(f);
        self
    }

    pub fn with_on_source_changed_hook<F>(mut self, f: F) -> Self
    where
        F: FnMut(&ObjectId, &SourceId) + Send + 'static,
    {
        self.reassembler = self.reassembler.with_on_source_changed_hook(f);
        self
    }

    /// 运行期追加协调器钩子。
    pub fn add_hook(&self, hook: impl ObjectHook<H> + 'static) -> Result<(), CoordinatorError> {
        self.shared
            .hooks
            .modify(|hooks| hooks.add(hook))
            .map_err(|_| CoordinatorError::LockPoisoned)
    }

    /// 内部重组器，供需要直接访问的调用方使用。
    pub fn reassembler(&self) -> &CollectionReassembler<I> {
        &self.reassembler
    }

    pub fn start(&self) -> Result<(), CoordinatorError> {
        self.header_store.start()?;
        self.reassembler.start()?;
        Ok(())
    }

    pub fn stop(&self) -> Result<(), CoordinatorError> {
        self.reassembler.stop()?;
        self.header_store.stop()?;
        self.lock_markers()?.clear();
        Ok(())
    }

    /// 保存头部并记下「头部已到」；集合已收齐时发出 `on_object_received`。
    pub fn register_header(
        &self,
        object_id: &ObjectId,
        header: H,
        source: &SourceId,
    ) -> Result<(), CoordinatorError> {
        self.header_store.save(object_id, &header)?;
        self.shared.dispatch(ObjectNotice::HeaderReceived(
            object_id.clone(),
            header,
            source.clone(),
        ))?;
        self.shared.mark(Marker::HeaderReceived, object_id, source)?;
        Ok(())
    }

    pub fn get_header(&self, object_id: &ObjectId) -> Result<Option<H>, CoordinatorError> {
        Ok(self.header_store.get(object_id)?)
    }

    pub fn register_num_total_items(
        &self,
        object_id: &ObjectId,
        total: u64,
        source: &SourceId,
    ) -> Result<(), CoordinatorError> {
        Ok(self
            .reassembler
            .register_num_total_items(object_id, total, source)?)
    }

    pub fn register_incoming_items(
        &self,
        object_id: &ObjectId,
        chunk: Chunk<I>,
        source: &SourceId,
    ) -> Result<(), CoordinatorError> {
        Ok(self
            .reassembler
            .register_incoming_items(object_id, chunk, source)?)
    }

    /// 把反序列化事件转交到对应的登记操作：
    /// `HeaderParsed` → 登记头部与条目总数，`ItemsBatch` → 登记条目；
    /// `Error` / `Cancelled` 原样作为错误返回，由调用方决定是否 `remove`。
    pub fn apply_event(
        &self,
        object_id: &ObjectId,
        source: &SourceId,
        event: DeserializerEvent<H, I>,
    ) -> Result<(), CoordinatorError> {
        match event {
            DeserializerEvent::HeaderParsed { header, num_items } => {
                self.register_header(object_id, header, source)?;
                self.register_num_total_items(object_id, num_items, source)
            }
            DeserializerEvent::ItemsBatch(chunk) => {
                self.register_incoming_items(object_id, chunk, source)
            }
            DeserializerEvent::Error(e) => Err(CoordinatorError::Parse(e)),
            DeserializerEvent::Cancelled => Err(CoordinatorError::Cancelled),
        }
    }

    pub fn is_completed(&self, object_id: &ObjectId) -> Result<bool, CoordinatorError> {
        Ok(self.reassembler.is_completed(object_id)?)
    }

    pub fn contains(&self, object_id: &ObjectId) -> Result<bool, CoordinatorError> {
        Ok(self.reassembler.contains(object_id)?)
    }

    pub fn get_collection_chunks(
        &self,
        object_id: &ObjectId,
    ) -> Result<Option<ChunkIter<I>>, CoordinatorError> {
        Ok(self.reassembler.get_collection_chunks(object_id)?)
    }

    pub fn sources(&self, object_id: &ObjectId) -> Result<Vec<SourceId>, CoordinatorError> {
        Ok(self.reassembler.sources(object_id)?)
    }

    pub fn state(
        &self,
        object_id: &ObjectId,
        source: &SourceId,
    ) -> Result<Option<CollectionState>, CoordinatorError> {
        Ok(self.reassembler.state(object_id, source)?)
    }

    /// 某种完成标记当前是否挂着（即另一半尚未到达）。
    pub fn is_pending(&self, marker: Marker, object_id: &ObjectId) -> Result<bool, CoordinatorError> {
        Ok(self.lock_markers()?.contains(marker, object_id))
    }

    /// 移除对象的头部、集合及挂起的完成标记。
    pub fn remove(&self, object_id: &ObjectId) -> Result<(), CoordinatorError> {
        self.header_store.remove(object_id)?;
        self.reassembler.remove(object_id)?;
        self.lock_markers()?.remove(object_id);
        Ok(())
    }

    pub fn clear(&self) -> Result<(), CoordinatorError> {
        self.header_store.clear()?;
        self.reassembler.clear()?;
        self.lock_markers()?.clear();
        Ok(())
    }

    pub fn destroy(&self) -> Result<(), CoordinatorError> {
        self.header_store.destroy()?;
        self.reassembler.destroy()?;
        self.lock_markers()?.clear();
        Ok(())
    }

    pub fn compact(&self) -> Result<(), CoordinatorError> {
        self.header_store.compact()?;
        self.reassembler.compact()?;
        Ok(())
    }

    /// 头部与数据块存储的总占用。
    pub fn size_in_bytes(&self) -> u64 {
        self.header_store.size_in_bytes() + self.reassembler.size_in_bytes()
    }

    fn lock_markers(&self) -> Result<std::sync::MutexGuard<'_, CompletionMarkers>, CoordinatorError> {
        self.shared
            .markers
            .lock()
            .map_err(|_| CoordinatorError::LockPoisoned)
    }
}
