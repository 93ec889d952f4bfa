//! 集合重组器
//!
//! 一个大对象的条目集合可能被拆成多批、从多个来源到达。重组器按
//! (对象, 来源) 组成的 [`CombinedId`] 分别记录进度，把每批数据交给注入的
//! [`ChunkStore`] 落盘，并在「总数已知且已收条目数等于总数」时把该集合标记为完成。
//!
//! ## 完成检测
//!
//! 每次变更（登记总数或登记一批条目）后都会检查完成条件，
//! 因此无论总数先到还是最后一批先到，完成都只会被触发一次。
//!
//! ## 来源切换
//!
//! 同一对象出现此前未见过的来源时，先触发 `on_source_changed` 再处理本次登记；
//! 旧来源的状态保持不动，是否移除由调用方决定。对象的第一个来源不算切换。
//!
//! ## 并发
//!
//! 所有变更操作在一把覆盖整个重组器的锁内完成，包括调用存储；
//! 钩子经 [`HookDispatcher`] 在锁释放后按事件产生顺序执行，钩子里可以再登记或追加钩子。
//! 存储调用失败时，失败之前已经产生的通知照常分发，再返回错误。

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};

use crate::internal::model::structs::{Chunk, CombinedId, ObjectId, SourceId};
use crate::internal::states::hook_dispatcher::HookDispatcher;
use crate::internal::store::traits::{ChunkIter, ChunkStore};

use super::super::traits::CollectionHook;
use super::collection_hooks_container::CollectionHooksContainer;
use super::collection_state::CollectionState;
use super::hook_adapters::{
    OnCollectionCompletedHookAdapter, OnItemsReceivedHookAdapter, OnSourceChangedHookAdapter,
};
use super::reassembler_error::ReassemblerError;

/// 锁内产生、锁外分发的通知。
enum Notice<I> {
    SourceChanged(ObjectId, SourceId),
    ItemsReceived(ObjectId, Chunk<I>, SourceId),
    Completed(ObjectId, SourceId),
}

impl<I> Notice<I> {
    fn deliver(self, hooks: &mut CollectionHooksContainer<I>) {
        match self {
            Notice::SourceChanged(object_id, source) => {
                hooks.run_on_source_changed(&object_id, &source)
            }
            Notice::ItemsReceived(object_id, chunk, source) => {
                hooks.run_on_items_received(&object_id, &chunk, &source)
            }
            Notice::Completed(object_id, source) => {
                hooks.run_on_collection_completed(&object_id, &source)
            }
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    started: bool,
    states: HashMap<CombinedId, CollectionState>,
    /// 每个对象见过的来源，按首次出现顺序
    sources: HashMap<ObjectId, Vec<SourceId>>,
}

impl Inner {
    /// 记录来源并确保状态存在；新来源且对象已有其他来源时追加切换通知。
    fn track<I>(
        &mut self,
        object_id: &ObjectId,
        source: &SourceId,
        notices: &mut Vec<Notice<I>>,
    ) -> CombinedId {
        let sources = self.sources.entry(object_id.clone()).or_default();
        if !sources.contains(source) {
            if let Some(previous) = sources.last() {
                warn!(object_id = %object_id, previous = %previous, source = %source, "来源切换");
                notices.push(Notice::SourceChanged(object_id.clone(), source.clone()));
            }
            sources.push(source.clone());
        }
        let key = CombinedId::new(object_id, source);
        self.states
            .entry(key.clone())
            .or_insert_with(CollectionState::new);
        key
    }

    fn any_completed(&self, object_id: &ObjectId) -> bool {
        self.first_completed_key(object_id).is_some()
    }

    fn first_completed_key(&self, object_id: &ObjectId) -> Option<CombinedId> {
        self.sources.get(object_id)?.iter().find_map(|source| {
            let key = CombinedId::new(object_id, source);
            self.states
                .get(&key)
                .filter(|state| state.completed)
                .map(|_| key)
        })
    }

    fn reset(&mut self) {
        self.states.clear();
        self.sources.clear();
    }
}

pub struct CollectionReassembler<I> {
    store: Arc<dyn ChunkStore<I>>,
    inner: Mutex<Inner>,
    hooks: HookDispatcher<CollectionHooksContainer<I>, Notice<I>>,
}

impl<I> CollectionReassembler<I> {
    /// 创建重组器；需调用 [`start`](Self::start) 后才能登记数据。
    pub fn new(store: Arc<dyn ChunkStore<I>>) -> Self {
        Self {
            store,
            inner: Mutex::new(Inner::default()),
            hooks: HookDispatcher::default(),
        }
    }

    /// 添加完整钩子。
    pub fn with_hook(self, hook: impl CollectionHook<I> + 'static) -> Self {
        if let Err(e) = self.hooks.modify(|hooks| hooks.add(hook)) {
            warn!(error = %e, "添加钩子失败");
        }
        self
    }

    /// 注册「集合收齐」钩子，参数为 (对象, 来源)。
    pub fn with_on_collection_completed_hook<F>(self, f: F) -> Self
    where
        F: FnMut(&ObjectId, &SourceId) + Send + 'static,
    {
        self.with_hook(OnCollectionCompletedHookAdapter(f))
    }

    /// 注册「收到一批条目」钩子。
    pub fn with_on_items_received_hook<F>(self, f: F) -> Self
    where
        F: FnMut(&ObjectId, &Chunk<I>, &SourceId) + Send + 'static,
    {
        self.with_hook(OnItemsReceivedHookAdapter(f))
    }

    /// 注册「来源切换」钩子。
    pub fn with_on_source_changed_hook<F>(self, f: F) -> Self
    where
        F: FnMut(&ObjectId, &SourceId) + Send + 'static,
    {
        self.with_hook(OnSourceChangedHookAdapter(f))
    }

    /// 运行期追加钩子。
    pub fn add_hook(&self, hook: impl CollectionHook<I> + 'static) -> Result<(), ReassemblerError> {
        self.hooks
            .modify(|hooks| hooks.add(hook))
            .map_err(|_| ReassemblerError::LockPoisoned)
    }

    /// 绑定存储，并为存储中已标记完成的集合重建内存状态。
    /// 上次运行中未完成的集合不会恢复，清理它们由存储的持有方负责。
    /// 键按字典序恢复，同一对象的来源顺序在每次重启后都一致。
    pub fn start(&self) -> Result<(), ReassemblerError> {
        let mut inner = self.lock()?;
        if inner.started {
            return Ok(());
        }
        self.store.start()?;

        let mut keys: Vec<CombinedId> = self.store.collection_ids()?.into_iter().collect();
        keys.sort();

        let mut restored = 0usize;
        for key in keys {
            if !self.store.is_completed(&key)? {
                continue;
            }
            let Some((object_id, source)) = key.split() else {
                warn!(key = %key, "无法解析的集合键，跳过恢复");
                continue;
            };
            let sources = inner.sources.entry(object_id).or_default();
            if !sources.contains(&source) {
                sources.push(source);
            }
            inner.states.insert(key, CollectionState::restored_completed());
            restored += 1;
        }

        inner.started = true;
        info!(restored, "集合重组器已启动");
        Ok(())
    }

    /// 解绑存储并丢弃内存状态；再次 start 时只恢复已完成的集合。
    pub fn stop(&self) -> Result<(), ReassemblerError> {
        let mut inner = self.lock()?;
        if !inner.started {
            return Ok(());
        }
        self.store.stop()?;
        inner.reset();
        inner.started = false;
        info!("集合重组器已停止");
        Ok(())
    }

    /// 登记某来源声明的条目总数；可重复调用，后一次覆盖前一次。
    pub fn register_num_total_items(
        &self,
        object_id: &ObjectId,
        total: u64,
        source: &SourceId,
    ) -> Result<(), ReassemblerError> {
        let mut notices = Vec::new();
        let outcome = self.apply_total(object_id, total, source, &mut notices);
        let dispatched = self.dispatch(notices);
        outcome.and(dispatched)
    }

    /// 登记一批条目：先落盘，再累加计数并检查完成。
    ///
    /// 不按 `order_number` 去重，重复登记同一批会被重复计数。
    pub fn register_incoming_items(
        &self,
        object_id: &ObjectId,
        chunk: Chunk<I>,
        source: &SourceId,
    ) -> Result<(), ReassemblerError> {
        let mut notices = Vec::new();
        let outcome = self.apply_incoming(object_id, chunk, source, &mut notices);
        let dispatched = self.dispatch(notices);
        outcome.and(dispatched)
    }

    /// 任一来源的集合已完成即为 true。
    pub fn is_completed(&self, object_id: &ObjectId) -> Result<bool, ReassemblerError> {
        Ok(self.lock()?.any_completed(object_id))
    }

    /// 存在任一来源的状态（无论是否完成）即为 true。
    pub fn contains(&self, object_id: &ObjectId) -> Result<bool, ReassemblerError> {
        Ok(self.lock()?.sources.contains_key(object_id))
    }

    /// 第一个已完成来源的全部数据块；没有已完成的来源时返回 `None`。
    pub fn get_collection_chunks(
        &self,
        object_id: &ObjectId,
    ) -> Result<Option<ChunkIter<I>>, ReassemblerError> {
        let key = self.lock()?.first_completed_key(object_id);
        match key {
            Some(key) => Ok(Some(self.store.get(&key)?)),
            None => Ok(None),
        }
    }

    /// 对象见过的所有来源，按首次出现顺序。
    pub fn sources(&self, object_id: &ObjectId) -> Result<Vec<SourceId>, ReassemblerError> {
        Ok(self
            .lock()?
            .sources
            .get(object_id)
            .cloned()
            .unwrap_or_default())
    }

    /// 某 (对象, 来源) 当前状态的快照。
    pub fn state(
        &self,
        object_id: &ObjectId,
        source: &SourceId,
    ) -> Result<Option<CollectionState>, ReassemblerError> {
        let key = CombinedId::new(object_id, source);
        Ok(self.lock()?.states.get(&key).cloned())
    }

    /// 移除对象所有来源的状态及已落盘数据。
    pub fn remove(&self, object_id: &ObjectId) -> Result<(), ReassemblerError> {
        let mut inner = self.lock()?;
        let Some(sources) = inner.sources.remove(object_id) else {
            return Ok(());
        };
        for source in &sources {
            let key = CombinedId::new(object_id, source);
            inner.states.remove(&key);
            self.store.remove(&key)?;
        }
        debug!(object_id = %object_id, sources = sources.len(), "对象已移除");
        Ok(())
    }

    pub fn clear(&self) -> Result<(), ReassemblerError> {
        let mut inner = self.lock()?;
        self.store.clear()?;
        inner.reset();
        Ok(())
    }

    /// 清空并销毁存储；之后需重新 start。
    pub fn destroy(&self) -> Result<(), ReassemblerError> {
        let mut inner = self.lock()?;
        self.store.destroy()?;
        inner.reset();
        inner.started = false;
        Ok(())
    }

    pub fn compact(&self) -> Result<(), ReassemblerError> {
        let _inner = self.lock()?;
        self.store.compact()?;
        Ok(())
    }

    pub fn size_in_bytes(&self) -> u64 {
        self.store.size_in_bytes()
    }

    fn apply_total(
        &self,
        object_id: &ObjectId,
        total: u64,
        source: &SourceId,
        notices: &mut Vec<Notice<I>>,
    ) -> Result<(), ReassemblerError> {
        let mut inner = self.lock_started()?;
        let key = inner.track(object_id, source, notices);
        let Some(state) = inner.states.get_mut(&key) else {
            return Ok(());
        };
        if state.completed {
            debug!(object_id = %object_id, source = %source, "集合已完成，忽略总数登记");
            return Ok(());
        }
        state.num_total_items = Some(total);
        state.touch();
        if Self::check_completion(self.store.as_ref(), &key, state)? {
            notices.push(Notice::Completed(object_id.clone(), source.clone()));
        }
        Ok(())
    }

    fn apply_incoming(
        &self,
        object_id: &ObjectId,
        chunk: Chunk<I>,
        source: &SourceId,
        notices: &mut Vec<Notice<I>>,
    ) -> Result<(), ReassemblerError> {
        let mut inner = self.lock_started()?;
        let key = inner.track(object_id, source, notices);
        let Some(state) = inner.states.get_mut(&key) else {
            return Ok(());
        };
        if state.completed {
            warn!(
                object_id = %object_id,
                source = %source,
                order_number = chunk.order_number,
                "集合已完成，忽略多余的数据块"
            );
            return Ok(());
        }

        self.store.save(&key, &chunk)?;
        state.num_current_items += chunk.len() as u64;
        state.touch();
        debug!(
            object_id = %object_id,
            source = %source,
            order_number = chunk.order_number,
            items = chunk.len(),
            current = state.num_current_items,
            total = ?state.num_total_items,
            "数据块已落盘"
        );
        notices.push(Notice::ItemsReceived(object_id.clone(), chunk, source.clone()));
        if Self::check_completion(self.store.as_ref(), &key, state)? {
            notices.push(Notice::Completed(object_id.clone(), source.clone()));
        }
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, ReassemblerError> {
        self.inner.lock().map_err(|_| ReassemblerError::LockPoisoned)
    }

    fn lock_started(&self) -> Result<MutexGuard<'_, Inner>, ReassemblerError> {
        let inner = self.lock()?;
        if !inner.started {
            return Err(ReassemblerError::NotStarted);
        }
        Ok(inner)
    }

    /// 总数已知且已收条目数恰好相等时标记完成；返回本次是否刚刚完成。
    fn check_completion(
        store: &dyn ChunkStore<I>,
        key: &CombinedId,
        state: &mut CollectionState,
    ) -> Result<bool, ReassemblerError> {
        let Some(total) = state.num_total_items else {
            return Ok(false);
        };
        if state.completed {
            return Ok(false);
        }
        if state.num_current_items > total {
            warn!(
                key = %key,
                current = state.num_current_items,
                total,
                "已收条目数超过声明总数，集合无法完成"
            );
            return Ok(false);
        }
        if state.num_current_items < total {
            return Ok(false);
        }
        store.register_as_completed(key)?;
        state.completed = true;
        info!(key = %key, total, "集合已收齐");
        Ok(true)
    }

    fn dispatch(&self, notices: Vec<Notice<I>>) -> Result<(), ReassemblerError> {
        if notices.is_empty() {
            return Ok(());
        }
        self.hooks
            .dispatch(notices, |hooks, notice| notice.deliver(hooks))
            .map_err(|_| ReassemblerError::LockPoisoned)
    }
}
