//! 集合重组器测试：完成检测与顺序无关、来源隔离、来源切换、完成后只读、重启恢复、钩子。

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use crate::model::{Chunk, CombinedId, ObjectId, SourceId};
use crate::reassembler::{CollectionHook, CollectionReassembler, ReassemblerError};
use crate::store::{ChunkIter, ChunkStore, MemoryChunkStore, StoreError};
use crate::tests::{
    init_tracing, memory_reassembler, numbered_chunk, object_id, source, CollectionCall,
    Recorder, RecordingCollectionHook,
};

fn recording(
    reassembler: CollectionReassembler<u32>,
) -> (CollectionReassembler<u32>, Recorder<CollectionCall>) {
    let calls = Recorder::default();
    let reassembler = reassembler.with_hook(RecordingCollectionHook {
        calls: calls.clone(),
    });
    (reassembler, calls)
}

fn completions(calls: &Recorder<CollectionCall>) -> usize {
    calls
        .snapshot()
        .iter()
        .filter(|c| matches!(c, CollectionCall::Completed(..)))
        .count()
}

// ═══════════════════════════ 完成检测 ═══════════════════════════

#[test]
fn example_block_completes_after_third_chunk() {
    init_tracing();
    let (_, reassembler) = memory_reassembler();
    let (reassembler, calls) = recording(reassembler);
    let blk = object_id("blk123");
    let peer = source("peer-A");

    reassembler.register_num_total_items(&blk, 1000, &peer).unwrap();
    reassembler.register_incoming_items(&blk, numbered_chunk(0, 0, 400), &peer).unwrap();
    reassembler.register_incoming_items(&blk, numbered_chunk(1, 400, 400), &peer).unwrap();
    assert!(!reassembler.is_completed(&blk).unwrap());
    assert!(reassembler.get_collection_chunks(&blk).unwrap().is_none());

    reassembler.register_incoming_items(&blk, numbered_chunk(2, 800, 200), &peer).unwrap();
    assert!(reassembler.is_completed(&blk).unwrap());

    let chunks: Vec<Chunk<u32>> = reassembler
        .get_collection_chunks(&blk)
        .unwrap()
        .expect("已完成的集合应能读取")
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(
        chunks.iter().map(|c| (c.order_number, c.len())).collect::<Vec<_>>(),
        vec![(0, 400), (1, 400), (2, 200)]
    );
    let items: Vec<u32> = chunks.into_iter().flat_map(|c| c.items).collect();
    assert_eq!(items, (0..1000).collect::<Vec<_>>());
    assert_eq!(completions(&calls), 1);

    let state = reassembler.state(&blk, &peer).unwrap().unwrap();
    assert_eq!(state.num_total_items, Some(1000));
    assert_eq!(state.num_current_items, 1000);
    assert!(state.completed);
    assert_eq!(state.pct(), 100.0);
}

#[test]
fn total_after_chunks_completes_once() {
    let (_, reassembler) = memory_reassembler();
    let (reassembler, calls) = recording(reassembler);
    let id = object_id("obj");
    let peer = source("peer");

    reassembler.register_incoming_items(&id, numbered_chunk(0, 0, 3), &peer).unwrap();
    reassembler.register_incoming_items(&id, numbered_chunk(1, 3, 2), &peer).unwrap();
    assert!(!reassembler.is_completed(&id).unwrap());
    assert!(reassembler.state(&id, &peer).unwrap().unwrap().pct().is_nan());

    reassembler.register_num_total_items(&id, 5, &peer).unwrap();
    assert!(reassembler.is_completed(&id).unwrap());
    assert_eq!(completions(&calls), 1);
}

#[test]
fn empty_collection_completes_on_total() {
    let (_, reassembler) = memory_reassembler();
    let (reassembler, calls) = recording(reassembler);
    let id = object_id("empty");
    let peer = source("peer");

    reassembler.register_num_total_items(&id, 0, &peer).unwrap();
    assert!(reassembler.is_completed(&id).unwrap());
    assert_eq!(reassembler.get_collection_chunks(&id).unwrap().unwrap().count(), 0);
    assert_eq!(
        calls.snapshot(),
        vec![CollectionCall::Completed("empty".into(), "peer".into())]
    );
}

#[test]
fn overflow_never_completes() {
    let (_, reassembler) = memory_reassembler();
    let (reassembler, calls) = recording(reassembler);
    let id = object_id("over");
    let peer = source("peer");

    reassembler.register_num_total_items(&id, 4, &peer).unwrap();
    reassembler.register_incoming_items(&id, numbered_chunk(0, 0, 3), &peer).unwrap();
    // 重放同一批：不去重，计数越过总数
    reassembler.register_incoming_items(&id, numbered_chunk(0, 0, 3), &peer).unwrap();

    assert!(!reassembler.is_completed(&id).unwrap());
    assert_eq!(reassembler.state(&id, &peer).unwrap().unwrap().num_current_items, 6);
    assert_eq!(completions(&calls), 0);
}

#[test]
fn completed_collection_ignores_further_registrations() {
    let (store, reassembler) = memory_reassembler();
    let (reassembler, calls) = recording(reassembler);
    let id = object_id("done");
    let peer = source("peer");

    reassembler.register_num_total_items(&id, 2, &peer).unwrap();
    reassembler.register_incoming_items(&id, numbered_chunk(0, 0, 2), &peer).unwrap();
    let size = store.size_in_bytes();
    let before = reassembler.state(&id, &peer).unwrap().unwrap();

    reassembler.register_incoming_items(&id, numbered_chunk(1, 2, 5), &peer).unwrap();
    reassembler.register_num_total_items(&id, 99, &peer).unwrap();

    assert_eq!(reassembler.state(&id, &peer).unwrap().unwrap(), before);
    assert_eq!(store.size_in_bytes(), size);
    assert_eq!(completions(&calls), 1);
    assert_eq!(calls.len(), 2);
}

// ═══════════════════════════ 来源 ═══════════════════════════

#[test]
fn sources_are_isolated() {
    let (store, reassembler) = memory_reassembler();
    let id = object_id("shared");
    let (a, b) = (source("peerA"), source("peerB"));

    reassembler.register_num_total_items(&id, 4, &a).unwrap();
    reassembler.register_num_total_items(&id, 4, &b).unwrap();
    reassembler.register_incoming_items(&id, numbered_chunk(0, 0, 4), &a).unwrap();
    reassembler.register_incoming_items(&id, numbered_chunk(0, 0, 2), &b).unwrap();

    let state_a = reassembler.state(&id, &a).unwrap().unwrap();
    let state_b = reassembler.state(&id, &b).unwrap().unwrap();
    assert!(state_a.completed);
    assert!(!state_b.completed);
    assert_eq!(state_b.num_current_items, 2);

    let key_a = CombinedId::new(&id, &a);
    let key_b = CombinedId::new(&id, &b);
    assert_ne!(key_a, key_b);
    assert!(store.is_completed(&key_a).unwrap());
    assert!(!store.is_completed(&key_b).unwrap());
    assert_eq!(store.get(&key_b).unwrap().count(), 1);
}

#[test]
fn new_source_fires_source_changed_and_keeps_old_state() {
    let (_, reassembler) = memory_reassembler();
    let (reassembler, calls) = recording(reassembler);
    let id = object_id("obj");
    let (a, b) = (source("a"), source("b"));

    reassembler.register_num_total_items(&id, 10, &a).unwrap();
    reassembler.register_incoming_items(&id, numbered_chunk(0, 0, 3), &a).unwrap();
    reassembler.register_incoming_items(&id, numbered_chunk(0, 0, 4), &b).unwrap();
    reassembler.register_incoming_items(&id, numbered_chunk(1, 4, 1), &b).unwrap();

    assert_eq!(
        calls.snapshot(),
        vec![
            CollectionCall::ItemsReceived("obj".into(), 0, 3, "a".into()),
            CollectionCall::SourceChanged("obj".into(), "b".into()),
            CollectionCall::ItemsReceived("obj".into(), 0, 4, "b".into()),
            CollectionCall::ItemsReceived("obj".into(), 1, 1, "b".into()),
        ]
    );
    assert_eq!(reassembler.sources(&id).unwrap(), vec![a.clone(), b.clone()]);
    assert_eq!(reassembler.state(&id, &a).unwrap().unwrap().num_current_items, 3);
}

#[test]
fn ids_containing_separator_do_not_collide() {
    let (store, reassembler) = memory_reassembler();
    let (x, y) = (object_id("a:b"), object_id("a"));
    let (sx, sy) = (source("c"), source("b:c"));

    reassembler.register_incoming_items(&x, numbered_chunk(0, 0, 1), &sx).unwrap();
    reassembler.register_incoming_items(&y, numbered_chunk(0, 0, 2), &sy).unwrap();

    assert_eq!(store.collection_ids().unwrap().len(), 2);
    assert_eq!(CombinedId::new(&x, &sx).split(), Some((x.clone(), sx.clone())));
    assert_eq!(reassembler.state(&x, &sx).unwrap().unwrap().num_current_items, 1);
    assert_eq!(reassembler.state(&y, &sy).unwrap().unwrap().num_current_items, 2);
}

// ═══════════════════════════ 生命周期 ═══════════════════════════

#[test]
fn registration_before_start_is_rejected() {
    let reassembler = CollectionReassembler::new(Arc::new(MemoryChunkStore::<u32>::new()));
    let err = reassembler
        .register_num_total_items(&object_id("x"), 1, &source("p"))
        .unwrap_err();
    assert!(matches!(err, ReassemblerError::NotStarted));
}

#[test]
fn restart_restores_only_completed_collections() {
    let (store, reassembler) = memory_reassembler();
    let (done, partial) = (object_id("done"), object_id("partial"));
    let peer = source("peer:1");

    reassembler.register_num_total_items(&done, 1, &peer).unwrap();
    reassembler.register_incoming_items(&done, numbered_chunk(0, 0, 1), &peer).unwrap();
    reassembler.register_num_total_items(&partial, 5, &peer).unwrap();
    reassembler.register_incoming_items(&partial, numbered_chunk(0, 0, 1), &peer).unwrap();
    reassembler.stop().unwrap();

    let restarted = CollectionReassembler::new(store.clone());
    restarted.start().unwrap();

    assert!(restarted.is_completed(&done).unwrap());
    assert_eq!(restarted.sources(&done).unwrap(), vec![peer.clone()]);
    let state = restarted.state(&done, &peer).unwrap().unwrap();
    assert_eq!(state.num_total_items, None);
    assert_eq!(state.num_current_items, 0);
    assert_eq!(restarted.get_collection_chunks(&done).unwrap().unwrap().count(), 1);

    assert!(!restarted.contains(&partial).unwrap());
    // 未完成集合的数据仍在存储中，由持有方清理
    assert!(store.contains(&CombinedId::new(&partial, &peer)).unwrap());
}

#[test]
fn restart_restores_sources_in_key_order() {
    let (store, reassembler) = memory_reassembler();
    let id = object_id("multi");
    let (b, a) = (source("b"), source("a"));

    reassembler.register_num_total_items(&id, 1, &b).unwrap();
    reassembler.register_incoming_items(&id, numbered_chunk(0, 0, 1), &b).unwrap();
    reassembler.register_num_total_items(&id, 2, &a).unwrap();
    reassembler.register_incoming_items(&id, numbered_chunk(0, 0, 2), &a).unwrap();
    assert_eq!(reassembler.sources(&id).unwrap(), vec![b.clone(), a.clone()]);
    reassembler.stop().unwrap();

    for _ in 0..3 {
        let restarted = CollectionReassembler::new(store.clone());
        restarted.start().unwrap();
        assert_eq!(restarted.sources(&id).unwrap(), vec![a.clone(), b.clone()]);
        let first: Vec<Chunk<u32>> = restarted
            .get_collection_chunks(&id)
            .unwrap()
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(first.iter().map(Chunk::len).sum::<usize>(), 2);
    }
}

#[test]
fn restart_skips_unparseable_keys() {
    let (store, reassembler) = memory_reassembler();
    let id = object_id("ok");
    let peer = source("p");
    reassembler.register_num_total_items(&id, 0, &peer).unwrap();
    reassembler.stop().unwrap();
    store
        .register_as_completed(&CombinedId::from_raw("no-separator"))
        .unwrap();

    let restarted = CollectionReassembler::new(store.clone());
    restarted.start().unwrap();

    assert!(restarted.is_completed(&id).unwrap());
    assert!(!restarted.contains(&object_id("no-separator")).unwrap());
    assert_eq!(store.collection_ids().unwrap().len(), 2);
}

#[test]
fn remove_drops_state_and_stored_chunks() {
    let (store, reassembler) = memory_reassembler();
    let id = object_id("gone");
    let (a, b) = (source("a"), source("b"));
    reassembler.register_incoming_items(&id, numbered_chunk(0, 0, 1), &a).unwrap();
    reassembler.register_incoming_items(&id, numbered_chunk(0, 0, 1), &b).unwrap();
    assert!(reassembler.contains(&id).unwrap());

    reassembler.remove(&id).unwrap();

    assert!(!reassembler.contains(&id).unwrap());
    assert!(reassembler.sources(&id).unwrap().is_empty());
    assert!(store.collection_ids().unwrap().is_empty());
    assert_eq!(reassembler.size_in_bytes(), 0);
}

#[test]
fn clear_and_destroy() {
    let (_, reassembler) = memory_reassembler();
    let id = object_id("obj");
    let peer = source("p");
    reassembler.register_incoming_items(&id, numbered_chunk(0, 0, 3), &peer).unwrap();
    assert!(reassembler.size_in_bytes() > 0);

    reassembler.clear().unwrap();
    assert!(!reassembler.contains(&id).unwrap());
    reassembler.register_incoming_items(&id, numbered_chunk(0, 0, 3), &peer).unwrap();
    reassembler.compact().unwrap();

    reassembler.destroy().unwrap();
    assert_eq!(reassembler.size_in_bytes(), 0);
    assert!(matches!(
        reassembler.register_incoming_items(&id, numbered_chunk(0, 0, 1), &peer),
        Err(ReassemblerError::NotStarted)
    ));
}

// ═══════════════════════════ 钩子 ═══════════════════════════

#[test]
fn closure_hooks_fan_out_in_order() {
    let first = Recorder::default();
    let second = Recorder::default();
    let (f, s) = (first.clone(), second.clone());
    let (_, reassembler) = memory_reassembler();
    let reassembler = reassembler
        .with_on_collection_completed_hook(move |id, src| f.push(format!("first {id} {src}")))
        .with_on_collection_completed_hook(move |id, src| s.push(format!("second {id} {src}")));
    let items = Recorder::default();
    let it = items.clone();
    reassembler
        .add_hook(RecordingCollectionHook { calls: it })
        .unwrap();

    let id = object_id("o");
    let peer = source("p");
    reassembler.register_num_total_items(&id, 1, &peer).unwrap();
    reassembler.register_incoming_items(&id, numbered_chunk(0, 0, 1), &peer).unwrap();

    assert_eq!(first.snapshot(), vec!["first o p".to_string()]);
    assert_eq!(second.snapshot(), vec!["second o p".to_string()]);
    assert_eq!(
        items.snapshot(),
        vec![
            CollectionCall::ItemsReceived("o".into(), 0, 1, "p".into()),
            CollectionCall::Completed("o".into(), "p".into()),
        ]
    );
}

#[test]
fn hooks_may_query_the_reassembler() {
    let (_, reassembler) = memory_reassembler();
    let reassembler = Arc::new(reassembler);
    let seen = Recorder::default();
    let (r, s) = (Arc::clone(&reassembler), seen.clone());
    reassembler
        .add_hook(QueryOnComplete {
            reassembler: r,
            seen: s,
        })
        .unwrap();

    let id = object_id("q");
    let peer = source("p");
    reassembler.register_num_total_items(&id, 0, &peer).unwrap();

    assert_eq!(seen.snapshot(), vec![true]);
}

#[test]
fn hooks_may_register_on_the_reassembler() {
    let (_, reassembler) = memory_reassembler();
    let (reassembler, calls) = recording(reassembler);
    let reassembler = Arc::new(reassembler);
    let results = Recorder::default();
    reassembler
        .add_hook(DeclareTotalOnItems {
            reassembler: Arc::downgrade(&reassembler),
            results: results.clone(),
        })
        .unwrap();

    let id = object_id("nested");
    let peer = source("p");
    reassembler.register_incoming_items(&id, numbered_chunk(0, 0, 1), &peer).unwrap();

    assert_eq!(results.snapshot(), vec![true]);
    assert!(reassembler.is_completed(&id).unwrap());
    // 钩子内登记产生的完成通知排在当前这条之后
    assert_eq!(
        calls.snapshot(),
        vec![
            CollectionCall::ItemsReceived("nested".into(), 0, 1, "p".into()),
            CollectionCall::Completed("nested".into(), "p".into()),
        ]
    );
}

#[test]
fn hook_added_from_a_hook_sees_later_notices() {
    let (_, reassembler) = memory_reassembler();
    let reassembler = Arc::new(reassembler);
    let late = Recorder::default();
    reassembler
        .add_hook(AddHookOnComplete {
            reassembler: Arc::downgrade(&reassembler),
            late: late.clone(),
        })
        .unwrap();

    let peer = source("p");
    reassembler.register_num_total_items(&object_id("first"), 0, &peer).unwrap();
    assert!(late.snapshot().is_empty());

    reassembler
        .register_incoming_items(&object_id("second"), numbered_chunk(0, 0, 1), &peer)
        .unwrap();
    assert_eq!(
        late.snapshot(),
        vec![CollectionCall::ItemsReceived("second".into(), 0, 1, "p".into())]
    );
}

/// 收到一批条目后，以这批的条目数回头登记总数。
struct DeclareTotalOnItems {
    reassembler: Weak<CollectionReassembler<u32>>,
    results: Recorder<bool>,
}

impl CollectionHook<u32> for DeclareTotalOnItems {
    fn on_items_received(&mut self, object_id: &ObjectId, chunk: &Chunk<u32>, source: &SourceId) {
        if let Some(reassembler) = self.reassembler.upgrade() {
            let ok = reassembler
                .register_num_total_items(object_id, chunk.len() as u64, source)
                .is_ok();
            self.results.push(ok);
        }
    }
}

/// 第一次完成时再挂一个记录钩子。
struct AddHookOnComplete {
    reassembler: Weak<CollectionReassembler<u32>>,
    late: Recorder<CollectionCall>,
}

impl CollectionHook<u32> for AddHookOnComplete {
    fn on_collection_completed(&mut self, _object_id: &ObjectId, _source: &SourceId) {
        if let Some(reassembler) = self.reassembler.upgrade() {
            reassembler
                .add_hook(RecordingCollectionHook {
                    calls: self.late.clone(),
                })
                .unwrap();
        }
    }
}

struct QueryOnComplete {
    reassembler: Arc<CollectionReassembler<u32>>,
    seen: Recorder<bool>,
}

/// 在完成回调里反查重组器。
impl CollectionHook<u32> for QueryOnComplete {
    fn on_collection_completed(&mut self, object_id: &ObjectId, _source: &SourceId) {
        self.seen
            .push(self.reassembler.is_completed(object_id).unwrap_or(false));
    }
}

// ═══════════════════════════ 存储失败 ═══════════════════════════

/// 保存总是失败的存储。
struct FailingStore;

impl ChunkStore<u32> for FailingStore {
    fn save(&self, _key: &CombinedId, _chunk: &Chunk<u32>) -> Result<(), StoreError> {
        Err(StoreError::Backend("磁盘已满".into()))
    }

    fn get(&self, _key: &CombinedId) -> Result<ChunkIter<u32>, StoreError> {
        Ok(Box::new(std::iter::empty()))
    }

    fn remove(&self, _key: &CombinedId) -> Result<(), StoreError> {
        Ok(())
    }

    fn contains(&self, _key: &CombinedId) -> Result<bool, StoreError> {
        Ok(false)
    }

    fn register_as_completed(&self, _key: &CombinedId) -> Result<(), StoreError> {
        Ok(())
    }

    fn is_completed(&self, _key: &CombinedId) -> Result<bool, StoreError> {
        Ok(false)
    }

    fn collection_ids(&self) -> Result<HashSet<CombinedId>, StoreError> {
        Ok(HashSet::new())
    }

    fn clear(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn destroy(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn compact(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn size_in_bytes(&self) -> u64 {
        0
    }
}

#[test]
fn store_failure_is_propagated_and_not_counted() {
    let reassembler = CollectionReassembler::new(Arc::new(FailingStore));
    reassembler.start().unwrap();
    let id = object_id("f");
    let peer = source("p");

    let err = reassembler
        .register_incoming_items(&id, numbered_chunk(0, 0, 2), &peer)
        .unwrap_err();

    assert!(matches!(err, ReassemblerError::Store(StoreError::Backend(_))));
    assert_eq!(reassembler.state(&id, &peer).unwrap().unwrap().num_current_items, 0);
}

/// 内存存储外面包一层，可让下一次保存或下一次完成标记失败。
struct FlakyStore {
    inner: MemoryChunkStore<u32>,
    fail_next_save: AtomicBool,
    fail_next_completion: AtomicBool,
}

impl FlakyStore {
    fn new() -> Self {
        Self {
            inner: MemoryChunkStore::new(),
            fail_next_save: AtomicBool::new(false),
            fail_next_completion: AtomicBool::new(false),
        }
    }

    fn injected(flag: &AtomicBool) -> Result<(), StoreError> {
        if flag.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Backend("写入被拒绝".into()));
        }
        Ok(())
    }
}

impl ChunkStore<u32> for FlakyStore {
    fn save(&self, key: &CombinedId, chunk: &Chunk<u32>) -> Result<(), StoreError> {
        Self::injected(&self.fail_next_save)?;
        self.inner.save(key, chunk)
    }

    fn get(&self, key: &CombinedId) -> Result<ChunkIter<u32>, StoreError> {
        self.inner.get(key)
    }

    fn remove(&self, key: &CombinedId) -> Result<(), StoreError> {
        self.inner.remove(key)
    }

    fn contains(&self, key: &CombinedId) -> Result<bool, StoreError> {
        self.inner.contains(key)
    }

    fn register_as_completed(&self, key: &CombinedId) -> Result<(), StoreError> {
        Self::injected(&self.fail_next_completion)?;
        self.inner.register_as_completed(key)
    }

    fn is_completed(&self, key: &CombinedId) -> Result<bool, StoreError> {
        self.inner.is_completed(key)
    }

    fn collection_ids(&self) -> Result<HashSet<CombinedId>, StoreError> {
        self.inner.collection_ids()
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.inner.clear()
    }

    fn destroy(&self) -> Result<(), StoreError> {
        self.inner.destroy()
    }

    fn compact(&self) -> Result<(), StoreError> {
        self.inner.compact()
    }

    fn size_in_bytes(&self) -> u64 {
        self.inner.size_in_bytes()
    }
}

fn flaky_reassembler() -> (
    Arc<FlakyStore>,
    CollectionReassembler<u32>,
    Recorder<CollectionCall>,
) {
    let store = Arc::new(FlakyStore::new());
    let reassembler = CollectionReassembler::<u32>::new(store.clone());
    reassembler.start().unwrap();
    let (reassembler, calls) = recording(reassembler);
    (store, reassembler, calls)
}

#[test]
fn source_change_is_reported_even_when_save_fails() {
    let (store, reassembler, calls) = flaky_reassembler();
    let id = object_id("obj");
    let (a, b) = (source("peerA"), source("peerB"));

    reassembler.register_incoming_items(&id, numbered_chunk(0, 0, 2), &a).unwrap();
    store.fail_next_save.store(true, Ordering::SeqCst);
    let err = reassembler
        .register_incoming_items(&id, numbered_chunk(0, 0, 2), &b)
        .unwrap_err();
    assert!(matches!(err, ReassemblerError::Store(StoreError::Backend(_))));

    reassembler.register_incoming_items(&id, numbered_chunk(0, 0, 2), &b).unwrap();

    assert_eq!(
        calls.snapshot(),
        vec![
            CollectionCall::ItemsReceived("obj".into(), 0, 2, "peerA".into()),
            CollectionCall::SourceChanged("obj".into(), "peerB".into()),
            CollectionCall::ItemsReceived("obj".into(), 0, 2, "peerB".into()),
        ]
    );
    assert_eq!(reassembler.state(&id, &b).unwrap().unwrap().num_current_items, 2);
}

#[test]
fn stored_chunk_is_reported_even_when_completion_marking_fails() {
    let (store, reassembler, calls) = flaky_reassembler();
    let id = object_id("obj");
    let peer = source("p");

    reassembler.register_num_total_items(&id, 2, &peer).unwrap();
    store.fail_next_completion.store(true, Ordering::SeqCst);
    let err = reassembler
        .register_incoming_items(&id, numbered_chunk(0, 0, 2), &peer)
        .unwrap_err();
    assert!(matches!(err, ReassemblerError::Store(StoreError::Backend(_))));

    assert_eq!(
        calls.snapshot(),
        vec![CollectionCall::ItemsReceived("obj".into(), 0, 2, "p".into())]
    );
    let state = reassembler.state(&id, &peer).unwrap().unwrap();
    assert_eq!(state.num_current_items, 2);
    assert!(!state.completed);
    assert!(!store.is_completed(&CombinedId::new(&id, &peer)).unwrap());

    // 重新登记总数会再次检查完成
    reassembler.register_num_total_items(&id, 2, &peer).unwrap();
    assert!(reassembler.is_completed(&id).unwrap());
    assert_eq!(completions(&calls), 1);
}
