//! # HookDispatcher：可重入的钩子分发
//!
//! 组件把锁内产生的通知交给分发器，由分发器在不持有任何锁的情况下执行钩子：
//!
//! - 同一时刻只有一个线程在排空通知队列，钩子按通知入队顺序执行
//! - 排空期间钩子集合被整体取出，钩子里再调用同一组件（登记、追加钩子）不会死锁
//! - 排空期间产生的新通知（包括钩子自身引发的）排在队尾，由正在排空的线程接着执行；
//!   因此在钩子里发起的登记，会在当前钩子返回后才触发它自己的通知
//! - 排空期间追加的钩子在本轮结束后并入，排在原有钩子之后

use std::collections::VecDeque;
use std::mem;
use std::sync::{Mutex, MutexGuard};

use thiserror::Error;

#[derive(Debug, Error)]
#[error("获取钩子分发锁失败")]
pub struct HookLockPoisoned;

/// 可被分发器整体取出、再合并回来的钩子集合。
pub trait HookList: Default + Send {
    /// 把 `later` 中的钩子追加到末尾。
    fn append(&mut self, later: Self);
}

struct DispatchState<C, N> {
    hooks: C,
    queue: VecDeque<N>,
    draining: bool,
}

pub struct HookDispatcher<C, N> {
    state: Mutex<DispatchState<C, N>>,
}

impl<C: HookList, N> Default for HookDispatcher<C, N> {
    fn default() -> Self {
        Self {
            state: Mutex::new(DispatchState {
                hooks: C::default(),
                queue: VecDeque::new(),
                draining: false,
            }),
        }
    }
}

impl<C: HookList, N> HookDispatcher<C, N> {
    /// 修改钩子集合；排空期间修改的是待合并的那一份。
    pub fn modify(&self, f: impl FnOnce(&mut C)) -> Result<(), HookLockPoisoned> {
        f(&mut self.lock()?.hooks);
        Ok(())
    }

    /// 通知入队；若没有线程在排空，则由当前线程排空队列。
    pub fn dispatch(
        &self,
        notices: impl IntoIterator<Item = N>,
        mut deliver: impl FnMut(&mut C, N),
    ) -> Result<(), HookLockPoisoned> {
        let running = {
            let mut state = self.lock()?;
            state.queue.extend(notices);
            if state.draining || state.queue.is_empty() {
                return Ok(());
            }
            state.draining = true;
            mem::take(&mut state.hooks)
        };

        let mut drain = Drain {
            dispatcher: self,
            running: Some(running),
        };
        loop {
            let next = {
                let mut state = self.lock()?;
                match state.queue.pop_front() {
                    Some(notice) => notice,
                    None => {
                        if let Some(running) = drain.running.take() {
                            Self::restore(&mut *state, running);
                        }
                        return Ok(());
                    }
                }
            };
            if let Some(running) = drain.running.as_mut() {
                deliver(running, next);
            }
        }
    }

    fn restore(state: &mut DispatchState<C, N>, mut running: C) {
        running.append(mem::take(&mut state.hooks));
        state.hooks = running;
        state.draining = false;
    }

    fn lock(&self) -> Result<MutexGuard<'_, DispatchState<C, N>>, HookLockPoisoned> {
        self.state.lock().map_err(|_| HookLockPoisoned)
    }
}

/// 钩子 panic 时把取出的集合放回去，后续通知仍能分发。
struct Drain<'a, C: HookList, N> {
    dispatcher: &'a HookDispatcher<C, N>,
    running: Option<C>,
}

impl<C: HookList, N> Drop for Drain<'_, C, N> {
    fn drop(&mut self) {
        if let Some(running) = self.running.take() {
            if let Ok(mut state) = self.dispatcher.state.lock() {
                HookDispatcher::<C, N>::restore(&mut *state, running);
            }
        }
    }
}
