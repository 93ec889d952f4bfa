use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    killed: AtomicBool,
    notify: Notify,
}

/// 协作式取消开关：可 Clone 到任意线程，反序列化器在两条条目之间检查。
#[derive(Debug, Clone, Default)]
pub struct KillSwitch {
    inner: Arc<Inner>,
}

impl KillSwitch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kill(&self) {
        self.inner.killed.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_killed(&self) -> bool {
        self.inner.killed.load(Ordering::SeqCst)
    }

    /// 等待 kill 信号；已 kill 则立即返回。
    pub async fn killed(&self) {
        loop {
            // 先注册监听再检查标志，避免两者之间的 kill 被错过
            let notified = self.inner.notify.notified();
            if self.is_killed() {
                return;
            }
            notified.await;
        }
    }
}
