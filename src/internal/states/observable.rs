//! # ObservableProperty：可监听的状态值
//!
//! 基于 [`tokio::sync::watch`]：同步写入、不阻塞，任意多个监听者异步等待变化。
//! 反序列化器用它公开状态机的当前阶段。
//!
//! ## 使用示例
//! ```rust,no_run
//! use bigobj_stream::states::ObservableProperty;
//!
//! # async fn example() {
//! let prop = ObservableProperty::new(0u64);
//! let mut watcher = prop.watch();
//! prop.update(1);
//! assert_eq!(watcher.changed().await.unwrap(), 1);
//! # }
//! ```

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;
use tokio::sync::watch::error::RecvError;

#[derive(Debug, Error)]
pub enum ObservableError {
    /// 属性的所有写端都已释放
    #[error("属性已被销毁")]
    Destroyed,

    #[error("接收失败: {0}")]
    Recv(#[from] RecvError),
}

/// 可监听的状态值；Clone 得到的是同一份状态的另一个句柄。
#[derive(Clone, Debug)]
pub struct ObservableProperty<T> {
    sender: Arc<watch::Sender<T>>,
}

impl<T> ObservableProperty<T>
where
    T: Clone + Send + Sync,
{
    pub fn new(value: T) -> Self {
        let (sender, _) = watch::channel(value);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// 写入新值并通知所有监听者；没有监听者时同样生效。
    pub fn update(&self, new_value: T) {
        self.sender.send_replace(new_value);
    }

    /// 用闭包就地修改。
    pub fn update_field<F>(&self, updater: F)
    where
        F: FnOnce(&mut T),
    {
        self.sender.send_modify(updater);
    }

    /// 当前值的快照。
    pub fn get_current(&self) -> T {
        self.sender.borrow().clone()
    }

    pub fn map<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.sender.borrow())
    }

    /// 创建监听器；监听器只会看到创建之后的变化。
    pub fn watch(&self) -> PropertyWatcher<T> {
        PropertyWatcher {
            receiver: self.sender.subscribe(),
        }
    }
}

/// 属性监听器。
#[derive(Debug)]
pub struct PropertyWatcher<T> {
    receiver: watch::Receiver<T>,
}

impl<T> PropertyWatcher<T>
where
    T: Clone + Send + Sync,
{
    /// 等待下一次变化，返回新值。
    pub async fn changed(&mut self) -> Result<T, ObservableError> {
        self.receiver.changed().await?;
        Ok(self.receiver.borrow_and_update().clone())
    }

    /// 等待直到值满足条件；当前值已满足则立即返回。
    pub async fn wait_until<F>(&mut self, predicate: F) -> Result<T, ObservableError>
    where
        F: FnMut(&T) -> bool,
    {
        let value = self
            .receiver
            .wait_for(predicate)
            .await
            .map_err(|_| ObservableError::Destroyed)?;
        Ok(value.clone())
    }

    pub fn borrow(&self) -> T {
        self.receiver.borrow().clone()
    }
}
