//! # EventQueue：单消费者 FIFO 事件队列
//!
//! 基于 `tokio::sync::mpsc::unbounded_channel`：
//! - 生产者可 Clone，多处同时推送
//! - 消费者唯一，严格按推送顺序取出
//!
//! 每个在途大对象配一条独立队列，保证该对象的事件按产生顺序被处理，
//! 即使消费者被调度到共享线程池上也不会乱序。

use tokio::sync::mpsc;

/// 队列生产者端。
#[derive(Debug)]
pub struct EventQueue<T> {
    sender: mpsc::UnboundedSender<T>,
}

// 手写 Clone：不要求 T: Clone
impl<T> Clone for EventQueue<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

/// 队列消费者端，不可 Clone。
#[derive(Debug)]
pub struct EventConsumer<T> {
    receiver: mpsc::UnboundedReceiver<T>,
}

impl<T> EventQueue<T> {
    /// 返回 (生产者, 消费者)。
    pub fn new() -> (Self, EventConsumer<T>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, EventConsumer { receiver })
    }

    /// 推送事件；消费者已释放时原样返回该事件。
    pub fn send(&self, value: T) -> Result<(), T> {
        self.sender.send(value).map_err(|e| e.0)
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl<T> EventConsumer<T> {
    /// 等待下一条事件；所有生产者都释放且队列已空时返回 `None`。
    pub async fn recv(&mut self) -> Option<T> {
        self.receiver.recv().await
    }

    /// 非阻塞取一条；队列为空时返回 `None`。
    pub fn try_recv(&mut self) -> Option<T> {
        self.receiver.try_recv().ok()
    }

    /// 阻塞当前线程等待下一条，供非 async 调用方使用（不可在运行时线程内调用）。
    pub fn blocking_recv(&mut self) -> Option<T> {
        self.receiver.blocking_recv()
    }
}
