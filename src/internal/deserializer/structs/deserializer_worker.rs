//! 专用 worker：每个在途大对象一个 tokio 任务，从字节流拉取数据驱动反序列化，
//! 事件经独立的 FIFO 队列交付，避免一个数 GB 的对象阻塞其他通道上的小消息。

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::internal::states::event_queue::{EventConsumer, EventQueue};
use crate::internal::states::observable::ObservableProperty;

use super::super::traits::ObjectCodec;
use super::deserializer_event::DeserializerEvent;
use super::deserializer_state::DeserializerState;
use super::kill_switch::KillSwitch;
use super::streaming_deserializer::StreamingDeserializer;

/// 已启动的 worker 句柄。
pub struct DeserializerWorker<H, I> {
    /// 事件消费端，按产生顺序取出
    pub events: EventConsumer<DeserializerEvent<H, I>>,
    /// 取消开关
    pub kill_switch: KillSwitch,
    /// 状态机的可监听句柄
    pub state: ObservableProperty<DeserializerState>,
    /// 任务结束时返回最终状态
    pub handle: JoinHandle<DeserializerState>,
}

/// 在新的 tokio 任务上运行 `deserializer`，输入来自 `input` 字节流。
///
/// 输入流结束即视为 [`StreamingDeserializer::finish_input`]；
/// 事件消费端被释放时 worker 自行 kill 并退出。
pub fn spawn_deserializer_worker<C, S>(
    mut deserializer: StreamingDeserializer<C>,
    mut input: S,
) -> DeserializerWorker<C::Header, C::Item>
where
    C: ObjectCodec + 'static,
    C::Header: 'static,
    C::Item: 'static,
    S: Stream<Item = Bytes> + Send + Unpin + 'static,
{
    let (queue, events) = EventQueue::new();
    let kill_switch = deserializer.kill_switch();
    let state = deserializer.state_property();
    let task_kill_switch = kill_switch.clone();

    let handle = tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                _ = task_kill_switch.killed() => {
                    forward_events(&mut deserializer, &queue);
                    break;
                }
                next = input.next() => {
                    match next {
                        Some(bytes) => {
                            let accepted = deserializer.feed(&bytes);
                            if accepted < bytes.len() {
                                debug!(ignored = bytes.len() - accepted, "超出声明总长的字节已忽略");
                            }
                        }
                        None => deserializer.finish_input(),
                    }
                    if !forward_events(&mut deserializer, &queue) {
                        warn!("事件消费端已释放，终止反序列化");
                        deserializer.kill();
                        deserializer.process();
                        break;
                    }
                    if deserializer.state().is_terminal() {
                        break;
                    }
                }
            }
        }
        deserializer.state()
    });

    DeserializerWorker {
        events,
        kill_switch,
        state,
        handle,
    }
}

/// 推进一轮并把事件推入队列；消费端已释放时返回 `false`。
fn forward_events<C: ObjectCodec>(
    deserializer: &mut StreamingDeserializer<C>,
    queue: &EventQueue<DeserializerEvent<C::Header, C::Item>>,
) -> bool {
    for event in deserializer.process() {
        if queue.send(event).is_err() {
            return false;
        }
    }
    true
}
