//! 流式大对象反序列化器
//!
//! 给定一个对象的声明总字节数，调用方不断 [`feed`](StreamingDeserializer::feed)
//! 收到的字节并调用 [`process`](StreamingDeserializer::process)，
//! 反序列化器尽可能向前推进并返回这一轮产生的事件：
//!
//! 1. 头部到齐后同步解析，连同声明的条目数发出一次 `HeaderParsed`
//! 2. 逐条解析条目，累积到当前批次；达到 [`BatchPolicy`] 阈值即发出 `ItemsBatch`，
//!    序号加 1 开始新批次
//! 3. 条目数耗尽后，若还有未满的批次，再发出最后一个 `ItemsBatch`
//!
//! 按 `order_number` 升序拼接所有批次即为原始条目序列，不重不漏不乱序。
//!
//! ## 数据未到齐
//!
//! 解码器返回 [`Decoded::Incomplete`] 时本轮 `process` 直接返回，已解析的进度保留；
//! 之后追加字节再次 `process` 会从原位置继续。
//! 若声明总长已全部收到（或调用过 [`finish_input`](StreamingDeserializer::finish_input)）
//! 仍不完整，则判定为截断。
//!
//! ## 取消
//!
//! [`KillSwitch`] 在每一步之前检查，正在解析的单个条目总会完整结束。
//! 观察到 kill 后发出 `Cancelled`，其后不再有任何事件。

use tracing::{debug, warn};

use crate::internal::buffer::structs::{SegmentedBuffer, SegmentedBufferConfig};
use crate::internal::model::structs::Chunk;
use crate::internal::states::observable::ObservableProperty;

use super::super::traits::{Decoded, ObjectCodec};
use super::deserializer_config::{BatchPolicy, DeserializerConfig};
use super::deserializer_event::DeserializerEvent;
use super::deserializer_state::DeserializerState;
use super::kill_switch::KillSwitch;
use super::parse_error::ParseError;

type Event<C> = DeserializerEvent<<C as ObjectCodec>::Header, <C as ObjectCodec>::Item>;

/// 单步推进的结果。
enum Step<E> {
    Emit(E),
    Advanced,
    NeedMore,
}

pub struct StreamingDeserializer<C: ObjectCodec> {
    codec: C,
    config: DeserializerConfig,
    buffer: SegmentedBuffer,
    byte_budget: u64,
    /// 经 feed 接收的字节数，不超过 byte_budget
    received: u64,
    /// 已被解码并消费的字节数
    consumed: u64,
    input_closed: bool,
    state: ObservableProperty<DeserializerState>,
    pending_header: Option<C::Header>,
    declared_items: u64,
    parsed_items: u64,
    batch: Vec<C::Item>,
    batch_bytes: usize,
    batch_ready: bool,
    order_number: u64,
    kill_switch: KillSwitch,
}

impl<C: ObjectCodec> StreamingDeserializer<C> {
    /// 为一个声明总长为 `byte_budget` 字节的对象创建反序列化器。
    pub fn new(codec: C, byte_budget: u64) -> Self {
        let config = DeserializerConfig::default();
        Self {
            codec,
            buffer: SegmentedBuffer::with_config(SegmentedBufferConfig {
                segment_size: config.segment_size,
            }),
            config,
            byte_budget,
            received: 0,
            consumed: 0,
            input_closed: false,
            state: ObservableProperty::new(DeserializerState::SeekingHeader),
            pending_header: None,
            declared_items: 0,
            parsed_items: 0,
            batch: Vec::new(),
            batch_bytes: 0,
            batch_ready: false,
            order_number: 0,
            kill_switch: KillSwitch::new(),
        }
    }

    /// 替换配置；应在第一次 feed 之前调用。
    pub fn with_config(mut self, config: DeserializerConfig) -> Self {
        self.buffer = SegmentedBuffer::with_config(SegmentedBufferConfig {
            segment_size: config.segment_size,
        });
        self.config = config;
        self
    }

    pub fn with_batch_policy(mut self, policy: BatchPolicy) -> Self {
        self.config.batch_policy = policy;
        self
    }

    /// 共用外部的取消开关（例如同一批对象共享一个开关）。
    pub fn with_kill_switch(mut self, kill_switch: KillSwitch) -> Self {
        self.kill_switch = kill_switch;
        self
    }

    /// 本实现支持协作式取消。
    pub fn is_killable(&self) -> bool {
        true
    }

    pub fn kill(&self) {
        self.kill_switch.kill();
    }

    pub fn kill_switch(&self) -> KillSwitch {
        self.kill_switch.clone()
    }

    pub fn state(&self) -> DeserializerState {
        self.state.get_current()
    }

    /// 状态机的可监听句柄。
    pub fn state_property(&self) -> ObservableProperty<DeserializerState> {
        self.state.clone()
    }

    pub fn byte_budget(&self) -> u64 {
        self.byte_budget
    }

    pub fn consumed_bytes(&self) -> u64 {
        self.consumed
    }

    /// 还能接收的字节数。
    pub fn remaining_budget(&self) -> u64 {
        self.byte_budget - self.received
    }

    /// 追加收到的字节，最多收下剩余的声明总长，返回实际收下的字节数；
    /// 多出的部分属于下一条消息，由调用方处理。终态下不再接收。
    pub fn feed(&mut self, bytes: &[u8]) -> usize {
        if self.state().is_terminal() {
            return 0;
        }
        let take = bytes.len().min(usize::try_from(self.remaining_budget()).unwrap_or(usize::MAX));
        self.buffer.add(&bytes[..take]);
        self.received += take as u64;
        take
    }

    /// 声明输入已结束（如连接关闭）；之后仍不完整即判定截断。
    pub fn finish_input(&mut self) {
        self.input_closed = true;
    }

    /// 尽可能推进解析，返回本轮产生的事件。
    pub fn process(&mut self) -> Vec<Event<C>> {
        let mut events = Vec::new();
        while !self.state().is_terminal() {
            if self.kill_switch.is_killed() {
                self.cancel(&mut events);
                break;
            }
            match self.step() {
                Ok(Step::Emit(event)) => events.push(event),
                Ok(Step::Advanced) => {}
                Ok(Step::NeedMore) => {
                    if self.input_exhausted() {
                        let err = ParseError::Truncated {
                            consumed: self.consumed,
                            budget: self.byte_budget,
                        };
                        self.fail(err, &mut events);
                    }
                    break;
                }
                Err(err) => {
                    self.fail(err, &mut events);
                    break;
                }
            }
        }
        events
    }

    fn step(&mut self) -> Result<Step<Event<C>>, ParseError> {
        match self.state() {
            DeserializerState::SeekingHeader => {
                if self.buffer.size() < self.codec.header_size() {
                    return Ok(Step::NeedMore);
                }
                self.transition(DeserializerState::ParsingHeader);
                Ok(Step::Advanced)
            }
            DeserializerState::ParsingHeader => self.parse_header(),
            DeserializerState::ParsingItems => self.parse_item(),
            DeserializerState::FlushingLastBatch => {
                let last = (!self.batch.is_empty()).then(|| self.take_batch());
                self.transition(DeserializerState::Finished);
                Ok(match last {
                    Some(chunk) => Step::Emit(DeserializerEvent::ItemsBatch(chunk)),
                    None => Step::Advanced,
                })
            }
            DeserializerState::Finished
            | DeserializerState::Failed
            | DeserializerState::Cancelled => Ok(Step::NeedMore),
        }
    }

    fn parse_header(&mut self) -> Result<Step<Event<C>>, ParseError> {
        if self.pending_header.is_none() {
            let header_size = self.codec.header_size();
            let bytes = self.buffer.get(header_size)?;
            let header = self.codec.decode_header(&bytes)?;
            self.consume(header_size)?;
            self.pending_header = Some(header);
        }

        let decoded = match &self.pending_header {
            Some(header) => self.codec.decode_item_count(header, &self.buffer)?,
            None => return Ok(Step::NeedMore),
        };
        let Decoded::Complete { value, consumed } = decoded else {
            return Ok(Step::NeedMore);
        };
        self.consume(consumed)?;
        let Some(header) = self.pending_header.take() else {
            return Ok(Step::NeedMore);
        };

        self.declared_items = value;
        debug!(num_items = value, budget = self.byte_budget, "头部解析完成");
        self.transition(DeserializerState::ParsingItems);
        Ok(Step::Emit(DeserializerEvent::HeaderParsed {
            header,
            num_items: value,
        }))
    }

    fn parse_item(&mut self) -> Result<Step<Event<C>>, ParseError> {
        if self.batch_ready {
            let chunk = self.take_batch();
            return Ok(Step::Emit(DeserializerEvent::ItemsBatch(chunk)));
        }

        if self.parsed_items == self.declared_items {
            if self.consumed != self.byte_budget {
                return Err(ParseError::ItemCountMismatch {
                    declared: self.declared_items,
                    consumed: self.consumed,
                    budget: self.byte_budget,
                });
            }
            self.transition(DeserializerState::FlushingLastBatch);
            return Ok(Step::Advanced);
        }

        match self.codec.decode_item(&self.buffer)? {
            Decoded::Complete { value, consumed } => {
                self.consume(consumed)?;
                self.batch.push(value);
                self.batch_bytes += consumed;
                self.parsed_items += 1;
                self.batch_ready = self
                    .config
                    .batch_policy
                    .is_full(self.batch.len(), self.batch_bytes);
                Ok(Step::Advanced)
            }
            Decoded::Incomplete => Ok(Step::NeedMore),
        }
    }

    fn consume(&mut self, len: usize) -> Result<(), ParseError> {
        self.buffer.discard(len)?;
        self.consumed += len as u64;
        Ok(())
    }

    fn take_batch(&mut self) -> Chunk<C::Item> {
        let items = std::mem::take(&mut self.batch);
        let chunk = Chunk::new(items, self.order_number);
        debug!(
            order_number = chunk.order_number,
            items = chunk.len(),
            bytes = self.batch_bytes,
            "发出一批条目"
        );
        self.order_number += 1;
        self.batch_bytes = 0;
        self.batch_ready = false;
        chunk
    }

    fn input_exhausted(&self) -> bool {
        self.input_closed || self.received >= self.byte_budget
    }

    fn transition(&self, next: DeserializerState) {
        debug!(from = ?self.state(), to = ?next, "反序列化状态切换");
        self.state.update(next);
    }

    fn release(&mut self) {
        self.batch.clear();
        self.batch_bytes = 0;
        self.batch_ready = false;
        self.pending_header = None;
        self.buffer.clear();
    }

    fn fail(&mut self, err: ParseError, events: &mut Vec<Event<C>>) {
        warn!(error = %err, consumed = self.consumed, budget = self.byte_budget, "反序列化失败");
        self.release();
        self.transition(DeserializerState::Failed);
        events.push(DeserializerEvent::Error(err));
    }

    fn cancel(&mut self, events: &mut Vec<Event<C>>) {
        debug!(consumed = self.consumed, "反序列化被取消");
        self.release();
        self.transition(DeserializerState::Cancelled);
        events.push(DeserializerEvent::Cancelled);
    }
}
