//! 分段字节缓冲
//!
//! 传输层每收到一段字节就调用 [`SegmentedBuffer::add`] 追加到尾部，消费方用
//! [`SegmentedBuffer::extract`] / [`SegmentedBuffer::discard`] 从头部取走。
//!
//! ## 设计要点
//!
//! - 底层为定长字节段组成的队列，追加时不重新分配整块内存，读取时不复制整个缓冲
//! - `size` / `capacity` / `available` 三个计数随操作增量维护，读取均为 O(1)
//! - 头部被取空的段立即释放；若只剩一段则复位复用，不释放
//!
//! ## 并发约定
//!
//! 单生产者、单消费者（可为同一线程）。本结构不做任何内部加锁，
//! 多个生产者或多个消费者同时操作属于未定义用法，需由调用方自行保证。

use std::collections::VecDeque;

use tracing::trace;

use super::buffer_config::SegmentedBufferConfig;
use super::buffer_error::BufferError;
use super::byte_segment::ByteSegment;

#[derive(Debug)]
pub struct SegmentedBuffer {
    segments: VecDeque<ByteSegment>,
    segment_size: usize,
    size: usize,
    capacity: usize,
    available: usize,
}

impl Default for SegmentedBuffer {
    fn default() -> Self {
        Self::with_config(SegmentedBufferConfig::default())
    }
}

impl SegmentedBuffer {
    /// 使用默认段大小创建空缓冲。
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SegmentedBufferConfig) -> Self {
        Self {
            segments: VecDeque::new(),
            segment_size: config.segment_size.max(1),
            size: 0,
            capacity: 0,
            available: 0,
        }
    }

    /// 指定段大小创建空缓冲；传 0 按 1 处理。
    pub fn with_segment_size(segment_size: usize) -> Self {
        Self::with_config(SegmentedBufferConfig { segment_size })
    }

    /// 当前未被取走的字节数。
    pub fn size(&self) -> usize {
        self.size
    }

    /// 所有段的总容量。
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 无需新分配段即可追加的字节数。
    pub fn available(&self) -> usize {
        self.available
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn segment_size(&self) -> usize {
        self.segment_size
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// 追加字节到尾部；最后一段写满时先分配新段。
    pub fn add(&mut self, bytes: &[u8]) {
        let mut rest = bytes;
        while !rest.is_empty() {
            if self.segments.back().is_none_or(ByteSegment::is_full) {
                self.push_segment();
            }
            let Some(last) = self.segments.back_mut() else {
                break;
            };
            let written = last.add(rest);
            self.size += written;
            self.available -= written;
            rest = &rest[written..];
        }
    }

    /// 从头部读取 `length` 字节，不消费。
    pub fn get(&self, length: usize) -> Result<Vec<u8>, BufferError> {
        self.get_at(0, length)
    }

    /// 从 `offset` 起读取 `length` 字节，不消费。
    pub fn get_at(&self, offset: usize, length: usize) -> Result<Vec<u8>, BufferError> {
        let mut out = vec![0u8; length];
        self.read_at(offset, &mut out)?;
        Ok(out)
    }

    /// 从 `offset` 起读满 `dest`，不消费。
    ///
    /// 逐段累加「前面各段大小」定位起始段与段内偏移，再跨后续段复制。
    pub fn read_at(&self, offset: usize, dest: &mut [u8]) -> Result<(), BufferError> {
        let length = dest.len();
        self.check_length(offset.saturating_add(length))?;
        if length == 0 {
            return Ok(());
        }

        let mut previous = 0usize;
        let mut copied = 0usize;
        let mut started = false;
        for seg in &self.segments {
            let seg_size = seg.size();
            if !started && previous + seg_size <= offset {
                previous += seg_size;
                continue;
            }
            let in_seg_offset = if started { 0 } else { offset - previous };
            started = true;
            copied += seg.read(in_seg_offset, &mut dest[copied..]);
            previous += seg_size;
            if copied == length {
                break;
            }
        }
        Ok(())
    }

    /// 从头部取走 `length` 字节。
    pub fn extract(&mut self, length: usize) -> Result<Vec<u8>, BufferError> {
        let mut out = vec![0u8; length];
        self.extract_into(length, &mut out, 0)?;
        Ok(out)
    }

    /// 从头部取走 `length` 字节，写入 `dest[dest_offset..dest_offset + length]`。
    pub fn extract_into(
        &mut self,
        length: usize,
        dest: &mut [u8],
        dest_offset: usize,
    ) -> Result<(), BufferError> {
        let required = dest_offset.saturating_add(length);
        if dest.len() < required {
            return Err(BufferError::DestinationTooSmall {
                required,
                actual: dest.len(),
            });
        }
        self.drain_head(length, Some(&mut dest[dest_offset..required]))
    }

    /// 丢弃头部 `length` 字节，不复制。
    pub fn discard(&mut self, length: usize) -> Result<(), BufferError> {
        self.drain_head(length, None)
    }

    /// 取走全部字节。
    pub fn extract_all(&mut self) -> Vec<u8> {
        let mut out = vec![0u8; self.size];
        // 长度恰为 size，不会失败
        let _ = self.drain_head(self.size, Some(&mut out));
        out
    }

    /// 释放所有段。
    pub fn clear(&mut self) {
        self.segments.clear();
        self.size = 0;
        self.capacity = 0;
        self.available = 0;
    }

    fn check_length(&self, requested: usize) -> Result<(), BufferError> {
        if requested > self.size {
            return Err(BufferError::InsufficientData {
                requested,
                available: self.size,
            });
        }
        Ok(())
    }

    /// extract / discard 共用的头部遍历；`dest` 为 `None` 时只丢弃。
    fn drain_head(
        &mut self,
        length: usize,
        mut dest: Option<&mut [u8]>,
    ) -> Result<(), BufferError> {
        self.check_length(length)?;

        let mut remaining = length;
        let mut written = 0usize;
        while remaining > 0 {
            let Some(front) = self.segments.front_mut() else {
                break;
            };
            let n = remaining.min(front.size());
            if let Some(out) = dest.as_deref_mut() {
                front.read(0, &mut out[written..written + n]);
            }
            front.discard(n);
            written += n;
            remaining -= n;

            let emptied = front.is_empty();
            if emptied {
                self.release_front();
            }
        }
        self.size -= length;
        Ok(())
    }

    fn push_segment(&mut self) {
        let seg = ByteSegment::with_capacity(self.segment_size);
        self.capacity += seg.capacity();
        self.available += seg.available();
        self.segments.push_back(seg);
        trace!(segments = self.segments.len(), "分配新字节段");
    }

    /// 头部段已空：多于一段时释放，仅剩一段时复位复用。
    fn release_front(&mut self) {
        if self.segments.len() > 1 {
            if let Some(seg) = self.segments.pop_front() {
                self.capacity -= seg.capacity();
                self.available -= seg.available();
                trace!(segments = self.segments.len(), "释放已取空的字节段");
            }
        } else if let Some(seg) = self.segments.front_mut() {
            self.available += seg.reset();
        }
    }
}
