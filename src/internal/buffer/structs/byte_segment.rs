//! 固定容量的字节段：只在尾部追加，只从头部丢弃。

/// 单个字节段，由创建它的 [`SegmentedBuffer`](super::SegmentedBuffer) 独占。
///
/// `[head, tail)` 为有效数据；`tail` 之后为可追加空间。
#[derive(Debug)]
pub struct ByteSegment {
    data: Box<[u8]>,
    head: usize,
    tail: usize,
}

impl ByteSegment {
    /// 分配一个容量为 `capacity` 的空段。
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0u8; capacity].into_boxed_slice(),
            head: 0,
            tail: 0,
        }
    }

    /// 段内有效字节数。
    pub fn size(&self) -> usize {
        self.tail - self.head
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// 尾部剩余可写字节数。
    pub fn available(&self) -> usize {
        self.data.len() - self.tail
    }

    pub fn is_full(&self) -> bool {
        self.available() == 0
    }

    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// 追加尽可能多的字节，返回实际写入的字节数。
    pub fn add(&mut self, bytes: &[u8]) -> usize {
        let n = bytes.len().min(self.available());
        self.data[self.tail..self.tail + n].copy_from_slice(&bytes[..n]);
        self.tail += n;
        n
    }

    /// 从有效数据的 `offset` 处复制到 `dest`（不消费），返回复制的字节数。
    pub fn read(&self, offset: usize, dest: &mut [u8]) -> usize {
        if offset >= self.size() {
            return 0;
        }
        let n = dest.len().min(self.size() - offset);
        let start = self.head + offset;
        dest[..n].copy_from_slice(&self.data[start..start + n]);
        n
    }

    /// 丢弃头部最多 `len` 字节，返回实际丢弃数。
    pub fn discard(&mut self, len: usize) -> usize {
        let n = len.min(self.size());
        self.head += n;
        n
    }

    /// 空段复位读写位置以复用整段空间，返回因此新增的可写字节数。
    pub(crate) fn reset(&mut self) -> usize {
        if !self.is_empty() {
            return 0;
        }
        let reclaimed = self.tail;
        self.head = 0;
        self.tail = 0;
        reclaimed
    }
}
