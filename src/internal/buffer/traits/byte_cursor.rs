//! 字节游标：反序列化器读取数据的统一入口。
//!
//! 游标只暴露「剩余多少」「按偏移窥视」「从头部消费」三种能力，
//! 解码器只窥视不消费，确认一个完整字段后再由调用方消费，
//! 因此数据没到齐时可以在下次追加后从原位置重试。

use super::super::structs::BufferError;

pub trait ByteCursor {
    /// 尚未消费的字节数。
    fn remaining(&self) -> usize;

    /// 从 `offset` 处读满 `dest`，不消费。
    fn peek_into(&self, offset: usize, dest: &mut [u8]) -> Result<(), BufferError>;

    /// 从头部消费 `len` 字节。
    fn consume(&mut self, len: usize) -> Result<(), BufferError>;

    /// `[offset, offset + len)` 是否已全部到达。
    fn has_remaining(&self, offset: usize, len: usize) -> bool {
        offset.saturating_add(len) <= self.remaining()
    }

    fn peek_u8(&self, offset: usize) -> Result<u8, BufferError> {
        let mut b = [0u8; 1];
        self.peek_into(offset, &mut b)?;
        Ok(b[0])
    }

    fn peek_u16_le(&self, offset: usize) -> Result<u16, BufferError> {
        let mut b = [0u8; 2];
        self.peek_into(offset, &mut b)?;
        Ok(u16::from_le_bytes(b))
    }

    fn peek_u32_le(&self, offset: usize) -> Result<u32, BufferError> {
        let mut b = [0u8; 4];
        self.peek_into(offset, &mut b)?;
        Ok(u32::from_le_bytes(b))
    }

    fn peek_u64_le(&self, offset: usize) -> Result<u64, BufferError> {
        let mut b = [0u8; 8];
        self.peek_into(offset, &mut b)?;
        Ok(u64::from_le_bytes(b))
    }

    fn peek_vec(&self, offset: usize, len: usize) -> Result<Vec<u8>, BufferError> {
        let mut out = vec![0u8; len];
        self.peek_into(offset, &mut out)?;
        Ok(out)
    }
}
