use crate::internal::buffer::structs::{BufferError, SegmentedBuffer};
use crate::internal::buffer::traits::ByteCursor;

impl ByteCursor for SegmentedBuffer {
    fn remaining(&self) -> usize {
        self.size()
    }

    fn peek_into(&self, offset: usize, dest: &mut [u8]) -> Result<(), BufferError> {
        self.read_at(offset, dest)
    }

    fn consume(&mut self, len: usize) -> Result<(), BufferError> {
        self.discard(len)
    }
}

/// 切片游标：消费即把切片起点后移，便于直接解码已在内存中的完整数据。
impl ByteCursor for &[u8] {
    fn remaining(&self) -> usize {
        self.len()
    }

    fn peek_into(&self, offset: usize, dest: &mut [u8]) -> Result<(), BufferError> {
        let end = offset.saturating_add(dest.len());
        if end > self.len() {
            return Err(BufferError::InsufficientData {
                requested: end,
                available: self.len(),
            });
        }
        dest.copy_from_slice(&self[offset..end]);
        Ok(())
    }

    fn consume(&mut self, len: usize) -> Result<(), BufferError> {
        if len > self.len() {
            return Err(BufferError::InsufficientData {
                requested: len,
                available: self.len(),
            });
        }
        *self = &self[len..];
        Ok(())
    }
}
