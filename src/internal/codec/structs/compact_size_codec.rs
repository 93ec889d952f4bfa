//! 参考编解码器。
//!
//! 线格式：
//!
//! ```text
//! [header: header_size 字节][count: compact-size][len_0: compact-size][item_0] ... [len_n][item_n]
//! ```

use crate::internal::buffer::traits::ByteCursor;
use crate::internal::deserializer::structs::ParseError;
use crate::internal::deserializer::traits::{Decoded, ObjectCodec};

use super::super::functions::peek_compact_size;
use super::raw_header::RawHeader;
use super::raw_item::RawItem;

/// 默认头部长度
pub const DEFAULT_HEADER_SIZE: usize = 80;
/// 单个条目允许的最大长度，超出即视为长度前缀损坏
pub const DEFAULT_MAX_ITEM_SIZE: usize = 4 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct CompactSizeCodec {
    header_size: usize,
    max_item_size: usize,
}

impl Default for CompactSizeCodec {
    fn default() -> Self {
        Self {
            header_size: DEFAULT_HEADER_SIZE,
            max_item_size: DEFAULT_MAX_ITEM_SIZE,
        }
    }
}

impl CompactSizeCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header_size(mut self, header_size: usize) -> Self {
        self.header_size = header_size;
        self
    }

    pub fn with_max_item_size(mut self, max_item_size: usize) -> Self {
        self.max_item_size = max_item_size;
        self
    }

    pub fn max_item_size(&self) -> usize {
        self.max_item_size
    }
}

impl ObjectCodec for CompactSizeCodec {
    type Header = RawHeader;
    type Item = RawItem;

    fn header_size(&self) -> usize {
        self.header_size
    }

    fn decode_header(&self, bytes: &[u8]) -> Result<RawHeader, ParseError> {
        if bytes.len() != self.header_size {
            return Err(ParseError::InvalidHeader(format!(
                "头部长度 {} 字节，应为 {} 字节",
                bytes.len(),
                self.header_size
            )));
        }
        Ok(RawHeader::new(bytes))
    }

    fn decode_item_count(
        &self,
        _header: &RawHeader,
        cursor: &dyn ByteCursor,
    ) -> Result<Decoded<u64>, ParseError> {
        peek_compact_size(cursor, 0)
    }

    fn decode_item(&self, cursor: &dyn ByteCursor) -> Result<Decoded<RawItem>, ParseError> {
        let (len, prefix) = match peek_compact_size(cursor, 0)? {
            Decoded::Complete { value, consumed } => (value, consumed),
            Decoded::Incomplete => return Ok(Decoded::Incomplete),
        };
        let len = usize::try_from(len)
            .ok()
            .filter(|len| *len <= self.max_item_size)
            .ok_or_else(|| {
                ParseError::MalformedLengthPrefix(format!(
                    "条目长度 {len} 超过上限 {}",
                    self.max_item_size
                ))
            })?;
        if !cursor.has_remaining(prefix, len) {
            return Ok(Decoded::Incomplete);
        }
        let bytes = cursor.peek_vec(prefix, len)?;
        Ok(Decoded::Complete {
            value: RawItem::new(bytes),
            consumed: prefix + len,
        })
    }
}
