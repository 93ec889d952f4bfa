//! 线格式解码接口：头部、条目数、单个条目的具体编码由实现方决定。

use crate::internal::buffer::traits::ByteCursor;

use super::super::structs::ParseError;

/// 一次解码尝试的结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded<T> {
    /// 解出完整的值，占用游标头部 `consumed` 字节
    Complete { value: T, consumed: usize },
    /// 数据尚未到齐，追加更多字节后从同一位置重试
    Incomplete,
}

impl<T> Decoded<T> {
    pub fn map<U, F>(self, f: F) -> Decoded<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Decoded::Complete { value, consumed } => Decoded::Complete {
                value: f(value),
                consumed,
            },
            Decoded::Incomplete => Decoded::Incomplete,
        }
    }
}

/// 大对象的线格式。
///
/// 所有解码方法只窥视游标，不消费；消费由反序列化器在拿到
/// [`Decoded::Complete`] 后按 `consumed` 统一执行。
pub trait ObjectCodec: Send {
    type Header: Send;
    type Item: Send;

    /// 头部的固定字节数。
    fn header_size(&self) -> usize;

    /// 解码恰好 `header_size()` 字节的头部。
    fn decode_header(&self, bytes: &[u8]) -> Result<Self::Header, ParseError>;

    /// 解码头部之后声明的条目数。
    fn decode_item_count(
        &self,
        header: &Self::Header,
        cursor: &dyn ByteCursor,
    ) -> Result<Decoded<u64>, ParseError>;

    /// 解码游标头部的一个条目。
    fn decode_item(&self, cursor: &dyn ByteCursor) -> Result<Decoded<Self::Item>, ParseError>;
}
