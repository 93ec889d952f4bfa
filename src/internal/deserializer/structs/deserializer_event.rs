use crate::internal::model::structs::Chunk;

use super::parse_error::ParseError;

/// 反序列化器对外发出的事件，同一对象内严格按产生顺序交付。
#[derive(Debug, Clone)]
pub enum DeserializerEvent<H, I> {
    /// 头部及其声明的条目数，每个对象恰好一次
    HeaderParsed { header: H, num_items: u64 },
    /// 一批条目，`order_number` 从 0 起每次加 1
    ItemsBatch(Chunk<I>),
    /// 解析失败，之后不再有任何事件
    Error(ParseError),
    /// 收到 kill 信号，之后不再有任何事件
    Cancelled,
}
