//! 流式大对象反序列化：同步解析固定头部，随后把条目集合分批吐出，
//! 而不是在内存里拼出整个对象。
//!
//! 对外导出以 [`crate::deserializer`] 为准。

pub mod structs;
pub mod traits;
