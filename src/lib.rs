//! 大对象流式接收核心：分段缓冲、流式反序列化、分块重组与完成协调。
//!
//! 数据流向：
//!
//! ```text
//! 字节流 ─▶ SegmentedBuffer ─▶ StreamingDeserializer ─┬─ HeaderParsed ─▶ ObjectCoordinator::register_header
//!                                                      └─ ItemsBatch   ─▶ CollectionReassembler ─▶ ChunkStore
//!                                                                                │
//!                                   头部已到 + 集合收齐 ─▶ on_object_received ◀──┘
//! ```

/// 内部导出的模块
mod internal;

#[cfg(test)]
mod tests;

/// 分段字节缓冲与字节游标
pub mod buffer {
    use crate::internal;
    pub use internal::buffer::structs::*;
    pub use internal::buffer::traits::*;
}

/// 对象/来源标识与数据块
pub mod model {
    use crate::internal;
    pub use internal::model::structs::*;
}

/// 流式反序列化器、线格式接口与专用 worker
pub mod deserializer {
    use crate::internal;
    pub use internal::deserializer::structs::*;
    pub use internal::deserializer::traits::*;
}

/// 持久化协作方接口及内存实现
pub mod store {
    use crate::internal;
    pub use internal::store::structs::*;
    pub use internal::store::traits::*;
}

pub mod reassembler {
    use crate::internal;
    pub use internal::reassembler::structs::*;
    pub use internal::reassembler::traits::*;
}

pub mod coordinator {
    use crate::internal;
    pub use internal::coordinator::structs::*;
    pub use internal::coordinator::traits::*;
}

/// 参考线格式编解码
pub mod codec {
    use crate::internal;
    pub use internal::codec::functions::*;
    pub use internal::codec::structs::*;
}

pub mod states {
    use crate::internal;
    pub use internal::states::event_queue::*;
    pub use internal::states::hook_dispatcher::*;
    pub use internal::states::observable::*;
}
