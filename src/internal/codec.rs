//! 参考线格式：固定长度头部 + compact-size 条目数 + 长度前缀条目。
//!
//! 对外导出以 [`crate::codec`] 为准。

pub mod functions;
pub mod structs;
