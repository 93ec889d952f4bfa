//! 集合重组：按 (对象, 来源) 跟踪分块到达进度、落盘并检测完成与来源切换。
//!
//! 对外导出以 [`crate::reassembler`] 为准。

pub mod structs;
pub mod traits;
