//! 对象协调器：把「头部到达」与「集合收齐」合并成一次「对象已接收」通知。
//!
//! 对外导出以 [`crate::coordinator`] 为准。

pub mod structs;
pub mod traits;
