//! 分段字节缓冲：传输层收到的字节先追加到这里，再由反序列化器从头部按需取走。
//!
//! 对外导出以 [`crate::buffer`] 为准。

pub mod impl_traits;
pub mod structs;
pub mod traits;
