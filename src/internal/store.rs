//! 持久化协作方接口：分块存储、头部存储及可插拔的对象序列化器。
//!
//! 具体存储引擎（磁盘映射等）由调用方实现这些 trait 注入；
//! 本模块附带的内存实现用于测试以及不需要落盘的场景。

pub mod structs;
pub mod traits;
