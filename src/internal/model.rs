//! 各组件共用的领域模型：对象/来源标识与分批数据块。

pub mod structs;
