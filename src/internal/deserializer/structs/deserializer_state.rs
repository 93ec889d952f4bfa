/// 反序列化器状态机。
///
/// `SeekingHeader → ParsingHeader → ParsingItems → FlushingLastBatch → Finished`，
/// `Failed` / `Cancelled` 可从任意非终态进入。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeserializerState {
    /// 等待固定长度的头部字节到齐
    SeekingHeader,
    /// 头部已到齐，正在解析头部与声明的条目数
    ParsingHeader,
    /// 逐条解析条目并按阈值分批
    ParsingItems,
    /// 条目已解析完，吐出最后一批
    FlushingLastBatch,
    Finished,
    Failed,
    Cancelled,
}

impl DeserializerState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Failed | Self::Cancelled)
    }
}
