use super::super::structs::{RawHeader, RawItem};
use super::compact_size::{compact_size_len, write_compact_size};

/// 按 [`CompactSizeCodec`](super::super::structs::CompactSizeCodec) 的线格式拼出完整对象，
/// 供生产方发送，也便于构造测试输入。
pub fn encode_object(header: &RawHeader, items: &[RawItem]) -> Vec<u8> {
    let body: usize = items
        .iter()
        .map(|item| compact_size_len(item.len() as u64) + item.len())
        .sum();
    let mut out =
        Vec::with_capacity(header.bytes.len() + compact_size_len(items.len() as u64) + body);

    out.extend_from_slice(&header.bytes);
    write_compact_size(items.len() as u64, &mut out);
    for item in items {
        write_compact_size(item.len() as u64, &mut out);
        out.extend_from_slice(&item.bytes);
    }
    out
}
