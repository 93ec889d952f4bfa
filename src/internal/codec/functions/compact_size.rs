//! compact-size 变长整数。
//!
//! | 首字节      | 含义                   | 总长 |
//! |-------------|------------------------|------|
//! | `< 0xfd`    | 首字节即为值           | 1    |
//! | `0xfd`      | 后跟 u16 小端          | 3    |
//! | `0xfe`      | 后跟 u32 小端          | 5    |
//! | `0xff`      | 后跟 u64 小端          | 9    |
//!
//! 只接受最短编码，例如用 `0xfd` 前缀表示小于 `0xfd` 的值视为格式错误。

use crate::internal::buffer::traits::ByteCursor;
use crate::internal::deserializer::traits::Decoded;
use crate::internal::deserializer::structs::ParseError;

/// 编码 `value` 所需的字节数。
pub fn compact_size_len(value: u64) -> usize {
    match value {
        0..=0xfc => 1,
        0xfd..=0xffff => 3,
        0x1_0000..=0xffff_ffff => 5,
        _ => 9,
    }
}

pub fn write_compact_size(value: u64, out: &mut Vec<u8>) {
    match compact_size_len(value) {
        1 => out.push(value as u8),
        3 => {
            out.push(0xfd);
            out.extend_from_slice(&(value as u16).to_le_bytes());
        }
        5 => {
            out.push(0xfe);
            out.extend_from_slice(&(value as u32).to_le_bytes());
        }
        _ => {
            out.push(0xff);
            out.extend_from_slice(&value.to_le_bytes());
        }
    }
}

/// 从游标 `offset` 处窥视一个 compact-size，不消费；`consumed` 为其编码长度。
pub fn peek_compact_size(
    cursor: &dyn ByteCursor,
    offset: usize,
) -> Result<Decoded<u64>, ParseError> {
    if !cursor.has_remaining(offset, 1) {
        return Ok(Decoded::Incomplete);
    }
    let first = cursor.peek_u8(offset)?;
    let width = match first {
        0xfd => 3,
        0xfe => 5,
        0xff => 9,
        v => {
            return Ok(Decoded::Complete {
                value: u64::from(v),
                consumed: 1,
            });
        }
    };
    if !cursor.has_remaining(offset, width) {
        return Ok(Decoded::Incomplete);
    }
    let value = match width {
        3 => u64::from(cursor.peek_u16_le(offset + 1)?),
        5 => u64::from(cursor.peek_u32_le(offset + 1)?),
        _ => cursor.peek_u64_le(offset + 1)?,
    };
    if compact_size_len(value) != width {
        return Err(ParseError::MalformedLengthPrefix(format!(
            "非最短编码: 前缀 {first:#04x} 表示的值 {value}"
        )));
    }
    Ok(Decoded::Complete {
        value,
        consumed: width,
    })
}
