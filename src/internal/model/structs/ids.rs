//! 对象标识、来源标识及二者组合成的持久化键。

use std::fmt;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};

/// CombinedId 中对象与来源之间的分隔符
pub const DEFAULT_SEPARATOR: char = ':';

/// 编码时需要转义的字符：分隔符与 `%` 本身，保证拆分无歧义
const COMPONENT_ESCAPES: &AsciiSet = &CONTROLS.add(b':').add(b'%');

/// 大对象标识（如区块哈希）。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(String);

/// 数据来源标识（如对端地址）。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceId(String);

macro_rules! string_id {
    ($name:ident) => {
        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(ObjectId);
string_id!(SourceId);

/// 对象 + 来源组成的持久化键：`encode(object) + ':' + encode(source)`。
///
/// 两个分量都做百分号转义，不同 (对象, 来源) 对永远不会得到同一个键，
/// 并且可以用 [`CombinedId::split`] 原样拆回。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CombinedId(String);

impl CombinedId {
    pub fn new(object_id: &ObjectId, source: &SourceId) -> Self {
        let object = utf8_percent_encode(object_id.as_str(), COMPONENT_ESCAPES);
        let source = utf8_percent_encode(source.as_str(), COMPONENT_ESCAPES);
        Self(format!("{object}{DEFAULT_SEPARATOR}{source}"))
    }

    /// 从持久化层读回的原始字符串重建；不校验格式，拆分时再校验。
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 拆回 (对象, 来源)；格式不合法时返回 `None`。
    pub fn split(&self) -> Option<(ObjectId, SourceId)> {
        let (object, source) = self.0.split_once(DEFAULT_SEPARATOR)?;
        let object = percent_decode_str(object).decode_utf8().ok()?;
        let source = percent_decode_str(source).decode_utf8().ok()?;
        Some((ObjectId::new(object), SourceId::new(source)))
    }
}

impl fmt::Display for CombinedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
