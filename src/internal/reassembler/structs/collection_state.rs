use chrono::{DateTime, Utc};

/// 单个 (对象, 来源) 的集合进度。首次注册时创建，收齐后只读，直到被移除。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionState {
    /// 声明的条目总数，尚未收到时为 `None`
    pub num_total_items: Option<u64>,
    /// 已落盘的条目数
    pub num_current_items: u64,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    /// 最近一次注册的时间，外层可据此判断来源是否停滞
    pub updated_at: DateTime<Utc>,
}

impl CollectionState {
    pub(crate) fn new() -> Self {
        let now = Utc::now();
        Self {
            num_total_items: None,
            num_current_items: 0,
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// 重启时从存储恢复的已完成集合；条目数不再追溯。
    pub(crate) fn restored_completed() -> Self {
        Self {
            completed: true,
            ..Self::new()
        }
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// 进度百分比（0～100）；总数未知或为 0 时返回 `f64::NAN`。
    pub fn pct(&self) -> f64 {
        self.num_total_items
            .filter(|&t| t > 0)
            .map(|t| (self.num_current_items as f64 / t as f64) * 100.0)
            .unwrap_or(f64::NAN)
    }
}
