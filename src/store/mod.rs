//! 状态存储：按 UserKey 分区的作业缓存与提醒日志
//!
//! 编排器与聚合器只依赖 trait；进程内 HashMap 或网络存储都可以满足同一契约。

pub mod cache;
pub mod reminders;

use std::fmt;

pub use cache::{AssignmentCache, InMemoryAssignmentCache};
pub use reminders::{InMemoryReminderLog, ReminderLog};

/// 发送方的稳定标识（如规范化后的手机号）；所有按用户的状态都以它分区
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserKey(String);

impl UserKey {
    /// 只去掉首尾空白，空值记为 "unknown"；其余内容原样保留，不同渠道的发送方不会合并
    pub fn new(raw: impl AsRef<str>) -> Self {
        let key = raw.as_ref().trim();
        if key.is_empty() {
            Self("unknown".to_string())
        } else {
            Self(key.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserKey {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}
