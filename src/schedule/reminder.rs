//! 提醒登记：解析时间短语、追加提醒、生成确定性的确认文本
//!
//! 未解析的短语只保存在 raw_when_phrase 中，scheduled_at 为 None；
//! 外部触发器只触发 is_schedulable() 为 true 的提醒，不会重新解析原文。

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use uuid::Uuid;

use crate::core::StoreError;
use crate::schedule::time_phrase::{format_timestamp, ResolvedTime, TimePhraseResolver};
use crate::store::{ReminderLog, UserKey};

/// 未提供主题时的占位文本
pub const DEFAULT_SUBJECT: &str = "Study session";

/// 已登记的提醒；创建后不再修改
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub id: Uuid,
    pub owner: UserKey,
    pub text: String,
    pub scheduled_at: Option<DateTime<FixedOffset>>,
    pub raw_when_phrase: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Reminder {
    /// 只有解析出时间戳的提醒才会被触发
    pub fn is_schedulable(&self) -> bool {
        self.scheduled_at.is_some()
    }
}

pub struct ReminderStore {
    log: Arc<dyn ReminderLog>,
    resolver: TimePhraseResolver,
    default_subject: String,
}

impl ReminderStore {
    pub fn new(log: Arc<dyn ReminderLog>, resolver: TimePhraseResolver) -> Self {
        Self {
            log,
            resolver,
            default_subject: DEFAULT_SUBJECT.to_string(),
        }
    }

    pub fn with_default_subject(mut self, subject: impl Into<String>) -> Self {
        self.default_subject = subject.into();
        self
    }

    /// 追加一条提醒并返回确认文本（同一用户的重复提醒照常追加）
    ///
    /// 空白主题按未提供处理。确认文本依次优先：解析出的时间戳、原文短语、"the set time"。
    pub async fn add(
        &self,
        owner: &UserKey,
        subject: Option<&str>,
        when_phrase: Option<&str>,
    ) -> Result<String, StoreError> {
        let text = subject
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(self.default_subject.as_str())
            .to_string();

        let resolved = self.resolver.resolve(when_phrase);
        let scheduled_at = resolved.as_ref().and_then(ResolvedTime::timestamp);

        let when_text = match &resolved {
            Some(ResolvedTime::At(at)) => format_timestamp(at),
            Some(ResolvedTime::Verbatim(phrase)) if !phrase.trim().is_empty() => phrase.clone(),
            _ => "the set time".to_string(),
        };

        let reminder = Reminder {
            id: Uuid::new_v4(),
            owner: owner.clone(),
            text: text.clone(),
            scheduled_at,
            raw_when_phrase: when_phrase.map(String::from),
            created_at: self.resolver.now().with_timezone(&Utc),
        };
        tracing::info!(
            owner = %owner,
            id = %reminder.id,
            schedulable = reminder.is_schedulable(),
            "reminder added"
        );
        self.log.append(reminder).await?;

        Ok(format!("Okay, I'll remind you: '{}' at {}.", text, when_text))
    }

    pub async fn list_for(&self, owner: &UserKey) -> Result<Vec<Reminder>, StoreError> {
        self.log.list_for(owner).await
    }
}
