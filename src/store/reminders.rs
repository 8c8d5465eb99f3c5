//! 提醒日志：只追加，不覆盖、不去重、不删除

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::core::StoreError;
use crate::schedule::Reminder;
use crate::store::UserKey;

/// 提醒存储 trait：append 为原子追加，list_for 按插入顺序返回
#[async_trait]
pub trait ReminderLog: Send + Sync {
    async fn append(&self, reminder: Reminder) -> Result<(), StoreError>;

    async fn list_for(&self, owner: &UserKey) -> Result<Vec<Reminder>, StoreError>;
}

/// 进程内实现：所有用户共用一个有序列表
#[derive(Debug, Default)]
pub struct InMemoryReminderLog {
    reminders: RwLock<Vec<Reminder>>,
}

impl InMemoryReminderLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 全部提醒条数（供外部调度器与测试使用）
    pub async fn len(&self) -> usize {
        self.reminders.read().await.len()
    }
}

#[async_trait]
impl ReminderLog for InMemoryReminderLog {
    async fn append(&self, reminder: Reminder) -> Result<(), StoreError> {
        self.reminders.write().await.push(reminder);
        Ok(())
    }

    async fn list_for(&self, owner: &UserKey) -> Result<Vec<Reminder>, StoreError> {
        Ok(self
            .reminders
            .read()
            .await
            .iter()
            .filter(|r| &r.owner == owner)
            .cloned()
            .collect())
    }
}
