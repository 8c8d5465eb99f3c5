//! 作业缓存：每个用户只保存最近一次成功聚合的完整结果

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::core::StoreError;
use crate::sources::AssignmentRecord;
use crate::store::UserKey;

/// 缓存 trait：set 为整体原子替换，不做增量合并
#[async_trait]
pub trait AssignmentCache: Send + Sync {
    async fn get(&self, user: &UserKey) -> Result<Option<Vec<AssignmentRecord>>, StoreError>;

    async fn set(&self, user: UserKey, records: Vec<AssignmentRecord>) -> Result<(), StoreError>;
}

/// 进程内实现，生命周期与进程相同
#[derive(Debug, Default)]
pub struct InMemoryAssignmentCache {
    entries: RwLock<HashMap<UserKey, Vec<AssignmentRecord>>>,
}

impl InMemoryAssignmentCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AssignmentCache for InMemoryAssignmentCache {
    async fn get(&self, user: &UserKey) -> Result<Option<Vec<AssignmentRecord>>, StoreError> {
        Ok(self.entries.read().await.get(user).cloned())
    }

    async fn set(&self, user: UserKey, records: Vec<AssignmentRecord>) -> Result<(), StoreError> {
        self.entries.write().await.insert(user, records);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str) -> AssignmentRecord {
        AssignmentRecord::new(title, None, None, None).unwrap()
    }

    #[tokio::test]
    async fn test_set_replaces_whole_entry() {
        let cache = InMemoryAssignmentCache::new();
        let user = UserKey::new("u1");

        cache
            .set(user.clone(), vec![record("Essay 1"), record("Lab 2")])
            .await
            .unwrap();
        cache.set(user.clone(), vec![record("Quiz 3")]).await.unwrap();

        let cached = cache.get(&user).await.unwrap().unwrap();
        assert_eq!(cached, vec![record("Quiz 3")]);
        assert!(cache.get(&UserKey::new("u2")).await.unwrap().is_none());
    }
}
