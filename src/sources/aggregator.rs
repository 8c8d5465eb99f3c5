//! 作业聚合：按固定优先级依次尝试数据源，取第一个非空结果
//!
//! 数据源出错与返回空列表同等对待（跳过，尝试下一个）。命中后整体替换该用户的缓存；
//! 全部落空时返回空列表，且不动已有缓存（宁可保留旧数据，也不因一次失败清空）。
//! 顺序求值、短路，不并行。

use std::sync::Arc;

use crate::config::AppConfig;
use crate::sources::{AssignmentRecord, AutomatedBrowsingSource, DirectApiSource, SourceClient};
use crate::store::{AssignmentCache, UserKey};

/// 交给回复环节的记录上限；缓存仍保存完整列表
pub const MAX_SURFACED: usize = 6;

pub struct AssignmentAggregator {
    sources: Vec<Arc<dyn SourceClient>>,
    cache: Arc<dyn AssignmentCache>,
}

impl AssignmentAggregator {
    /// sources 的顺序即优先级
    pub fn new(sources: Vec<Arc<dyn SourceClient>>, cache: Arc<dyn AssignmentCache>) -> Self {
        Self { sources, cache }
    }

    /// 结构化 API 在前；browserbase.enabled 为 false 时不加入自动化浏览器数据源
    pub fn from_config(cfg: &AppConfig, cache: Arc<dyn AssignmentCache>) -> Self {
        let mut sources: Vec<Arc<dyn SourceClient>> =
            vec![Arc::new(DirectApiSource::from_config(&cfg.canvas))];
        if cfg.browserbase.enabled {
            sources.push(Arc::new(AutomatedBrowsingSource::from_config(&cfg.browserbase)));
        }
        Self::new(sources, cache)
    }

    pub async fn aggregate(&self, user: &UserKey) -> Vec<AssignmentRecord> {
        for source in &self.sources {
            let records = match source.fetch().await {
                Ok(records) => records,
                Err(e) => {
                    tracing::debug!(source = source.name(), "source unavailable: {}", e);
                    continue;
                }
            };
            if records.is_empty() {
                tracing::debug!(source = source.name(), "source returned nothing");
                continue;
            }

            tracing::info!(
                source = source.name(),
                user = %user,
                count = records.len(),
                "assignments aggregated"
            );
            if let Err(e) = self.cache.set(user.clone(), records.clone()).await {
                tracing::warn!(user = %user, "failed to cache assignments: {}", e);
            }
            return records;
        }

        tracing::info!(user = %user, "no source produced assignments, cache left untouched");
        Vec::new()
    }

    /// 最近一次成功聚合的结果
    pub async fn cached(&self, user: &UserKey) -> Option<Vec<AssignmentRecord>> {
        match self.cache.get(user).await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(user = %user, "failed to read assignment cache: {}", e);
                None
            }
        }
    }
}

/// 截取前 MAX_SURFACED 条用于展示
pub fn surfaced(records: &[AssignmentRecord]) -> &[AssignmentRecord] {
    &records[..records.len().min(MAX_SURFACED)]
}
