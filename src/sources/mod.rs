//! 作业数据源：统一的 SourceClient 契约、记录校验边界与按优先级回退的聚合器
//!
//! - **canvas**: 结构化 API（优先）
//! - **browserbase**: 远程自动化浏览器脚本抓取（兜底，尽力而为）
//! - **aggregator**: 依次尝试数据源，取第一个非空结果并写入用户缓存

pub mod aggregator;
pub mod browserbase;
pub mod canvas;
pub mod record;

use async_trait::async_trait;

use crate::core::SourceError;

pub use aggregator::{AssignmentAggregator, MAX_SURFACED};
pub use browserbase::AutomatedBrowsingSource;
pub use canvas::DirectApiSource;
pub use record::AssignmentRecord;

/// 数据源 trait：返回已校验的作业列表；空列表表示「暂不可用」，而不是「确定没有作业」
#[async_trait]
pub trait SourceClient: Send + Sync {
    /// 日志用名称
    fn name(&self) -> &'static str;

    async fn fetch(&self) -> Result<Vec<AssignmentRecord>, SourceError>;
}

/// reqwest 超时错误单独归类，其余保持原样
pub(crate) fn classify_http_error(err: reqwest::Error, timeout_secs: u64) -> SourceError {
    if err.is_timeout() {
        SourceError::Timeout(timeout_secs)
    } else {
        SourceError::Http(err)
    }
}

/// 读取响应体失败：超时与发送阶段超时同样处理，其余视为载荷损坏
pub(crate) fn classify_body_error(err: reqwest::Error, timeout_secs: u64) -> SourceError {
    if err.is_timeout() {
        SourceError::Timeout(timeout_secs)
    } else {
        SourceError::Decode(err.to_string())
    }
}
