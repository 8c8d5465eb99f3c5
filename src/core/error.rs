//! 错误类型：按边界划分（LLM、数据源、存储、回复合成、请求级）
//!
//! 分类失败、数据源失败、聚合为空都在本地恢复，不会出现在这里；
//! 只有合成失败与存储失败会以 ReplyError 上抛到 Orchestrator 边界。

use thiserror::Error;

/// LLM 后端（分类 / 生成）调用错误
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("LLM request timed out after {0}s")]
    Timeout(u64),

    #[error("LLM request failed: {0}")]
    Request(String),

    #[error("LLM returned an empty response")]
    EmptyResponse,

    #[error("LLM provider '{0}' has no API key configured")]
    NotConfigured(String),
}

/// 单个作业数据源的错误；聚合器把它与「空结果」同等对待
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Source timed out after {0}s")]
    Timeout(u64),

    #[error("Unexpected status {0}")]
    Status(u16),

    #[error("Malformed payload: {0}")]
    Decode(String),
}

/// 缓存 / 提醒存储错误（内存实现不会产生，网络存储可能产生）
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// 回复合成失败：生成后端出错时没有安全的本地兜底文本
#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("Generation backend failed: {0}")]
    Backend(#[from] LlmError),

    #[error("Nothing to compose")]
    NoFacts,
}

/// 请求级错误：由 Orchestrator::try_handle 返回，handle 在边界处替换为致歉文本
#[derive(Error, Debug)]
pub enum ReplyError {
    #[error("Compose failed: {0}")]
    Compose(#[from] ComposeError),

    #[error("Store failed: {0}")]
    Store(#[from] StoreError),
}
