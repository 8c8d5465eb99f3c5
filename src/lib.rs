//! studybee - 学生助理短信编排服务
//!
//! 模块划分：
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 错误类型、处理阶段、编排器与构建器
//! - **integrations**: 邮件摘要协作者、Twilio 短信 Webhook
//! - **llm**: LLM 客户端抽象与实现（OpenAI 兼容 / Mock）
//! - **observability**: tracing 日志初始化
//! - **reply**: 要点格式化与回复合成
//! - **router**: 意图识别与槽位抽取
//! - **schedule**: 时间短语解析与提醒登记
//! - **sources**: 作业数据源与按优先级回退的聚合器
//! - **store**: 按用户分区的缓存与提醒存储

pub mod config;
pub mod core;
pub mod integrations;
pub mod llm;
pub mod observability;
pub mod reply;
pub mod router;
pub mod schedule;
pub mod sources;
pub mod store;

pub use crate::core::{Orchestrator, OrchestratorBuilder};
pub use store::UserKey;
