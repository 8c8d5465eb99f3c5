//! LLM 客户端抽象
//!
//! 分类与生成两个后端都实现 LlmClient：complete（非流式），单次调用，无重试。

use async_trait::async_trait;

use crate::core::LlmError;

/// 对话角色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

/// 一条对话消息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// LLM 客户端 trait：实现方负责为每次调用加超时，超时以 LlmError::Timeout 返回
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// 非流式完成，返回首条候选的文本
    async fn complete(&self, messages: &[Message], temperature: f32) -> Result<String, LlmError>;
}
