//! 未配置 API Key 时的后端：每次调用都失败，交给上层按失败路径处理

use async_trait::async_trait;

use crate::core::LlmError;
use crate::llm::traits::{LlmClient, Message};

/// 缺少凭据的真实 provider；不会在本地编造任何输出
#[derive(Debug, Clone)]
pub struct UnconfiguredLlmClient {
    provider: String,
}

impl UnconfiguredLlmClient {
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
        }
    }
}

#[async_trait]
impl LlmClient for UnconfiguredLlmClient {
    async fn complete(&self, _messages: &[Message], _temperature: f32) -> Result<String, LlmError> {
        Err(LlmError::NotConfigured(self.provider.clone()))
    }
}
