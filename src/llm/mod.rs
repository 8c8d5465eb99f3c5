//! LLM 层：客户端抽象与实现（OpenAI 兼容 / Mock / 未配置）

pub mod mock;
pub mod openai;
pub mod traits;
pub mod unconfigured;

use std::sync::Arc;

use crate::config::AppConfig;

pub use mock::MockLlmClient;
pub use openai::OpenAiClient;
pub use traits::{LlmClient, Message, Role};
pub use unconfigured::UnconfiguredLlmClient;

/// 根据配置选择 LLM 后端
///
/// 只有显式的 `provider = "mock"` 才使用 Mock；真实 provider 缺少 API Key 时
/// 返回一个每次调用都失败的客户端，分类退回 Help，合成走致歉路径。
pub fn create_llm_from_config(cfg: &AppConfig) -> Arc<dyn LlmClient> {
    let provider = cfg.llm.provider.to_lowercase();
    if provider == "mock" {
        tracing::info!("Provider is mock, using Mock LLM");
        return Arc::new(MockLlmClient);
    }
    match cfg.llm.api_key.as_deref().filter(|k| !k.is_empty()) {
        Some(key) => {
            tracing::info!("Using OpenAI-compatible LLM ({})", cfg.llm.model);
            Arc::new(OpenAiClient::new(
                cfg.llm.base_url.as_deref(),
                &cfg.llm.model,
                key,
                cfg.llm.timeout_secs,
            ))
        }
        None => {
            tracing::warn!(
                "No API key set for provider '{}'; LLM calls will fail",
                provider
            );
            Arc::new(UnconfiguredLlmClient::new(provider))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LlmError;

    #[tokio::test]
    async fn test_missing_key_does_not_fall_back_to_mock() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.llm.provider, "openai");
        assert!(cfg.llm.api_key.is_none());

        let llm = create_llm_from_config(&cfg);
        let err = llm
            .complete(&[Message::user("Facts:\n- Essay 1 · ENG101 — no due date")], 0.3)
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::NotConfigured(ref p) if p == "openai"));
    }

    #[tokio::test]
    async fn test_explicit_mock_provider() {
        let mut cfg = AppConfig::default();
        cfg.llm.provider = "Mock".to_string();
        let llm = create_llm_from_config(&cfg);
        let out = llm
            .complete(&[Message::user("Facts:\n• Essay 1 · ENG101 — no due date")], 0.3)
            .await
            .unwrap();
        assert!(out.contains("Essay 1"));
    }
}
