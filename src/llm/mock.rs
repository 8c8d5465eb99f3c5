//! Mock LLM 客户端（provider = "mock" 时使用，无需网络）
//!
//! 分类请求按关键词返回路由 JSON；生成请求把要点原样拼回一条短信。

use async_trait::async_trait;

use crate::core::LlmError;
use crate::llm::{LlmClient, Message, Role};
use crate::router::ROUTER_MARKER;

/// Mock 客户端：确定性输出，便于本地跑通整条流水线
#[derive(Debug, Default)]
pub struct MockLlmClient;

impl MockLlmClient {
    fn route(text: &str) -> String {
        let lower = text.to_lowercase();
        let intent = if lower.contains("remind") {
            "SET_REMINDER"
        } else if lower.contains("email") || lower.contains("inbox") {
            "CHECK_EMAIL"
        } else if lower.contains("due") || lower.contains("assignment") || lower.contains("homework") {
            "CHECK_ASSIGNMENTS"
        } else {
            "HELP"
        };
        let when = ["tonight", "tomorrow"]
            .into_iter()
            .find(|w| lower.contains(w));
        serde_json::json!({ "intent": intent, "when": when }).to_string()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, messages: &[Message], _temperature: f32) -> Result<String, LlmError> {
        let last_user = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        if last_user.contains(ROUTER_MARKER) {
            // 只看引号内的用户原文，避免模板里的示例词干扰
            let quoted = last_user
                .split_once("User: \"")
                .and_then(|(_, rest)| rest.rsplit_once('"'))
                .map(|(text, _)| text)
                .unwrap_or_default();
            return Ok(Self::route(quoted));
        }

        let bullets: Vec<&str> = last_user
            .lines()
            .filter_map(|l| l.strip_prefix("• "))
            .collect();
        if bullets.is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(format!("Here's what's coming up: {}", bullets.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_keywords() {
        assert!(MockLlmClient::route("remind me tonight").contains("SET_REMINDER"));
        assert!(MockLlmClient::route("remind me tonight").contains("tonight"));
        assert!(MockLlmClient::route("what's due this week").contains("CHECK_ASSIGNMENTS"));
        assert!(MockLlmClient::route("hi").contains("HELP"));
    }
}
