//! 把少量结构化要点交给生成后端，改写为简短友好的短信
//!
//! 生成失败没有本地兜底：调用方必须把 ComposeError 当作本分支失败处理，而不是自行拼凑作业文本。

use std::sync::Arc;

use crate::core::{ComposeError, LlmError};
use crate::llm::{LlmClient, Message};
use crate::sources::AssignmentRecord;

/// 回复字符上限
pub const DEFAULT_MAX_CHARS: usize = 600;

const COMPOSER_SYSTEM: &str = "You write concise, friendly SMS replies.";

const COMPOSER_TEMPERATURE: f32 = 0.4;

/// 单条作业要点：`标题 · 课程 — due 截止`，缺课程时省略中间段，缺截止时写 no due date
pub fn format_bullet(record: &AssignmentRecord) -> String {
    let course = record
        .course()
        .map(|c| format!(" · {}", c))
        .unwrap_or_default();
    format!(
        "{}{} — due {}",
        record.title(),
        course,
        record.due().unwrap_or("no due date")
    )
}

/// 按字符截断，超长时以省略号结尾
fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}

pub struct ReplyComposer {
    llm: Arc<dyn LlmClient>,
    max_chars: usize,
}

impl ReplyComposer {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            max_chars: DEFAULT_MAX_CHARS,
        }
    }

    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    fn prompt(&self, bullets: &[String]) -> String {
        format!(
            "Rewrite these bullets into a concise, friendly SMS (<= {} chars):\n• {}",
            self.max_chars,
            bullets.join("\n• ")
        )
    }

    /// 返回非空且不超过 max_chars 个字符的文本
    pub async fn compose(&self, bullets: &[String]) -> Result<String, ComposeError> {
        if bullets.is_empty() {
            return Err(ComposeError::NoFacts);
        }

        let messages = vec![
            Message::system(COMPOSER_SYSTEM),
            Message::user(self.prompt(bullets)),
        ];
        let text = self.llm.complete(&messages, COMPOSER_TEMPERATURE).await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(ComposeError::Backend(LlmError::EmptyResponse));
        }
        Ok(truncate_chars(text, self.max_chars))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Echo {
        reply: String,
        seen: Mutex<Option<String>>,
    }

    #[async_trait]
    impl LlmClient for Echo {
        async fn complete(&self, messages: &[Message], _t: f32) -> Result<String, LlmError> {
            *self.seen.lock().unwrap() = messages.last().map(|m| m.content.clone());
            Ok(self.reply.clone())
        }
    }

    struct Down;

    #[async_trait]
    impl LlmClient for Down {
        async fn complete(&self, _m: &[Message], _t: f32) -> Result<String, LlmError> {
            Err(LlmError::Request("503".into()))
        }
    }

    fn echo(reply: &str) -> Arc<Echo> {
        Arc::new(Echo {
            reply: reply.to_string(),
            seen: Mutex::new(None),
        })
    }

    #[test]
    fn test_format_bullet() {
        let full = AssignmentRecord::new(
            "Essay 1",
            Some("ENG101".into()),
            Some("2024-05-01T23:59:00Z".into()),
            None,
        )
        .unwrap();
        assert_eq!(format_bullet(&full), "Essay 1 · ENG101 — due 2024-05-01T23:59:00Z");

        let bare = AssignmentRecord::new("Lab 2", None, None, None).unwrap();
        assert_eq!(format_bullet(&bare), "Lab 2 — due no due date");
    }

    #[tokio::test]
    async fn test_prompt_embeds_bullets_and_limit() {
        let llm = echo("  You have an essay due Wednesday!  ");
        let composer = ReplyComposer::new(llm.clone());

        let text = composer
            .compose(&["Essay 1 — due Wed".to_string(), "Lab 2 — due Fri".to_string()])
            .await
            .unwrap();

        assert_eq!(text, "You have an essay due Wednesday!");
        let prompt = llm.seen.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("<= 600 chars"));
        assert!(prompt.contains("• Essay 1 — due Wed\n• Lab 2 — due Fri"));
    }

    #[tokio::test]
    async fn test_output_is_bounded() {
        let composer = ReplyComposer::new(echo(&"é".repeat(700))).with_max_chars(600);
        let text = composer.compose(&["x".to_string()]).await.unwrap();
        assert_eq!(text.chars().count(), 600);
        assert!(text.ends_with('…'));
    }

    #[tokio::test]
    async fn test_backend_failure_is_an_error() {
        let composer = ReplyComposer::new(Arc::new(Down));
        assert!(matches!(
            composer.compose(&["x".to_string()]).await,
            Err(ComposeError::Backend(_))
        ));
        assert!(matches!(
            ReplyComposer::new(echo("   ")).compose(&["x".to_string()]).await,
            Err(ComposeError::Backend(LlmError::EmptyResponse))
        ));
    }
}
