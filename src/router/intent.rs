//! 意图识别
//!
//! 使用固定、带版本号的指令模板请求分类后端，要求返回严格 JSON。
//! 解析失败或后端出错时降级为 Help 且槽位为空，不向上传播错误；每次调用只请求一次，不缓存、不重试。

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::llm::{LlmClient, Message};

/// 指令模板版本，修改模板时递增
pub const ROUTER_PROMPT_VERSION: &str = "intent-router/v1";

/// 模板中的固定标记（Mock 后端据此识别分类请求）
pub const ROUTER_MARKER: &str = "You are an intent router for a student assistant over SMS.";

const ROUTER_SYSTEM: &str = "Return only valid JSON. No extra text.";

const ROUTER_TEMPERATURE: f32 = 0.1;

/// 识别出的意图
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    CheckAssignments,
    SetReminder,
    CheckEmail,
    Help,
}

impl Intent {
    /// 接受 CHECK_ASSIGNMENTS 与 CheckAssignments 两种写法，未知标签返回 None
    pub fn from_tag(tag: &str) -> Option<Self> {
        let normalized: String = tag
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "checkassignments" => Some(Intent::CheckAssignments),
            "setreminder" => Some(Intent::SetReminder),
            "checkemail" => Some(Intent::CheckEmail),
            "help" => Some(Intent::Help),
            _ => None,
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            Intent::CheckAssignments => "CHECK_ASSIGNMENTS",
            Intent::SetReminder => "SET_REMINDER",
            Intent::CheckEmail => "CHECK_EMAIL",
            Intent::Help => "HELP",
        }
    }
}

/// 与意图一起抽取的可选槽位；未提供为 None，提供了但为空则是 Some("")
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slots {
    pub when: Option<String>,
    pub subject: Option<String>,
}

/// 分类结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub intent: Intent,
    pub slots: Slots,
}

impl Classification {
    pub fn help() -> Self {
        Self {
            intent: Intent::Help,
            slots: Slots::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RouterResponse {
    intent: String,
    #[serde(default)]
    when: Option<String>,
    #[serde(default)]
    subject: Option<String>,
}

/// 把后端原始文本解析为分类结果；形状不符、意图未知时返回 None
pub fn parse_router_response(raw: &str) -> Option<Classification> {
    let parsed: RouterResponse = serde_json::from_str(raw.trim()).ok()?;
    let intent = Intent::from_tag(&parsed.intent)?;
    Some(Classification {
        intent,
        slots: Slots {
            when: parsed.when,
            subject: parsed.subject,
        },
    })
}

fn router_prompt(user_text: &str) -> String {
    format!(
        r#"{marker}
Return strict JSON. Fields:
- intent: one of ["CHECK_ASSIGNMENTS","SET_REMINDER","CHECK_EMAIL","HELP"]
- when: ISO8601 or human phrase (optional)
- subject: short text (optional)

User: "{text}"
JSON:
"#,
        marker = ROUTER_MARKER,
        text = user_text
    )
}

/// 意图分类器
pub struct IntentClassifier {
    llm: Arc<dyn LlmClient>,
}

impl IntentClassifier {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// 空文本同样请求后端；任何失败都降级为 Help
    pub async fn classify(&self, user_text: &str) -> Classification {
        let messages = vec![
            Message::system(ROUTER_SYSTEM),
            Message::user(router_prompt(user_text)),
        ];

        let raw = match self.llm.complete(&messages, ROUTER_TEMPERATURE).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!(version = ROUTER_PROMPT_VERSION, "classification backend failed: {}", e);
                return Classification::help();
            }
        };

        match parse_router_response(&raw) {
            Some(classification) => classification,
            None => {
                tracing::debug!(version = ROUTER_PROMPT_VERSION, "unparseable router response");
                Classification::help()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LlmError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Canned {
        reply: Result<String, ()>,
        prompts: Mutex<Vec<String>>,
    }

    impl Canned {
        fn ok(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: Err(()),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LlmClient for Canned {
        async fn complete(&self, messages: &[Message], _t: f32) -> Result<String, LlmError> {
            let last = messages.last().map(|m| m.content.clone()).unwrap_or_default();
            self.prompts.lock().unwrap().push(last);
            self.reply.clone().map_err(|_| LlmError::Timeout(30))
        }
    }

    #[test]
    fn test_parse_full_response() {
        let c = parse_router_response(
            r#"{"intent": "SET_REMINDER", "when": "tonight", "subject": "calc"}"#,
        )
        .unwrap();
        assert_eq!(c.intent, Intent::SetReminder);
        assert_eq!(c.slots.when.as_deref(), Some("tonight"));
        assert_eq!(c.slots.subject.as_deref(), Some("calc"));
    }

    #[test]
    fn test_parse_distinguishes_empty_from_missing() {
        let c = parse_router_response(r#"{"intent": "SetReminder", "subject": ""}"#).unwrap();
        assert_eq!(c.slots.subject.as_deref(), Some(""));
        assert_eq!(c.slots.when, None);
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        assert!(parse_router_response("not json").is_none());
        assert!(parse_router_response(r#"{"intent": "DANCE"}"#).is_none());
        assert!(parse_router_response(r#"{"when": "tonight"}"#).is_none());
        assert!(parse_router_response(r#"{"intent": "HELP", "when": 5}"#).is_none());
    }

    #[tokio::test]
    async fn test_malformed_json_downgrades_to_help() {
        let llm = Canned::ok("{intent: CHECK_ASSIGNMENTS");
        let classifier = IntentClassifier::new(llm.clone());
        assert_eq!(classifier.classify("what's due").await, Classification::help());
        assert_eq!(llm.prompts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_backend_error_downgrades_to_help() {
        let classifier = IntentClassifier::new(Canned::failing());
        assert_eq!(classifier.classify("remind me").await, Classification::help());
    }

    #[tokio::test]
    async fn test_empty_text_still_classified() {
        let llm = Canned::ok(r#"{"intent": "HELP"}"#);
        let classifier = IntentClassifier::new(llm.clone());
        assert_eq!(classifier.classify("").await.intent, Intent::Help);
        assert!(llm.prompts.lock().unwrap()[0].contains("User: \"\""));
    }
}
