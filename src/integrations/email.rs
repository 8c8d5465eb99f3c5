//! 邮件摘要协作者（外部服务，当前为占位实现）

use async_trait::async_trait;

use crate::store::UserKey;

/// 邮件摘要：无请求参数（隐含当前用户），返回一段文本；不保证时效
#[async_trait]
pub trait EmailSummarizer: Send + Sync {
    async fn summarize(&self, user: &UserKey) -> String;
}

/// 接入真实邮箱前的固定回复
#[derive(Debug, Clone, Default)]
pub struct PlaceholderEmailSummarizer {
    connected: bool,
}

impl PlaceholderEmailSummarizer {
    /// access_token 非空时视为已连接
    pub fn new(access_token: Option<&str>) -> Self {
        Self {
            connected: access_token.is_some_and(|t| !t.is_empty()),
        }
    }
}

#[async_trait]
impl EmailSummarizer for PlaceholderEmailSummarizer {
    async fn summarize(&self, _user: &UserKey) -> String {
        if self.connected {
            "Summarized your latest emails. (Inbox summaries are not wired up yet.)".to_string()
        } else {
            "Email integration not connected yet. (Demo: 2 unread emails from Prof. Smith re: lab report; Career Center newsletter.)".to_string()
        }
    }
}
