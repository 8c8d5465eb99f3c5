//! 编排器：classify → dispatch →（聚合 | 提醒 | 邮件摘要）→ compose → reply
//!
//! try_handle 把合成失败与存储失败作为 ReplyError 返回；handle 是对外的全函数边界，
//! 任何输入都返回非空文本，出错时替换为固定的致歉文本。

use std::sync::Arc;

use crate::core::{Phase, ReplyError};
use crate::integrations::EmailSummarizer;
use crate::reply::{format_bullet, ReplyComposer};
use crate::router::{Intent, IntentClassifier};
use crate::schedule::ReminderStore;
use crate::sources::aggregator::surfaced;
use crate::sources::AssignmentAggregator;
use crate::store::UserKey;

/// 帮助 / 无法识别时的用法提示
pub const HELP_TEXT: &str =
    "Try: 'what's due this week', 'set reminder to study calc at 8pm', or 'summarize my email'.";

/// 所有数据源都没有结果时的引导
pub const NOTHING_FOUND_TEXT: &str =
    "I couldn't find upcoming assignments yet. Try connecting Canvas (token) or set LMS selectors.";

/// 请求失败时由边界替换的致歉文本
pub const APOLOGY_TEXT: &str = "Sorry, something went wrong on my end. Please try again in a minute.";

/// 邮件协作者返回空文本时的替代回复
pub const EMAIL_UNAVAILABLE_TEXT: &str = "No email summary is available right now.";

/// 一次处理的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub intent: Intent,
    /// 交给 ReplyComposer 的要点（仅 CheckAssignments 且有结果时非空）
    pub bullets: Vec<String>,
}

impl Reply {
    fn plain(intent: Intent, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            intent,
            bullets: Vec::new(),
        }
    }
}

pub struct Orchestrator {
    classifier: IntentClassifier,
    aggregator: AssignmentAggregator,
    reminders: ReminderStore,
    composer: ReplyComposer,
    email: Arc<dyn EmailSummarizer>,
}

fn enter(phase: Phase, user: &UserKey) {
    tracing::debug!(phase = %phase, user = %user, "orchestrator phase");
}

impl Orchestrator {
    pub fn new(
        classifier: IntentClassifier,
        aggregator: AssignmentAggregator,
        reminders: ReminderStore,
        composer: ReplyComposer,
        email: Arc<dyn EmailSummarizer>,
    ) -> Self {
        Self {
            classifier,
            aggregator,
            reminders,
            composer,
            email,
        }
    }

    /// 处理一条入站消息，总是返回非空回复
    pub async fn handle(&self, text: &str, user: &UserKey) -> String {
        match self.try_handle(text, user).await {
            Ok(reply) => reply.text,
            Err(e) => {
                tracing::error!(user = %user, "reply failed: {}", e);
                enter(Phase::Replied, user);
                APOLOGY_TEXT.to_string()
            }
        }
    }

    pub async fn try_handle(&self, text: &str, user: &UserKey) -> Result<Reply, ReplyError> {
        enter(Phase::Received, user);
        let classification = self.classifier.classify(text).await;
        enter(Phase::Classified, user);
        tracing::info!(user = %user, intent = classification.intent.as_tag(), "message classified");

        let slots = classification.slots;
        enter(Phase::Dispatched, user);
        let reply = match classification.intent {
            Intent::SetReminder => {
                enter(Phase::Scheduling, user);
                let confirmation = self
                    .reminders
                    .add(user, slots.subject.as_deref(), slots.when.as_deref())
                    .await?;
                Reply::plain(Intent::SetReminder, confirmation)
            }
            Intent::CheckEmail => {
                enter(Phase::Summarizing, user);
                let summary = self.email.summarize(user).await;
                if summary.trim().is_empty() {
                    Reply::plain(Intent::CheckEmail, EMAIL_UNAVAILABLE_TEXT)
                } else {
                    Reply::plain(Intent::CheckEmail, summary)
                }
            }
            Intent::CheckAssignments => {
                enter(Phase::Aggregating, user);
                let records = self.aggregator.aggregate(user).await;
                if records.is_empty() {
                    Reply::plain(Intent::CheckAssignments, NOTHING_FOUND_TEXT)
                } else {
                    let bullets: Vec<String> =
                        surfaced(&records).iter().map(format_bullet).collect();
                    let text = self.composer.compose(&bullets).await?;
                    Reply {
                        text,
                        intent: Intent::CheckAssignments,
                        bullets,
                    }
                }
            }
            Intent::Help => Reply::plain(Intent::Help, HELP_TEXT),
        };
        enter(Phase::Composed, user);
        enter(Phase::Replied, user);
        Ok(reply)
    }
}
