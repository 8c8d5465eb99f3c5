//! 外部集成：邮件摘要协作者、Twilio 短信 Webhook（需 twilio feature 与公网 Webhook 域名）

pub mod email;

#[cfg(feature = "twilio")]
pub mod twilio;

pub use email::{EmailSummarizer, PlaceholderEmailSummarizer};
