//! Twilio 短信 Webhook
//!
//! Twilio 以表单 POST 投递入站短信（Body、From），回复以 TwiML 返回。
//! 编排器保证总有回复文本，这里只负责解包与渲染。

use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;

use crate::core::Orchestrator;
use crate::store::UserKey;

/// Webhook 状态
pub struct SmsState {
    pub orchestrator: Orchestrator,
}

/// 入站短信表单（只取用到的字段）
#[derive(Debug, Deserialize)]
pub struct InboundSms {
    #[serde(rename = "Body")]
    pub body: Option<String>,
    #[serde(rename = "From")]
    pub from: Option<String>,
}

/// 创建短信路由
pub fn create_router(state: Arc<SmsState>) -> Router {
    Router::new()
        .route("/sms", post(sms_webhook))
        .route("/", get(|| async { Json(serde_json::json!({ "ok": true })) }))
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
}

/// POST /sms - 处理一条入站短信
async fn sms_webhook(
    State(state): State<Arc<SmsState>>,
    Form(sms): Form<InboundSms>,
) -> impl IntoResponse {
    let body = sms.body.unwrap_or_default();
    let user = UserKey::new(sms.from.unwrap_or_default());

    let reply = state.orchestrator.handle(body.trim(), &user).await;

    (
        [(header::CONTENT_TYPE, "application/xml")],
        render_twiml(&reply),
    )
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// 把回复包成 `<Response><Message>` 信封
pub fn render_twiml(message: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response><Message>{}</Message></Response>",
        escape_xml(message)
    )
}
