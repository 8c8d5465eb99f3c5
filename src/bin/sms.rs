//! studybee 短信服务
//!
//! 通过 Twilio 短信 Webhook 与编排器对话。
//!
//! 环境变量:
//! - OPENAI_API_KEY: 分类与生成后端（未设置时调用失败；本地调试可设 STUDYBEE__LLM__PROVIDER=mock）
//! - CANVAS_BASE_URL / CANVAS_TOKEN: 结构化作业 API
//! - BROWSERBASE_API_KEY / BROWSERBASE_PROJECT_ID / LMS_*: 自动化浏览器兜底数据源
//! - STUDYBEE__SERVER__BIND: 监听地址（默认 0.0.0.0:3000）
//!
//! 启动: cargo run --bin studybee-sms --features twilio

use std::sync::Arc;

use anyhow::Context;
use studybee::config::load_config;
use studybee::integrations::twilio::{create_router, SmsState};
use studybee::{observability, OrchestratorBuilder};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init();

    let cfg = load_config(None).context("Failed to load config")?;
    let bind = cfg.server.bind.clone();
    let orchestrator = OrchestratorBuilder::new(cfg)
        .build()
        .context("Failed to build orchestrator")?;

    let app = create_router(Arc::new(SmsState { orchestrator }));

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    tracing::info!("studybee SMS server listening on http://{}", bind);
    tracing::info!("Webhook URL: http://YOUR_HOST/sms");

    axum::serve(listener, app).await?;
    Ok(())
}
