//! studybee 本地命令行
//!
//! 不经过短信通道，直接把一条消息交给编排器并打印回复：
//! `studybee [--from KEY] <message...>`

use anyhow::Context;
use studybee::{config::load_config, observability, OrchestratorBuilder, UserKey};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init();

    let mut args = std::env::args().skip(1).peekable();
    let mut from = "local".to_string();
    if args.peek().map(String::as_str) == Some("--from") {
        args.next();
        from = args.next().context("--from requires a value")?;
    }
    let text = args.collect::<Vec<_>>().join(" ");
    if text.trim().is_empty() {
        eprintln!("usage: studybee [--from KEY] <message...>");
        std::process::exit(2);
    }

    let cfg = load_config(None).context("Failed to load config")?;
    let orchestrator = OrchestratorBuilder::new(cfg)
        .build()
        .context("Failed to build orchestrator")?;

    let reply = orchestrator.handle(&text, &UserKey::new(from)).await;
    println!("{}", reply);
    Ok(())
}
