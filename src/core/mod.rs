//! 核心编排层：错误类型、处理阶段、编排器与构建器

pub mod builder;
pub mod error;
pub mod orchestrator;
pub mod state;

pub use builder::OrchestratorBuilder;
pub use error::{ComposeError, LlmError, ReplyError, SourceError, StoreError};
pub use orchestrator::{
    Orchestrator, Reply, APOLOGY_TEXT, EMAIL_UNAVAILABLE_TEXT, HELP_TEXT, NOTHING_FOUND_TEXT,
};
pub use state::Phase;
