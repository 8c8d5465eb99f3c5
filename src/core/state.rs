//! 单条消息的处理阶段
//!
//! Received → Classified → Dispatched → (Aggregating | Scheduling | Summarizing) → Composed → Replied；
//! 所有路径（包括失败分支）都会到达 Replied。

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Received,
    Classified,
    Dispatched,
    Aggregating,
    Scheduling,
    Summarizing,
    Composed,
    Replied,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Received => "received",
            Phase::Classified => "classified",
            Phase::Dispatched => "dispatched",
            Phase::Aggregating => "aggregating",
            Phase::Scheduling => "scheduling",
            Phase::Summarizing => "summarizing",
            Phase::Composed => "composed",
            Phase::Replied => "replied",
        };
        f.write_str(name)
    }
}
