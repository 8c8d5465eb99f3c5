//! 意图路由：调用外部分类后端，把输出映射到封闭的意图集合与槽位

pub mod intent;

pub use intent::{Classification, Intent, IntentClassifier, Slots, ROUTER_MARKER, ROUTER_PROMPT_VERSION};
