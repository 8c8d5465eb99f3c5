//! 回复合成：要点格式化与生成后端调用

pub mod composer;

pub use composer::{format_bullet, ReplyComposer, DEFAULT_MAX_CHARS};
