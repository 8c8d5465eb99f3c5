//! 提醒调度：时间短语规范化与提醒登记（触发由外部调度器负责）

pub mod clock;
pub mod reminder;
pub mod time_phrase;

pub use clock::{Clock, FixedClock, SystemClock};
pub use reminder::{Reminder, ReminderStore, DEFAULT_SUBJECT};
pub use time_phrase::{ResolvedTime, TimePhraseResolver, TimeRule};
