//! 时间短语解析：有序规则表，首条命中生效
//!
//! 不是完整的自然语言日期解析器。规则按顺序在参考时区的「当前时刻」上求值，
//! 大小写不敏感的子串 / 正则匹配；都不命中时原样返回短语（仅供展示，不是时间戳）。

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, SecondsFormat, TimeZone};
use chrono_tz::Tz;
use regex::{Regex, RegexBuilder};

use crate::schedule::Clock;

/// 规则求值函数：输入参考时区的当前时刻，返回目标时刻（本地时间不存在时返回 None，视为未命中）
pub type ResolveFn = fn(DateTime<Tz>) -> Option<DateTime<Tz>>;

enum Matcher {
    Contains(String),
    Pattern(Regex),
}

impl Matcher {
    fn matches(&self, lower_phrase: &str, phrase: &str) -> bool {
        match self {
            Matcher::Contains(needle) => lower_phrase.contains(needle.as_str()),
            Matcher::Pattern(re) => re.is_match(phrase),
        }
    }
}

/// 单条规则：匹配条件 → 求值函数
pub struct TimeRule {
    name: String,
    matcher: Matcher,
    resolve: ResolveFn,
}

impl TimeRule {
    /// 大小写不敏感的子串规则
    pub fn contains(name: impl Into<String>, needle: &str, resolve: ResolveFn) -> Self {
        Self {
            name: name.into(),
            matcher: Matcher::Contains(needle.to_lowercase()),
            resolve,
        }
    }

    /// 大小写不敏感的正则规则
    pub fn pattern(
        name: impl Into<String>,
        pattern: &str,
        resolve: ResolveFn,
    ) -> Result<Self, regex::Error> {
        let re = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(Self {
            name: name.into(),
            matcher: Matcher::Pattern(re),
            resolve,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for TimeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimeRule").field("name", &self.name).finish()
    }
}

/// 解析结果：规范化时间戳，或未解析的原文
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedTime {
    At(DateTime<FixedOffset>),
    Verbatim(String),
}

impl ResolvedTime {
    pub fn timestamp(&self) -> Option<DateTime<FixedOffset>> {
        match self {
            ResolvedTime::At(at) => Some(*at),
            ResolvedTime::Verbatim(_) => None,
        }
    }
}

/// 时间戳对外的统一文本格式（RFC 3339，精确到秒）
pub fn format_timestamp(at: &DateTime<FixedOffset>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// 在给定本地日期的整点构造时刻（夏令时缺口返回 None）
pub fn local_at(tz: Tz, date: NaiveDate, hour: u32) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&date.and_hms_opt(hour, 0, 0)?).earliest()
}

fn tonight(now: DateTime<Tz>) -> Option<DateTime<Tz>> {
    local_at(now.timezone(), now.date_naive(), 20)
}

fn tomorrow_morning(now: DateTime<Tz>) -> Option<DateTime<Tz>> {
    local_at(now.timezone(), now.date_naive().succ_opt()?, 9)
}

/// 默认规则：tonight → 今天 20:00，tomorrow → 明天 09:00
pub fn default_rules() -> Vec<TimeRule> {
    vec![
        TimeRule::contains("tonight", "tonight", tonight),
        TimeRule::contains("tomorrow", "tomorrow", tomorrow_morning),
    ]
}

pub struct TimePhraseResolver {
    tz: Tz,
    clock: Arc<dyn Clock>,
    rules: Vec<TimeRule>,
}

impl TimePhraseResolver {
    pub fn new(tz: Tz, clock: Arc<dyn Clock>) -> Self {
        Self {
            tz,
            clock,
            rules: default_rules(),
        }
    }

    /// 追加一条规则（排在已有规则之后）
    pub fn with_rule(mut self, rule: TimeRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// 参考时区的当前时刻
    pub fn now(&self) -> DateTime<Tz> {
        self.clock.now().with_timezone(&self.tz)
    }

    pub fn resolve(&self, phrase: Option<&str>) -> Option<ResolvedTime> {
        let phrase = phrase?;
        if phrase.trim().is_empty() {
            return Some(ResolvedTime::Verbatim(phrase.to_string()));
        }

        let lower = phrase.to_lowercase();
        let now = self.now();
        for rule in &self.rules {
            if !rule.matcher.matches(&lower, phrase) {
                continue;
            }
            if let Some(at) = (rule.resolve)(now) {
                tracing::debug!(rule = rule.name(), phrase, "time phrase resolved");
                return Some(ResolvedTime::At(at.with_timezone(&at.offset().fix())));
            }
        }

        Some(ResolvedTime::Verbatim(phrase.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::FixedClock;
    use chrono::{Datelike, Timelike, Utc};

    fn resolver_at(rfc3339: &str, tz: Tz) -> TimePhraseResolver {
        let now = DateTime::parse_from_rfc3339(rfc3339).unwrap().with_timezone(&Utc);
        TimePhraseResolver::new(tz, Arc::new(FixedClock(now)))
    }

    #[test]
    fn test_none_stays_none() {
        let r = resolver_at("2024-05-01T12:30:45Z", Tz::UTC);
        assert_eq!(r.resolve(None), None);
    }

    #[test]
    fn test_tonight_is_today_at_eight_pm() {
        let r = resolver_at("2024-05-01T12:30:45.123Z", Tz::UTC);
        let at = r.resolve(Some("let's do TONIGHT")).unwrap().timestamp().unwrap();
        assert_eq!(format_timestamp(&at), "2024-05-01T20:00:00Z");
        assert_eq!(at.nanosecond(), 0);
    }

    #[test]
    fn test_tomorrow_is_next_day_at_nine() {
        let r = resolver_at("2024-05-31T23:10:00Z", Tz::UTC);
        let at = r.resolve(Some("tomorrow morning")).unwrap().timestamp().unwrap();
        assert_eq!((at.month(), at.day(), at.hour(), at.minute()), (6, 1, 9, 0));
    }

    #[test]
    fn test_tonight_wins_over_tomorrow() {
        let r = resolver_at("2024-05-01T08:00:00Z", Tz::UTC);
        let at = r
            .resolve(Some("tonight, or tomorrow"))
            .unwrap()
            .timestamp()
            .unwrap();
        assert_eq!(at.day(), 1);
        assert_eq!(at.hour(), 20);
    }

    #[test]
    fn test_unmatched_phrase_is_verbatim() {
        let r = resolver_at("2024-05-01T08:00:00Z", Tz::UTC);
        assert_eq!(
            r.resolve(Some("next Tuesday")),
            Some(ResolvedTime::Verbatim("next Tuesday".to_string()))
        );
        assert_eq!(r.resolve(Some("")), Some(ResolvedTime::Verbatim(String::new())));
    }

    #[test]
    fn test_reference_timezone_shapes_today() {
        // 2024-05-02 02:00 UTC 在纽约仍是 5 月 1 日
        let r = resolver_at("2024-05-02T02:00:00Z", chrono_tz::America::New_York);
        let at = r.resolve(Some("tonight")).unwrap().timestamp().unwrap();
        assert_eq!(format_timestamp(&at), "2024-05-01T20:00:00-04:00");
    }

    #[test]
    fn test_custom_pattern_rule_appended_after_defaults() {
        fn noon(now: DateTime<Tz>) -> Option<DateTime<Tz>> {
            local_at(now.timezone(), now.date_naive(), 12)
        }
        let r = resolver_at("2024-05-01T08:00:00Z", Tz::UTC)
            .with_rule(TimeRule::pattern("noon", r"\b(noon|lunch)\b", noon).unwrap());

        let at = r.resolve(Some("at LUNCH")).unwrap().timestamp().unwrap();
        assert_eq!(at.hour(), 12);
        assert!(matches!(r.resolve(Some("launch")), Some(ResolvedTime::Verbatim(_))));
    }
}
