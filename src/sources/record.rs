//! 作业记录与解析校验边界
//!
//! 后端返回的松散 JSON 在这里转换为 AssignmentRecord；缺少标题的条目直接丢弃，
//! 空字符串的可选字段规范化为 None。

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 一条作业：标题必填且非空，其余可选；due 可能是 ISO-8601，也可能是页面上的原文
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentRecord {
    title: String,
    course: Option<String>,
    due: Option<String>,
    url: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl AssignmentRecord {
    /// 标题为空或全是空白时返回 None
    pub fn new(
        title: impl Into<String>,
        course: Option<String>,
        due: Option<String>,
        url: Option<String>,
    ) -> Option<Self> {
        let title = non_blank(Some(title.into()))?;
        Some(Self {
            title,
            course: non_blank(course),
            due: non_blank(due),
            url: non_blank(url),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn course(&self) -> Option<&str> {
        self.course.as_deref()
    }

    pub fn due(&self) -> Option<&str> {
        self.due.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

/// 抓取脚本产出的单条条目（字段都可能缺失或为 null）
#[derive(Debug, Default, Deserialize)]
struct ExtractedItem {
    title: Option<String>,
    course: Option<String>,
    due: Option<String>,
    url: Option<String>,
}

/// 把一条未类型化的条目转换为记录；形状不对或缺标题时返回 None
pub fn record_from_extracted(item: Value) -> Option<AssignmentRecord> {
    let item: ExtractedItem = serde_json::from_value(item).ok()?;
    AssignmentRecord::new(item.title?, item.course, item.due, item.url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blank_title_rejected() {
        assert!(AssignmentRecord::new("", None, None, None).is_none());
        assert!(AssignmentRecord::new("   ", Some("ENG101".into()), None, None).is_none());
    }

    #[test]
    fn test_optional_fields_normalized() {
        let r = AssignmentRecord::new(" Essay 1 ", Some(String::new()), Some("Fri".into()), None)
            .unwrap();
        assert_eq!(r.title(), "Essay 1");
        assert_eq!(r.course(), None);
        assert_eq!(r.due(), Some("Fri"));
    }

    #[test]
    fn test_extracted_items_fail_closed() {
        assert!(record_from_extracted(json!({"title": "Lab 2", "due": null})).is_some());
        assert!(record_from_extracted(json!({"title": null, "due": "Mon"})).is_none());
        assert!(record_from_extracted(json!({"due": "Mon"})).is_none());
        assert!(record_from_extracted(json!({"title": 42})).is_none());
        assert!(record_from_extracted(json!("Lab 3")).is_none());
    }
}
