//! 结构化作业 API 数据源（Canvas 风格 REST 接口）
//!
//! 先列出活跃课程（最多 max_courses 门），再逐门拉取作业；只保留带截止时间的作业。
//! 单门课程的作业请求返回非 2xx 时跳过该课程；课程列表请求失败则整个数据源失败。
//! 未配置 base_url 或 token 时返回空列表。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::config::CanvasSection;
use crate::core::SourceError;
use crate::sources::{classify_body_error, classify_http_error, AssignmentRecord, SourceClient};

#[derive(Debug, Deserialize)]
struct Course {
    id: Value,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WorkItem {
    name: Option<String>,
    due_at: Option<String>,
    html_url: Option<String>,
}

fn course_id(id: &Value) -> Option<String> {
    match id {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

pub struct DirectApiSource {
    client: Client,
    base_url: Option<String>,
    token: Option<String>,
    max_courses: usize,
    per_page: usize,
    timeout_secs: u64,
}

impl DirectApiSource {
    pub fn new(base_url: Option<String>, token: Option<String>, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.filter(|u| !u.is_empty()),
            token: token.filter(|t| !t.is_empty()),
            max_courses: 10,
            per_page: 50,
            timeout_secs,
        }
    }

    pub fn from_config(cfg: &CanvasSection) -> Self {
        Self::new(cfg.base_url.clone(), cfg.token.clone(), cfg.timeout_secs)
            .with_limits(cfg.max_courses, cfg.per_page)
    }

    pub fn with_limits(mut self, max_courses: usize, per_page: usize) -> Self {
        self.max_courses = max_courses;
        self.per_page = per_page;
        self
    }

    async fn get(&self, url: &str, token: &str, query: &[(&str, String)]) -> Result<reqwest::Response, SourceError> {
        self.client
            .get(url)
            .query(query)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| classify_http_error(e, self.timeout_secs))
    }

    async fn course_assignments(
        &self,
        base: &str,
        token: &str,
        course: &Course,
    ) -> Result<Vec<AssignmentRecord>, SourceError> {
        let Some(id) = course_id(&course.id) else {
            return Ok(Vec::new());
        };
        let url = format!("{}/api/v1/courses/{}/assignments", base, id);
        let resp = self
            .get(&url, token, &[("per_page", self.per_page.to_string())])
            .await?;
        if !resp.status().is_success() {
            tracing::debug!(course = %id, status = %resp.status(), "skipping course");
            return Ok(Vec::new());
        }

        let items: Vec<Value> = resp
            .json()
            .await
            .map_err(|e| classify_body_error(e, self.timeout_secs))?;

        Ok(items
            .into_iter()
            .filter_map(|v| serde_json::from_value::<WorkItem>(v).ok())
            .filter_map(|item| {
                let due = item.due_at.filter(|d| !d.trim().is_empty())?;
                AssignmentRecord::new(item.name?, course.name.clone(), Some(due), item.html_url)
            })
            .collect())
    }
}

#[async_trait]
impl SourceClient for DirectApiSource {
    fn name(&self) -> &'static str {
        "canvas"
    }

    async fn fetch(&self) -> Result<Vec<AssignmentRecord>, SourceError> {
        let (Some(base), Some(token)) = (self.base_url.as_deref(), self.token.as_deref()) else {
            return Ok(Vec::new());
        };
        let base = base.trim_end_matches('/');

        let resp = self
            .get(
                &format!("{}/api/v1/courses", base),
                token,
                &[("enrollment_state", "active".to_string())],
            )
            .await?;
        if !resp.status().is_success() {
            return Err(SourceError::Status(resp.status().as_u16()));
        }
        let courses: Vec<Value> = resp
            .json()
            .await
            .map_err(|e| classify_body_error(e, self.timeout_secs))?;

        let mut out = Vec::new();
        for course in courses
            .into_iter()
            .filter_map(|v| serde_json::from_value::<Course>(v).ok())
            .take(self.max_courses)
        {
            out.extend(self.course_assignments(base, token, &course).await?);
        }
        Ok(out)
    }
}
