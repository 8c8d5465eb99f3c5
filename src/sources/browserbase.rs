//! 自动化浏览器数据源：把抓取脚本与参数表提交给远程运行器（Browserbase automation/run）
//!
//! 依赖第三方页面结构，尽力而为：非 2xx 或返回体缺少 result.assignments 时视为空结果而非错误。
//! 传输错误与超时仍以 SourceError 返回，由聚合器同样当作「不可用」处理。

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::config::BrowserbaseSection;
use crate::core::SourceError;
use crate::sources::record::record_from_extracted;
use crate::sources::{classify_body_error, classify_http_error, AssignmentRecord, SourceClient};

/// 登录并抓取作业列表的 Playwright 脚本，参数通过 process.env.LMS_* 读取
pub const LMS_SCRIPT: &str = include_str!("scripts/lms_assignments.js");

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RunRequest<'a> {
    project_id: Option<&'a str>,
    language: &'a str,
    script: &'a str,
    env: &'a BTreeMap<String, String>,
}

pub struct AutomatedBrowsingSource {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    project_id: Option<String>,
    params: BTreeMap<String, String>,
    timeout_secs: u64,
}

impl AutomatedBrowsingSource {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        params: BTreeMap<String, String>,
        timeout_secs: u64,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.filter(|k| !k.is_empty()),
            project_id: None,
            params,
            timeout_secs,
        }
    }

    pub fn from_config(cfg: &BrowserbaseSection) -> Self {
        let mut source = Self::new(
            cfg.run_endpoint.clone(),
            cfg.api_key.clone(),
            cfg.lms.to_params(),
            cfg.timeout_secs,
        );
        source.project_id = cfg.project_id.clone().filter(|p| !p.is_empty());
        source
    }

    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }
}

/// 取出 result.assignments 并逐条校验；形状不对时返回空列表
fn parse_run_result(body: &Value) -> Vec<AssignmentRecord> {
    let Some(items) = body
        .get("result")
        .and_then(|r| r.get("assignments"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };
    items
        .iter()
        .cloned()
        .filter_map(record_from_extracted)
        .collect()
}

#[async_trait]
impl SourceClient for AutomatedBrowsingSource {
    fn name(&self) -> &'static str {
        "browserbase"
    }

    async fn fetch(&self) -> Result<Vec<AssignmentRecord>, SourceError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(Vec::new());
        };

        let request = RunRequest {
            project_id: self.project_id.as_deref(),
            language: "javascript",
            script: LMS_SCRIPT,
            env: &self.params,
        };
        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| classify_http_error(e, self.timeout_secs))?;

        if !resp.status().is_success() {
            tracing::debug!(status = %resp.status(), "automation run rejected");
            return Ok(Vec::new());
        }

        let body = match resp.json::<Value>().await {
            Ok(body) => body,
            Err(e) => match classify_body_error(e, self.timeout_secs) {
                timeout @ SourceError::Timeout(_) => return Err(timeout),
                other => {
                    tracing::debug!("automation run returned unreadable body: {}", other);
                    return Ok(Vec::new());
                }
            },
        };
        Ok(parse_run_result(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;
    use std::io::Write;

    fn params() -> BTreeMap<String, String> {
        [("LMS_LOGIN_URL".to_string(), "https://lms.example.edu/login".to_string())]
            .into_iter()
            .collect()
    }

    #[tokio::test]
    async fn test_run_drops_untitled_items() {
        let mut server = mockito::Server::new_async().await;
        let run = server
            .mock("POST", "/run")
            .match_header("authorization", "Bearer bb-key")
            .match_body(Matcher::PartialJson(json!({
                "projectId": "proj-1",
                "language": "javascript",
                "env": {"LMS_LOGIN_URL": "https://lms.example.edu/login"}
            })))
            .with_status(200)
            .with_body(
                json!({"result": {"assignments": [
                    {"title": "Lab 2", "due": "Mon 9am", "url": "/a/2", "course": "CHEM"},
                    {"title": "", "due": "Tue"},
                    {"title": null},
                    {"due": "Wed"},
                ]}})
                .to_string(),
            )
            .create_async()
            .await;

        let source = AutomatedBrowsingSource::new(
            format!("{}/run", server.url()),
            Some("bb-key".into()),
            params(),
            5,
        )
        .with_project_id("proj-1");
        let records = source.fetch().await.unwrap();

        run.assert_async().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title(), "Lab 2");
        assert_eq!(records[0].due(), Some("Mon 9am"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_empty_not_error() {
        let mut server = mockito::Server::new_async().await;
        let _run = server
            .mock("POST", "/run")
            .with_status(502)
            .create_async()
            .await;

        let source =
            AutomatedBrowsingSource::new(format!("{}/run", server.url()), Some("k".into()), params(), 5);
        assert!(source.fetch().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unexpected_shape_is_empty() {
        let mut server = mockito::Server::new_async().await;
        let _run = server
            .mock("POST", "/run")
            .with_status(200)
            .with_body(json!({"logs": ["done"], "result": null}).to_string())
            .create_async()
            .await;

        let source =
            AutomatedBrowsingSource::new(format!("{}/run", server.url()), Some("k".into()), params(), 5);
        assert!(source.fetch().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_slow_run_body_is_a_timeout_not_empty() {
        let mut server = mockito::Server::new_async().await;
        let _run = server
            .mock("POST", "/run")
            .with_status(200)
            .with_chunked_body(|w| {
                std::thread::sleep(Duration::from_secs(3));
                w.write_all(b"{}")
            })
            .create_async()
            .await;

        let source =
            AutomatedBrowsingSource::new(format!("{}/run", server.url()), Some("k".into()), params(), 1);
        let result = source.fetch().await;
        assert!(matches!(result, Err(SourceError::Timeout(1))), "got {:?}", result);
    }

    #[tokio::test]
    async fn test_missing_api_key_skips_call() {
        let source = AutomatedBrowsingSource::new("http://127.0.0.1:9/run", None, params(), 5);
        assert!(source.fetch().await.unwrap().is_empty());
    }

    #[test]
    fn test_script_reads_lms_env() {
        assert!(LMS_SCRIPT.contains("process.env.LMS_ASSIGNMENT_ITEM_SEL"));
        assert!(LMS_SCRIPT.contains("assignments: items"));
    }
}
