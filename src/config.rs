//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `STUDYBEE__*` 覆盖（双下划线表示嵌套，如 `STUDYBEE__CANVAS__TOKEN=...`）。
//! 最后对仍为空的密钥回退到常用环境变量（OPENAI_API_KEY、CANVAS_TOKEN、LMS_* 等）。

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSection,
    pub llm: LlmSection,
    pub canvas: CanvasSection,
    pub browserbase: BrowserbaseSection,
    pub reminders: RemindersSection,
    pub reply: ReplySection,
    pub email: EmailSection,
    pub server: ServerSection,
}

/// [app] 段
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppSection {
    pub name: Option<String>,
}

/// [llm] 段：分类与生成共用的后端
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    /// 后端：openai / mock；未配置 API Key 时自动回退 mock
    pub provider: String,
    pub model: String,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            base_url: None,
            api_key: None,
            timeout_secs: 30,
        }
    }
}

/// [canvas] 段：结构化作业 API（优先数据源）
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CanvasSection {
    /// 如 https://canvas.instructure.com
    pub base_url: Option<String>,
    /// 用户级访问令牌
    pub token: Option<String>,
    pub timeout_secs: u64,
    /// 最多查询的活跃课程数
    pub max_courses: usize,
    /// 每门课程作业列表的分页大小
    pub per_page: usize,
}

impl Default for CanvasSection {
    fn default() -> Self {
        Self {
            base_url: None,
            token: None,
            timeout_secs: 30,
            max_courses: 10,
            per_page: 50,
        }
    }
}

/// [browserbase] 段：自动化浏览器运行器（兜底数据源）
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserbaseSection {
    /// false 时不把该数据源加入回退链
    pub enabled: bool,
    pub api_key: Option<String>,
    pub project_id: Option<String>,
    pub run_endpoint: String,
    /// 驱动完整浏览器会话，超时比其他调用长
    pub timeout_secs: u64,
    pub lms: LmsSection,
}

impl Default for BrowserbaseSection {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            project_id: None,
            run_endpoint: "https://api.browserbase.com/v1/automation/run".to_string(),
            timeout_secs: 120,
            lms: LmsSection::default(),
        }
    }
}

/// [browserbase.lms] 段：脚本所需的登录地址、选择器与凭据，以 process.env.LMS_* 传给脚本
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LmsSection {
    pub login_url: Option<String>,
    pub assignments_url: Option<String>,
    pub user_selector: Option<String>,
    pub pass_selector: Option<String>,
    pub submit_selector: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub item_selector: Option<String>,
    pub title_selector: Option<String>,
    pub due_selector: Option<String>,
    pub link_selector: Option<String>,
    pub course_selector: Option<String>,
}

impl LmsSection {
    fn fields_mut(&mut self) -> [(&'static str, &mut Option<String>); 12] {
        [
            ("LMS_LOGIN_URL", &mut self.login_url),
            ("LMS_ASSIGNMENTS_URL", &mut self.assignments_url),
            ("LMS_USER_SELECTOR", &mut self.user_selector),
            ("LMS_PASS_SELECTOR", &mut self.pass_selector),
            ("LMS_SUBMIT_SELECTOR", &mut self.submit_selector),
            ("LMS_USERNAME", &mut self.username),
            ("LMS_PASSWORD", &mut self.password),
            ("LMS_ASSIGNMENT_ITEM_SEL", &mut self.item_selector),
            ("LMS_ASSIGNMENT_TITLE_SEL", &mut self.title_selector),
            ("LMS_ASSIGNMENT_DUE_SEL", &mut self.due_selector),
            ("LMS_ASSIGNMENT_LINK_SEL", &mut self.link_selector),
            ("LMS_ASSIGNMENT_COURSE_SEL", &mut self.course_selector),
        ]
    }

    /// 转为脚本参数表（键为 LMS_* 变量名）；课程选择器未设置时传空串，其余未设置的键省略
    pub fn to_params(&self) -> BTreeMap<String, String> {
        let mut copy = self.clone();
        let mut params = BTreeMap::new();
        for (name, value) in copy.fields_mut() {
            if let Some(v) = value.take() {
                params.insert(name.to_string(), v);
            }
        }
        params
            .entry("LMS_ASSIGNMENT_COURSE_SEL".to_string())
            .or_default();
        params
    }
}

/// [reminders] 段
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemindersSection {
    /// 时间短语解析的参考时区（IANA 名称）
    pub timezone: String,
    /// 未提供主题时的占位文本
    pub default_subject: String,
}

impl Default for RemindersSection {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            default_subject: "Study session".to_string(),
        }
    }
}

/// [reply] 段
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReplySection {
    /// 合成回复的字符上限
    pub max_chars: usize,
}

impl Default for ReplySection {
    fn default() -> Self {
        Self { max_chars: 600 }
    }
}

/// [email] 段
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct EmailSection {
    pub access_token: Option<String>,
}

/// [server] 段：短信 Webhook 监听地址
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3000".to_string(),
        }
    }
}

impl AppConfig {
    /// 用常用环境变量补齐配置里仍为空的值
    pub fn apply_env_fallbacks(&mut self) {
        self.apply_fallbacks_from(|key| std::env::var(key).ok());
    }

    /// 同 apply_env_fallbacks，但从给定的查找函数读取（便于测试）
    pub fn apply_fallbacks_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let fill = |slot: &mut Option<String>, key: &str| {
            if slot.as_deref().map_or(true, str::is_empty) {
                if let Some(v) = lookup(key).filter(|v| !v.is_empty()) {
                    *slot = Some(v);
                }
            }
        };

        fill(&mut self.llm.api_key, "OPENAI_API_KEY");
        fill(&mut self.canvas.base_url, "CANVAS_BASE_URL");
        fill(&mut self.canvas.token, "CANVAS_TOKEN");
        fill(&mut self.browserbase.api_key, "BROWSERBASE_API_KEY");
        fill(&mut self.browserbase.project_id, "BROWSERBASE_PROJECT_ID");
        fill(&mut self.email.access_token, "GMAIL_ACCESS_TOKEN");
        for (key, slot) in self.browserbase.lms.fields_mut() {
            fill(slot, key);
        }

        if let Some(flag) = lookup("USE_BROWSERBASE") {
            self.browserbase.enabled = flag.eq_ignore_ascii_case("true");
        }
    }
}

/// 从 config 目录加载配置，环境变量 STUDYBEE__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 叠加环境变量 STUDYBEE__*（双下划线表示嵌套键）
/// 4. 用常用环境变量补齐仍为空的密钥
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("STUDYBEE")
            .separator("__")
            .try_parsing(true),
    );

    let mut cfg: AppConfig = builder.build()?.try_deserialize()?;
    cfg.apply_env_fallbacks();
    Ok(cfg)
}
