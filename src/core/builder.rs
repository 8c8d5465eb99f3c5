//! 编排器构建器：从配置组装各组件，测试可逐项替换（LLM、数据源、存储、时钟、邮件）

use std::sync::Arc;

use anyhow::anyhow;
use chrono_tz::Tz;

use crate::config::AppConfig;
use crate::core::Orchestrator;
use crate::integrations::{EmailSummarizer, PlaceholderEmailSummarizer};
use crate::llm::{create_llm_from_config, LlmClient};
use crate::reply::ReplyComposer;
use crate::router::IntentClassifier;
use crate::schedule::{Clock, ReminderStore, SystemClock, TimePhraseResolver};
use crate::sources::{AssignmentAggregator, SourceClient};
use crate::store::{AssignmentCache, InMemoryAssignmentCache, InMemoryReminderLog, ReminderLog};

pub struct OrchestratorBuilder {
    config: AppConfig,
    llm: Option<Arc<dyn LlmClient>>,
    sources: Option<Vec<Arc<dyn SourceClient>>>,
    cache: Option<Arc<dyn AssignmentCache>>,
    reminder_log: Option<Arc<dyn ReminderLog>>,
    email: Option<Arc<dyn EmailSummarizer>>,
    clock: Option<Arc<dyn Clock>>,
}

impl OrchestratorBuilder {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            llm: None,
            sources: None,
            cache: None,
            reminder_log: None,
            email: None,
            clock: None,
        }
    }

    /// 分类与生成共用同一个后端
    pub fn with_llm(mut self, llm: Arc<dyn LlmClient>) -> Self {
        self.llm = Some(llm);
        self
    }

    /// 按优先级排列的数据源，替换配置生成的 canvas / browserbase 链
    pub fn with_sources(mut self, sources: Vec<Arc<dyn SourceClient>>) -> Self {
        self.sources = Some(sources);
        self
    }

    pub fn with_cache(mut self, cache: Arc<dyn AssignmentCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_reminder_log(mut self, log: Arc<dyn ReminderLog>) -> Self {
        self.reminder_log = Some(log);
        self
    }

    pub fn with_email(mut self, email: Arc<dyn EmailSummarizer>) -> Self {
        self.email = Some(email);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> anyhow::Result<Orchestrator> {
        let cfg = self.config;
        let tz_name = cfg.reminders.timezone.as_str();
        let tz: Tz = tz_name
            .parse()
            .map_err(|_| anyhow!("unknown timezone: {}", tz_name))?;

        let llm = self.llm.unwrap_or_else(|| create_llm_from_config(&cfg));
        let cache = self
            .cache
            .unwrap_or_else(|| Arc::new(InMemoryAssignmentCache::new()));
        let aggregator = match self.sources {
            Some(sources) => AssignmentAggregator::new(sources, cache),
            None => AssignmentAggregator::from_config(&cfg, cache),
        };

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let log = self
            .reminder_log
            .unwrap_or_else(|| Arc::new(InMemoryReminderLog::new()));
        let reminders = ReminderStore::new(log, TimePhraseResolver::new(tz, clock))
            .with_default_subject(cfg.reminders.default_subject.clone());

        let email = self.email.unwrap_or_else(|| {
            Arc::new(PlaceholderEmailSummarizer::new(cfg.email.access_token.as_deref()))
        });

        Ok(Orchestrator::new(
            IntentClassifier::new(llm.clone()),
            aggregator,
            reminders,
            ReplyComposer::new(llm).with_max_chars(cfg.reply.max_chars),
            email,
        ))
    }
}
