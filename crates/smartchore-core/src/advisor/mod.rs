//! Advisory messages for an assignment result.
//!
//! The rule list is deterministic and always non-empty. A [`TextAdvisor`]
//! may add phrased suggestions on top, but it runs under a timeout with at
//! most one retry and any failure leaves the rule list untouched.

mod rules;
mod text;

pub use text::{build_prompt, sanitize, HttpTextAdvisor, TextAdvisor};

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::assignment::AssignmentResult;
use crate::error::AdvisorError;

/// How urgent an advisory is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Info => "info",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an advisory came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvisorySource {
    Rule,
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advisory {
    pub severity: Severity,
    pub message: String,
    /// Member the message is about, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_id: Option<String>,
    pub source: AdvisorySource,
}

impl Advisory {
    pub fn rule(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            member_id: None,
            source: AdvisorySource::Rule,
        }
    }

    pub fn for_member(mut self, member_id: impl Into<String>) -> Self {
        self.member_id = Some(member_id.into());
        self
    }

    fn text(message: String) -> Self {
        Self {
            severity: Severity::Info,
            message,
            member_id: None,
            source: AdvisorySource::Text,
        }
    }
}

/// Text advisor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// Consult the text advisor at all
    #[serde(default)]
    pub enabled: bool,
    /// Base URL of the generateContent-style API
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Budget for one attempt
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Retries after the first attempt (capped at 1)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Suggestions kept from one response
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
    /// Characters kept per suggestion
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_api_key_env() -> String {
    "SMARTCHORE_ADVISOR_KEY".to_string()
}

fn default_timeout_ms() -> u64 {
    3000
}

fn default_max_retries() -> u32 {
    1
}

fn default_max_suggestions() -> usize {
    3
}

fn default_max_chars() -> usize {
    280
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_endpoint(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
            max_suggestions: default_max_suggestions(),
            max_chars: default_max_chars(),
        }
    }
}

/// Produces advisories for assignment results.
#[derive(Debug, Clone)]
pub struct Advisor {
    config: AdvisorConfig,
    low_availability_rate: f64,
}

impl Default for Advisor {
    fn default() -> Self {
        Self {
            config: AdvisorConfig::default(),
            low_availability_rate: 0.5,
        }
    }
}

impl Advisor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AdvisorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Availability rate below which the day is flagged.
    pub fn with_low_availability_rate(mut self, rate: f64) -> Self {
        self.low_availability_rate = rate;
        self
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    /// Deterministic rule-based advisories. Never empty.
    pub fn advise(&self, result: &AssignmentResult) -> Vec<Advisory> {
        rules::evaluate(result, self.low_availability_rate)
    }

    /// Rule advisories plus text suggestions, if the text advisor answers in time.
    pub async fn advise_with(
        &self,
        result: &AssignmentResult,
        text_advisor: Arc<dyn TextAdvisor>,
    ) -> Vec<Advisory> {
        let mut advisories = self.advise(result);
        let prompt = build_prompt(result, &advisories);

        match self.suggest(text_advisor, prompt).await {
            Ok(raw) => {
                let added = text::split_suggestions(
                    &raw,
                    self.config.max_suggestions,
                    self.config.max_chars,
                );
                tracing::debug!(count = added.len(), "text advisor suggestions");
                advisories.extend(added.into_iter().map(Advisory::text));
            }
            Err(e) => {
                tracing::warn!(error = %e, "text advisor failed; using rule advisories only");
            }
        }
        advisories
    }

    /// One attempt plus at most one retry, each bounded by `timeout_ms`.
    async fn suggest(
        &self,
        text_advisor: Arc<dyn TextAdvisor>,
        prompt: String,
    ) -> Result<String, AdvisorError> {
        let attempts = 1 + self.config.max_retries.min(1);
        let budget = Duration::from_millis(self.config.timeout_ms);
        let mut last_error = AdvisorError::Unavailable("no attempt made".to_string());

        for attempt in 1..=attempts {
            let advisor = Arc::clone(&text_advisor);
            let prompt = prompt.clone();
            let call = tokio::task::spawn_blocking(move || advisor.suggest(&prompt));

            last_error = match tokio::time::timeout(budget, call).await {
                Ok(Ok(Ok(raw))) => return Ok(raw),
                Ok(Ok(Err(e))) => e,
                Ok(Err(join)) => AdvisorError::Unavailable(join.to_string()),
                Err(_) => AdvisorError::Timeout {
                    timeout_ms: self.config.timeout_ms,
                },
            };
            tracing::debug!(attempt, error = %last_error, "text advisor attempt failed");
        }
        Err(last_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::AssignmentEngine;
    use crate::availability::AvailabilitySnapshot;
    use crate::catalog::{CadenceConfig, ChoreCatalog};
    use crate::household::Member;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn result() -> AssignmentResult {
        let date = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
        let chores =
            ChoreCatalog::household_default().instantiate_for(date, &CadenceConfig::default());
        let roster = vec![Member::new("a", "Alice"), Member::new("b", "Bob")];
        AssignmentEngine::new()
            .assign(&chores, &roster, &AvailabilitySnapshot::empty(date))
            .unwrap()
    }

    struct Fixed(&'static str);

    impl TextAdvisor for Fixed {
        fn suggest(&self, _prompt: &str) -> Result<String, AdvisorError> {
            Ok(self.0.to_string())
        }
    }

    struct Failing(AtomicUsize);

    impl TextAdvisor for Failing {
        fn suggest(&self, _prompt: &str) -> Result<String, AdvisorError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err(AdvisorError::Request("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn text_suggestions_are_appended_and_sanitized() {
        let advisor = Advisor::new();
        let rules = advisor.advise(&result());
        let fixed = Fixed("Thank {memberName} for cooking.\nundefined could help too.");
        let all = advisor.advise_with(&result(), Arc::new(fixed)).await;
        assert_eq!(all.len(), rules.len() + 2);
        let texts: Vec<&Advisory> = all
            .iter()
            .filter(|a| a.source == AdvisorySource::Text)
            .collect();
        assert_eq!(texts[0].message, "Thank a member for cooking.");
        assert_eq!(texts[1].message, "a member could help too.");
    }

    #[tokio::test]
    async fn failures_retry_once_then_fall_back() {
        let advisor = Advisor::new();
        let failing = Arc::new(Failing(AtomicUsize::new(0)));
        let all = advisor.advise_with(&result(), failing.clone()).await;
        assert_eq!(failing.0.load(Ordering::SeqCst), 2);
        assert_eq!(all, advisor.advise(&result()));
    }
}
