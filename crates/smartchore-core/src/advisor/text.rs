//! Text-generation seam for phrased advisories.

use indoc::formatdoc;
use reqwest::Client;
use serde_json::json;
use url::Url;

use super::Advisory;
use crate::assignment::AssignmentResult;
use crate::error::AdvisorError;
use crate::household::DisplayName;

/// An external text generator. Implementations may block; the advisor
/// always calls them from a blocking task under a timeout.
pub trait TextAdvisor: Send + Sync {
    fn suggest(&self, prompt: &str) -> Result<String, AdvisorError>;
}

/// Text advisor backed by a generateContent-style HTTP API.
pub struct HttpTextAdvisor {
    client: Client,
    endpoint: Url,
    model: String,
    api_key: Option<String>,
}

impl HttpTextAdvisor {
    pub fn new(
        endpoint: &str,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<Self, AdvisorError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| AdvisorError::Unavailable(format!("invalid endpoint '{endpoint}': {e}")))?;
        Ok(Self {
            client: Client::new(),
            endpoint,
            model: model.into(),
            api_key,
        })
    }

    /// Build from config, reading the API key from the configured env var.
    pub fn from_config(config: &super::AdvisorConfig) -> Result<Self, AdvisorError> {
        let api_key = std::env::var(&config.api_key_env).ok().filter(|k| !k.is_empty());
        if api_key.is_none() {
            return Err(AdvisorError::Unavailable(format!(
                "environment variable {} is not set",
                config.api_key_env
            )));
        }
        Self::new(&config.endpoint, config.model.clone(), api_key)
    }

    /// `{endpoint}/models/{model}:generateContent`
    fn request_url(&self) -> Result<Url, AdvisorError> {
        let base = self.endpoint.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}/models/{}:generateContent", self.model))
            .map_err(|e| AdvisorError::Unavailable(e.to_string()))
    }
}

impl TextAdvisor for HttpTextAdvisor {
    fn suggest(&self, prompt: &str) -> Result<String, AdvisorError> {
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|e| AdvisorError::Unavailable(e.to_string()))?;

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "temperature": 0.4, "maxOutputTokens": 256 },
        });

        let mut request = self
            .client
            .post(self.request_url()?)
            .header("Content-Type", "application/json")
            .json(&body);
        if let Some(key) = &self.api_key {
            request = request.header("x-goog-api-key", key);
        }

        let resp = handle.block_on(request.send())?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = handle.block_on(resp.text()).unwrap_or_default();
            return Err(AdvisorError::Status { status, body });
        }

        let value: serde_json::Value = handle.block_on(resp.json())?;
        value
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| AdvisorError::MalformedResponse("no candidate text".to_string()))
    }
}

/// Prompt describing the day's split and the rule advisories.
pub fn build_prompt(result: &AssignmentResult, advisories: &[Advisory]) -> String {
    let workloads = result
        .workloads
        .iter()
        .map(|w| format!("- {}: {} min, {} chores", w.display_name, w.total_minutes, w.task_count))
        .collect::<Vec<_>>()
        .join("\n");
    let notes = advisories
        .iter()
        .map(|a| format!("- [{}] {}", a.severity, a.message))
        .collect::<Vec<_>>()
        .join("\n");

    formatdoc! {"
        You help a family share household chores fairly.
        Date: {date}
        Fairness score: {score:.2} ({narrative})

        Workload per member:
        {workloads}

        Current advice:
        {notes}

        Write up to three short, friendly suggestions, one per line.
        Refer to members only by the names listed above.
        ",
        date = result.date,
        score = result.fairness.score,
        narrative = result.fairness.narrative,
    }
}

/// Replace unresolved name placeholders with [`DisplayName::PLACEHOLDER`].
///
/// Catches `{...}` / `${...}` template slots and bare `undefined` / `null`
/// words.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('{') {
        let (before, after) = rest.split_at(open);
        match after.find('}') {
            Some(close) => {
                out.push_str(before.strip_suffix('$').unwrap_or(before));
                out.push_str(DisplayName::PLACEHOLDER);
                rest = &after[close + 1..];
            }
            None => break,
        }
    }
    out.push_str(rest);

    out.split(' ')
        .map(|word| {
            let core = word.trim_matches(|c: char| !c.is_alphanumeric());
            if core == "undefined" || core == "null" {
                word.replacen(core, DisplayName::PLACEHOLDER, 1)
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split a response into at most `max` cleaned, sanitized suggestions.
pub(super) fn split_suggestions(raw: &str, max: usize, max_chars: usize) -> Vec<String> {
    raw.lines()
        .map(|line| {
            line.trim()
                .trim_start_matches(|c: char| c == '-' || c == '*' || c == '•')
                .trim_start_matches(|c: char| c.is_ascii_digit())
                .trim_start_matches(['.', ')'])
                .trim()
        })
        .filter(|line| !line.is_empty())
        .map(|line| truncate(&sanitize(line), max_chars))
        .take(max)
        .collect()
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
