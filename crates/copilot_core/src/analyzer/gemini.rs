//! Google Gemini `generateContent` client.
//!
//! # Invariants
//! - The API key travels in the `x-goog-api-key` header, never in the URL,
//!   so transport errors and logs cannot leak it.
//! - Requests are bounded by the configured client timeout.

use super::{Analyzer, AnalyzerError, AnalyzerResult};
use log::{error, info};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview";

const MAX_ERROR_BODY_CHARS: usize = 300;

/// Live collaborator calling the Gemini REST API.
#[derive(Clone)]
pub struct LiveAnalyzer {
    api_key: String,
    model: String,
    base_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl LiveAnalyzer {
    /// Creates a client for `model` with a request timeout.
    ///
    /// # Errors
    /// - `AnalyzerError::Client` when the HTTP client cannot be built.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> AnalyzerResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(AnalyzerError::Client)?;

        Ok(Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_API_BASE.to_string(),
            client,
        })
    }

    /// Overrides the API base URL (proxies, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

impl Analyzer for LiveAnalyzer {
    fn analyze(&self, prompt: &str) -> AnalyzerResult<String> {
        let started_at = Instant::now();
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let result = self.send(&request);
        match &result {
            Ok(reply) => info!(
                "event=llm_call module=analyzer status=ok model={} duration_ms={} prompt_chars={} reply_chars={}",
                self.model,
                started_at.elapsed().as_millis(),
                prompt.chars().count(),
                reply.chars().count()
            ),
            Err(err) => error!(
                "event=llm_call module=analyzer status=error model={} duration_ms={} error={}",
                self.model,
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    fn kind(&self) -> &'static str {
        "live"
    }
}

impl LiveAnalyzer {
    fn send(&self, request: &GenerateRequest<'_>) -> AnalyzerResult<String> {
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .map_err(AnalyzerError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "failed to read error response".to_string());
            return Err(AnalyzerError::Status {
                status: status.as_u16(),
                body: truncate(&body, MAX_ERROR_BODY_CHARS),
            });
        }

        let body: GenerateResponse = response
            .json()
            .map_err(|err| AnalyzerError::InvalidResponse(err.to_string()))?;

        first_text(body).ok_or(AnalyzerError::EmptyReply)
    }
}

fn first_text(response: GenerateResponse) -> Option<String> {
    response
        .candidates
        .into_iter()
        .filter_map(|candidate| candidate.content)
        .flat_map(|content| content.parts)
        .find_map(|part| part.text)
        .filter(|text| !text.trim().is_empty())
}

fn truncate(value: &str, max_chars: usize) -> String {
    let mut truncated = value.chars().take(max_chars).collect::<String>();
    if value.chars().count() > max_chars {
        truncated.push_str("...");
    }
    truncated
}

#[cfg(test)]
mod tests {
    use super::{first_text, truncate, GenerateResponse};

    #[test]
    fn first_text_skips_candidates_without_content() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"candidates": [{"finishReason": "SAFETY"}, {"content": {"parts": [{"text": "hi"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(first_text(response).as_deref(), Some("hi"));
    }

    #[test]
    fn first_text_is_none_for_blank_reply() {
        let response: GenerateResponse =
            serde_json::from_str(r#"{"candidates": [{"content": {"parts": [{"text": "  "}]}}]}"#)
                .unwrap();
        assert_eq!(first_text(response), None);
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(first_text(response), None);
    }

    #[test]
    fn truncate_caps_long_bodies() {
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("abc", 3), "abc");
    }
}
