use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tokio::time::{timeout, Duration};

use crate::config;
use crate::error::TrackerError;
use crate::generator::json_util;
use crate::generator::{
    explanation_prompt, plan_prompt, plan_system_instruction, ExplanationGenerator, PlanGenerator,
};
use crate::lang::Language;
use crate::plan::model::RawDayPlan;

/// Reusable HTTP client singleton (created once, reused for all requests)
static HTTP_CLIENT: OnceLock<Client> = OnceLock::new();

fn get_http_client() -> &'static Client {
    HTTP_CLIENT.get_or_init(|| {
        Client::builder()
            .tcp_keepalive(Duration::from_secs(30))
            .pool_max_idle_per_host(10)
            .build()
            .expect("Failed to create HTTP client")
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking_config: Option<ThinkingConfig>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl Content {
    fn text(prompt: &str) -> Self {
        Content {
            parts: vec![Part {
                text: prompt.to_string(),
            }],
        }
    }

    fn joined_text(&self) -> String {
        self.parts
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("")
    }
}

/// HTTP adapter for the Gemini `generateContent` API, serving both the
/// plan-generation and explanation ports.
pub struct GeminiGenerator {
    model: String,
    base_url: String,
    timeout: Duration,
    curriculum_days: u32,
    default_target_hours: u32,
}

impl GeminiGenerator {
    pub fn new() -> Self {
        let config = config::get_tracker_config();
        GeminiGenerator {
            model: config.model.clone(),
            base_url: config.api_base_url.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            curriculum_days: config.curriculum_days,
            default_target_hours: config.default_target_hours,
        }
    }

    /// One generateContent round trip, returning the candidate text
    async fn call_model(
        &self,
        prompt: &str,
        system_instruction: Option<&str>,
        json_response: bool,
    ) -> Result<String> {
        let api_key = config::api_key()
            .context("GEMINI_API_KEY is not set; cannot call the generative API")?;

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, api_key
        );

        let request = GenerateContentRequest {
            system_instruction: system_instruction.map(Content::text),
            contents: vec![Content::text(prompt)],
            generation_config: json_response.then(|| GenerationConfig {
                response_mime_type: "application/json",
                thinking_config: Some(ThinkingConfig {
                    thinking_budget: 2048,
                }),
            }),
        };

        let start = std::time::Instant::now();
        let result = timeout(self.timeout, async {
            let response = get_http_client()
                .post(&url)
                .json(&request)
                .send()
                .await
                .with_context(|| format!("Failed to reach the API for model '{}'", self.model))?;

            let status = response.status();
            let body = response
                .text()
                .await
                .with_context(|| format!("Failed to read response from model '{}'", self.model))?;

            if !status.is_success() {
                anyhow::bail!("Model '{}' returned HTTP {}: {}", self.model, status, body);
            }

            let parsed: GenerateContentResponse = serde_json::from_str(&body)
                .with_context(|| format!("Model '{}' returned an unreadable envelope", self.model))?;

            let text = parsed
                .candidates
                .into_iter()
                .next()
                .and_then(|c| c.content)
                .map(|c| c.joined_text())
                .unwrap_or_default();

            if text.trim().is_empty() {
                anyhow::bail!("Model '{}' returned no text payload", self.model);
            }

            Ok(text)
        })
        .await;

        let latency_ms = start.elapsed().as_millis() as u64;
        match result {
            Ok(Ok(text)) => {
                tracing::info!(model = %self.model, latency_ms, success = true, "Model call");
                Ok(text)
            }
            Ok(Err(e)) => {
                tracing::info!(model = %self.model, latency_ms, success = false, "Model call");
                Err(e)
            }
            Err(_) => {
                tracing::error!(
                    model = %self.model,
                    duration_secs = self.timeout.as_secs(),
                    "Timeout exceeded"
                );
                anyhow::bail!(
                    "Model '{}' call timed out after {}s",
                    self.model,
                    self.timeout.as_secs()
                )
            }
        }
    }
}

impl Default for GeminiGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlanGenerator for GeminiGenerator {
    async fn generate(&self, language: Language) -> Result<Vec<RawDayPlan>, TrackerError> {
        let prompt = plan_prompt(language, self.curriculum_days, self.default_target_hours);

        let raw = self
            .call_model(&prompt, Some(plan_system_instruction()), true)
            .await
            .map_err(|e| {
                TrackerError::new(format!("Plan generation failed: {}", e), "generation")
                    .with_model(self.model.clone())
            })?;

        let json = json_util::extract_json(&raw).ok_or_else(|| {
            let mut err = TrackerError::new(
                "Plan generation returned no parsable JSON payload",
                "generation",
            )
            .with_model(self.model.clone());
            if json_util::is_truncated(&raw) {
                err = err.with_context("response appears truncated");
            }
            err
        })?;

        let plan: Vec<RawDayPlan> = serde_json::from_str(&json).map_err(|e| {
            TrackerError::new(format!("Plan schema mismatch: {}", e), "generation")
                .with_model(self.model.clone())
                .with_source("serde_json")
        })?;

        if plan.is_empty() {
            return Err(
                TrackerError::new("Plan generation returned an empty array", "generation")
                    .with_model(self.model.clone()),
            );
        }

        Ok(plan)
    }
}

#[async_trait]
impl ExplanationGenerator for GeminiGenerator {
    async fn explain(
        &self,
        concept: &str,
        day_title: &str,
        language: Language,
    ) -> Result<String, TrackerError> {
        let prompt = explanation_prompt(concept, day_title, language);

        let text = self
            .call_model(&prompt, None, false)
            .await
            .map_err(|e| {
                TrackerError::new(format!("Explanation fetch failed: {}", e), "explanation")
                    .with_model(self.model.clone())
                    .with_context(format!("concept: {}", concept))
            })?;

        Ok(text.trim().to_string())
    }
}
