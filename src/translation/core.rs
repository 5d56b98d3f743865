/*!
 * Core translation service implementation.
 *
 * This module contains the translation capability trait, the retry policy,
 * the response normalizer, and the OpenAI-backed `TranslationService` that
 * turns a slice of work items into an id -> translation map.
 */

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, warn};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::app_config::{Config, RetryConfig, TargetLanguage};
use crate::errors::TranslationError;
use crate::providers::openai::{OpenAI, OpenAIRequest};
use crate::providers::Provider;
use crate::work_items::WorkItem;
use super::prompts::{TranslationPromptBuilder, SYSTEM_PROMPT};

/// Log entry for capturing translation process logs
#[derive(Clone)]
pub struct LogEntry {
    pub level: String,
    pub message: String,
}

/// Shared capture buffer for per-run diagnostics
pub type LogCapture = Arc<Mutex<Vec<LogEntry>>>;

/// Result of one translation call: work-item id to translation.
///
/// `Some(text)` is an accepted translation, `None` is an explicit skip by the
/// model. Ids absent from the map were simply not answered.
pub type TranslationMap = HashMap<u32, Option<String>>;

/// Anything that can translate a slice of work items in one call.
///
/// The service below implements this against the OpenAI API; tests implement
/// it with mocks. One call is one model round-trip plus retries; the batch
/// driver decides how items are grouped into calls.
#[async_trait]
pub trait TranslationCapability: Send + Sync {
    /// Translate the given items, returning whatever subset the model
    /// answered for
    async fn translate_items(
        &self,
        items: &[WorkItem],
        log_capture: Option<&LogCapture>,
    ) -> Result<TranslationMap, TranslationError>;
}

/// Exponential backoff policy for translation calls.
///
/// The delay before attempt n (n >= 2) is `base * 2^(n-2)` clamped to
/// `[min, max]`. The first attempt never waits.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Backoff base
    pub base_delay: Duration,
    /// Lower clamp for computed delays
    pub min_delay: Duration,
    /// Upper clamp for computed delays
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(1),
            min_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(20),
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            base_delay: Duration::from_millis(config.base_delay_ms),
            min_delay: Duration::from_millis(config.min_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
        }
    }
}

impl RetryPolicy {
    /// Delay to sleep before `attempt` (1-based). Attempt 1 has no delay.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let exponent = attempt.saturating_sub(2).min(16);
        let delay = self.base_delay.saturating_mul(1u32 << exponent);
        // Not `clamp`: that asserts min <= max, and the bounds come from
        // user-supplied config. The floor applies first, the cap wins.
        delay.max(self.min_delay).min(self.max_delay)
    }

    /// Run `op` until it succeeds or attempts are exhausted.
    ///
    /// Every error is considered transient; the last error is returned when
    /// all attempts fail.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, TranslationError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, TranslationError>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=attempts {
            let delay = self.delay_for(attempt);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    if attempt < attempts {
                        warn!(
                            "Translation attempt {}/{} failed: {}",
                            attempt, attempts, e
                        );
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| TranslationError::malformed("No attempts were made")))
    }
}

/// Salvage pattern: the outermost JSON-array-of-objects substring in a reply
/// that carries prose or code fences around the payload.
static JSON_ARRAY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\[\s*\{.*\}\s*\]").expect("Invalid JSON salvage regex"));

/// Decode a raw model reply into a translation map.
///
/// Accepted shapes, in order: a bare JSON array of objects, an object with a
/// `translations` array, an object with an `items` array. When the reply is
/// not valid JSON, the first array-of-objects substring is extracted and
/// parsed instead. Array elements must be objects with an `id` (string or
/// number) and an optional `translation`; a missing or null translation is an
/// explicit skip. Elements with unusable ids are discarded.
pub fn normalize_response(raw: &str) -> Result<TranslationMap, TranslationError> {
    let parsed: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(_) => {
            let salvaged = JSON_ARRAY_REGEX
                .find(raw)
                .ok_or_else(|| TranslationError::malformed("Response is not JSON"))?;
            serde_json::from_str(salvaged.as_str())
                .map_err(|e| TranslationError::malformed(format!("Salvaged JSON invalid: {}", e)))?
        }
    };

    let entries = match &parsed {
        Value::Array(entries) => entries.as_slice(),
        Value::Object(map) => map
            .get("translations")
            .or_else(|| map.get("items"))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .ok_or_else(|| {
                TranslationError::malformed("Object response has no translations or items array")
            })?,
        _ => {
            return Err(TranslationError::malformed(
                "Response is neither an array nor an object",
            ))
        }
    };

    let mut map = TranslationMap::new();
    for entry in entries {
        let Value::Object(fields) = entry else {
            continue;
        };

        let id = match fields.get("id") {
            Some(Value::String(s)) => s.trim().parse::<u32>().ok(),
            Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            _ => None,
        };
        let Some(id) = id else {
            debug!("Discarding response entry with unusable id: {}", entry);
            continue;
        };

        let translation = match fields.get("translation") {
            Some(Value::String(s)) => Some(s.clone()),
            _ => None,
        };

        map.insert(id, translation);
    }

    Ok(map)
}

/// OpenAI-backed translation service.
///
/// One `translate_items` call builds a prompt for the item slice, performs
/// the chat completion under the retry policy, and normalizes the reply.
pub struct TranslationService {
    /// API client
    client: OpenAI,
    /// Model to request
    model: String,
    /// Language translations are produced in
    target_language: TargetLanguage,
    /// Sampling temperature
    temperature: f32,
    /// Optional domain context passed through to the prompt
    domain_context: Option<String>,
    /// Backoff policy wrapped around each call
    retry: RetryPolicy,
}

impl TranslationService {
    /// Create a service from the application config and a resolved API key
    pub fn new(config: &Config, api_key: String) -> Self {
        Self {
            client: OpenAI::new(
                api_key,
                &config.provider.endpoint,
                &config.provider.model,
                config.provider.timeout_secs,
            ),
            model: config.provider.model.clone(),
            target_language: config.target_language,
            temperature: config.provider.temperature,
            domain_context: config.domain_context.clone(),
            retry: RetryPolicy::from(&config.retry),
        }
    }

    /// Probe the API with a minimal completion. Used before any catalog work
    /// starts so a bad key or endpoint fails the run early.
    pub async fn test_connection(&self) -> Result<(), TranslationError> {
        self.client.test_connection().await?;
        Ok(())
    }

    /// One model round-trip without retries
    async fn call_once(
        &self,
        items: &[WorkItem],
        log_capture: Option<&LogCapture>,
    ) -> Result<TranslationMap, TranslationError> {
        let prompt = TranslationPromptBuilder::new(self.target_language)
            .domain_context(self.domain_context.as_deref())
            .items(items)
            .build_user_prompt();

        let request = OpenAIRequest::new(&self.model)
            .add_message("system", SYSTEM_PROMPT)
            .add_message("user", prompt)
            .temperature(self.temperature);

        let response = self.client.complete(request).await?;
        let raw = OpenAI::extract_text(&response);

        if raw.trim().is_empty() {
            return Err(TranslationError::EmptyResponse);
        }

        match normalize_response(&raw) {
            Ok(map) => Ok(map),
            Err(e) => {
                // Keep the undecodable payload around for the issues log.
                if let Some(log) = log_capture {
                    log.lock().await.push(LogEntry {
                        level: "WARN".to_string(),
                        message: format!("Undecodable model reply: {}", raw),
                    });
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl TranslationCapability for TranslationService {
    async fn translate_items(
        &self,
        items: &[WorkItem],
        log_capture: Option<&LogCapture>,
    ) -> Result<TranslationMap, TranslationError> {
        self.retry
            .run(|attempt| async move {
                if attempt > 1 {
                    debug!("Retrying translation call, attempt {}", attempt);
                }
                self.call_once(items, log_capture).await
            })
            .await
    }
}
