// ABOUTME: Groq LLM provider implementation via the OpenAI-compatible chat completions API
// ABOUTME: Fast open-model inference alternative to Gemini, selected via GMRP_LLM_PROVIDER
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GMRP Coach

//! # Groq Provider
//!
//! Implementation of the [`LlmProvider`] trait for Groq's OpenAI-compatible
//! chat completions API. The API key comes from the `GROQ_API_KEY`
//! environment variable, resolved once at startup by the agent registry.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use super::{ChatMessage, ChatRequest, ChatResponse, LlmCapabilities, LlmProvider, TokenUsage};
use crate::errors::{AppError, ErrorCode};

use async_trait::async_trait;

/// Default model to use
const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Base URL for the Groq API
const API_BASE_URL: &str = "https://api.groq.com/openai/v1";

// ============================================================================
// API Request/Response Types (OpenAI-compatible)
// ============================================================================

/// Groq API request structure
#[derive(Debug, Serialize)]
struct GroqRequest {
    model: String,
    messages: Vec<GroqMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// Message structure for the Groq API
#[derive(Debug, Serialize, Deserialize)]
struct GroqMessage {
    role: String,
    content: String,
}

impl From<&ChatMessage> for GroqMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role.as_str().to_owned(),
            content: msg.content.clone(),
        }
    }
}

/// Groq API response structure
#[derive(Debug, Deserialize)]
struct GroqResponse {
    choices: Vec<GroqChoice>,
    usage: Option<GroqUsage>,
    model: Option<String>,
}

/// Response choice
#[derive(Debug, Deserialize)]
struct GroqChoice {
    message: GroqResponseMessage,
    finish_reason: Option<String>,
}

/// Response message content
#[derive(Debug, Deserialize)]
struct GroqResponseMessage {
    content: Option<String>,
}

/// Token usage
#[derive(Debug, Deserialize)]
struct GroqUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

/// Error envelope
#[derive(Debug, Deserialize)]
struct GroqErrorResponse {
    error: GroqErrorDetail,
}

/// Error detail structure
#[derive(Debug, Deserialize)]
struct GroqErrorDetail {
    message: String,
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Groq LLM provider
pub struct GroqProvider {
    api_key: String,
    client: Client,
    default_model: String,
}

impl GroqProvider {
    /// Create a new Groq provider with a resolved API key
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            client: Client::new(),
            default_model: DEFAULT_MODEL.to_owned(),
        }
    }

    /// Set a custom default model
    #[must_use]
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    fn parse_error_response(status: reqwest::StatusCode, body: &str) -> AppError {
        let message = serde_json::from_str::<GroqErrorResponse>(body)
            .map_or_else(|_| body.chars().take(200).collect(), |e| e.error.message);

        let code = match status.as_u16() {
            401 | 403 => ErrorCode::ExternalAuthFailed,
            429 => ErrorCode::ExternalRateLimited,
            500..=599 => ErrorCode::ExternalServiceUnavailable,
            _ => ErrorCode::ExternalServiceError,
        };
        AppError::new(code, format!("groq: HTTP {status}: {message}"))
    }
}

#[async_trait]
impl LlmProvider for GroqProvider {
    fn name(&self) -> &'static str {
        "groq"
    }

    fn display_name(&self) -> &'static str {
        "Groq"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::JSON_MODE | LlmCapabilities::SYSTEM_MESSAGES
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    #[instrument(skip(self, request), fields(model = %request.model.as_deref().unwrap_or(DEFAULT_MODEL)))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let model = request
            .model
            .clone()
            .unwrap_or_else(|| self.default_model.clone());

        let groq_request = GroqRequest {
            model: model.clone(),
            messages: request.messages.iter().map(GroqMessage::from).collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        debug!("sending request to Groq API");

        let response = self
            .client
            .post(format!("{API_BASE_URL}/chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&groq_request)
            .send()
            .await
            .map_err(|e| AppError::service_unavailable(format!("groq: request failed: {e}")))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            AppError::external_service("groq", format!("failed to read response: {e}"))
        })?;

        if !status.is_success() {
            error!(status = %status, "Groq API error");
            return Err(Self::parse_error_response(status, &body));
        }

        let groq_response: GroqResponse = serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, "failed to parse Groq response");
            AppError::external_service("groq", format!("failed to parse response: {e}"))
        })?;

        let choice = groq_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::external_service("groq", "response contained no choices"))?;

        let content = choice
            .message
            .content
            .ok_or_else(|| AppError::external_service("groq", "response message was empty"))?;

        Ok(ChatResponse {
            content,
            model: groq_response.model.unwrap_or(model),
            usage: groq_response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            finish_reason: choice.finish_reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MessageRole;

    #[test]
    fn test_message_conversion_keeps_roles() {
        let msg = ChatMessage::new(MessageRole::System, "instruction");
        let converted = GroqMessage::from(&msg);
        assert_eq!(converted.role, "system");
        assert_eq!(converted.content, "instruction");
    }

    #[test]
    fn test_error_parsing_prefers_api_message() {
        let body = r#"{"error":{"message":"invalid api key"}}"#;
        let err = GroqProvider::parse_error_response(reqwest::StatusCode::UNAUTHORIZED, body);
        assert_eq!(err.code, ErrorCode::ExternalAuthFailed);
        assert!(err.message.contains("invalid api key"));
    }
}
