// ABOUTME: Model router mapping logical agent names to configured generation backends
// ABOUTME: Owns no request state; applies the per-call timeout and bounded retry before declaring provider failure
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GMRP Coach

//! # Model Router
//!
//! Routes a logical agent name (wellness / nutrition / behavioral) to its
//! configured text-generation backend. The router is explicitly constructed
//! and dependency-injected rather than a process-wide singleton, so tests
//! can substitute fake backends; the production instance is built once at
//! startup and read-only thereafter.
//!
//! A single provider failure (after the bounded retry below) routes the
//! calling agent to the fallback synthesizer; the router itself never
//! synthesizes content.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, instrument, warn};

use super::{ChatMessage, ChatRequest, GeminiProvider, GroqProvider, LlmProvider};
use crate::config::{AgentName, AgentRegistry, ProviderKind};
use crate::errors::{AppError, AppResult};

/// Hard per-call generation timeout; expiry maps to a provider failure
pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Total attempts per generation call (1 initial + 1 retry)
const MAX_ATTEMPTS: u32 = 2;

/// Backoff before the first retry; doubles per attempt
const INITIAL_BACKOFF: Duration = Duration::from_millis(500);

/// Routes logical agents to generation backends
pub struct ModelRouter {
    registry: AgentRegistry,
    providers: HashMap<ProviderKind, Arc<dyn LlmProvider>>,
}

impl ModelRouter {
    /// Build a router from the environment.
    ///
    /// Constructs a backend for every provider whose credential resolved at
    /// startup. An agent whose provider has no credential stays routable but
    /// unavailable; calls for it fail with a provider error that the
    /// orchestrating agent absorbs via the fallback synthesizer.
    #[must_use]
    pub fn from_env() -> Self {
        let registry = AgentRegistry::from_env();
        Self::new(registry)
    }

    /// Build a router from an already-constructed registry
    #[must_use]
    pub fn new(registry: AgentRegistry) -> Self {
        let mut providers: HashMap<ProviderKind, Arc<dyn LlmProvider>> = HashMap::new();

        if let Some(key) = registry.credential(ProviderKind::Gemini) {
            providers.insert(ProviderKind::Gemini, Arc::new(GeminiProvider::new(key)));
        }
        if let Some(key) = registry.credential(ProviderKind::Groq) {
            providers.insert(ProviderKind::Groq, Arc::new(GroqProvider::new(key.to_owned())));
        }

        info!(backends = providers.len(), "model router initialized");
        Self {
            registry,
            providers,
        }
    }

    /// Inject (or replace) the backend for a provider kind.
    ///
    /// This is the seam tests use to run the full pipeline against a
    /// scripted in-memory backend.
    #[must_use]
    pub fn with_provider(mut self, kind: ProviderKind, provider: Arc<dyn LlmProvider>) -> Self {
        self.providers.insert(kind, provider);
        self
    }

    /// The configuration registry backing this router
    #[must_use]
    pub const fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    /// Whether the agent's backend is available
    #[must_use]
    pub fn is_available(&self, agent: AgentName) -> bool {
        self.providers
            .contains_key(&self.registry.config(agent).provider)
    }

    /// Generate raw text for an agent from a built instruction.
    ///
    /// Applies the configured model, temperature, token budget, and system
    /// instruction for the agent, a hard timeout per attempt, and a bounded
    /// exponential-backoff retry before declaring a provider failure.
    ///
    /// # Errors
    ///
    /// Returns an `AppError` in the provider family when the agent's
    /// backend is unavailable, times out, or keeps failing after retry.
    /// Callers recover via the fallback synthesizer; this error never
    /// reaches the crate boundary.
    #[instrument(skip(self, prompt), fields(agent = %agent))]
    pub async fn generate(&self, agent: AgentName, prompt: &str) -> AppResult<String> {
        let config = self.registry.config(agent);
        let provider = self.providers.get(&config.provider).ok_or_else(|| {
            AppError::service_unavailable(format!(
                "no credential for provider '{}' (agent '{agent}')",
                config.provider
            ))
            .with_agent(agent.as_str())
        })?;

        let request = ChatRequest::new(vec![
            ChatMessage::system(config.system_instruction.clone()),
            ChatMessage::user(prompt),
        ])
        .with_model(config.model.clone())
        .with_temperature(config.temperature)
        .with_max_tokens(config.max_tokens);

        let mut backoff = INITIAL_BACKOFF;
        let mut last_error = None;

        for attempt in 1..=MAX_ATTEMPTS {
            match timeout(GENERATION_TIMEOUT, provider.complete(&request)).await {
                Ok(Ok(response)) => {
                    debug!(
                        attempt,
                        model = %response.model,
                        "generation succeeded"
                    );
                    return Ok(response.content);
                }
                Ok(Err(error)) => {
                    warn!(attempt, %error, "generation attempt failed");
                    last_error = Some(error);
                }
                Err(_) => {
                    warn!(attempt, timeout_secs = GENERATION_TIMEOUT.as_secs(), "generation attempt timed out");
                    last_error = Some(
                        AppError::service_unavailable(format!(
                            "{}: generation timed out after {}s",
                            provider.name(),
                            GENERATION_TIMEOUT.as_secs()
                        ))
                        .with_agent(agent.as_str()),
                    );
                }
            }

            if attempt < MAX_ATTEMPTS {
                sleep(backoff).await;
                backoff *= 2;
            }
        }

        Err(last_error
            .unwrap_or_else(|| AppError::service_unavailable("generation failed with no attempts")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AgentConfig;
    use crate::errors::ErrorCode;
    use crate::llm::{ChatResponse, LlmCapabilities};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct FlakyProvider {
        calls: AtomicU32,
        fail_first: u32,
    }

    #[async_trait]
    impl LlmProvider for FlakyProvider {
        fn name(&self) -> &'static str {
            "flaky"
        }
        fn display_name(&self) -> &'static str {
            "Flaky Test Provider"
        }
        fn capabilities(&self) -> LlmCapabilities {
            LlmCapabilities::text_only()
        }
        fn default_model(&self) -> &str {
            "test-model"
        }
        async fn complete(&self, _request: &ChatRequest) -> Result<ChatResponse, AppError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.fail_first {
                Err(AppError::external_service("flaky", "transient failure"))
            } else {
                Ok(ChatResponse {
                    content: "recovered".into(),
                    model: "test-model".into(),
                    usage: None,
                    finish_reason: Some("stop".into()),
                })
            }
        }
    }

    fn test_router() -> ModelRouter {
        let configs = AgentName::ALL
            .into_iter()
            .map(|agent| {
                (
                    agent,
                    AgentConfig {
                        provider: ProviderKind::Gemini,
                        model: "test-model".into(),
                        temperature: 0.3,
                        max_tokens: 256,
                        system_instruction: "test instruction".into(),
                    },
                )
            })
            .collect();
        let credentials = [
            (ProviderKind::Gemini, None),
            (ProviderKind::Groq, None),
        ]
        .into_iter()
        .collect();
        ModelRouter::new(AgentRegistry::with_configs(configs, credentials))
    }

    #[tokio::test]
    async fn test_missing_backend_is_provider_error() {
        let router = test_router();
        let err = router
            .generate(AgentName::Wellness, "plan my day")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ExternalServiceUnavailable);
    }

    #[tokio::test]
    async fn test_retry_recovers_transient_failure() {
        let router = test_router().with_provider(
            ProviderKind::Gemini,
            Arc::new(FlakyProvider {
                calls: AtomicU32::new(0),
                fail_first: 1,
            }),
        );
        let text = router
            .generate(AgentName::Wellness, "plan my day")
            .await
            .unwrap();
        assert_eq!(text, "recovered");
    }

    #[tokio::test]
    async fn test_persistent_failure_surfaces_provider_error() {
        let router = test_router().with_provider(
            ProviderKind::Gemini,
            Arc::new(FlakyProvider {
                calls: AtomicU32::new(0),
                fail_first: 10,
            }),
        );
        let err = router
            .generate(AgentName::Wellness, "plan my day")
            .await
            .unwrap_err();
        assert!(err.is_provider_error());
    }
}
