// ABOUTME: Shared test fixtures - scripted in-memory LLM provider and profile builders
// ABOUTME: Lets integration tests drive the full pipeline without touching the network
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GMRP Coach

// Each integration test binary uses a subset of these helpers
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use gmrp_coach::config::{AgentConfig, AgentName, AgentRegistry, ProviderKind};
use gmrp_coach::context::{MetricsDraft, ProfileDraft};
use gmrp_coach::errors::AppError;
use gmrp_coach::llm::{ChatRequest, ChatResponse, LlmCapabilities, LlmProvider, ModelRouter};

/// A provider that replies from a script: the first entry whose needle
/// appears in the prompt wins, otherwise the default response is returned.
pub struct ScriptedProvider {
    pub scripts: Vec<(&'static str, String)>,
    pub default_response: String,
}

impl ScriptedProvider {
    pub fn canned(response: impl Into<String>) -> Self {
        Self {
            scripts: Vec::new(),
            default_response: response.into(),
        }
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn display_name(&self) -> &'static str {
        "Scripted Test Provider"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::text_only()
    }

    fn default_model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let prompt = request
            .messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let content = self
            .scripts
            .iter()
            .find(|(needle, _)| prompt.contains(needle))
            .map_or_else(|| self.default_response.clone(), |(_, r)| r.clone());
        Ok(ChatResponse {
            content,
            model: "scripted-model".into(),
            usage: None,
            finish_reason: Some("stop".into()),
        })
    }
}

/// A provider that always fails, simulating a backend outage
pub struct FailingProvider;

#[async_trait]
impl LlmProvider for FailingProvider {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn display_name(&self) -> &'static str {
        "Failing Test Provider"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::text_only()
    }

    fn default_model(&self) -> &str {
        "failing-model"
    }

    async fn complete(&self, _request: &ChatRequest) -> Result<ChatResponse, AppError> {
        Err(AppError::external_service("failing", "simulated outage"))
    }
}

/// Registry with all agents on the Gemini provider kind and no credentials;
/// tests inject the backend explicitly.
pub fn test_registry() -> AgentRegistry {
    let configs = AgentName::ALL
        .into_iter()
        .map(|agent| {
            (
                agent,
                AgentConfig {
                    provider: ProviderKind::Gemini,
                    model: "test-model".into(),
                    temperature: 0.3,
                    max_tokens: 1024,
                    system_instruction: format!("You are the {agent} test agent."),
                },
            )
        })
        .collect();
    let credentials = [(ProviderKind::Gemini, None), (ProviderKind::Groq, None)]
        .into_iter()
        .collect();
    AgentRegistry::with_configs(configs, credentials)
}

/// Router backed by an injected provider
pub fn router_with(provider: Arc<dyn LlmProvider>) -> Arc<ModelRouter> {
    Arc::new(ModelRouter::new(test_registry()).with_provider(ProviderKind::Gemini, provider))
}

/// Router with a single canned response for every call
pub fn scripted_router(response: &str) -> Arc<ModelRouter> {
    router_with(Arc::new(ScriptedProvider::canned(response)))
}

/// Router with no backends at all (simulated total outage)
pub fn offline_router() -> Arc<ModelRouter> {
    Arc::new(ModelRouter::new(test_registry()))
}

/// A valid profile draft for the given age and phase
pub fn profile_draft(age: u32, phase: &str) -> ProfileDraft {
    ProfileDraft {
        id: Some("user-1".into()),
        age: Some(age),
        current_phase: Some(phase.into()),
        ..ProfileDraft::default()
    }
}

/// An empty metrics draft (all defaults)
pub fn metrics_draft() -> MetricsDraft {
    MetricsDraft::default()
}
