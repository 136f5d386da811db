// ABOUTME: Per-agent generation configuration and startup credential resolution
// ABOUTME: One configuration record per logical agent; built once per process and read-only thereafter
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GMRP Coach

//! # Agent Configuration
//!
//! Each logical agent (wellness, nutrition, behavioral) maps to a fixed
//! generation configuration: provider, model, temperature, output budget,
//! and system instruction. The registry is built once from the environment
//! at startup; an agent whose provider credential is missing is marked
//! unavailable without stopping the other agents from initializing.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fmt;
use tracing::{info, warn};

use crate::llm::prompts;

/// Logical agent names routed by the model router
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentName {
    /// Daily wellness plan and progress assessment
    Wellness,
    /// Nutrition protocol, meal plans, shopping lists
    Nutrition,
    /// Behavioral coaching texts
    Behavioral,
}

impl AgentName {
    /// All logical agents
    pub const ALL: [Self; 3] = [Self::Wellness, Self::Nutrition, Self::Behavioral];

    /// Lowercase agent identifier
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Wellness => "wellness",
            Self::Nutrition => "nutrition",
            Self::Behavioral => "behavioral",
        }
    }
}

impl fmt::Display for AgentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported generation backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Gemini
    Gemini,
    /// Groq OpenAI-compatible inference
    Groq,
}

impl ProviderKind {
    /// Environment variable selecting the default provider for all agents
    pub const ENV_VAR: &'static str = "GMRP_LLM_PROVIDER";

    /// Environment variable holding this provider's API key
    #[must_use]
    pub const fn credential_env(&self) -> &'static str {
        match self {
            Self::Gemini => "GEMINI_API_KEY",
            Self::Groq => "GROQ_API_KEY",
        }
    }

    /// Provider identifier
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Groq => "groq",
        }
    }

    /// Read the configured provider from `GMRP_LLM_PROVIDER` (default gemini)
    #[must_use]
    pub fn from_env() -> Self {
        match env::var(Self::ENV_VAR).as_deref() {
            Ok("groq") => Self::Groq,
            _ => Self::Gemini,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generation configuration for one logical agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Backend provider
    pub provider: ProviderKind,
    /// Provider-specific model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum output tokens
    pub max_tokens: u32,
    /// Fixed system instruction
    pub system_instruction: String,
}

impl AgentConfig {
    fn for_agent(agent: AgentName, provider: ProviderKind) -> Self {
        let model = match provider {
            ProviderKind::Gemini => "gemini-2.0-flash-exp",
            ProviderKind::Groq => "llama-3.3-70b-versatile",
        };
        match agent {
            AgentName::Wellness => Self {
                provider,
                model: model.into(),
                temperature: 0.3,
                max_tokens: 2048,
                system_instruction: prompts::WELLNESS_SYSTEM_PROMPT.into(),
            },
            AgentName::Nutrition => Self {
                provider,
                model: model.into(),
                temperature: 0.2,
                max_tokens: 3048,
                system_instruction: prompts::NUTRITION_SYSTEM_PROMPT.into(),
            },
            AgentName::Behavioral => Self {
                provider,
                model: model.into(),
                temperature: 0.4,
                max_tokens: 2048,
                system_instruction: prompts::BEHAVIORAL_SYSTEM_PROMPT.into(),
            },
        }
    }
}

/// Read-only registry of agent configurations and resolved credentials.
///
/// Built once at process start; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct AgentRegistry {
    configs: HashMap<AgentName, AgentConfig>,
    credentials: HashMap<ProviderKind, Option<String>>,
}

impl AgentRegistry {
    /// Build the registry from the environment.
    ///
    /// Credentials are resolved from the provider's named environment value.
    /// A missing credential marks the affected agents unavailable but does
    /// not prevent other agents from initializing.
    #[must_use]
    pub fn from_env() -> Self {
        let provider = ProviderKind::from_env();
        info!(provider = %provider, "initializing agent registry");

        let configs: HashMap<AgentName, AgentConfig> = AgentName::ALL
            .into_iter()
            .map(|agent| (agent, AgentConfig::for_agent(agent, provider)))
            .collect();

        let mut credentials = HashMap::new();
        for kind in [ProviderKind::Gemini, ProviderKind::Groq] {
            let credential = env::var(kind.credential_env()).ok();
            if credential.is_none() && kind == provider {
                warn!(
                    provider = %kind,
                    env = kind.credential_env(),
                    "provider credential missing; agents on this provider are unavailable"
                );
            }
            credentials.insert(kind, credential);
        }

        Self {
            configs,
            credentials,
        }
    }

    /// Build a registry with explicit configs and credentials (for tests)
    #[must_use]
    pub fn with_configs(
        configs: HashMap<AgentName, AgentConfig>,
        credentials: HashMap<ProviderKind, Option<String>>,
    ) -> Self {
        Self {
            configs,
            credentials,
        }
    }

    /// Configuration for an agent
    ///
    /// # Panics
    ///
    /// Never panics: the registry always holds all three agents.
    #[must_use]
    pub fn config(&self, agent: AgentName) -> &AgentConfig {
        // Safe: constructor inserts every agent
        #[allow(clippy::unwrap_used)]
        let config = self.configs.get(&agent).unwrap();
        config
    }

    /// Resolved credential for a provider, if present
    #[must_use]
    pub fn credential(&self, provider: ProviderKind) -> Option<&str> {
        self.credentials
            .get(&provider)
            .and_then(Option::as_deref)
    }

    /// Whether the agent's provider has a usable credential
    #[must_use]
    pub fn is_available(&self, agent: AgentName) -> bool {
        self.credential(self.config(agent).provider).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_agent_temperatures_match_roles() {
        let wellness = AgentConfig::for_agent(AgentName::Wellness, ProviderKind::Gemini);
        let nutrition = AgentConfig::for_agent(AgentName::Nutrition, ProviderKind::Gemini);
        let behavioral = AgentConfig::for_agent(AgentName::Behavioral, ProviderKind::Gemini);
        assert!(nutrition.temperature < wellness.temperature);
        assert!(wellness.temperature < behavioral.temperature);
        assert!(nutrition.max_tokens > wellness.max_tokens);
    }

    #[test]
    #[serial]
    fn test_missing_credential_marks_agents_unavailable() {
        std::env::remove_var("GEMINI_API_KEY");
        std::env::remove_var("GROQ_API_KEY");
        std::env::remove_var(ProviderKind::ENV_VAR);
        let registry = AgentRegistry::from_env();
        assert!(!registry.is_available(AgentName::Wellness));
        assert!(registry.config(AgentName::Nutrition).model.contains("gemini"));
    }

    #[test]
    #[serial]
    fn test_registry_resolves_credentials_from_env() {
        std::env::set_var("GEMINI_API_KEY", "test-key");
        std::env::remove_var(ProviderKind::ENV_VAR);
        let registry = AgentRegistry::from_env();
        assert!(registry.is_available(AgentName::Wellness));
        assert_eq!(registry.credential(ProviderKind::Gemini), Some("test-key"));
        std::env::remove_var("GEMINI_API_KEY");
    }

    #[test]
    #[serial]
    fn test_provider_switch_via_env() {
        std::env::set_var(ProviderKind::ENV_VAR, "groq");
        let registry = AgentRegistry::from_env();
        assert_eq!(
            registry.config(AgentName::Wellness).provider,
            ProviderKind::Groq
        );
        std::env::remove_var(ProviderKind::ENV_VAR);
    }
}
