// ABOUTME: Behavioral agent combining the deterministic nudge engine with generated coaching texts
// ABOUTME: Coaching texts fan out concurrently; any provider failure leaves that text absent
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GMRP Coach

//! # Behavioral Agent
//!
//! The nudges, habit stacks, and implementation intentions come from the
//! deterministic [`crate::behavioral`] engine and never depend on the
//! model. Coaching texts for the combined daily content are generated as a
//! fan-out of independent awaitables and joined; each failed generation
//! simply leaves its field absent.

use std::sync::Arc;
use tracing::{instrument, warn};

use crate::behavioral as engine;
use crate::config::AgentName;
use crate::context::RequestContext;
use crate::llm::ModelRouter;
use crate::models::{BehavioralContent, BehavioralProfile, CoachingTexts, GmrpPhase, PerformanceSummary};
use crate::prompt_builder::{self, CoachingTopic};

/// Orchestrates behavioral content generation
pub struct BehavioralAgent {
    router: Arc<ModelRouter>,
}

impl BehavioralAgent {
    /// Create an agent over an injected router
    #[must_use]
    pub const fn new(router: Arc<ModelRouter>) -> Self {
        Self { router }
    }

    /// Derive nudges, habit stacks, and implementation intentions.
    ///
    /// Fully deterministic; cannot fail and consults no backend. The caller
    /// supplies the behavioral profile and performance summary (loading
    /// them is the persistence collaborator's concern).
    #[instrument(skip_all, fields(phase = %phase))]
    pub fn generate_behavioral_content(
        &self,
        profile: &BehavioralProfile,
        performance: &PerformanceSummary,
        phase: GmrpPhase,
    ) -> BehavioralContent {
        engine::generate_content(profile, performance, phase)
    }

    /// Generate the three coaching texts concurrently.
    ///
    /// Each topic is an independent awaitable writing to a disjoint field;
    /// ordering between them is irrelevant and a failure leaves the field
    /// absent rather than failing the bundle.
    pub(crate) async fn coaching_texts(&self, ctx: &RequestContext) -> CoachingTexts {
        let (nutrition, exercise, mindfulness) = tokio::join!(
            self.coaching_text(ctx, CoachingTopic::Nutrition),
            self.coaching_text(ctx, CoachingTopic::Exercise),
            self.coaching_text(ctx, CoachingTopic::Mindfulness),
        );
        CoachingTexts {
            nutrition,
            exercise,
            mindfulness,
        }
    }

    async fn coaching_text(&self, ctx: &RequestContext, topic: CoachingTopic) -> Option<String> {
        let prompt = prompt_builder::coaching_text(ctx, topic);
        match self.router.generate(AgentName::Behavioral, &prompt).await {
            Ok(text) => {
                let text = text.trim().to_owned();
                (!text.is_empty()).then_some(text)
            }
            Err(error) => {
                warn!(%error, ?topic, "coaching text generation failed");
                None
            }
        }
    }
}
