// ABOUTME: Wellness agent orchestrating the daily-plan pipeline end to end
// ABOUTME: Context assembly, prompt build, generation, extraction, validation, enrichment, fallback
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GMRP Coach

//! # Wellness Agent
//!
//! Composes the pipeline stages into the public wellness operations. Only
//! input validation can fail; a provider or extraction failure degrades to
//! a synthesized plan so the caller always receives a usable result.

use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::config::AgentName;
use crate::context::{self, MetricsDraft, ProfileDraft, RequestContext};
use crate::enrich;
use crate::errors::AppResult;
use crate::extract::{self, WellnessDraft};
use crate::fallback::{self, FallbackTier};
use crate::llm::ModelRouter;
use crate::models::{ActivitySummary, ProgressReview, WellnessPlan};
use crate::prompt_builder;
use crate::rules::{self, PlanContentView};

/// Orchestrates wellness plan generation
pub struct WellnessAgent {
    router: Arc<ModelRouter>,
}

impl WellnessAgent {
    /// Create an agent over an injected router
    #[must_use]
    pub const fn new(router: Arc<ModelRouter>) -> Self {
        Self { router }
    }

    /// Generate a personalized daily wellness plan.
    ///
    /// # Errors
    ///
    /// Returns an error only when the input payloads fail hard validation
    /// (missing identity fields, age out of range, unknown phase). Provider
    /// and extraction failures are absorbed into a synthesized plan.
    #[instrument(skip_all, fields(user = tracing::field::Empty))]
    pub async fn generate_personalized_plan(
        &self,
        profile: ProfileDraft,
        metrics: MetricsDraft,
        professional_override: Option<&str>,
    ) -> AppResult<WellnessPlan> {
        let ctx = context::assemble(profile, metrics)?;
        tracing::Span::current().record("user", ctx.profile.id.as_str());
        Ok(self.plan_from_context(&ctx, professional_override).await)
    }

    /// Run the generation pipeline against an assembled context
    pub(crate) async fn plan_from_context(
        &self,
        ctx: &RequestContext,
        professional_override: Option<&str>,
    ) -> WellnessPlan {
        let safety_alerts = rules::evaluate_safety_alerts(&ctx.profile, &ctx.metrics);
        let prompt = prompt_builder::wellness_plan(ctx, professional_override);

        match self.router.generate(AgentName::Wellness, &prompt).await {
            Ok(raw) => {
                let draft = extract::parse_wellness_response(&raw);
                if draft.is_usable() {
                    let view = draft_content_view(&draft);
                    let report = rules::check_phase_compliance(
                        ctx.profile.current_phase,
                        &view,
                        professional_override.is_some(),
                    );
                    info!(phase = %ctx.profile.current_phase, "wellness plan generated");
                    enrich::enrich_wellness_plan(ctx, draft, safety_alerts, &report)
                } else {
                    warn!("model output yielded no usable structure");
                    fallback::wellness_plan(ctx, FallbackTier::PartialExtraction, safety_alerts)
                }
            }
            Err(error) => {
                warn!(%error, "generation failed; degrading to synthesized plan");
                fallback::wellness_plan(ctx, FallbackTier::ProviderFailure, safety_alerts)
            }
        }
    }

    /// Assess weekly progress from recent activity and metrics.
    ///
    /// Extraction gaps default field-by-field; a provider failure degrades
    /// to the deterministic review.
    ///
    /// # Errors
    ///
    /// Returns an error only on hard input validation failure.
    #[instrument(skip_all)]
    pub async fn assess_progress(
        &self,
        profile: ProfileDraft,
        metrics: MetricsDraft,
        recent_activities: &[ActivitySummary],
    ) -> AppResult<ProgressReview> {
        let ctx = context::assemble(profile, metrics)?;
        let prompt = prompt_builder::progress_assessment(&ctx, recent_activities);

        match self.router.generate(AgentName::Wellness, &prompt).await {
            Ok(raw) => {
                let draft = extract::parse_progress_response(&raw);
                Ok(ProgressReview {
                    overall_score: draft
                        .overall_score
                        .map_or(75, |s| s.value.clamp(0.0, 100.0).round() as u32),
                    improvements: draft.improvements.map(|s| s.value).unwrap_or_default(),
                    concerns: draft.concerns.map(|s| s.value).unwrap_or_default(),
                    recommendations: draft
                        .recommendations
                        .map(|s| s.value)
                        .unwrap_or_else(|| vec!["Continue current protocols".into()]),
                    readiness: draft
                        .readiness
                        .map_or_else(|| "Continue current phase".into(), |s| s.value),
                })
            }
            Err(error) => {
                warn!(%error, "progress assessment generation failed");
                Ok(fallback::progress_review(FallbackTier::ProviderFailure))
            }
        }
    }
}

/// Flatten a wellness draft for phase-compliance inspection
fn draft_content_view(draft: &WellnessDraft) -> PlanContentView {
    let mut texts = Vec::new();
    if let Some(tasks) = &draft.daily_tasks {
        texts.extend(tasks.value.iter().cloned());
    }
    for field in [&draft.recommendations, &draft.next_steps] {
        if let Some(items) = field {
            texts.extend(items.value.iter().cloned());
        }
    }
    if let Some(guidance) = &draft.phase_guidance {
        texts.push(guidance.value.clone());
    }
    PlanContentView {
        texts,
        // Wellness plans carry no fiber number; that is the nutrition
        // pipeline's concern
        fiber_target_grams: None,
        has_fasting_schedule: false,
    }
}
