// ABOUTME: Nutrition agent orchestrating meal plan and shopping list generation
// ABOUTME: Same pipeline shape as the wellness agent with nutrition-specific extraction and enrichment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GMRP Coach

//! # Nutrition Agent
//!
//! Generates phase-compliant nutrition plans and categorized shopping
//! lists. The guaranteed content tables back every field, so a provider or
//! extraction failure still yields a complete plan.

use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::config::AgentName;
use crate::context::{self, MetricsDraft, ProfileDraft, RequestContext};
use crate::enrich;
use crate::errors::AppResult;
use crate::extract::{self, NutritionDraft};
use crate::fallback::{self, FallbackTier};
use crate::llm::ModelRouter;
use crate::models::{MealPlan, NutritionPlan, ShoppingList};
use crate::prompt_builder;
use crate::rules::{self, PlanContentView};

/// Orchestrates nutrition plan generation
pub struct NutritionAgent {
    router: Arc<ModelRouter>,
}

impl NutritionAgent {
    /// Create an agent over an injected router
    #[must_use]
    pub const fn new(router: Arc<ModelRouter>) -> Self {
        Self { router }
    }

    /// Generate a phase-compliant nutrition plan.
    ///
    /// # Errors
    ///
    /// Returns an error only when the input payloads fail hard validation.
    #[instrument(skip_all)]
    pub async fn generate_meal_plan(
        &self,
        profile: ProfileDraft,
        dietary_preferences: &[String],
        professional_override: Option<&str>,
    ) -> AppResult<NutritionPlan> {
        let ctx = context::assemble(profile, MetricsDraft::default())?;
        Ok(self
            .plan_from_context(&ctx, dietary_preferences, professional_override)
            .await)
    }

    /// Run the generation pipeline against an assembled context
    pub(crate) async fn plan_from_context(
        &self,
        ctx: &RequestContext,
        dietary_preferences: &[String],
        professional_override: Option<&str>,
    ) -> NutritionPlan {
        let safety_alerts = rules::evaluate_safety_alerts(&ctx.profile, &ctx.metrics);
        let prompt = prompt_builder::nutrition_plan(ctx, dietary_preferences, professional_override);

        match self.router.generate(AgentName::Nutrition, &prompt).await {
            Ok(raw) => {
                let draft = extract::parse_nutrition_response(&raw);
                if draft.is_usable() {
                    let view = draft_content_view(&draft);
                    let report = rules::check_phase_compliance(
                        ctx.profile.current_phase,
                        &view,
                        professional_override.is_some(),
                    );
                    info!(phase = %ctx.profile.current_phase, "nutrition plan generated");
                    enrich::enrich_nutrition_plan(ctx, draft, safety_alerts, &report)
                } else {
                    warn!("model output yielded no usable meal structure");
                    fallback::nutrition_plan(ctx, FallbackTier::PartialExtraction, safety_alerts)
                }
            }
            Err(error) => {
                warn!(%error, "generation failed; degrading to synthesized plan");
                fallback::nutrition_plan(ctx, FallbackTier::ProviderFailure, safety_alerts)
            }
        }
    }

    /// Generate a categorized shopping list for a meal plan.
    ///
    /// Extraction gaps default per category; a provider failure degrades to
    /// the deterministic list.
    ///
    /// # Errors
    ///
    /// Returns an error only on hard input validation failure.
    #[instrument(skip_all)]
    pub async fn generate_shopping_list(
        &self,
        profile: ProfileDraft,
        meal_plan: &MealPlan,
        household_size: u32,
    ) -> AppResult<ShoppingList> {
        let ctx = context::assemble(profile, MetricsDraft::default())?;
        let prompt = prompt_builder::shopping_list(&ctx, meal_plan, household_size.max(1));

        match self.router.generate(AgentName::Nutrition, &prompt).await {
            Ok(raw) => {
                let draft = extract::parse_shopping_response(&raw);
                let defaults = fallback::shopping_list(FallbackTier::PartialExtraction);
                Ok(ShoppingList {
                    proteins: draft.proteins.map_or(defaults.proteins, |s| s.value),
                    vegetables: draft.vegetables.map_or(defaults.vegetables, |s| s.value),
                    fruits: draft.fruits.map_or(defaults.fruits, |s| s.value),
                    pantry_staples: draft
                        .pantry_staples
                        .map_or(defaults.pantry_staples, |s| s.value),
                    estimated_cost: draft
                        .estimated_cost
                        .map_or(defaults.estimated_cost, |s| s.value),
                    budget_tips: draft.budget_tips.map_or(defaults.budget_tips, |s| s.value),
                })
            }
            Err(error) => {
                warn!(%error, "shopping list generation failed");
                Ok(fallback::shopping_list(FallbackTier::ProviderFailure))
            }
        }
    }
}

/// Flatten a nutrition draft for phase-compliance inspection
fn draft_content_view(draft: &NutritionDraft) -> PlanContentView {
    let mut texts = Vec::new();
    for field in [&draft.breakfast, &draft.lunch, &draft.dinner] {
        if let Some(text) = field {
            texts.push(text.value.clone());
        }
    }
    for field in [&draft.snacks, &draft.shopping_list, &draft.recommendations] {
        if let Some(items) = field {
            texts.extend(items.value.iter().cloned());
        }
    }
    PlanContentView {
        texts,
        fiber_target_grams: draft.fiber_target_grams.as_ref().map(|s| s.value.round() as u32),
        has_fasting_schedule: draft.fasting_schedule.is_some(),
    }
}
