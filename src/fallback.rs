// ABOUTME: Fallback synthesizer producing complete deterministic plans when a pipeline stage fails
// ABOUTME: Single component parameterized by phase and failure tier; never fails itself
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GMRP Coach

//! # Fallback Synthesizer
//!
//! Three-tier degradation, invoked only by the orchestrating agents:
//!
//! 1. **Partial fallback** - generation succeeded but extraction yielded
//!    nothing usable; the plan is synthesized from the guaranteed phase
//!    content table plus a generic greeting.
//! 2. **Provider fallback** - the generation client failed outright; same
//!    synthesis path, with safety alerts still computed by the validator
//!    (which needs no model output).
//! 3. **Validation input fallback** - the context assembler rejected the
//!    input; the only tier that propagates an error to the caller, since no
//!    valid profile exists to synthesize against. That error never reaches
//!    this module.

use std::fmt;
use tracing::warn;

use crate::context::RequestContext;
use crate::enrich::{self, priority_for_index};
use crate::models::{
    DailyTask, Insight, InsightKind, NutritionPlan, PlanOrigin, ProgressReview, ShoppingList,
    WellnessPlan,
};
use crate::protocol;
use crate::rules::SafetyAlert;

/// Which failure routed the request here
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackTier {
    /// Model text arrived but no usable structure could be extracted
    PartialExtraction,
    /// The generation client failed (credential, network, backend error)
    ProviderFailure,
}

impl fmt::Display for FallbackTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PartialExtraction => f.write_str("partial_extraction"),
            Self::ProviderFailure => f.write_str("provider_failure"),
        }
    }
}

/// Synthesize a complete wellness plan from guaranteed phase content
#[must_use]
pub fn wellness_plan(
    ctx: &RequestContext,
    tier: FallbackTier,
    safety_alerts: Vec<SafetyAlert>,
) -> WellnessPlan {
    let phase = ctx.profile.current_phase;
    warn!(%tier, %phase, "synthesizing fallback wellness plan");

    let daily_plan: Vec<DailyTask> = protocol::guaranteed_daily_tasks(phase)
        .into_iter()
        .enumerate()
        .map(|(index, (title, category))| {
            DailyTask::new(title, priority_for_index(index), category)
        })
        .collect();

    let mut insights = vec![Insight {
        title: "GMRP Journey".into(),
        message: format!(
            "You're in {phase} of the Gut-Mind Reset Program. Every day counts!"
        ),
        action: None,
        kind: InsightKind::Info,
    }];
    insights.extend(enrich::personalized_insights(&ctx.profile, &ctx.metrics));
    insights.truncate(3);

    WellnessPlan {
        greeting: format!(
            "Good morning! Welcome to day {} of your GMRP journey!",
            ctx.days_in_program
        ),
        phase_guidance: protocol::phase_guidance(phase).to_owned(),
        daily_plan,
        recommendations: protocol::guaranteed_recommendations(phase),
        next_steps: enrich::default_next_steps(phase),
        safety_alerts,
        insights,
        progress: enrich::calculate_progress(&ctx.metrics),
        origin: PlanOrigin::Synthesized,
    }
}

/// Synthesize a complete nutrition plan from guaranteed phase content
#[must_use]
pub fn nutrition_plan(
    ctx: &RequestContext,
    tier: FallbackTier,
    safety_alerts: Vec<SafetyAlert>,
) -> NutritionPlan {
    let phase = ctx.profile.current_phase;
    warn!(%tier, %phase, "synthesizing fallback nutrition plan");

    NutritionPlan {
        meal_plan: protocol::default_meals(phase),
        shopping_list: enrich::default_shopping_list(),
        supplement_protocol: protocol::supplement_protocol(phase),
        fasting_schedule: protocol::fasting_schedule(phase),
        fiber_breakdown: protocol::fiber_breakdown(phase),
        weekly_meal_prep: protocol::meal_prep_guide(phase),
        education: protocol::nutrition_education(phase),
        recommendations: protocol::guaranteed_recommendations(phase),
        safety_alerts,
        origin: PlanOrigin::Synthesized,
    }
}

/// Synthesize a categorized shopping list
#[must_use]
pub fn shopping_list(tier: FallbackTier) -> ShoppingList {
    warn!(%tier, "synthesizing fallback shopping list");
    ShoppingList {
        proteins: vec![
            "Wild salmon".into(),
            "Organic chicken".into(),
            "Grass-fed beef".into(),
        ],
        vegetables: vec![
            "Organic spinach".into(),
            "Broccoli".into(),
            "Sweet potatoes".into(),
        ],
        fruits: vec!["Berries".into(), "Apples".into(), "Avocados".into()],
        pantry_staples: vec![
            "Quinoa".into(),
            "Chia seeds".into(),
            "Extra virgin olive oil".into(),
        ],
        estimated_cost: 150.0,
        budget_tips: vec![
            "Buy seasonal produce".into(),
            "Purchase proteins in bulk".into(),
            "Use frozen vegetables".into(),
        ],
    }
}

/// Synthesize a progress review when assessment generation fails
#[must_use]
pub fn progress_review(tier: FallbackTier) -> ProgressReview {
    warn!(%tier, "synthesizing fallback progress review");
    ProgressReview {
        overall_score: 75,
        improvements: vec![
            "Maintaining consistent routine".into(),
            "Good hydration habits".into(),
        ],
        concerns: vec!["Need more data for accurate assessment".into()],
        recommendations: vec![
            "Continue current protocols".into(),
            "Track more metrics".into(),
        ],
        readiness: "Continue current phase for more data".into(),
    }
}
