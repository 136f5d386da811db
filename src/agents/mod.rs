// ABOUTME: Orchestrating agents composing the pipeline into the public operations
// ABOUTME: CoachService fans out wellness, nutrition, and behavioral generation for combined daily content
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GMRP Coach

//! # Orchestrating Agents
//!
//! The three agents compose the leaf components into the public operations:
//! generate wellness plan, generate nutrition plan, generate behavioral
//! content. [`CoachService`] bundles them and offers the combined daily
//! content fan-out: independent generations for the same request are issued
//! concurrently and joined before the result is assembled, since each
//! writes to a disjoint field.

mod behavioral;
mod nutrition;
mod wellness;

pub use behavioral::BehavioralAgent;
pub use nutrition::NutritionAgent;
pub use wellness::WellnessAgent;

use std::sync::Arc;
use tracing::instrument;

use crate::context::{self, MetricsDraft, ProfileDraft};
use crate::errors::AppResult;
use crate::llm::ModelRouter;
use crate::models::{BehavioralProfile, DailyContent, PerformanceSummary};

/// Bundle of the three orchestrating agents over one shared router
pub struct CoachService {
    /// Wellness plan agent
    pub wellness: WellnessAgent,
    /// Nutrition plan agent
    pub nutrition: NutritionAgent,
    /// Behavioral content agent
    pub behavioral: BehavioralAgent,
}

impl CoachService {
    /// Create the service over an injected router
    #[must_use]
    pub fn new(router: Arc<ModelRouter>) -> Self {
        Self {
            wellness: WellnessAgent::new(Arc::clone(&router)),
            nutrition: NutritionAgent::new(Arc::clone(&router)),
            behavioral: BehavioralAgent::new(router),
        }
    }

    /// Create the service from environment configuration
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(Arc::new(ModelRouter::from_env()))
    }

    /// Generate the combined daily content bundle.
    ///
    /// The context is assembled once; the wellness plan, nutrition plan,
    /// and coaching texts are then generated concurrently and joined. The
    /// behavioral artifacts are deterministic and computed inline.
    ///
    /// # Errors
    ///
    /// Returns an error only when the input payloads fail hard validation.
    #[instrument(skip_all)]
    pub async fn generate_daily_content(
        &self,
        profile: ProfileDraft,
        metrics: MetricsDraft,
        behavioral_profile: &BehavioralProfile,
        performance: &PerformanceSummary,
        dietary_preferences: &[String],
        professional_override: Option<&str>,
    ) -> AppResult<DailyContent> {
        let ctx = context::assemble(profile, metrics)?;

        let (wellness, nutrition, coaching) = tokio::join!(
            self.wellness.plan_from_context(&ctx, professional_override),
            self.nutrition
                .plan_from_context(&ctx, dietary_preferences, professional_override),
            self.behavioral.coaching_texts(&ctx),
        );

        let behavioral = self.behavioral.generate_behavioral_content(
            behavioral_profile,
            performance,
            ctx.profile.current_phase,
        );

        Ok(DailyContent {
            wellness,
            nutrition,
            behavioral,
            coaching,
        })
    }
}
