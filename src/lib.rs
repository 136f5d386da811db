// ABOUTME: GMRP Coach - AI-personalized plan generation engine for the Gut-Mind Reset Program
// ABOUTME: Crate root wiring the pipeline modules and re-exporting the public surface
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GMRP Coach

//! # GMRP Coach
//!
//! Personalizes the three-phase Gut-Mind Reset Program by turning a user's
//! profile and health metrics into a structured daily plan, nutrition plan,
//! and behavioral coaching content.
//!
//! The pipeline: context assembly → prompt build → generation → layered
//! extraction → domain rule validation → enrichment with guaranteed phase
//! content. Any stage failure routes to the fallback synthesizer, so the
//! caller always receives a usable plan; only input validation errors cross
//! the crate boundary.
//!
//! ## Example
//!
//! ```rust,no_run
//! use gmrp_coach::agents::CoachService;
//! use gmrp_coach::context::{MetricsDraft, ProfileDraft};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), gmrp_coach::errors::AppError> {
//!     let service = CoachService::from_env();
//!     let profile = ProfileDraft {
//!         id: Some("user-1".into()),
//!         age: Some(34),
//!         current_phase: Some("phase1".into()),
//!         ..ProfileDraft::default()
//!     };
//!     let plan = service
//!         .wellness
//!         .generate_personalized_plan(profile, MetricsDraft::default(), None)
//!         .await?;
//!     println!("{} tasks today", plan.daily_plan.len());
//!     Ok(())
//! }
//! ```

pub mod agents;
pub mod behavioral;
pub mod config;
pub mod context;
pub mod enrich;
pub mod errors;
pub mod extract;
pub mod fallback;
pub mod llm;
pub mod logging;
pub mod models;
pub mod prompt_builder;
pub mod protocol;
pub mod rules;

pub use agents::{BehavioralAgent, CoachService, NutritionAgent, WellnessAgent};
pub use errors::{AppError, AppResult, ErrorCode};
pub use models::{
    BehavioralContent, DailyContent, GmrpPhase, NutritionPlan, WellnessPlan,
};
