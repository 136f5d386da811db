// ABOUTME: Core domain data model for GMRP coaching - profiles, metrics, phases, and generated plans
// ABOUTME: All types are serde-serializable; the phase is a closed enum so phase-gated rules match exhaustively
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GMRP Coach

//! Domain data model for the GMRP coaching engine.
//!
//! Every request owns its own profile, metrics, plan, and report; no
//! cross-request shared mutable state exists in this crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::AppError;
use crate::rules::SafetyAlert;

// ============================================================================
// GMRP Phase
// ============================================================================

/// The three ordered phases of the Gut-Mind Reset Program.
///
/// Phase 1 is the microbiome-reset foundation (no intermittent fasting),
/// phase 2 introduces gentle 12:12 fasting once weekly, phase 3 is flexible
/// long-term maintenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GmrpPhase {
    /// Months 1-3: microbiome reset, nutrient repletion, no fasting
    Phase1,
    /// Months 4-9: habit formation, 12:12 fasting introduced once weekly
    Phase2,
    /// Months 10-18: flexible optimization and long-term sustainability
    Phase3,
}

impl GmrpPhase {
    /// Wire literal for this phase ("phase1", "phase2", "phase3")
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Phase1 => "phase1",
            Self::Phase2 => "phase2",
            Self::Phase3 => "phase3",
        }
    }

    /// The phase that follows this one, if any
    #[must_use]
    pub const fn next(&self) -> Option<Self> {
        match self {
            Self::Phase1 => Some(Self::Phase2),
            Self::Phase2 => Some(Self::Phase3),
            Self::Phase3 => None,
        }
    }

    /// Whether intermittent fasting guidance is part of this phase's protocol
    #[must_use]
    pub const fn allows_fasting(&self) -> bool {
        match self {
            Self::Phase1 => false,
            Self::Phase2 | Self::Phase3 => true,
        }
    }
}

impl fmt::Display for GmrpPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GmrpPhase {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "phase1" => Ok(Self::Phase1),
            "phase2" => Ok(Self::Phase2),
            "phase3" => Ok(Self::Phase3),
            other => Err(AppError::invalid_input(format!(
                "unrecognized GMRP phase '{other}' (expected phase1, phase2, or phase3)"
            ))),
        }
    }
}

// ============================================================================
// User Profile & Metrics
// ============================================================================

/// Dietary, exercise and communication preferences captured at onboarding
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Dietary restrictions and preferences (e.g. "vegetarian", "gluten-free")
    pub dietary: Vec<String>,
    /// Exercise preferences (e.g. "yoga", "strength")
    pub exercise: Vec<String>,
    /// Communication style preference
    pub communication: String,
}

/// A validated user profile.
///
/// Constructed only by the context assembler; age is guaranteed to be within
/// [18, 120] and the phase is one of the three recognized values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Stable user identifier
    pub id: String,
    /// Age in years, within [18, 120]
    pub age: u32,
    /// Self-reported gender
    pub gender: String,
    /// Health goals (e.g. "improve-gut-health")
    pub health_goals: Vec<String>,
    /// Current GMRP phase
    pub current_phase: GmrpPhase,
    /// Program start date
    pub start_date: DateTime<Utc>,
    /// Known health conditions (e.g. "diabetes")
    pub health_conditions: Vec<String>,
    /// Current medications
    pub medications: Vec<String>,
    /// Onboarding preferences
    pub preferences: UserPreferences,
}

impl UserProfile {
    /// Days elapsed since the program start date
    #[must_use]
    pub fn days_in_program(&self, now: DateTime<Utc>) -> i64 {
        (now - self.start_date).num_days().max(0)
    }
}

/// Fully-defaulted health metrics.
///
/// Produced by the context assembler from a partial draft; downstream stages
/// never branch on missing data. Weight has no documented default and stays
/// optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthMetrics {
    /// Body weight in kilograms, if tracked
    pub weight: Option<f64>,
    /// Nightly sleep duration in hours (default 7.0)
    pub sleep_hours: f64,
    /// Stress score 0-10 (default 5.0)
    pub stress_level: f64,
    /// Energy score 0-10 (default 6.0)
    pub energy_level: f64,
    /// Digestive health score 0-10 (default 6.0)
    pub digestive_health: f64,
    /// Protocol adherence rate 0-100 (default 75.0)
    pub adherence_rate: f64,
}

// ============================================================================
// Behavioral Profile
// ============================================================================

/// Primary motivation driver identified at onboarding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotivationType {
    /// Driven by internal goals and identity
    Intrinsic,
    /// Driven by external rewards and accountability
    Extrinsic,
    /// Mixed drivers
    Balanced,
}

/// Preferred tone for behavioral nudges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NudgeStyle {
    /// Soft, encouraging phrasing
    Gentle,
    /// Short, imperative phrasing
    Direct,
    /// Light, gamified phrasing
    Playful,
}

/// How often the user wants reminder nudges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderFrequency {
    /// At most one reminder per day
    Low,
    /// A few reminders per day
    Moderate,
    /// Reminders at every relevant window
    High,
}

/// Coarse time-of-day buckets used for nudge scheduling and context assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    /// Before 07:00
    EarlyMorning,
    /// 07:00-09:59
    Morning,
    /// 10:00-11:59
    LateMorning,
    /// 12:00-14:59
    EarlyAfternoon,
    /// 15:00-17:59
    LateAfternoon,
    /// 18:00-19:59
    EarlyEvening,
    /// 20:00-21:59
    Evening,
    /// 22:00 onward
    Night,
}

impl TimeOfDay {
    /// Bucket a wall-clock hour (0-23)
    #[must_use]
    pub const fn from_hour(hour: u32) -> Self {
        match hour {
            0..=6 => Self::EarlyMorning,
            7..=9 => Self::Morning,
            10..=11 => Self::LateMorning,
            12..=14 => Self::EarlyAfternoon,
            15..=17 => Self::LateAfternoon,
            18..=19 => Self::EarlyEvening,
            20..=21 => Self::Evening,
            _ => Self::Night,
        }
    }

    /// Human-readable label for message templates
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::EarlyMorning => "early morning",
            Self::Morning => "morning",
            Self::LateMorning => "late morning",
            Self::EarlyAfternoon => "early afternoon",
            Self::LateAfternoon => "late afternoon",
            Self::EarlyEvening => "early evening",
            Self::Evening => "evening",
            Self::Night => "night",
        }
    }
}

/// Behavioral-economics profile created at onboarding.
///
/// Sensitivity scales follow their sources: loss aversion is 1-5, the other
/// sensitivities are normalized 0-1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehavioralProfile {
    /// Primary motivation driver
    pub motivation: MotivationType,
    /// Loss-aversion sensitivity, 1.0-5.0 (higher = more loss averse)
    pub loss_aversion: f64,
    /// Present bias, 0.0-1.0 (lower = more present-focused)
    pub present_bias: f64,
    /// Responsiveness to social proof, 0.0-1.0
    pub social_influence: f64,
    /// Responsiveness to gamification, 0.0-1.0
    pub gamification_response: f64,
    /// Ranked best-performance time windows
    pub best_performance_times: Vec<TimeOfDay>,
    /// Desired reminder cadence
    pub reminder_frequency: ReminderFrequency,
    /// Preferred nudge tone
    pub nudge_style: NudgeStyle,
}

// ============================================================================
// Recent Performance Signals
// ============================================================================

/// An active habit streak
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Streak {
    /// What the streak tracks (e.g. "nutrition logging")
    pub kind: String,
    /// Consecutive days
    pub length: u32,
}

/// Completion statistics for one established habit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitStat {
    /// Habit name (e.g. "morning coffee")
    pub name: String,
    /// The routine phrasing used in stacking sentences (e.g. "pour my coffee")
    pub routine: String,
    /// Completion rate over the trailing window, 0.0-1.0
    pub completion_rate: f64,
}

/// A time window where habit completion has historically failed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskWindow {
    /// The failing window
    pub window: TimeOfDay,
    /// The habit that fails there
    pub habit: String,
    /// Failure rate over the trailing window, 0.0-1.0
    pub failure_rate: f64,
}

/// One recent logged activity, provided by the caller for progress review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivitySummary {
    /// Activity kind (e.g. "meal", "exercise", "meditation")
    pub kind: String,
    /// Short description
    pub description: String,
    /// When it happened
    pub date: DateTime<Utc>,
}

/// Summary of recent behavioral performance, assembled by the caller from
/// habit logs (persistence is an external collaborator)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerformanceSummary {
    /// Overall habit completion rate, 0.0-1.0
    pub completion_rate: f64,
    /// 30-day consistency score, 0.0-1.0
    pub consistency: f64,
    /// Active streaks
    pub streaks: Vec<Streak>,
    /// Most reliable established habits
    pub reliable_habits: Vec<HabitStat>,
    /// Historically failing windows
    pub risk_windows: Vec<RiskWindow>,
}

// ============================================================================
// Generated Plans
// ============================================================================

/// Priority of a daily-plan task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Do first
    High,
    /// Do today
    Medium,
    /// Nice to have
    Low,
}

/// A single task in the day-level plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyTask {
    /// Short imperative title
    pub title: String,
    /// Priority tier
    pub priority: TaskPriority,
    /// Task category (e.g. "hydration", "nutrition", "mindfulness")
    pub category: String,
    /// Completion flag, always false at generation time
    pub completed: bool,
    /// Optional behavioral-strategy annotation
    pub behavioral_strategy: Option<String>,
}

impl DailyTask {
    /// Create a pending task with the given priority and category
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        priority: TaskPriority,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            priority,
            category: category.into(),
            completed: false,
            behavioral_strategy: None,
        }
    }
}

/// Kind of a plan insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    /// Neutral information
    Info,
    /// Needs attention
    Warning,
    /// Celebrates progress
    Success,
    /// Actionable suggestion
    Tip,
}

/// A short personalized insight surfaced alongside the plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    /// Headline
    pub title: String,
    /// Body text
    pub message: String,
    /// Optional call-to-action label
    pub action: Option<String>,
    /// Insight kind
    pub kind: InsightKind,
}

/// One scored area inside a progress assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressArea {
    /// Area name
    pub name: String,
    /// Score 0-100
    pub score: u32,
    /// Short feedback line
    pub feedback: String,
}

/// Deterministic progress assessment computed from metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressAssessment {
    /// Overall score 0-100 (mean of areas)
    pub current_score: u32,
    /// Per-area breakdown
    pub areas: Vec<ProgressArea>,
}

/// How a plan was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanOrigin {
    /// Model output survived extraction and validation
    Generated,
    /// Synthesized from guaranteed phase content after a pipeline failure
    Synthesized,
}

/// A complete daily wellness plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WellnessPlan {
    /// Personalized greeting
    pub greeting: String,
    /// Phase-specific guidance paragraph
    pub phase_guidance: String,
    /// Day-level tasks
    pub daily_plan: Vec<DailyTask>,
    /// Free-text recommendations
    pub recommendations: Vec<String>,
    /// Next steps toward phase advancement
    pub next_steps: Vec<String>,
    /// Deterministic rule-derived safety alerts
    pub safety_alerts: Vec<SafetyAlert>,
    /// Personalized insights
    pub insights: Vec<Insight>,
    /// Progress assessment summary
    pub progress: ProgressAssessment,
    /// How this plan was produced
    pub origin: PlanOrigin,
}

/// Meal suggestions for one day
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MealPlan {
    /// Breakfast suggestion
    pub breakfast: String,
    /// Lunch suggestion
    pub lunch: String,
    /// Dinner suggestion
    pub dinner: String,
    /// Snack suggestions
    pub snacks: Vec<String>,
}

/// Supplement protocol for the current phase
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupplementProtocol {
    /// Morning supplements
    pub morning: Vec<String>,
    /// Evening supplements
    pub evening: Vec<String>,
    /// Timing/usage notes
    pub notes: String,
}

/// Intermittent-fasting guidance (absent in phase 1 plans)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FastingSchedule {
    /// Schedule description (e.g. "12:12 once weekly, Wed 7pm-7am")
    pub schedule: String,
    /// Guidelines for fasting windows
    pub guidelines: Vec<String>,
}

/// One example fiber source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiberSource {
    /// Food name
    pub food: String,
    /// Serving size
    pub amount: String,
    /// Fiber grams per serving
    pub fiber_grams: u32,
}

/// Phase-specific daily fiber target with example sources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiberBreakdown {
    /// Daily target in grams
    pub target_grams: u32,
    /// Example sources
    pub sources: Vec<FiberSource>,
}

/// Weekly meal-prep guidance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealPrepGuide {
    /// Suggested prep day
    pub prep_day: String,
    /// Phase-appropriate prep tasks
    pub tasks: Vec<String>,
    /// Storage instructions
    pub storage_instructions: Vec<String>,
}

/// Phase nutrition education block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionEducation {
    /// Goals of the current phase
    pub phase_goals: Vec<String>,
    /// Key nutrients to emphasize
    pub key_nutrients: Vec<String>,
    /// Anti-inflammatory foods to favor
    pub anti_inflammatory_foods: Vec<String>,
}

/// A complete nutrition plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionPlan {
    /// Today's meal suggestions
    pub meal_plan: MealPlan,
    /// Shopping list for the next few days
    pub shopping_list: Vec<String>,
    /// Supplement protocol for this phase
    pub supplement_protocol: SupplementProtocol,
    /// Fasting guidance, absent for phase 1
    pub fasting_schedule: Option<FastingSchedule>,
    /// Guaranteed fiber target and sources
    pub fiber_breakdown: FiberBreakdown,
    /// Weekly meal-prep guidance
    pub weekly_meal_prep: MealPrepGuide,
    /// Phase education block
    pub education: NutritionEducation,
    /// Free-text recommendations
    pub recommendations: Vec<String>,
    /// Deterministic rule-derived safety alerts
    pub safety_alerts: Vec<SafetyAlert>,
    /// How this plan was produced
    pub origin: PlanOrigin,
}

/// Categorized shopping list with budget guidance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingList {
    /// Protein items
    pub proteins: Vec<String>,
    /// Vegetable items
    pub vegetables: Vec<String>,
    /// Fruit items
    pub fruits: Vec<String>,
    /// Pantry staples
    pub pantry_staples: Vec<String>,
    /// Estimated total cost in dollars
    pub estimated_cost: f64,
    /// Budget tips
    pub budget_tips: Vec<String>,
}

/// LLM-backed progress review with deterministic fallback
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReview {
    /// Overall progress score 0-100
    pub overall_score: u32,
    /// Areas of improvement
    pub improvements: Vec<String>,
    /// Areas of concern
    pub concerns: Vec<String>,
    /// Recommendations for the coming week
    pub recommendations: Vec<String>,
    /// Phase-advancement readiness line
    pub readiness: String,
}

// ============================================================================
// Behavioral Content
// ============================================================================

/// Kind of behavioral nudge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NudgeKind {
    /// References community behavior for the user's phase
    SocialProof,
    /// Protects an active streak
    LossAversion,
    /// Scheduled ahead of a historically failing window
    Preventive,
    /// If-this-then-that baseline plan
    ImplementationIntention,
}

/// A scheduled behavioral nudge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Nudge {
    /// Nudge kind
    pub kind: NudgeKind,
    /// Headline
    pub title: String,
    /// Body text
    pub message: String,
    /// Action the nudge asks for
    pub action: String,
    /// Delivery window, if scheduled
    pub scheduled_for: Option<TimeOfDay>,
}

/// A habit-stacking suggestion pairing a new habit to a reliable anchor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitStack {
    /// Existing reliable habit
    pub anchor_habit: String,
    /// New habit to attach
    pub new_habit: String,
    /// "After I X, I will Y" phrasing
    pub stacking_phrase: String,
    /// Estimated success probability, 0.0-1.0
    pub expected_success: f64,
}

/// An if-then behavioral plan for a specific trigger situation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImplementationIntention {
    /// The "if" condition
    pub situation: String,
    /// The "then" action
    pub response: String,
    /// What problem this solves
    pub purpose: String,
}

/// Deterministic behavioral personalization artifacts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehavioralContent {
    /// Ranked nudges, at most `behavioral::MAX_NUDGES`
    pub nudges: Vec<Nudge>,
    /// Top habit-stacking suggestions
    pub habit_stacks: Vec<HabitStack>,
    /// Implementation intentions for common failure points
    pub implementation_intentions: Vec<ImplementationIntention>,
}

/// Coaching texts generated concurrently for the combined daily content
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoachingTexts {
    /// Nutrition coaching paragraph, absent on provider failure
    pub nutrition: Option<String>,
    /// Exercise coaching paragraph, absent on provider failure
    pub exercise: Option<String>,
    /// Mindfulness coaching paragraph, absent on provider failure
    pub mindfulness: Option<String>,
}

/// Combined daily content produced by the fan-out orchestration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyContent {
    /// Daily wellness plan
    pub wellness: WellnessPlan,
    /// Nutrition plan
    pub nutrition: NutritionPlan,
    /// Behavioral artifacts
    pub behavioral: BehavioralContent,
    /// Model-generated coaching texts
    pub coaching: CoachingTexts,
}
