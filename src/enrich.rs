// ABOUTME: Plan enricher merging model-derived drafts with guaranteed deterministic phase content
// ABOUTME: Owns the first-word task dedup heuristic, insight generation, and progress scoring
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GMRP Coach

//! # Plan Enricher
//!
//! Merges model-produced content with the guaranteed deterministic content
//! tables in [`crate::protocol`]: fiber targets and sources, supplement
//! protocols, meal-prep guidance, anti-inflammatory food lists. Validation
//! findings are folded into the plan as content, never thrown.
//!
//! Task deduplication is deliberately coarse: two tasks are duplicates when
//! the first word of their titles matches case-insensitively. This keeps
//! near-duplicate but differently-worded tasks from cluttering the plan at
//! the cost of occasionally suppressing a legitimately distinct task.

use tracing::debug;

use crate::context::RequestContext;
use crate::extract::{NutritionDraft, WellnessDraft};
use crate::models::{
    DailyTask, FastingSchedule, GmrpPhase, HealthMetrics, Insight, InsightKind, MealPlan,
    NutritionPlan, PlanOrigin, ProgressArea, ProgressAssessment, TaskPriority, UserProfile,
    WellnessPlan,
};
use crate::protocol;
use crate::rules::{SafetyAlert, ValidationReport};

/// Maximum model-derived tasks carried into a plan
const MAX_MODEL_TASKS: usize = 5;

/// Maximum insights per plan
const MAX_INSIGHTS: usize = 3;

/// Sane band for accepting a model-derived fiber target (grams)
const FIBER_ACCEPT_RANGE: std::ops::RangeInclusive<f64> = 20.0..=60.0;

/// Priority assigned to a task by its position in the plan
#[must_use]
pub const fn priority_for_index(index: usize) -> TaskPriority {
    match index {
        0 | 1 => TaskPriority::High,
        2 | 3 => TaskPriority::Medium,
        _ => TaskPriority::Low,
    }
}

/// First word of a title, lowercased, for the dedup heuristic
fn first_word(title: &str) -> String {
    title
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Merge guaranteed tasks into a task list.
///
/// A guaranteed task is appended only when no existing task shares its
/// title's first word (case-insensitive). Merging the same guaranteed list
/// twice is a no-op.
pub fn merge_guaranteed_tasks(tasks: &mut Vec<DailyTask>, guaranteed: &[(&str, &str)]) {
    for (title, category) in guaranteed {
        let key = first_word(title);
        let duplicate = tasks.iter().any(|task| first_word(&task.title) == key);
        if !duplicate {
            let index = tasks.len();
            tasks.push(DailyTask::new(*title, priority_for_index(index), *category));
        }
    }
}

/// Deterministic progress assessment over four metric areas
#[must_use]
pub fn calculate_progress(metrics: &HealthMetrics) -> ProgressAssessment {
    let areas = vec![
        ProgressArea {
            name: "Nutrition".into(),
            score: metrics.adherence_rate.clamp(0.0, 100.0).round() as u32,
            feedback: "Based on meal logging and adherence".into(),
        },
        ProgressArea {
            name: "Sleep".into(),
            score: sleep_score(metrics.sleep_hours),
            feedback: "Quality and duration tracking".into(),
        },
        ProgressArea {
            name: "Energy".into(),
            score: ((metrics.energy_level * 10.0).clamp(0.0, 100.0)).round() as u32,
            feedback: "Self-reported energy levels".into(),
        },
        ProgressArea {
            name: "Digestive Health".into(),
            score: ((metrics.digestive_health * 10.0).clamp(0.0, 100.0)).round() as u32,
            feedback: "Gut health improvements".into(),
        },
    ];

    let total: u32 = areas.iter().map(|a| a.score).sum();
    let current_score = total / areas.len() as u32;
    ProgressAssessment {
        current_score,
        areas,
    }
}

/// Optimal sleep is 7-9 hours; 6-10 is acceptable
fn sleep_score(hours: f64) -> u32 {
    if hours >= 7.0 && hours <= 9.0 {
        100
    } else if hours >= 6.0 && hours <= 10.0 {
        75
    } else {
        40
    }
}

/// Deterministic insights derived from the profile and metrics
#[must_use]
pub fn personalized_insights(profile: &UserProfile, metrics: &HealthMetrics) -> Vec<Insight> {
    let mut insights = Vec::new();

    if profile.current_phase == GmrpPhase::Phase1 {
        insights.push(Insight {
            title: "Microbiome Reset Focus".into(),
            message: "Your gut is adapting to the new nutrition protocol. Some digestive changes \
                      are normal during the first 2-4 weeks."
                .into(),
            action: None,
            kind: InsightKind::Info,
        });
    }

    if metrics.sleep_hours < protocol::thresholds::SLEEP_INSIGHT_HOURS {
        insights.push(Insight {
            title: "Sleep Optimization".into(),
            message: "Improving sleep quality will significantly boost your GMRP results. Aim for \
                      7-9 hours nightly."
                .into(),
            action: Some("View Sleep Tips".into()),
            kind: InsightKind::Warning,
        });
    }

    if metrics.stress_level > protocol::thresholds::STRESS_INSIGHT_LEVEL {
        insights.push(Insight {
            title: "Stress Management".into(),
            message: "High stress levels can impact gut health. Consider adding more mindfulness \
                      practices to your routine."
                .into(),
            action: Some("Try a Behavioral Session".into()),
            kind: InsightKind::Warning,
        });
    }

    if metrics.adherence_rate > protocol::thresholds::ADHERENCE_CELEBRATION_RATE {
        insights.push(Insight {
            title: "Excellent Adherence!".into(),
            message: format!(
                "You're maintaining {:.0}% adherence to your GMRP protocol. Keep up the fantastic \
                 work!",
                metrics.adherence_rate
            ),
            action: None,
            kind: InsightKind::Success,
        });
    }

    insights.truncate(MAX_INSIGHTS);
    insights
}

/// Build a complete wellness plan from a usable draft.
///
/// Model tasks keep their order and get position-based priorities; the
/// guaranteed task list is then merged with first-word dedup. Validation
/// findings become plan content.
#[must_use]
pub fn enrich_wellness_plan(
    ctx: &RequestContext,
    draft: WellnessDraft,
    safety_alerts: Vec<SafetyAlert>,
    report: &ValidationReport,
) -> WellnessPlan {
    let profile = &ctx.profile;
    let phase = profile.current_phase;

    let mut tasks: Vec<DailyTask> = draft
        .daily_tasks
        .map(|s| s.value)
        .unwrap_or_default()
        .into_iter()
        .take(MAX_MODEL_TASKS)
        .enumerate()
        .map(|(index, title)| DailyTask::new(title, priority_for_index(index), "general"))
        .collect();
    merge_guaranteed_tasks(&mut tasks, &protocol::guaranteed_daily_tasks(phase));

    let mut recommendations = draft
        .recommendations
        .map(|s| s.value)
        .unwrap_or_else(|| protocol::guaranteed_recommendations(phase));
    recommendations.extend(report.recommendations.iter().cloned());

    let mut insights = personalized_insights(profile, &ctx.metrics);
    for warning in &report.warnings {
        insights.push(Insight {
            title: "Protocol Check".into(),
            message: warning.clone(),
            action: None,
            kind: InsightKind::Warning,
        });
    }

    let greeting = draft.greeting.map_or_else(
        || {
            format!(
                "Good morning! Welcome to day {} of your GMRP journey!",
                ctx.days_in_program
            )
        },
        |s| s.value,
    );
    let phase_guidance = draft
        .phase_guidance
        .map_or_else(|| protocol::phase_guidance(phase).to_owned(), |s| s.value);
    let next_steps = draft.next_steps.map_or_else(
        || default_next_steps(phase),
        |s| s.value,
    );

    debug!(tasks = tasks.len(), insights = insights.len(), "wellness plan enriched");

    WellnessPlan {
        greeting,
        phase_guidance,
        daily_plan: tasks,
        recommendations,
        next_steps,
        safety_alerts,
        insights,
        progress: calculate_progress(&ctx.metrics),
        origin: PlanOrigin::Generated,
    }
}

/// Default next steps for the phase
#[must_use]
pub fn default_next_steps(phase: GmrpPhase) -> Vec<String> {
    vec![
        format!("Continue {phase} protocols"),
        "Track your progress daily".into(),
        "Prepare for tomorrow's activities".into(),
    ]
}

/// Build a complete nutrition plan from a usable draft.
///
/// The fiber source list, supplement protocol, meal-prep guidance, and
/// education block always come from the guaranteed content table; the
/// model-derived fiber target is accepted only inside a sane band that
/// keeps phase 1 at or above the reset minimum.
#[must_use]
pub fn enrich_nutrition_plan(
    ctx: &RequestContext,
    draft: NutritionDraft,
    safety_alerts: Vec<SafetyAlert>,
    report: &ValidationReport,
) -> NutritionPlan {
    let phase = ctx.profile.current_phase;
    let defaults = protocol::default_meals(phase);

    let meal_plan = MealPlan {
        breakfast: draft.breakfast.map_or(defaults.breakfast, |s| s.value),
        lunch: draft.lunch.map_or(defaults.lunch, |s| s.value),
        dinner: draft.dinner.map_or(defaults.dinner, |s| s.value),
        snacks: draft.snacks.map_or(defaults.snacks, |s| s.value),
    };

    let mut supplement_protocol = protocol::supplement_protocol(phase);
    if let Some(morning) = draft.morning_supplements {
        supplement_protocol.morning = morning.value;
    }
    if let Some(evening) = draft.evening_supplements {
        supplement_protocol.evening = evening.value;
    }

    // Fasting guidance is phase-gated here regardless of what the model
    // produced; a phase 1 draft with fasting content was already flagged by
    // the validator.
    let fasting_schedule = if phase.allows_fasting() {
        match draft.fasting_schedule {
            Some(schedule) => Some(FastingSchedule {
                schedule: schedule.value,
                guidelines: draft
                    .fasting_guidelines
                    .map(|s| s.value)
                    .or_else(|| protocol::fasting_schedule(phase).map(|f| f.guidelines))
                    .unwrap_or_default(),
            }),
            None => protocol::fasting_schedule(phase),
        }
    } else {
        None
    };

    let mut fiber_breakdown = protocol::fiber_breakdown(phase);
    if let Some(target) = draft.fiber_target_grams {
        let grams = target.value;
        let acceptable = FIBER_ACCEPT_RANGE.contains(&grams)
            && (phase != GmrpPhase::Phase1
                || grams >= f64::from(protocol::fiber::PHASE1_MIN_GRAMS));
        if acceptable {
            fiber_breakdown.target_grams = grams.round() as u32;
        }
    }

    let mut recommendations = draft
        .recommendations
        .map(|s| s.value)
        .unwrap_or_else(|| protocol::guaranteed_recommendations(phase));
    recommendations.extend(report.recommendations.iter().cloned());
    recommendations.extend(report.warnings.iter().cloned());

    NutritionPlan {
        meal_plan,
        shopping_list: draft
            .shopping_list
            .map_or_else(default_shopping_list, |s| s.value),
        supplement_protocol,
        fasting_schedule,
        fiber_breakdown,
        weekly_meal_prep: protocol::meal_prep_guide(phase),
        education: protocol::nutrition_education(phase),
        recommendations,
        safety_alerts,
        origin: PlanOrigin::Generated,
    }
}

/// Generic shopping list used when the model produced none
#[must_use]
pub fn default_shopping_list() -> Vec<String> {
    vec![
        "Organic vegetables (variety of colors)".into(),
        "Grass-fed proteins".into(),
        "Wild-caught fish".into(),
        "Nuts and seeds".into(),
        "Whole grains".into(),
        "Fermented foods".into(),
    ]
}
