// ABOUTME: Prompt builder rendering a request context into per-call generation instructions
// ABOUTME: Always embeds the deterministic phase rules as explicit constraints so model drift is detectable
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GMRP Coach

//! # Prompt Builder
//!
//! Pure functions from `(context, content type, override)` to instruction
//! text. The deterministic phase rules (fiber range, fasting policy,
//! supplement protocol) are embedded as explicit constraints in every
//! instruction; the domain rule validator re-checks them independently, so
//! a drifting model cannot violate them undetected.
//!
//! When a professional override is present it is inserted verbatim and
//! takes precedence in the instruction; the validator treats
//! override-driven deviations as informational.

use crate::context::RequestContext;
use crate::models::{ActivitySummary, MealPlan};
use crate::protocol;

/// Coaching text topics generated for the combined daily content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoachingTopic {
    /// Behavioral nutrition coaching
    Nutrition,
    /// Behavioral exercise coaching
    Exercise,
    /// Behavioral mindfulness coaching
    Mindfulness,
}

impl CoachingTopic {
    const fn label(self) -> &'static str {
        match self {
            Self::Nutrition => "nutrition",
            Self::Exercise => "exercise",
            Self::Mindfulness => "mindfulness",
        }
    }
}

fn list_or(values: &[String], fallback: &str) -> String {
    if values.is_empty() {
        fallback.to_owned()
    } else {
        values.join(", ")
    }
}

fn override_line(professional_override: Option<&str>) -> String {
    professional_override.map_or_else(
        || "None - follow standard protocol".to_owned(),
        |text| format!("{text} (takes precedence over standard protocol)"),
    )
}

/// Build the daily wellness plan instruction
#[must_use]
pub fn wellness_plan(ctx: &RequestContext, professional_override: Option<&str>) -> String {
    let profile = &ctx.profile;
    let metrics = &ctx.metrics;
    let phase = profile.current_phase;
    let weight = metrics
        .weight
        .map_or_else(|| "Not provided".to_owned(), |w| format!("{w:.1} kg"));

    format!(
        "ANALYZE USER PROFILE AND PROVIDE GMRP GUIDANCE:\n\
         \n\
         USER PROFILE:\n\
         - Age: {age}, Gender: {gender}\n\
         - Current GMRP Phase: {phase}\n\
         - Days in Program: {days}\n\
         - Health Goals: {goals}\n\
         - Health Conditions: {conditions}\n\
         - Medications: {medications}\n\
         \n\
         CURRENT METRICS:\n\
         - Weight: {weight}\n\
         - Sleep: {sleep:.1} hours\n\
         - Stress Level: {stress:.0}/10\n\
         - Energy Level: {energy:.0}/10\n\
         - Digestive Health: {digestive:.0}/10\n\
         - GMRP Adherence: {adherence:.0}%\n\
         \n\
         PHASE RULES (HARD CONSTRAINTS):\n\
         {rules}\n\
         \n\
         PROFESSIONAL OVERRIDE: {override_line}\n\
         \n\
         PROVIDE a comprehensive response including:\n\
         1. Personalized greeting with encouragement\n\
         2. Today's specific GMRP recommendations for {phase}\n\
         3. Phase-appropriate activities and milestones\n\
         4. Safety considerations and professional consultation needs\n\
         5. Progress assessment and motivation\n\
         6. Next steps for phase advancement\n\
         \n\
         Format as a structured response with clear labeled sections\n\
         (Daily Plan, Recommendations, Next Steps) using dash bullets.",
        age = profile.age,
        gender = profile.gender,
        phase = phase,
        days = ctx.days_in_program,
        goals = list_or(&profile.health_goals, "None reported"),
        conditions = list_or(&profile.health_conditions, "None reported"),
        medications = list_or(&profile.medications, "None reported"),
        weight = weight,
        sleep = metrics.sleep_hours,
        stress = metrics.stress_level,
        energy = metrics.energy_level,
        digestive = metrics.digestive_health,
        adherence = metrics.adherence_rate,
        rules = protocol::phase_requirements(phase),
        override_line = override_line(professional_override),
    )
}

/// Build the nutrition protocol instruction
#[must_use]
pub fn nutrition_plan(
    ctx: &RequestContext,
    dietary_preferences: &[String],
    professional_override: Option<&str>,
) -> String {
    let profile = &ctx.profile;
    let phase = profile.current_phase;
    let fasting_section = if phase.allows_fasting() {
        "Intermittent fasting guidance"
    } else {
        "Meal timing optimization"
    };

    format!(
        "GENERATE GMRP {phase_upper} NUTRITION PROTOCOL:\n\
         \n\
         USER DETAILS:\n\
         - Age: {age}, Activity Level: Moderate\n\
         - Dietary Preferences: {preferences}\n\
         - Allergies/Restrictions: {restrictions}\n\
         - Current Phase: {phase}\n\
         \n\
         GMRP PHASE REQUIREMENTS (HARD CONSTRAINTS):\n\
         {rules}\n\
         - Daily fiber target: {fiber}g\n\
         \n\
         PROFESSIONAL OVERRIDE: {override_line}\n\
         \n\
         PROVIDE DETAILED:\n\
         1. Today's meal suggestions with GMRP compliance\n\
         2. Fiber target breakdown (specific foods)\n\
         3. Anti-inflammatory focus areas\n\
         4. Supplement protocol for this phase\n\
         5. {fasting_section}\n\
         6. Shopping list for next 3 days\n\
         7. Quick meal prep suggestions\n\
         \n\
         Use labeled sections with dash bullets (Breakfast, Lunch, Dinner,\n\
         Snacks, Shopping List, Morning Supplements, Evening Supplements).\n\
         Ensure all recommendations are evidence-based, culturally\n\
         appropriate, and budget-conscious.",
        phase_upper = phase.as_str().to_uppercase(),
        age = profile.age,
        preferences = list_or(dietary_preferences, "None reported"),
        restrictions = list_or(&profile.preferences.dietary, "None reported"),
        phase = phase,
        rules = protocol::phase_requirements(phase),
        fiber = protocol::fiber_target(phase),
        override_line = override_line(professional_override),
    )
}

/// Build the categorized shopping list instruction
#[must_use]
pub fn shopping_list(ctx: &RequestContext, meal_plan: &MealPlan, household_size: u32) -> String {
    let profile = &ctx.profile;
    format!(
        "GENERATE GMRP SHOPPING LIST:\n\
         \n\
         USER PROFILE:\n\
         - Phase: {phase}\n\
         - Dietary Preferences: {dietary}\n\
         - Household Size: {household_size}\n\
         \n\
         MEAL PLAN:\n\
         - Breakfast: {breakfast}\n\
         - Lunch: {lunch}\n\
         - Dinner: {dinner}\n\
         - Snacks: {snacks}\n\
         \n\
         PROVIDE:\n\
         1. Categorized shopping list (Proteins, Vegetables, Fruits, Pantry Staples)\n\
         2. Estimated cost breakdown\n\
         3. Budget-friendly alternatives\n\
         4. Bulk buying recommendations\n\
         5. Storage and prep tips\n\
         \n\
         Use labeled sections with dash bullets. Focus on organic, whole\n\
         foods within budget constraints.",
        phase = profile.current_phase,
        dietary = list_or(&profile.preferences.dietary, "None reported"),
        breakfast = meal_plan.breakfast,
        lunch = meal_plan.lunch,
        dinner = meal_plan.dinner,
        snacks = list_or(&meal_plan.snacks, "None planned"),
    )
}

/// Build the weekly progress assessment instruction
#[must_use]
pub fn progress_assessment(ctx: &RequestContext, recent_activities: &[ActivitySummary]) -> String {
    let profile = &ctx.profile;
    let metrics = &ctx.metrics;
    let activities = if recent_activities.is_empty() {
        "- No activities logged".to_owned()
    } else {
        recent_activities
            .iter()
            .map(|a| format!("- {}: {} ({})", a.kind, a.description, a.date.format("%Y-%m-%d")))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let next_phase = profile
        .current_phase
        .next()
        .map_or_else(|| "maintenance".to_owned(), |p| p.to_string());

    format!(
        "ASSESS GMRP PROGRESS FOR USER:\n\
         \n\
         USER PROFILE:\n\
         - Current Phase: {phase}\n\
         - Next Phase: {next_phase}\n\
         - Days in Program: {days}\n\
         - Health Goals: {goals}\n\
         \n\
         RECENT ACTIVITIES (Last 7 days):\n\
         {activities}\n\
         \n\
         CURRENT METRICS:\n\
         - Sleep Quality: {sleep:.1} hours\n\
         - Energy Level: {energy:.0}/10\n\
         - Digestive Health: {digestive:.0}/10\n\
         - Stress Level: {stress:.0}/10\n\
         \n\
         PROVIDE:\n\
         1. Overall progress score (0-100)\n\
         2. Improvements and Concerns as labeled bullet sections\n\
         3. Recommendations for next week\n\
         4. Readiness: one line on phase advancement readiness\n\
         5. Motivational feedback with concrete achievements\n\
         \n\
         Be encouraging but honest about areas needing attention.",
        phase = profile.current_phase,
        next_phase = next_phase,
        days = ctx.days_in_program,
        goals = list_or(&profile.health_goals, "None reported"),
        activities = activities,
        sleep = metrics.sleep_hours,
        energy = metrics.energy_level,
        digestive = metrics.digestive_health,
        stress = metrics.stress_level,
    )
}

/// Build a behavioral coaching text instruction for one topic
#[must_use]
pub fn coaching_text(ctx: &RequestContext, topic: CoachingTopic) -> String {
    let profile = &ctx.profile;
    format!(
        "You are designing personalized {topic} habits for a GMRP member.\n\
         \n\
         CONTEXT:\n\
         - Phase: {phase}\n\
         - Time: {time}\n\
         - Day: {day}\n\
         - Days in Program: {days}\n\
         \n\
         PHASE RULES (HARD CONSTRAINTS):\n\
         {rules}\n\
         \n\
         Apply these behavioral principles:\n\
         1. Start ridiculously small (2-minute rule)\n\
         2. Remove all friction\n\
         3. Stack with established habits\n\
         4. Create implementation intentions\n\
         5. Protect existing momentum\n\
         \n\
         Write one short coaching paragraph (3-5 sentences) for today's\n\
         {topic} focus. Plain prose, no lists.",
        topic = topic.label(),
        phase = profile.current_phase,
        time = ctx.time_of_day.label(),
        day = ctx.day_of_week,
        days = ctx.days_in_program,
        rules = protocol::phase_requirements(profile.current_phase),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{assemble_at, MetricsDraft, ProfileDraft};
    use crate::models::GmrpPhase;

    fn ctx(phase: &str) -> RequestContext {
        assemble_at(
            ProfileDraft {
                id: Some("u1".into()),
                age: Some(40),
                current_phase: Some(phase.into()),
                ..ProfileDraft::default()
            },
            MetricsDraft::default(),
            "2025-06-04T08:30:00Z".parse().unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_phase_rules_always_embedded() {
        let prompt = wellness_plan(&ctx("phase1"), None);
        assert!(prompt.contains("NO intermittent fasting"));
        assert!(prompt.contains("PROFESSIONAL OVERRIDE: None"));

        let prompt = nutrition_plan(&ctx("phase2"), &[], None);
        assert!(prompt.contains("12:12 IF once weekly"));
        assert!(prompt.contains(&format!(
            "Daily fiber target: {}g",
            crate::protocol::fiber_target(GmrpPhase::Phase2)
        )));
    }

    #[test]
    fn test_override_inserted_verbatim() {
        let prompt = wellness_plan(&ctx("phase1"), Some("Pause all supplements this week"));
        assert!(prompt.contains("Pause all supplements this week"));
        assert!(prompt.contains("takes precedence"));
    }

    #[test]
    fn test_fasting_section_is_phase_gated() {
        assert!(nutrition_plan(&ctx("phase1"), &[], None).contains("Meal timing optimization"));
        assert!(nutrition_plan(&ctx("phase3"), &[], None)
            .contains("Intermittent fasting guidance"));
    }

    #[test]
    fn test_coaching_prompt_carries_context() {
        let prompt = coaching_text(&ctx("phase1"), CoachingTopic::Mindfulness);
        assert!(prompt.contains("mindfulness"));
        assert!(prompt.contains("morning"));
        assert!(prompt.contains("Wednesday"));
    }
}
