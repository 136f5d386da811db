// ABOUTME: Typed intermediate drafts built by running the strategy chain over raw model output
// ABOUTME: Drafts are partially filled with per-field origin tags and are never exposed to callers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GMRP Coach

use super::{FieldKind, FieldSpec, ResponseExtractor, Sourced};

// ============================================================================
// Field specifications
// ============================================================================

const GREETING: FieldSpec = FieldSpec {
    key: "greeting",
    labels: &["greeting"],
    kind: FieldKind::Text,
};
const PHASE_GUIDANCE: FieldSpec = FieldSpec {
    key: "phaseGuidance",
    labels: &["phase guidance"],
    kind: FieldKind::Text,
};
const DAILY_PLAN: FieldSpec = FieldSpec {
    key: "dailyPlan",
    labels: &["daily plan", "today's plan", "daily tasks"],
    kind: FieldKind::Items,
};
const RECOMMENDATIONS: FieldSpec = FieldSpec {
    key: "recommendations",
    labels: &["recommendations", "suggestions"],
    kind: FieldKind::Items,
};
const NEXT_STEPS: FieldSpec = FieldSpec {
    key: "nextSteps",
    labels: &["next steps"],
    kind: FieldKind::Items,
};

const BREAKFAST: FieldSpec = FieldSpec {
    key: "mealPlan.breakfast",
    labels: &["breakfast"],
    kind: FieldKind::Text,
};
const LUNCH: FieldSpec = FieldSpec {
    key: "mealPlan.lunch",
    labels: &["lunch"],
    kind: FieldKind::Text,
};
const DINNER: FieldSpec = FieldSpec {
    key: "mealPlan.dinner",
    labels: &["dinner"],
    kind: FieldKind::Text,
};
const SNACKS: FieldSpec = FieldSpec {
    key: "mealPlan.snacks",
    labels: &["snacks"],
    kind: FieldKind::Items,
};
const SHOPPING_LIST: FieldSpec = FieldSpec {
    key: "shoppingList",
    labels: &["shopping list"],
    kind: FieldKind::Items,
};
const MORNING_SUPPLEMENTS: FieldSpec = FieldSpec {
    key: "supplementProtocol.morning",
    labels: &["morning supplements"],
    kind: FieldKind::Items,
};
const EVENING_SUPPLEMENTS: FieldSpec = FieldSpec {
    key: "supplementProtocol.evening",
    labels: &["evening supplements"],
    kind: FieldKind::Items,
};
const FASTING_SCHEDULE: FieldSpec = FieldSpec {
    key: "fastingSchedule.schedule",
    labels: &["fasting schedule"],
    kind: FieldKind::Text,
};
const FASTING_GUIDELINES: FieldSpec = FieldSpec {
    key: "fastingSchedule.guidelines",
    labels: &["fasting guidelines"],
    kind: FieldKind::Items,
};
const FIBER_TARGET: FieldSpec = FieldSpec {
    key: "fiberBreakdown.target",
    labels: &["fiber target", "fiber"],
    kind: FieldKind::Grams,
};

const PROTEINS: FieldSpec = FieldSpec {
    key: "categorizedList.proteins",
    labels: &["proteins"],
    kind: FieldKind::Items,
};
const VEGETABLES: FieldSpec = FieldSpec {
    key: "categorizedList.vegetables",
    labels: &["vegetables"],
    kind: FieldKind::Items,
};
const FRUITS: FieldSpec = FieldSpec {
    key: "categorizedList.fruits",
    labels: &["fruits"],
    kind: FieldKind::Items,
};
const PANTRY_STAPLES: FieldSpec = FieldSpec {
    key: "categorizedList.pantryStaples",
    labels: &["pantry staples", "pantry"],
    kind: FieldKind::Items,
};
const ESTIMATED_COST: FieldSpec = FieldSpec {
    key: "estimatedCost",
    labels: &["estimated cost", "total cost", "cost"],
    kind: FieldKind::Dollar,
};
const BUDGET_TIPS: FieldSpec = FieldSpec {
    key: "budgetTips",
    labels: &["budget tips", "budget"],
    kind: FieldKind::Items,
};

const OVERALL_SCORE: FieldSpec = FieldSpec {
    key: "overallScore",
    labels: &["overall progress score", "progress score", "score"],
    kind: FieldKind::Percent,
};
const IMPROVEMENTS: FieldSpec = FieldSpec {
    key: "improvements",
    labels: &["improvements", "achievements", "progress"],
    kind: FieldKind::Items,
};
const CONCERNS: FieldSpec = FieldSpec {
    key: "concerns",
    labels: &["concerns", "challenges", "issues"],
    kind: FieldKind::Items,
};
const READINESS: FieldSpec = FieldSpec {
    key: "readinessAssessment",
    labels: &["readiness"],
    kind: FieldKind::Text,
};

// ============================================================================
// Drafts
// ============================================================================

/// Partially-filled wellness plan pulled from raw model text
#[derive(Debug, Clone, Default)]
pub struct WellnessDraft {
    /// Personalized greeting line
    pub greeting: Option<Sourced<String>>,
    /// Phase guidance line
    pub phase_guidance: Option<Sourced<String>>,
    /// Daily task titles
    pub daily_tasks: Option<Sourced<Vec<String>>>,
    /// Recommendation lines
    pub recommendations: Option<Sourced<Vec<String>>>,
    /// Next-step lines
    pub next_steps: Option<Sourced<Vec<String>>>,
}

impl WellnessDraft {
    /// A draft with no day-level content cannot seed a plan; the
    /// orchestrating agent falls back to guaranteed content instead
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.daily_tasks.is_some() || self.recommendations.is_some()
    }
}

/// Partially-filled nutrition plan pulled from raw model text
#[derive(Debug, Clone, Default)]
pub struct NutritionDraft {
    /// Breakfast suggestion
    pub breakfast: Option<Sourced<String>>,
    /// Lunch suggestion
    pub lunch: Option<Sourced<String>>,
    /// Dinner suggestion
    pub dinner: Option<Sourced<String>>,
    /// Snack suggestions
    pub snacks: Option<Sourced<Vec<String>>>,
    /// Shopping list items
    pub shopping_list: Option<Sourced<Vec<String>>>,
    /// Morning supplement items
    pub morning_supplements: Option<Sourced<Vec<String>>>,
    /// Evening supplement items
    pub evening_supplements: Option<Sourced<Vec<String>>>,
    /// Fasting schedule line
    pub fasting_schedule: Option<Sourced<String>>,
    /// Fasting guideline items
    pub fasting_guidelines: Option<Sourced<Vec<String>>>,
    /// Fiber target in grams
    pub fiber_target_grams: Option<Sourced<f64>>,
    /// Recommendation lines
    pub recommendations: Option<Sourced<Vec<String>>>,
}

impl NutritionDraft {
    /// Whether the draft carries enough to seed a plan
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.breakfast.is_some() || self.lunch.is_some() || self.dinner.is_some()
    }
}

/// Partially-filled categorized shopping list
#[derive(Debug, Clone, Default)]
pub struct ShoppingDraft {
    /// Protein items
    pub proteins: Option<Sourced<Vec<String>>>,
    /// Vegetable items
    pub vegetables: Option<Sourced<Vec<String>>>,
    /// Fruit items
    pub fruits: Option<Sourced<Vec<String>>>,
    /// Pantry staples
    pub pantry_staples: Option<Sourced<Vec<String>>>,
    /// Estimated cost in dollars
    pub estimated_cost: Option<Sourced<f64>>,
    /// Budget tips
    pub budget_tips: Option<Sourced<Vec<String>>>,
}

/// Partially-filled progress review
#[derive(Debug, Clone, Default)]
pub struct ProgressDraft {
    /// Overall score 0-100
    pub overall_score: Option<Sourced<f64>>,
    /// Improvement lines
    pub improvements: Option<Sourced<Vec<String>>>,
    /// Concern lines
    pub concerns: Option<Sourced<Vec<String>>>,
    /// Recommendation lines
    pub recommendations: Option<Sourced<Vec<String>>>,
    /// Readiness line
    pub readiness: Option<Sourced<String>>,
}

// ============================================================================
// Parse functions
// ============================================================================

/// Run the strategy chain over a wellness response
#[must_use]
pub fn parse_wellness_response(raw: &str) -> WellnessDraft {
    let extractor = ResponseExtractor::new();
    WellnessDraft {
        greeting: extractor.text(raw, &GREETING),
        phase_guidance: extractor.text(raw, &PHASE_GUIDANCE),
        daily_tasks: extractor.items(raw, &DAILY_PLAN),
        recommendations: extractor.items(raw, &RECOMMENDATIONS),
        next_steps: extractor.items(raw, &NEXT_STEPS),
    }
}

/// Run the strategy chain over a nutrition response
#[must_use]
pub fn parse_nutrition_response(raw: &str) -> NutritionDraft {
    let extractor = ResponseExtractor::new();
    NutritionDraft {
        breakfast: extractor.text(raw, &BREAKFAST),
        lunch: extractor.text(raw, &LUNCH),
        dinner: extractor.text(raw, &DINNER),
        snacks: extractor.items(raw, &SNACKS),
        shopping_list: extractor.items(raw, &SHOPPING_LIST),
        morning_supplements: extractor.items(raw, &MORNING_SUPPLEMENTS),
        evening_supplements: extractor.items(raw, &EVENING_SUPPLEMENTS),
        fasting_schedule: extractor.text(raw, &FASTING_SCHEDULE),
        fasting_guidelines: extractor.items(raw, &FASTING_GUIDELINES),
        fiber_target_grams: extractor.number(raw, &FIBER_TARGET),
        recommendations: extractor.items(raw, &RECOMMENDATIONS),
    }
}

/// Run the strategy chain over a shopping list response
#[must_use]
pub fn parse_shopping_response(raw: &str) -> ShoppingDraft {
    let extractor = ResponseExtractor::new();
    ShoppingDraft {
        proteins: extractor.items(raw, &PROTEINS),
        vegetables: extractor.items(raw, &VEGETABLES),
        fruits: extractor.items(raw, &FRUITS),
        pantry_staples: extractor.items(raw, &PANTRY_STAPLES),
        estimated_cost: extractor.number(raw, &ESTIMATED_COST),
        budget_tips: extractor.items(raw, &BUDGET_TIPS),
    }
}

/// Run the strategy chain over a progress assessment response
#[must_use]
pub fn parse_progress_response(raw: &str) -> ProgressDraft {
    let extractor = ResponseExtractor::new();
    ProgressDraft {
        overall_score: extractor.number(raw, &OVERALL_SCORE),
        improvements: extractor.items(raw, &IMPROVEMENTS),
        concerns: extractor.items(raw, &CONCERNS),
        recommendations: extractor.items(raw, &RECOMMENDATIONS),
        readiness: extractor.text(raw, &READINESS),
    }
}
