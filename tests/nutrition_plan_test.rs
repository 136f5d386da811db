// ABOUTME: End-to-end nutrition plan generation tests against a scripted backend
// ABOUTME: Covers fiber guarantees, fasting phase gating, supplement enrichment, and shopping lists
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GMRP Coach

mod common;

use common::{offline_router, profile_draft, scripted_router};
use gmrp_coach::agents::NutritionAgent;
use gmrp_coach::models::{GmrpPhase, MealPlan, PlanOrigin};
use gmrp_coach::protocol;

const GOOD_RESPONSE: &str = "\
Breakfast: Chia pudding with blueberries
Lunch: Rainbow salad with grilled chicken
Dinner: Baked salmon with roasted broccoli

Snacks:
- Apple with almond butter
- Carrot sticks with hummus

Shopping List:
- Chia seeds
- Blueberries
- Salmon fillets

Morning Supplements:
- Probiotic
- Vitamin D3

Evening Supplements:
- Magnesium glycinate

Aim for a fiber target of 42g today.
";

#[tokio::test]
async fn generated_nutrition_plan_keeps_model_meals() {
    let agent = NutritionAgent::new(scripted_router(GOOD_RESPONSE));
    let plan = agent
        .generate_meal_plan(profile_draft(34, "phase1"), &[], None)
        .await
        .unwrap();

    assert_eq!(plan.origin, PlanOrigin::Generated);
    assert_eq!(plan.meal_plan.breakfast, "Chia pudding with blueberries");
    assert_eq!(plan.meal_plan.snacks.len(), 2);
    assert_eq!(plan.shopping_list, vec!["Chia seeds", "Blueberries", "Salmon fillets"]);
    assert_eq!(plan.supplement_protocol.morning, vec!["Probiotic", "Vitamin D3"]);
    // Model target 42g accepted (within band, above phase 1 minimum)
    assert_eq!(plan.fiber_breakdown.target_grams, 42);
    // Guaranteed content always present
    assert!(!plan.fiber_breakdown.sources.is_empty());
    assert!(!plan.weekly_meal_prep.tasks.is_empty());
    assert!(!plan.education.anti_inflammatory_foods.is_empty());
}

#[tokio::test]
async fn phase1_plan_never_contains_fasting_and_meets_fiber_floor() {
    let drifted = "\
Breakfast: Oatmeal
Fasting Schedule: 16:8 every day
Aim for a fiber target of 22g today.
";
    let agent = NutritionAgent::new(scripted_router(drifted));
    let plan = agent
        .generate_meal_plan(profile_draft(34, "phase1"), &[], None)
        .await
        .unwrap();

    assert!(plan.fasting_schedule.is_none());
    assert!(plan.fiber_breakdown.target_grams >= 30);
    // The drift was flagged as a hard warning surfaced in plan content
    assert!(plan
        .recommendations
        .iter()
        .any(|r| r.contains("fasting") || r.contains("fiber")));
}

#[tokio::test]
async fn phase2_and_phase3_plans_carry_fasting_guidance() {
    let agent = NutritionAgent::new(scripted_router("Breakfast: Smoothie\n"));
    for phase in ["phase2", "phase3"] {
        let plan = agent
            .generate_meal_plan(profile_draft(34, phase), &[], None)
            .await
            .unwrap();
        assert!(plan.fasting_schedule.is_some(), "{phase}");
    }
}

#[tokio::test]
async fn provider_outage_yields_phase_scoped_fallback() {
    let agent = NutritionAgent::new(offline_router());
    let plan = agent
        .generate_meal_plan(profile_draft(34, "phase1"), &[], None)
        .await
        .unwrap();

    assert_eq!(plan.origin, PlanOrigin::Synthesized);
    assert!(!plan.meal_plan.breakfast.is_empty());
    assert!(!plan.shopping_list.is_empty());
    assert_eq!(
        plan.fiber_breakdown.target_grams,
        protocol::fiber_target(GmrpPhase::Phase1)
    );
    assert!(plan.fasting_schedule.is_none());
}

#[tokio::test]
async fn shopping_list_extracts_categories_and_cost() {
    let response = "\
Proteins:
- Wild salmon
- Organic chicken

Vegetables:
- Spinach
- Broccoli

Fruits:
- Apples

Pantry Staples:
- Quinoa
- Olive oil

Estimated cost: $127.50

Budget Tips:
- Buy frozen berries
";
    let agent = NutritionAgent::new(scripted_router(response));
    let list = agent
        .generate_shopping_list(profile_draft(34, "phase1"), &MealPlan::default(), 2)
        .await
        .unwrap();

    assert_eq!(list.proteins, vec!["Wild salmon", "Organic chicken"]);
    assert_eq!(list.vegetables.len(), 2);
    assert!((list.estimated_cost - 127.5).abs() < f64::EPSILON);
    assert_eq!(list.budget_tips, vec!["Buy frozen berries"]);
}

#[tokio::test]
async fn shopping_list_outage_uses_deterministic_fallback() {
    let agent = NutritionAgent::new(offline_router());
    let list = agent
        .generate_shopping_list(profile_draft(34, "phase1"), &MealPlan::default(), 1)
        .await
        .unwrap();
    assert!(!list.proteins.is_empty());
    assert!((list.estimated_cost - 150.0).abs() < f64::EPSILON);
}
