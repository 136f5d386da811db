// ABOUTME: GMRP protocol constants and guaranteed deterministic content tables keyed by phase
// ABOUTME: Single home for fiber targets, supplement protocols, meal prep, fasting policy, and phase rule text
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GMRP Coach

//! GMRP protocol constants
//!
//! This module contains the deterministic protocol numbers and content tables
//! used throughout the engine. The prompt builder embeds these as explicit
//! constraints, the validator checks them independently of model output, and
//! the enricher and fallback synthesizer merge them into every plan, so model
//! drift cannot silently violate the protocol.

use crate::models::{
    FastingSchedule, FiberBreakdown, FiberSource, GmrpPhase, MealPlan, MealPrepGuide,
    NutritionEducation, SupplementProtocol,
};

/// Daily fiber targets by phase (grams)
pub mod fiber {
    /// Phase 1 daily fiber target; the reset protocol range is 30-50 g
    pub const PHASE1_TARGET_GRAMS: u32 = 45;
    /// Phase 2 daily fiber target; sustained range is 35-45 g
    pub const PHASE2_TARGET_GRAMS: u32 = 40;
    /// Phase 3 daily fiber target; maintenance range is 30-40 g
    pub const PHASE3_TARGET_GRAMS: u32 = 35;
    /// Minimum acceptable phase 1 fiber target; plans below this are flagged
    pub const PHASE1_MIN_GRAMS: u32 = 30;
}

/// Metric score thresholds used by safety and insight rules
pub mod thresholds {
    /// Ages below this require pediatric consultation
    pub const PEDIATRIC_AGE: u32 = 18;
    /// Ages above this require physician consultation before protocol changes
    pub const SENIOR_AGE: u32 = 65;
    /// Stress scores at or above this (0-10) trigger a mental-health alert
    pub const HIGH_STRESS: f64 = 8.0;
    /// Sleep below this many hours triggers a sleep-deprivation alert
    pub const SLEEP_DEPRIVATION_HOURS: f64 = 5.0;
    /// Phase 2 energy scores below this (0-10) defer fasting introduction
    pub const LOW_ENERGY_FOR_FASTING: f64 = 4.0;
    /// Sleep below this many hours earns a sleep-optimization insight
    pub const SLEEP_INSIGHT_HOURS: f64 = 7.0;
    /// Stress above this (0-10) earns a stress-management insight
    pub const STRESS_INSIGHT_LEVEL: f64 = 7.0;
    /// Adherence above this (0-100) earns a celebration insight
    pub const ADHERENCE_CELEBRATION_RATE: f64 = 80.0;
}

/// Hard bounds enforced by the context assembler
pub mod validation {
    /// Minimum supported age
    pub const MIN_AGE: u32 = 18;
    /// Maximum supported age
    pub const MAX_AGE: u32 = 120;
}

/// Percentage of members in each phase who completed yesterday's nutrition
/// goals, used by the social-proof nudge. Refreshing these from live
/// community data is the persistence collaborator's concern.
#[must_use]
pub const fn community_active_rate(phase: GmrpPhase) -> u32 {
    match phase {
        GmrpPhase::Phase1 => 78,
        GmrpPhase::Phase2 => 82,
        GmrpPhase::Phase3 => 87,
    }
}

/// Phase-specific nutrition rule text embedded verbatim into prompts
#[must_use]
pub const fn phase_requirements(phase: GmrpPhase) -> &'static str {
    match phase {
        GmrpPhase::Phase1 => {
            "- NO intermittent fasting\n\
             - 100% whole foods, 30-50g fiber/day\n\
             - Anti-inflammatory focus (turmeric, ginger, leafy greens)\n\
             - Gut-healing nutrients (bone broth, fermented foods)\n\
             - 2-3L water daily with electrolytes"
        }
        GmrpPhase::Phase2 => {
            "- Introduce 12:12 IF once weekly (e.g., Wed 7pm-7am)\n\
             - 80/20 whole foods approach\n\
             - 35-45g fiber daily\n\
             - High-protein, high-fiber meals in eating windows\n\
             - Continue anti-inflammatory focus\n\
             - Flexible meal timing on non-fasting days"
        }
        GmrpPhase::Phase3 => {
            "- Flexible IF: 2x weekly 14:10 or 16:8\n\
             - Regenerative diet with <10% processed foods\n\
             - 30-40g fiber daily\n\
             - Intuitive eating with GMRP principles\n\
             - Social flexibility for meals\n\
             - Long-term sustainability focus"
        }
    }
}

/// Short phase summary used in greetings and fallback guidance
#[must_use]
pub const fn phase_guidance(phase: GmrpPhase) -> &'static str {
    match phase {
        GmrpPhase::Phase1 => "Focus on microbiome reset and whole foods",
        GmrpPhase::Phase2 => "Continue building habits with flexible nutrition",
        GmrpPhase::Phase3 => "Maintain your healthy lifestyle with confidence",
    }
}

/// Daily fiber target for the phase
#[must_use]
pub const fn fiber_target(phase: GmrpPhase) -> u32 {
    match phase {
        GmrpPhase::Phase1 => fiber::PHASE1_TARGET_GRAMS,
        GmrpPhase::Phase2 => fiber::PHASE2_TARGET_GRAMS,
        GmrpPhase::Phase3 => fiber::PHASE3_TARGET_GRAMS,
    }
}

/// Fiber target plus example sources; the source list is phase-independent
#[must_use]
pub fn fiber_breakdown(phase: GmrpPhase) -> FiberBreakdown {
    FiberBreakdown {
        target_grams: fiber_target(phase),
        sources: vec![
            source("Chia seeds", "2 tbsp", 10),
            source("Artichoke", "1 medium", 10),
            source("Black beans", "1/2 cup", 8),
            source("Avocado", "1 medium", 7),
            source("Broccoli", "1 cup", 5),
            source("Apple with skin", "1 medium", 4),
        ],
    }
}

fn source(food: &str, amount: &str, fiber_grams: u32) -> FiberSource {
    FiberSource {
        food: food.into(),
        amount: amount.into(),
        fiber_grams,
    }
}

/// Guaranteed daily tasks merged into every wellness plan for the phase.
///
/// Returned as (title, category) pairs; the enricher assigns priorities.
#[must_use]
pub fn guaranteed_daily_tasks(phase: GmrpPhase) -> Vec<(&'static str, &'static str)> {
    let mut tasks = vec![
        ("Start with 16oz of filtered water", "hydration"),
        ("Take morning supplements as prescribed", "supplements"),
        ("Prepare fiber-rich breakfast", "nutrition"),
        ("10-minute mindfulness session", "mindfulness"),
        ("Log meals and symptoms", "tracking"),
    ];
    if phase.allows_fasting() {
        tasks.push(("Review this week's fasting window", "fasting"));
    }
    tasks
}

/// Guaranteed recommendations for the phase
#[must_use]
pub fn guaranteed_recommendations(phase: GmrpPhase) -> Vec<String> {
    let fiber = fiber_target(phase);
    vec![
        format!("Focus on getting {fiber}g of fiber today"),
        "Stay hydrated with 2-3L of water".into(),
        "Practice stress management techniques".into(),
    ]
}

/// Supplement protocol for the phase
#[must_use]
pub fn supplement_protocol(phase: GmrpPhase) -> SupplementProtocol {
    match phase {
        GmrpPhase::Phase1 => SupplementProtocol {
            morning: vec![
                "Multi-strain probiotic (50+ billion CFU)".into(),
                "Vitamin D3 with K2 (2000-4000 IU)".into(),
                "B-Complex (high potency)".into(),
                "Omega-3 EPA/DHA (1000mg)".into(),
            ],
            evening: vec![
                "Magnesium glycinate (200-400mg)".into(),
                "Zinc picolinate (15-30mg)".into(),
                "L-Glutamine (5g on empty stomach)".into(),
            ],
            notes: "Take with meals unless otherwise specified".into(),
        },
        GmrpPhase::Phase2 => SupplementProtocol {
            morning: vec![
                "Maintenance probiotic (25-50 billion CFU)".into(),
                "Vitamin D3 with K2 (2000 IU)".into(),
                "B-Complex (moderate dose)".into(),
            ],
            evening: vec![
                "Magnesium glycinate (200mg)".into(),
                "L-Theanine (100-200mg)".into(),
                "Psyllium husk (if needed for fiber)".into(),
            ],
            notes: "Take with meals unless otherwise specified".into(),
        },
        GmrpPhase::Phase3 => SupplementProtocol {
            morning: vec![
                "High-quality multivitamin".into(),
                "Vitamin D3 (winter months)".into(),
                "Omega-3 (2-3x weekly)".into(),
            ],
            evening: vec!["Probiotic (as needed)".into()],
            notes: "Seasonal approach; adjust individual nutrients based on testing".into(),
        },
    }
}

/// Weekly meal-prep guidance for the phase
#[must_use]
pub fn meal_prep_guide(phase: GmrpPhase) -> MealPrepGuide {
    let tasks: Vec<String> = match phase {
        GmrpPhase::Phase1 => vec![
            "Wash and chop vegetables for the week".into(),
            "Cook quinoa and brown rice in batches".into(),
            "Prepare bone broth in slow cooker".into(),
            "Soak nuts and seeds for easier digestion".into(),
        ],
        GmrpPhase::Phase2 => vec![
            "Batch cook proteins for quick assembly".into(),
            "Prepare mason jar salads".into(),
            "Make energy balls with whole ingredients".into(),
            "Pre-portion intermittent fasting meals".into(),
        ],
        GmrpPhase::Phase3 => vec![
            "Flexible prep based on weekly schedule".into(),
            "Prepare versatile base ingredients".into(),
            "Make freezer-friendly backup meals".into(),
            "Stock healthy convenient options".into(),
        ],
    };
    MealPrepGuide {
        prep_day: "Sunday".into(),
        tasks,
        storage_instructions: vec![
            "Use glass containers for food safety".into(),
            "Label with dates and contents".into(),
            "Store cut vegetables with paper towels".into(),
            "Freeze proteins in meal-sized portions".into(),
        ],
    }
}

/// Phase nutrition education block
#[must_use]
pub fn nutrition_education(phase: GmrpPhase) -> NutritionEducation {
    match phase {
        GmrpPhase::Phase1 => NutritionEducation {
            phase_goals: vec![
                "Reset gut microbiome with diverse fiber".into(),
                "Eliminate inflammatory foods completely".into(),
                "Support digestive healing processes".into(),
                "Establish consistent meal timing".into(),
            ],
            key_nutrients: vec![
                "Soluble and insoluble fiber (30-50g daily)".into(),
                "Omega-3 fatty acids for inflammation".into(),
                "Probiotics from fermented foods".into(),
                "Polyphenols from colorful vegetables".into(),
            ],
            anti_inflammatory_foods: vec![
                "Turmeric with black pepper".into(),
                "Ginger and garlic".into(),
                "Leafy greens (kale, spinach)".into(),
                "Fatty fish (salmon, sardines)".into(),
                "Berries and cherries".into(),
            ],
        },
        GmrpPhase::Phase2 => NutritionEducation {
            phase_goals: vec![
                "Introduce 12:12 intermittent fasting".into(),
                "Maintain 80/20 whole foods approach".into(),
                "Build sustainable eating habits".into(),
                "Optimize nutrient timing".into(),
            ],
            key_nutrients: vec![
                "High-quality proteins for satiety".into(),
                "Complex carbohydrates for energy".into(),
                "Healthy fats for hormone balance".into(),
                "Continued fiber emphasis (35-45g)".into(),
            ],
            anti_inflammatory_foods: vec![
                "Green tea and matcha".into(),
                "Extra virgin olive oil".into(),
                "Nuts and seeds".into(),
                "Cruciferous vegetables".into(),
                "Dark chocolate (85%+ cacao)".into(),
            ],
        },
        GmrpPhase::Phase3 => NutritionEducation {
            phase_goals: vec![
                "Flexible intermittent fasting practice".into(),
                "Intuitive eating with GMRP principles".into(),
                "Social eating flexibility".into(),
                "Long-term lifestyle maintenance".into(),
            ],
            key_nutrients: vec![
                "Balanced macronutrient ratios".into(),
                "Seasonal whole foods focus".into(),
                "Mindful eating practices".into(),
                "Adequate fiber (30-40g daily)".into(),
            ],
            anti_inflammatory_foods: vec![
                "Variety of colorful vegetables".into(),
                "Fermented foods regularly".into(),
                "Herbs and spices daily".into(),
                "Quality proteins and fats".into(),
                "Seasonal fruits and vegetables".into(),
            ],
        },
    }
}

/// Default meals used when no model output is available
#[must_use]
pub fn default_meals(phase: GmrpPhase) -> MealPlan {
    match phase {
        GmrpPhase::Phase1 => MealPlan {
            breakfast: "Chia pudding with berries and almond butter".into(),
            lunch: "Large salad with grilled chicken and avocado".into(),
            dinner: "Baked salmon with roasted vegetables and quinoa".into(),
            snacks: vec![
                "Apple with raw almonds".into(),
                "Vegetable sticks with hummus".into(),
            ],
        },
        GmrpPhase::Phase2 => MealPlan {
            breakfast: "Green smoothie with protein powder".into(),
            lunch: "Buddha bowl with mixed vegetables and tahini".into(),
            dinner: "Grass-fed beef with sweet potato and sauerkraut".into(),
            snacks: vec![
                "Mixed berries".into(),
                "Raw vegetables with guacamole".into(),
            ],
        },
        GmrpPhase::Phase3 => MealPlan {
            breakfast: "Oatmeal with nuts, seeds, and seasonal fruit".into(),
            lunch: "Flexible whole foods meal".into(),
            dinner: "Family-style meal with GMRP principles".into(),
            snacks: vec!["Seasonal fruits".into(), "Nuts and seeds".into()],
        },
    }
}

/// Fasting schedule for phases that allow it; `None` for phase 1
#[must_use]
pub fn fasting_schedule(phase: GmrpPhase) -> Option<FastingSchedule> {
    match phase {
        GmrpPhase::Phase1 => None,
        GmrpPhase::Phase2 => Some(FastingSchedule {
            schedule: "12:12 once weekly (e.g., Wed 7pm-7am)".into(),
            guidelines: vec![
                "Stay hydrated through the fasting window".into(),
                "Break the fast with a high-protein, high-fiber meal".into(),
                "Skip the window entirely if energy is low".into(),
            ],
        }),
        GmrpPhase::Phase3 => Some(FastingSchedule {
            schedule: "Flexible: 2x weekly 14:10 or 16:8".into(),
            guidelines: vec![
                "Choose windows that fit social plans".into(),
                "Keep electrolytes up on longer windows".into(),
                "Return to 12:12 during high-stress weeks".into(),
            ],
        }),
    }
}

/// A candidate habit for stacking onto a reliable anchor
#[derive(Debug, Clone)]
pub struct CandidateHabit {
    /// Habit name
    pub name: &'static str,
    /// Routine phrasing for the "I will ..." half of a stacking sentence
    pub routine: &'static str,
    /// Relative difficulty, 0.0 (trivial) - 1.0 (demanding)
    pub difficulty: f64,
}

/// Phase-appropriate candidate habits for stacking suggestions
#[must_use]
pub fn candidate_habits(phase: GmrpPhase) -> Vec<CandidateHabit> {
    match phase {
        GmrpPhase::Phase1 => vec![
            CandidateHabit {
                name: "hydration",
                routine: "drink a full glass of water",
                difficulty: 0.1,
            },
            CandidateHabit {
                name: "fiber boost",
                routine: "add a tablespoon of chia seeds to my breakfast",
                difficulty: 0.2,
            },
            CandidateHabit {
                name: "mindful minute",
                routine: "take three conscious breaths",
                difficulty: 0.1,
            },
            CandidateHabit {
                name: "symptom log",
                routine: "log how my gut feels",
                difficulty: 0.3,
            },
        ],
        GmrpPhase::Phase2 => vec![
            CandidateHabit {
                name: "protein first",
                routine: "plan a high-protein first meal",
                difficulty: 0.3,
            },
            CandidateHabit {
                name: "fasting prep",
                routine: "set a reminder for this week's fasting window",
                difficulty: 0.2,
            },
            CandidateHabit {
                name: "evening walk",
                routine: "walk for ten minutes",
                difficulty: 0.4,
            },
        ],
        GmrpPhase::Phase3 => vec![
            CandidateHabit {
                name: "seasonal produce",
                routine: "pick one seasonal vegetable for dinner",
                difficulty: 0.2,
            },
            CandidateHabit {
                name: "flexible fasting check",
                routine: "choose this week's fasting days",
                difficulty: 0.3,
            },
            CandidateHabit {
                name: "gratitude note",
                routine: "write one line about a win today",
                difficulty: 0.2,
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase1_fiber_target_meets_minimum() {
        assert!(fiber_target(GmrpPhase::Phase1) >= fiber::PHASE1_MIN_GRAMS);
    }

    #[test]
    fn test_fasting_schedule_phase_gated() {
        assert!(fasting_schedule(GmrpPhase::Phase1).is_none());
        assert!(fasting_schedule(GmrpPhase::Phase2).is_some());
        assert!(fasting_schedule(GmrpPhase::Phase3).is_some());
    }

    #[test]
    fn test_guaranteed_tasks_exclude_fasting_in_phase1() {
        let tasks = guaranteed_daily_tasks(GmrpPhase::Phase1);
        assert!(tasks.iter().all(|(_, category)| *category != "fasting"));
        let tasks = guaranteed_daily_tasks(GmrpPhase::Phase2);
        assert!(tasks.iter().any(|(_, category)| *category == "fasting"));
    }

    #[test]
    fn test_content_tables_cover_all_phases() {
        for phase in [GmrpPhase::Phase1, GmrpPhase::Phase2, GmrpPhase::Phase3] {
            assert!(!supplement_protocol(phase).morning.is_empty());
            assert!(!meal_prep_guide(phase).tasks.is_empty());
            assert!(!nutrition_education(phase).phase_goals.is_empty());
            assert!(!default_meals(phase).breakfast.is_empty());
            assert!(!candidate_habits(phase).is_empty());
            assert!(!fiber_breakdown(phase).sources.is_empty());
        }
    }
}
