// ABOUTME: Behavioral nudge engine deriving nudges, habit stacks, and implementation intentions
// ABOUTME: Pure behavioral-economics rules over the profile and recent performance; no model involvement
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GMRP Coach

//! # Behavioral Nudge Engine
//!
//! Derives personalization artifacts from a behavioral profile and recent
//! performance signals, independent of the generative model:
//!
//! - a social-proof nudge when the user responds to community behavior
//! - a streak-protection nudge when loss aversion is high and a streak is
//!   worth protecting
//! - a preventive nudge for each historically failing time window
//! - always exactly one baseline implementation-intention nudge
//!
//! Habit stacks pair the user's most reliable existing habits with
//! phase-appropriate candidates, ranked by estimated success probability.

use tracing::debug;

use crate::models::{
    BehavioralContent, BehavioralProfile, GmrpPhase, HabitStack, ImplementationIntention, Nudge,
    NudgeKind, PerformanceSummary, RiskWindow,
};
use crate::protocol::{self, CandidateHabit};

/// Maximum nudges returned per request
pub const MAX_NUDGES: usize = 5;

/// Social-influence score above which the social-proof nudge is emitted
const SOCIAL_INFLUENCE_THRESHOLD: f64 = 0.6;

/// Loss-aversion score (1-5 scale) above which streak protection is emitted
const LOSS_AVERSION_THRESHOLD: f64 = 3.0;

/// Minimum streak length worth protecting
const STREAK_PROTECTION_MIN: u32 = 3;

/// Completion rate at which an existing habit counts as a reliable anchor
const RELIABLE_HABIT_THRESHOLD: f64 = 0.8;

/// Habit stacks returned per request
const MAX_HABIT_STACKS: usize = 3;

/// Implementation intentions returned per request
const MAX_INTENTIONS: usize = 4;

/// Minutes of effort a one-day streak represents, for loss framing
const MINUTES_PER_STREAK_DAY: u32 = 15;

/// Derive the full behavioral content bundle
#[must_use]
pub fn generate_content(
    profile: &BehavioralProfile,
    performance: &PerformanceSummary,
    phase: GmrpPhase,
) -> BehavioralContent {
    BehavioralContent {
        nudges: generate_nudges(profile, performance, phase),
        habit_stacks: generate_habit_stacks(performance, phase),
        implementation_intentions: generate_implementation_intentions(performance),
    }
}

/// Derive the ranked nudge list.
///
/// The implementation-intention nudge is always present; the others are
/// profile-gated. When the cap is exceeded, preventive nudges are dropped
/// lowest-failure-rate-first.
#[must_use]
pub fn generate_nudges(
    profile: &BehavioralProfile,
    performance: &PerformanceSummary,
    phase: GmrpPhase,
) -> Vec<Nudge> {
    let mut nudges = Vec::new();

    if profile.social_influence > SOCIAL_INFLUENCE_THRESHOLD {
        nudges.push(social_proof_nudge(profile, phase));
    }

    if profile.loss_aversion > LOSS_AVERSION_THRESHOLD {
        if let Some(nudge) = loss_aversion_nudge(performance) {
            nudges.push(nudge);
        }
    }

    let mut risk_windows: Vec<&RiskWindow> = performance.risk_windows.iter().collect();
    risk_windows.sort_by(|a, b| {
        b.failure_rate
            .partial_cmp(&a.failure_rate)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for window in risk_windows {
        if nudges.len() >= MAX_NUDGES - 1 {
            break;
        }
        nudges.push(preventive_nudge(window));
    }

    // Baseline: always exactly one implementation-intention nudge
    nudges.push(implementation_intention_nudge(performance));

    debug!(count = nudges.len(), "generated nudges");
    nudges
}

fn social_proof_nudge(profile: &BehavioralProfile, phase: GmrpPhase) -> Nudge {
    let rate = protocol::community_active_rate(phase);
    Nudge {
        kind: NudgeKind::SocialProof,
        title: "Your Community is Crushing It!".into(),
        message: format!(
            "{rate}% of {phase} members completed their nutrition goals yesterday. Join them!"
        ),
        action: "Complete today's nutrition plan".into(),
        scheduled_for: profile.best_performance_times.first().copied(),
    }
}

fn loss_aversion_nudge(performance: &PerformanceSummary) -> Option<Nudge> {
    let longest = performance.streaks.iter().max_by_key(|s| s.length)?;
    if longest.length <= STREAK_PROTECTION_MIN {
        return None;
    }
    let invested_minutes = longest.length * MINUTES_PER_STREAK_DAY;
    Some(Nudge {
        kind: NudgeKind::LossAversion,
        title: format!("Don't Break Your {}-Day Streak!", longest.length),
        message: format!(
            "You've built amazing momentum on {}. Your {}-day streak represents {} minutes of \
             consistent effort - it takes just 2 minutes to keep it alive.",
            longest.kind, longest.length, invested_minutes
        ),
        action: "Complete the minimum version of today's habits".into(),
        scheduled_for: performance.risk_windows.first().map(|w| w.window),
    })
}

fn preventive_nudge(window: &RiskWindow) -> Nudge {
    Nudge {
        kind: NudgeKind::Preventive,
        title: format!("Heads up for the {}", window.window.label()),
        message: format!(
            "{} tends to slip in the {}. A tiny version now protects the day.",
            window.habit,
            window.window.label()
        ),
        action: format!("Do the 2-minute version of {}", window.habit),
        scheduled_for: Some(window.window),
    }
}

fn implementation_intention_nudge(performance: &PerformanceSummary) -> Nudge {
    // Anchor the if-then plan to the worst risk window when one exists,
    // otherwise to the most common failure trigger in the program
    let (situation, window) = performance.risk_windows.first().map_or_else(
        || ("you feel a craving coming on".to_owned(), None),
        |w| {
            (
                format!("it's the {} and {} isn't done", w.window.label(), w.habit),
                Some(w.window),
            )
        },
    );
    Nudge {
        kind: NudgeKind::ImplementationIntention,
        title: "Your If-Then Plan".into(),
        message: format!("If {situation}, then I will do the smallest possible version right away."),
        action: "Rehearse the plan once this morning".into(),
        scheduled_for: window,
    }
}

/// Estimated probability that a stacked habit sticks.
///
/// Reliable anchors carry most of the weight; harder candidates discount it.
fn estimate_success(anchor_completion: f64, candidate: &CandidateHabit) -> f64 {
    (anchor_completion * (1.0 - 0.5 * candidate.difficulty)).clamp(0.0, 1.0)
}

/// Pair reliable anchors with phase candidates and keep the top three
#[must_use]
pub fn generate_habit_stacks(performance: &PerformanceSummary, phase: GmrpPhase) -> Vec<HabitStack> {
    let candidates = protocol::candidate_habits(phase);
    let mut stacks: Vec<HabitStack> = performance
        .reliable_habits
        .iter()
        .filter(|h| h.completion_rate >= RELIABLE_HABIT_THRESHOLD)
        .flat_map(|anchor| {
            candidates.iter().map(|candidate| HabitStack {
                anchor_habit: anchor.name.clone(),
                new_habit: candidate.name.to_owned(),
                stacking_phrase: format!(
                    "After I {}, I will {}",
                    anchor.routine, candidate.routine
                ),
                expected_success: estimate_success(anchor.completion_rate, candidate),
            })
        })
        .collect();

    stacks.sort_by(|a, b| {
        b.expected_success
            .partial_cmp(&a.expected_success)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    stacks.truncate(MAX_HABIT_STACKS);
    stacks
}

/// Build if-then plans for the user's failure patterns, plus one proactive
/// baseline for cravings
#[must_use]
pub fn generate_implementation_intentions(
    performance: &PerformanceSummary,
) -> Vec<ImplementationIntention> {
    let mut intentions: Vec<ImplementationIntention> = performance
        .risk_windows
        .iter()
        .take(MAX_INTENTIONS - 1)
        .map(|window| ImplementationIntention {
            situation: format!(
                "If it's the {} and I haven't done {}",
                window.window.label(),
                window.habit
            ),
            response: "then I will do the 2-minute version immediately".into(),
            purpose: format!(
                "Protects {} through its historically weakest window",
                window.habit
            ),
        })
        .collect();

    intentions.push(ImplementationIntention {
        situation: "If I feel a strong craving for processed food".into(),
        response: "then I will drink a glass of water and wait ten minutes".into(),
        purpose: "Interrupts the craving loop without relying on willpower".into(),
    });

    intentions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HabitStat, MotivationType, NudgeStyle, ReminderFrequency, Streak, TimeOfDay};

    fn profile(social: f64, loss: f64) -> BehavioralProfile {
        BehavioralProfile {
            motivation: MotivationType::Balanced,
            loss_aversion: loss,
            present_bias: 0.7,
            social_influence: social,
            gamification_response: 0.6,
            best_performance_times: vec![TimeOfDay::Morning],
            reminder_frequency: ReminderFrequency::Moderate,
            nudge_style: NudgeStyle::Gentle,
        }
    }

    fn performance() -> PerformanceSummary {
        PerformanceSummary {
            completion_rate: 0.7,
            consistency: 0.6,
            streaks: vec![Streak {
                kind: "nutrition logging".into(),
                length: 6,
            }],
            reliable_habits: vec![
                HabitStat {
                    name: "morning coffee".into(),
                    routine: "pour my coffee".into(),
                    completion_rate: 0.95,
                },
                HabitStat {
                    name: "inconsistent journaling".into(),
                    routine: "open my journal".into(),
                    completion_rate: 0.4,
                },
            ],
            risk_windows: vec![RiskWindow {
                window: TimeOfDay::EarlyEvening,
                habit: "meditation".into(),
                failure_rate: 0.6,
            }],
        }
    }

    #[test]
    fn test_always_exactly_one_implementation_intention_nudge() {
        for (social, loss) in [(0.0, 0.0), (0.9, 4.5)] {
            let nudges = generate_nudges(&profile(social, loss), &performance(), GmrpPhase::Phase1);
            let count = nudges
                .iter()
                .filter(|n| n.kind == NudgeKind::ImplementationIntention)
                .count();
            assert_eq!(count, 1);
        }
    }

    #[test]
    fn test_social_proof_gated_by_influence_score() {
        let nudges = generate_nudges(&profile(0.7, 0.0), &performance(), GmrpPhase::Phase2);
        assert!(nudges.iter().any(|n| n.kind == NudgeKind::SocialProof));
        assert!(nudges
            .iter()
            .find(|n| n.kind == NudgeKind::SocialProof)
            .is_some_and(|n| n.message.contains("phase2")));

        let nudges = generate_nudges(&profile(0.5, 0.0), &performance(), GmrpPhase::Phase2);
        assert!(nudges.iter().all(|n| n.kind != NudgeKind::SocialProof));
    }

    #[test]
    fn test_loss_aversion_requires_score_and_streak() {
        let nudges = generate_nudges(&profile(0.0, 3.5), &performance(), GmrpPhase::Phase1);
        let streak_nudge = nudges
            .iter()
            .find(|n| n.kind == NudgeKind::LossAversion)
            .unwrap();
        assert!(streak_nudge.title.contains("6-Day"));

        // Streak too short
        let mut short = performance();
        short.streaks = vec![Streak {
            kind: "hydration".into(),
            length: 2,
        }];
        let nudges = generate_nudges(&profile(0.0, 3.5), &short, GmrpPhase::Phase1);
        assert!(nudges.iter().all(|n| n.kind != NudgeKind::LossAversion));

        // Score too low
        let nudges = generate_nudges(&profile(0.0, 2.0), &performance(), GmrpPhase::Phase1);
        assert!(nudges.iter().all(|n| n.kind != NudgeKind::LossAversion));
    }

    #[test]
    fn test_preventive_nudges_scheduled_for_risk_windows() {
        let nudges = generate_nudges(&profile(0.0, 0.0), &performance(), GmrpPhase::Phase1);
        let preventive = nudges
            .iter()
            .find(|n| n.kind == NudgeKind::Preventive)
            .unwrap();
        assert_eq!(preventive.scheduled_for, Some(TimeOfDay::EarlyEvening));
    }

    #[test]
    fn test_nudge_cap_respected() {
        let mut busy = performance();
        busy.risk_windows = vec![
            RiskWindow { window: TimeOfDay::Morning, habit: "a".into(), failure_rate: 0.9 },
            RiskWindow { window: TimeOfDay::LateMorning, habit: "b".into(), failure_rate: 0.8 },
            RiskWindow { window: TimeOfDay::EarlyAfternoon, habit: "c".into(), failure_rate: 0.7 },
            RiskWindow { window: TimeOfDay::Evening, habit: "d".into(), failure_rate: 0.6 },
            RiskWindow { window: TimeOfDay::Night, habit: "e".into(), failure_rate: 0.5 },
        ];
        let nudges = generate_nudges(&profile(0.9, 4.0), &busy, GmrpPhase::Phase1);
        assert!(nudges.len() <= MAX_NUDGES);
        assert!(nudges
            .iter()
            .any(|n| n.kind == NudgeKind::ImplementationIntention));
    }

    #[test]
    fn test_habit_stacks_use_reliable_anchors_only() {
        let stacks = generate_habit_stacks(&performance(), GmrpPhase::Phase1);
        assert!(!stacks.is_empty());
        assert!(stacks.len() <= 3);
        assert!(stacks.iter().all(|s| s.anchor_habit == "morning coffee"));
        assert!(stacks[0].stacking_phrase.starts_with("After I pour my coffee"));
        // Ranked by expected success, descending
        for pair in stacks.windows(2) {
            assert!(pair[0].expected_success >= pair[1].expected_success);
        }
    }

    #[test]
    fn test_intentions_include_baseline() {
        let intentions = generate_implementation_intentions(&performance());
        assert!(intentions.len() >= 2);
        assert!(intentions
            .iter()
            .any(|i| i.situation.contains("craving")));
    }
}
