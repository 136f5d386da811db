// ABOUTME: Behavioral content tests - nudge rules, habit stacking, and the combined daily fan-out
// ABOUTME: The engine is deterministic; only the coaching texts touch the scripted backend
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GMRP Coach

mod common;

use std::sync::Arc;

use common::{metrics_draft, offline_router, profile_draft, router_with, ScriptedProvider};
use gmrp_coach::agents::{BehavioralAgent, CoachService};
use gmrp_coach::models::{
    BehavioralProfile, GmrpPhase, HabitStat, MotivationType, NudgeKind, NudgeStyle,
    PerformanceSummary, PlanOrigin, ReminderFrequency, RiskWindow, Streak, TimeOfDay,
};

fn behavioral_profile() -> BehavioralProfile {
    BehavioralProfile {
        motivation: MotivationType::Balanced,
        loss_aversion: 3.5,
        present_bias: 0.7,
        social_influence: 0.8,
        gamification_response: 0.6,
        best_performance_times: vec![TimeOfDay::Morning],
        reminder_frequency: ReminderFrequency::Moderate,
        nudge_style: NudgeStyle::Gentle,
    }
}

fn performance() -> PerformanceSummary {
    PerformanceSummary {
        completion_rate: 0.72,
        consistency: 0.6,
        streaks: vec![Streak {
            kind: "meal logging".into(),
            length: 9,
        }],
        reliable_habits: vec![HabitStat {
            name: "morning coffee".into(),
            routine: "pour my coffee".into(),
            completion_rate: 0.9,
        }],
        risk_windows: vec![RiskWindow {
            window: TimeOfDay::EarlyEvening,
            habit: "meditation".into(),
            failure_rate: 0.55,
        }],
    }
}

#[test]
fn behavioral_content_is_deterministic_and_complete() {
    let agent = BehavioralAgent::new(offline_router());
    let content = agent.generate_behavioral_content(
        &behavioral_profile(),
        &performance(),
        GmrpPhase::Phase1,
    );

    let kinds: Vec<NudgeKind> = content.nudges.iter().map(|n| n.kind).collect();
    assert!(kinds.contains(&NudgeKind::SocialProof));
    assert!(kinds.contains(&NudgeKind::LossAversion));
    assert!(kinds.contains(&NudgeKind::Preventive));
    assert_eq!(
        kinds
            .iter()
            .filter(|k| **k == NudgeKind::ImplementationIntention)
            .count(),
        1
    );

    assert!(!content.habit_stacks.is_empty());
    assert!(content.habit_stacks.len() <= 3);
    assert!(content.habit_stacks[0]
        .stacking_phrase
        .starts_with("After I pour my coffee"));

    assert!(!content.implementation_intentions.is_empty());
}

#[test]
fn streak_nudge_names_the_streak_length() {
    let agent = BehavioralAgent::new(offline_router());
    let content = agent.generate_behavioral_content(
        &behavioral_profile(),
        &performance(),
        GmrpPhase::Phase2,
    );
    let streak = content
        .nudges
        .iter()
        .find(|n| n.kind == NudgeKind::LossAversion)
        .unwrap();
    assert!(streak.title.contains("9-Day"));
}

#[tokio::test]
async fn daily_content_fan_out_joins_all_sections() {
    let provider = ScriptedProvider {
        scripts: vec![
            (
                "ANALYZE USER PROFILE",
                "Daily Plan:\n- Hydrate first thing\n\nRecommendations:\n- Whole foods only\n"
                    .into(),
            ),
            (
                "NUTRITION PROTOCOL",
                "Breakfast: Chia pudding\nLunch: Big salad\nDinner: Salmon\n".into(),
            ),
            (
                "mindfulness",
                "Start with three conscious breaths after you sit down.".into(),
            ),
        ],
        default_response: "Move a little more today than yesterday.".into(),
    };

    let service = CoachService::new(router_with(Arc::new(provider)));
    let content = service
        .generate_daily_content(
            profile_draft(34, "phase1"),
            metrics_draft(),
            &behavioral_profile(),
            &performance(),
            &[],
            None,
        )
        .await
        .unwrap();

    assert_eq!(content.wellness.origin, PlanOrigin::Generated);
    assert_eq!(content.nutrition.meal_plan.breakfast, "Chia pudding");
    assert!(!content.behavioral.nudges.is_empty());
    assert!(content
        .coaching
        .mindfulness
        .as_deref()
        .unwrap()
        .contains("three conscious breaths"));
    assert!(content.coaching.nutrition.is_some());
    assert!(content.coaching.exercise.is_some());
}

#[tokio::test]
async fn daily_content_outage_still_returns_usable_bundle() {
    let service = CoachService::new(offline_router());
    let content = service
        .generate_daily_content(
            profile_draft(34, "phase2"),
            metrics_draft(),
            &behavioral_profile(),
            &performance(),
            &[],
            None,
        )
        .await
        .unwrap();

    assert_eq!(content.wellness.origin, PlanOrigin::Synthesized);
    assert_eq!(content.nutrition.origin, PlanOrigin::Synthesized);
    assert!(content.coaching.nutrition.is_none());
    // The deterministic engine is unaffected by the outage
    assert!(!content.behavioral.nudges.is_empty());
    assert!(!content.behavioral.habit_stacks.is_empty());
}

#[tokio::test]
async fn daily_content_validation_error_propagates() {
    let service = CoachService::new(offline_router());
    let err = service
        .generate_daily_content(
            profile_draft(15, "phase1"),
            metrics_draft(),
            &behavioral_profile(),
            &performance(),
            &[],
            None,
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, gmrp_coach::errors::ErrorCode::ValueOutOfRange);
}
