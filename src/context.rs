// ABOUTME: Context assembler - turns partial inbound payloads into a fully-defaulted immutable request context
// ABOUTME: The single place where optional fields are defaulted and the only source of hard validation errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GMRP Coach

//! Request context assembly
//!
//! Every plan request starts here. The assembler accepts possibly-partial
//! profile and metrics payloads, applies the documented defaults, and
//! produces an immutable [`RequestContext`] so downstream stages never
//! branch on missing data.
//!
//! Missing identity fields (id, age, phase), an age outside [18, 120], or an
//! unrecognized phase literal are the only hard validation errors in the
//! whole pipeline; everything else defaults.

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{AppError, AppResult};
use crate::models::{GmrpPhase, HealthMetrics, TimeOfDay, UserPreferences, UserProfile};
use crate::protocol::validation;

/// Documented metric defaults applied when an observation is absent
pub mod defaults {
    /// Nightly sleep hours
    pub const SLEEP_HOURS: f64 = 7.0;
    /// Stress score (0-10)
    pub const STRESS_LEVEL: f64 = 5.0;
    /// Energy score (0-10)
    pub const ENERGY_LEVEL: f64 = 6.0;
    /// Digestive health score (0-10)
    pub const DIGESTIVE_HEALTH: f64 = 6.0;
    /// Adherence rate (0-100)
    pub const ADHERENCE_RATE: f64 = 75.0;
    /// Gender when unspecified
    pub const GENDER: &str = "not-specified";
    /// Health goal when none given
    pub const HEALTH_GOAL: &str = "improve-gut-health";
    /// Communication preference when unspecified
    pub const COMMUNICATION: &str = "standard";
}

/// Raw, possibly-partial profile payload as received from the caller
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDraft {
    /// User identifier (required)
    pub id: Option<String>,
    /// Age in years (required)
    pub age: Option<u32>,
    /// Self-reported gender
    pub gender: Option<String>,
    /// Health goals
    pub health_goals: Option<Vec<String>>,
    /// GMRP phase wire literal (required)
    pub current_phase: Option<String>,
    /// Program start date
    pub start_date: Option<DateTime<Utc>>,
    /// Known health conditions
    pub health_conditions: Option<Vec<String>>,
    /// Current medications
    pub medications: Option<Vec<String>>,
    /// Onboarding preferences
    pub preferences: Option<PreferencesDraft>,
}

/// Raw preference payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesDraft {
    /// Dietary preferences
    pub dietary: Option<Vec<String>>,
    /// Exercise preferences
    pub exercise: Option<Vec<String>>,
    /// Communication style
    pub communication: Option<String>,
}

/// Raw, possibly-partial metrics payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsDraft {
    /// Body weight in kilograms
    pub weight: Option<f64>,
    /// Nightly sleep hours
    pub sleep_hours: Option<f64>,
    /// Stress score 0-10
    pub stress_level: Option<f64>,
    /// Energy score 0-10
    pub energy_level: Option<f64>,
    /// Digestive health score 0-10
    pub digestive_health: Option<f64>,
    /// Adherence rate 0-100
    pub adherence_rate: Option<f64>,
}

/// Fully-defaulted immutable context for one request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// Validated user profile
    pub profile: UserProfile,
    /// Fully-defaulted metrics
    pub metrics: HealthMetrics,
    /// Wall-clock time at assembly
    pub assembled_at: DateTime<Utc>,
    /// Coarse time-of-day bucket for nudge scheduling
    pub time_of_day: TimeOfDay,
    /// Weekday name at assembly time
    pub day_of_week: String,
    /// Days elapsed since program start
    pub days_in_program: i64,
}

/// Assemble a request context from raw payloads using the current wall clock.
///
/// # Errors
///
/// Returns an `AppError` in the validation family when a required identity
/// field is absent, the age is outside [18, 120], or the phase literal is
/// not one of the three recognized values.
pub fn assemble(profile: ProfileDraft, metrics: MetricsDraft) -> AppResult<RequestContext> {
    assemble_at(profile, metrics, Utc::now())
}

/// Assemble a request context at an explicit instant (injectable for tests).
///
/// # Errors
///
/// Same contract as [`assemble`].
pub fn assemble_at(
    profile: ProfileDraft,
    metrics: MetricsDraft,
    now: DateTime<Utc>,
) -> AppResult<RequestContext> {
    let id = profile
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::missing_field("id"))?;
    let age = profile.age.ok_or_else(|| AppError::missing_field("age"))?;
    if !(validation::MIN_AGE..=validation::MAX_AGE).contains(&age) {
        return Err(AppError::out_of_range(format!(
            "age {age} is outside the supported range [{}, {}]",
            validation::MIN_AGE,
            validation::MAX_AGE
        )));
    }
    let current_phase: GmrpPhase = profile
        .current_phase
        .ok_or_else(|| AppError::missing_field("currentPhase"))?
        .parse()?;

    let preferences = profile.preferences.unwrap_or_default();
    let start_date = profile.start_date.unwrap_or(now);

    let profile = UserProfile {
        id,
        age,
        gender: profile.gender.unwrap_or_else(|| defaults::GENDER.into()),
        health_goals: non_empty(profile.health_goals, || vec![defaults::HEALTH_GOAL.into()]),
        current_phase,
        start_date,
        health_conditions: profile.health_conditions.unwrap_or_default(),
        medications: profile.medications.unwrap_or_default(),
        preferences: UserPreferences {
            dietary: preferences.dietary.unwrap_or_default(),
            exercise: preferences.exercise.unwrap_or_default(),
            communication: preferences
                .communication
                .unwrap_or_else(|| defaults::COMMUNICATION.into()),
        },
    };

    let metrics = HealthMetrics {
        weight: metrics.weight,
        sleep_hours: metrics.sleep_hours.unwrap_or(defaults::SLEEP_HOURS),
        stress_level: metrics.stress_level.unwrap_or(defaults::STRESS_LEVEL),
        energy_level: metrics.energy_level.unwrap_or(defaults::ENERGY_LEVEL),
        digestive_health: metrics.digestive_health.unwrap_or(defaults::DIGESTIVE_HEALTH),
        adherence_rate: metrics.adherence_rate.unwrap_or(defaults::ADHERENCE_RATE),
    };

    let days_in_program = profile.days_in_program(now);
    let context = RequestContext {
        time_of_day: TimeOfDay::from_hour(now.hour()),
        day_of_week: weekday_name(now).into(),
        assembled_at: now,
        days_in_program,
        profile,
        metrics,
    };

    debug!(
        user = %context.profile.id,
        phase = %context.profile.current_phase,
        days = context.days_in_program,
        "assembled request context"
    );
    Ok(context)
}

fn non_empty(values: Option<Vec<String>>, fallback: impl FnOnce() -> Vec<String>) -> Vec<String> {
    match values {
        Some(v) if !v.is_empty() => v,
        _ => fallback(),
    }
}

fn weekday_name(now: DateTime<Utc>) -> &'static str {
    match now.weekday() {
        chrono::Weekday::Mon => "Monday",
        chrono::Weekday::Tue => "Tuesday",
        chrono::Weekday::Wed => "Wednesday",
        chrono::Weekday::Thu => "Thursday",
        chrono::Weekday::Fri => "Friday",
        chrono::Weekday::Sat => "Saturday",
        chrono::Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    fn valid_draft() -> ProfileDraft {
        ProfileDraft {
            id: Some("user-1".into()),
            age: Some(34),
            current_phase: Some("phase1".into()),
            ..ProfileDraft::default()
        }
    }

    #[test]
    fn test_defaults_applied() {
        let ctx = assemble(valid_draft(), MetricsDraft::default()).unwrap();
        assert!((ctx.metrics.sleep_hours - 7.0).abs() < f64::EPSILON);
        assert!((ctx.metrics.stress_level - 5.0).abs() < f64::EPSILON);
        assert!((ctx.metrics.energy_level - 6.0).abs() < f64::EPSILON);
        assert!((ctx.metrics.digestive_health - 6.0).abs() < f64::EPSILON);
        assert!((ctx.metrics.adherence_rate - 75.0).abs() < f64::EPSILON);
        assert!(ctx.metrics.weight.is_none());
        assert_eq!(ctx.profile.gender, "not-specified");
        assert_eq!(ctx.profile.health_goals, vec!["improve-gut-health"]);
        assert_eq!(ctx.profile.preferences.communication, "standard");
    }

    #[test]
    fn test_missing_identity_fields_rejected() {
        let mut draft = valid_draft();
        draft.id = None;
        let err = assemble(draft, MetricsDraft::default()).unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingRequiredField);

        let mut draft = valid_draft();
        draft.age = None;
        assert!(assemble(draft, MetricsDraft::default()).is_err());

        let mut draft = valid_draft();
        draft.current_phase = None;
        assert!(assemble(draft, MetricsDraft::default()).is_err());
    }

    #[test]
    fn test_blank_id_rejected() {
        let mut draft = valid_draft();
        draft.id = Some("   ".into());
        let err = assemble(draft, MetricsDraft::default()).unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingRequiredField);
    }

    #[test]
    fn test_age_bounds() {
        for age in [17, 121, 0] {
            let mut draft = valid_draft();
            draft.age = Some(age);
            let err = assemble(draft, MetricsDraft::default()).unwrap_err();
            assert_eq!(err.code, ErrorCode::ValueOutOfRange, "age {age}");
        }
        for age in [18, 120] {
            let mut draft = valid_draft();
            draft.age = Some(age);
            assert!(assemble(draft, MetricsDraft::default()).is_ok(), "age {age}");
        }
    }

    #[test]
    fn test_unknown_phase_rejected() {
        let mut draft = valid_draft();
        draft.current_phase = Some("phase9".into());
        let err = assemble(draft, MetricsDraft::default()).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }

    #[test]
    fn test_time_of_day_derived_from_clock() {
        let now = "2025-06-04T08:30:00Z".parse().unwrap();
        let ctx = assemble_at(valid_draft(), MetricsDraft::default(), now).unwrap();
        assert_eq!(ctx.time_of_day, TimeOfDay::Morning);
        assert_eq!(ctx.day_of_week, "Wednesday");
    }

    #[test]
    fn test_days_in_program() {
        let now: DateTime<Utc> = "2025-06-11T12:00:00Z".parse().unwrap();
        let mut draft = valid_draft();
        draft.start_date = Some("2025-06-01T12:00:00Z".parse().unwrap());
        let ctx = assemble_at(draft, MetricsDraft::default(), now).unwrap();
        assert_eq!(ctx.days_in_program, 10);
    }
}
