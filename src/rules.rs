// ABOUTME: Deterministic domain rule validator - safety alerts and phase compliance checks
// ABOUTME: Pure functions over profile, metrics, and draft plan content; never consults the network
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GMRP Coach

//! Domain rule validation
//!
//! Safety alerts are derived from the user's profile and metrics alone and
//! are therefore available even when the generative backend is down. Phase
//! compliance inspects draft plan content for protocol violations; findings
//! surface as plan content, never as errors.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::debug;

use crate::models::{GmrpPhase, HealthMetrics, UserProfile};
use crate::protocol::{fiber, thresholds};

/// Kind of deterministic safety alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// Age below 18
    PediatricConsult,
    /// Age above 65
    PhysicianConsult,
    /// Diabetes reported
    GlycemicMonitoring,
    /// Heart disease reported
    CardiologyConsult,
    /// Eating disorder reported
    MentalHealthSpecialist,
    /// Any medications reported
    PharmacistInteraction,
    /// Stress score at or above 8/10
    MentalHealth,
    /// Sleep below 5 hours
    SleepDeprivation,
    /// Phase 2 with energy below 4/10
    DeferFasting,
}

/// A rule-derived warning surfaced alongside generated content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyAlert {
    /// Which rule fired
    pub kind: AlertKind,
    /// User-facing message
    pub message: String,
}

impl SafetyAlert {
    fn new(kind: AlertKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Result of phase-compliance checking. Pure function of (plan, phase).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// False when a phase rule was violated without a professional override
    pub phase_compliant: bool,
    /// Hard warnings (rule violations)
    pub warnings: Vec<String>,
    /// Informational recommendations (advisory findings, override deviations)
    pub recommendations: Vec<String>,
}

impl ValidationReport {
    /// A compliant report with no findings
    #[must_use]
    pub const fn clean() -> Self {
        Self {
            phase_compliant: true,
            warnings: Vec::new(),
            recommendations: Vec::new(),
        }
    }
}

/// The textual content of a draft plan, flattened for rule inspection
#[derive(Debug, Clone, Default)]
pub struct PlanContentView {
    /// Task titles and free-text lines
    pub texts: Vec<String>,
    /// Fiber target if the plan carries one
    pub fiber_target_grams: Option<u32>,
    /// Whether the plan carries an explicit fasting schedule block
    pub has_fasting_schedule: bool,
}

/// Evaluate all safety-alert rules.
///
/// Rules are ordered and independently evaluated; every rule that matches
/// contributes an alert.
#[must_use]
pub fn evaluate_safety_alerts(profile: &UserProfile, metrics: &HealthMetrics) -> Vec<SafetyAlert> {
    let mut alerts = Vec::new();

    if profile.age < thresholds::PEDIATRIC_AGE {
        alerts.push(SafetyAlert::new(
            AlertKind::PediatricConsult,
            "This program is designed for adults. Please consult a pediatric specialist before proceeding.",
        ));
    }
    if profile.age > thresholds::SENIOR_AGE {
        alerts.push(SafetyAlert::new(
            AlertKind::PhysicianConsult,
            "Please consult your physician before starting or changing protocol phases.",
        ));
    }
    if has_condition(profile, "diabetes") {
        alerts.push(SafetyAlert::new(
            AlertKind::GlycemicMonitoring,
            "Monitor blood glucose closely; dietary changes can affect glycemic control.",
        ));
    }
    if has_condition(profile, "heart_disease") {
        alerts.push(SafetyAlert::new(
            AlertKind::CardiologyConsult,
            "Consult your cardiologist before making changes to diet or exercise.",
        ));
    }
    if has_condition(profile, "eating_disorder") {
        alerts.push(SafetyAlert::new(
            AlertKind::MentalHealthSpecialist,
            "Please work with a mental health specialist while following this program.",
        ));
    }
    if !profile.medications.is_empty() {
        alerts.push(SafetyAlert::new(
            AlertKind::PharmacistInteraction,
            "Review supplement and food interactions with your pharmacist.",
        ));
    }
    if metrics.stress_level >= thresholds::HIGH_STRESS {
        alerts.push(SafetyAlert::new(
            AlertKind::MentalHealth,
            "Your stress level is very high. Consider reaching out to a mental health professional.",
        ));
    }
    if metrics.sleep_hours < thresholds::SLEEP_DEPRIVATION_HOURS {
        alerts.push(SafetyAlert::new(
            AlertKind::SleepDeprivation,
            "You are significantly sleep deprived. Prioritize rest before protocol changes.",
        ));
    }
    if profile.current_phase == GmrpPhase::Phase2
        && metrics.energy_level < thresholds::LOW_ENERGY_FOR_FASTING
    {
        alerts.push(SafetyAlert::new(
            AlertKind::DeferFasting,
            "Energy is low this week; defer the fasting window until it recovers.",
        ));
    }

    debug!(count = alerts.len(), "evaluated safety alert rules");
    alerts
}

fn has_condition(profile: &UserProfile, condition: &str) -> bool {
    profile
        .health_conditions
        .iter()
        .any(|c| c.trim().to_ascii_lowercase().replace([' ', '-'], "_") == condition)
}

/// Matches fasting guidance without tripping on words like "breakfast"
fn fasting_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // Safe: pattern is a compile-time literal
        #[allow(clippy::unwrap_used)]
        let pattern = Regex::new(r"(?i)\bfast(?:ing|s|ed)?\b|\b1[246]:\d{1,2}\b").unwrap();
        pattern
    })
}

/// Whether any line of plan content reads as fasting guidance
#[must_use]
pub fn contains_fasting_content(view: &PlanContentView) -> bool {
    view.has_fasting_schedule || view.texts.iter().any(|t| fasting_pattern().is_match(t))
}

/// Check a draft plan's content against phase rules.
///
/// Phase 1 plans must not carry fasting guidance and must keep the fiber
/// target at or above the reset minimum. Phases 2 and 3 are expected to
/// carry fasting guidance, but that expectation is advisory. When a
/// professional override is present, deviations are reported as
/// informational rather than violations.
#[must_use]
pub fn check_phase_compliance(
    phase: GmrpPhase,
    view: &PlanContentView,
    override_present: bool,
) -> ValidationReport {
    let mut report = ValidationReport::clean();

    match phase {
        GmrpPhase::Phase1 => {
            if contains_fasting_content(view) {
                if override_present {
                    report.recommendations.push(
                        "Fasting content present in phase 1 under professional override".into(),
                    );
                } else {
                    report.phase_compliant = false;
                    report
                        .warnings
                        .push("Phase 1 plans must not contain fasting guidance".into());
                }
            }
            if let Some(target) = view.fiber_target_grams {
                if target < fiber::PHASE1_MIN_GRAMS {
                    if override_present {
                        report.recommendations.push(format!(
                            "Fiber target {target}g is below the phase 1 minimum under professional override"
                        ));
                    } else {
                        report.phase_compliant = false;
                        report.warnings.push(format!(
                            "Phase 1 fiber target must be at least {}g (plan has {target}g)",
                            fiber::PHASE1_MIN_GRAMS
                        ));
                    }
                }
            }
        }
        GmrpPhase::Phase2 | GmrpPhase::Phase3 => {
            if !contains_fasting_content(view) {
                report
                    .recommendations
                    .push(format!("{phase} plans usually include fasting guidance"));
            }
        }
    }

    report
}
