// ABOUTME: The three extraction strategy implementations - embedded JSON, labeled sections, scalar patterns
// ABOUTME: Each strategy is independent; new ones can be added to the chain without touching these
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GMRP Coach

use regex::Regex;
use serde_json::Value;

use super::{ExtractedValue, ExtractionStrategy, FieldKind, FieldMatch, FieldSpec, MatchOrigin};

/// How far from a label a scalar pattern may sit and still count as "near"
const SCALAR_LABEL_WINDOW: usize = 200;

fn bullet_pattern() -> Option<Regex> {
    Regex::new(r"(?m)^\s*[-•*]\s+(.+?)\s*$").ok()
}

// ============================================================================
// Tier 1: Embedded JSON block
// ============================================================================

/// Scans for a self-contained JSON block (fenced or bare) and reads the
/// field's key path out of it when well-formed.
pub struct EmbeddedBlockStrategy;

impl EmbeddedBlockStrategy {
    /// Locate and parse the embedded JSON object, if any
    fn embedded_object(raw: &str) -> Option<Value> {
        // Fenced block first, then the widest bare object
        let fenced = Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```").ok()?;
        if let Some(captures) = fenced.captures(raw) {
            if let Ok(value) = serde_json::from_str::<Value>(&captures[1]) {
                if value.is_object() {
                    return Some(value);
                }
            }
        }

        let start = raw.find('{')?;
        let end = raw.rfind('}')?;
        if end <= start {
            return None;
        }
        serde_json::from_str::<Value>(&raw[start..=end])
            .ok()
            .filter(Value::is_object)
    }

    /// Walk a dotted key path
    fn lookup<'a>(object: &'a Value, path: &str) -> Option<&'a Value> {
        let mut current = object;
        for segment in path.split('.') {
            current = current.get(segment)?;
        }
        Some(current)
    }

    /// Convert a JSON value into the shape the field expects
    fn convert(value: &Value, kind: FieldKind) -> Option<ExtractedValue> {
        match kind {
            FieldKind::Items => {
                let array = value.as_array()?;
                let items: Vec<String> = array.iter().filter_map(Self::item_text).collect();
                if items.is_empty() {
                    None
                } else {
                    Some(ExtractedValue::Items(items))
                }
            }
            FieldKind::Text => value
                .as_str()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| ExtractedValue::Text(s.to_owned())),
            FieldKind::Percent | FieldKind::Dollar | FieldKind::Grams => match value {
                Value::Number(n) => n.as_f64().map(ExtractedValue::Number),
                Value::String(s) => leading_number(s).map(ExtractedValue::Number),
                _ => None,
            },
        }
    }

    /// An item may be a plain string or an object carrying a title/name
    fn item_text(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_owned())
            }
            Value::Object(map) => map
                .get("title")
                .or_else(|| map.get("name"))
                .or_else(|| map.get("suggestion"))
                .and_then(Value::as_str)
                .map(|s| s.trim().to_owned()),
            _ => None,
        }
    }
}

impl ExtractionStrategy for EmbeddedBlockStrategy {
    fn name(&self) -> &'static str {
        "embedded_block"
    }

    fn extract(&self, raw: &str, spec: &FieldSpec) -> Option<FieldMatch> {
        let object = Self::embedded_object(raw)?;
        let value = Self::lookup(&object, spec.key)?;
        Self::convert(value, spec.kind).map(|value| FieldMatch {
            value,
            origin: MatchOrigin::EmbeddedBlock,
        })
    }
}

// ============================================================================
// Tier 2: Labeled heading + bullets
// ============================================================================

/// Finds a labeled heading (case-insensitive, tolerant of markdown emphasis
/// and numbering) and collects the bullet lines that follow it.
pub struct LabeledSectionStrategy;

impl LabeledSectionStrategy {
    /// Bullet lines directly under a label heading
    fn section_items(raw: &str, label: &str) -> Option<Vec<String>> {
        let escaped = regex::escape(label);
        let section = Regex::new(&format!(
            r"(?im)^[ \t]*(?:#+\s*|\*\*|\d+\.\s*)*{escaped}(?:\*\*)?\s*:?\s*\n((?:[ \t]*[-•*][ \t]+.+(?:\n|$))+)"
        ))
        .ok()?;
        let body = section.captures(raw)?.get(1)?.as_str();
        let bullets = bullet_pattern()?;
        let items: Vec<String> = bullets
            .captures_iter(body)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().trim().to_owned())
            .collect();
        (!items.is_empty()).then_some(items)
    }

    /// Inline "Label: value" text on a single line
    fn inline_text(raw: &str, label: &str) -> Option<String> {
        let escaped = regex::escape(label);
        let inline = Regex::new(&format!(
            r"(?im)^[ \t]*(?:#+\s*|\*\*|\d+\.\s*)*{escaped}(?:\*\*)?\s*:\s*(.+?)\s*$"
        ))
        .ok()?;
        inline
            .captures(raw)?
            .get(1)
            .map(|m| m.as_str().trim_matches('*').trim().to_owned())
            .filter(|s| !s.is_empty())
    }
}

impl ExtractionStrategy for LabeledSectionStrategy {
    fn name(&self) -> &'static str {
        "labeled_section"
    }

    fn extract(&self, raw: &str, spec: &FieldSpec) -> Option<FieldMatch> {
        for label in spec.labels {
            let value = match spec.kind {
                FieldKind::Items => Self::section_items(raw, label).map(ExtractedValue::Items),
                FieldKind::Text => Self::inline_text(raw, label).map(ExtractedValue::Text),
                // Scalars belong to the next tier
                FieldKind::Percent | FieldKind::Dollar | FieldKind::Grams => None,
            };
            if let Some(value) = value {
                return Some(FieldMatch {
                    value,
                    origin: MatchOrigin::LabeledSection,
                });
            }
        }
        None
    }
}

// ============================================================================
// Tier 3: Scalar number-with-unit patterns
// ============================================================================

/// Parses a number-with-unit pattern near a label. If the label is absent
/// the first pattern match anywhere is used; if no pattern matches the
/// field stays unset - a number is never invented.
pub struct ScalarPatternStrategy;

impl ScalarPatternStrategy {
    const fn unit_pattern(kind: FieldKind) -> Option<&'static str> {
        match kind {
            FieldKind::Percent => Some(r"(\d+(?:\.\d+)?)\s*(?:%|/\s*100\b)"),
            FieldKind::Dollar => Some(r"\$\s*(\d+(?:\.\d{1,2})?)"),
            FieldKind::Grams => Some(r"(\d+(?:\.\d+)?)\s*g(?:rams)?\b"),
            FieldKind::Items | FieldKind::Text => None,
        }
    }

    /// Choose the match nearest to any label occurrence, within the window.
    ///
    /// A number that follows its label ("adherence was 85%") is the common
    /// case; matches before the label are heavily discounted so an earlier
    /// unrelated number does not shadow the labeled one.
    fn nearest_match(raw: &str, pattern: &Regex, labels: &[&str]) -> Option<f64> {
        const BACKWARD_PENALTY: usize = 4;

        let lowered = raw.to_lowercase();
        let label_positions: Vec<usize> = labels
            .iter()
            .flat_map(|label| {
                let needle = label.to_lowercase();
                lowered
                    .match_indices(&needle)
                    .map(|(i, _)| i)
                    .collect::<Vec<usize>>()
            })
            .collect();

        let mut best: Option<(usize, f64)> = None;
        for captures in pattern.captures_iter(raw) {
            let whole = captures.get(0)?;
            let value: f64 = captures.get(1)?.as_str().parse().ok()?;
            let position = whole.start();

            let distance = label_positions
                .iter()
                .map(|&l| {
                    if position >= l {
                        position - l
                    } else {
                        (l - position).saturating_mul(BACKWARD_PENALTY)
                    }
                })
                .min()
                .unwrap_or(usize::MAX);

            if best.is_none_or(|(d, _)| distance < d) {
                best = Some((distance, value));
            }
        }

        match best {
            // A labeled match must sit within the window; an unlabeled text
            // gets the first pattern occurrence as a last resort
            Some((distance, value)) if label_positions.is_empty() || distance <= SCALAR_LABEL_WINDOW => {
                Some(value)
            }
            _ => None,
        }
    }
}

impl ExtractionStrategy for ScalarPatternStrategy {
    fn name(&self) -> &'static str {
        "scalar_pattern"
    }

    fn extract(&self, raw: &str, spec: &FieldSpec) -> Option<FieldMatch> {
        let pattern = Regex::new(Self::unit_pattern(spec.kind)?).ok()?;
        Self::nearest_match(raw, &pattern, spec.labels).map(|value| FieldMatch {
            value: ExtractedValue::Number(value),
            origin: MatchOrigin::ScalarPattern,
        })
    }
}

fn leading_number(s: &str) -> Option<f64> {
    let pattern = Regex::new(r"(\d+(?:\.\d+)?)").ok()?;
    pattern.captures(s)?.get(1)?.as_str().parse().ok()
}
