// ABOUTME: Layered response extractor turning raw model text into partially-filled structured drafts
// ABOUTME: Chain of named strategies - embedded JSON block, labeled heading/bullets, scalar patterns
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GMRP Coach

//! # Response Extractor
//!
//! Parses raw model output into structured drafts using a layered strategy
//! chain, attempted in order per field:
//!
//! 1. **Embedded-structure scan** - a fenced or bare JSON block, parsed
//!    directly when well-formed
//! 2. **Heading/bullet extraction** - a labeled heading (case-insensitive,
//!    tolerant of markdown emphasis) followed by dash/bullet lines
//! 3. **Scalar pattern extraction** - a label near a number-with-unit
//!    pattern (percentage, dollar amount, rating, grams)
//!
//! Extraction never fails: an unmatched field is simply absent, and absence
//! is resolved by the plan enricher's deterministic defaults, never here.
//! New strategies slot into the chain without touching existing ones.

mod drafts;
mod strategies;

pub use drafts::{
    parse_nutrition_response, parse_progress_response, parse_shopping_response,
    parse_wellness_response, NutritionDraft, ProgressDraft, ShoppingDraft, WellnessDraft,
};
pub use strategies::{EmbeddedBlockStrategy, LabeledSectionStrategy, ScalarPatternStrategy};

use tracing::debug;

// ============================================================================
// Field Specification
// ============================================================================

/// What shape of value a field expects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A list of bullet items
    Items,
    /// A single line of text
    Text,
    /// A percentage or 0-100 score ("85%", "85/100")
    Percent,
    /// A dollar amount ("$150", "$12.50")
    Dollar,
    /// A gram quantity ("45g")
    Grams,
}

/// Specification of one extractable field
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Key (possibly dotted path) inside an embedded JSON block
    pub key: &'static str,
    /// Labels to search for in free text, tried in order
    pub labels: &'static [&'static str],
    /// Expected value shape
    pub kind: FieldKind,
}

// ============================================================================
// Match Types
// ============================================================================

/// A value pulled out of raw model text
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractedValue {
    /// Bullet items, markers stripped, order preserved
    Items(Vec<String>),
    /// A single line of text
    Text(String),
    /// A parsed scalar
    Number(f64),
}

impl ExtractedValue {
    /// The value as a list of items, if it is one
    #[must_use]
    pub fn into_items(self) -> Option<Vec<String>> {
        match self {
            Self::Items(items) => Some(items),
            Self::Text(_) | Self::Number(_) => None,
        }
    }

    /// The value as text, if it is one
    #[must_use]
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            Self::Items(_) | Self::Number(_) => None,
        }
    }

    /// The value as a number, if it is one
    #[must_use]
    pub fn into_number(self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(n),
            Self::Items(_) | Self::Text(_) => None,
        }
    }
}

/// Which strategy produced a field value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOrigin {
    /// Parsed from an embedded JSON block
    EmbeddedBlock,
    /// Collected from a labeled heading's bullets
    LabeledSection,
    /// Parsed from a number-with-unit pattern near a label
    ScalarPattern,
}

/// A field value with its origin tag
#[derive(Debug, Clone)]
pub struct FieldMatch {
    /// Extracted value
    pub value: ExtractedValue,
    /// Which strategy produced it
    pub origin: MatchOrigin,
}

/// A value carried forward into a draft together with its origin
#[derive(Debug, Clone)]
pub struct Sourced<T> {
    /// The extracted value
    pub value: T,
    /// Which strategy produced it
    pub origin: MatchOrigin,
}

// ============================================================================
// Strategy Trait & Chain
// ============================================================================

/// A named extraction strategy.
///
/// Each strategy inspects the raw text independently and returns an
/// optional match with an origin tag; strategies never error.
pub trait ExtractionStrategy: Send + Sync {
    /// Strategy name for logging
    fn name(&self) -> &'static str;

    /// Try to extract the field from the raw text
    fn extract(&self, raw: &str, spec: &FieldSpec) -> Option<FieldMatch>;
}

/// Ordered chain of extraction strategies
pub struct ResponseExtractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl ResponseExtractor {
    /// The default three-tier chain
    #[must_use]
    pub fn new() -> Self {
        Self {
            strategies: vec![
                Box::new(EmbeddedBlockStrategy),
                Box::new(LabeledSectionStrategy),
                Box::new(ScalarPatternStrategy),
            ],
        }
    }

    /// A custom chain (strategies are tried in order)
    #[must_use]
    pub fn with_strategies(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Extract one field; the first strategy that yields a usable value wins
    #[must_use]
    pub fn extract_field(&self, raw: &str, spec: &FieldSpec) -> Option<FieldMatch> {
        for strategy in &self.strategies {
            if let Some(found) = strategy.extract(raw, spec) {
                debug!(field = spec.key, strategy = strategy.name(), "field extracted");
                return Some(found);
            }
        }
        debug!(field = spec.key, "field absent from model output");
        None
    }

    /// Extract a list field
    #[must_use]
    pub fn items(&self, raw: &str, spec: &FieldSpec) -> Option<Sourced<Vec<String>>> {
        let found = self.extract_field(raw, spec)?;
        let origin = found.origin;
        found.value.into_items().filter(|v| !v.is_empty()).map(|value| Sourced { value, origin })
    }

    /// Extract a text field
    #[must_use]
    pub fn text(&self, raw: &str, spec: &FieldSpec) -> Option<Sourced<String>> {
        let found = self.extract_field(raw, spec)?;
        let origin = found.origin;
        found
            .value
            .into_text()
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty())
            .map(|value| Sourced { value, origin })
    }

    /// Extract a numeric field
    #[must_use]
    pub fn number(&self, raw: &str, spec: &FieldSpec) -> Option<Sourced<f64>> {
        let found = self.extract_field(raw, spec)?;
        let origin = found.origin;
        found.value.into_number().map(|value| Sourced { value, origin })
    }
}

impl Default for ResponseExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHOPPING_SPEC: FieldSpec = FieldSpec {
        key: "shoppingList",
        labels: &["shopping list"],
        kind: FieldKind::Items,
    };

    #[test]
    fn test_labeled_bullets_extracted_in_order() {
        let raw = "Here is your plan.\n\
                   Shopping List:\n\
                   - Organic spinach\n\
                   - Wild salmon\n\
                   - Chia seeds\n\
                   \n\
                   Enjoy!";
        let extractor = ResponseExtractor::new();
        let found = extractor.items(raw, &SHOPPING_SPEC).unwrap();
        assert_eq!(
            found.value,
            vec!["Organic spinach", "Wild salmon", "Chia seeds"]
        );
        assert_eq!(found.origin, MatchOrigin::LabeledSection);
    }

    #[test]
    fn test_embedded_block_takes_precedence() {
        let raw = "```json\n{\"shoppingList\": [\"kale\", \"beans\"]}\n```\n\
                   Shopping List:\n- something else\n";
        let extractor = ResponseExtractor::new();
        let found = extractor.items(raw, &SHOPPING_SPEC).unwrap();
        assert_eq!(found.value, vec!["kale", "beans"]);
        assert_eq!(found.origin, MatchOrigin::EmbeddedBlock);
    }

    #[test]
    fn test_unmatched_field_is_absent_not_error() {
        let extractor = ResponseExtractor::new();
        assert!(extractor.items("no relevant content here", &SHOPPING_SPEC).is_none());
    }
}
