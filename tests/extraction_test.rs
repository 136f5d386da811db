// ABOUTME: Extractor-chain robustness tests over hand-crafted raw model output
// ABOUTME: Exercises the embedded-block, labeled-section, and scalar tiers and their precedence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GMRP Coach

use gmrp_coach::extract::{
    parse_nutrition_response, parse_progress_response, parse_wellness_response, MatchOrigin,
};

#[test]
fn labeled_shopping_list_yields_exact_items_in_order() {
    let raw = "\
Here's what to buy for the next three days.

Shopping List:
- Organic spinach
-  Wild salmon
- Chia seeds

Have a great week!
";
    let draft = parse_nutrition_response(raw);
    let list = draft.shopping_list.unwrap();
    assert_eq!(
        list.value,
        vec!["Organic spinach", "Wild salmon", "Chia seeds"]
    );
    assert_eq!(list.origin, MatchOrigin::LabeledSection);
}

#[test]
fn markdown_emphasis_and_numbering_are_tolerated() {
    let raw = "\
## 6. **Shopping List**
* Kale
* Lentils
• Sauerkraut
";
    let draft = parse_nutrition_response(raw);
    assert_eq!(
        draft.shopping_list.unwrap().value,
        vec!["Kale", "Lentils", "Sauerkraut"]
    );
}

#[test]
fn embedded_json_block_wins_over_headings() {
    let raw = r#"Intro prose.

```json
{
  "greeting": "Day 30 - a full month!",
  "dailyPlan": [
    {"title": "Morning walk", "completed": false},
    {"title": "Prep lunch", "completed": false}
  ],
  "mealPlan": {"breakfast": "Overnight oats", "snacks": ["Almonds"]},
  "shoppingList": ["Oats", "Almonds"]
}
```

Daily Plan:
- This should be ignored
"#;
    let wellness = parse_wellness_response(raw);
    let tasks = wellness.daily_tasks.unwrap();
    assert_eq!(tasks.origin, MatchOrigin::EmbeddedBlock);
    assert_eq!(tasks.value, vec!["Morning walk", "Prep lunch"]);

    let nutrition = parse_nutrition_response(raw);
    assert_eq!(nutrition.breakfast.unwrap().value, "Overnight oats");
    assert_eq!(nutrition.snacks.unwrap().value, vec!["Almonds"]);
}

#[test]
fn malformed_json_falls_through_to_headings() {
    let raw = "\
```json
{ this is not valid json
```

Daily Plan:
- Real task one
- Real task two
";
    let draft = parse_wellness_response(raw);
    let tasks = draft.daily_tasks.unwrap();
    assert_eq!(tasks.origin, MatchOrigin::LabeledSection);
    assert_eq!(tasks.value.len(), 2);
}

#[test]
fn scalar_extraction_finds_labeled_numbers() {
    let draft = parse_progress_response("Your overall progress score is 68% this week.");
    assert!((draft.overall_score.unwrap().value - 68.0).abs() < f64::EPSILON);

    let draft = parse_nutrition_response("Today target: fiber 38g from whole foods.");
    assert!((draft.fiber_target_grams.unwrap().value - 38.0).abs() < f64::EPSILON);
}

#[test]
fn absent_fields_stay_absent_without_errors() {
    let draft = parse_wellness_response("Completely unrelated text with no structure at all.");
    assert!(draft.greeting.is_none());
    assert!(draft.daily_tasks.is_none());
    assert!(draft.recommendations.is_none());
    assert!(draft.next_steps.is_none());
    assert!(!draft.is_usable());

    // Numbers are never invented
    let draft = parse_progress_response("No score was given this time.");
    assert!(draft.overall_score.is_none());
}

#[test]
fn crlf_line_endings_are_handled() {
    let raw = "Shopping List:\r\n- Item one\r\n- Item two\r\n";
    let draft = parse_nutrition_response(raw);
    let list = draft.shopping_list.unwrap();
    assert_eq!(list.value, vec!["Item one", "Item two"]);
}
