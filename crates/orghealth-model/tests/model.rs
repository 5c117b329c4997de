//! Tests for orghealth-model scoring.

use proptest::prelude::*;
use serde_json::json;

use orghealth_model::{ModelError, Record, RuleDefinition, RuleRegistry};

#[test]
fn scoring_disabled_is_a_usage_error() {
    let record = Record::new(json!({ "label": "Contact.Email" }));
    let err = record.score().unwrap_err();
    assert!(matches!(err, ModelError::ScoringDisabled { .. }));
    assert_eq!(
        err.to_string(),
        "scoring is not enabled for record 'Contact.Email'"
    );
}

#[test]
fn registry_from_definitions() {
    let definitions: Vec<RuleDefinition> = serde_json::from_value(json!([
        { "id": 1, "description": "No description", "check": "empty", "path": "description" },
        { "id": 2, "description": "Never logged in", "check": "empty", "path": "lastLogin",
          "appliesTo": ["user"] },
        { "id": 3, "description": "Low usage", "check": "lessThan", "path": "usedPercentage",
          "value": 10.0, "badField": "usage" },
    ]))
    .unwrap();
    let registry: RuleRegistry = definitions
        .into_iter()
        .map(RuleDefinition::into_rule)
        .collect();
    assert_eq!(registry.len(), 3);

    let mut records = vec![
        Record::new(json!({ "kind": "user", "name": "Jane", "description": "Admin" })),
        Record::new(json!({ "kind": "field", "name": "Rating", "usedPercentage": 2.5 })),
    ];
    let total = registry.evaluate_all(&mut records).unwrap();
    assert_eq!(total, 3);
    assert_eq!(records[0].bad_fields(), ["lastLogin"]);
    assert_eq!(records[0].bad_reason_ids(), [2]);
    assert_eq!(records[1].bad_fields(), ["description", "usage"]);
    assert_eq!(records[1].score().unwrap(), 2);
}

#[test]
fn failing_formula_stops_evaluation() {
    let definitions: Vec<RuleDefinition> = serde_json::from_value(json!([
        { "id": 1, "description": "Too big", "check": "greaterThan", "path": "size", "value": 5 },
        { "id": 2, "description": "No description", "check": "empty", "path": "description" },
    ]))
    .unwrap();
    let registry: RuleRegistry = definitions
        .into_iter()
        .map(RuleDefinition::into_rule)
        .collect();
    let mut record = Record::new(json!({ "name": "Odd", "size": "huge" }));
    let err = registry.evaluate(&mut record).unwrap_err();
    assert!(matches!(err, ModelError::Formula { rule_id: 1, .. }));
    assert_eq!(record.score().unwrap(), 0);
}

#[test]
fn prescored_record_counts_distinct_fields() {
    let mut record = Record::from_value(json!({ "name": "Rating", "score": 5, "badFields": ["a"] }));
    assert_eq!(record.score().unwrap(), 1);
    assert!(record.mark_bad("b").unwrap());
    assert!(!record.mark_bad("a").unwrap());
    assert_eq!(record.score().unwrap(), 2);
    assert_eq!(record.bad_fields(), ["a", "b"]);
}

proptest! {
    #[test]
    fn marking_twice_equals_marking_once(fields in prop::collection::vec("[a-z]{1,6}(\\.[a-z]{1,4})?", 0..20)) {
        let mut once = Record::scored(json!({}));
        let mut twice = Record::scored(json!({}));
        for field in &fields {
            once.mark_bad(field).unwrap();
            twice.mark_bad(field).unwrap();
            twice.mark_bad(field).unwrap();
        }
        prop_assert_eq!(once.score().unwrap(), twice.score().unwrap());
        let mut distinct = fields.clone();
        distinct.sort();
        distinct.dedup();
        prop_assert_eq!(once.score().unwrap() as usize, distinct.len());
    }

    #[test]
    fn score_never_decreases(fields in prop::collection::vec("[a-c]{1,2}", 1..30)) {
        let mut record = Record::scored(json!({}));
        let mut previous = 0;
        for field in &fields {
            record.mark_bad(field).unwrap();
            let current = record.score().unwrap();
            prop_assert!(current >= previous);
            previous = current;
        }
    }
}
