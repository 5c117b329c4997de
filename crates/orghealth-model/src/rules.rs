//! Score rules and the registry that applies them to records.
//!
//! A rule is a predicate over a [`Record`]. When the predicate reports a
//! violation the rule's bad field is marked on the record and the rule id is
//! kept as the reason, so a row can later explain its score one line per
//! rule.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use crate::error::{BoxError, ModelError, Result};
use crate::path;
use crate::record::Record;

type Formula = Arc<dyn Fn(&Record) -> std::result::Result<bool, BoxError> + Send + Sync>;

/// A single scoring rule.
#[derive(Clone)]
pub struct ScoreRule {
    pub id: u32,
    pub description: String,
    pub error_message: String,
    /// Field path marked bad when the rule is violated.
    pub bad_field: String,
    /// Record kinds the rule applies to. Empty means every kind.
    pub applies_to: Vec<String>,
    formula: Formula,
}

impl ScoreRule {
    /// Create a rule. `formula` returns `Ok(true)` when the record violates it.
    pub fn new<F>(
        id: u32,
        description: impl Into<String>,
        bad_field: impl Into<String>,
        formula: F,
    ) -> Self
    where
        F: Fn(&Record) -> std::result::Result<bool, BoxError> + Send + Sync + 'static,
    {
        let description = description.into();
        Self {
            id,
            error_message: description.clone(),
            description,
            bad_field: bad_field.into(),
            applies_to: Vec::new(),
            formula: Arc::new(formula),
        }
    }

    #[must_use]
    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = message.into();
        self
    }

    #[must_use]
    pub fn applies_to<I, S>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.applies_to = kinds.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_applicable(&self, kind: Option<&str>) -> bool {
        if self.applies_to.is_empty() {
            return true;
        }
        kind.is_some_and(|kind| self.applies_to.iter().any(|k| k.eq_ignore_ascii_case(kind)))
    }

    /// Run the formula without touching the record's score.
    pub fn check(&self, record: &Record) -> std::result::Result<bool, BoxError> {
        (self.formula)(record)
    }
}

impl fmt::Debug for ScoreRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoreRule")
            .field("id", &self.id)
            .field("description", &self.description)
            .field("bad_field", &self.bad_field)
            .field("applies_to", &self.applies_to)
            .finish_non_exhaustive()
    }
}

/// Registry of score rules indexed by id.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: BTreeMap<u32, ScoreRule>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a rule, replacing any rule with the same id.
    pub fn insert(&mut self, rule: ScoreRule) {
        self.rules.insert(rule.id, rule);
    }

    pub fn get(&self, id: u32) -> Option<&ScoreRule> {
        self.rules.get(&id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate rules in id order.
    pub fn iter(&self) -> impl Iterator<Item = &ScoreRule> {
        self.rules.values()
    }

    /// Human-readable reason for a rule id, used when exporting scores.
    pub fn reason_label(&self, id: u32) -> Option<String> {
        self.get(id).map(|rule| rule.description.clone())
    }

    /// Apply every applicable rule to `record`.
    ///
    /// Scoring is enabled on the record if it was not. Returns the number of
    /// rules that reported a violation. Evaluation stops at the first formula
    /// that fails.
    pub fn evaluate(&self, record: &mut Record) -> Result<usize> {
        record.enable_scoring();
        let mut violations = 0;
        for rule in self.rules.values() {
            if !rule.is_applicable(record.kind()) {
                continue;
            }
            let violated = rule.check(record).map_err(|source| ModelError::Formula {
                rule_id: rule.id,
                description: rule.description.clone(),
                record: record.name().to_string(),
                source,
            })?;
            if violated {
                trace!(rule = rule.id, field = %rule.bad_field, record = record.name(), "rule violated");
                record.mark_bad(&rule.bad_field)?;
                record.add_reason(rule.id)?;
                violations += 1;
            }
        }
        Ok(violations)
    }

    /// Apply the registry to every record.
    pub fn evaluate_all(&self, records: &mut [Record]) -> Result<usize> {
        let mut total = 0;
        for record in records.iter_mut() {
            total += self.evaluate(record)?;
        }
        debug!(
            records = records.len(),
            rules = self.len(),
            violations = total,
            "scored records"
        );
        Ok(total)
    }
}

/// Declarative predicate used by configuration-defined rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "check", rename_all = "camelCase")]
pub enum RuleCheck {
    /// Violated when the value is missing, null, `""` or `[]`.
    Empty { path: String },
    /// Violated when the value is present and not blank.
    NotEmpty { path: String },
    /// Violated when the numeric value is below `value`.
    LessThan { path: String, value: f64 },
    /// Violated when the numeric value is above `value`.
    GreaterThan { path: String, value: f64 },
    /// Violated when the value is `true`.
    IsTrue { path: String },
    /// Violated when the value is `false`.
    IsFalse { path: String },
}

impl RuleCheck {
    pub fn path(&self) -> &str {
        match self {
            Self::Empty { path }
            | Self::NotEmpty { path }
            | Self::LessThan { path, .. }
            | Self::GreaterThan { path, .. }
            | Self::IsTrue { path }
            | Self::IsFalse { path } => path,
        }
    }

    /// Evaluate the check. Comparisons against a present, non-numeric value
    /// are errors; a missing value never violates a comparison.
    pub fn evaluate(&self, record: &Record) -> std::result::Result<bool, BoxError> {
        let value = record.get(self.path());
        match self {
            Self::Empty { .. } => Ok(path::is_blank(value)),
            Self::NotEmpty { .. } => Ok(!path::is_blank(value)),
            Self::LessThan { path, value: limit } => {
                Ok(numeric(path, value)?.is_some_and(|n| n < *limit))
            }
            Self::GreaterThan { path, value: limit } => {
                Ok(numeric(path, value)?.is_some_and(|n| n > *limit))
            }
            Self::IsTrue { .. } => Ok(value.and_then(Value::as_bool) == Some(true)),
            Self::IsFalse { .. } => Ok(value.and_then(Value::as_bool) == Some(false)),
        }
    }
}

fn numeric(path: &str, value: Option<&Value>) -> std::result::Result<Option<f64>, BoxError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => Ok(number.as_f64()),
        Some(other) => Err(format!("value at '{path}' is not numeric: {other}").into()),
    }
}

/// A rule as written in a configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDefinition {
    pub id: u32,
    pub description: String,
    #[serde(default)]
    pub error_message: Option<String>,
    /// Defaults to the checked path.
    #[serde(default)]
    pub bad_field: Option<String>,
    #[serde(default)]
    pub applies_to: Vec<String>,
    #[serde(flatten)]
    pub check: RuleCheck,
}

impl RuleDefinition {
    pub fn into_rule(self) -> ScoreRule {
        let bad_field = self
            .bad_field
            .unwrap_or_else(|| self.check.path().to_string());
        let check = self.check;
        let mut rule = ScoreRule::new(self.id, self.description, bad_field, move |record| {
            check.evaluate(record)
        })
        .applies_to(self.applies_to);
        if let Some(message) = self.error_message {
            rule = rule.with_error_message(message);
        }
        rule
    }
}

impl FromIterator<ScoreRule> for RuleRegistry {
    fn from_iter<T: IntoIterator<Item = ScoreRule>>(iter: T) -> Self {
        let mut registry = Self::new();
        for rule in iter {
            registry.insert(rule);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> RuleRegistry {
        [
            ScoreRule::new(1, "No description", "description", |r: &Record| {
                Ok(path::is_blank(r.get("description")))
            }),
            ScoreRule::new(2, "Old API version", "apiVersion", |r: &Record| {
                Ok(r.get("apiVersion").and_then(Value::as_f64).is_some_and(|v| v < 50.0))
            })
            .applies_to(["apexClass"]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn evaluate_marks_fields_and_reasons() {
        let rules = registry();
        let mut record = Record::new(json!({ "kind": "apexClass", "apiVersion": 40 }));
        let violations = rules.evaluate(&mut record).unwrap();
        assert_eq!(violations, 2);
        assert_eq!(record.score().unwrap(), 2);
        assert_eq!(record.bad_fields(), ["description", "apiVersion"]);
        assert_eq!(record.bad_reason_ids(), [1, 2]);
    }

    #[test]
    fn rules_are_filtered_by_kind() {
        let rules = registry();
        let mut record = Record::new(json!({ "kind": "user", "apiVersion": 40, "description": "x" }));
        assert_eq!(rules.evaluate(&mut record).unwrap(), 0);
        assert_eq!(record.score().unwrap(), 0);
    }

    #[test]
    fn evaluating_twice_does_not_double_count() {
        let rules = registry();
        let mut record = Record::new(json!({ "kind": "apexClass", "apiVersion": 40 }));
        rules.evaluate(&mut record).unwrap();
        rules.evaluate(&mut record).unwrap();
        assert_eq!(record.score().unwrap(), 2);
    }

    #[test]
    fn formula_errors_carry_context() {
        let mut rules = RuleRegistry::new();
        rules.insert(ScoreRule::new(9, "Broken", "x", |_: &Record| {
            Err("boom".into())
        }));
        let mut record = Record::new(json!({ "name": "MyFlow" }));
        let err = rules.evaluate(&mut record).unwrap_err();
        match err {
            ModelError::Formula {
                rule_id,
                description,
                record,
                source,
            } => {
                assert_eq!(rule_id, 9);
                assert_eq!(description, "Broken");
                assert_eq!(record, "MyFlow");
                assert_eq!(source.to_string(), "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn reason_labels() {
        let rules = registry();
        assert_eq!(rules.reason_label(2).as_deref(), Some("Old API version"));
        assert_eq!(rules.reason_label(42), None);
    }

    #[test]
    fn rule_definitions_deserialize() {
        let definition: RuleDefinition = serde_json::from_value(json!({
            "id": 7,
            "description": "Inactive user",
            "appliesTo": ["user"],
            "check": "isFalse",
            "path": "isActive",
        }))
        .unwrap();
        assert_eq!(
            definition.check,
            RuleCheck::IsFalse {
                path: "isActive".to_string()
            }
        );
        let rule = definition.into_rule();
        assert_eq!(rule.bad_field, "isActive");
        let inactive = Record::new(json!({ "kind": "user", "isActive": false }));
        assert!(rule.check(&inactive).unwrap());
    }

    #[test]
    fn comparison_checks() {
        let check = RuleCheck::LessThan {
            path: "usage".to_string(),
            value: 10.0,
        };
        assert!(check.evaluate(&Record::new(json!({ "usage": 3 }))).unwrap());
        assert!(!check.evaluate(&Record::new(json!({ "usage": 30 }))).unwrap());
        assert!(!check.evaluate(&Record::new(json!({}))).unwrap());
        assert!(check.evaluate(&Record::new(json!({ "usage": "low" }))).is_err());
    }
}
