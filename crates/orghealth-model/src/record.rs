//! Domain records consumed by the table pipeline.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{ModelError, Result};
use crate::path;
use crate::score::ScoreCard;

/// A loosely typed domain record (user, field, class, flow, ...).
///
/// Any JSON value can be wrapped. Records that take part in scoring carry a
/// [`ScoreCard`]; the scoring accessors fail for records without one.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct Record {
    value: Value,
    scoring: Option<ScoreCard>,
}

impl Record {
    /// Wrap a value without scoring.
    pub fn new(value: Value) -> Self {
        Self {
            value,
            scoring: None,
        }
    }

    /// Wrap a value with scoring enabled and an empty score card.
    pub fn scored(value: Value) -> Self {
        Self {
            value,
            scoring: Some(ScoreCard::new()),
        }
    }

    /// Wrap a value produced by the dataset layer.
    ///
    /// Scoring is enabled when the value carries `score`, `badFields` or
    /// `badReasonIds`. The card is rebuilt from the bad fields and reason
    /// ids; its score is always the count of distinct bad fields.
    pub fn from_value(value: Value) -> Self {
        let scoring = hydrate_score_card(&value);
        Self { value, scoring }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    /// Resolve a dotted path against the record.
    pub fn get(&self, path: &str) -> Option<&Value> {
        path::resolve(&self.value, path)
    }

    /// Display name: `name`, falling back to `label`.
    pub fn name(&self) -> &str {
        self.get("name")
            .and_then(Value::as_str)
            .or_else(|| self.get("label").and_then(Value::as_str))
            .unwrap_or_default()
    }

    /// Record kind (`user`, `field`, ...) used to select score rules.
    pub fn kind(&self) -> Option<&str> {
        self.get("kind").and_then(Value::as_str)
    }

    pub fn is_scored(&self) -> bool {
        self.scoring.is_some()
    }

    /// Enable scoring, keeping an existing card untouched.
    pub fn enable_scoring(&mut self) -> &mut ScoreCard {
        self.scoring.get_or_insert_with(ScoreCard::new)
    }

    pub fn score_card(&self) -> Option<&ScoreCard> {
        self.scoring.as_ref()
    }

    /// Mark `field` as bad. Returns true if it was not already bad.
    pub fn mark_bad(&mut self, field: &str) -> Result<bool> {
        Ok(self.card_mut()?.mark_bad(field))
    }

    /// Attach the id of the rule responsible for a deduction.
    pub fn add_reason(&mut self, id: u32) -> Result<()> {
        self.card_mut()?.add_reason(id);
        Ok(())
    }

    pub fn is_bad(&self, field: &str) -> Result<bool> {
        Ok(self.card()?.is_bad(field))
    }

    pub fn score(&self) -> Result<u32> {
        Ok(self.card()?.score())
    }

    /// Bad fields, empty for records without scoring.
    pub fn bad_fields(&self) -> &[String] {
        self.scoring
            .as_ref()
            .map(ScoreCard::bad_fields)
            .unwrap_or_default()
    }

    /// Bad reason ids, empty for records without scoring.
    pub fn bad_reason_ids(&self) -> &[u32] {
        self.scoring
            .as_ref()
            .map(ScoreCard::bad_reason_ids)
            .unwrap_or_default()
    }

    fn card(&self) -> Result<&ScoreCard> {
        self.scoring
            .as_ref()
            .ok_or_else(|| ModelError::ScoringDisabled {
                record: self.name().to_string(),
            })
    }

    fn card_mut(&mut self) -> Result<&mut ScoreCard> {
        let record = self.name().to_string();
        self.scoring
            .as_mut()
            .ok_or(ModelError::ScoringDisabled { record })
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

fn hydrate_score_card(value: &Value) -> Option<ScoreCard> {
    let fields = value.get("badFields");
    let reasons = value.get("badReasonIds");
    if value.get("score").is_none() && fields.is_none() && reasons.is_none() {
        return None;
    }
    let fields = fields
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    let reasons = reasons
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(reason_id).collect::<Vec<_>>())
        .unwrap_or_default();
    Some(ScoreCard::hydrate(fields, reasons))
}

fn reason_id(value: &Value) -> Option<u32> {
    match value {
        Value::Number(number) => number.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_records_reject_scoring_calls() {
        let mut record = Record::new(json!({ "name": "Jane" }));
        assert!(matches!(
            record.score(),
            Err(ModelError::ScoringDisabled { ref record }) if record == "Jane"
        ));
        assert!(record.is_bad("x").is_err());
        assert!(record.mark_bad("x").is_err());
        assert!(record.bad_fields().is_empty());
    }

    #[test]
    fn from_value_hydrates_score_metadata() {
        let record = Record::from_value(json!({
            "label": "Account.Rating",
            "score": 2,
            "badFields": ["description", "description", "isCustom"],
            "badReasonIds": [4, "7", "x"],
        }));
        assert_eq!(record.name(), "Account.Rating");
        assert_eq!(record.score().unwrap(), 2);
        assert_eq!(record.bad_fields(), ["description", "isCustom"]);
        assert_eq!(record.bad_reason_ids(), [4, 7]);
    }

    #[test]
    fn from_value_without_metadata_is_unscored() {
        let record: Record = serde_json::from_value(json!({ "name": "Flow" })).unwrap();
        assert!(!record.is_scored());
    }

    #[test]
    fn enable_scoring_keeps_existing_card() {
        let mut record = Record::scored(json!({}));
        record.mark_bad("a").unwrap();
        record.enable_scoring();
        assert_eq!(record.score().unwrap(), 1);
    }
}
