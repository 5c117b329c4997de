//! Per-record score accumulator.

use serde::{Deserialize, Serialize};

/// Tracks the distinct bad fields of a record and the rules that flagged them.
///
/// The score is the number of distinct bad fields, so it only ever grows:
/// marking a field that is already bad is a no-op and there is no way to
/// unmark a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ScoreCardFields")]
pub struct ScoreCard {
    bad_fields: Vec<String>,
    bad_reason_ids: Vec<u32>,
}

/// Serialized shape of a card. A `score` key, if present, is ignored.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScoreCardFields {
    #[serde(default)]
    bad_fields: Vec<String>,
    #[serde(default)]
    bad_reason_ids: Vec<u32>,
}

impl From<ScoreCardFields> for ScoreCard {
    fn from(fields: ScoreCardFields) -> Self {
        Self::hydrate(fields.bad_fields, fields.bad_reason_ids)
    }
}

impl ScoreCard {
    /// Create an empty score card.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a card from precomputed bad fields and reason ids.
    ///
    /// Duplicates are dropped, keeping first-seen order.
    pub fn hydrate(
        fields: impl IntoIterator<Item = String>,
        reason_ids: impl IntoIterator<Item = u32>,
    ) -> Self {
        let mut card = Self::new();
        for field in fields {
            card.mark_bad(&field);
        }
        for id in reason_ids {
            card.add_reason(id);
        }
        card
    }

    /// Record `field` as bad. Returns true if the field was not bad before.
    pub fn mark_bad(&mut self, field: &str) -> bool {
        if self.is_bad(field) {
            return false;
        }
        self.bad_fields.push(field.to_string());
        true
    }

    /// Record the id of a rule that contributed to the score.
    pub fn add_reason(&mut self, id: u32) {
        if !self.bad_reason_ids.contains(&id) {
            self.bad_reason_ids.push(id);
        }
    }

    pub fn is_bad(&self, field: &str) -> bool {
        self.bad_fields.iter().any(|existing| existing == field)
    }

    /// Number of distinct bad fields.
    pub fn score(&self) -> u32 {
        u32::try_from(self.bad_fields.len()).unwrap_or(u32::MAX)
    }

    /// Bad fields in the order they were first marked.
    pub fn bad_fields(&self) -> &[String] {
        &self.bad_fields
    }

    pub fn bad_reason_ids(&self) -> &[u32] {
        &self.bad_reason_ids
    }

    pub fn has_badness(&self) -> bool {
        !self.bad_fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marking_is_idempotent() {
        let mut card = ScoreCard::new();
        assert!(card.mark_bad("profileRef.name"));
        assert!(!card.mark_bad("profileRef.name"));
        assert_eq!(card.score(), 1);
        assert!(card.mark_bad("lastLogin"));
        assert_eq!(card.score(), 2);
        assert_eq!(card.bad_fields(), ["profileRef.name", "lastLogin"]);
    }

    #[test]
    fn reasons_are_distinct() {
        let mut card = ScoreCard::new();
        card.add_reason(3);
        card.add_reason(3);
        card.add_reason(1);
        assert_eq!(card.bad_reason_ids(), [3, 1]);
        assert_eq!(card.score(), 0);
    }

    #[test]
    fn hydrate_drops_duplicates() {
        let card = ScoreCard::hydrate(vec!["a".to_string(), "a".to_string()], vec![1, 1]);
        assert_eq!(card.score(), 1);
        assert_eq!(card.bad_fields(), ["a"]);
        assert_eq!(card.bad_reason_ids(), [1]);
    }

    #[test]
    fn deserialized_score_follows_bad_fields() {
        let card: ScoreCard = serde_json::from_str(
            r#"{ "score": 5, "badFields": ["a", "b", "a"], "badReasonIds": [2] }"#,
        )
        .unwrap();
        assert_eq!(card.score(), 2);
        assert_eq!(card.bad_fields(), ["a", "b"]);
    }
}
