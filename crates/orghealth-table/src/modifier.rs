//! Value decoration rules.
//!
//! A modifier never changes the resolved data of a cell; it only computes
//! the `decoration` a renderer shows instead of the raw value. Rules are
//! checked against the raw value in a fixed order and the first rule that
//! produces a decoration wins:
//!
//! 1. `value_if_empty`
//! 2. `minimum` / `value_before_min`
//! 3. `maximum` / `value_after_max`
//! 4. `maximum_length`
//!
//! `preformatted` is independent of the others.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use orghealth_model::path;

/// Suffix appended to strings cut by `maximum_length`.
pub const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Modifier {
    pub maximum_length: Option<usize>,
    pub value_if_empty: Option<String>,
    pub preformatted: bool,
    pub minimum: Option<f64>,
    pub value_before_min: Option<String>,
    pub maximum: Option<f64>,
    pub value_after_max: Option<String>,
}

impl Modifier {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_maximum_length(mut self, length: usize) -> Self {
        self.maximum_length = Some(length);
        self
    }

    #[must_use]
    pub fn with_value_if_empty(mut self, value: impl Into<String>) -> Self {
        self.value_if_empty = Some(value.into());
        self
    }

    #[must_use]
    pub fn preformatted(mut self) -> Self {
        self.preformatted = true;
        self
    }

    #[must_use]
    pub fn with_minimum(mut self, minimum: f64, value: impl Into<String>) -> Self {
        self.minimum = Some(minimum);
        self.value_before_min = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_maximum(mut self, maximum: f64, value: impl Into<String>) -> Self {
        self.maximum = Some(maximum);
        self.value_after_max = Some(value.into());
        self
    }

    /// Decoration for a raw value, if any rule applies.
    pub fn decoration(&self, raw: Option<&Value>) -> Option<String> {
        self.empty_decoration(raw)
            .or_else(|| self.threshold_decoration(raw))
            .or_else(|| self.length_decoration(raw))
    }

    /// Only the `value_if_empty` rule. Multi-valued cells use this for the
    /// cell as a whole and the full rule set for each item.
    pub fn empty_decoration(&self, raw: Option<&Value>) -> Option<String> {
        if path::is_blank(raw) {
            self.value_if_empty.clone()
        } else {
            None
        }
    }

    fn threshold_decoration(&self, raw: Option<&Value>) -> Option<String> {
        let number = raw.and_then(Value::as_f64)?;
        if let (Some(minimum), Some(value)) = (self.minimum, &self.value_before_min)
            && number < minimum
        {
            return Some(value.clone());
        }
        if let (Some(maximum), Some(value)) = (self.maximum, &self.value_after_max)
            && number > maximum
        {
            return Some(value.clone());
        }
        None
    }

    fn length_decoration(&self, raw: Option<&Value>) -> Option<String> {
        let limit = self.maximum_length?;
        let text = raw.and_then(Value::as_str)?;
        if text.chars().count() <= limit {
            return None;
        }
        let mut cut: String = text.chars().take(limit).collect();
        cut.push_str(ELLIPSIS);
        Some(cut)
    }
}
