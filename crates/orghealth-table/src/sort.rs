//! Column sorting.
//!
//! Rows are ordered by a key extracted from one column. Empty keys (missing,
//! `null`, `""`, `false`) always end up after populated ones, whatever the
//! direction, so analysts see populated rows first.

use std::cmp::Ordering;

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cell::{Cell, CellData};
use crate::column::TableDefinition;
use crate::dependencies::DependencySummary;
use crate::error::{Result, TableError};
use crate::row::{Row, reindex_visible};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Asc),
            "desc" | "descending" => Some(Self::Desc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SortKey {
    Empty,
    Number(f64),
    Text(String),
}

impl SortKey {
    pub(crate) fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    fn from_value(value: Option<&Value>, as_datetime: bool) -> Self {
        match value {
            None | Some(Value::Null) | Some(Value::Bool(false)) => Self::Empty,
            Some(Value::Bool(true)) => Self::Number(1.0),
            Some(Value::Number(number)) => match number.as_f64() {
                Some(n) if !n.is_nan() => Self::Number(n),
                _ => Self::Empty,
            },
            Some(Value::String(text)) if text.is_empty() => Self::Empty,
            Some(Value::String(text)) => {
                if as_datetime && let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
                    return Self::Number(parsed.timestamp_millis() as f64);
                }
                Self::Text(text.to_uppercase())
            }
            Some(other) => Self::Text(other.to_string().to_uppercase()),
        }
    }

    /// Order two keys. Empty keys go last regardless of `order`.
    fn compare(&self, other: &Self, order: SortOrder) -> Ordering {
        let ordering = match (self, other) {
            (Self::Empty, Self::Empty) => return Ordering::Equal,
            (Self::Empty, _) => return Ordering::Greater,
            (_, Self::Empty) => return Ordering::Less,
            (Self::Number(a), Self::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
        };
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// Sort key of one cell.
///
/// Multi-valued cells sort by item count, links by label, dependency
/// summaries by their total number of items and index cells by the row's
/// current index. Everything else sorts by its `value`.
pub(crate) fn cell_key(cell: &Cell, row_index: usize) -> SortKey {
    match &cell.data {
        CellData::Index => SortKey::Number(row_index as f64),
        CellData::Texts(items) | CellData::Links(items) | CellData::Objects(items) => {
            SortKey::Number(items.len() as f64)
        }
        CellData::Link(fields) => SortKey::from_value(fields.get("label"), false),
        CellData::Dependencies(fields) => DependencySummary::from_value(fields.get("value"))
            .map_or(SortKey::Empty, |summary| {
                SortKey::Number(summary.count() as f64)
            }),
        CellData::DateTime(fields) => SortKey::from_value(fields.get("value"), true),
        CellData::Score(fields)
        | CellData::Text(fields)
        | CellData::Numeric(fields)
        | CellData::Percentage(fields)
        | CellData::Boolean(fields) => SortKey::from_value(fields.get("value"), false),
    }
}

/// Stable in-place sort of `rows` on `column_index`, then dense re-index of
/// visible rows.
pub fn sort_rows(
    definition: &TableDefinition,
    rows: &mut Vec<Row>,
    column_index: usize,
    order: SortOrder,
) -> Result<()> {
    if column_index >= definition.len() {
        return Err(TableError::ColumnOutOfRange {
            index: column_index,
            count: definition.len(),
        });
    }
    let mut keyed: Vec<(SortKey, Row)> = std::mem::take(rows)
        .into_iter()
        .map(|row| {
            let key = row
                .cells
                .get(column_index)
                .map_or(SortKey::Empty, |cell| cell_key(cell, row.index));
            (key, row)
        })
        .collect();
    keyed.sort_by(|(a, _), (b, _)| a.compare(b, order));
    rows.extend(keyed.into_iter().map(|(_, row)| row));
    reindex_visible(rows);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn key(value: Value) -> SortKey {
        SortKey::from_value(Some(&value), false)
    }

    #[test]
    fn falsy_values_are_empty_but_zero_is_not() {
        assert!(SortKey::from_value(None, false).is_empty());
        assert!(key(Value::Null).is_empty());
        assert!(key(json!("")).is_empty());
        assert!(key(json!(false)).is_empty());
        assert_eq!(key(json!(0)), SortKey::Number(0.0));
    }

    #[test]
    fn strings_compare_case_insensitively() {
        assert_eq!(
            key(json!("apple")).compare(&key(json!("Banana")), SortOrder::Asc),
            Ordering::Less
        );
        assert_eq!(
            key(json!("APPLE")).compare(&key(json!("apple")), SortOrder::Asc),
            Ordering::Equal
        );
    }

    #[test]
    fn empty_keys_are_last_in_both_directions() {
        let empty = SortKey::Empty;
        let one = SortKey::Number(1.0);
        assert_eq!(empty.compare(&one, SortOrder::Asc), Ordering::Greater);
        assert_eq!(empty.compare(&one, SortOrder::Desc), Ordering::Greater);
        assert_eq!(one.compare(&empty, SortOrder::Desc), Ordering::Less);
    }

    #[test]
    fn datetimes_compare_chronologically() {
        let earlier = SortKey::from_value(Some(&json!("2024-01-01T10:00:00+02:00")), true);
        let later = SortKey::from_value(Some(&json!("2024-01-01T09:00:00Z")), true);
        assert_eq!(earlier.compare(&later, SortOrder::Asc), Ordering::Less);
    }

    #[test]
    fn parse_order() {
        assert_eq!(SortOrder::parse("DESC"), Some(SortOrder::Desc));
        assert_eq!(SortOrder::parse("asc"), Some(SortOrder::Asc));
        assert_eq!(SortOrder::parse("up"), None);
    }
}
