//! Domain records, score cards and score rules for org health tables.
//!
//! Records arrive from the dataset layer as loosely typed JSON. Scoring
//! marks the fields of a record that violate a rule; the number of distinct
//! bad fields is the record's score.

pub mod error;
pub mod path;
pub mod record;
pub mod rules;
pub mod score;

pub use error::{BoxError, ModelError, Result};
pub use record::Record;
pub use rules::{RuleCheck, RuleDefinition, RuleRegistry, ScoreRule};
pub use score::ScoreCard;
