use thiserror::Error;

/// Boxed error returned by caller-supplied formulas and templates.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur when scoring records.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A scoring operation was called on a record that never enabled scoring.
    #[error("scoring is not enabled for record '{record}'")]
    ScoringDisabled { record: String },

    /// A score rule formula failed while evaluating a record.
    #[error("score rule {rule_id} ({description}) failed on record '{record}'")]
    Formula {
        rule_id: u32,
        description: String,
        record: String,
        #[source]
        source: BoxError,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
