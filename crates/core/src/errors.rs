use thiserror::Error;

/// Failures the engine can report. Every variant is raised synchronously at
/// the offending call; there are no transient failure modes and no retries.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// A malformed or out-of-range input row, reported with the identifier
    /// of the row that failed so it is never silently dropped.
    #[error("invalid row `{row}`: {reason}")]
    Validation { row: String, reason: String },
    /// A caller-supplied parameter outside the engine's contract, e.g.
    /// `top_k == 0` or an unknown insight rule key.
    #[error("configuration failure: {0}")]
    Configuration(String),
    /// A metric that is mathematically undefined on the given input. This is
    /// distinct from a legitimate zero: an empty customer table has no
    /// coverage ratio at all.
    #[error("metric `{metric}` is undefined for the given input")]
    Undefined { metric: &'static str },
}

impl EngineError {
    pub fn validation(row: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation { row: row.into(), reason: reason.into() }
    }
}
