use thiserror::Error;

use crate::model::ColumnKind;

/// Errors raised while generating a puzzle table.
///
/// None of these are retried internally. A caller that hits one during
/// [`crate::game::Table::generate`] should throw the half-built table away and
/// start a fresh round.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("a discrete column needs more than one possible value (max_discrete_values = {max_discrete_values})")]
    TooFewDiscreteValues { max_discrete_values: usize },

    #[error("cannot remove {reduce_amount} rows when only {overlapping} rows overlap")]
    InfeasibleReduction {
        reduce_amount: usize,
        overlapping: usize,
    },

    #[error("overlapping indices must be strictly ascending and below {num_rows}: {indices:?}")]
    InvalidOverlap {
        indices: Vec<usize>,
        num_rows: usize,
    },

    #[error("{constraint} cannot be applied to a {kind} column")]
    ConstraintKindMismatch {
        constraint: &'static str,
        kind: ColumnKind,
    },

    #[error("cannot draw {rows} distinct values from a domain of {domain}")]
    DomainTooSmall { rows: usize, domain: u64 },

    #[error("invalid table layout: {0}")]
    InvalidLayout(String),

    #[error("discrete column '{name}' cannot follow a continuous column")]
    OrderingViolation { name: String },

    #[error("{0}")]
    Settings(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TableError>;
