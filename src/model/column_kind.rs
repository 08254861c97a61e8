use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Whether a column's values carry a total order.
///
/// Continuous columns are sorted ascending at generation time, so row indices
/// double as value cut points. Discrete columns repeat a small vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum ColumnKind {
    Discrete,
    Continuous,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Discrete => "discrete",
            ColumnKind::Continuous => "continuous",
        }
    }
}

impl Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
