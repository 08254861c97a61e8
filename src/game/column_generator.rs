use log::trace;
use rand::{seq::IndexedRandom, Rng};

use super::{continuous_columns::ContinuousColumn, discrete_columns::DiscreteColumn};
use crate::{
    error::{Result, TableError},
    model::{ColumnData, ColumnKind},
};

/// One column type that can appear in a puzzle table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnGenerator {
    Continuous(ContinuousColumn),
    Discrete(DiscreteColumn),
}

impl ColumnGenerator {
    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnGenerator::Continuous(_) => ColumnKind::Continuous,
            ColumnGenerator::Discrete(_) => ColumnKind::Discrete,
        }
    }

    pub fn names(&self) -> &'static [&'static str] {
        match self {
            ColumnGenerator::Continuous(column) => column.names(),
            ColumnGenerator::Discrete(column) => column.vocabulary.names(),
        }
    }

    /// Generate `rows` rows of data under a randomly chosen display name.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R, rows: usize) -> Result<ColumnData> {
        if rows == 0 {
            return Err(TableError::InvalidLayout(
                "a column needs at least one row".to_string(),
            ));
        }
        let data = match self {
            ColumnGenerator::Continuous(column) => column.generate_rows(rng, rows)?,
            ColumnGenerator::Discrete(column) => column.generate_rows(rng, rows),
        };
        let name = self.names().choose(rng).copied().unwrap_or("column");
        trace!(
            target: "columns",
            "Generated {:?} as '{}': {:?}",
            self,
            name,
            data
        );
        Ok(ColumnData::new(name, data, self.kind()))
    }
}
