use std::{collections::BTreeMap, fmt::Display, ops::Range, rc::Rc};

use log::trace;
use rand::{rngs::StdRng, seq::IndexedRandom, Rng, SeedableRng};

use crate::{
    error::{Result, TableError},
    model::{ColumnData, ColumnKind},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum ConstraintType {
    LessThan,
    GreaterThan,
    Range,
    Equal,
    NotEqual,
}

const CONTINUOUS_CONSTRAINTS: [ConstraintType; 3] = [
    ConstraintType::LessThan,
    ConstraintType::GreaterThan,
    ConstraintType::Range,
];
const DISCRETE_CONSTRAINTS: [ConstraintType; 2] = [ConstraintType::Equal, ConstraintType::NotEqual];

impl ConstraintType {
    /// The constraint types that can be applied to a column of `kind`.
    pub fn valid_for(kind: ColumnKind) -> &'static [ConstraintType] {
        match kind {
            ColumnKind::Continuous => &CONTINUOUS_CONSTRAINTS,
            ColumnKind::Discrete => &DISCRETE_CONSTRAINTS,
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            ConstraintType::LessThan | ConstraintType::GreaterThan | ConstraintType::Range => {
                ColumnKind::Continuous
            }
            ConstraintType::Equal | ConstraintType::NotEqual => ColumnKind::Discrete,
        }
    }

    pub fn get_title(&self) -> &'static str {
        match self {
            ConstraintType::LessThan => "Less Than",
            ConstraintType::GreaterThan => "Greater Than",
            ConstraintType::Range => "Range",
            ConstraintType::Equal => "Equal",
            ConstraintType::NotEqual => "Not Equal",
        }
    }
}

/// Where a range constraint sits relative to the current overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RangePlacement {
    /// Removes rows from the low end and runs past the last overlapping row.
    PastHigh,
    /// Removes rows from the high end and starts before the first overlapping row.
    PastLow,
    /// Both bounds fall between the first and last overlapping rows.
    Inside,
}

/// What a constraint resolved to for its column.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Selection {
    /// A contiguous span of the full row range.
    Rows(Range<usize>),
    /// Rows whose value does (`equal`) or does not match `value`.
    Value { value: String, equal: bool },
}

/// A rule over one column that narrows down which row is the answer.
///
/// The constraint is built against the rows that are still in play
/// (`overlapping_indices`) and must knock `reduce_amount` of them out.
/// Continuous constraints hit that amount exactly. Discrete ones get as close
/// as the column's value counts allow.
///
/// Any randomness is drawn from an rng rebuilt from `seed` on every call, so
/// [`Constraint::indices`] and [`Constraint::format`] always agree with each
/// other and with earlier calls.
#[derive(Debug, Clone)]
pub struct Constraint {
    pub constraint_type: ConstraintType,
    data: Rc<ColumnData>,
    overlapping_indices: Vec<usize>,
    reduce_amount: usize,
    seed: u64,
}

impl Constraint {
    pub fn new(
        constraint_type: ConstraintType,
        data: Rc<ColumnData>,
        overlapping_indices: &[usize],
        reduce_amount: usize,
        seed: u64,
    ) -> Result<Self> {
        if constraint_type.kind() != data.kind {
            return Err(TableError::ConstraintKindMismatch {
                constraint: constraint_type.get_title(),
                kind: data.kind,
            });
        }
        if data.num_rows() == 0 {
            return Err(TableError::InvalidLayout(format!(
                "column '{}' has no rows",
                data.name
            )));
        }
        let ascending = overlapping_indices.windows(2).all(|w| w[0] < w[1]);
        let in_range = overlapping_indices.iter().all(|&i| i < data.num_rows());
        if !ascending || !in_range {
            return Err(TableError::InvalidOverlap {
                indices: overlapping_indices.to_vec(),
                num_rows: data.num_rows(),
            });
        }
        if reduce_amount > overlapping_indices.len() {
            return Err(TableError::InfeasibleReduction {
                reduce_amount,
                overlapping: overlapping_indices.len(),
            });
        }

        Ok(Self {
            constraint_type,
            data,
            overlapping_indices: overlapping_indices.to_vec(),
            reduce_amount,
            seed,
        })
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn overlapping_indices(&self) -> &[usize] {
        &self.overlapping_indices
    }

    pub fn reduce_amount(&self) -> usize {
        self.reduce_amount
    }

    /// Every row of the column, in or out of the overlap, that satisfies this
    /// constraint. Ascending.
    pub fn indices(&self) -> Vec<usize> {
        match self.selection() {
            Selection::Rows(span) => span.collect(),
            Selection::Value { value, equal } => self
                .data
                .rows
                .iter()
                .enumerate()
                .filter(|(_, row)| (**row == value) == equal)
                .map(|(i, _)| i)
                .collect(),
        }
    }

    /// The rule as shown to the player, e.g. `age <= 57`.
    pub fn format(&self) -> String {
        let name = &self.data.name;
        let rows = &self.data.rows;
        match (self.constraint_type, self.selection()) {
            (ConstraintType::LessThan, Selection::Rows(span)) if span.is_empty() => {
                format!("{} < {}", name, rows[0])
            }
            (ConstraintType::LessThan, Selection::Rows(span)) => {
                format!("{} <= {}", name, rows[span.end - 1])
            }
            (ConstraintType::GreaterThan, Selection::Rows(span)) if span.is_empty() => {
                format!("{} > {}", name, rows[rows.len() - 1])
            }
            (ConstraintType::GreaterThan, Selection::Rows(span)) => {
                format!("{} >= {}", name, rows[span.start])
            }
            (_, Selection::Rows(span)) if span.is_empty() => format!("{} < {}", name, rows[0]),
            (_, Selection::Rows(span)) => {
                format!("{} <= {} <= {}", rows[span.start], name, rows[span.end - 1])
            }
            (_, Selection::Value { value, equal: true }) => format!("{} == {}", name, value),
            (_, Selection::Value { value, equal: false }) => format!("{} != {}", name, value),
        }
    }

    fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }

    fn kept(&self) -> usize {
        self.overlapping_indices.len() - self.reduce_amount
    }

    fn selection(&self) -> Selection {
        match self.constraint_type {
            ConstraintType::LessThan => Selection::Rows(self.less_than_span()),
            ConstraintType::GreaterThan => Selection::Rows(self.greater_than_span()),
            ConstraintType::Range => Selection::Rows(self.range_span()),
            ConstraintType::Equal => self.value_selection(true),
            ConstraintType::NotEqual => self.value_selection(false),
        }
    }

    /// A prefix of the rows ending at the last overlapping row that survives.
    fn less_than_span(&self) -> Range<usize> {
        match self.kept() {
            0 => 0..0,
            kept => 0..self.overlapping_indices[kept - 1] + 1,
        }
    }

    /// A suffix of the rows starting at the first overlapping row that survives.
    fn greater_than_span(&self) -> Range<usize> {
        let num_rows = self.data.num_rows();
        match self.kept() {
            0 => num_rows..num_rows,
            _ => self.overlapping_indices[self.reduce_amount]..num_rows,
        }
    }

    /// A contiguous span that keeps a contiguous run of `kept` overlapping rows.
    ///
    /// Each bound is placed anywhere in the gap between the last row it must
    /// exclude and the first row it must include, so the span only touches
    /// the overlap where it has to.
    fn range_span(&self) -> Range<usize> {
        let overlap = &self.overlapping_indices;
        let kept = self.kept();
        if kept == 0 {
            return 0..0;
        }
        let last_row = self.data.num_rows() - 1;
        let low_free = overlap[0] > 0;
        let high_free = overlap[overlap.len() - 1] < last_row;

        let mut placements = Vec::new();
        if high_free {
            placements.push(RangePlacement::PastHigh);
        }
        if low_free {
            placements.push(RangePlacement::PastLow);
        }
        if placements.is_empty() || (low_free && high_free) {
            placements.push(RangePlacement::Inside);
        }

        let mut rng = self.rng();
        let placement = *placements
            .choose(&mut rng)
            .unwrap_or(&RangePlacement::Inside);

        // Number of overlapping rows cut from the low end; the rest come off the top.
        let removed_low = match placement {
            RangePlacement::PastHigh => self.reduce_amount,
            RangePlacement::PastLow => 0,
            RangePlacement::Inside => rng.random_range(0..=self.reduce_amount),
        };
        let first_kept = overlap[removed_low];
        let last_kept = overlap[removed_low + kept - 1];
        let next_excluded = overlap.get(removed_low + kept).copied();

        let lower = match (placement, removed_low) {
            (RangePlacement::PastLow, _) => rng.random_range(0..first_kept),
            (_, 0) => first_kept,
            (_, n) => rng.random_range(overlap[n - 1] + 1..=first_kept),
        };
        let upper = match (placement, next_excluded) {
            (RangePlacement::PastHigh, _) => rng.random_range(last_kept + 1..=last_row),
            (_, Some(next)) => rng.random_range(last_kept..next),
            (_, None) => last_kept,
        };

        trace!(
            target: "constraint",
            "Range over '{}' placed {:?}: rows {}..={}",
            self.data.name,
            placement,
            lower,
            upper
        );
        lower..upper + 1
    }

    /// Pick the value whose match count leaves a number of overlapping rows
    /// closest to the target. Every value in the column is a candidate, even
    /// ones that no longer appear in the overlap, so a `!=` rule may name a
    /// value that no overlapping row carries.
    fn value_selection(&self, equal: bool) -> Selection {
        let mut counts: BTreeMap<&str, usize> =
            self.data.rows.iter().map(|r| (r.as_str(), 0)).collect();
        for &i in self.overlapping_indices.iter() {
            *counts.entry(self.data.rows[i].as_str()).or_insert(0) += 1;
        }

        let overlapping = self.overlapping_indices.len();
        let target = self.kept();
        let kept_with = |count: usize| if equal { count } else { overlapping - count };

        let best = counts
            .values()
            .map(|&count| kept_with(count).abs_diff(target))
            .min()
            .unwrap_or(0);
        let candidates: Vec<&str> = counts
            .iter()
            .filter(|(_, count)| kept_with(**count).abs_diff(target) == best)
            .map(|(value, _)| *value)
            .collect();

        let mut rng = self.rng();
        let value = candidates
            .choose(&mut rng)
            .map(|v| v.to_string())
            .unwrap_or_default();
        trace!(
            target: "constraint",
            "Value counts for '{}': {:?}; target {} kept, chose {} (equal: {})",
            self.data.name,
            counts,
            target,
            value,
            equal
        );
        Selection::Value { value, equal }
    }
}

impl Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format())
    }
}
