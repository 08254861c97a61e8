use std::{collections::BTreeSet, rc::Rc};

use itertools::Itertools;
use log::{debug, info, trace};
use rand::{
    rngs::StdRng,
    seq::{IndexedRandom, SliceRandom},
    RngCore, SeedableRng,
};

use super::{
    column_generator::ColumnGenerator,
    constraint::{Constraint, ConstraintType},
    continuous_columns::ContinuousColumn,
    discrete_columns::{DiscreteColumn, DiscreteVocabulary},
    sampling::{round_div, take_random_cycle},
    settings::TableSettings,
};
use crate::{
    error::{Result, TableError},
    helpers::format_table,
    model::{ColumnData, ColumnKind},
};

const COLUMN_SEPARATOR: &str = "  ";

/// A column's data together with the rule attached to it.
#[derive(Debug, Clone)]
pub struct Column {
    pub data: Rc<ColumnData>,
    pub constraint: Constraint,
}

/// The puzzle for one round of the database query game.
///
/// Columns are generated one at a time. Each new column gets a constraint
/// sized to remove its share of the rows still in play, and once the last
/// column is in exactly one row satisfies every constraint.
pub struct Table {
    pub num_rows: usize,
    pub num_columns: usize,
    pub seed: u64,
    columns: Vec<Column>,
    rng: StdRng,
}

impl Table {
    pub fn new(num_rows: usize, num_columns: usize, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or(rand::rng().next_u64());
        Self {
            num_rows,
            num_columns,
            seed,
            columns: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Build a complete table for `settings`.
    pub fn generate(settings: &TableSettings) -> Result<Table> {
        settings.validate()?;
        let mut table = Table::new(settings.num_rows, settings.num_columns, settings.seed);
        table.create_table(settings.discrete_columns(), settings.max_discrete_values)?;
        Ok(table)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Rows that satisfy every constraint so far, ascending. With no columns
    /// yet, that is every row.
    pub fn overlapping_indices(&self) -> Vec<usize> {
        let mut columns = self.columns.iter();
        let Some(first) = columns.next() else {
            return (0..self.num_rows).collect();
        };
        let mut common: BTreeSet<usize> = first.constraint.indices().into_iter().collect();
        for column in columns {
            let indices: BTreeSet<usize> = column.constraint.indices().into_iter().collect();
            common = common.intersection(&indices).copied().collect();
        }
        common.into_iter().collect()
    }

    pub fn overlapping_rows(&self) -> usize {
        self.overlapping_indices().len()
    }

    pub fn remaining_columns(&self) -> usize {
        self.num_columns - self.columns.len()
    }

    pub fn is_complete(&self) -> bool {
        self.remaining_columns() == 0
    }

    /// How many overlapping rows the next column's constraint has to remove.
    ///
    /// One row is held back so the last column still leaves an answer.
    pub fn reduce_amount(&self) -> usize {
        match self.remaining_columns() {
            0 => 0,
            remaining => round_div(self.overlapping_rows(), remaining).saturating_sub(1),
        }
    }

    /// The answer row, once the table is complete.
    pub fn solution(&self) -> Option<usize> {
        if !self.is_complete() {
            return None;
        }
        match self.overlapping_indices().as_slice() {
            [row] => Some(*row),
            _ => None,
        }
    }

    /// Whether `row` is an accepted answer.
    pub fn submit(&self, row: usize) -> bool {
        let correct = self.overlapping_indices().contains(&row);
        info!(target: "table", "Row {} submitted: {}", row, if correct { "correct" } else { "incorrect" });
        correct
    }

    /// Fill the table with `num_columns` random columns, `discrete_columns` of
    /// them discrete. At least one column has to be continuous.
    ///
    /// Discrete columns are generated first. Their equality rules can only
    /// approximate the rows they should remove, and the exact continuous rules
    /// that follow absorb the difference so the last one leaves a single row.
    pub fn create_table(
        &mut self,
        discrete_columns: usize,
        max_discrete_values: Option<usize>,
    ) -> Result<()> {
        self.columns.clear();
        let generators = self.random_generators(discrete_columns, max_discrete_values)?;
        debug!(
            target: "table",
            "Generating {}x{} table (seed {}) with generators {:?}",
            self.num_rows,
            self.num_columns,
            self.seed,
            generators
        );

        for generator in generators.iter() {
            self.add_column(generator)?;
        }

        assert_eq!(
            self.overlapping_rows(),
            1,
            "Error! Table with seed {} does not narrow to a single row",
            self.seed
        );

        // Display order only; the overlap doesn't depend on column order.
        self.columns.shuffle(&mut self.rng);

        info!(
            target: "table",
            "Generated table with seed {}; solution is row {:?}",
            self.seed,
            self.solution()
        );
        Ok(())
    }

    /// Pick a generator for every column: discrete ones first, then
    /// continuous. Within each kind no type repeats until all have been used.
    fn random_generators(
        &mut self,
        discrete_columns: usize,
        max_discrete_values: Option<usize>,
    ) -> Result<Vec<ColumnGenerator>> {
        // Only a continuous rule can cut the overlap down to exactly one row.
        if discrete_columns >= self.num_columns {
            return Err(TableError::InvalidLayout(format!(
                "need at least one continuous column, {} of {} requested as discrete",
                discrete_columns, self.num_columns
            )));
        }
        let continuous_columns = self.num_columns - discrete_columns;

        let mut generators = Vec::with_capacity(self.num_columns);
        for vocabulary in take_random_cycle(&mut self.rng, &DiscreteVocabulary::all(), discrete_columns) {
            generators.push(ColumnGenerator::Discrete(DiscreteColumn::new(
                vocabulary,
                max_discrete_values,
            )?));
        }
        for column in take_random_cycle(&mut self.rng, &ContinuousColumn::all(), continuous_columns) {
            generators.push(ColumnGenerator::Continuous(column));
        }
        Ok(generators)
    }

    /// Generate the next column and attach a constraint to it.
    ///
    /// Discrete columns may not follow continuous ones: only continuous
    /// constraints remove an exact number of rows, so they have to come last.
    pub fn add_column(&mut self, generator: &ColumnGenerator) -> Result<()> {
        if self.is_complete() {
            return Err(TableError::InvalidLayout(format!(
                "table already has all {} columns",
                self.num_columns
            )));
        }
        let data = Rc::new(generator.generate(&mut self.rng, self.num_rows)?);
        if data.kind == ColumnKind::Discrete
            && self.columns.iter().any(|c| c.data.kind == ColumnKind::Continuous)
        {
            return Err(TableError::OrderingViolation {
                name: data.name.clone(),
            });
        }
        self.push_column(data)
    }

    /// Attach a constraint sized by the current overlap to `data` and append it.
    fn push_column(&mut self, data: Rc<ColumnData>) -> Result<()> {
        let overlapping_indices = self.overlapping_indices();
        let reduce_amount = self.reduce_amount();
        let constraint_type = *ConstraintType::valid_for(data.kind)
            .choose(&mut self.rng)
            .unwrap_or(&ConstraintType::Range);
        let seed = self.rng.next_u64();

        let constraint = Constraint::new(
            constraint_type,
            data.clone(),
            &overlapping_indices,
            reduce_amount,
            seed,
        )?;
        debug!(
            target: "table",
            "Column '{}' ({}): {} over {} overlapping rows, reduce by {} -> {}",
            data.name,
            data.kind,
            constraint_type.get_title(),
            overlapping_indices.len(),
            reduce_amount,
            constraint
        );

        self.columns.push(Column { data, constraint });
        trace!(
            target: "table",
            "Overlapping rows now {:?}",
            self.overlapping_indices()
        );
        Ok(())
    }

    pub fn header(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.data.name.as_str()).collect()
    }

    /// The data rows in display order, one `Vec` of cells per row.
    pub fn rows(&self) -> Vec<Vec<&str>> {
        (0..self.num_rows)
            .map(|row| self.columns.iter().map(|c| c.data.get(row)).collect())
            .collect()
    }

    /// The header row followed by every data row, columns padded to line up.
    pub fn format_table(&self) -> String {
        let mut rows = vec![self.header()];
        rows.extend(self.rows());
        format_table(&rows, COLUMN_SEPARATOR)
    }

    pub fn format_constraints(&self, separator: &str) -> String {
        self.columns
            .iter()
            .map(|c| c.constraint.format())
            .join(separator)
    }
}

#[cfg(test)]
mod tests {
    use test_context::test_context;

    use super::*;
    use crate::{model::Difficulty, tests::UsingLogger};

    fn settings(num_rows: usize, num_columns: usize, discrete: usize, seed: u64) -> TableSettings {
        TableSettings {
            num_rows,
            num_columns,
            discrete_columns: Some(discrete),
            max_discrete_values: Some(2),
            seed: Some(seed),
        }
    }

    fn iterations() -> u64 {
        std::env::var("TABLE_GEN_ITERATIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(200)
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_generate_table(_: &mut UsingLogger) {
        // TABLE_GEN_ITERATIONS=5000 RUST_LOG=debug cargo test game::table::tests::test_generate_table -- --nocapture --exact
        for i in 0..iterations() {
            let table = Table::generate(&settings(30, 4, 1, i)).unwrap();
            assert_eq!(table.columns().len(), 4);
            assert_eq!(table.remaining_columns(), 0);
            let overlap = table.overlapping_indices();
            assert_eq!(overlap.len(), 1, "seed {} left {:?}", i, overlap);
            assert_eq!(table.solution(), Some(overlap[0]));
        }
    }

    #[test]
    fn test_generate_every_difficulty() {
        for difficulty in Difficulty::all() {
            for seed in 0..50 {
                let settings = TableSettings::for_difficulty(difficulty).with_seed(Some(seed));
                let table = Table::generate(&settings).unwrap();
                assert_eq!(table.overlapping_rows(), 1, "{:?} seed {}", difficulty, seed);
            }
        }
    }

    #[test]
    fn test_generate_many_shapes() {
        for seed in 0..30 {
            for (rows, columns, discrete, max_values) in
                [(2, 1, 0, 2), (5, 2, 1, 2), (12, 3, 2, 3), (40, 8, 3, 4), (60, 12, 6, 6)]
            {
                let settings = TableSettings {
                    num_rows: rows,
                    num_columns: columns,
                    discrete_columns: Some(discrete),
                    max_discrete_values: Some(max_values),
                    seed: Some(seed),
                };
                let table = Table::generate(&settings).unwrap();
                assert_eq!(table.overlapping_rows(), 1, "{:?} seed {}", settings, seed);
            }
        }
    }

    #[test]
    fn test_submit() {
        let table = Table::generate(&settings(20, 4, 1, 7)).unwrap();
        let answer = table.solution().unwrap();
        assert!(table.submit(answer));
        for row in (0..20).filter(|&r| r != answer) {
            assert!(!table.submit(row));
        }
    }

    #[test]
    fn test_same_seed_same_table() {
        let first = Table::generate(&settings(25, 5, 2, 99)).unwrap();
        let second = Table::generate(&settings(25, 5, 2, 99)).unwrap();
        assert_eq!(first.format_table(), second.format_table());
        assert_eq!(first.format_constraints("\n"), second.format_constraints("\n"));
        assert_eq!(first.solution(), second.solution());
    }

    #[test]
    fn test_format_table() {
        let table = Table::generate(&settings(10, 3, 1, 3)).unwrap();
        let output = table.format_table();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 11);
        for name in table.header() {
            assert!(lines[0].contains(name));
        }
        let first_row = table.rows()[0].clone();
        assert!(lines[1].starts_with(first_row[0]));

        let rules = table.format_constraints("\n\n");
        assert_eq!(rules.split("\n\n").count(), 3);
    }

    #[test]
    fn test_display_shuffle_keeps_overlap() {
        let mut table = Table::generate(&settings(30, 5, 1, 12)).unwrap();
        let solution = table.overlapping_indices();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..10 {
            table.columns.shuffle(&mut rng);
            assert_eq!(table.overlapping_indices(), solution);
        }
    }

    #[test]
    fn test_incremental_generation() {
        let mut table = Table::new(20, 3, Some(5));
        assert_eq!(table.overlapping_indices(), (0..20).collect::<Vec<_>>());
        assert_eq!(table.remaining_columns(), 3);
        assert_eq!(table.solution(), None);
        // round(20 / 3) - 1
        assert_eq!(table.reduce_amount(), 6);

        let boolean = DiscreteColumn::new(DiscreteVocabulary::Boolean, None).unwrap();
        table.add_column(&ColumnGenerator::Discrete(boolean)).unwrap();
        assert_eq!(table.remaining_columns(), 2);
        assert_eq!(table.columns()[0].constraint.reduce_amount(), 6);

        table
            .add_column(&ColumnGenerator::Continuous(ContinuousColumn::Age))
            .unwrap();
        table
            .add_column(&ColumnGenerator::Continuous(ContinuousColumn::Price))
            .unwrap();
        assert!(table.is_complete());
        assert_eq!(table.overlapping_rows(), 1);

        let err = table
            .add_column(&ColumnGenerator::Continuous(ContinuousColumn::Id))
            .unwrap_err();
        assert!(matches!(err, TableError::InvalidLayout(_)));
    }

    #[test]
    fn test_discrete_after_continuous_is_rejected() {
        let mut table = Table::new(20, 3, Some(5));
        table
            .add_column(&ColumnGenerator::Continuous(ContinuousColumn::Age))
            .unwrap();
        let boolean = DiscreteColumn::new(DiscreteVocabulary::Boolean, None).unwrap();
        let err = table
            .add_column(&ColumnGenerator::Discrete(boolean))
            .unwrap_err();
        assert!(matches!(err, TableError::OrderingViolation { .. }));
        assert_eq!(table.columns().len(), 1);
    }

    #[test]
    fn test_discrete_last_breaks_uniqueness() {
        // What the ordering rule prevents: an exact continuous rule first, then a
        // discrete rule that has to land on one row but can only match whole
        // value groups.
        let ages = Rc::new(ColumnData::new(
            "age",
            (0..8).map(|i| (20 + i).to_string()).collect(),
            ColumnKind::Continuous,
        ));
        let flags = Rc::new(ColumnData::parse(
            "enabled",
            ColumnKind::Discrete,
            "true true false false true true false false",
        ));

        let all: Vec<usize> = (0..8).collect();
        // round(8 / 2) - 1 = 3
        let less = Constraint::new(ConstraintType::LessThan, ages, &all, 3, 0).unwrap();
        let overlap = less.indices().into_iter().filter(|i| all.contains(i)).collect::<Vec<_>>();
        assert_eq!(overlap, vec![0, 1, 2, 3, 4]);

        // round(5 / 1) - 1 = 4
        for constraint_type in ConstraintType::valid_for(ColumnKind::Discrete) {
            let last = Constraint::new(*constraint_type, flags.clone(), &overlap, 4, 0).unwrap();
            let indices = last.indices();
            let remaining = overlap.iter().filter(|i| indices.contains(i)).count();
            assert_ne!(remaining, 1, "{}", last);
        }
    }

    #[test]
    fn test_discrete_last_rarely_leaves_one_row() {
        // The same real generators in both orders. Discrete-first always ends
        // on one row; discrete-last usually misses.
        let trials = 200;
        let mut missed = 0;
        for seed in 0..trials {
            let mut rng = StdRng::seed_from_u64(seed);
            let vocabulary = *DiscreteVocabulary::all().choose(&mut rng).unwrap();
            let discrete = DiscreteColumn::new(vocabulary, Some(2)).unwrap();
            let mut generators: Vec<ColumnGenerator> =
                take_random_cycle(&mut rng, &ContinuousColumn::all(), 3)
                    .into_iter()
                    .map(ColumnGenerator::Continuous)
                    .collect();
            generators.push(ColumnGenerator::Discrete(discrete));

            let mut discrete_last = Table::new(30, 4, Some(seed));
            for generator in generators.iter() {
                let data = Rc::new(generator.generate(&mut discrete_last.rng, 30).unwrap());
                discrete_last.push_column(data).unwrap();
            }
            assert!(discrete_last.is_complete());
            if discrete_last.overlapping_rows() != 1 {
                missed += 1;
            }

            generators.rotate_right(1);
            let mut discrete_first = Table::new(30, 4, Some(seed));
            for generator in generators.iter() {
                discrete_first.add_column(generator).unwrap();
            }
            assert_eq!(discrete_first.overlapping_rows(), 1, "seed {}", seed);
        }
        assert!(missed * 2 > trials, "only {} of {} missed", missed, trials);
    }

    #[test]
    fn test_create_table_needs_a_continuous_column() {
        let mut table = Table::new(10, 2, Some(1));
        assert!(matches!(
            table.create_table(2, Some(2)),
            Err(TableError::InvalidLayout(_))
        ));
        assert!(table.columns().is_empty());

        let mut empty = Table::new(10, 0, Some(1));
        assert!(matches!(
            empty.create_table(0, None),
            Err(TableError::InvalidLayout(_))
        ));

        table.create_table(1, Some(2)).unwrap();
        assert!(table.solution().is_some());
    }

    #[test]
    fn test_invalid_settings() {
        assert!(matches!(
            Table::generate(&settings(1, 3, 1, 0)),
            Err(TableError::InvalidLayout(_))
        ));
        assert!(matches!(
            Table::generate(&settings(10, 3, 3, 0)),
            Err(TableError::InvalidLayout(_))
        ));
        let single = TableSettings {
            max_discrete_values: Some(1),
            ..settings(10, 3, 1, 0)
        };
        assert!(matches!(
            Table::generate(&single),
            Err(TableError::TooFewDiscreteValues { .. })
        ));
    }

    #[test]
    fn test_too_many_rows_for_column_domain() {
        // Quantity only spans a window of 100 values.
        let mut table = Table::new(150, 1, Some(1));
        assert!(matches!(
            table.add_column(&ColumnGenerator::Continuous(ContinuousColumn::Quantity)),
            Err(TableError::DomainTooSmall { .. })
        ));
    }
}
