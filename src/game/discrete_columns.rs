use rand::{
    seq::{IndexedRandom, SliceRandom},
    Rng,
};

use crate::error::{Result, TableError};

/// The fixed vocabularies a discrete column can draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscreteVocabulary {
    Boolean,
    Activity,
    Specialization,
    Visibility,
    ProcessState,
    TestState,
    ShippingStatus,
    Priority,
    Condition,
    Severity,
    MachineState,
    Size,
    Release,
    WorkStatus,
}

impl DiscreteVocabulary {
    pub fn all() -> Vec<DiscreteVocabulary> {
        vec![
            DiscreteVocabulary::Boolean,
            DiscreteVocabulary::Activity,
            DiscreteVocabulary::Specialization,
            DiscreteVocabulary::Visibility,
            DiscreteVocabulary::ProcessState,
            DiscreteVocabulary::TestState,
            DiscreteVocabulary::ShippingStatus,
            DiscreteVocabulary::Priority,
            DiscreteVocabulary::Condition,
            DiscreteVocabulary::Severity,
            DiscreteVocabulary::MachineState,
            DiscreteVocabulary::Size,
            DiscreteVocabulary::Release,
            DiscreteVocabulary::WorkStatus,
        ]
    }

    pub fn names(&self) -> &'static [&'static str] {
        match self {
            DiscreteVocabulary::Boolean => &["exists", "preferred", "enabled", "open", "active"],
            DiscreteVocabulary::Activity => &["activity", "activity_status"],
            DiscreteVocabulary::Specialization => &["level", "precedence"],
            DiscreteVocabulary::Visibility => &["visibility"],
            DiscreteVocabulary::ProcessState => {
                &["process_state", "task_state", "job_state", "transaction_state"]
            }
            DiscreteVocabulary::TestState => &["tests", "build"],
            DiscreteVocabulary::ShippingStatus => &["shipping_status"],
            DiscreteVocabulary::Priority => &["priority"],
            DiscreteVocabulary::Condition => &["condition"],
            DiscreteVocabulary::Severity => &["severity", "importance"],
            DiscreteVocabulary::MachineState => &["machine_state"],
            DiscreteVocabulary::Size => &["size"],
            DiscreteVocabulary::Release => &["release_stage", "release_state"],
            DiscreteVocabulary::WorkStatus => &["work_status", "worker_status"],
        }
    }

    pub fn values(&self) -> &'static [&'static str] {
        match self {
            DiscreteVocabulary::Boolean => &["true", "false"],
            DiscreteVocabulary::Activity => &["active", "inactive", "standby"],
            DiscreteVocabulary::Specialization => &["primary", "secondary", "tertiary"],
            DiscreteVocabulary::Visibility => &["public", "private", "protected"],
            DiscreteVocabulary::ProcessState => &["working", "failed", "complete", "waiting"],
            DiscreteVocabulary::TestState => &["passing", "failing"],
            DiscreteVocabulary::ShippingStatus => &["shipped", "en_route", "delivered"],
            DiscreteVocabulary::Priority => &["low", "medium", "high", "immediate"],
            DiscreteVocabulary::Condition => &["poor", "moderate", "good", "great"],
            DiscreteVocabulary::Severity => &["minor", "normal", "major", "critical"],
            DiscreteVocabulary::MachineState => &["running", "power_off", "sleeping", "hibernating"],
            DiscreteVocabulary::Size => &["tiny", "small", "medium", "large", "xlarge"],
            DiscreteVocabulary::Release => {
                &["alpha", "beta", "testing", "candidate", "release", "stable"]
            }
            DiscreteVocabulary::WorkStatus => &["on_site", "remote", "sick", "leave", "vacation"],
        }
    }
}

/// A discrete column generator: a vocabulary plus an optional cap on how many
/// of its values may appear in one generated column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscreteColumn {
    pub vocabulary: DiscreteVocabulary,
    max_discrete_values: usize,
}

impl DiscreteColumn {
    /// Without `max_discrete_values` the whole vocabulary is used. A column
    /// that can only ever hold one value cannot tell rows apart, so caps of 0
    /// or 1 are rejected.
    pub fn new(vocabulary: DiscreteVocabulary, max_discrete_values: Option<usize>) -> Result<Self> {
        let max_discrete_values = max_discrete_values.unwrap_or(vocabulary.values().len());
        if max_discrete_values <= 1 {
            return Err(TableError::TooFewDiscreteValues { max_discrete_values });
        }
        Ok(Self {
            vocabulary,
            max_discrete_values,
        })
    }

    pub fn max_discrete_values(&self) -> usize {
        self.max_discrete_values
    }

    /// A random subset of the vocabulary no larger than the cap.
    fn limited_values<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<&'static str> {
        let mut values = self.vocabulary.values().to_vec();
        values.shuffle(rng);
        values.truncate(self.max_discrete_values);
        values
    }

    /// Draw `rows` values from a random subset of the vocabulary.
    ///
    /// Whenever there are at least two rows the column shows at least two
    /// distinct values, otherwise a `!=` rule on it could rule out every row.
    pub fn generate_rows<R: Rng + ?Sized>(&self, rng: &mut R, rows: usize) -> Vec<String> {
        let values = self.limited_values(rng);
        let mut data: Vec<&str> = (0..rows).filter_map(|_| values.choose(rng).copied()).collect();

        if rows >= 2 && data.iter().all(|v| *v == data[0]) {
            let others: Vec<&str> = values.iter().copied().filter(|v| *v != data[0]).collect();
            if let Some(other) = others.choose(rng) {
                let row = rng.random_range(0..rows);
                data[row] = *other;
            }
        }
        data.into_iter().map(str::to_string).collect()
    }
}
