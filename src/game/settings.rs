use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, TableError},
    model::Difficulty,
};

/// Share of the columns that are discrete when the split isn't given.
pub const DISCRETE_COLUMN_RATIO: f64 = 0.25;

/// Parameters for one puzzle table.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TableSettings {
    #[serde(default = "default_num_rows")]
    pub num_rows: usize,

    #[serde(default = "default_num_columns")]
    pub num_columns: usize,

    /// How many of `num_columns` are discrete. Defaults to a quarter.
    #[serde(default)]
    pub discrete_columns: Option<usize>,

    /// Caps the distinct values of every discrete column. Without it each
    /// column uses its whole vocabulary.
    #[serde(default)]
    pub max_discrete_values: Option<usize>,

    #[serde(default)]
    pub seed: Option<u64>,
}

// Helper functions for default values
fn default_num_rows() -> usize {
    Difficulty::default().num_rows()
}
fn default_num_columns() -> usize {
    Difficulty::default().num_columns()
}

impl Default for TableSettings {
    fn default() -> Self {
        Self::for_difficulty(Difficulty::default())
    }
}

impl TableSettings {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        TableSettings {
            num_rows: difficulty.num_rows(),
            num_columns: difficulty.num_columns(),
            discrete_columns: None,
            max_discrete_values: Some(difficulty.max_discrete_values()),
            seed: None,
        }
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        let settings: TableSettings = serde_json::from_str(contents)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Ties round to even, so 2 columns get no discrete column and 6 get two.
    pub fn discrete_columns(&self) -> usize {
        self.discrete_columns
            .unwrap_or((DISCRETE_COLUMN_RATIO * self.num_columns as f64).round_ties_even() as usize)
    }

    pub fn continuous_columns(&self) -> usize {
        self.num_columns.saturating_sub(self.discrete_columns())
    }

    /// Check that the layout can produce a single-answer table.
    ///
    /// Only continuous constraints remove an exact number of rows, so at least
    /// one continuous column has to close out the generation.
    pub fn validate(&self) -> Result<()> {
        if self.num_rows < 2 {
            return Err(TableError::InvalidLayout(format!(
                "need at least 2 rows, got {}",
                self.num_rows
            )));
        }
        if self.num_columns == 0 {
            return Err(TableError::InvalidLayout("need at least one column".to_string()));
        }
        if self.discrete_columns() > self.num_columns {
            return Err(TableError::InvalidLayout(format!(
                "{} discrete columns requested out of {}",
                self.discrete_columns(),
                self.num_columns
            )));
        }
        if self.continuous_columns() == 0 {
            return Err(TableError::InvalidLayout(
                "need at least one continuous column".to_string(),
            ));
        }
        if let Some(max_discrete_values) = self.max_discrete_values {
            if max_discrete_values <= 1 {
                return Err(TableError::TooFewDiscreteValues { max_discrete_values });
            }
        }
        Ok(())
    }

    pub fn is_debug_mode() -> bool {
        std::env::var("DEBUG").map(|v| v == "1").unwrap_or(false)
    }

    pub fn seed_from_env() -> Option<u64> {
        std::env::var("SEED").ok().and_then(|v| v.parse::<u64>().ok())
    }

    pub fn difficulty_from_env() -> Difficulty {
        std::env::var("DIFFICULTY")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .map(Difficulty::from_index)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    fn test_default_split() {
        let settings = TableSettings {
            num_rows: 30,
            num_columns: 4,
            discrete_columns: None,
            max_discrete_values: Some(2),
            seed: None,
        };
        assert_eq!(settings.discrete_columns(), 1);
        assert_eq!(settings.continuous_columns(), 3);
        assert!(settings.validate().is_ok());

        let two = TableSettings {
            num_columns: 2,
            ..settings.clone()
        };
        assert_eq!(two.discrete_columns(), 0);
        assert_eq!(two.continuous_columns(), 2);

        for (num_columns, discrete) in [(1, 0), (3, 1), (5, 1), (6, 2), (10, 2), (14, 4)] {
            let settings = TableSettings {
                num_columns,
                ..settings.clone()
            };
            assert_eq!(settings.discrete_columns(), discrete, "{} columns", num_columns);
        }
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let settings = TableSettings::from_json(r#"{ "num_rows": 25, "seed": 7 }"#).unwrap();
        assert_eq!(settings.num_rows, 25);
        assert_eq!(settings.num_columns, Difficulty::default().num_columns());
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.max_discrete_values, None);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            TableSettings::from_json("{ num_rows: }"),
            Err(TableError::Settings(_))
        ));
        assert!(matches!(
            TableSettings::from_json(r#"{ "num_rows": 1 }"#),
            Err(TableError::InvalidLayout(_))
        ));
    }

    #[test]
    fn test_validate() {
        let base = TableSettings::for_difficulty(Difficulty::Hard);
        assert!(base.validate().is_ok());

        let all_discrete = TableSettings {
            discrete_columns: Some(base.num_columns),
            ..base.clone()
        };
        assert!(matches!(
            all_discrete.validate(),
            Err(TableError::InvalidLayout(_))
        ));

        let too_many = TableSettings {
            discrete_columns: Some(base.num_columns + 1),
            ..base.clone()
        };
        assert!(too_many.validate().is_err());

        let single_value = TableSettings {
            max_discrete_values: Some(1),
            ..base.clone()
        };
        assert!(matches!(
            single_value.validate(),
            Err(TableError::TooFewDiscreteValues {
                max_discrete_values: 1
            })
        ));

        let no_columns = TableSettings {
            num_columns: 0,
            ..base
        };
        assert!(no_columns.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_seed_from_env() {
        std::env::set_var("SEED", "1234");
        assert_eq!(TableSettings::seed_from_env(), Some(1234));
        std::env::set_var("SEED", "not a number");
        assert_eq!(TableSettings::seed_from_env(), None);
        std::env::remove_var("SEED");
        assert_eq!(TableSettings::seed_from_env(), None);
    }

    #[test]
    #[serial]
    fn test_difficulty_from_env() {
        std::env::set_var("DIFFICULTY", "2");
        assert_eq!(TableSettings::difficulty_from_env(), Difficulty::Hard);
        std::env::remove_var("DIFFICULTY");
        assert_eq!(TableSettings::difficulty_from_env(), Difficulty::Easy);
    }
}
