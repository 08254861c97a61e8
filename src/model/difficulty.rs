use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Moderate,
    Hard,
    Veteran,
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Easy
    }
}

impl Difficulty {
    pub fn all() -> Vec<Difficulty> {
        vec![
            Difficulty::Easy,
            Difficulty::Moderate,
            Difficulty::Hard,
            Difficulty::Veteran,
        ]
    }

    pub fn index(&self) -> usize {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Moderate => 1,
            Difficulty::Hard => 2,
            Difficulty::Veteran => 3,
        }
    }

    pub fn from_index(index: usize) -> Difficulty {
        match index {
            0 => Difficulty::Easy,
            1 => Difficulty::Moderate,
            2 => Difficulty::Hard,
            3 => Difficulty::Veteran,
            _ => Difficulty::Easy,
        }
    }

    pub fn num_rows(&self) -> usize {
        match self {
            Difficulty::Easy => 10,
            Difficulty::Moderate => 20,
            Difficulty::Hard => 30,
            Difficulty::Veteran => 40,
        }
    }

    pub fn num_columns(&self) -> usize {
        match self {
            Difficulty::Easy => 3,
            Difficulty::Moderate => 4,
            Difficulty::Hard => 5,
            Difficulty::Veteran => 6,
        }
    }

    /// Cap on distinct values per discrete column. More values make the
    /// equality rules less obvious.
    pub fn max_discrete_values(&self) -> usize {
        match self {
            Difficulty::Easy => 2,
            Difficulty::Moderate => 2,
            Difficulty::Hard => 3,
            Difficulty::Veteran => 3,
        }
    }

    pub fn to_string(&self) -> String {
        match self {
            Difficulty::Easy => "Easy".to_string(),
            Difficulty::Moderate => "Moderate".to_string(),
            Difficulty::Hard => "Hard".to_string(),
            Difficulty::Veteran => "Veteran".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trips() {
        for difficulty in Difficulty::all() {
            assert_eq!(Difficulty::from_index(difficulty.index()), difficulty);
        }
        assert_eq!(Difficulty::from_index(99), Difficulty::Easy);
    }

    #[test]
    fn test_presets_grow_with_difficulty() {
        let all = Difficulty::all();
        for pair in all.windows(2) {
            assert!(pair[0].num_rows() < pair[1].num_rows());
            assert!(pair[0].num_columns() < pair[1].num_columns());
            assert!(pair[0].max_discrete_values() <= pair[1].max_discrete_values());
        }
    }
}
