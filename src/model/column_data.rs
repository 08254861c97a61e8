use serde::Serialize;

use super::ColumnKind;

/// The generated contents of one table column.
///
/// Rows are stored in generation order. For continuous columns that order is
/// also ascending by underlying value.
#[readonly::make]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnData {
    pub name: String,
    pub rows: Vec<String>,
    pub kind: ColumnKind,
}

impl ColumnData {
    pub fn new(name: impl Into<String>, rows: Vec<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            rows,
            kind,
        }
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn get(&self, row: usize) -> &str {
        &self.rows[row]
    }

    pub fn is_continuous(&self) -> bool {
        self.kind == ColumnKind::Continuous
    }

    /// Width of the widest cell, header included.
    pub fn display_width(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.chars().count())
            .chain(std::iter::once(self.name.chars().count()))
            .max()
            .unwrap_or(0)
    }

    #[cfg(test)]
    /// Build a column from a whitespace separated list, e.g. "true false true"
    pub fn parse(name: &str, kind: ColumnKind, s: &str) -> Self {
        Self::new(name, s.split_whitespace().map(str::to_string).collect(), kind)
    }
}

impl std::fmt::Display for ColumnData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.name, self.rows.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let column = ColumnData::parse("age", ColumnKind::Continuous, "3 17 42");
        assert_eq!(column.name, "age");
        assert_eq!(column.num_rows(), 3);
        assert_eq!(column.get(1), "17");
        assert!(column.is_continuous());
    }

    #[test]
    fn test_display_width_counts_header() {
        let column = ColumnData::parse("preferred", ColumnKind::Discrete, "true false");
        assert_eq!(column.display_width(), 9);

        let column = ColumnData::new("id", vec!["René Garte".to_string()], ColumnKind::Continuous);
        assert_eq!(column.display_width(), 10);
    }
}
