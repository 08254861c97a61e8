mod column_data;
mod column_kind;
mod difficulty;

pub use column_data::ColumnData;
pub use column_kind::ColumnKind;
pub use difficulty::Difficulty;
