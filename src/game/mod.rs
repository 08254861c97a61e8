pub mod column_generator;
pub mod constraint;
pub mod continuous_columns;
pub mod discrete_columns;
pub mod sampling;
pub mod settings;
pub mod table;

pub use column_generator::ColumnGenerator;
pub use constraint::{Constraint, ConstraintType};
pub use continuous_columns::ContinuousColumn;
pub use discrete_columns::{DiscreteColumn, DiscreteVocabulary};
pub use settings::TableSettings;
pub use table::{Column, Table};
