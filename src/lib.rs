pub mod error;
pub mod game;
pub mod helpers;
pub mod model;

pub use error::{Result, TableError};
