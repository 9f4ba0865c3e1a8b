pub mod aggregate;
pub mod binding;
pub mod coerce;
pub mod engine;
pub mod format;
pub mod group;
pub mod pipeline;
pub mod sort;

pub use crate::domain::model::{DataUpdate, FieldSet, Row, StatementView};
pub use crate::domain::ports::{DataFeed, Renderer};
pub use crate::utils::error::Result;
