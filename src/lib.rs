pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::config::toml_config::StatementConfig;
pub use crate::core::{
    binding::FieldBinding,
    engine::{RunSummary, StatementEngine},
    format::{DisplayConfig, Formatted, Formatter},
    pipeline::StatementPipeline,
};
pub use crate::domain::model::{
    DataUpdate, EmptyReason, EmptyState, FieldDescriptor, FieldSet, FieldValue, RenderedGroup,
    RenderedRow, Role, Row, StatementView,
};
pub use crate::utils::error::{Result, StatementError};
