use crate::domain::model::{DataUpdate, StatementView};
use crate::utils::error::Result;

/// Source of data updates. Calls `on_update` once per update, in order,
/// and returns how many updates were delivered.
pub trait DataFeed {
    fn subscribe(&mut self, on_update: &mut dyn FnMut(DataUpdate) -> Result<()>) -> Result<usize>;
}

/// Consumer of finished statement views.
pub trait Renderer {
    fn render(&mut self, view: &StatementView) -> Result<()>;
}
