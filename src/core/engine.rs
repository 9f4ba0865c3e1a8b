use crate::core::binding::FieldBinding;
use crate::core::pipeline::StatementPipeline;
use crate::core::{DataFeed, Renderer};
use crate::domain::model::{EmptyReason, StatementView};
use crate::utils::error::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub updates: usize,
    pub groups: usize,
    pub unbound: usize,
    pub empty: usize,
}

impl RunSummary {
    fn record(&mut self, view: &StatementView) {
        self.updates += 1;
        match view {
            StatementView::Groups(groups) => self.groups += groups.len(),
            StatementView::Empty(state) => match state.reason {
                EmptyReason::Unbound => self.unbound += 1,
                EmptyReason::NoRows => self.empty += 1,
            },
        }
    }
}

/// Drives the pipeline from a feed: every delivered update is rendered from
/// scratch and handed to the renderer.
pub struct StatementEngine<F: DataFeed, R: Renderer> {
    feed: F,
    renderer: R,
    pipeline: StatementPipeline,
    binding: Option<FieldBinding>,
}

impl<F: DataFeed, R: Renderer> StatementEngine<F, R> {
    pub fn new(feed: F, renderer: R) -> Self {
        Self::with_pipeline(feed, renderer, StatementPipeline::default())
    }

    pub fn with_pipeline(feed: F, renderer: R, pipeline: StatementPipeline) -> Self {
        Self {
            feed,
            renderer,
            pipeline,
            binding: None,
        }
    }

    /// Uses a fixed role binding instead of binding each update's fields by
    /// position.
    pub fn with_binding(mut self, binding: FieldBinding) -> Self {
        self.binding = Some(binding);
        self
    }

    pub fn run(&mut self) -> Result<RunSummary> {
        tracing::info!("Subscribing to data feed");

        let mut summary = RunSummary::default();
        let pipeline = &self.pipeline;
        let binding = self.binding.as_ref();
        let renderer = &mut self.renderer;

        let delivered = self.feed.subscribe(&mut |update| {
            let view = match binding {
                Some(binding) => pipeline.render_with(binding, &update.rows),
                None => pipeline.render(&update.fields, &update.rows),
            };
            match &view {
                StatementView::Groups(groups) => tracing::info!(
                    "Update {}: {} rows in {} groups",
                    summary.updates + 1,
                    update.rows.len(),
                    groups.len()
                ),
                StatementView::Empty(state) => tracing::info!(
                    "Update {}: {:?} ({})",
                    summary.updates + 1,
                    state.reason,
                    state.message
                ),
            }
            summary.record(&view);
            renderer.render(&view)
        })?;

        tracing::debug!("Feed delivered {} updates", delivered);
        Ok(summary)
    }

    pub fn into_parts(self) -> (F, R) {
        (self.feed, self.renderer)
    }
}
