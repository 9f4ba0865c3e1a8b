use crate::core::{Renderer, StatementView};
use crate::utils::error::Result;
use std::io::Write;

/// Writes each view as pretty-printed JSON followed by a newline.
pub struct JsonRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn render(&mut self, view: &StatementView) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.out, view)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}
