use crate::core::{Renderer, StatementView};
use crate::domain::model::RenderedGroup;
use crate::utils::error::Result;
use std::io::Write;

/// Plain-text statement, one block per contact.
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_group(&mut self, group: &RenderedGroup) -> Result<()> {
        writeln!(self.out, "{}  {}", group.name, group.total_text)?;
        if let Some(subtitle) = &group.bank_subtitle {
            writeln!(self.out, "    {}", subtitle)?;
        }
        for row in &group.rows {
            writeln!(
                self.out,
                "    {}  {} ({})  {}",
                row.date_text, row.link_text, row.link_url, row.amount_text
            )?;
        }
        Ok(())
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, view: &StatementView) -> Result<()> {
        match view {
            StatementView::Empty(state) => writeln!(self.out, "{}", state.message)?,
            StatementView::Groups(groups) => {
                for (i, group) in groups.iter().enumerate() {
                    if i > 0 {
                        writeln!(self.out)?;
                    }
                    self.write_group(group)?;
                }
            }
        }
        self.out.flush()?;
        Ok(())
    }
}
