use crate::core::aggregate::{total, unparseable_amounts};
use crate::core::binding::FieldBinding;
use crate::core::format::{DisplayConfig, Formatter};
use crate::core::group::group_rows;
use crate::core::sort::sort_rows;
use crate::domain::model::{
    EmptyReason, EmptyState, FieldSet, Group, RenderedGroup, RenderedRow, Row, StatementView,
};
use crate::utils::error::Result;

pub const UNBOUND_MESSAGE: &str =
    "Please bind 3 dimensions (contact_name, due_date, link) and 1 metric (amount_due).";
pub const NO_ROWS_MESSAGE: &str = "No rows to display.";

const MISSING_LINK_URL: &str = "#";

/// Turns one batch of feed data into a statement view. Holds only display
/// settings, so a single instance can serve any number of updates.
#[derive(Debug, Clone, Default)]
pub struct StatementPipeline {
    formatter: Formatter,
}

impl StatementPipeline {
    pub fn new(config: DisplayConfig) -> Result<Self> {
        Ok(Self {
            formatter: Formatter::new(config)?,
        })
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    /// Binds fields by position and renders. A failed binding yields the
    /// unbound empty state.
    pub fn render(&self, fields: &FieldSet, rows: &[Row]) -> StatementView {
        match FieldBinding::bind(&fields.dimensions, &fields.metrics) {
            Ok(binding) => self.render_with(&binding, rows),
            Err(e) => {
                tracing::warn!("Field binding failed: {}", e);
                StatementView::Empty(EmptyState {
                    reason: EmptyReason::Unbound,
                    message: UNBOUND_MESSAGE.to_string(),
                })
            }
        }
    }

    pub fn render_with(&self, binding: &FieldBinding, rows: &[Row]) -> StatementView {
        let groups = self.group(binding, rows);
        if groups.is_empty() {
            tracing::debug!("No rows to render");
            return StatementView::Empty(EmptyState {
                reason: EmptyReason::NoRows,
                message: NO_ROWS_MESSAGE.to_string(),
            });
        }

        let mut date_fallbacks = 0usize;
        let mut bad_amounts = 0usize;
        let rendered: Vec<RenderedGroup> = groups
            .iter()
            .map(|group| {
                bad_amounts += unparseable_amounts(&group.rows, binding.amount());
                RenderedGroup {
                    name: group.key.clone(),
                    total_text: self.formatter.format_currency(Some(group.total)).into_text(),
                    bank_subtitle: self.bank_subtitle(binding, group),
                    rows: group
                        .rows
                        .iter()
                        .map(|row| {
                            let (rendered, fell_back) = self.render_row(binding, row);
                            if fell_back {
                                date_fallbacks += 1;
                            }
                            rendered
                        })
                        .collect(),
                }
            })
            .collect();

        tracing::debug!(
            "Rendered {} rows into {} groups ({} unparseable dates, {} unparseable amounts)",
            rows.len(),
            rendered.len(),
            date_fallbacks,
            bad_amounts
        );

        StatementView::Groups(rendered)
    }

    /// Sorted, grouped and totalled rows, before formatting.
    pub fn group(&self, binding: &FieldBinding, rows: &[Row]) -> Vec<Group> {
        let sorted = sort_rows(rows.to_vec(), binding);
        let mut groups = group_rows(sorted, binding.contact());
        for group in &mut groups {
            group.total = total(&group.rows, binding.amount());
        }
        groups
    }

    fn render_row(&self, binding: &FieldBinding, row: &Row) -> (RenderedRow, bool) {
        let date = self.formatter.format_date(row.get(binding.due_date()));
        let fell_back = date.is_fallback();
        let link = row.get(binding.link());

        let rendered = RenderedRow {
            date_text: date.into_text(),
            link_url: link
                .map(|v| v.to_text())
                .unwrap_or_else(|| MISSING_LINK_URL.to_string()),
            link_text: link.map(|v| v.to_text()).unwrap_or_default(),
            amount_text: self
                .formatter
                .format_amount(row.get(binding.amount()))
                .into_text(),
        };
        (rendered, fell_back)
    }

    /// Bank details come from the first row of the group only.
    fn bank_subtitle(&self, binding: &FieldBinding, group: &Group) -> Option<String> {
        if !binding.has_bank_fields() {
            return None;
        }
        let first = group.rows.first()?;
        let parts: Vec<String> = [binding.bank_name(), binding.bank_number()]
            .into_iter()
            .flatten()
            .map(|id| first.text(id))
            .filter(|text| !text.is_empty())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(self.formatter.bank_separator()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{FieldDescriptor, FieldValue, Role};

    fn fields(dims: &[&str]) -> FieldSet {
        FieldSet::from_ids(dims.iter().copied(), ["amount"])
    }

    fn invoice(contact: &str, due: &str, amount: &str) -> Row {
        Row::new()
            .with("contact", contact)
            .with("due", due)
            .with("link", format!("https://pay.example.com/{}/{}", contact, due))
            .with("amount", amount)
    }

    #[test]
    fn test_unbound_fields_yield_unbound_state() {
        let pipeline = StatementPipeline::default();
        let view = pipeline.render(
            &fields(&["contact", "due"]),
            &[invoice("Acme", "2024-01-05", "1")],
        );
        let state = view.empty_state().unwrap();
        assert_eq!(state.reason, EmptyReason::Unbound);
        assert_eq!(state.message, UNBOUND_MESSAGE);
    }

    #[test]
    fn test_misordered_fields_yield_unbound_state() {
        let pipeline = StatementPipeline::default();
        let field_set = FieldSet {
            dimensions: vec![
                FieldDescriptor::new("contact"),
                FieldDescriptor::new("due"),
                FieldDescriptor::with_role("link", Role::Amount),
            ],
            metrics: vec![FieldDescriptor::new("amount")],
        };
        let view = pipeline.render(&field_set, &[invoice("Acme", "2024-01-05", "1")]);
        assert_eq!(view.empty_state().unwrap().reason, EmptyReason::Unbound);
    }

    #[test]
    fn test_no_rows_yield_distinct_state() {
        let pipeline = StatementPipeline::default();
        let view = pipeline.render(&fields(&["contact", "due", "link"]), &[]);
        let state = view.empty_state().unwrap();
        assert_eq!(state.reason, EmptyReason::NoRows);
        assert_eq!(state.message, NO_ROWS_MESSAGE);
        assert_ne!(state.message, UNBOUND_MESSAGE);
    }

    #[test]
    fn test_groups_sorted_and_totalled() {
        let pipeline = StatementPipeline::default();
        let rows = vec![
            invoice("Acme", "2024-01-10", "100"),
            invoice("Acme", "2024-01-05", "50"),
            invoice("Beta", "2024-02-01", "20"),
        ];
        let view = pipeline.render(&fields(&["contact", "due", "link"]), &rows);
        let groups = view.groups();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "Acme");
        assert_eq!(groups[0].total_text, "\u{20ac}150.00");
        assert_eq!(groups[0].rows[0].date_text, "Jan 05, 2024");
        assert_eq!(groups[0].rows[0].amount_text, "\u{20ac}50.00");
        assert_eq!(groups[0].rows[1].date_text, "Jan 10, 2024");
        assert_eq!(groups[1].name, "Beta");
        assert_eq!(groups[1].total_text, "\u{20ac}20.00");
        assert_eq!(groups[0].bank_subtitle, None);
    }

    #[test]
    fn test_missing_link_renders_placeholder() {
        let pipeline = StatementPipeline::default();
        let row = Row::new()
            .with("contact", "Acme")
            .with("due", "2024-01-05")
            .with("link", FieldValue::Null)
            .with("amount", "10");
        let view = pipeline.render(&fields(&["contact", "due", "link"]), &[row]);
        let rendered = &view.groups()[0].rows[0];
        assert_eq!(rendered.link_url, "#");
        assert_eq!(rendered.link_text, "");
    }

    #[test]
    fn test_link_text_is_passed_through() {
        let pipeline = StatementPipeline::default();
        let view = pipeline.render(
            &fields(&["contact", "due", "link"]),
            &[invoice("Acme", "2024-01-05", "1")],
        );
        let rendered = &view.groups()[0].rows[0];
        assert_eq!(rendered.link_url, "https://pay.example.com/Acme/2024-01-05");
        assert_eq!(rendered.link_text, rendered.link_url);
    }

    #[test]
    fn test_bad_values_degrade_in_place() {
        let pipeline = StatementPipeline::default();
        let rows = vec![
            invoice("Acme", "someday", "oops"),
            invoice("Acme", "2024-01-05", "10"),
        ];
        let view = pipeline.render(&fields(&["contact", "due", "link"]), &rows);
        let group = &view.groups()[0];
        assert_eq!(group.total_text, "\u{20ac}10.00");
        assert_eq!(group.rows[0].date_text, "someday");
        assert_eq!(group.rows[0].amount_text, "");
        assert_eq!(group.rows[1].date_text, "Jan 05, 2024");
    }

    #[test]
    fn test_amounts_past_decimal_range_still_render() {
        let pipeline = StatementPipeline::default();
        let rows = vec![
            invoice("Acme", "2024-01-05", "5e28"),
            invoice("Acme", "2024-01-06", "5e28"),
            invoice("Beta", "2024-01-05", "10").with("amount", FieldValue::from(1e30)),
        ];
        let view = pipeline.render(&fields(&["contact", "due", "link"]), &rows);
        let groups = view.groups();
        assert_eq!(groups.len(), 2);
        assert!(groups[0].total_text.starts_with("\u{20ac}79,228,162"));
        assert!(groups[1].total_text.starts_with("\u{20ac}79,228,162"));
        assert!(!groups[1].rows[0].amount_text.is_empty());
    }

    #[test]
    fn test_bank_subtitle_from_first_row() {
        let pipeline = StatementPipeline::default();
        let rows = vec![
            invoice("Acme", "2024-01-10", "1")
                .with("bank", "Other Bank")
                .with("iban", "XX00"),
            invoice("Acme", "2024-01-05", "1")
                .with("bank", "First Bank")
                .with("iban", "DE89 3704"),
            invoice("Beta", "2024-01-05", "1").with("iban", "NL91"),
            invoice("Gamma", "2024-01-05", "1"),
        ];
        let view = pipeline.render(
            &fields(&["contact", "due", "link", "bank", "iban"]),
            &rows,
        );
        let groups = view.groups();
        assert_eq!(
            groups[0].bank_subtitle.as_deref(),
            Some("First Bank \u{2022} DE89 3704")
        );
        assert_eq!(groups[1].bank_subtitle.as_deref(), Some("NL91"));
        assert_eq!(groups[2].bank_subtitle, None);
    }

    #[test]
    fn test_configurable_bank_separator() {
        let pipeline = StatementPipeline::new(DisplayConfig {
            bank_separator: " | ".to_string(),
            ..DisplayConfig::default()
        })
        .unwrap();
        let rows = vec![invoice("Acme", "2024-01-05", "1")
            .with("bank", "First Bank")
            .with("iban", "DE89")];
        let view = pipeline.render(&fields(&["contact", "due", "link", "bank", "iban"]), &rows);
        assert_eq!(view.groups()[0].bank_subtitle.as_deref(), Some("First Bank | DE89"));
    }

    #[test]
    fn test_render_with_explicit_binding() {
        let pipeline = StatementPipeline::default();
        let binding = FieldBinding::builder()
            .contact("vendor")
            .due_date("when")
            .link("url")
            .amount("owed")
            .build()
            .unwrap();
        let row = Row::new()
            .with("vendor", "Acme")
            .with("when", "2024-01-05")
            .with("url", "https://x")
            .with("owed", "7.5");
        let view = pipeline.render_with(&binding, &[row]);
        assert_eq!(view.groups()[0].total_text, "\u{20ac}7.50");
    }

    #[test]
    fn test_input_rows_are_not_reordered() {
        let pipeline = StatementPipeline::default();
        let rows = vec![
            invoice("Beta", "2024-01-05", "1"),
            invoice("Acme", "2024-01-05", "1"),
        ];
        let field_set = fields(&["contact", "due", "link"]);
        let binding = FieldBinding::bind(&field_set.dimensions, &field_set.metrics).unwrap();
        let groups = pipeline.group(&binding, &rows);
        assert_eq!(groups[0].key, "Acme");
        assert_eq!(rows[0].text("contact"), "Beta");
    }
}
