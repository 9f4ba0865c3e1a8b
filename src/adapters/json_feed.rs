use crate::core::{DataFeed, DataUpdate};
use crate::utils::error::{Result, StatementError};
use std::path::Path;

/// Feed backed by a JSON document holding one update object or an array of
/// them. Updates are delivered in document order.
#[derive(Debug, Clone, Default)]
pub struct JsonFeed {
    updates: Vec<DataUpdate>,
}

impl JsonFeed {
    pub fn new(updates: Vec<DataUpdate>) -> Self {
        Self { updates }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let json_data: serde_json::Value = serde_json::from_str(content)?;

        let updates = match json_data {
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(serde_json::from_value)
                .collect::<std::result::Result<Vec<DataUpdate>, _>>()?,
            object @ serde_json::Value::Object(_) => vec![serde_json::from_value(object)?],
            other => {
                return Err(StatementError::FeedError {
                    message: format!(
                        "expected an update object or an array of updates, found {}",
                        json_kind(&other)
                    ),
                })
            }
        };

        tracing::debug!("Loaded {} updates from JSON", updates.len());
        Ok(Self { updates })
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

impl DataFeed for JsonFeed {
    fn subscribe(&mut self, on_update: &mut dyn FnMut(DataUpdate) -> Result<()>) -> Result<usize> {
        let mut delivered = 0;
        for update in self.updates.drain(..) {
            on_update(update)?;
            delivered += 1;
        }
        Ok(delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{FieldValue, Role};

    #[test]
    fn test_single_update_object() {
        let feed = JsonFeed::from_json_str(
            r#"{
                "fields": {
                    "dimensions": [{"id": "contact"}, {"id": "due", "role": "due_date"}, {"id": "link"}],
                    "metrics": [{"id": "amount"}]
                },
                "rows": [{"contact": "Acme", "due": "2024-01-05", "link": null, "amount": 12.5}]
            }"#,
        )
        .unwrap();
        assert_eq!(feed.len(), 1);

        let update = &feed.updates[0];
        assert_eq!(update.fields.dimensions[1].role, Some(Role::DueDate));
        assert_eq!(update.rows[0].get("link"), None);
        assert_eq!(
            update.rows[0].get("amount"),
            Some(&FieldValue::Number(serde_json::Number::from_f64(12.5).unwrap()))
        );
    }

    #[test]
    fn test_array_of_updates_delivered_in_order() {
        let mut feed = JsonFeed::from_json_str(
            r#"[
                {"fields": {"dimensions": [{"id": "a"}], "metrics": []}, "rows": []},
                {"rows": [{"x": 1}, {"x": 2}]}
            ]"#,
        )
        .unwrap();

        let mut seen = Vec::new();
        let delivered = feed
            .subscribe(&mut |update| {
                seen.push(update.rows.len());
                Ok(())
            })
            .unwrap();
        assert_eq!(delivered, 2);
        assert_eq!(seen, [0, 2]);
        assert!(feed.is_empty());
    }

    #[test]
    fn test_scalar_document_is_rejected() {
        let err = JsonFeed::from_json_str("42").unwrap_err();
        assert!(matches!(err, StatementError::FeedError { .. }));
        assert!(err.to_string().contains("a number"));
    }

    #[test]
    fn test_malformed_json_is_a_serialization_error() {
        let err = JsonFeed::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, StatementError::SerializationError(_)));
    }

    #[test]
    fn test_callback_error_stops_delivery() {
        let mut feed = JsonFeed::new(vec![DataUpdate::default(), DataUpdate::default()]);
        let mut calls = 0;
        let result = feed.subscribe(&mut |_| {
            calls += 1;
            Err(StatementError::RenderError {
                message: "stop".to_string(),
            })
        });
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }
}
