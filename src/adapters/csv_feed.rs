use crate::core::{DataFeed, DataUpdate, FieldSet, Row};
use crate::domain::model::FieldValue;
use crate::utils::error::{Result, StatementError};
use std::io::Read;
use std::path::Path;

/// Feed backed by a CSV file with a header row. The caller names which
/// columns are dimensions and metrics, in binding order. The whole file is
/// one update.
#[derive(Debug, Clone)]
pub struct CsvFeed {
    update: Option<DataUpdate>,
}

impl CsvFeed {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        dimensions: &[String],
        metrics: &[String],
    ) -> Result<Self> {
        let file = std::fs::File::open(&path)?;
        Self::from_reader(file, dimensions, metrics)
    }

    pub fn from_reader<R: Read>(reader: R, dimensions: &[String], metrics: &[String]) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let headers = csv_reader.headers()?.clone();

        let missing: Vec<&str> = dimensions
            .iter()
            .chain(metrics)
            .map(String::as_str)
            .filter(|column| !headers.iter().any(|h| h == *column))
            .collect();
        if !missing.is_empty() {
            return Err(StatementError::FeedError {
                message: format!("CSV header is missing column(s): {}", missing.join(", ")),
            });
        }

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let row: Row = headers
                .iter()
                .zip(record.iter())
                .map(|(header, cell)| {
                    let value = if cell.is_empty() {
                        FieldValue::Null
                    } else {
                        FieldValue::Text(cell.to_string())
                    };
                    (header, value)
                })
                .collect();
            rows.push(row);
        }

        tracing::debug!("Read {} rows from CSV", rows.len());

        Ok(Self {
            update: Some(DataUpdate {
                fields: FieldSet::from_ids(dimensions.iter().cloned(), metrics.iter().cloned()),
                rows,
            }),
        })
    }
}

impl DataFeed for CsvFeed {
    fn subscribe(&mut self, on_update: &mut dyn FnMut(DataUpdate) -> Result<()>) -> Result<usize> {
        match self.update.take() {
            Some(update) => {
                on_update(update)?;
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
