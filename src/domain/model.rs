use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Semantic role a bound field plays in a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Contact,
    DueDate,
    Link,
    BankName,
    BankNumber,
    Amount,
}

impl Role {
    /// Dimension roles in the order the data feed lays them out.
    pub const DIMENSION_ORDER: [Role; 5] = [
        Role::Contact,
        Role::DueDate,
        Role::Link,
        Role::BankName,
        Role::BankNumber,
    ];
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Contact => "contact",
            Role::DueDate => "due_date",
            Role::Link => "link",
            Role::BankName => "bank_name",
            Role::BankNumber => "bank_number",
            Role::Amount => "amount",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub id: String,
    /// Role the producer claims for this field. Checked against its position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl FieldDescriptor {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: None,
        }
    }

    pub fn with_role(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role: Some(role),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSet {
    #[serde(default)]
    pub dimensions: Vec<FieldDescriptor>,
    #[serde(default)]
    pub metrics: Vec<FieldDescriptor>,
}

impl FieldSet {
    pub fn from_ids<D, M>(dimensions: D, metrics: M) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        M: IntoIterator,
        M::Item: Into<String>,
    {
        Self {
            dimensions: dimensions.into_iter().map(FieldDescriptor::new).collect(),
            metrics: metrics.into_iter().map(FieldDescriptor::new).collect(),
        }
    }
}

/// A raw cell value as delivered by the data feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    Date(DateTime<Utc>),
}

impl FieldValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Text form of the value; absent values become `""`.
    pub fn to_text(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Date(d) => d.to_rfc3339(),
        }
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Bool(b) => FieldValue::Bool(b),
            serde_json::Value::Number(n) => FieldValue::Number(n),
            serde_json::Value::String(s) => FieldValue::Text(s),
            other => FieldValue::Text(other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(FieldValue::from)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    /// Non-finite floats have no JSON number form and become `Null`.
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map(FieldValue::Number)
            .unwrap_or(FieldValue::Null)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value.into())
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Date(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    pub data: HashMap<String, FieldValue>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.data.insert(id.into(), value.into());
        self
    }

    /// Present, non-null value of a field.
    pub fn get(&self, id: &str) -> Option<&FieldValue> {
        self.data.get(id).filter(|v| !v.is_absent())
    }

    pub fn text(&self, id: &str) -> String {
        self.get(id).map(FieldValue::to_text).unwrap_or_default()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            data: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// One event from the data feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataUpdate {
    #[serde(default)]
    pub fields: FieldSet,
    #[serde(default)]
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub key: String,
    pub rows: Vec<Row>,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedRow {
    pub date_text: String,
    pub link_url: String,
    pub link_text: String,
    pub amount_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedGroup {
    pub name: String,
    pub total_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_subtitle: Option<String>,
    pub rows: Vec<RenderedRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReason {
    Unbound,
    NoRows,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyState {
    pub reason: EmptyReason,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum StatementView {
    Groups(Vec<RenderedGroup>),
    Empty(EmptyState),
}

impl StatementView {
    pub fn groups(&self) -> &[RenderedGroup] {
        match self {
            StatementView::Groups(groups) => groups,
            StatementView::Empty(_) => &[],
        }
    }

    pub fn empty_state(&self) -> Option<&EmptyState> {
        match self {
            StatementView::Empty(state) => Some(state),
            StatementView::Groups(_) => None,
        }
    }
}
