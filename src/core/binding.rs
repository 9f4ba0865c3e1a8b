//! Resolution of semantic roles to field ids.

use crate::domain::model::{FieldDescriptor, Role};
use crate::utils::error::{Result, StatementError};

pub const MIN_DIMENSIONS: usize = 3;
pub const MIN_METRICS: usize = 1;

/// Field ids for every role the pipeline reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldBinding {
    contact: String,
    due_date: String,
    link: String,
    amount: String,
    bank_name: Option<String>,
    bank_number: Option<String>,
}

impl FieldBinding {
    /// Binds roles from descriptor positions: dimensions are contact, due
    /// date, link, then the optional bank name and number; the first metric
    /// is the amount. Surplus descriptors are ignored.
    pub fn bind(dimensions: &[FieldDescriptor], metrics: &[FieldDescriptor]) -> Result<Self> {
        if dimensions.len() < MIN_DIMENSIONS || metrics.len() < MIN_METRICS {
            return Err(StatementError::InsufficientFields {
                dimensions: dimensions.len(),
                metrics: metrics.len(),
            });
        }

        let mut builder = FieldBinding::builder();
        for (descriptor, role) in dimensions.iter().zip(Role::DIMENSION_ORDER) {
            check_position(descriptor, role)?;
            builder = builder.role(role, descriptor.id.clone());
        }
        check_position(&metrics[0], Role::Amount)?;
        builder.role(Role::Amount, metrics[0].id.clone()).build()
    }

    pub fn builder() -> FieldBindingBuilder {
        FieldBindingBuilder::default()
    }

    pub fn contact(&self) -> &str {
        &self.contact
    }

    pub fn due_date(&self) -> &str {
        &self.due_date
    }

    pub fn link(&self) -> &str {
        &self.link
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn bank_name(&self) -> Option<&str> {
        self.bank_name.as_deref()
    }

    pub fn bank_number(&self) -> Option<&str> {
        self.bank_number.as_deref()
    }

    pub fn has_bank_fields(&self) -> bool {
        self.bank_name.is_some() || self.bank_number.is_some()
    }

    fn bound_roles(&self) -> impl Iterator<Item = (Role, &str)> {
        [
            (Role::Contact, Some(self.contact.as_str())),
            (Role::DueDate, Some(self.due_date.as_str())),
            (Role::Link, Some(self.link.as_str())),
            (Role::BankName, self.bank_name.as_deref()),
            (Role::BankNumber, self.bank_number.as_deref()),
            (Role::Amount, Some(self.amount.as_str())),
        ]
        .into_iter()
        .filter_map(|(role, id)| id.map(|id| (role, id)))
    }
}

fn check_position(descriptor: &FieldDescriptor, expected: Role) -> Result<()> {
    match descriptor.role {
        Some(declared) if declared != expected => Err(StatementError::MisorderedField {
            id: descriptor.id.clone(),
            expected,
            declared,
        }),
        _ => Ok(()),
    }
}

/// Explicit role-by-name binding.
#[derive(Debug, Clone, Default)]
pub struct FieldBindingBuilder {
    contact: Option<String>,
    due_date: Option<String>,
    link: Option<String>,
    amount: Option<String>,
    bank_name: Option<String>,
    bank_number: Option<String>,
}

impl FieldBindingBuilder {
    pub fn role(mut self, role: Role, id: impl Into<String>) -> Self {
        let id = Some(id.into());
        match role {
            Role::Contact => self.contact = id,
            Role::DueDate => self.due_date = id,
            Role::Link => self.link = id,
            Role::Amount => self.amount = id,
            Role::BankName => self.bank_name = id,
            Role::BankNumber => self.bank_number = id,
        }
        self
    }

    pub fn contact(self, id: impl Into<String>) -> Self {
        self.role(Role::Contact, id)
    }

    pub fn due_date(self, id: impl Into<String>) -> Self {
        self.role(Role::DueDate, id)
    }

    pub fn link(self, id: impl Into<String>) -> Self {
        self.role(Role::Link, id)
    }

    pub fn amount(self, id: impl Into<String>) -> Self {
        self.role(Role::Amount, id)
    }

    pub fn bank_name(self, id: impl Into<String>) -> Self {
        self.role(Role::BankName, id)
    }

    pub fn bank_number(self, id: impl Into<String>) -> Self {
        self.role(Role::BankNumber, id)
    }

    pub fn build(self) -> Result<FieldBinding> {
        let binding = FieldBinding {
            contact: self.contact.ok_or(StatementError::MissingRole(Role::Contact))?,
            due_date: self.due_date.ok_or(StatementError::MissingRole(Role::DueDate))?,
            link: self.link.ok_or(StatementError::MissingRole(Role::Link))?,
            amount: self.amount.ok_or(StatementError::MissingRole(Role::Amount))?,
            bank_name: self.bank_name,
            bank_number: self.bank_number,
        };

        let mut seen: Vec<(Role, &str)> = Vec::with_capacity(6);
        for (role, id) in binding.bound_roles() {
            if id.trim().is_empty() {
                return Err(StatementError::InvalidField {
                    role,
                    reason: "field id is empty".to_string(),
                });
            }
            if let Some((first, _)) = seen.iter().find(|(_, other)| *other == id) {
                return Err(StatementError::DuplicateField {
                    id: id.to_string(),
                    first: *first,
                    second: role,
                });
            }
            seen.push((role, id));
        }

        Ok(binding)
    }
}
