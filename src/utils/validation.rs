use crate::utils::error::{Result, StatementError};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(StatementError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(StatementError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// Rejects empty strings. Whitespace counts as content, since `" "` is a
/// legitimate grouping separator.
pub fn validate_non_empty(field_name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(StatementError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty".to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_blank(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(StatementError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(StatementError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_distinct(field_name: &str, left: &str, right: &str) -> Result<()> {
    if left == right {
        return Err(StatementError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: left.to_string(),
            reason: "Decimal and group separators must differ".to_string(),
        });
    }
    Ok(())
}
