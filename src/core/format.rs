//! Display formatting for amounts and due dates.

use crate::core::coerce::{parse_amount, parse_instant};
use crate::domain::model::FieldValue;
use crate::utils::error::{Result, StatementError};
use crate::utils::validation::{
    validate_distinct, validate_non_blank, validate_non_empty, validate_range, Validate,
};
use chrono::format::{Item, StrftimeItems};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

pub const DEFAULT_DATE_FORMAT: &str = "%b %d, %Y";
pub const DEFAULT_BANK_SEPARATOR: &str = " \u{2022} ";
pub const MAX_FRACTION_DIGITS: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolPosition {
    #[default]
    Prefix,
    Suffix,
}

/// Number, currency and date conventions used when rendering a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub currency_code: String,
    /// Falls back to the currency code when empty.
    pub currency_symbol: String,
    pub symbol_position: SymbolPosition,
    pub decimal_separator: String,
    pub group_separator: String,
    pub fraction_digits: u32,
    pub date_format: String,
    pub bank_separator: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_code: "EUR".to_string(),
            currency_symbol: "\u{20ac}".to_string(),
            symbol_position: SymbolPosition::Prefix,
            decimal_separator: ".".to_string(),
            group_separator: ",".to_string(),
            fraction_digits: 2,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            bank_separator: DEFAULT_BANK_SEPARATOR.to_string(),
        }
    }
}

impl Validate for DisplayConfig {
    fn validate(&self) -> Result<()> {
        validate_non_blank("display.currency_code", &self.currency_code)?;
        validate_non_empty("display.decimal_separator", &self.decimal_separator)?;
        validate_non_empty("display.group_separator", &self.group_separator)?;
        validate_distinct(
            "display.group_separator",
            &self.group_separator,
            &self.decimal_separator,
        )?;
        validate_range(
            "display.fraction_digits",
            self.fraction_digits,
            0,
            MAX_FRACTION_DIGITS,
        )?;
        validate_non_blank("display.date_format", &self.date_format)?;
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(StatementError::InvalidConfigValueError {
                field: "display.date_format".to_string(),
                value: self.date_format.clone(),
                reason: "Not a valid strftime pattern".to_string(),
            });
        }
        Ok(())
    }
}

/// Outcome of formatting one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formatted {
    /// The value parsed and was rendered in display form.
    Value(String),
    /// The value did not parse; this is its raw text.
    Fallback(String),
    /// Nothing to show.
    Empty,
}

impl Formatted {
    pub fn text(&self) -> &str {
        match self {
            Formatted::Value(s) | Formatted::Fallback(s) => s,
            Formatted::Empty => "",
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Formatted::Value(s) | Formatted::Fallback(s) => s,
            Formatted::Empty => String::new(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Formatted::Fallback(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Formatted::Empty)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Formatter {
    config: DisplayConfig,
}

impl Formatter {
    pub fn new(config: DisplayConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Renders an amount such as `€1,234.50`. Rounds half away from zero.
    pub fn format_currency(&self, amount: Option<Decimal>) -> Formatted {
        let Some(amount) = amount else {
            return Formatted::Empty;
        };

        let digits = self.config.fraction_digits;
        let mut rounded =
            amount.round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero);
        let negative = rounded.is_sign_negative() && !rounded.is_zero();
        rounded.set_sign_positive(true);
        rounded.rescale(digits);

        let plain = rounded.to_string();
        let (int_part, frac_part) = match plain.split_once('.') {
            Some((int_part, frac_part)) => (int_part, Some(frac_part)),
            None => (plain.as_str(), None),
        };

        let mut number = group_digits(int_part, &self.config.group_separator);
        if let Some(frac_part) = frac_part {
            number.push_str(&self.config.decimal_separator);
            number.push_str(frac_part);
        }

        let sign = if negative { "-" } else { "" };
        let text = match (self.config.currency_symbol.is_empty(), self.config.symbol_position) {
            (false, SymbolPosition::Prefix) => {
                format!("{}{}{}", sign, self.config.currency_symbol, number)
            }
            (false, SymbolPosition::Suffix) => {
                format!("{}{} {}", sign, number, self.config.currency_symbol)
            }
            (true, SymbolPosition::Prefix) => {
                format!("{}{} {}", sign, self.config.currency_code, number)
            }
            (true, SymbolPosition::Suffix) => {
                format!("{}{} {}", sign, number, self.config.currency_code)
            }
        };
        Formatted::Value(text)
    }

    /// Coerces a raw amount and formats it. Values that are not numbers
    /// render as nothing.
    pub fn format_amount(&self, value: Option<&FieldValue>) -> Formatted {
        self.format_currency(value.and_then(parse_amount))
    }

    /// Renders a due date, e.g. `Jan 05, 2024`. Text that does not parse as
    /// a date is passed through unchanged.
    pub fn format_date(&self, value: Option<&FieldValue>) -> Formatted {
        let raw = match value {
            None => return Formatted::Empty,
            Some(value) => value.to_text(),
        };
        if raw.is_empty() {
            return Formatted::Empty;
        }

        let Some(instant) = value.and_then(parse_instant) else {
            return Formatted::Fallback(raw);
        };

        let mut out = String::new();
        match write!(out, "{}", instant.format(&self.config.date_format)) {
            Ok(()) => Formatted::Value(out),
            Err(_) => Formatted::Fallback(raw),
        }
    }

    pub fn bank_separator(&self) -> &str {
        &self.config.bank_separator
    }
}

fn group_digits(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + separator.len() * (len / 3));
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    #[test]
    fn test_currency_absent_is_empty() {
        let formatter = Formatter::default();
        assert_eq!(formatter.format_currency(None), Formatted::Empty);
        assert_eq!(formatter.format_amount(None).text(), "");
        assert_eq!(formatter.format_amount(Some(&text("NaN"))).text(), "");
        assert_eq!(formatter.format_amount(Some(&FieldValue::from(f64::NAN))).text(), "");
    }

    #[test]
    fn test_currency_rounds_to_two_digits() {
        let formatter = Formatter::default();
        assert_eq!(
            formatter.format_amount(Some(&FieldValue::from(12.345))).text(),
            "\u{20ac}12.35"
        );
        assert_eq!(formatter.format_currency(Some(dec("150"))).text(), "\u{20ac}150.00");
        assert_eq!(formatter.format_currency(Some(dec("0.004"))).text(), "\u{20ac}0.00");
    }

    #[test]
    fn test_currency_groups_thousands() {
        let formatter = Formatter::default();
        assert_eq!(
            formatter.format_currency(Some(dec("1234567.5"))).text(),
            "\u{20ac}1,234,567.50"
        );
        assert_eq!(formatter.format_currency(Some(dec("999"))).text(), "\u{20ac}999.00");
        assert_eq!(formatter.format_currency(Some(dec("1000"))).text(), "\u{20ac}1,000.00");
    }

    #[test]
    fn test_currency_negative_values() {
        let formatter = Formatter::default();
        assert_eq!(formatter.format_currency(Some(dec("-42.5"))).text(), "-\u{20ac}42.50");
        assert_eq!(formatter.format_currency(Some(dec("-0.001"))).text(), "\u{20ac}0.00");
    }

    #[test]
    fn test_currency_suffix_style() {
        let formatter = Formatter::new(DisplayConfig {
            currency_symbol: "\u{20ac}".to_string(),
            symbol_position: SymbolPosition::Suffix,
            decimal_separator: ",".to_string(),
            group_separator: ".".to_string(),
            ..DisplayConfig::default()
        })
        .unwrap();
        assert_eq!(
            formatter.format_currency(Some(dec("1234.5"))).text(),
            "1.234,50 \u{20ac}"
        );
    }

    #[test]
    fn test_currency_code_without_symbol() {
        let formatter = Formatter::new(DisplayConfig {
            currency_code: "USD".to_string(),
            currency_symbol: String::new(),
            fraction_digits: 0,
            ..DisplayConfig::default()
        })
        .unwrap();
        assert_eq!(formatter.format_currency(Some(dec("1999.5"))).text(), "USD 2,000");
    }

    #[test]
    fn test_date_empty_and_absent() {
        let formatter = Formatter::default();
        assert_eq!(formatter.format_date(None), Formatted::Empty);
        assert_eq!(formatter.format_date(Some(&text(""))), Formatted::Empty);
        assert_eq!(formatter.format_date(Some(&FieldValue::Null)), Formatted::Empty);
    }

    #[test]
    fn test_date_unparseable_passes_through() {
        let formatter = Formatter::default();
        let result = formatter.format_date(Some(&text("not-a-date")));
        assert!(result.is_fallback());
        assert_eq!(result.text(), "not-a-date");
    }

    #[test]
    fn test_date_from_epoch_millis() {
        let formatter = Formatter::default();
        let result = formatter.format_date(Some(&FieldValue::from(1_704_412_800_000i64)));
        assert_eq!(result, Formatted::Value("Jan 05, 2024".to_string()));
    }

    #[test]
    fn test_date_from_date_value_and_string() {
        let formatter = Formatter::default();
        let date = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        assert_eq!(formatter.format_date(Some(&FieldValue::Date(date))).text(), "Mar 09, 2024");
        assert_eq!(formatter.format_date(Some(&text("2024-01-10"))).text(), "Jan 10, 2024");
        assert_eq!(formatter.format_date(Some(&text("20240201"))).text(), "Feb 01, 2024");
    }

    #[test]
    fn test_custom_date_format() {
        let formatter = Formatter::new(DisplayConfig {
            date_format: "%d.%m.%Y".to_string(),
            ..DisplayConfig::default()
        })
        .unwrap();
        assert_eq!(formatter.format_date(Some(&text("2024-01-05"))).text(), "05.01.2024");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let bad_pattern = DisplayConfig {
            date_format: "%Q".to_string(),
            ..DisplayConfig::default()
        };
        assert!(Formatter::new(bad_pattern).is_err());

        let same_separators = DisplayConfig {
            decimal_separator: ",".to_string(),
            ..DisplayConfig::default()
        };
        assert!(Formatter::new(same_separators).is_err());

        let too_precise = DisplayConfig {
            fraction_digits: 9,
            ..DisplayConfig::default()
        };
        assert!(Formatter::new(too_precise).is_err());
    }

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits("0", ","), "0");
        assert_eq!(group_digits("123", ","), "123");
        assert_eq!(group_digits("1234", " "), "1 234");
        assert_eq!(group_digits("123456", ","), "123,456");
    }
}
