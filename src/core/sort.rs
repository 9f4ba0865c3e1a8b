//! Row ordering by contact name, then due date.

use crate::core::binding::FieldBinding;
use crate::core::coerce::parse_instant;
use crate::domain::model::Row;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// Ordering key of a row. `None` due dates order before every real date.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SortKey {
    contact: String,
    due: Option<DateTime<Utc>>,
}

impl SortKey {
    pub fn of(row: &Row, binding: &FieldBinding) -> Self {
        Self {
            contact: collation_key(&row.text(binding.contact())),
            due: row.get(binding.due_date()).and_then(parse_instant),
        }
    }

    pub fn has_due_date(&self) -> bool {
        self.due.is_some()
    }
}

pub fn compare_rows(a: &Row, b: &Row, binding: &FieldBinding) -> Ordering {
    SortKey::of(a, binding).cmp(&SortKey::of(b, binding))
}

/// Stable sort; rows with equal keys keep their input order.
pub fn sort_rows(mut rows: Vec<Row>, binding: &FieldBinding) -> Vec<Row> {
    rows.sort_by_cached_key(|row| SortKey::of(row, binding));
    rows
}

/// Folds case and common Latin diacritics so that names compare at base
/// strength: "Émile", "emile" and "EMILE" are equal.
pub fn collation_key(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(strip_diacritic)
        .collect()
}

fn strip_diacritic(c: char) -> char {
    match c {
        'à'..='å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => 'c',
        'ď' | 'đ' => 'd',
        'è'..='ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => 'g',
        'ì'..='ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => 'i',
        'ĺ' | 'ļ' | 'ľ' | 'ł' => 'l',
        'ñ' | 'ń' | 'ņ' | 'ň' => 'n',
        'ò'..='ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => 'o',
        'ŕ' | 'ŗ' | 'ř' => 'r',
        'ś' | 'ŝ' | 'ş' | 'š' => 's',
        'ţ' | 'ť' => 't',
        'ù'..='ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'ý' | 'ÿ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        other => other,
    }
}
