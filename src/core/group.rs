//! Partitioning of sorted rows into per-contact groups.

use crate::domain::model::{Group, Row};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Groups rows by exact contact text, in order of first appearance. The
/// input is expected to be sorted already; row order within a group follows
/// the input. Totals are left at zero for the aggregator to fill.
pub fn group_rows(sorted_rows: Vec<Row>, contact_id: &str) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in sorted_rows {
        let key = row.text(contact_id);
        let slot = match index.get(&key) {
            Some(&slot) => slot,
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(Group {
                    key,
                    rows: Vec::new(),
                    total: Decimal::ZERO,
                });
                groups.len() - 1
            }
        };
        groups[slot].rows.push(row);
    }

    groups
}
