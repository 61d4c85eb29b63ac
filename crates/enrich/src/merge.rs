//! Multi-source priority merge.

use crate::model::{MergeTable, Priority, SourceBatch};

/// Combine loaded batches into one lookup table keyed by cpf.
///
/// All high-priority batches are folded in load order first, then the low
/// tier; insert-if-absent makes the first occurrence win. A cpf present in
/// both tiers therefore resolves to the high-priority value regardless of
/// load order, and within a tier to the earliest-loaded file.
pub fn merge(batches: &[SourceBatch]) -> MergeTable {
    let mut table = MergeTable::default();

    for tier in [Priority::High, Priority::Low] {
        for batch in batches.iter().filter(|b| b.priority == tier) {
            for record in &batch.records {
                table
                    .entries
                    .entry(record.cpf.clone())
                    .or_insert_with(|| record.clone());
            }
        }
    }

    table
}
