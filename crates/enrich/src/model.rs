use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Raw tables
// ---------------------------------------------------------------------------

/// A parsed delimited file: header row plus data rows.
///
/// Cells are plain strings; the empty string marks a missing value
/// (delimited text has no other out-of-band marker).
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, mut rows: Vec<Vec<String>>) -> Self {
        // Ragged rows are padded so every cell access is in bounds.
        let width = headers.len();
        for row in &mut rows {
            row.resize(width, String::new());
        }
        Self { headers, rows }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Append a column filled with empty cells. Returns its index.
    pub fn push_column(&mut self, name: &str) -> usize {
        self.headers.push(name.to_string());
        for row in &mut self.rows {
            row.push(String::new());
        }
        self.headers.len() - 1
    }
}

// ---------------------------------------------------------------------------
// Operating mode
// ---------------------------------------------------------------------------

/// Operating profile. Mode-specific behavior is confined to the phone
/// country-code rule, the mapper's target-column set, and the reorderer's
/// name-split step; everything else is one shared pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Outbound,
    App,
}

impl Default for Mode {
    fn default() -> Self {
        Self::App
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Outbound => write!(f, "outbound"),
            Self::App => write!(f, "app"),
        }
    }
}

// ---------------------------------------------------------------------------
// Source records
// ---------------------------------------------------------------------------

/// Merge-conflict tier of an auxiliary file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Low,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Low => write!(f, "low"),
        }
    }
}

/// One auxiliary row after normalization.
///
/// `cpf` is 11 zero-padded digits, or the raw value unchanged when it held
/// no digits (such a record is unmatchable but preserved). Phones hold the
/// validated number or the `"0"` sentinel; absent columns were synthesized
/// as the sentinel at load time.
#[derive(Debug, Clone, Serialize)]
pub struct SourceRecord {
    pub cpf: String,
    pub phones: [String; 4],
    pub birth_date: Option<String>,
    pub email: Option<String>,
}

/// One loaded auxiliary file: records plus its merge tier.
#[derive(Debug, Clone)]
pub struct SourceBatch {
    pub name: String,
    pub priority: Priority,
    pub records: Vec<SourceRecord>,
}

// ---------------------------------------------------------------------------
// Merge table
// ---------------------------------------------------------------------------

/// Priority-merged lookup table, at most one entry per cpf.
#[derive(Debug, Default)]
pub struct MergeTable {
    pub entries: BTreeMap<String, SourceRecord>,
}

impl MergeTable {
    pub fn get(&self, cpf: &str) -> Option<&SourceRecord> {
        self.entries.get(cpf)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Run output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct EnrichMeta {
    pub config_name: String,
    pub mode: Mode,
    pub engine_version: String,
    pub run_at: String,
}

/// Result of one enrichment pass: the reordered output table plus
/// meta/summary for reporting. The table itself is exported as CSV by the
/// caller; only meta and summary are serialized.
#[derive(Debug)]
pub struct EnrichResult {
    pub meta: EnrichMeta,
    pub summary: crate::report::RunSummary,
    pub table: Table,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ragged_rows_are_padded() {
        let table = Table::new(
            vec!["A".into(), "B".into(), "C".into()],
            vec![vec!["1".into()], vec!["2".into(), "3".into(), "4".into()]],
        );
        assert_eq!(table.cell(0, 1), "");
        assert_eq!(table.cell(0, 2), "");
        assert_eq!(table.cell(1, 2), "4");
    }

    #[test]
    fn cell_out_of_bounds_is_empty() {
        let table = Table::new(vec!["A".into()], vec![vec!["x".into()]]);
        assert_eq!(table.cell(5, 0), "");
        assert_eq!(table.cell(0, 5), "");
    }

    #[test]
    fn push_column_extends_all_rows() {
        let mut table = Table::new(
            vec!["A".into()],
            vec![vec!["1".into()], vec!["2".into()]],
        );
        let idx = table.push_column("B");
        assert_eq!(idx, 1);
        assert_eq!(table.cell(0, 1), "");
        assert_eq!(table.rows[1].len(), 2);
    }
}
