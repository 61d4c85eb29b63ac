//! Structured run report.
//!
//! The report is a collaborator passed through the pipeline: stages append
//! events, the engine derives a summary at the end. Presentation (stderr
//! lines, JSON file) is the caller's business.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::Priority;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ReportEvent {
    /// Delimiter inferred for a file (observational only).
    DelimiterDetected { file: String, delimiter: char },
    /// One auxiliary file normalized into records.
    SourceLoaded {
        file: String,
        priority: Priority,
        records: usize,
        invalid_phones: usize,
    },
    /// An expected phone column was absent and filled with the sentinel.
    ColumnSynthesized { file: String, column: String },
    /// Master rows matched against the merge table.
    MappingApplied { matched_rows: usize },
    /// Cells replaced in one target column.
    ColumnUpdated { column: String, updated: usize },
    /// App-mode birth date not shaped `YYYY-MM-DD`; value skipped.
    MalformedDate { cpf: String, value: String },
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub events: Vec<ReportEvent>,
}

impl RunReport {
    pub fn push(&mut self, event: ReportEvent) {
        self.events.push(event);
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub master_rows: usize,
    pub merge_entries: usize,
    pub matched_rows: usize,
    pub updated_cells: usize,
    pub invalid_phones: usize,
    pub malformed_dates: usize,
    pub column_updates: BTreeMap<String, usize>,
}

/// Fold the event stream into summary counts.
pub fn compute_summary(report: &RunReport, master_rows: usize, merge_entries: usize) -> RunSummary {
    let mut matched_rows = 0;
    let mut invalid_phones = 0;
    let mut malformed_dates = 0;
    let mut column_updates: BTreeMap<String, usize> = BTreeMap::new();

    for event in &report.events {
        match event {
            ReportEvent::SourceLoaded { invalid_phones: n, .. } => invalid_phones += n,
            ReportEvent::MappingApplied { matched_rows: n } => matched_rows += n,
            ReportEvent::ColumnUpdated { column, updated } => {
                *column_updates.entry(column.clone()).or_insert(0) += updated;
            }
            ReportEvent::MalformedDate { .. } => malformed_dates += 1,
            ReportEvent::DelimiterDetected { .. } | ReportEvent::ColumnSynthesized { .. } => {}
        }
    }

    RunSummary {
        master_rows,
        merge_entries,
        matched_rows,
        updated_cells: column_updates.values().sum(),
        invalid_phones,
        malformed_dates,
        column_updates,
    }
}

/// Full report document for JSON output.
#[derive(Debug, Serialize)]
pub struct ReportDocument<'a> {
    pub meta: &'a crate::model::EnrichMeta,
    pub summary: &'a RunSummary,
    pub events: &'a [ReportEvent],
}

impl ReportDocument<'_> {
    pub fn to_json_pretty(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self).map_err(|e| e.to_string())
    }
}
