use crate::config::EnrichConfig;
use crate::error::EnrichError;
use crate::model::{EnrichMeta, EnrichResult, SourceBatch, Table};
use crate::report::{self, RunReport};
use crate::{mapper, merge, schema};

/// Run one enrichment pass: merge → map → reorder.
///
/// Pure over its inputs; the report collects diagnostics along the way.
/// A structural error (missing identifier, missing output column) aborts
/// with no partial table.
pub fn run(
    config: &EnrichConfig,
    master: &Table,
    batches: &[SourceBatch],
    report: &mut RunReport,
) -> Result<EnrichResult, EnrichError> {
    let merge_table = merge::merge(batches);
    let mapped = mapper::apply(master, &merge_table, config.mode, report)?;
    let table = schema::reorder(&mapped, config.mode)?;

    let summary = report::compute_summary(report, master.rows.len(), merge_table.len());

    Ok(EnrichResult {
        meta: EnrichMeta {
            config_name: config.name.clone(),
            mode: config.mode,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        table,
    })
}
