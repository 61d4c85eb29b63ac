//! Auxiliary-file loading: header canonicalization plus field normalization.

use crate::error::EnrichError;
use crate::model::{Mode, Priority, SourceBatch, SourceRecord, Table};
use crate::normalize::{normalize_cpf, validate_phone, PHONE_SENTINEL};
use crate::report::{ReportEvent, RunReport};
use crate::schema;

/// Merge tier from the filename marker: sources carrying "RVX" (any case)
/// are authoritative for conflicts.
pub fn priority_from_name(name: &str) -> Priority {
    if name.to_ascii_uppercase().contains("RVX") {
        Priority::High
    } else {
        Priority::Low
    }
}

/// Normalize one raw auxiliary table into a batch of source records.
///
/// Known header variants are canonicalized first (`NuCPF` → `CPF`,
/// `Nascimento` → `Data_Nascimento`). Absent phone columns are synthesized
/// with the invalid sentinel rather than failing; only a missing identifier
/// column is structural.
pub fn load_source(
    name: &str,
    table: &Table,
    mode: Mode,
    priority_override: Option<Priority>,
    report: &mut RunReport,
) -> Result<SourceBatch, EnrichError> {
    let headers = canonical_headers(&table.headers);

    let cpf_idx = headers
        .iter()
        .position(|h| h == schema::CPF)
        .ok_or_else(|| EnrichError::MissingColumn {
            file: name.into(),
            column: schema::CPF.into(),
        })?;

    // Resolve the four phone slots. A source with a single TELEFONE column
    // feeds slot 1 when no FONE1 exists.
    let telefone_idx = headers.iter().position(|h| h == schema::TELEFONE);
    let mut phone_indices: [Option<usize>; 4] = [None; 4];
    for (slot, column) in schema::FONE_COLUMNS.iter().enumerate() {
        phone_indices[slot] = headers.iter().position(|h| h == column);
    }
    if phone_indices[0].is_none() {
        phone_indices[0] = telefone_idx;
    }
    for (slot, idx) in phone_indices.iter().enumerate() {
        if idx.is_none() {
            report.push(ReportEvent::ColumnSynthesized {
                file: name.into(),
                column: schema::FONE_COLUMNS[slot].into(),
            });
        }
    }

    let birth_idx = headers.iter().position(|h| h == schema::BIRTH_DATE);
    let email_idx = headers.iter().position(|h| h == schema::EMAIL);

    let mut records = Vec::with_capacity(table.rows.len());
    let mut invalid_phones = 0;

    for row in 0..table.rows.len() {
        let cpf = normalize_cpf(table.cell(row, cpf_idx));

        let mut phones: [String; 4] = Default::default();
        for (slot, idx) in phone_indices.iter().enumerate() {
            phones[slot] = match idx {
                Some(i) => {
                    let raw = table.cell(row, *i).trim();
                    let validated = validate_phone(raw, mode);
                    // Blank cells and pre-existing sentinels are not noise
                    if validated == PHONE_SENTINEL && !raw.is_empty() && raw != PHONE_SENTINEL {
                        invalid_phones += 1;
                    }
                    validated
                }
                None => PHONE_SENTINEL.to_string(),
            };
        }

        let birth_date = birth_idx
            .map(|i| table.cell(row, i).trim())
            .filter(|v| !v.is_empty())
            .map(String::from);
        let email = email_idx
            .map(|i| table.cell(row, i).trim())
            .filter(|v| !v.is_empty())
            .map(String::from);

        records.push(SourceRecord { cpf, phones, birth_date, email });
    }

    let priority = priority_override.unwrap_or_else(|| priority_from_name(name));
    report.push(ReportEvent::SourceLoaded {
        file: name.into(),
        priority,
        records: records.len(),
        invalid_phones,
    });

    Ok(SourceBatch {
        name: name.into(),
        priority,
        records,
    })
}

fn canonical_headers(headers: &[String]) -> Vec<String> {
    headers
        .iter()
        .map(|h| {
            for (variant, canonical) in schema::HEADER_RENAMES {
                if h == variant {
                    return canonical.to_string();
                }
            }
            h.clone()
        })
        .collect()
}
