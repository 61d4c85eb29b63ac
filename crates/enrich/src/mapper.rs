//! Field-level enrichment of the master table from the merge table.

use crate::error::EnrichError;
use crate::model::{MergeTable, Mode, SourceRecord, Table};
use crate::normalize::normalize_cpf;
use crate::report::{ReportEvent, RunReport};
use crate::schema;

/// Which normalized source field feeds a master column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceField {
    Phone(usize),
    BirthDate,
    /// Birth date reformatted from `YYYY-MM-DD` to `DD/MM/YYYY`.
    BirthDateReformatted,
    Email,
}

/// Resolve the master identifier column against the accepted alias set.
pub fn resolve_cpf_column(table: &Table) -> Result<usize, EnrichError> {
    for alias in schema::CPF_ALIASES {
        if let Some(idx) = table.column_index(alias) {
            return Ok(idx);
        }
    }
    Err(EnrichError::MissingIdentifierColumn {
        headers: table.headers.clone(),
    })
}

/// The refresh targets for this run.
///
/// Outbound refreshes the four phone columns, plus the birth date only
/// when the master's birth-date column is absent or not fully populated.
/// App uses the explicit single-source mapping: phone 1, reformatted birth
/// date, and email.
fn target_columns(master: &Table, mode: Mode) -> Vec<(&'static str, SourceField)> {
    match mode {
        Mode::Outbound => {
            let mut targets: Vec<(&'static str, SourceField)> = schema::FONE_COLUMNS
                .iter()
                .enumerate()
                .map(|(slot, column)| (*column, SourceField::Phone(slot)))
                .collect();
            if birth_date_refresh_needed(master) {
                targets.push((schema::BIRTH_DATE, SourceField::BirthDate));
            }
            targets
        }
        Mode::App => vec![
            (schema::FONE_COLUMNS[0], SourceField::Phone(0)),
            (schema::BIRTH_DATE, SourceField::BirthDateReformatted),
            (schema::EMAIL, SourceField::Email),
        ],
    }
}

fn birth_date_refresh_needed(master: &Table) -> bool {
    match master.column_index(schema::BIRTH_DATE) {
        // Absent column = all missing.
        None => true,
        Some(idx) => (0..master.rows.len()).any(|row| master.cell(row, idx).trim().is_empty()),
    }
}

/// Project merge-table values onto the master. Strictly additive: a master
/// cell changes only when the merge table holds a value for that row's cpf,
/// and a populated cell is never cleared to blank.
pub fn apply(
    master: &Table,
    merge: &MergeTable,
    mode: Mode,
    report: &mut RunReport,
) -> Result<Table, EnrichError> {
    let cpf_idx = resolve_cpf_column(master)?;
    let targets = target_columns(master, mode);

    let mut out = master.clone();
    let target_indices: Vec<usize> = targets
        .iter()
        .map(|(column, _)| {
            out.column_index(column)
                .unwrap_or_else(|| out.push_column(column))
        })
        .collect();

    let mut matched_rows = 0;
    let mut updates = vec![0usize; targets.len()];

    for row in 0..out.rows.len() {
        let cpf = normalize_cpf(&out.rows[row][cpf_idx]);
        let Some(record) = merge.get(&cpf) else {
            continue;
        };
        matched_rows += 1;

        for (i, (&(_, field), &col_idx)) in targets.iter().zip(&target_indices).enumerate() {
            if let Some(value) = source_value(record, field, report) {
                out.rows[row][col_idx] = value;
                updates[i] += 1;
            }
        }
    }

    report.push(ReportEvent::MappingApplied { matched_rows });
    for ((column, _), updated) in targets.iter().zip(updates) {
        report.push(ReportEvent::ColumnUpdated {
            column: (*column).into(),
            updated,
        });
    }

    Ok(out)
}

/// The value to inject for one target, or `None` to retain the master's.
fn source_value(
    record: &SourceRecord,
    field: SourceField,
    report: &mut RunReport,
) -> Option<String> {
    match field {
        SourceField::Phone(slot) => Some(record.phones[slot].clone()),
        SourceField::BirthDate => record.birth_date.clone(),
        SourceField::BirthDateReformatted => {
            let raw = record.birth_date.as_deref()?;
            match reformat_birth_date(raw) {
                Some(formatted) => Some(formatted),
                None => {
                    report.push(ReportEvent::MalformedDate {
                        cpf: record.cpf.clone(),
                        value: raw.into(),
                    });
                    None
                }
            }
        }
        SourceField::Email => record.email.clone(),
    }
}

/// Rearrange a `YYYY-MM-DD` string into `DD/MM/YYYY`.
///
/// Shape-checked, not calendar-checked: exactly 10 chars, hyphens at 4 and
/// 7, digits elsewhere. Anything else is rejected so a garbled input never
/// produces a garbled output.
pub fn reformat_birth_date(value: &str) -> Option<String> {
    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let digits_ok = bytes
        .iter()
        .enumerate()
        .all(|(i, b)| matches!(i, 4 | 7) || b.is_ascii_digit());
    if !digits_ok {
        return None;
    }
    Some(format!("{}/{}/{}", &value[8..10], &value[5..7], &value[0..4]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Priority;
    use crate::normalize::PHONE_SENTINEL;

    fn master(headers: &[&str], rows: Vec<Vec<&str>>) -> Table {
        Table::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.into_iter()
                .map(|r| r.into_iter().map(String::from).collect())
                .collect(),
        )
    }

    fn merge_with(records: Vec<SourceRecord>) -> MergeTable {
        crate::merge::merge(&[crate::model::SourceBatch {
            name: "base.csv".into(),
            priority: Priority::Low,
            records,
        }])
    }

    fn record(cpf: &str, phone1: &str, birth: Option<&str>, email: Option<&str>) -> SourceRecord {
        SourceRecord {
            cpf: cpf.into(),
            phones: [
                phone1.into(),
                PHONE_SENTINEL.into(),
                PHONE_SENTINEL.into(),
                PHONE_SENTINEL.into(),
            ],
            birth_date: birth.map(String::from),
            email: email.map(String::from),
        }
    }

    #[test]
    fn identifier_aliases_resolve_in_order() {
        let t = master(&["Nu_CPF", "Nome"], vec![]);
        assert_eq!(resolve_cpf_column(&t).unwrap(), 0);
        let t = master(&["Nome", "cpf"], vec![]);
        assert_eq!(resolve_cpf_column(&t).unwrap(), 1);
    }

    #[test]
    fn missing_identifier_aborts_with_aliases_named() {
        let t = master(&["Nome", "FONE1"], vec![]);
        let err = resolve_cpf_column(&t).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("CPF") && msg.contains("cpf") && msg.contains("Nu_CPF"), "{msg}");
    }

    #[test]
    fn unmatched_rows_are_retained_unchanged() {
        let t = master(
            &["CPF", "FONE1", "FONE2", "FONE3", "FONE4", "Data_Nascimento"],
            vec![vec!["99999999999", "11911111111", "0", "0", "0", "01/01/1980"]],
        );
        let merge = merge_with(vec![record("00011122233", "11999990000", None, None)]);
        let mut report = RunReport::default();
        let out = apply(&t, &merge, Mode::Outbound, &mut report).unwrap();
        assert_eq!(out.rows[0], t.rows[0]);
    }

    #[test]
    fn matched_rows_take_merge_values() {
        let t = master(
            &["CPF", "FONE1", "FONE2", "FONE3", "FONE4", "Data_Nascimento"],
            vec![vec!["000.111.222-33", "11911111111", "0", "0", "0", "01/01/1980"]],
        );
        let merge = merge_with(vec![record("00011122233", "11999990000", None, None)]);
        let mut report = RunReport::default();
        let out = apply(&t, &merge, Mode::Outbound, &mut report).unwrap();
        // Master cpf is normalized before lookup, so the punctuated form matches
        assert_eq!(out.rows[0][1], "11999990000");
        // Birth date fully populated in master: not a refresh target
        assert_eq!(out.rows[0][5], "01/01/1980");
    }

    #[test]
    fn birth_date_refreshed_only_when_gaps_exist() {
        let headers = ["CPF", "FONE1", "FONE2", "FONE3", "FONE4", "Data_Nascimento"];
        let merge = merge_with(vec![
            record("00000000001", "11999990000", Some("1985-03-12"), None),
            record("00000000002", "11888880000", Some("1990-07-01"), None),
        ]);

        // One gap: the column becomes a target for every matched row
        let t = master(
            &headers,
            vec![
                vec!["00000000001", "0", "0", "0", "0", ""],
                vec!["00000000002", "0", "0", "0", "0", "02/02/1992"],
            ],
        );
        let mut report = RunReport::default();
        let out = apply(&t, &merge, Mode::Outbound, &mut report).unwrap();
        assert_eq!(out.rows[0][5], "1985-03-12");
        assert_eq!(out.rows[1][5], "1990-07-01");

        // Fully populated: column excluded from the target set
        let t = master(
            &headers,
            vec![vec!["00000000001", "0", "0", "0", "0", "05/05/1985"]],
        );
        let mut report = RunReport::default();
        let out = apply(&t, &merge, Mode::Outbound, &mut report).unwrap();
        assert_eq!(out.rows[0][5], "05/05/1985");
    }

    #[test]
    fn missing_source_birth_date_retains_master_value() {
        let t = master(
            &["CPF", "FONE1", "FONE2", "FONE3", "FONE4", "Data_Nascimento"],
            vec![
                vec!["00000000001", "0", "0", "0", "0", "03/03/1983"],
                vec!["00000000002", "0", "0", "0", "0", ""],
            ],
        );
        let merge = merge_with(vec![record("00000000001", "11999990000", None, None)]);
        let mut report = RunReport::default();
        let out = apply(&t, &merge, Mode::Outbound, &mut report).unwrap();
        // Matched, but the source has no birth date: populated value survives
        assert_eq!(out.rows[0][5], "03/03/1983");
    }

    #[test]
    fn app_mode_reformats_birth_date_and_maps_email() {
        let t = master(
            &["CPF", "Nome", "FONE1", "Data_Nascimento", "EMAIL"],
            vec![vec!["00000000001", "Ana Souza", "0", "", ""]],
        );
        let merge = merge_with(vec![record(
            "00000000001",
            "11999990000",
            Some("1985-03-12"),
            Some("ana@example.com"),
        )]);
        let mut report = RunReport::default();
        let out = apply(&t, &merge, Mode::App, &mut report).unwrap();
        assert_eq!(out.rows[0][2], "11999990000");
        assert_eq!(out.rows[0][3], "12/03/1985");
        assert_eq!(out.rows[0][4], "ana@example.com");
    }

    #[test]
    fn app_mode_malformed_birth_date_is_reported_not_injected() {
        let t = master(
            &["CPF", "FONE1", "Data_Nascimento", "EMAIL"],
            vec![vec!["00000000001", "0", "04/04/1984", ""]],
        );
        let merge = merge_with(vec![record("00000000001", "11999990000", Some("85-3-12"), None)]);
        let mut report = RunReport::default();
        let out = apply(&t, &merge, Mode::App, &mut report).unwrap();
        assert_eq!(out.rows[0][2], "04/04/1984");
        assert!(report
            .events
            .iter()
            .any(|e| matches!(e, ReportEvent::MalformedDate { value, .. } if value == "85-3-12")));
    }

    #[test]
    fn reformat_shapes() {
        assert_eq!(reformat_birth_date("1985-03-12").as_deref(), Some("12/03/1985"));
        assert_eq!(reformat_birth_date("1985-3-12"), None);
        assert_eq!(reformat_birth_date("1985/03/12"), None);
        assert_eq!(reformat_birth_date("1985-03-123"), None);
        assert_eq!(reformat_birth_date("aaaa-bb-cc"), None);
        assert_eq!(reformat_birth_date(""), None);
    }

    #[test]
    fn empty_merge_table_is_a_no_op() {
        let t = master(
            &["CPF", "FONE1", "FONE2", "FONE3", "FONE4", "Data_Nascimento"],
            vec![vec!["00000000001", "11911111111", "0", "0", "0", "01/01/1980"]],
        );
        let mut report = RunReport::default();
        let out = apply(&t, &MergeTable::default(), Mode::Outbound, &mut report).unwrap();
        assert_eq!(out.rows, t.rows);
    }
}
