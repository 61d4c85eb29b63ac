//! Column-name contract and output ordering.
//!
//! Column names are part of the file contract with downstream consumers —
//! the output order is fixed and explicit, not derived from the input.

use crate::error::EnrichError;
use crate::model::{Mode, Table};

// ---------------------------------------------------------------------------
// Canonical column names
// ---------------------------------------------------------------------------

pub const CPF: &str = "CPF";
pub const FONE_COLUMNS: [&str; 4] = ["FONE1", "FONE2", "FONE3", "FONE4"];
pub const BIRTH_DATE: &str = "Data_Nascimento";
pub const EMAIL: &str = "EMAIL";
pub const TELEFONE: &str = "TELEFONE";
pub const NAME: &str = "Nome";
pub const FIRST_NAME: &str = "Primeiro_Nome";
pub const LAST_NAME: &str = "Sobrenome";

/// Accepted spellings of the master file's identifier column, checked in
/// order. If none is present the run aborts.
pub const CPF_ALIASES: [&str; 3] = ["CPF", "cpf", "Nu_CPF"];

/// Auxiliary-file header variants canonicalized at load time.
pub const HEADER_RENAMES: [(&str, &str); 2] = [("NuCPF", CPF), ("Nascimento", BIRTH_DATE)];

// ---------------------------------------------------------------------------
// Output column order
// ---------------------------------------------------------------------------

pub const OUTPUT_COLUMNS_OUTBOUND: [&str; 16] = [
    "CPF",
    "Nome",
    "Convenio",
    "Matricula",
    "Orgao",
    "Limite_Emprestimo",
    "Limite_Beneficio",
    "Limite_Cartao",
    "FONE1",
    "FONE2",
    "FONE3",
    "FONE4",
    "Data_Nascimento",
    "EMAIL",
    "Campanha",
    "Origem",
];

pub const OUTPUT_COLUMNS_APP: [&str; 17] = [
    "CPF",
    "Primeiro_Nome",
    "Sobrenome",
    "Convenio",
    "Matricula",
    "Orgao",
    "Limite_Emprestimo",
    "Limite_Beneficio",
    "Limite_Cartao",
    "FONE1",
    "FONE2",
    "FONE3",
    "FONE4",
    "Data_Nascimento",
    "EMAIL",
    "Campanha",
    "Origem",
];

pub fn output_columns(mode: Mode) -> &'static [&'static str] {
    match mode {
        Mode::Outbound => &OUTPUT_COLUMNS_OUTBOUND,
        Mode::App => &OUTPUT_COLUMNS_APP,
    }
}

// ---------------------------------------------------------------------------
// Reordering
// ---------------------------------------------------------------------------

/// Project the enriched table onto the fixed output column order.
///
/// App mode first derives `Primeiro_Nome`/`Sobrenome` from `Nome` and
/// introduces a blank `EMAIL` column when absent. Any fixed-list column
/// still missing at projection time aborts the run.
pub fn reorder(table: &Table, mode: Mode) -> Result<Table, EnrichError> {
    let mut working = table.clone();

    if mode == Mode::App {
        split_name(&mut working)?;
        if working.column_index(EMAIL).is_none() {
            working.push_column(EMAIL);
        }
    }

    let columns = output_columns(mode);
    let mut indices = Vec::with_capacity(columns.len());
    for &column in columns {
        let idx = working.column_index(column).ok_or_else(|| EnrichError::MissingColumn {
            file: "master".into(),
            column: column.into(),
        })?;
        indices.push(idx);
    }

    let headers = columns.iter().map(|c| c.to_string()).collect();
    let rows = working
        .rows
        .iter()
        .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
        .collect();

    Ok(Table { headers, rows })
}

/// Split `Nome` at the first whitespace boundary into first/last name.
fn split_name(table: &mut Table) -> Result<(), EnrichError> {
    let name_idx = table.column_index(NAME).ok_or_else(|| EnrichError::MissingColumn {
        file: "master".into(),
        column: NAME.into(),
    })?;
    let first_idx = table.push_column(FIRST_NAME);
    let last_idx = table.push_column(LAST_NAME);

    for row in &mut table.rows {
        let full = row[name_idx].trim();
        let (first, last) = match full.split_once(char::is_whitespace) {
            Some((first, rest)) => (first.to_string(), rest.trim().to_string()),
            None => (full.to_string(), String::new()),
        };
        row[first_idx] = first;
        row[last_idx] = last;
    }

    Ok(())
}
