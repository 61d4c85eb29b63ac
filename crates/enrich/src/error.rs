use std::fmt;

use crate::schema::CPF_ALIASES;

#[derive(Debug)]
pub enum EnrichError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (no sources, empty file name, etc.).
    ConfigValidation(String),
    /// The master file has no identifier column under any accepted alias.
    MissingIdentifierColumn { headers: Vec<String> },
    /// A required column is absent from a table.
    MissingColumn { file: String, column: String },
    /// IO error (file read, etc.).
    Io(String),
}

impl fmt::Display for EnrichError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingIdentifierColumn { headers } => {
                write!(
                    f,
                    "master file has no identifier column (expected one of: {}; found: {})",
                    CPF_ALIASES.join(", "),
                    headers.join(", "),
                )
            }
            Self::MissingColumn { file, column } => {
                write!(f, "'{file}': missing column '{column}'")
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for EnrichError {}
