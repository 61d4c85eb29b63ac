// telfill CLI - headless CPF contact-enrichment runs

mod exit_codes;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use telfill_enrich::report::ReportDocument;
use telfill_enrich::{EnrichConfig, EnrichError, ReportEvent, RunReport, SourceBatch};

use exit_codes::{EXIT_INVALID_CONFIG, EXIT_MISSING_COLUMN, EXIT_RUNTIME, EXIT_SUCCESS};

#[derive(Parser)]
#[command(name = "telfill")]
#[command(about = "Fill CPF roster contact fields from auxiliary bases")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an enrichment pass from a TOML config file
    #[command(after_help = "\
Examples:
  telfill run enrich.toml
  telfill run enrich.toml --json
  telfill run enrich.toml --output out.csv --report report.json")]
    Run {
        /// Path to the run config file
        config: PathBuf,

        /// Print the JSON run report to stdout
        #[arg(long)]
        json: bool,

        /// Write the enriched table here instead of the configured path
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write the JSON run report to a file
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Validate a run config without touching any data files
    #[command(after_help = "\
Examples:
  telfill validate enrich.toml")]
    Validate {
        /// Path to the run config file
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { config, json, output, report } => cmd_run(config, json, output, report),
        Commands::Validate { config } => cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {message}");
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {hint}");
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    fn runtime(msg: impl Into<String>) -> Self {
        Self { code: EXIT_RUNTIME, message: msg.into(), hint: None }
    }
}

impl From<EnrichError> for CliError {
    fn from(err: EnrichError) -> Self {
        let (code, hint) = match &err {
            EnrichError::ConfigParse(_) | EnrichError::ConfigValidation(_) => {
                (EXIT_INVALID_CONFIG, None)
            }
            EnrichError::MissingIdentifierColumn { .. } => (
                EXIT_MISSING_COLUMN,
                Some("rename the master identifier column to one of the accepted aliases".into()),
            ),
            EnrichError::MissingColumn { .. } => (
                EXIT_MISSING_COLUMN,
                Some(
                    "a wrongly detected delimiter parses everything into one column; \
                     check the file's separator"
                        .into(),
                ),
            ),
            EnrichError::Io(_) => (EXIT_RUNTIME, None),
        };
        Self { code, message: err.to_string(), hint }
    }
}

fn cmd_run(
    config_path: PathBuf,
    json_output: bool,
    output_override: Option<PathBuf>,
    report_file: Option<PathBuf>,
) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| CliError::runtime(format!("cannot read config: {e}")))?;
    let config = EnrichConfig::from_toml(&config_str)?;

    // Data files resolve relative to the config file's directory
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));

    let mut report = RunReport::default();

    let master_path = base_dir.join(&config.master.file);
    let (master, delimiter) = telfill_io::csv::read_table_utf8(&master_path)
        .map_err(CliError::runtime)?;
    note_delimiter(&mut report, &config.master.file, delimiter);

    let mut batches: Vec<SourceBatch> = Vec::with_capacity(config.sources.len());
    for source in &config.sources {
        let source_path = base_dir.join(&source.file);
        let (table, delimiter) = telfill_io::csv::read_table_latin1(&source_path)
            .map_err(CliError::runtime)?;
        note_delimiter(&mut report, &source.file, delimiter);

        // Priority comes from the filename component, not the full path
        let name = source_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.file.clone());
        let batch =
            telfill_enrich::source::load_source(&name, &table, config.mode, source.priority, &mut report)?;
        batches.push(batch);
    }

    let result = telfill_enrich::run(&config, &master, &batches, &mut report)?;

    let output_path = output_override.unwrap_or_else(|| base_dir.join(&config.output));
    telfill_io::csv::write_table(&result.table, &output_path).map_err(CliError::runtime)?;
    eprintln!("wrote {}", output_path.display());

    let document = ReportDocument {
        meta: &result.meta,
        summary: &result.summary,
        events: &report.events,
    };
    let json_str = document
        .to_json_pretty()
        .map_err(|e| CliError::runtime(format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = report_file {
        std::fs::write(path, &json_str)
            .map_err(|e| CliError::runtime(format!("cannot write report: {e}")))?;
        eprintln!("wrote {}", path.display());
    }
    if json_output {
        println!("{json_str}");
    }

    // Human summary to stderr
    let s = &result.summary;
    eprintln!(
        "{}-mode run '{}': {} master rows, {} merge entries — {} matched, {} cells updated, {} invalid phones, {} malformed dates",
        result.meta.mode,
        result.meta.config_name,
        s.master_rows,
        s.merge_entries,
        s.matched_rows,
        s.updated_cells,
        s.invalid_phones,
        s.malformed_dates,
    );

    Ok(())
}

fn note_delimiter(report: &mut RunReport, file: &str, delimiter: u8) {
    eprintln!("detected delimiter '{}' for {file}", delimiter as char);
    report.push(ReportEvent::DelimiterDetected {
        file: file.into(),
        delimiter: delimiter as char,
    });
}

fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| CliError::runtime(format!("cannot read config: {e}")))?;
    let config = EnrichConfig::from_toml(&config_str)?;
    eprintln!(
        "valid: {}-mode run '{}' with {} source(s), output '{}'",
        config.mode,
        config.name,
        config.sources.len(),
        config.output,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn end_to_end_outbound_run() {
        let dir = tempdir().unwrap();

        fs::write(
            dir.path().join("master.csv"),
            "CPF;Nome;Convenio;Matricula;Orgao;Limite_Emprestimo;Limite_Beneficio;Limite_Cartao;\
             FONE1;FONE2;FONE3;FONE4;Data_Nascimento;EMAIL;Campanha;Origem\n\
             000.111.222-33;Joao Pereira;INSS;1;APOS;1500;300;800;11911111111;0;0;0;;;JUL24;site\n",
        )
        .unwrap();

        // Latin-1 auxiliary bases, one RVX-tagged
        fs::write(
            dir.path().join("base_RVX.csv"),
            b"NuCPF;FONE1;FONE2;FONE3;FONE4;Nascimento\n00011122233;5511999990000.0;0;0;0;1980-01-05\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("base_comum.csv"),
            b"CPF;FONE1;FONE2;FONE3;FONE4\n00011122233;11888880000;0;0;0\n",
        )
        .unwrap();

        fs::write(
            dir.path().join("enrich.toml"),
            r#"
name = "Outbound fill"
mode = "outbound"

[master]
file = "master.csv"

[[sources]]
file = "base_comum.csv"

[[sources]]
file = "base_RVX.csv"
"#,
        )
        .unwrap();

        cmd_run(dir.path().join("enrich.toml"), false, None, None).unwrap();

        let output = fs::read_to_string(dir.path().join("convenio.csv")).unwrap();
        let mut lines = output.lines();
        assert_eq!(
            lines.next().unwrap(),
            "CPF,Nome,Convenio,Matricula,Orgao,Limite_Emprestimo,Limite_Beneficio,Limite_Cartao,\
             FONE1,FONE2,FONE3,FONE4,Data_Nascimento,EMAIL,Campanha,Origem",
        );
        let row = lines.next().unwrap();
        // RVX wins the conflict; outbound mode strips the country code
        assert!(row.contains("11999990000"), "{row}");
        assert!(!row.contains("11888880000"), "{row}");
        // Birth-date gap filled from the tagged base
        assert!(row.contains("1980-01-05"), "{row}");
    }

    #[test]
    fn missing_identifier_column_maps_to_exit_code() {
        let dir = tempdir().unwrap();

        fs::write(dir.path().join("master.csv"), "Documento,Nome\n1,x\n").unwrap();
        fs::write(dir.path().join("base.csv"), "CPF;FONE1\n1;11987654321\n").unwrap();
        fs::write(
            dir.path().join("enrich.toml"),
            r#"
name = "fill"

[master]
file = "master.csv"

[[sources]]
file = "base.csv"
"#,
        )
        .unwrap();

        let err = cmd_run(dir.path().join("enrich.toml"), false, None, None).unwrap_err();
        assert_eq!(err.code, EXIT_MISSING_COLUMN);
        assert!(err.message.contains("Nu_CPF"), "{}", err.message);
        // No output on structural abort
        assert!(!dir.path().join("convenio.csv").exists());
    }

    #[test]
    fn invalid_config_maps_to_exit_code() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("enrich.toml"), "name = \"x\"\n").unwrap();
        let err = cmd_run(dir.path().join("enrich.toml"), false, None, None).unwrap_err();
        assert_eq!(err.code, EXIT_INVALID_CONFIG);
    }
}
