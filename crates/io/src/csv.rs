// CSV import/export with per-file delimiter detection

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use telfill_enrich::model::Table;

/// Candidate delimiters in declaration order; the first wins ties.
pub const DELIMITER_CANDIDATES: [u8; 2] = [b',', b';'];

const SAMPLE_BYTES: usize = 1024;

/// Detect the field delimiter from the first 1024 bytes of a stream.
///
/// The sample is decoded as Windows-1252 (extended-Latin exports never
/// produce invalid bytes that way), each candidate is counted, and the
/// highest count wins — the comma on ties, including the degenerate case
/// where neither appears. The stream position is restored so the caller
/// can still parse the file from the start.
pub fn detect_delimiter<R: Read + Seek>(stream: &mut R) -> Result<u8, String> {
    let start = stream.stream_position().map_err(|e| e.to_string())?;

    let mut buf = [0u8; SAMPLE_BYTES];
    let mut filled = 0;
    loop {
        let n = stream.read(&mut buf[filled..]).map_err(|e| e.to_string())?;
        if n == 0 || filled + n == SAMPLE_BYTES {
            filled += n;
            break;
        }
        filled += n;
    }

    stream
        .seek(SeekFrom::Start(start))
        .map_err(|e| e.to_string())?;

    let (sample, _, _) = encoding_rs::WINDOWS_1252.decode(&buf[..filled]);

    let mut best = DELIMITER_CANDIDATES[0];
    let mut best_count = 0usize;
    for &candidate in &DELIMITER_CANDIDATES {
        let count = sample.matches(candidate as char).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }

    Ok(best)
}

/// Read an auxiliary file: Windows-1252 decode, auto-detected delimiter.
/// Returns the parsed table and the delimiter for diagnostics.
pub fn read_table_latin1(path: &Path) -> Result<(Table, u8), String> {
    let (bytes, delimiter) = read_bytes_with_delimiter(path)?;
    let (content, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
    let table = parse_table(&content, delimiter)?;
    Ok((table, delimiter))
}

/// Read the master file: UTF-8 first, Windows-1252 fallback (common for
/// Excel-exported CSVs), auto-detected delimiter.
pub fn read_table_utf8(path: &Path) -> Result<(Table, u8), String> {
    let (bytes, delimiter) = read_bytes_with_delimiter(path)?;
    let content = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    };
    let table = parse_table(&content, delimiter)?;
    Ok((table, delimiter))
}

fn read_bytes_with_delimiter(path: &Path) -> Result<(Vec<u8>, u8), String> {
    let mut file = File::open(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let delimiter = detect_delimiter(&mut file)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| format!("{}: {e}", path.display()))?;
    Ok((bytes, delimiter))
}

fn parse_table(content: &str, delimiter: u8) -> Result<Table, String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| e.to_string())?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| e.to_string())?;
        rows.push(record.iter().map(|f| f.to_string()).collect());
    }

    Ok(Table::new(headers, rows))
}

/// Export the enriched table: comma-separated, UTF-8, quoted as needed,
/// no row index.
pub fn write_table(table: &Table, path: &Path) -> Result<(), String> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| e.to_string())?;

    writer
        .write_record(&table.headers)
        .map_err(|e| e.to_string())?;
    for row in &table.rows {
        writer.write_record(row).map_err(|e| e.to_string())?;
    }

    writer.flush().map_err(|e| e.to_string())?;
    Ok(())
}
