//! CSV file I/O with atomic writes
//!
//! The record file is comma-delimited with a header row. Writes go to a
//! temporary sibling file which is synced and then renamed over the target,
//! so the file is either completely rewritten or left untouched.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use uuid::Uuid;

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{parse_date, Money, Record, RecordId};

/// Header written to every record file
pub const HEADER: [&str; 5] = ["date", "category", "amount", "note", "id"];

/// Fewest columns a row may have (legacy `date,description,amount` files)
const MIN_COLUMNS: usize = 3;

/// Read all records from a file, returning an empty list if it doesn't exist
pub fn read_records<P: AsRef<Path>>(path: P) -> ExpenseResult<Vec<Record>> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)
        .map_err(|e| ExpenseError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    parse_records(BufReader::new(file))
}

/// Parse records from CSV text
///
/// Fails on the first malformed row with a `Parse` error naming its line.
/// Rows written before ids existed get an id derived from their line number
/// and contents, so it is the same on every read until the file is rewritten
/// with real ids.
pub fn parse_records<R: Read>(reader: R) -> ExpenseResult<Vec<Record>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        // Zero-byte file
        return Ok(Vec::new());
    }
    let first = headers.get(0).unwrap_or_default().trim();
    if !first.eq_ignore_ascii_case("date") {
        return Err(ExpenseError::Parse {
            line: 1,
            message: format!("expected a header row starting with 'date', found '{}'", first),
        });
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let line = row.position().map(|p| p.line()).unwrap_or(0);
        records.push(parse_row(&row, line)?);
    }

    Ok(records)
}

/// Turn one CSV row into a record
fn parse_row(row: &StringRecord, line: u64) -> ExpenseResult<Record> {
    let parse_error = |message: String| ExpenseError::Parse { line, message };

    if row.len() < MIN_COLUMNS || row.len() > HEADER.len() {
        return Err(parse_error(format!(
            "expected {} to {} columns, found {}",
            MIN_COLUMNS,
            HEADER.len(),
            row.len()
        )));
    }

    let raw_date = &row[0];
    let date = parse_date(raw_date)
        .ok_or_else(|| parse_error(format!("invalid date '{}'", raw_date)))?;

    let amount = Money::parse(&row[2]).map_err(|e| parse_error(e.to_string()))?;

    let id = match row.get(4).map(str::trim) {
        Some(raw) if !raw.is_empty() => raw
            .parse::<RecordId>()
            .map_err(|e| parse_error(format!("invalid id '{}': {}", raw, e)))?,
        _ => legacy_id(row, line),
    };

    Ok(Record {
        id,
        date,
        category: row[1].to_string(),
        amount,
        note: row.get(3).unwrap_or_default().to_string(),
    })
}

/// Stable id for a row that has none
fn legacy_id(row: &StringRecord, line: u64) -> RecordId {
    let mut key = line.to_string();
    for field in row.iter() {
        key.push('\u{1f}');
        key.push_str(field);
    }
    RecordId::from(Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes()))
}

/// Serialize records, header first, to any writer
pub fn write_records<W: Write>(writer: W, records: &[Record]) -> ExpenseResult<()> {
    let mut writer = WriterBuilder::new().from_writer(writer);

    writer.write_record(HEADER)?;
    for record in records {
        writer.write_record([
            record.date_string(),
            record.category.clone(),
            record.amount.to_decimal_string(),
            record.note.clone(),
            record.id.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Serialize records to a CSV string
pub fn records_to_string(records: &[Record]) -> ExpenseResult<String> {
    let mut buffer = Vec::new();
    write_records(&mut buffer, records)?;
    String::from_utf8(buffer)
        .map_err(|e| ExpenseError::Storage(format!("Serialized records are not UTF-8: {}", e)))
}

/// Write records to a file atomically (write to temp, then rename)
pub fn write_records_atomic<P: AsRef<Path>>(path: P, records: &[Record]) -> ExpenseResult<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            ExpenseError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = path.with_extension("csv.tmp");

    let file = File::create(&temp_path)
        .map_err(|e| ExpenseError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    let written = write_records(&mut writer, records).and_then(|_| {
        writer
            .flush()
            .map_err(|e| ExpenseError::Storage(format!("Failed to flush data: {}", e)))?;
        writer
            .get_ref()
            .sync_all()
            .map_err(|e| ExpenseError::Storage(format!("Failed to sync data: {}", e)))
    });

    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        ExpenseError::Storage(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}
