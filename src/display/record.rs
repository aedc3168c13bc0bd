//! Record display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Record;

/// One table row; the position is the record's index in the store
#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Note")]
    note: String,
}

/// Format records with their positions as a table
///
/// `offset` is the position of the first record, for partial listings.
pub fn format_record_table(records: &[Record], offset: usize) -> String {
    if records.is_empty() {
        return "No records found.".to_string();
    }

    let rows = records.iter().enumerate().map(|(i, record)| RecordRow {
        position: offset + i,
        id: record.id.short(),
        date: record.date_string(),
        category: truncate(&record.category, 30),
        amount: record.amount.to_string(),
        note: truncate(&record.note, 40),
    });

    Table::new(rows).with(Style::psql()).to_string()
}

/// Format a single record's details
pub fn format_record_details(record: &Record, position: Option<usize>) -> String {
    let mut output = String::new();

    output.push_str(&format!("Record: {}\n", record.id));
    if let Some(position) = position {
        output.push_str(&format!("  Position:  {}\n", position));
    }
    output.push_str(&format!("  Date:      {}\n", record.date_string()));
    output.push_str(&format!("  Category:  {}\n", record.category));
    output.push_str(&format!("  Amount:    {}\n", record.amount));
    if !record.note.is_empty() {
        output.push_str(&format!("  Note:      {}\n", record.note));
    }

    output
}

/// Shorten to at most `max_len` characters, marking the cut with "..."
pub fn truncate(s: &str, max_len: usize) -> String {
    let single_line = s.replace(['\n', '\r'], " ");
    if single_line.chars().count() <= max_len {
        single_line
    } else {
        let kept: String = single_line.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
