//! Export command

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::error::{ExpenseError, ExpenseResult};
use crate::export::{export_full_json, export_full_yaml, export_records_csv};
use crate::storage::Storage;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Same layout as the data file
    Csv,
    /// Records plus metadata, machine-readable
    Json,
    /// Records plus metadata, human-readable
    Yaml,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Export format
    #[arg(short, long, value_enum, default_value = "csv")]
    pub format: ExportFormat,

    /// Output file; stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Handle `export`
pub fn handle_export(storage: &Storage, args: ExportArgs) -> ExpenseResult<()> {
    match &args.output {
        Some(output) => {
            let file = File::create(output).map_err(|e| {
                ExpenseError::Export(format!("Failed to create file {}: {}", output.display(), e))
            })?;
            let mut writer = BufWriter::new(file);
            let count = write_export(storage, &mut writer, args.format, args.pretty)?;
            writer
                .flush()
                .map_err(|e| ExpenseError::Export(e.to_string()))?;

            println!("Exported {} record(s) to: {}", count, output.display());
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_export(storage, &mut writer, args.format, args.pretty)?;
            writer
                .flush()
                .map_err(|e| ExpenseError::Export(e.to_string()))?;
        }
    }

    Ok(())
}

fn write_export<W: Write>(
    storage: &Storage,
    writer: &mut W,
    format: ExportFormat,
    pretty: bool,
) -> ExpenseResult<usize> {
    match format {
        ExportFormat::Csv => export_records_csv(storage, writer),
        ExportFormat::Json => export_full_json(storage, writer, pretty),
        ExportFormat::Yaml => export_full_yaml(storage, writer),
    }
}
