//! Record commands: add, list, show, delete

use clap::{ArgGroup, Args};

use crate::display::{format_record_details, format_record_table};
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{BudgetLimits, Money};
use crate::services::{ExpenseService, NewRecord};
use crate::storage::Storage;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Amount, negative for expenses (e.g. --amount=-12.50)
    #[arg(short, long, allow_hyphen_values = true)]
    pub amount: String,

    /// Category or description
    #[arg(short, long, default_value = "")]
    pub category: String,

    /// Date (YYYY-MM-DD), defaults to today
    #[arg(short, long)]
    pub date: Option<String>,

    /// Free-text note
    #[arg(short, long, default_value = "")]
    pub note: String,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only show the most recent N records
    #[arg(short, long)]
    pub limit: Option<usize>,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Record id, full or the short form shown by `list`
    pub id: String,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("target").required(true).args(["position", "id"])))]
pub struct DeleteArgs {
    /// Zero-based position as shown by `list`
    pub position: Option<usize>,

    /// Record id, full or the short form shown by `list`
    #[arg(long)]
    pub id: Option<String>,
}

/// Handle `add`
pub fn handle_add(storage: &Storage, limits: &BudgetLimits, args: AddArgs) -> ExpenseResult<()> {
    let service = ExpenseService::new(storage);

    let mut input = NewRecord::new(args.category, args.amount).with_note(args.note);
    input.date = args.date;

    let record = service.create(input, limits)?;
    println!("Added {}: {}", record.id.short(), record);

    Ok(())
}

/// Handle `list`
pub fn handle_list(storage: &Storage, args: ListArgs) -> ExpenseResult<()> {
    let records = ExpenseService::new(storage).list()?;

    let offset = args
        .limit
        .map(|limit| records.len().saturating_sub(limit))
        .unwrap_or(0);
    let shown = &records[offset..];

    println!("{}", format_record_table(shown, offset));

    if !records.is_empty() {
        let total: Money = records.iter().map(|r| r.amount).sum();
        println!();
        println!("Showing {} of {} record(s). Total: {}", shown.len(), records.len(), total);
    }

    Ok(())
}

/// Handle `show`
pub fn handle_show(storage: &Storage, args: ShowArgs) -> ExpenseResult<()> {
    let service = ExpenseService::new(storage);
    let id = service.resolve_id(&args.id)?;
    let (position, record) = service
        .get(id)?
        .ok_or_else(|| ExpenseError::record_not_found(&args.id))?;

    print!("{}", format_record_details(&record, Some(position)));
    Ok(())
}

/// Handle `delete`
pub fn handle_delete(storage: &Storage, args: DeleteArgs) -> ExpenseResult<()> {
    let service = ExpenseService::new(storage);

    if let Some(identifier) = args.id {
        let id = service.resolve_id(&identifier)?;
        let record = service.delete(id)?;
        println!("Deleted {}: {}", record.id.short(), record);
        return Ok(());
    }

    if let Some(position) = args.position {
        match service.delete_at(position)? {
            Some(record) => println!("Deleted #{}: {}", position, record),
            None => println!("No record at position {}; nothing deleted.", position),
        }
    }

    Ok(())
}
