//! HTML pages for the web surface

use axum::http::StatusCode;

use crate::models::{Money, Record};
use crate::services::BudgetUsage;
use crate::storage::Summary;

/// Escape text for inclusion in HTML content or attribute values
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn base_layout(title: &str, content: &str) -> String {
    let title = escape_html(title);
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
        body {{ font-family: sans-serif; margin: 2em; }}
        table {{ border-collapse: collapse; }}
        th, td {{ padding: 0.3em 0.8em; border-bottom: 1px solid #ddd; text-align: left; }}
        .amount {{ text-align: right; }}
        .negative {{ color: #b00; }}
        .error {{ color: #b00; }}
    </style>
</head>
<body>
    <nav><a href="/">Records</a> | <a href="/add">Add</a> | <a href="/summary">Summary</a> | <a href="/export">Export CSV</a></nav>
    <h1>{title}</h1>
    {content}
</body>
</html>
"##
    )
}

fn amount_cell(amount: Money) -> String {
    let class = if amount.is_negative() { "amount negative" } else { "amount" };
    format!(r#"<td class="{}">{}</td>"#, class, amount)
}

fn record_rows(records: &[Record], with_actions: bool) -> String {
    let mut rows = String::new();
    for (position, record) in records.iter().enumerate() {
        let actions = if with_actions {
            format!(
                r#"<td><a href="/delete/{position}">delete</a> <a href="/records/{id}/delete">delete by id</a></td>"#,
                position = position,
                id = record.id,
            )
        } else {
            String::new()
        };

        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td>{}<td>{}</td>{}</tr>\n",
            position,
            escape_html(&record.id.short()),
            record.date_string(),
            escape_html(&record.category),
            amount_cell(record.amount),
            escape_html(&record.note),
            actions,
        ));
    }
    rows
}

fn record_table(records: &[Record], with_actions: bool) -> String {
    if records.is_empty() {
        return "<p>No records found.</p>".to_string();
    }

    let actions_header = if with_actions { "<th></th>" } else { "" };
    format!(
        r#"<table>
<tr><th>#</th><th>ID</th><th>Date</th><th>Category</th><th class="amount">Amount</th><th>Note</th>{}</tr>
{}</table>"#,
        actions_header,
        record_rows(records, with_actions),
    )
}

/// The record list with delete links and the running total
pub fn index_page(records: &[Record]) -> String {
    let total: Money = records.iter().map(|r| r.amount).sum();
    let content = format!(
        "{}\n<p><strong>Total:</strong> {} across {} record(s)</p>",
        record_table(records, true),
        total,
        records.len(),
    );
    base_layout("Expenses", &content)
}

pub fn add_page() -> String {
    base_layout(
        "Add record",
        r#"<form method="post" action="/add">
    <p><label>Date <input type="date" name="date"></label> (blank for today)</p>
    <p><label>Category <input type="text" name="category" required></label></p>
    <p><label>Amount <input type="text" name="amount" placeholder="-12.50" required></label></p>
    <p><label>Note <input type="text" name="note"></label></p>
    <p><button type="submit">Add</button></p>
</form>"#,
    )
}

/// Totals for one period, with budget usage when a limit applies
pub fn summary_page(title: &str, summary: &Summary, usage: Option<&BudgetUsage>) -> String {
    let mut content = String::from(
        r#"<form method="get" action="/summary">
    <label>Period <input type="text" name="period" placeholder="YYYY-MM or YYYY"></label>
    <button type="submit">Show</button>
</form>
"#,
    );

    content.push_str(&record_table(&summary.records, false));
    content.push_str(&format!(
        r#"
<table>
<tr><th>Records</th><td>{}</td></tr>
<tr><th>Income</th>{}</tr>
<tr><th>Spending</th>{}</tr>
<tr><th>Total</th>{}</tr>
</table>"#,
        summary.count(),
        amount_cell(summary.income),
        amount_cell(summary.spending),
        amount_cell(summary.total),
    ));

    if let Some(usage) = usage {
        let class = if usage.is_exceeded() { " class=\"error\"" } else { "" };
        content.push_str(&format!(
            "\n<p{}>{} budget: {} of {} spent, {} remaining</p>",
            class,
            usage.period.kind(),
            usage.spent,
            usage.limit,
            usage.remaining(),
        ));
    }

    base_layout(&format!("{} summary for {}", title, summary.prefix), &content)
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let content = format!(
        r#"<p class="error">{}</p>
<p><a href="/">Back to records</a></p>"#,
        escape_html(message)
    );
    base_layout(
        &format!(
            "Error {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or_default()
        ),
        &content,
    )
}
