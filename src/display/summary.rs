//! Summary display formatting

use crate::services::BudgetUsage;
use crate::storage::Summary;

use super::record::format_record_table;

/// Format a period summary: matching records, then totals
pub fn format_summary(title: &str, summary: &Summary) -> String {
    let mut output = String::new();

    output.push_str(&format!("{} summary for {}\n\n", title, summary.prefix));

    if summary.is_empty() {
        output.push_str("No records in this period.\n");
    } else {
        output.push_str(&format_record_table(&summary.records, 0));
        output.push('\n');
    }

    output.push('\n');
    output.push_str(&format!("  Records:   {}\n", summary.count()));
    output.push_str(&format!("  Income:    {}\n", summary.income));
    output.push_str(&format!("  Spending:  {}\n", summary.spending));
    output.push_str(&format!("  Total:     {}\n", summary.total));

    output
}

/// One line describing how much of a limit has been used
pub fn format_budget_usage(usage: &BudgetUsage) -> String {
    let status = if usage.is_exceeded() {
        format!("over by {}", -usage.remaining())
    } else {
        format!("{} remaining", usage.remaining())
    };

    format!(
        "  {} budget: {} of {} spent ({})\n",
        usage.period.kind(),
        usage.spent,
        usage.limit,
        status
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, Record, SummaryPeriod};
    use chrono::NaiveDate;

    #[test]
    fn test_format_summary() {
        let records = vec![
            Record::new(
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                "food",
                Money::from_cents(-1250),
            ),
            Record::new(
                NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
                "salary",
                Money::from_cents(5000),
            ),
        ];
        let summary = Summary::from_records("2024-03", &records).unwrap();
        let output = format_summary("Monthly", &summary);

        assert!(output.starts_with("Monthly summary for 2024-03"));
        assert!(output.contains("Records:   2"));
        assert!(output.contains("Income:    $50.00"));
        assert!(output.contains("Spending:  $12.50"));
        assert!(output.contains("Total:     $37.50"));
    }

    #[test]
    fn test_format_empty_summary() {
        let summary = Summary::from_records("1999", &Vec::<Record>::new()).unwrap();
        let output = format_summary("Yearly", &summary);
        assert!(output.contains("No records in this period."));
        assert!(output.contains("Total:     $0.00"));
    }

    #[test]
    fn test_format_budget_usage() {
        let usage = BudgetUsage {
            period: SummaryPeriod::month(2024, 3).unwrap(),
            limit: Money::from_cents(10000),
            spent: Money::from_cents(12000),
        };
        assert_eq!(
            format_budget_usage(&usage),
            "  Monthly budget: $120.00 of $100.00 spent (over by $20.00)\n"
        );
    }
}
