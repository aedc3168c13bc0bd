//! Summary commands

use clap::Subcommand;

use crate::display::{format_budget_usage, format_summary};
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{BudgetLimits, SummaryPeriod};
use crate::services::{BudgetUsage, ExpenseService};
use crate::storage::Storage;

/// Summary subcommands
#[derive(Subcommand, Debug)]
pub enum SummaryCommands {
    /// Summarize one month
    Month {
        /// Month as YYYY-MM, defaults to the current month
        month: Option<String>,
    },

    /// Summarize one year
    Year {
        /// Year as YYYY, defaults to the current year
        year: Option<String>,
    },
}

impl SummaryCommands {
    /// The period this command asks for
    pub fn period(&self) -> ExpenseResult<SummaryPeriod> {
        match self {
            Self::Month { month: Some(raw) } => {
                let period: SummaryPeriod = raw.parse()?;
                match period {
                    SummaryPeriod::Month { .. } => Ok(period),
                    SummaryPeriod::Year(_) => Err(ExpenseError::Validation(
                        format!("Expected a month as YYYY-MM, got '{}'", raw),
                    )),
                }
            }
            Self::Month { month: None } => Ok(SummaryPeriod::current_month()),
            Self::Year { year: Some(raw) } => {
                let period: SummaryPeriod = raw.parse()?;
                match period {
                    SummaryPeriod::Year(_) => Ok(period),
                    SummaryPeriod::Month { .. } => Err(ExpenseError::Validation(
                        format!("Expected a year as YYYY, got '{}'", raw),
                    )),
                }
            }
            Self::Year { year: None } => Ok(SummaryPeriod::current_year()),
        }
    }
}

/// Handle `summary`
pub fn handle_summary_command(
    storage: &Storage,
    limits: &BudgetLimits,
    cmd: SummaryCommands,
) -> ExpenseResult<()> {
    let period = cmd.period()?;
    print!("{}", render_period_summary(storage, limits, period)?);
    Ok(())
}

/// Summary text for a period, with budget usage when a limit applies
pub fn render_period_summary(
    storage: &Storage,
    limits: &BudgetLimits,
    period: SummaryPeriod,
) -> ExpenseResult<String> {
    let service = ExpenseService::new(storage);
    let summary = service.summary(&period)?;

    let mut output = format_summary(period.kind(), &summary);
    if let Some(usage) = BudgetUsage::for_period(&service.list()?, period, limits)? {
        output.push_str(&format_budget_usage(&usage));
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_parsing() {
        let cmd = SummaryCommands::Month {
            month: Some("2024-03".into()),
        };
        assert_eq!(cmd.period().unwrap(), SummaryPeriod::month(2024, 3).unwrap());

        let cmd = SummaryCommands::Year {
            year: Some("2024".into()),
        };
        assert_eq!(cmd.period().unwrap(), SummaryPeriod::year(2024));
    }

    #[test]
    fn test_period_kind_mismatch() {
        let cmd = SummaryCommands::Month {
            month: Some("2024".into()),
        };
        assert!(cmd.period().unwrap_err().is_validation());

        let cmd = SummaryCommands::Year {
            year: Some("2024-03".into()),
        };
        assert!(cmd.period().unwrap_err().is_validation());
    }

    #[test]
    fn test_defaults_to_current() {
        let cmd = SummaryCommands::Month { month: None };
        assert!(matches!(cmd.period().unwrap(), SummaryPeriod::Month { .. }));
    }
}
