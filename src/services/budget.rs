//! Budget enforcement
//!
//! Spending in a period is the magnitude of all negative amounts dated in
//! that period. A new expense is refused when it would push spending past the
//! monthly or yearly limit of the period its own date falls in.

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{BudgetLimits, Money, Record, SummaryPeriod};

/// Total spending (as a positive amount) among records dated in `period`
pub fn spending_in(records: &[Record], period: &SummaryPeriod) -> ExpenseResult<Money> {
    Money::checked_sum(
        records
            .iter()
            .filter(|r| r.is_expense() && period.contains(r.date))
            .map(|r| r.amount.abs()),
    )
    .ok_or_else(|| {
        ExpenseError::Validation(format!("{} spending in {} is out of range", period.kind(), period))
    })
}

/// Refuse `candidate` if it would exceed a configured limit
///
/// Income and zero amounts are always accepted. The monthly limit is checked
/// before the yearly one.
pub fn check_budget(
    records: &[Record],
    candidate: &Record,
    limits: &BudgetLimits,
) -> ExpenseResult<()> {
    if !candidate.is_expense() {
        return Ok(());
    }

    let attempted = candidate.amount.abs();
    let checks = [
        (SummaryPeriod::month_of(candidate.date), limits.monthly),
        (SummaryPeriod::year_of(candidate.date), limits.yearly),
    ];

    for (period, limit) in checks {
        let Some(limit) = limit else { continue };

        let spent = spending_in(records, &period)?;
        let projected = spent.checked_add(attempted).ok_or_else(|| {
            ExpenseError::Validation(format!(
                "Amount {} is too large to check against the {} budget",
                candidate.amount,
                period.kind().to_lowercase()
            ))
        })?;

        if projected > limit {
            tracing::info!(
                period = %period,
                limit = %limit,
                spent = %spent,
                attempted = %attempted,
                "budget refused new record"
            );
            return Err(ExpenseError::BudgetExceeded {
                period: format!("{} ({})", period.kind(), period),
                limit,
                spent,
                attempted,
            });
        }
    }

    Ok(())
}

/// How much of a period's limit has been used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetUsage {
    pub period: SummaryPeriod,
    pub limit: Money,
    pub spent: Money,
}

impl BudgetUsage {
    /// Usage for `period` under the matching limit, if one is set
    pub fn for_period(
        records: &[Record],
        period: SummaryPeriod,
        limits: &BudgetLimits,
    ) -> ExpenseResult<Option<Self>> {
        let limit = match period {
            SummaryPeriod::Month { .. } => limits.monthly,
            SummaryPeriod::Year(_) => limits.yearly,
        };
        let Some(limit) = limit else {
            return Ok(None);
        };

        Ok(Some(Self {
            period,
            limit,
            spent: spending_in(records, &period)?,
        }))
    }

    /// Amount left before the limit; negative once exceeded
    pub fn remaining(&self) -> Money {
        self.limit - self.spent
    }

    pub fn is_exceeded(&self) -> bool {
        self.spent > self.limit
    }
}
