//! Budget limits
//!
//! Optional monthly and yearly spending caps. The value is passed explicitly
//! to the operations that enforce it.

use serde::{Deserialize, Serialize};

use super::money::{Money, MAX_AMOUNT_CENTS};
use crate::error::{ExpenseError, ExpenseResult};

/// Monthly and yearly spending limits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetLimits {
    /// Maximum spending per calendar month
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly: Option<Money>,

    /// Maximum spending per calendar year
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yearly: Option<Money>,
}

impl BudgetLimits {
    /// No limits at all
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Build limits, validating that they are positive.
    ///
    /// A monthly limit without a yearly one implies a yearly limit of twelve
    /// months.
    pub fn new(monthly: Option<Money>, yearly: Option<Money>) -> ExpenseResult<Self> {
        for (name, limit) in [("Monthly", monthly), ("Yearly", yearly)] {
            if let Some(limit) = limit {
                if !limit.is_positive() {
                    return Err(ExpenseError::Validation(format!(
                        "{} budget must be positive, got {}",
                        name, limit
                    )));
                }
                if limit.cents() > MAX_AMOUNT_CENTS {
                    return Err(ExpenseError::Validation(format!(
                        "{} budget {} is larger than {}",
                        name,
                        limit,
                        Money::from_cents(MAX_AMOUNT_CENTS)
                    )));
                }
            }
        }

        let yearly = match (yearly, monthly) {
            (Some(yearly), _) => Some(yearly),
            (None, Some(monthly)) => Some(monthly.checked_mul(12).ok_or_else(|| {
                ExpenseError::Validation(format!(
                    "Monthly budget {} is too large to imply a yearly budget",
                    monthly
                ))
            })?),
            (None, None) => None,
        };
        Ok(Self { monthly, yearly })
    }

    /// Parse limits from user-entered strings
    pub fn parse(monthly: Option<&str>, yearly: Option<&str>) -> ExpenseResult<Self> {
        let parse = |s: &str| {
            Money::parse(s).map_err(|e| ExpenseError::Validation(format!("Invalid budget: {}", e)))
        };
        Self::new(monthly.map(parse).transpose()?, yearly.map(parse).transpose()?)
    }

    /// Overlay command-line overrides on top of these limits
    pub fn overridden_by(self, overrides: BudgetLimits) -> Self {
        if overrides.monthly.is_none() && overrides.yearly.is_none() {
            return self;
        }
        Self {
            monthly: overrides.monthly.or(self.monthly),
            yearly: overrides.yearly.or(if overrides.monthly.is_some() {
                None
            } else {
                self.yearly
            }),
        }
        .with_implied_yearly()
    }

    fn with_implied_yearly(mut self) -> Self {
        if self.yearly.is_none() {
            // Limits loaded from settings skip `new`, so saturate
            self.yearly = self
                .monthly
                .map(|m| Money::from_cents(m.cents().saturating_mul(12)));
        }
        self
    }

    pub fn is_unlimited(&self) -> bool {
        self.monthly.is_none() && self.yearly.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_implies_yearly() {
        let limits = BudgetLimits::new(Some(Money::from_cents(100000)), None).unwrap();
        assert_eq!(limits.yearly, Some(Money::from_cents(1200000)));
    }

    #[test]
    fn test_rejects_non_positive() {
        assert!(BudgetLimits::new(Some(Money::zero()), None).is_err());
        assert!(BudgetLimits::new(None, Some(Money::from_cents(-5))).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_limits() {
        let err = BudgetLimits::parse(Some("10000000000000000"), None).unwrap_err();
        assert!(err.is_validation());

        let err = BudgetLimits::new(Some(Money::from_cents(i64::MAX)), None).unwrap_err();
        assert!(err.is_validation());

        let largest = BudgetLimits::parse(Some("1000000000000"), None).unwrap();
        assert_eq!(
            largest.yearly,
            Some(Money::from_cents(MAX_AMOUNT_CENTS * 12))
        );
    }

    #[test]
    fn test_implied_yearly_saturates_for_loaded_limits() {
        let loaded = BudgetLimits {
            monthly: Some(Money::from_cents(i64::MAX)),
            yearly: None,
        };
        let limits = loaded.overridden_by(BudgetLimits {
            monthly: Some(Money::from_cents(i64::MAX / 2)),
            yearly: None,
        });
        assert_eq!(limits.yearly, Some(Money::from_cents(i64::MAX)));
    }

    #[test]
    fn test_parse() {
        let limits = BudgetLimits::parse(Some("500"), Some("4000.50")).unwrap();
        assert_eq!(limits.monthly, Some(Money::from_cents(50000)));
        assert_eq!(limits.yearly, Some(Money::from_cents(400050)));
        assert!(BudgetLimits::parse(Some("lots"), None).unwrap_err().is_validation());
    }

    #[test]
    fn test_override() {
        let configured = BudgetLimits::new(Some(Money::from_cents(1000)), Some(Money::from_cents(5000))).unwrap();

        // No overrides keeps the configured values
        assert_eq!(configured.overridden_by(BudgetLimits::unlimited()), configured);

        // A monthly override recomputes the implied yearly limit
        let overridden = configured.overridden_by(BudgetLimits {
            monthly: Some(Money::from_cents(2000)),
            yearly: None,
        });
        assert_eq!(overridden.monthly, Some(Money::from_cents(2000)));
        assert_eq!(overridden.yearly, Some(Money::from_cents(24000)));
    }

    #[test]
    fn test_serde_skips_unset() {
        let json = serde_json::to_string(&BudgetLimits::unlimited()).unwrap();
        assert_eq!(json, "{}");
    }
}
