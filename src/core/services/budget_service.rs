use rust_decimal::Decimal;
use tracing::debug;

use crate::core::services::{ServiceError, ServiceResult};
use crate::ledger::{Ledger, MonthKey};

/// Monthly budget assignment and lookup.
pub struct BudgetService;

impl BudgetService {
    /// Sets the first budget for `month`. Fails when that month already has one;
    /// use [`BudgetService::modify`] to change it.
    pub fn set_initial(ledger: &mut Ledger, month: MonthKey, amount: Decimal) -> ServiceResult<()> {
        if ledger.has_budget(month) {
            return Err(ServiceError::Invalid(format!(
                "a budget for {} is already set",
                month.label()
            )));
        }
        ledger.set_budget(month, amount)?;
        debug!("initial budget for {} set to {}", month, amount);
        Ok(())
    }

    /// Inserts or replaces the budget for any month, returning the previous amount.
    pub fn modify(
        ledger: &mut Ledger,
        month: MonthKey,
        amount: Decimal,
    ) -> ServiceResult<Option<Decimal>> {
        let previous = ledger.set_budget(month, amount)?;
        debug!("budget for {} updated to {}", month, amount);
        Ok(previous)
    }

    pub fn get(ledger: &Ledger, month: MonthKey) -> Decimal {
        ledger.budget(month)
    }

    pub fn has_any(ledger: &Ledger) -> bool {
        ledger.has_any_budget()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn month(m: u32) -> MonthKey {
        MonthKey::new(2024, m).unwrap()
    }

    #[test]
    fn initial_budget_only_once_per_month() {
        let mut ledger = Ledger::new();
        BudgetService::set_initial(&mut ledger, month(3), dec!(100)).unwrap();
        let err = BudgetService::set_initial(&mut ledger, month(3), dec!(200))
            .expect_err("second initial budget must fail");
        assert!(err.to_string().contains("March 2024"), "{err}");
        assert_eq!(BudgetService::get(&ledger, month(3)), dec!(100));
    }

    #[test]
    fn modify_covers_new_and_existing_months() {
        let mut ledger = Ledger::new();
        assert!(!BudgetService::has_any(&ledger));
        assert_eq!(BudgetService::modify(&mut ledger, month(4), dec!(80)).unwrap(), None);
        assert_eq!(
            BudgetService::modify(&mut ledger, month(4), dec!(90)).unwrap(),
            Some(dec!(80))
        );
        assert!(BudgetService::has_any(&ledger));
        assert_eq!(BudgetService::get(&ledger, month(5)), Decimal::ZERO);
    }

    #[test]
    fn negative_amounts_surface_as_ledger_errors() {
        let mut ledger = Ledger::new();
        let err = BudgetService::modify(&mut ledger, month(1), dec!(-5)).unwrap_err();
        assert!(matches!(err, ServiceError::Ledger(_)), "{err:?}");
    }
}
