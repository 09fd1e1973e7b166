use brickbooks_core::{BalanceSheetStrategy, LedgerSnapshot, LedgerTotals, Record};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aggregate::sum_amounts;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct CurrentAssets {
    pub cash: Decimal,
    pub accounts_receivable: Decimal,
    pub inventory: Decimal,
    pub prepaid_expenses: Decimal,
    pub short_term_investments: Decimal,
}

impl CurrentAssets {
    pub fn total(&self) -> Decimal {
        self.cash
            + self.accounts_receivable
            + self.inventory
            + self.prepaid_expenses
            + self.short_term_investments
    }
}

/// `accumulated_depreciation` is carried as a negative figure and added.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct FixedAssets {
    pub long_term_investments: Decimal,
    pub property_plant_equipment: Decimal,
    pub accumulated_depreciation: Decimal,
    pub intangible_assets: Decimal,
}

impl FixedAssets {
    pub fn total(&self) -> Decimal {
        self.long_term_investments
            + self.property_plant_equipment
            + self.accumulated_depreciation
            + self.intangible_assets
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct OtherAssets {
    pub deferred_income_tax: Decimal,
    pub other_assets: Decimal,
}

impl OtherAssets {
    pub fn total(&self) -> Decimal {
        self.deferred_income_tax + self.other_assets
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct CurrentLiabilities {
    pub accounts_payable: Decimal,
    pub short_term_loans: Decimal,
    pub income_taxes_payable: Decimal,
    pub accrued_salaries_wages: Decimal,
    pub unearned_revenue: Decimal,
    pub current_portion_long_term_debt: Decimal,
}

impl CurrentLiabilities {
    pub fn total(&self) -> Decimal {
        self.accounts_payable
            + self.short_term_loans
            + self.income_taxes_payable
            + self.accrued_salaries_wages
            + self.unearned_revenue
            + self.current_portion_long_term_debt
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct LongTermLiabilities {
    pub long_term_debt: Decimal,
    pub deferred_income_tax: Decimal,
    pub other_liabilities: Decimal,
}

impl LongTermLiabilities {
    pub fn total(&self) -> Decimal {
        self.long_term_debt + self.deferred_income_tax + self.other_liabilities
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct OwnerEquity {
    pub owner_investment: Decimal,
    pub retained_earnings: Decimal,
    pub other_equity: Decimal,
}

impl OwnerEquity {
    pub fn total(&self) -> Decimal {
        self.owner_investment + self.retained_earnings + self.other_equity
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BalanceSheet {
    pub as_of: Option<NaiveDate>,
    pub strategy: String,

    pub current_assets: CurrentAssets,
    pub fixed_assets: FixedAssets,
    pub other_assets: OtherAssets,
    pub current_liabilities: CurrentLiabilities,
    pub long_term_liabilities: LongTermLiabilities,
    pub owner_equity: OwnerEquity,

    pub total_assets: Decimal,
    pub total_liabilities_and_equity: Decimal,
    pub balance_check: Decimal,
    pub is_balanced: bool,
}

impl BalanceSheet {
    /// Lines the strategy does not derive stay at zero.
    pub fn build(
        snapshot: &LedgerSnapshot,
        as_of: Option<NaiveDate>,
        strategy: &dyn BalanceSheetStrategy,
    ) -> Self {
        let derived = strategy.derive(&ledger_totals(snapshot, as_of));

        let current_assets = CurrentAssets {
            cash: derived.cash,
            inventory: derived.inventory,
            ..CurrentAssets::default()
        };
        let current_liabilities = CurrentLiabilities {
            accounts_payable: derived.accounts_payable,
            accrued_salaries_wages: derived.accrued_salaries_wages,
            ..CurrentLiabilities::default()
        };
        let owner_equity = OwnerEquity {
            owner_investment: derived.owner_investment,
            retained_earnings: derived.retained_earnings,
            ..OwnerEquity::default()
        };

        Self::from_sections(
            as_of,
            strategy.name().to_string(),
            current_assets,
            FixedAssets::default(),
            OtherAssets::default(),
            current_liabilities,
            LongTermLiabilities::default(),
            owner_equity,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn from_sections(
        as_of: Option<NaiveDate>,
        strategy: String,
        current_assets: CurrentAssets,
        fixed_assets: FixedAssets,
        other_assets: OtherAssets,
        current_liabilities: CurrentLiabilities,
        long_term_liabilities: LongTermLiabilities,
        owner_equity: OwnerEquity,
    ) -> Self {
        let total_assets = current_assets.total() + fixed_assets.total() + other_assets.total();
        let total_liabilities_and_equity = current_liabilities.total()
            + long_term_liabilities.total()
            + owner_equity.total();
        let balance_check = total_assets - total_liabilities_and_equity;

        Self {
            as_of,
            strategy,
            current_assets,
            fixed_assets,
            other_assets,
            current_liabilities,
            long_term_liabilities,
            owner_equity,
            total_assets,
            total_liabilities_and_equity,
            balance_check,
            is_balanced: balance_check.abs() < balance_tolerance(),
        }
    }
}

/// Absolute differences strictly below this are reported as balanced.
pub fn balance_tolerance() -> Decimal {
    Decimal::new(1, 2)
}

/// Category totals for records dated on or before `as_of`, or every record
/// when `as_of` is `None`.
pub fn ledger_totals(snapshot: &LedgerSnapshot, as_of: Option<NaiveDate>) -> LedgerTotals {
    LedgerTotals {
        sales: sum_amounts(up_to(&snapshot.sales, as_of)),
        costs: sum_amounts(up_to(&snapshot.costs, as_of)),
        payroll: sum_amounts(up_to(&snapshot.payroll, as_of)),
        miscellaneous: sum_amounts(up_to(&snapshot.miscellaneous, as_of)),
        capital: sum_amounts(up_to(&snapshot.capital, as_of)),
    }
}

fn up_to<T: Record>(records: &[T], as_of: Option<NaiveDate>) -> Vec<&T> {
    match as_of {
        Some(limit) => records
            .iter()
            .filter(|record| record.date().is_some_and(|date| date <= limit))
            .collect(),
        None => records.iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brickbooks_core::{DerivedBalances, HeuristicDerivation, normalize};
    use serde_json::json;

    fn ledger() -> LedgerSnapshot {
        LedgerSnapshot {
            sales: normalize::sales(&[
                json!({"date": "2025-01-05", "amount": 1000}),
                json!({"date": "2025-03-05", "amount": 500}),
            ]),
            costs: normalize::costs(&[
                json!({"date": "2025-01-10", "category": "Raw Materials", "amount": 400}),
            ]),
            payroll: normalize::payroll(&[json!({"date": "2025-01-31", "netPay": 200})]),
            miscellaneous: normalize::entries(&[
                json!({"date": "2025-01-20", "category": "Office", "amount": 100}),
            ]),
            capital: normalize::capital(&[
                json!({"date": "2025-01-01", "type": "investment", "category": "equity", "amount": 5000}),
            ]),
            ..LedgerSnapshot::default()
        }
    }

    #[test]
    fn heuristic_lines_land_in_their_sections() {
        let sheet = BalanceSheet::build(&ledger(), None, &HeuristicDerivation::default());

        assert_eq!(sheet.strategy, "heuristic-ratios");
        assert_eq!(sheet.current_assets.cash, Decimal::from(800));
        assert_eq!(sheet.current_assets.inventory, Decimal::from(120));
        assert_eq!(sheet.current_liabilities.accounts_payable, Decimal::from(80));
        assert_eq!(sheet.current_liabilities.accrued_salaries_wages, Decimal::from(20));
        assert_eq!(sheet.owner_equity.owner_investment, Decimal::from(5000));
        assert_eq!(sheet.owner_equity.retained_earnings, Decimal::from(800));
        assert_eq!(sheet.fixed_assets, FixedAssets::default());
        assert_eq!(sheet.long_term_liabilities.total(), Decimal::ZERO);
    }

    #[test]
    fn balance_check_is_assets_minus_claims() {
        let sheet = BalanceSheet::build(&ledger(), None, &HeuristicDerivation::default());

        assert_eq!(sheet.total_assets, Decimal::from(920));
        assert_eq!(sheet.total_liabilities_and_equity, Decimal::from(5900));
        assert_eq!(
            sheet.balance_check,
            sheet.total_assets
                - (sheet.current_liabilities.total()
                    + sheet.long_term_liabilities.total()
                    + sheet.owner_equity.total())
        );
        assert!(!sheet.is_balanced);
    }

    #[test]
    fn building_twice_gives_identical_sheets() {
        let ledger = ledger();
        let strategy = HeuristicDerivation::default();
        assert_eq!(
            BalanceSheet::build(&ledger, None, &strategy),
            BalanceSheet::build(&ledger, None, &strategy)
        );
    }

    #[test]
    fn as_of_drops_later_records() {
        let as_of = "2025-02-01".parse().ok();
        let totals = ledger_totals(&ledger(), as_of);
        assert_eq!(totals.sales, Decimal::from(1000));

        let all = ledger_totals(&ledger(), None);
        assert_eq!(all.sales, Decimal::from(1500));
    }

    #[test]
    fn differences_under_a_cent_count_as_balanced() {
        let sheet = BalanceSheet::from_sections(
            None,
            "manual".to_string(),
            CurrentAssets {
                cash: Decimal::new(100005, 3),
                ..CurrentAssets::default()
            },
            FixedAssets::default(),
            OtherAssets::default(),
            CurrentLiabilities::default(),
            LongTermLiabilities::default(),
            OwnerEquity {
                owner_investment: Decimal::from(100),
                ..OwnerEquity::default()
            },
        );

        assert_eq!(sheet.balance_check, Decimal::new(5, 3));
        assert!(sheet.is_balanced);
    }

    #[test]
    fn a_difference_of_exactly_one_cent_is_unbalanced() {
        let sheet = |cash: Decimal| {
            BalanceSheet::from_sections(
                None,
                "manual".to_string(),
                CurrentAssets {
                    cash,
                    ..CurrentAssets::default()
                },
                FixedAssets::default(),
                OtherAssets::default(),
                CurrentLiabilities::default(),
                LongTermLiabilities::default(),
                OwnerEquity {
                    owner_investment: Decimal::from(100),
                    ..OwnerEquity::default()
                },
            )
        };

        let over = sheet(Decimal::new(10001, 2));
        assert_eq!(over.balance_check, Decimal::new(1, 2));
        assert!(!over.is_balanced);

        let under = sheet(Decimal::new(9999, 2));
        assert_eq!(under.balance_check, Decimal::new(-1, 2));
        assert!(!under.is_balanced);
    }

    struct Matching;

    impl BalanceSheetStrategy for Matching {
        fn name(&self) -> &'static str {
            "matching"
        }

        fn derive(&self, totals: &LedgerTotals) -> DerivedBalances {
            DerivedBalances {
                cash: totals.capital,
                owner_investment: totals.capital,
                ..DerivedBalances::default()
            }
        }
    }

    #[test]
    fn strategies_are_swappable() {
        let sheet = BalanceSheet::build(&ledger(), None, &Matching);
        assert_eq!(sheet.strategy, "matching");
        assert!(sheet.is_balanced);
    }
}
