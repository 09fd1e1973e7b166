use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Category totals a balance-sheet strategy derives its lines from.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct LedgerTotals {
    pub sales: Decimal,
    pub costs: Decimal,
    pub payroll: Decimal,
    pub miscellaneous: Decimal,
    pub capital: Decimal,
}

impl LedgerTotals {
    pub fn net_profit(&self) -> Decimal {
        self.sales
            .saturating_sub(self.costs)
            .saturating_sub(self.payroll)
            .saturating_sub(self.miscellaneous)
    }
}

/// Balance-sheet lines that are not tracked as ledger balances and must be
/// derived from category totals instead.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct DerivedBalances {
    pub cash: Decimal,
    pub inventory: Decimal,
    pub accounts_payable: Decimal,
    pub accrued_salaries_wages: Decimal,
    pub owner_investment: Decimal,
    pub retained_earnings: Decimal,
}

pub trait BalanceSheetStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn derive(&self, totals: &LedgerTotals) -> DerivedBalances;
}

/// Fixed-ratio approximation used by the existing stored figures: inventory
/// and payables as shares of total costs, accrued wages as a share of payroll,
/// cash as non-negative ledger profit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicDerivation {
    pub inventory_ratio: Decimal,
    pub payable_ratio: Decimal,
    pub accrued_wage_ratio: Decimal,
}

impl Default for HeuristicDerivation {
    fn default() -> Self {
        Self {
            inventory_ratio: Decimal::new(3, 1),
            payable_ratio: Decimal::new(2, 1),
            accrued_wage_ratio: Decimal::new(1, 1),
        }
    }
}

impl BalanceSheetStrategy for HeuristicDerivation {
    fn name(&self) -> &'static str {
        "heuristic-ratios"
    }

    fn derive(&self, totals: &LedgerTotals) -> DerivedBalances {
        let net_profit = totals.net_profit();

        DerivedBalances {
            cash: net_profit.max(Decimal::ZERO),
            inventory: totals.costs * self.inventory_ratio,
            accounts_payable: totals.costs * self.payable_ratio,
            accrued_salaries_wages: totals.payroll * self.accrued_wage_ratio,
            owner_investment: totals.capital,
            retained_earnings: net_profit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristic_reproduces_fixed_ratios() {
        let totals = LedgerTotals {
            sales: Decimal::from(1000),
            costs: Decimal::from(400),
            payroll: Decimal::from(200),
            miscellaneous: Decimal::from(100),
            capital: Decimal::from(5000),
        };

        let derived = HeuristicDerivation::default().derive(&totals);

        assert_eq!(derived.cash, Decimal::from(300));
        assert_eq!(derived.inventory, Decimal::from(120));
        assert_eq!(derived.accounts_payable, Decimal::from(80));
        assert_eq!(derived.accrued_salaries_wages, Decimal::from(20));
        assert_eq!(derived.owner_investment, Decimal::from(5000));
        assert_eq!(derived.retained_earnings, Decimal::from(300));
    }

    #[test]
    fn heuristic_cash_never_goes_negative() {
        let totals = LedgerTotals {
            costs: Decimal::from(50),
            ..LedgerTotals::default()
        };

        let derived = HeuristicDerivation::default().derive(&totals);

        assert_eq!(derived.cash, Decimal::ZERO);
        assert_eq!(derived.retained_earnings, Decimal::from(-50));
    }
}
