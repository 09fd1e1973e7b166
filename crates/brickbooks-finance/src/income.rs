use brickbooks_core::{CostCategory, CostRecord, LedgerSnapshot};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aggregate::{DateRange, sum_amounts, within};

/// Non-operating lines. There are no entry forms for these yet, so callers
/// normally pass the zero default.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct OtherIncome {
    pub interest_income: Decimal,
    pub interest_expense: Decimal,
    pub gain_loss_on_assets: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IncomeStatement {
    pub period: Option<DateRange>,

    pub sales: Decimal,
    pub other_revenue: Decimal,
    pub total_revenue: Decimal,

    pub raw_materials: Decimal,
    pub direct_labour: Decimal,
    pub manufacturing_overheads: Decimal,
    pub total_cogs: Decimal,

    pub gross_profit: Decimal,

    pub payroll: Decimal,
    pub rent: Decimal,
    pub utilities: Decimal,
    pub transport_fuel: Decimal,
    pub depreciation: Decimal,
    pub other_expenses: Decimal,
    pub total_operating_expenses: Decimal,

    pub operating_profit: Decimal,

    pub interest_income: Decimal,
    pub interest_expense: Decimal,
    pub gain_loss_on_assets: Decimal,
    pub net_other_income: Decimal,

    pub net_profit_before_tax: Decimal,
    pub tax: Decimal,
    pub net_profit: Decimal,
}

impl IncomeStatement {
    /// Builds the statement over `period` (every record when `None`). `tax`
    /// is a manual figure, not derived from profit.
    pub fn build(
        snapshot: &LedgerSnapshot,
        period: Option<DateRange>,
        other: OtherIncome,
        tax: Decimal,
    ) -> Self {
        let costs = within(&snapshot.costs, period);

        let sales = sum_amounts(within(&snapshot.sales, period));
        let other_revenue = sum_amounts(within(&snapshot.other_revenue, period));
        let total_revenue = sales.saturating_add(other_revenue);

        let raw_materials = cost_line(&costs, &CostCategory::RawMaterials);
        let direct_labour = cost_line(&costs, &CostCategory::DirectLabour);
        let manufacturing_overheads = cost_line(&costs, &CostCategory::ManufacturingOverheads);
        let total_cogs = sum_amounts(
            costs
                .iter()
                .copied()
                .filter(|cost| cost.category.is_cost_of_sales()),
        );

        let gross_profit = total_revenue.saturating_sub(total_cogs);

        let payroll = sum_amounts(within(&snapshot.payroll, period));
        let rent = cost_line(&costs, &CostCategory::Rent);
        let utilities = cost_line(&costs, &CostCategory::Utilities);
        let transport_fuel = cost_line(&costs, &CostCategory::TransportFuel);
        let depreciation = cost_line(&costs, &CostCategory::Depreciation);
        let other_expenses = cost_line(&costs, &CostCategory::Other);
        let total_operating_expenses = payroll.saturating_add(sum_amounts(
            costs
                .iter()
                .copied()
                .filter(|cost| cost.category.is_operating_expense()),
        ));

        let operating_profit = gross_profit.saturating_sub(total_operating_expenses);

        // Caller-supplied figures are unbounded, so these lines saturate.
        let net_other_income = other
            .interest_income
            .saturating_sub(other.interest_expense)
            .saturating_add(other.gain_loss_on_assets);
        let net_profit_before_tax = operating_profit.saturating_add(net_other_income);
        let net_profit = net_profit_before_tax.saturating_sub(tax);

        Self {
            period,
            sales,
            other_revenue,
            total_revenue,
            raw_materials,
            direct_labour,
            manufacturing_overheads,
            total_cogs,
            gross_profit,
            payroll,
            rent,
            utilities,
            transport_fuel,
            depreciation,
            other_expenses,
            total_operating_expenses,
            operating_profit,
            interest_income: other.interest_income,
            interest_expense: other.interest_expense,
            gain_loss_on_assets: other.gain_loss_on_assets,
            net_other_income,
            net_profit_before_tax,
            tax,
            net_profit,
        }
    }
}

fn cost_line(costs: &[&CostRecord], category: &CostCategory) -> Decimal {
    sum_amounts(
        costs
            .iter()
            .copied()
            .filter(|cost| &cost.category == category),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use brickbooks_core::normalize;
    use serde_json::json;

    fn snapshot() -> LedgerSnapshot {
        LedgerSnapshot {
            sales: normalize::sales(&[json!({"date": "2025-01-05", "amount": 100})]),
            costs: normalize::costs(&[
                json!({"date": "2025-01-10", "category": "Raw Materials", "amount": 40}),
            ]),
            payroll: normalize::payroll(&[json!({"netPay": 20})]),
            ..LedgerSnapshot::default()
        }
    }

    #[test]
    fn small_ledger_scenario() {
        let statement =
            IncomeStatement::build(&snapshot(), None, OtherIncome::default(), Decimal::ZERO);

        assert_eq!(statement.total_revenue, Decimal::from(100));
        assert_eq!(statement.total_cogs, Decimal::from(40));
        assert_eq!(statement.gross_profit, Decimal::from(60));
        assert_eq!(statement.total_operating_expenses, Decimal::from(20));
        assert_eq!(statement.operating_profit, Decimal::from(40));
        assert_eq!(statement.net_profit, Decimal::from(40));
    }

    #[test]
    fn building_twice_gives_identical_statements() {
        let ledger = snapshot();
        let first = IncomeStatement::build(&ledger, None, OtherIncome::default(), Decimal::ONE);
        let second = IncomeStatement::build(&ledger, None, OtherIncome::default(), Decimal::ONE);
        assert_eq!(first, second);
    }

    #[test]
    fn other_income_and_tax_flow_to_net_profit() {
        let other = OtherIncome {
            interest_income: Decimal::from(10),
            interest_expense: Decimal::from(4),
            gain_loss_on_assets: Decimal::from(-1),
        };

        let statement = IncomeStatement::build(&snapshot(), None, other, Decimal::from(7));

        assert_eq!(statement.net_other_income, Decimal::from(5));
        assert_eq!(statement.net_profit_before_tax, Decimal::from(45));
        assert_eq!(statement.net_profit, Decimal::from(38));
    }

    #[test]
    fn cost_categories_split_between_cogs_and_operating() {
        let ledger = LedgerSnapshot {
            costs: normalize::costs(&[
                json!({"category": "Direct Labour", "amount": 5}),
                json!({"category": "Manufacturing Overheads", "amount": 6}),
                json!({"category": "Fuel", "amount": 7}),
                json!({"category": "Rent", "amount": 8}),
                json!({"category": "Marketing", "amount": 1000}),
            ]),
            ..LedgerSnapshot::default()
        };

        let statement =
            IncomeStatement::build(&ledger, None, OtherIncome::default(), Decimal::ZERO);

        assert_eq!(statement.total_cogs, Decimal::from(11));
        assert_eq!(statement.transport_fuel, Decimal::from(7));
        assert_eq!(statement.total_operating_expenses, Decimal::from(15));
    }

    #[test]
    fn period_excludes_records_outside_or_undated() {
        let ledger = LedgerSnapshot {
            sales: normalize::sales(&[
                json!({"date": "2025-01-05", "amount": 100}),
                json!({"date": "2025-02-05", "amount": 50}),
                json!({"amount": 25}),
            ]),
            ..LedgerSnapshot::default()
        };
        let january = DateRange::month(brickbooks_core::MonthKey::new(2025, 1).unwrap());

        let statement =
            IncomeStatement::build(&ledger, january, OtherIncome::default(), Decimal::ZERO);

        assert_eq!(statement.sales, Decimal::from(100));
    }

    #[test]
    fn extreme_inputs_do_not_abort_the_statement() {
        let ledger = LedgerSnapshot {
            sales: normalize::sales(&[
                json!({"amount": "79228162514264337593543950335"}),
                json!({"amount": "79228162514264337593543950335"}),
                json!({"amount": 10}),
            ]),
            ..LedgerSnapshot::default()
        };
        let other = OtherIncome {
            interest_income: Decimal::MAX,
            interest_expense: Decimal::MIN,
            gain_loss_on_assets: Decimal::MAX,
        };

        let statement = IncomeStatement::build(&ledger, None, other, Decimal::MIN);

        assert_eq!(statement.sales, Decimal::from(10));
        assert_eq!(statement.net_other_income, Decimal::MAX);
        assert_eq!(statement.net_profit, Decimal::MAX);
    }
}
