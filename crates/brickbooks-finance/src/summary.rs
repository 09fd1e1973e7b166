use brickbooks_core::{CapitalClass, LedgerSnapshot, PaidStatus, Record};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aggregate::sum_amounts;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct CategoryTotals {
    pub total: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct CapitalTotals {
    pub assets: Decimal,
    pub liabilities: Decimal,
    pub equity: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightTone {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub tone: InsightTone,
    pub message: String,
    pub action: String,
}

/// Whole-ledger overview: per-category totals plus a few plain-language
/// insights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub sales: CategoryTotals,
    pub unpaid_sales: Decimal,
    pub costs: CategoryTotals,
    pub production_costs: Decimal,
    pub stock_costs: Decimal,
    pub payroll: CategoryTotals,
    pub miscellaneous: CategoryTotals,
    pub operating_miscellaneous: Decimal,
    pub asset_miscellaneous: Decimal,
    pub capital: CapitalTotals,
    pub net_profit: Decimal,
    pub insights: Vec<Insight>,
}

impl TransactionSummary {
    pub fn build(snapshot: &LedgerSnapshot) -> Self {
        let sales = totals(&snapshot.sales);
        let unpaid_sales: Decimal = snapshot
            .sales
            .iter()
            .filter(|sale| sale.paid == PaidStatus::No)
            .map(|sale| sale.amount)
            .fold(Decimal::ZERO, Decimal::saturating_add);

        let costs = totals(&snapshot.costs);
        let (production, stock): (Vec<_>, Vec<_>) = snapshot
            .costs
            .iter()
            .partition(|cost| cost.used_in_production);
        let production_costs = sum_amounts(production);
        let stock_costs = sum_amounts(stock);

        let payroll = totals(&snapshot.payroll);

        let miscellaneous = totals(&snapshot.miscellaneous);
        let misc_of_type = |wanted: &str| -> Decimal {
            snapshot
                .miscellaneous
                .iter()
                .filter(|entry| {
                    entry
                        .expense_type
                        .as_deref()
                        .is_some_and(|kind| kind.eq_ignore_ascii_case(wanted))
                })
                .map(|entry| entry.amount)
                .fold(Decimal::ZERO, Decimal::saturating_add)
        };
        let operating_miscellaneous = misc_of_type("operating");
        let asset_miscellaneous = misc_of_type("asset");

        let capital_of = |class: CapitalClass| -> Decimal {
            snapshot
                .capital
                .iter()
                .filter(|record| record.class == class)
                .map(|record| record.amount)
                .fold(Decimal::ZERO, Decimal::saturating_add)
        };
        let capital = CapitalTotals {
            assets: capital_of(CapitalClass::Asset),
            liabilities: capital_of(CapitalClass::Liability),
            equity: capital_of(CapitalClass::Equity),
        };

        let net_profit = sales
            .total
            .saturating_sub(production_costs)
            .saturating_sub(payroll.total)
            .saturating_sub(operating_miscellaneous);

        let mut summary = Self {
            sales,
            unpaid_sales,
            costs,
            production_costs,
            stock_costs,
            payroll,
            miscellaneous,
            operating_miscellaneous,
            asset_miscellaneous,
            capital,
            net_profit,
            insights: Vec::new(),
        };
        summary.insights = summary.derive_insights();
        summary
    }

    fn derive_insights(&self) -> Vec<Insight> {
        let mut insights = Vec::new();

        if self.unpaid_sales > Decimal::ZERO {
            insights.push(Insight {
                tone: InsightTone::Warning,
                message: format!(
                    "{:.2} in unpaid sales (accounts receivable)",
                    self.unpaid_sales
                ),
                action: "Review sales".to_string(),
            });
        }
        if self.stock_costs > self.production_costs {
            insights.push(Insight {
                tone: InsightTone::Info,
                message: format!(
                    "High inventory: {:.2} held vs {:.2} used in production",
                    self.stock_costs, self.production_costs
                ),
                action: "Consider using more materials".to_string(),
            });
        }
        if self.capital.liabilities > self.capital.assets {
            insights.push(Insight {
                tone: InsightTone::Warning,
                message: "Liabilities exceed assets".to_string(),
                action: "Review capital".to_string(),
            });
        }
        if self.net_profit < Decimal::ZERO {
            insights.push(Insight {
                tone: InsightTone::Error,
                message: format!("Negative profit: {:.2}", self.net_profit),
                action: "Review expenses or increase sales".to_string(),
            });
        } else {
            insights.push(Insight {
                tone: InsightTone::Success,
                message: format!("Profitable: {:.2} net profit", self.net_profit),
                action: "Keep it up".to_string(),
            });
        }

        insights
    }
}

fn totals<T: Record>(records: &[T]) -> CategoryTotals {
    CategoryTotals {
        total: sum_amounts(records),
        count: records.len(),
    }
}
