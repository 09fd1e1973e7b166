//! Advisory consistency checks over a ledger snapshot.
//!
//! Findings are reported as [`Alert`]s and never block a write or a
//! statement. Date-dependent checks read today from an injected [`Clock`].

use std::collections::HashSet;

use brickbooks_core::{
    Clock, CostRecord, LedgerSnapshot, PaidStatus, Record, SaleRecord, classify::ASSET_THRESHOLD,
};
use brickbooks_inventory::{StockLevel, low_stock, stock_levels};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aggregate::sum_amounts;
use crate::balance::{BalanceSheet, balance_tolerance};

/// Unpaid sales older than this many days are overdue.
pub const OVERDUE_AFTER_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertKind {
    Duplicate,
    LargeCost,
    Reclassification,
    OverdueReceivable,
    BalanceMismatch,
    LowStock,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub severity: Severity,
    pub kind: AlertKind,
    pub message: String,
    pub details: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub category: String,
    pub id: i64,
    pub date: Option<NaiveDate>,
    pub description: String,
    pub amount: Decimal,
}

impl Finding {
    fn of<T: Record>(category: &str, record: &T) -> Self {
        Self {
            category: category.to_string(),
            id: record.id(),
            date: record.date(),
            description: record.description().to_string(),
            amount: record.amount(),
        }
    }

    fn detail(&self) -> String {
        let date = self
            .date
            .map(|date| date.to_string())
            .unwrap_or_else(|| "undated".to_string());
        format!("{date}: {} - {}", self.description, self.amount)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverdueReceivable {
    pub sale: Finding,
    pub days_overdue: i64,
}

/// Every occurrence after the first of a (date, description, amount) triple.
pub fn find_duplicates<T: Record>(records: &[T]) -> Vec<&T> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|record| {
            !seen.insert((
                record.date(),
                record.description().to_string(),
                record.amount().normalize(),
            ))
        })
        .collect()
}

/// Costs above both three times the mean cost and 1000.
pub fn find_large_costs(costs: &[CostRecord]) -> Vec<&CostRecord> {
    if costs.is_empty() {
        return Vec::new();
    }
    let mean = sum_amounts(costs) / Decimal::from(costs.len());
    let threshold = mean.saturating_mul(Decimal::from(3));
    let floor = Decimal::from(1000);

    costs
        .iter()
        .filter(|cost| cost.amount > threshold && cost.amount > floor)
        .collect()
}

/// Operating costs above [`ASSET_THRESHOLD`], which often turn out to be
/// asset purchases.
pub fn find_reclassification_candidates(costs: &[CostRecord]) -> Vec<&CostRecord> {
    let threshold = Decimal::from(ASSET_THRESHOLD);
    costs
        .iter()
        .filter(|cost| cost.category.is_operating_expense() && cost.amount > threshold)
        .collect()
}

/// Unpaid sales dated more than [`OVERDUE_AFTER_DAYS`] before today.
/// Undated sales are skipped.
pub fn find_overdue_receivables(sales: &[SaleRecord], clock: &dyn Clock) -> Vec<OverdueReceivable> {
    let today = clock.today();
    sales
        .iter()
        .filter(|sale| sale.paid == PaidStatus::No)
        .filter_map(|sale| {
            let days = (today - sale.date?).num_days();
            (days > OVERDUE_AFTER_DAYS).then(|| OverdueReceivable {
                sale: Finding::of("sales", sale),
                days_overdue: days,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    pub checked_on: NaiveDate,
    pub duplicates: Vec<Finding>,
    pub large_costs: Vec<Finding>,
    pub reclassification_candidates: Vec<Finding>,
    pub overdue_receivables: Vec<OverdueReceivable>,
    pub low_stock: Vec<StockLevel>,
    pub balance_check: Decimal,
    pub alerts: Vec<Alert>,
}

impl ConsistencyReport {
    pub fn run(snapshot: &LedgerSnapshot, balance: &BalanceSheet, clock: &dyn Clock) -> Self {
        let mut duplicates = Vec::new();
        duplicates.extend(collect("sales", find_duplicates(&snapshot.sales)));
        duplicates.extend(collect("costs", find_duplicates(&snapshot.costs)));
        duplicates.extend(collect("payroll", find_duplicates(&snapshot.payroll)));
        duplicates.extend(collect(
            "miscellaneous",
            find_duplicates(&snapshot.miscellaneous),
        ));
        duplicates.extend(collect(
            "otherRevenue",
            find_duplicates(&snapshot.other_revenue),
        ));
        duplicates.extend(collect("capital", find_duplicates(&snapshot.capital)));

        let large_costs = collect("costs", find_large_costs(&snapshot.costs));
        let reclassification_candidates = collect(
            "costs",
            find_reclassification_candidates(&snapshot.costs),
        );
        let overdue_receivables = find_overdue_receivables(&snapshot.sales, clock);
        let levels = stock_levels(&snapshot.movements, &snapshot.inventory);
        let low_stock: Vec<StockLevel> = low_stock(&levels).into_iter().cloned().collect();

        let mut alerts = Vec::new();
        if !duplicates.is_empty() {
            alerts.push(Alert {
                severity: Severity::Warning,
                kind: AlertKind::Duplicate,
                message: format!(
                    "{} potential duplicate transactions found",
                    duplicates.len()
                ),
                details: duplicates.iter().map(Finding::detail).collect(),
            });
        }
        if !large_costs.is_empty() {
            alerts.push(Alert {
                severity: Severity::Warning,
                kind: AlertKind::LargeCost,
                message: format!(
                    "{} unusually large costs may need review or reclassification as assets",
                    large_costs.len()
                ),
                details: large_costs.iter().map(Finding::detail).collect(),
            });
        }
        if !reclassification_candidates.is_empty() {
            alerts.push(Alert {
                severity: Severity::Warning,
                kind: AlertKind::Reclassification,
                message: format!(
                    "{} large operating costs may need reclassification as assets",
                    reclassification_candidates.len()
                ),
                details: reclassification_candidates
                    .iter()
                    .map(Finding::detail)
                    .collect(),
            });
        }
        if !overdue_receivables.is_empty() {
            alerts.push(Alert {
                severity: Severity::Error,
                kind: AlertKind::OverdueReceivable,
                message: format!(
                    "{} overdue receivables (>{OVERDUE_AFTER_DAYS} days)",
                    overdue_receivables.len()
                ),
                details: overdue_receivables
                    .iter()
                    .map(|overdue| {
                        format!("{} ({} days)", overdue.sale.detail(), overdue.days_overdue)
                    })
                    .collect(),
            });
        }
        if balance.balance_check.abs() >= balance_tolerance() {
            alerts.push(Alert {
                severity: Severity::Error,
                kind: AlertKind::BalanceMismatch,
                message: format!(
                    "balance sheet is out of balance by {}",
                    balance.balance_check
                ),
                details: vec![
                    format!("total assets: {}", balance.total_assets),
                    format!(
                        "total liabilities and equity: {}",
                        balance.total_liabilities_and_equity
                    ),
                ],
            });
        }
        if !low_stock.is_empty() {
            alerts.push(Alert {
                severity: Severity::Warning,
                kind: AlertKind::LowStock,
                message: format!("{} items at or below minimum stock", low_stock.len()),
                details: low_stock
                    .iter()
                    .map(|level| {
                        format!(
                            "{} ({}): {} {} on hand, minimum {}",
                            level.item,
                            level.item_type.label(),
                            level.current_stock,
                            level.unit,
                            level.minimum_level
                        )
                    })
                    .collect(),
            });
        }

        Self {
            checked_on: clock.today(),
            duplicates,
            large_costs,
            reclassification_candidates,
            overdue_receivables,
            low_stock,
            balance_check: balance.balance_check,
            alerts,
        }
    }
}

fn collect<T: Record>(category: &str, records: Vec<&T>) -> Vec<Finding> {
    records
        .into_iter()
        .map(|record| Finding::of(category, record))
        .collect()
}
