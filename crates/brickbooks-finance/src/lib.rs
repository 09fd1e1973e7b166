//! Statement computation over a ledger snapshot: aggregation helpers, the
//! income statement, balance sheet, monthly cash flow, consistency checks and
//! the transaction summary.

pub mod aggregate;
pub mod balance;
pub mod cash_flow;
pub mod checks;
pub mod income;
pub mod summary;

pub use aggregate::{DateRange, filter_by_category, filter_by_date_range, sum_amounts};
pub use balance::BalanceSheet;
pub use cash_flow::{
    CashFlowEntry, CashFlowHistory, CashFlowInput, LineItem, OperatingFlows, close_month,
};
pub use checks::{Alert, AlertKind, ConsistencyReport, Severity};
pub use income::{IncomeStatement, OtherIncome};
pub use summary::TransactionSummary;
