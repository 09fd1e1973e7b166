pub mod calendar;
pub mod classify;
pub mod clock;
pub mod models;
pub mod normalize;
pub mod standards;
pub mod storage;
pub mod validation;

pub use calendar::{MonthKey, MonthKeyError};
pub use classify::{
    CapitalSuggestion, CostGroup, CostSuggestion, MiscExpenseType, MiscSuggestion, suggest_capital,
    suggest_cost, suggest_misc,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use models::{
    CapitalClass, CapitalKind, CapitalRecord, CashFlowClass, CostCategory, CostRecord,
    InventoryMovement, InventoryStock, ItemType, LedgerEntry, LedgerSnapshot, PaidStatus,
    PayrollRecord, Record, SaleRecord,
};
pub use standards::{BalanceSheetStrategy, DerivedBalances, HeuristicDerivation, LedgerTotals};
pub use storage::{RecordCategory, RecordStore, reference_number};
pub use validation::{ValidationError, validate};
