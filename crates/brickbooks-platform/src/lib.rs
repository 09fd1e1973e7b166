pub mod config;
pub mod contracts;

pub use config::ServiceConfig;
pub use contracts::{
    BalanceQuery, CashFlowLine, CashFlowRequest, HealthResponse, IncomeQuery, RecordCreated,
    StockQuery, SuggestQuery,
};
