use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncomeQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub tax: Option<Decimal>,
    pub interest_income: Option<Decimal>,
    pub interest_expense: Option<Decimal>,
    pub gain_loss_on_assets: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BalanceQuery {
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StockQuery {
    #[serde(default)]
    pub low_only: bool,
}

/// Entry draft to classify: the description typed so far and the amount.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuggestQuery {
    #[serde(default)]
    pub description: String,
    pub amount: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowLine {
    pub label: String,
    pub amount: Decimal,
}

/// Manually entered figures for one month.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowRequest {
    #[serde(default)]
    pub operating_inflow: Decimal,
    #[serde(default)]
    pub operating_outflow: Decimal,
    #[serde(default)]
    pub investing: Vec<CashFlowLine>,
    #[serde(default)]
    pub financing: Vec<CashFlowLine>,
    pub opening_cash: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordCreated {
    pub id: i64,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory_movement_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub balance_strategy: String,
    pub auto_inventory: bool,
}
