use std::collections::BTreeMap;

use brickbooks_core::{
    CashFlowClass, LedgerSnapshot, MonthKey, PaidStatus, RecordCategory, RecordStore,
    normalize::decimal_from_value,
};
use brickbooks_store::{BookError, RecordBook};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::aggregate::{DateRange, sum_amounts, within};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    pub label: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct OperatingFlows {
    pub inflow: Decimal,
    pub outflow: Decimal,
}

impl OperatingFlows {
    pub fn net(&self) -> Decimal {
        self.inflow.saturating_sub(self.outflow)
    }
}

/// Figures entered for one month. `opening_cash` seeds the beginning balance
/// only when no entry exists for the previous month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowInput {
    pub month: MonthKey,
    #[serde(default)]
    pub operating: OperatingFlows,
    #[serde(default)]
    pub investing: Vec<LineItem>,
    #[serde(default)]
    pub financing: Vec<LineItem>,
    #[serde(default)]
    pub opening_cash: Option<Decimal>,
}

impl CashFlowInput {
    pub fn new(month: MonthKey) -> Self {
        Self {
            month,
            operating: OperatingFlows::default(),
            investing: Vec::new(),
            financing: Vec::new(),
            opening_cash: None,
        }
    }

    /// Derives the month's flows from recorded transactions. Unpaid sales
    /// bring in no cash; capital records land in investing or financing by
    /// their cash-flow class.
    pub fn from_records(month: MonthKey, snapshot: &LedgerSnapshot) -> Self {
        let mut input = Self::new(month);
        let Some(range) = DateRange::month(month) else {
            return input;
        };
        let period = Some(range);

        input.operating.inflow = within(&snapshot.sales, period)
            .into_iter()
            .filter(|sale| sale.paid != PaidStatus::No)
            .map(|sale| sale.amount)
            .fold(Decimal::ZERO, Decimal::saturating_add);
        input.operating.outflow = sum_amounts(within(&snapshot.costs, period))
            .saturating_add(sum_amounts(within(&snapshot.payroll, period)))
            .saturating_add(sum_amounts(within(&snapshot.miscellaneous, period)));

        for capital in within(&snapshot.capital, period) {
            let item = LineItem {
                label: capital.description.clone(),
                amount: capital.amount,
            };
            match capital.cash_flow {
                CashFlowClass::Investing => input.investing.push(item),
                CashFlowClass::Financing => input.financing.push(item),
                CashFlowClass::Operating => {}
            }
        }

        input
    }
}

/// A closed month as persisted under the `cashFlow` collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowEntry {
    pub month: MonthKey,
    pub beginning_cash: Decimal,
    pub operating: OperatingFlows,
    pub investing: Vec<LineItem>,
    pub financing: Vec<LineItem>,
    pub net_operating: Decimal,
    pub total_investing: Decimal,
    pub total_financing: Decimal,
    pub net_change: Decimal,
    pub ending_cash: Decimal,
}

impl CashFlowEntry {
    /// Reads a stored entry, accepting numbers or numeric strings for every
    /// amount. Entries without a valid `month` are skipped.
    pub fn from_value(value: &Value) -> Option<Self> {
        let month = value.get("month")?.as_str()?.parse::<MonthKey>().ok()?;
        let amount = |field: &Value, key: &str| {
            field
                .get(key)
                .and_then(decimal_from_value)
                .unwrap_or_default()
        };
        let items = |key: &str| -> Vec<LineItem> {
            value
                .get(key)
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .map(|item| LineItem {
                            label: item
                                .get("label")
                                .and_then(Value::as_str)
                                .unwrap_or_default()
                                .to_string(),
                            amount: amount(item, "amount"),
                        })
                        .collect()
                })
                .unwrap_or_default()
        };

        let operating = value
            .get("operating")
            .map(|flows| OperatingFlows {
                inflow: amount(flows, "inflow"),
                outflow: amount(flows, "outflow"),
            })
            .unwrap_or_default();
        let beginning_cash = amount(value, "beginningCash");
        let investing = items("investing");
        let financing = items("financing");
        let totals = Totals::of(&operating, &investing, &financing);

        Some(Self {
            month,
            beginning_cash,
            operating,
            investing,
            financing,
            net_operating: totals.net_operating,
            total_investing: totals.investing,
            total_financing: totals.financing,
            net_change: totals.net_change,
            ending_cash: value
                .get("endingCash")
                .and_then(decimal_from_value)
                .unwrap_or(beginning_cash.saturating_add(totals.net_change)),
        })
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Derived figures for one month. Entered amounts are unbounded, so every
/// step saturates.
struct Totals {
    net_operating: Decimal,
    investing: Decimal,
    financing: Decimal,
    net_change: Decimal,
}

impl Totals {
    fn of(operating: &OperatingFlows, investing: &[LineItem], financing: &[LineItem]) -> Self {
        let net_operating = operating.net();
        let total = |items: &[LineItem]| {
            items
                .iter()
                .map(|item| item.amount)
                .fold(Decimal::ZERO, Decimal::saturating_add)
        };
        let investing = total(investing);
        let financing = total(financing);
        Self {
            net_operating,
            investing,
            financing,
            net_change: net_operating
                .saturating_sub(investing)
                .saturating_add(financing),
        }
    }
}

/// Closed months ordered by month key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CashFlowHistory {
    entries: BTreeMap<MonthKey, CashFlowEntry>,
}

impl CashFlowHistory {
    pub fn from_values(values: &[Value]) -> Self {
        let mut entries = BTreeMap::new();
        for value in values {
            match CashFlowEntry::from_value(value) {
                Some(entry) => {
                    entries.insert(entry.month, entry);
                }
                None => warn!("skipping cash-flow entry without a valid month: {value}"),
            }
        }
        Self { entries }
    }

    pub fn to_values(&self) -> Vec<Value> {
        self.entries.values().map(CashFlowEntry::to_value).collect()
    }

    pub fn get(&self, month: MonthKey) -> Option<&CashFlowEntry> {
        self.entries.get(&month)
    }

    /// Previous month's ending cash, else `opening_cash`, else zero.
    pub fn beginning_cash(&self, month: MonthKey, opening_cash: Option<Decimal>) -> Decimal {
        self.get(month.previous())
            .map(|previous| previous.ending_cash)
            .or(opening_cash)
            .unwrap_or_default()
    }

    /// Inserts `entry`, replacing any entry already stored for its month.
    pub fn record(&mut self, entry: CashFlowEntry) {
        self.entries.insert(entry.month, entry);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }
}

pub fn compute(input: &CashFlowInput, history: &CashFlowHistory) -> CashFlowEntry {
    let beginning_cash = history.beginning_cash(input.month, input.opening_cash);
    let totals = Totals::of(&input.operating, &input.investing, &input.financing);

    CashFlowEntry {
        month: input.month,
        beginning_cash,
        operating: input.operating,
        investing: input.investing.clone(),
        financing: input.financing.clone(),
        net_operating: totals.net_operating,
        total_investing: totals.investing,
        total_financing: totals.financing,
        net_change: totals.net_change,
        ending_cash: beginning_cash.saturating_add(totals.net_change),
    }
}

pub async fn history<S: RecordStore>(book: &RecordBook<S>) -> CashFlowHistory {
    CashFlowHistory::from_values(&book.list(RecordCategory::CashFlow).await)
}

/// Computes the month against the stored history and persists it, so the
/// following month can chain its beginning balance from this one.
pub async fn close_month<S: RecordStore>(
    book: &RecordBook<S>,
    input: &CashFlowInput,
) -> Result<CashFlowEntry, BookError> {
    let stored = book.load(RecordCategory::CashFlow).await?;
    let mut history = CashFlowHistory::from_values(&stored);

    let entry = compute(input, &history);
    history.record(entry.clone());
    book.replace(RecordCategory::CashFlow, history.to_values()).await?;

    info!(
        "closed cash flow for {} with ending cash {}",
        entry.month, entry.ending_cash
    );
    Ok(entry)
}
