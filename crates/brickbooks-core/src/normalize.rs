//! Tolerant parse from stored JSON values into typed records.
//!
//! Stored records come straight from entry forms, so fields may be missing,
//! empty strings, numbers typed as strings, or named by an older form
//! (`item` vs `description`, `total` vs `amount`). Missing or malformed
//! amounts become zero, malformed dates become `None`, and non-object entries
//! are skipped. Nothing here fails.
//!
//! Amounts beyond [`AMOUNT_LIMIT`] in magnitude are treated as malformed, so
//! ledger totals stay far inside the range `Decimal` arithmetic can hold.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::models::{
    CapitalClass, CapitalKind, CapitalRecord, CashFlowClass, CostCategory, CostRecord,
    InventoryMovement, InventoryStock, ItemType, LedgerEntry, PaidStatus, PayrollRecord,
    SaleRecord,
};

/// Largest magnitude accepted for a stored amount or quantity.
pub const AMOUNT_LIMIT: i64 = 1_000_000_000_000_000;

pub fn sales(values: &[Value]) -> Vec<SaleRecord> {
    objects(values)
        .map(|fields| SaleRecord {
            id: fields.id(),
            date: fields.date(),
            description: fields.text(&["description", "item"]).unwrap_or_default(),
            amount: fields.amount(&["amount", "total"]),
            paid: fields
                .text(&["paid"])
                .map(|raw| PaidStatus::parse(&raw))
                .unwrap_or_default(),
            paid_via: fields.text(&["paidVia"]),
            quantity: fields.decimal(&["quantity"]),
            unit: fields.text(&["unit"]),
            reference_number: fields.text(&["referenceNumber"]),
        })
        .collect()
}

pub fn costs(values: &[Value]) -> Vec<CostRecord> {
    objects(values)
        .map(|fields| CostRecord {
            id: fields.id(),
            date: fields.date(),
            description: fields.text(&["description"]).unwrap_or_default(),
            amount: fields.amount(&["amount"]),
            category: CostCategory::parse(&fields.text(&["category"]).unwrap_or_default()),
            used_in_production: fields.flag("usedInProduction"),
            quantity: fields.decimal(&["quantity"]),
            unit: fields.text(&["unit"]),
            paid_via: fields.text(&["paidVia"]),
            reference_number: fields.text(&["referenceNumber"]),
        })
        .collect()
}

/// Payslips carry `basicSalary` plus benefit and deduction lines; the legacy
/// `salaries` list only carried a flat `amount`.
pub fn payroll(values: &[Value]) -> Vec<PayrollRecord> {
    objects(values)
        .map(|fields| {
            let basic_salary = fields.amount(&["basicSalary"]);
            let benefits = fields.line_total("benefits");
            let deductions = fields.line_total("deductions");
            let net_pay = fields.decimal(&["netPay"]).unwrap_or_else(|| {
                if fields.has_any(&["basicSalary", "benefits", "deductions"]) {
                    basic_salary + benefits - deductions
                } else {
                    fields.amount(&["amount"])
                }
            });

            PayrollRecord {
                id: fields.id(),
                date: fields.date(),
                name: fields.text(&["name"]).unwrap_or_default(),
                position: fields.text(&["position"]).unwrap_or_default(),
                basic_salary,
                benefits,
                deductions,
                net_pay,
            }
        })
        .collect()
}

pub fn capital(values: &[Value]) -> Vec<CapitalRecord> {
    objects(values)
        .map(|fields| {
            let kind = CapitalKind::parse(&fields.text(&["type"]).unwrap_or_default());
            let cash_flow = fields
                .text(&["cashFlowType"])
                .and_then(|raw| CashFlowClass::parse(&raw))
                .unwrap_or_else(|| kind.cash_flow());

            CapitalRecord {
                id: fields.id(),
                date: fields.date(),
                description: fields.text(&["description"]).unwrap_or_default(),
                kind,
                class: CapitalClass::parse(&fields.text(&["category"]).unwrap_or_default()),
                amount: fields.amount(&["amount"]),
                paid_via: fields.text(&["paidVia"]),
                cash_flow,
            }
        })
        .collect()
}

pub fn entries(values: &[Value]) -> Vec<LedgerEntry> {
    objects(values)
        .map(|fields| LedgerEntry {
            id: fields.id(),
            date: fields.date(),
            description: fields.text(&["description"]).unwrap_or_default(),
            category: fields.text(&["category"]).unwrap_or_default(),
            amount: fields.amount(&["amount"]),
            expense_type: fields.text(&["expenseType"]),
        })
        .collect()
}

pub fn movements(values: &[Value]) -> Vec<InventoryMovement> {
    objects(values)
        .map(|fields| InventoryMovement {
            id: fields.id(),
            date: fields.date(),
            item: fields.text(&["name"]).unwrap_or_default(),
            item_type: ItemType::parse(&fields.text(&["type"]).unwrap_or_default()),
            quantity_in: fields.amount(&["quantityIn"]),
            quantity_out: fields.amount(&["quantityOut"]),
            unit: fields.text(&["unit"]).unwrap_or_default(),
            reference: fields.text(&["sourceUse", "sourceReference", "useReference"]),
        })
        .collect()
}

pub fn stock(values: &[Value]) -> Vec<InventoryStock> {
    objects(values)
        .map(|fields| InventoryStock {
            item: fields.text(&["name"]).unwrap_or_default(),
            item_type: ItemType::parse(&fields.text(&["type"]).unwrap_or_default()),
            unit: fields.text(&["unit"]).unwrap_or_default(),
            current_stock: fields.amount(&["currentStock"]),
            minimum_level: fields.amount(&["minimumLevel"]),
        })
        .collect()
}

/// Numbers and numeric strings within [`AMOUNT_LIMIT`] become decimals;
/// anything else is `None`.
pub fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(number) => parse_decimal(&number.to_string()),
        Value::String(raw) => parse_decimal(raw.trim()),
        _ => None,
    }
}

/// Accepts `YYYY-MM-DD`, optionally followed by an ISO time component.
pub fn date_from_value(value: &Value) -> Option<NaiveDate> {
    let raw = value.as_str()?.trim();
    let day = raw.split_once('T').map_or(raw, |(day, _)| day);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    if raw.is_empty() {
        return None;
    }
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
        .filter(|amount| within_amount_limit(*amount))
}

pub fn within_amount_limit(amount: Decimal) -> bool {
    amount.abs() <= Decimal::from(AMOUNT_LIMIT)
}

fn objects(values: &[Value]) -> impl Iterator<Item = Fields<'_>> {
    values.iter().filter_map(Value::as_object).map(Fields)
}

struct Fields<'a>(&'a Map<String, Value>);

impl Fields<'_> {
    fn first(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter()
            .filter_map(|key| self.0.get(*key))
            .find(|value| !value.is_null())
    }

    fn has_any(&self, keys: &[&str]) -> bool {
        self.first(keys).is_some()
    }

    fn id(&self) -> i64 {
        match self.0.get("id") {
            Some(Value::Number(number)) => number
                .as_i64()
                .or_else(|| number.as_f64().map(|raw| raw as i64))
                .unwrap_or_default(),
            Some(Value::String(raw)) => raw.trim().parse().unwrap_or_default(),
            _ => 0,
        }
    }

    fn date(&self) -> Option<NaiveDate> {
        self.0.get("date").and_then(date_from_value)
    }

    fn text(&self, keys: &[&str]) -> Option<String> {
        keys.iter()
            .filter_map(|key| self.0.get(*key))
            .find_map(|value| match value {
                Value::String(raw) if !raw.trim().is_empty() => Some(raw.trim().to_string()),
                Value::Number(number) => Some(number.to_string()),
                Value::Bool(flag) => Some(flag.to_string()),
                _ => None,
            })
    }

    fn decimal(&self, keys: &[&str]) -> Option<Decimal> {
        keys.iter()
            .filter_map(|key| self.0.get(*key))
            .find_map(decimal_from_value)
    }

    fn amount(&self, keys: &[&str]) -> Decimal {
        self.decimal(keys).unwrap_or_default()
    }

    fn flag(&self, key: &str) -> bool {
        match self.0.get(key) {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(raw)) => {
                matches!(raw.trim().to_ascii_lowercase().as_str(), "yes" | "true")
            }
            _ => false,
        }
    }

    fn line_total(&self, key: &str) -> Decimal {
        self.0
            .get(key)
            .and_then(Value::as_array)
            .map(|lines| {
                lines
                    .iter()
                    .filter_map(|line| line.get("amount"))
                    .filter_map(decimal_from_value)
                    .fold(Decimal::ZERO, Decimal::saturating_add)
            })
            .unwrap_or_default()
    }
}
