use serde_json::Value;
use thiserror::Error;

use crate::normalize::decimal_from_value;
use crate::storage::RecordCategory;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{category} record is missing required fields: {}", .missing.join(", "))]
pub struct ValidationError {
    pub category: RecordCategory,
    pub missing: Vec<&'static str>,
}

/// A required field and the stored keys that satisfy it.
type Requirement = (&'static str, &'static [&'static str]);

/// Keys holding money or quantities. These must parse as a non-zero decimal.
const NUMERIC_KEYS: &[&str] = &[
    "amount",
    "total",
    "basicSalary",
    "quantityIn",
    "quantityOut",
];

const SALES: &[Requirement] = &[
    ("date", &["date"]),
    ("description", &["description", "item"]),
    ("amount", &["amount", "total"]),
];

const COSTS: &[Requirement] = &[
    ("date", &["date"]),
    ("category", &["category"]),
    ("description", &["description"]),
    ("amount", &["amount"]),
];

const PAYROLL: &[Requirement] = &[
    ("date", &["date"]),
    ("name", &["name"]),
    ("position", &["position"]),
    ("basicSalary", &["basicSalary"]),
];

const CAPITAL: &[Requirement] = &[
    ("date", &["date"]),
    ("description", &["description"]),
    ("type", &["type"]),
    ("category", &["category"]),
    ("amount", &["amount"]),
    ("paidVia", &["paidVia"]),
];

const ENTRIES: &[Requirement] = &[
    ("date", &["date"]),
    ("category", &["category"]),
    ("description", &["description"]),
    ("amount", &["amount"]),
];

const MOVEMENTS: &[Requirement] = &[
    ("date", &["date"]),
    ("type", &["type"]),
    ("name", &["name"]),
    ("quantityIn or quantityOut", &["quantityIn", "quantityOut"]),
    ("unit", &["unit"]),
];

const STOCK: &[Requirement] = &[("name", &["name"]), ("type", &["type"])];

/// Checks the fields the entry forms require before a record may be appended.
/// Empty strings count as missing. Amounts and quantities count only when
/// they parse to a non-zero decimal, so `0`, `"0"` and `"abc"` are all missing.
pub fn validate(category: RecordCategory, record: &Value) -> Result<(), ValidationError> {
    let requirements = match category {
        RecordCategory::Sales => SALES,
        RecordCategory::Costs => COSTS,
        RecordCategory::Payroll
        | RecordCategory::LegacyPayslips
        | RecordCategory::LegacySalaries => PAYROLL,
        RecordCategory::Capital => CAPITAL,
        RecordCategory::Miscellaneous | RecordCategory::OtherRevenue => ENTRIES,
        RecordCategory::InventoryMovements => MOVEMENTS,
        RecordCategory::Inventory => STOCK,
        RecordCategory::CashFlow => &[],
    };

    let missing: Vec<&'static str> = requirements
        .iter()
        .filter(|(_, keys)| !keys.iter().any(|key| is_filled(key, record.get(*key))))
        .map(|(label, _)| *label)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { category, missing })
    }
}

fn is_filled(key: &str, value: Option<&Value>) -> bool {
    if NUMERIC_KEYS.contains(&key) {
        return value
            .and_then(decimal_from_value)
            .is_some_and(|amount| !amount.is_zero());
    }
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(raw)) => !raw.trim().is_empty(),
        Some(Value::Number(_)) => true,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(_)) => true,
    }
}
