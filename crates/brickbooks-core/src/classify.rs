//! Keyword rules that suggest a classification for a new entry from its
//! description and amount. Suggestions prefill entry forms; stored records
//! are never reclassified.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{CapitalKind, CashFlowClass};

/// Amounts above this read as asset purchases rather than expenses.
pub const ASSET_THRESHOLD: i64 = 5000;

const PRODUCTION_KEYWORDS: &[&str] = &[
    "cement",
    "sand",
    "aggregate",
    "water",
    "brick",
    "mold",
    "raw material",
    "production",
];
const OPERATING_KEYWORDS: &[&str] = &[
    "fuel",
    "electricity",
    "rent",
    "utility",
    "office",
    "maintenance",
    "repair",
    "transport",
    "delivery",
];
const EQUIPMENT_KEYWORDS: &[&str] = &["equipment", "machinery", "vehicle"];
const ASSET_KEYWORDS: &[&str] = &[
    "equipment",
    "machinery",
    "vehicle",
    "computer",
    "furniture",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CostGroup {
    #[serde(rename = "COGS")]
    CostOfSales,
    Operating,
    Asset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSuggestion {
    pub group: CostGroup,
    pub used_in_production: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapitalSuggestion {
    pub kind: CapitalKind,
    pub cash_flow: CashFlowClass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MiscExpenseType {
    Repair,
    Asset,
    Operating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MiscSuggestion {
    pub expense_type: MiscExpenseType,
    pub recurring: bool,
}

/// Production materials first, then running costs, then large or
/// equipment-like purchases. Anything else is an operating cost.
pub fn suggest_cost(description: &str, amount: Decimal) -> CostSuggestion {
    let (group, used_in_production) = if mentions(description, PRODUCTION_KEYWORDS) {
        (CostGroup::CostOfSales, true)
    } else if mentions(description, OPERATING_KEYWORDS) {
        (CostGroup::Operating, false)
    } else if above_asset_threshold(amount) || mentions(description, ASSET_KEYWORDS) {
        (CostGroup::Asset, false)
    } else {
        (CostGroup::Operating, false)
    };
    CostSuggestion {
        group,
        used_in_production,
    }
}

/// Owner money and borrowing are financing; everything else is treated as
/// an equipment purchase.
pub fn suggest_capital(description: &str) -> CapitalSuggestion {
    let (kind, cash_flow) = if mentions(description, &["loan", "borrow", "credit"]) {
        (CapitalKind::Loan, CashFlowClass::Financing)
    } else if mentions(description, &["investment", "capital", "equity"]) {
        (CapitalKind::Investment, CashFlowClass::Financing)
    } else {
        (CapitalKind::Equipment, CashFlowClass::Investing)
    };
    CapitalSuggestion { kind, cash_flow }
}

pub fn suggest_misc(description: &str, amount: Decimal) -> MiscSuggestion {
    let (expense_type, recurring) = if mentions(description, &["repair", "maintenance", "fix"]) {
        (MiscExpenseType::Repair, false)
    } else if above_asset_threshold(amount) || mentions(description, EQUIPMENT_KEYWORDS) {
        (MiscExpenseType::Asset, false)
    } else if mentions(
        description,
        &[
            "monthly",
            "quarterly",
            "annual",
            "subscription",
            "rent",
            "insurance",
        ],
    ) {
        (MiscExpenseType::Operating, true)
    } else {
        (MiscExpenseType::Operating, false)
    };
    MiscSuggestion {
        expense_type,
        recurring,
    }
}

fn above_asset_threshold(amount: Decimal) -> bool {
    amount > Decimal::from(ASSET_THRESHOLD)
}

fn mentions(description: &str, keywords: &[&str]) -> bool {
    let description = description.to_lowercase();
    keywords.iter().any(|keyword| description.contains(keyword))
}
