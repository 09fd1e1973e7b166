use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CashFlowClass {
    #[default]
    Operating,
    Investing,
    Financing,
}

impl CashFlowClass {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "operating" => Some(Self::Operating),
            "investing" => Some(Self::Investing),
            "financing" => Some(Self::Financing),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Operating => "operating",
            Self::Investing => "investing",
            Self::Financing => "financing",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaidStatus {
    Yes,
    No,
    #[default]
    Unknown,
}

impl PaidStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "yes" | "true" | "paid" => Self::Yes,
            "no" | "false" | "unpaid" => Self::No,
            _ => Self::Unknown,
        }
    }
}

/// Cost categories offered by the costs form. Labels outside the known set
/// are kept verbatim and count toward neither COGS nor operating expenses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CostCategory {
    RawMaterials,
    DirectLabour,
    ManufacturingOverheads,
    Rent,
    Utilities,
    TransportFuel,
    Depreciation,
    Other,
    Unclassified(String),
}

impl CostCategory {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "raw materials" | "raw material" => Self::RawMaterials,
            "direct labour" | "direct labor" => Self::DirectLabour,
            "manufacturing overheads" | "manufacturing overhead" => Self::ManufacturingOverheads,
            "rent" => Self::Rent,
            "utilities" | "utility" => Self::Utilities,
            "transport/fuel" | "transport" | "fuel" => Self::TransportFuel,
            "depreciation" => Self::Depreciation,
            "other" => Self::Other,
            _ => Self::Unclassified(raw.trim().to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::RawMaterials => "Raw Materials",
            Self::DirectLabour => "Direct Labour",
            Self::ManufacturingOverheads => "Manufacturing Overheads",
            Self::Rent => "Rent",
            Self::Utilities => "Utilities",
            Self::TransportFuel => "Transport/Fuel",
            Self::Depreciation => "Depreciation",
            Self::Other => "Other",
            Self::Unclassified(label) => label,
        }
    }

    pub fn is_cost_of_sales(&self) -> bool {
        matches!(
            self,
            Self::RawMaterials | Self::DirectLabour | Self::ManufacturingOverheads
        )
    }

    pub fn is_operating_expense(&self) -> bool {
        matches!(
            self,
            Self::Rent | Self::Utilities | Self::TransportFuel | Self::Depreciation | Self::Other
        )
    }
}

impl From<String> for CostCategory {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<CostCategory> for String {
    fn from(category: CostCategory) -> Self {
        category.label().to_string()
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CapitalKind {
    Equipment,
    Investment,
    Loan,
    Repayment,
    #[default]
    Other,
}

impl CapitalKind {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "equipment" => Self::Equipment,
            "investment" => Self::Investment,
            "loan" => Self::Loan,
            "repayment" => Self::Repayment,
            _ => Self::Other,
        }
    }

    pub fn cash_flow(self) -> CashFlowClass {
        match self {
            Self::Equipment | Self::Investment => CashFlowClass::Investing,
            Self::Loan | Self::Repayment => CashFlowClass::Financing,
            Self::Other => CashFlowClass::Operating,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CapitalClass {
    Asset,
    Liability,
    Equity,
    #[default]
    Other,
}

impl CapitalClass {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asset" => Self::Asset,
            "liability" => Self::Liability,
            "equity" => Self::Equity,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ItemType {
    #[default]
    RawMaterial,
    FinishedProduct,
}

impl ItemType {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "finished-product" | "finished product" | "finished goods" => Self::FinishedProduct,
            _ => Self::RawMaterial,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::RawMaterial => "raw-material",
            Self::FinishedProduct => "finished-product",
        }
    }
}

/// Common view over every normalized transaction record.
pub trait Record {
    fn id(&self) -> i64;
    fn date(&self) -> Option<NaiveDate>;
    fn amount(&self) -> Decimal;
    fn description(&self) -> &str;
    fn category_label(&self) -> &str;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaleRecord {
    pub id: i64,
    pub date: Option<NaiveDate>,
    pub description: String,
    pub amount: Decimal,
    pub paid: PaidStatus,
    pub paid_via: Option<String>,
    pub quantity: Option<Decimal>,
    pub unit: Option<String>,
    pub reference_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostRecord {
    pub id: i64,
    pub date: Option<NaiveDate>,
    pub description: String,
    pub amount: Decimal,
    pub category: CostCategory,
    pub used_in_production: bool,
    pub quantity: Option<Decimal>,
    pub unit: Option<String>,
    pub paid_via: Option<String>,
    pub reference_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayrollRecord {
    pub id: i64,
    pub date: Option<NaiveDate>,
    pub name: String,
    pub position: String,
    pub basic_salary: Decimal,
    pub benefits: Decimal,
    pub deductions: Decimal,
    pub net_pay: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CapitalRecord {
    pub id: i64,
    pub date: Option<NaiveDate>,
    pub description: String,
    pub kind: CapitalKind,
    pub class: CapitalClass,
    pub amount: Decimal,
    pub paid_via: Option<String>,
    pub cash_flow: CashFlowClass,
}

/// Miscellaneous expenses and other-revenue lines share this shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerEntry {
    pub id: i64,
    pub date: Option<NaiveDate>,
    pub description: String,
    pub category: String,
    pub amount: Decimal,
    pub expense_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryMovement {
    pub id: i64,
    pub date: Option<NaiveDate>,
    pub item: String,
    pub item_type: ItemType,
    pub quantity_in: Decimal,
    pub quantity_out: Decimal,
    pub unit: String,
    pub reference: Option<String>,
}

impl InventoryMovement {
    pub fn net_change(&self) -> Decimal {
        self.quantity_in - self.quantity_out
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryStock {
    pub item: String,
    pub item_type: ItemType,
    pub unit: String,
    pub current_stock: Decimal,
    pub minimum_level: Decimal,
}

/// Every record category loaded once from the store; statements are pure
/// functions of this value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LedgerSnapshot {
    pub sales: Vec<SaleRecord>,
    pub costs: Vec<CostRecord>,
    pub payroll: Vec<PayrollRecord>,
    pub miscellaneous: Vec<LedgerEntry>,
    pub other_revenue: Vec<LedgerEntry>,
    pub capital: Vec<CapitalRecord>,
    pub inventory: Vec<InventoryStock>,
    pub movements: Vec<InventoryMovement>,
}

impl Record for SaleRecord {
    fn id(&self) -> i64 {
        self.id
    }
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
    fn amount(&self) -> Decimal {
        self.amount
    }
    fn description(&self) -> &str {
        &self.description
    }
    fn category_label(&self) -> &str {
        "sales"
    }
}

impl Record for CostRecord {
    fn id(&self) -> i64 {
        self.id
    }
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
    fn amount(&self) -> Decimal {
        self.amount
    }
    fn description(&self) -> &str {
        &self.description
    }
    fn category_label(&self) -> &str {
        self.category.label()
    }
}

impl Record for PayrollRecord {
    fn id(&self) -> i64 {
        self.id
    }
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
    fn amount(&self) -> Decimal {
        self.net_pay
    }
    fn description(&self) -> &str {
        &self.name
    }
    fn category_label(&self) -> &str {
        &self.position
    }
}

impl Record for CapitalRecord {
    fn id(&self) -> i64 {
        self.id
    }
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
    fn amount(&self) -> Decimal {
        self.amount
    }
    fn description(&self) -> &str {
        &self.description
    }
    fn category_label(&self) -> &str {
        match self.class {
            CapitalClass::Asset => "asset",
            CapitalClass::Liability => "liability",
            CapitalClass::Equity => "equity",
            CapitalClass::Other => "other",
        }
    }
}

impl Record for LedgerEntry {
    fn id(&self) -> i64 {
        self.id
    }
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
    fn amount(&self) -> Decimal {
        self.amount
    }
    fn description(&self) -> &str {
        &self.description
    }
    fn category_label(&self) -> &str {
        &self.category
    }
}

impl Record for InventoryMovement {
    fn id(&self) -> i64 {
        self.id
    }
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
    fn amount(&self) -> Decimal {
        self.net_change()
    }
    fn description(&self) -> &str {
        &self.item
    }
    fn category_label(&self) -> &str {
        self.item_type.label()
    }
}
