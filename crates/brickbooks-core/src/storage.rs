use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

/// Keys under which the record store holds each ordered collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordCategory {
    Sales,
    Costs,
    Payroll,
    LegacyPayslips,
    LegacySalaries,
    Miscellaneous,
    OtherRevenue,
    Capital,
    Inventory,
    InventoryMovements,
    CashFlow,
}

impl RecordCategory {
    pub const ALL: [RecordCategory; 11] = [
        Self::Sales,
        Self::Costs,
        Self::Payroll,
        Self::LegacyPayslips,
        Self::LegacySalaries,
        Self::Miscellaneous,
        Self::OtherRevenue,
        Self::Capital,
        Self::Inventory,
        Self::InventoryMovements,
        Self::CashFlow,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Sales => "sales",
            Self::Costs => "costs",
            Self::Payroll => "payroll",
            Self::LegacyPayslips => "payslips",
            Self::LegacySalaries => "salaries",
            Self::Miscellaneous => "miscellaneous",
            Self::OtherRevenue => "otherRevenue",
            Self::Capital => "capital",
            Self::Inventory => "inventory",
            Self::InventoryMovements => "inventoryMovements",
            Self::CashFlow => "cashFlow",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.key() == key)
    }

    /// Tag used in generated reference numbers, or `None` for collections
    /// that are not entered as transactions.
    pub fn reference_tag(self) -> Option<&'static str> {
        match self {
            Self::InventoryMovements => Some("INV"),
            Self::Inventory | Self::CashFlow => None,
            other => Some(other.key()),
        }
    }
}

/// `TX-{TAG}-{timestamp}`, with the tag upper-cased.
pub fn reference_number(tag: &str, timestamp_millis: i64) -> String {
    format!("TX-{}-{timestamp_millis}", tag.to_uppercase())
}

impl fmt::Display for RecordCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Durable mapping from a category key to an ordered sequence of records.
/// Writes replace the whole collection.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get(&self, category: &str) -> anyhow::Result<Vec<Value>>;
    async fn set(&self, category: &str, records: Vec<Value>) -> anyhow::Result<()>;
}

#[async_trait]
impl<T> RecordStore for Arc<T>
where
    T: RecordStore + ?Sized,
{
    async fn get(&self, category: &str) -> anyhow::Result<Vec<Value>> {
        (**self).get(category).await
    }

    async fn set(&self, category: &str, records: Vec<Value>) -> anyhow::Result<()> {
        (**self).set(category, records).await
    }
}
