use std::collections::HashSet;

use brickbooks_core::{
    CapitalKind, LedgerSnapshot, RecordCategory, RecordStore, ValidationError, normalize,
    reference_number, validate,
};
use chrono::Utc;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, error, warn};

#[derive(Debug, Error)]
pub enum BookError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{category} record {id} not found")]
    NotFound { category: RecordCategory, id: i64 },
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Collections read as payroll, in precedence order. New payroll is written
/// under `payroll`; older entry forms wrote `payslips` or `salaries`.
const PAYROLL_COLLECTIONS: [RecordCategory; 3] = [
    RecordCategory::Payroll,
    RecordCategory::LegacyPayslips,
    RecordCategory::LegacySalaries,
];

/// Record lifecycle on top of a [`RecordStore`]: reads fail open to an empty
/// collection, writes validate first and replace the whole collection.
pub struct RecordBook<S> {
    store: S,
}

impl<S: RecordStore> RecordBook<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn list(&self, category: RecordCategory) -> Vec<Value> {
        match self.store.get(category.key()).await {
            Ok(records) => records,
            Err(err) => {
                warn!("record store read for {category} failed, using empty collection: {err:#}");
                Vec::new()
            }
        }
    }

    /// Payroll across `payroll` and the legacy `payslips` and `salaries`
    /// keys. A record id seen in an earlier collection hides later copies.
    pub async fn list_payroll(&self) -> Vec<Value> {
        let mut seen = HashSet::new();
        let mut merged = Vec::new();
        for category in PAYROLL_COLLECTIONS {
            for record in self.list(category).await {
                if record_id(&record).is_none_or(|id| seen.insert(id)) {
                    merged.push(record);
                }
            }
        }
        merged
    }

    pub async fn snapshot(&self) -> LedgerSnapshot {
        let (sales, costs, payroll, miscellaneous, other_revenue, capital, inventory, movements) = tokio::join!(
            self.list(RecordCategory::Sales),
            self.list(RecordCategory::Costs),
            self.list_payroll(),
            self.list(RecordCategory::Miscellaneous),
            self.list(RecordCategory::OtherRevenue),
            self.list(RecordCategory::Capital),
            self.list(RecordCategory::Inventory),
            self.list(RecordCategory::InventoryMovements),
        );

        LedgerSnapshot {
            sales: normalize::sales(&sales),
            costs: normalize::costs(&costs),
            payroll: normalize::payroll(&payroll),
            miscellaneous: normalize::entries(&miscellaneous),
            other_revenue: normalize::entries(&other_revenue),
            capital: normalize::capital(&capital),
            inventory: normalize::stock(&inventory),
            movements: normalize::movements(&movements),
        }
    }

    /// Validates and appends `record`, returning the generated id.
    pub async fn create(
        &self,
        category: RecordCategory,
        mut record: Value,
    ) -> Result<i64, BookError> {
        validate(category, &record)?;

        let mut records = self.load(category).await?;
        let mut highest = highest_id(&records);
        for sibling in collections(category).into_iter().skip(1) {
            highest = highest.max(highest_id(&self.load(sibling).await?));
        }
        let id = Utc::now().timestamp_millis().max(highest + 1);
        stamp(category, &mut record, id);
        if let Some(tag) = category.reference_tag() {
            stamp_reference(&mut record, tag, id);
        }
        records.push(record);

        self.write(category, records).await?;
        debug!("created {category} record {id}");
        Ok(id)
    }

    /// Replaces the record with `id`, keeping its id and reference number.
    /// Payroll edits reach records still held under the legacy keys.
    pub async fn edit(
        &self,
        category: RecordCategory,
        id: i64,
        mut record: Value,
    ) -> Result<(), BookError> {
        validate(category, &record)?;

        let (holder, mut records, slot) = self.locate(category, id).await?;
        stamp(holder, &mut record, id);
        if let Some(existing) = records[slot].get("referenceNumber").cloned() {
            if let Some(fields) = record.as_object_mut() {
                fields.entry("referenceNumber").or_insert(existing);
            }
        }
        records[slot] = record;

        self.write(holder, records).await?;
        debug!("edited {holder} record {id}");
        Ok(())
    }

    pub async fn delete(&self, category: RecordCategory, id: i64) -> Result<(), BookError> {
        let (holder, mut records, slot) = self.locate(category, id).await?;
        records.remove(slot);

        self.write(holder, records).await?;
        debug!("deleted {holder} record {id}");
        Ok(())
    }

    /// Overwrites a whole collection without per-record validation.
    pub async fn replace(
        &self,
        category: RecordCategory,
        records: Vec<Value>,
    ) -> Result<(), BookError> {
        self.write(category, records).await
    }

    /// Strict read for callers about to write the collection back. Unlike
    /// [`RecordBook::list`] a store failure is returned, since writing over an
    /// empty fallback would drop the stored records.
    pub async fn load(&self, category: RecordCategory) -> Result<Vec<Value>, BookError> {
        self.store.get(category.key()).await.map_err(|err| {
            error!("record store read for {category} failed: {err:#}");
            BookError::Store(err.context(format!("failed to read {category}")))
        })
    }

    /// Finds the collection holding `id`, returning it loaded along with the
    /// record's position.
    async fn locate(
        &self,
        category: RecordCategory,
        id: i64,
    ) -> Result<(RecordCategory, Vec<Value>, usize), BookError> {
        for holder in collections(category) {
            let records = self.load(holder).await?;
            if let Some(slot) = records
                .iter()
                .position(|existing| record_id(existing) == Some(id))
            {
                return Ok((holder, records, slot));
            }
        }
        Err(BookError::NotFound { category, id })
    }

    async fn write(&self, category: RecordCategory, records: Vec<Value>) -> Result<(), BookError> {
        self.store
            .set(category.key(), records)
            .await
            .map_err(|err| {
                error!("record store write for {category} failed: {err:#}");
                BookError::Store(err.context(format!("failed to write {category}")))
            })
    }
}

/// `category` first, then any collections sharing its records.
fn collections(category: RecordCategory) -> Vec<RecordCategory> {
    if PAYROLL_COLLECTIONS.contains(&category) {
        let mut ordered = vec![category];
        ordered.extend(PAYROLL_COLLECTIONS.into_iter().filter(|other| *other != category));
        ordered
    } else {
        vec![category]
    }
}

pub fn record_id(record: &Value) -> Option<i64> {
    match record.get("id")? {
        Value::Number(number) => number.as_i64(),
        Value::String(raw) => raw.trim().parse().ok(),
        _ => None,
    }
}

/// New ids are creation timestamps in milliseconds, bumped past this so two
/// records created in the same millisecond stay distinct.
fn highest_id(records: &[Value]) -> i64 {
    records.iter().filter_map(record_id).max().unwrap_or(0)
}

fn stamp_reference(record: &mut Value, tag: &str, id: i64) {
    let Some(fields) = record.as_object_mut() else {
        return;
    };
    let missing = fields
        .get("referenceNumber")
        .and_then(Value::as_str)
        .is_none_or(|raw| raw.trim().is_empty());
    if missing {
        fields.insert(
            "referenceNumber".to_string(),
            json!(reference_number(tag, id)),
        );
    }
}

fn stamp(category: RecordCategory, record: &mut Value, id: i64) {
    let Some(fields) = record.as_object_mut() else {
        return;
    };
    fields.insert("id".to_string(), json!(id));

    match category {
        RecordCategory::Capital => {
            let kind = fields
                .get("type")
                .and_then(Value::as_str)
                .map(CapitalKind::parse)
                .unwrap_or_default();
            fields.insert("cashFlowType".to_string(), json!(kind.cash_flow().label()));
        }
        RecordCategory::InventoryMovements => {
            let quantity_in = fields
                .get("quantityIn")
                .and_then(normalize::decimal_from_value)
                .unwrap_or_default();
            let quantity_out = fields
                .get("quantityOut")
                .and_then(normalize::decimal_from_value)
                .unwrap_or_default();
            fields.insert(
                "netChange".to_string(),
                json!((quantity_in - quantity_out).to_string()),
            );
        }
        _ => {}
    }
}
