use std::collections::HashMap;

use anyhow::bail;
use async_trait::async_trait;
use brickbooks_core::{RecordCategory, RecordStore};
use serde_json::Value;
use tokio::sync::RwLock;

pub mod book;

pub use book::{BookError, RecordBook};

#[derive(Default)]
pub struct InMemoryRecordStore {
    collections: RwLock<HashMap<String, Vec<Value>>>,
}

impl InMemoryRecordStore {
    /// Builds a store from a `{ "category": [records...] }` document. A
    /// `cashFlow` object keyed by month is flattened into month-tagged entries.
    pub fn from_document(document: Value) -> anyhow::Result<Self> {
        let Value::Object(entries) = document else {
            bail!("seed document must be a JSON object keyed by category");
        };

        let mut collections = HashMap::with_capacity(entries.len());
        for (category, records) in entries {
            let records = match records {
                Value::Array(records) => records,
                Value::Object(months) if category == RecordCategory::CashFlow.key() => months
                    .into_iter()
                    .map(|(month, mut entry)| {
                        if let Some(fields) = entry.as_object_mut() {
                            fields.entry("month").or_insert(Value::String(month));
                        }
                        entry
                    })
                    .collect(),
                _ => bail!("seed category {category} must hold an array of records"),
            };
            collections.insert(category, records);
        }

        Ok(Self {
            collections: RwLock::new(collections),
        })
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn get(&self, category: &str) -> anyhow::Result<Vec<Value>> {
        let collections = self.collections.read().await;
        Ok(collections.get(category).cloned().unwrap_or_default())
    }

    async fn set(&self, category: &str, records: Vec<Value>) -> anyhow::Result<()> {
        let mut collections = self.collections.write().await;
        collections.insert(category.to_string(), records);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn unknown_category_reads_empty() {
        let store = InMemoryRecordStore::default();
        assert!(store.get("sales").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn set_overwrites_whole_collection() {
        let store = InMemoryRecordStore::default();
        store
            .set("costs", vec![json!({"id": 1}), json!({"id": 2})])
            .await
            .unwrap();
        store.set("costs", vec![json!({"id": 3})]).await.unwrap();

        assert_eq!(store.get("costs").await.unwrap(), vec![json!({"id": 3})]);
    }

    #[tokio::test]
    async fn seeds_from_document() {
        let store = InMemoryRecordStore::from_document(json!({
            "sales": [{"id": 1, "amount": 100}],
            "costs": [],
        }))
        .unwrap();

        assert_eq!(store.get("sales").await.unwrap().len(), 1);
        assert!(store.get("costs").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn flattens_month_keyed_cash_flow() {
        let store = InMemoryRecordStore::from_document(json!({
            "cashFlow": {"2025-01": {"beginningCash": 0, "endingCash": 120}},
        }))
        .unwrap();

        let entries = store.get("cashFlow").await.unwrap();
        assert_eq!(entries[0]["month"], json!("2025-01"));
        assert_eq!(entries[0]["endingCash"], json!(120));
    }

    #[test]
    fn rejects_non_array_seed_categories() {
        let result = InMemoryRecordStore::from_document(json!({"sales": {"id": 1}}));
        assert!(result.is_err());
    }
}
