use std::collections::HashMap;

use brickbooks_core::{
    CostRecord, InventoryMovement, InventoryStock, ItemType, RecordCategory, RecordStore,
    SaleRecord, normalize, reference_number,
};
use brickbooks_store::{BookError, RecordBook};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    Low,
    Warning,
    Good,
}

impl StockStatus {
    /// Low at or under the minimum, warning up to one and a half times it.
    pub fn classify(current: Decimal, minimum: Decimal) -> Self {
        if current <= minimum {
            Self::Low
        } else if current <= minimum * Decimal::new(15, 1) {
            Self::Warning
        } else {
            Self::Good
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockLevel {
    pub item: String,
    pub item_type: ItemType,
    pub unit: String,
    pub current_stock: Decimal,
    pub minimum_level: Decimal,
    pub status: StockStatus,
}

impl StockLevel {
    fn new(item: &str, item_type: ItemType, unit: &str) -> Self {
        Self {
            item: item.to_string(),
            item_type,
            unit: unit.to_string(),
            current_stock: Decimal::ZERO,
            minimum_level: Decimal::ZERO,
            status: StockStatus::Low,
        }
    }

    pub fn receive(&mut self, quantity: Decimal) {
        self.current_stock += quantity;
    }

    pub fn issue(&mut self, quantity: Decimal) {
        self.current_stock -= quantity;
    }

    fn refresh_status(&mut self) {
        self.status = StockStatus::classify(self.current_stock, self.minimum_level);
    }
}

/// Current stock per (item, type). Items with movements are rebuilt from
/// them; items known only from stored stock keep the stored figure. Minimum
/// levels always come from stored stock.
pub fn stock_levels(movements: &[InventoryMovement], stock: &[InventoryStock]) -> Vec<StockLevel> {
    let mut levels: Vec<StockLevel> = Vec::new();
    let mut index: HashMap<(String, ItemType), usize> = HashMap::new();

    for movement in movements {
        let key = (movement.item.clone(), movement.item_type);
        let slot = *index.entry(key).or_insert_with(|| {
            levels.push(StockLevel::new(
                &movement.item,
                movement.item_type,
                &movement.unit,
            ));
            levels.len() - 1
        });
        let level = &mut levels[slot];
        level.receive(movement.quantity_in);
        level.issue(movement.quantity_out);
    }

    for stored in stock {
        let key = (stored.item.clone(), stored.item_type);
        match index.get(&key) {
            Some(&slot) => {
                let level = &mut levels[slot];
                level.minimum_level = stored.minimum_level;
                if level.unit.is_empty() {
                    level.unit = stored.unit.clone();
                }
            }
            None => {
                let mut level = StockLevel::new(&stored.item, stored.item_type, &stored.unit);
                level.current_stock = stored.current_stock;
                level.minimum_level = stored.minimum_level;
                index.insert(key, levels.len());
                levels.push(level);
            }
        }
    }

    for level in &mut levels {
        level.refresh_status();
    }
    levels
}

pub fn low_stock(levels: &[StockLevel]) -> Vec<&StockLevel> {
    levels
        .iter()
        .filter(|level| level.status == StockStatus::Low)
        .collect()
}

/// Unit recorded when the source entry names none.
pub const DEFAULT_UNIT: &str = "units";

/// Raw-material receipt for a cost used in production. A missing or
/// non-positive quantity counts as one and a missing unit as
/// [`DEFAULT_UNIT`]; undated costs produce nothing.
pub fn movement_from_cost(cost: &CostRecord) -> Option<Value> {
    if !cost.used_in_production {
        return None;
    }
    let date = cost.date?;

    Some(json!({
        "date": date.to_string(),
        "type": ItemType::RawMaterial.label(),
        "name": cost.description,
        "quantityIn": quantity_or_one(cost.quantity).to_string(),
        "quantityOut": "0",
        "unit": unit_or_default(cost.unit.as_deref()),
        "sourceReference": source_reference(
            cost.reference_number.as_deref(),
            RecordCategory::Costs,
            cost.id,
        ),
        "notes": format!("Auto-added from cost entry: {}", cost.description),
    }))
}

/// Finished-goods issue for a sale, with the same quantity and unit
/// defaults as [`movement_from_cost`].
pub fn movement_from_sale(sale: &SaleRecord) -> Option<Value> {
    let date = sale.date?;

    Some(json!({
        "date": date.to_string(),
        "type": ItemType::FinishedProduct.label(),
        "name": sale.description,
        "quantityIn": "0",
        "quantityOut": quantity_or_one(sale.quantity).to_string(),
        "unit": unit_or_default(sale.unit.as_deref()),
        "useReference": source_reference(
            sale.reference_number.as_deref(),
            RecordCategory::Sales,
            sale.id,
        ),
        "notes": format!("Auto-added from sale: {}", sale.description),
    }))
}

fn quantity_or_one(quantity: Option<Decimal>) -> Decimal {
    quantity
        .filter(|quantity| quantity > &Decimal::ZERO)
        .unwrap_or(Decimal::ONE)
}

fn unit_or_default(unit: Option<&str>) -> &str {
    unit.map(str::trim)
        .filter(|unit| !unit.is_empty())
        .unwrap_or(DEFAULT_UNIT)
}

/// The entry's own reference number, else the one its creation stamped.
fn source_reference(reference: Option<&str>, category: RecordCategory, id: i64) -> String {
    match reference {
        Some(reference) => reference.to_string(),
        None => reference_number(category.key(), id),
    }
}

/// Appends a movement and adjusts the stored stock record for its item,
/// creating one with a zero minimum when the item is new.
pub async fn record_movement<S: RecordStore>(
    book: &RecordBook<S>,
    movement: Value,
) -> Result<i64, BookError> {
    let id = book
        .create(RecordCategory::InventoryMovements, movement)
        .await?;

    let stored = book.load(RecordCategory::InventoryMovements).await?;
    let Some(created) = normalize::movements(&stored)
        .into_iter()
        .find(|candidate| candidate.id == id)
    else {
        return Ok(id);
    };

    let mut stock = book.load(RecordCategory::Inventory).await?;
    adjust_stock(&mut stock, &created);
    book.replace(RecordCategory::Inventory, stock).await?;

    info!(
        "recorded {} movement for {} ({} {})",
        created.item_type.label(),
        created.item,
        created.net_change(),
        created.unit
    );
    Ok(id)
}

fn adjust_stock(stock: &mut Vec<Value>, movement: &InventoryMovement) {
    let existing = stock.iter().position(|entry| {
        let name = entry.get("name").and_then(Value::as_str).map(str::trim);
        let item_type = entry.get("type").and_then(Value::as_str).map(ItemType::parse);
        name == Some(movement.item.as_str()) && item_type == Some(movement.item_type)
    });

    match existing {
        Some(slot) => {
            let Some(fields) = stock[slot].as_object_mut() else {
                return;
            };
            let current = fields
                .get("currentStock")
                .and_then(normalize::decimal_from_value)
                .unwrap_or_default();
            fields.insert(
                "currentStock".to_string(),
                json!((current + movement.net_change()).to_string()),
            );
            debug!("adjusted stock for {}", movement.item);
        }
        None => {
            stock.push(json!({
                "name": movement.item,
                "type": movement.item_type.label(),
                "unit": movement.unit,
                "currentStock": movement.net_change().to_string(),
                "minimumLevel": "0",
            }));
            debug!("started stock record for {}", movement.item);
        }
    }
}
