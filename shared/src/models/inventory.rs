//! Inventory Model (catalog items and dated counts)

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::util::round2;

/// Catalog item with its current unit cost
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct InventoryItem {
    pub id: i64,
    pub store_id: i64,
    pub name: String,
    pub category: String,
    /// Counting unit, e.g. `"case"`, `"lb"`
    pub unit: String,
    pub unit_cost: f64,
    pub par_level: Option<f64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItemCreate {
    pub store_id: i64,
    pub name: String,
    #[serde(default = "default_category")]
    pub category: String,
    pub unit: String,
    #[serde(default)]
    pub unit_cost: f64,
    pub par_level: Option<f64>,
}

fn default_category() -> String {
    "food".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryItemUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub unit_cost: Option<f64>,
    pub par_level: Option<f64>,
}

impl InventoryItem {
    pub fn from_create(id: i64, data: InventoryItemCreate, now: i64) -> AppResult<Self> {
        let item = Self {
            id,
            store_id: data.store_id,
            name: data.name,
            category: data.category,
            unit: data.unit,
            unit_cost: data.unit_cost,
            par_level: data.par_level,
            created_at: now,
            updated_at: now,
        };
        item.validate()?;
        Ok(item)
    }

    pub fn apply_update(&mut self, data: InventoryItemUpdate, now: i64) -> AppResult<()> {
        if let Some(v) = data.name {
            self.name = v;
        }
        if let Some(v) = data.category {
            self.category = v;
        }
        if let Some(v) = data.unit {
            self.unit = v;
        }
        if let Some(v) = data.unit_cost {
            self.unit_cost = v;
        }
        if data.par_level.is_some() {
            self.par_level = data.par_level;
        }
        self.validate()?;
        self.updated_at = now;
        Ok(())
    }

    fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::required("name"));
        }
        if self.unit_cost < 0.0 {
            return Err(AppError::validation("unit_cost must not be negative"));
        }
        Ok(())
    }
}

/// One counted item inside a snapshot (stored as JSONB)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountLine {
    pub item_id: Option<i64>,
    pub name: String,
    pub qty: f64,
    pub unit_cost: f64,
}

/// Count line as submitted; cost and name may be filled from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountLineInput {
    pub item_id: Option<i64>,
    pub name: Option<String>,
    pub qty: f64,
    pub unit_cost: Option<f64>,
}

/// Dated quantity snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct InventoryCount {
    pub id: i64,
    pub store_id: i64,
    pub count_date: NaiveDate,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub lines: Vec<CountLine>,
    pub total_value: f64,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryCountCreate {
    pub store_id: i64,
    pub count_date: Option<NaiveDate>,
    pub lines: Vec<CountLineInput>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryCountUpdate {
    pub count_date: Option<NaiveDate>,
    pub lines: Option<Vec<CountLineInput>>,
    pub notes: Option<String>,
}

/// Fill missing names/costs from the catalog.
///
/// A line without a cost must reference a catalog item.
pub fn resolve_count_lines(
    inputs: Vec<CountLineInput>,
    catalog: &[InventoryItem],
) -> AppResult<Vec<CountLine>> {
    let by_id: HashMap<i64, &InventoryItem> = catalog.iter().map(|i| (i.id, i)).collect();
    inputs
        .into_iter()
        .map(|line| {
            let item = line.item_id.and_then(|id| by_id.get(&id).copied());
            let unit_cost = match (line.unit_cost, item) {
                (Some(cost), _) => cost,
                (None, Some(item)) => item.unit_cost,
                (None, None) => {
                    return Err(AppError::validation(
                        "Count line needs unit_cost or a known item_id",
                    ));
                }
            };
            let name = line
                .name
                .or_else(|| item.map(|i| i.name.clone()))
                .unwrap_or_default();
            Ok(CountLine {
                item_id: line.item_id,
                name,
                qty: line.qty,
                unit_cost,
            })
        })
        .collect()
}

/// Σ qty × unit_cost
pub fn count_total_value(lines: &[CountLine]) -> f64 {
    round2(lines.iter().map(|l| l.qty * l.unit_cost).sum())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, name: &str, cost: f64) -> InventoryItem {
        InventoryItem {
            id,
            store_id: 1,
            name: name.into(),
            category: "food".into(),
            unit: "case".into(),
            unit_cost: cost,
            par_level: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_lines_filled_from_catalog() {
        let catalog = vec![item(1, "Mozzarella", 42.5), item(2, "Flour", 18.0)];
        let lines = resolve_count_lines(
            vec![
                CountLineInput {
                    item_id: Some(1),
                    name: None,
                    qty: 2.0,
                    unit_cost: None,
                },
                CountLineInput {
                    item_id: Some(2),
                    name: Some("Flour 50lb".into()),
                    qty: 3.0,
                    unit_cost: Some(20.0),
                },
            ],
            &catalog,
        )
        .unwrap();
        assert_eq!(lines[0].name, "Mozzarella");
        assert_eq!(lines[0].unit_cost, 42.5);
        assert_eq!(lines[1].unit_cost, 20.0);
        assert_eq!(count_total_value(&lines), 145.0);
    }

    #[test]
    fn test_unknown_item_without_cost_rejected() {
        let result = resolve_count_lines(
            vec![CountLineInput {
                item_id: Some(99),
                name: None,
                qty: 1.0,
                unit_cost: None,
            }],
            &[],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_count_is_zero() {
        assert_eq!(count_total_value(&[]), 0.0);
    }

    #[test]
    fn test_item_update_rejects_negative_cost() {
        let mut mozzarella = item(1, "Mozzarella", 42.5);
        let result = mozzarella.apply_update(
            InventoryItemUpdate {
                unit_cost: Some(-1.0),
                ..Default::default()
            },
            1,
        );
        assert!(result.is_err());

        mozzarella
            .apply_update(
                InventoryItemUpdate {
                    unit_cost: Some(44.0),
                    ..Default::default()
                },
                2,
            )
            .unwrap();
        assert_eq!(mozzarella.unit_cost, 44.0);
        assert_eq!(mozzarella.updated_at, 2);
    }
}
