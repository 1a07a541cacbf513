//! Plate item model
//!
//! Persisted plate entries for a date. Each row is either a reference to a
//! catalog menu item (resolved against the catalog on load) or a
//! self-contained custom entry with inline nutrient values.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use super::NutrientProfile;

/// A saved plate entry as persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedPlateItem {
    pub id: i64,
    pub date: String, // ISO date: "2025-01-09"
    /// Catalog feed id; None for custom entries
    pub menu_item_id: Option<String>,
    pub quantity: f64,
    pub display_name: Option<String>,
    /// Inline nutrients for custom entries; empty for catalog references
    pub custom_nutrients: NutrientProfile,
    pub is_custom: bool,
    pub created_at: String,
}

/// Data for saving one plate entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedPlateItemCreate {
    pub menu_item_id: Option<String>,
    pub quantity: f64,
    pub display_name: Option<String>,
    #[serde(default)]
    pub custom_nutrients: Option<NutrientProfile>,
}

impl SavedPlateItemCreate {
    /// True when this entry carries inline nutrients instead of a catalog
    /// reference
    pub fn is_custom(&self) -> bool {
        self.custom_nutrients.is_some()
    }
}

impl SavedPlateItem {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let is_custom: i64 = row.get("is_custom")?;
        Ok(Self {
            id: row.get("id")?,
            date: row.get("date")?,
            menu_item_id: row.get("menu_item_id")?,
            quantity: row.get("quantity")?,
            display_name: row.get("display_name")?,
            custom_nutrients: NutrientProfile {
                calories: row.get("custom_calories")?,
                protein: row.get("custom_protein")?,
                carbs: row.get("custom_carbs")?,
                fat: row.get("custom_fat")?,
                fiber: row.get("custom_fiber")?,
                sodium: row.get("custom_sodium")?,
                sugar: row.get("custom_sugar")?,
                saturated_fat: row.get("custom_saturated_fat")?,
                cholesterol: row.get("custom_cholesterol")?,
            },
            is_custom: is_custom != 0,
            created_at: row.get("created_at")?,
        })
    }

    /// Replace the saved plate for a date with a new list of entries.
    /// Returns the number of entries saved.
    pub fn replace_for_date(
        conn: &mut Connection,
        date: &str,
        items: &[SavedPlateItemCreate],
    ) -> DbResult<usize> {
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM plate_items WHERE date = ?1", [date])?;

        for item in items {
            let nutrients = item.custom_nutrients.clone().unwrap_or_default();
            tx.execute(
                r#"
                INSERT INTO plate_items (
                    date, menu_item_id, quantity, display_name,
                    custom_calories, custom_protein, custom_carbs, custom_fat,
                    custom_fiber, custom_sodium, custom_sugar,
                    custom_saturated_fat, custom_cholesterol, is_custom
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
                "#,
                params![
                    date,
                    item.menu_item_id,
                    item.quantity,
                    item.display_name,
                    nutrients.calories,
                    nutrients.protein,
                    nutrients.carbs,
                    nutrients.fat,
                    nutrients.fiber,
                    nutrients.sodium,
                    nutrients.sugar,
                    nutrients.saturated_fat,
                    nutrients.cholesterol,
                    item.is_custom() as i64,
                ],
            )?;
        }

        tx.commit()?;
        Ok(items.len())
    }

    /// Get all saved plate entries for a date
    pub fn list_for_date(conn: &Connection, date: &str) -> DbResult<Vec<Self>> {
        let mut stmt =
            conn.prepare("SELECT * FROM plate_items WHERE date = ?1 ORDER BY id")?;

        let items = stmt
            .query_map([date], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// Delete the saved plate for a date. Returns the number of entries removed.
    pub fn clear_for_date(conn: &Connection, date: &str) -> DbResult<usize> {
        let rows = conn.execute("DELETE FROM plate_items WHERE date = ?1", [date])?;
        Ok(rows)
    }
}
