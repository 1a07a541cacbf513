//! Catalog item model
//!
//! Represents a dining hall menu item for a specific date, hall, and meal
//! period. Catalog rows are immutable for the session; imports replace the
//! whole (date, hall, meal period) scope.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use super::NutrientProfile;

/// Meal period enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealPeriod {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealPeriod::Breakfast => "breakfast",
            MealPeriod::Lunch => "lunch",
            MealPeriod::Dinner => "dinner",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "breakfast" => Some(MealPeriod::Breakfast),
            "lunch" => Some(MealPeriod::Lunch),
            "dinner" => Some(MealPeriod::Dinner),
            _ => None,
        }
    }
}

/// A menu item scoped to a (date, dining hall, meal period) key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: i64,
    pub menu_item_id: String,
    pub date: String, // ISO date: "2025-01-09"
    pub dining_hall: String,
    pub meal_period: MealPeriod,
    pub name: String,
    pub portion: Option<String>,
    pub tags: Vec<String>,
    pub allergens: Vec<String>,
    pub nutrients: NutrientProfile,
    pub created_at: String,
}

/// Data for one imported menu item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItemCreate {
    pub menu_item_id: String,
    pub name: String,
    pub portion: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default)]
    pub nutrients: NutrientProfile,
}

impl CatalogItem {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let meal_period_str: String = row.get("meal_period")?;
        let tags_json: Option<String> = row.get("tags")?;
        let allergens_json: Option<String> = row.get("allergens")?;

        Ok(Self {
            id: row.get("id")?,
            menu_item_id: row.get("menu_item_id")?,
            date: row.get("date")?,
            dining_hall: row.get("dining_hall")?,
            meal_period: MealPeriod::from_str(&meal_period_str).unwrap_or(MealPeriod::Lunch),
            name: row.get("name")?,
            portion: row.get("portion")?,
            tags: parse_string_list(tags_json.as_deref()),
            allergens: parse_string_list(allergens_json.as_deref()),
            nutrients: NutrientProfile {
                calories: row.get("calories")?,
                protein: row.get("protein")?,
                carbs: row.get("carbs")?,
                fat: row.get("fat")?,
                fiber: row.get("fiber")?,
                sodium: row.get("sodium")?,
                sugar: row.get("sugar")?,
                saturated_fat: row.get("saturated_fat")?,
                cholesterol: row.get("cholesterol")?,
            },
            created_at: row.get("created_at")?,
        })
    }

    /// Replace all items in a (date, hall, meal period) scope with a new list.
    /// Returns the number of items inserted.
    pub fn replace_scope(
        conn: &mut Connection,
        date: &str,
        dining_hall: &str,
        meal_period: MealPeriod,
        items: &[CatalogItemCreate],
    ) -> DbResult<usize> {
        let tx = conn.transaction()?;

        tx.execute(
            "DELETE FROM catalog_items WHERE date = ?1 AND dining_hall = ?2 AND meal_period = ?3",
            params![date, dining_hall, meal_period.as_str()],
        )?;

        for item in items {
            let tags_json = serde_json::to_string(&item.tags).unwrap_or_else(|_| "[]".to_string());
            let allergens_json =
                serde_json::to_string(&item.allergens).unwrap_or_else(|_| "[]".to_string());

            tx.execute(
                r#"
                INSERT INTO catalog_items (
                    menu_item_id, date, dining_hall, meal_period, name, portion,
                    tags, allergens,
                    calories, protein, carbs, fat, fiber, sodium, sugar,
                    saturated_fat, cholesterol
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)
                "#,
                params![
                    item.menu_item_id,
                    date,
                    dining_hall,
                    meal_period.as_str(),
                    item.name,
                    item.portion,
                    tags_json,
                    allergens_json,
                    item.nutrients.calories,
                    item.nutrients.protein,
                    item.nutrients.carbs,
                    item.nutrients.fat,
                    item.nutrients.fiber,
                    item.nutrients.sodium,
                    item.nutrients.sugar,
                    item.nutrients.saturated_fat,
                    item.nutrients.cholesterol,
                ],
            )?;
        }

        tx.commit()?;
        Ok(items.len())
    }

    /// List items for a date, optionally narrowed to a hall and meal period.
    ///
    /// With no filters this is the full per-date catalog used for plate
    /// reconciliation (all halls, all meal periods).
    pub fn list_for_date(
        conn: &Connection,
        date: &str,
        dining_hall: Option<&str>,
        meal_period: Option<MealPeriod>,
    ) -> DbResult<Vec<Self>> {
        let mut sql = String::from("SELECT * FROM catalog_items WHERE date = ?1");
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(date.to_string())];

        if let Some(hall) = dining_hall {
            params_vec.push(Box::new(hall.to_string()));
            sql.push_str(&format!(" AND dining_hall = ?{}", params_vec.len()));
        }

        if let Some(period) = meal_period {
            params_vec.push(Box::new(period.as_str().to_string()));
            sql.push_str(&format!(" AND meal_period = ?{}", params_vec.len()));
        }

        sql.push_str(" ORDER BY dining_hall, meal_period, name");

        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();

        let items = stmt
            .query_map(params_refs.as_slice(), Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// Search items by name within a date
    pub fn search(conn: &Connection, date: &str, query: &str, limit: i64) -> DbResult<Vec<Self>> {
        let search_pattern = format!("%{}%", query);
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM catalog_items
            WHERE date = ?1 AND name LIKE ?2
            ORDER BY name ASC
            LIMIT ?3
            "#,
        )?;

        let items = stmt
            .query_map(params![date, search_pattern, limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// Count items for a date
    pub fn count_for_date(conn: &Connection, date: &str) -> DbResult<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM catalog_items WHERE date = ?1",
            [date],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

/// Parse a JSON string-array column, treating NULL or malformed data as empty
fn parse_string_list(json: Option<&str>) -> Vec<String> {
    json.and_then(|s| serde_json::from_str(s).ok())
        .unwrap_or_default()
}
