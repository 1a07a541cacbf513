//! Menu catalog tools
//!
//! Importing and browsing per-date dining hall menus.

use serde::Serialize;

use crate::db::Database;
use crate::models::{CatalogItem, CatalogItemCreate, MealPeriod};

use super::validate_date;

/// Response for import_menu
#[derive(Debug, Serialize)]
pub struct ImportMenuResponse {
    pub date: String,
    pub dining_hall: String,
    pub meal_period: String,
    pub imported: usize,
}

/// Response for get_menu and search_menu
#[derive(Debug, Serialize)]
pub struct MenuResponse {
    pub date: String,
    pub items: Vec<CatalogItem>,
    pub count: usize,
}

/// Replace the menu for one (date, dining hall, meal period) scope
pub fn import_menu(
    db: &Database,
    date: &str,
    dining_hall: &str,
    meal_period: &str,
    items: Vec<CatalogItemCreate>,
) -> Result<ImportMenuResponse, String> {
    validate_date(date)?;
    let period = MealPeriod::from_str(meal_period).ok_or_else(|| {
        format!(
            "Unknown meal_period '{}': expected breakfast, lunch, or dinner",
            meal_period
        )
    })?;
    if dining_hall.trim().is_empty() {
        return Err("dining_hall must not be empty".to_string());
    }
    for item in &items {
        if item.menu_item_id.trim().is_empty() {
            return Err("every menu item needs a menu_item_id".to_string());
        }
        if item.name.trim().is_empty() {
            return Err(format!("menu item '{}' needs a name", item.menu_item_id));
        }
    }

    let imported = db
        .with_conn_mut(|conn| CatalogItem::replace_scope(conn, date, dining_hall, period, &items))
        .map_err(|e| format!("Failed to import menu: {}", e))?;

    Ok(ImportMenuResponse {
        date: date.to_string(),
        dining_hall: dining_hall.to_string(),
        meal_period: period.as_str().to_string(),
        imported,
    })
}

/// List the menu for a date, optionally narrowed to a hall and meal period
pub fn get_menu(
    db: &Database,
    date: &str,
    dining_hall: Option<&str>,
    meal_period: Option<&str>,
) -> Result<MenuResponse, String> {
    validate_date(date)?;
    let period = match meal_period {
        Some(s) => Some(MealPeriod::from_str(s).ok_or_else(|| {
            format!("Unknown meal_period '{}': expected breakfast, lunch, or dinner", s)
        })?),
        None => None,
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let items = CatalogItem::list_for_date(&conn, date, dining_hall, period)
        .map_err(|e| format!("Failed to list menu: {}", e))?;

    let count = items.len();
    Ok(MenuResponse {
        date: date.to_string(),
        items,
        count,
    })
}

/// Search menu items by name within a date
pub fn search_menu(
    db: &Database,
    date: &str,
    query: &str,
    limit: i64,
) -> Result<MenuResponse, String> {
    validate_date(date)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let items = CatalogItem::search(&conn, date, query, limit)
        .map_err(|e| format!("Failed to search menu: {}", e))?;

    let count = items.len();
    Ok(MenuResponse {
        date: date.to_string(),
        items,
        count,
    })
}
