//! Plate tools
//!
//! Saving, loading, and clearing the daily plate. Loading reconciles the
//! saved entries against the whole-date catalog and aggregates totals in one
//! pass, so the caller never sees a half-merged plate.

use serde::Serialize;

use crate::db::Database;
use crate::models::{SavedPlateItem, SavedPlateItemCreate, CatalogItem};
use crate::plate::{aggregate, reconcile, PlateEntry, PlateTotals};

use super::validate_date;

/// Response for save_plate
#[derive(Debug, Serialize)]
pub struct SavePlateResponse {
    pub date: String,
    pub saved: usize,
}

/// Response for get_plate
#[derive(Debug, Serialize)]
pub struct PlateResponse {
    pub date: String,
    pub entries: Vec<PlateEntry>,
    pub totals: PlateTotals,
    /// Entries on the saved plate before reconciliation
    pub saved_count: usize,
    /// Catalog references that no longer resolved and were dropped
    pub dropped: usize,
}

/// Response for clear_plate
#[derive(Debug, Serialize)]
pub struct ClearPlateResponse {
    pub date: String,
    pub removed: usize,
}

/// Replace the saved plate for a date
pub fn save_plate(
    db: &Database,
    date: &str,
    items: Vec<SavedPlateItemCreate>,
) -> Result<SavePlateResponse, String> {
    validate_date(date)?;

    for (index, item) in items.iter().enumerate() {
        if !(item.quantity > 0.0) || !item.quantity.is_finite() {
            return Err(format!(
                "plate item {} has quantity {}; quantity must be a positive number",
                index, item.quantity
            ));
        }
        if item.menu_item_id.is_none() && !item.is_custom() {
            return Err(format!(
                "plate item {} needs a menu_item_id or custom_nutrients",
                index
            ));
        }
    }

    let saved = db
        .with_conn_mut(|conn| SavedPlateItem::replace_for_date(conn, date, &items))
        .map_err(|e| format!("Failed to save plate: {}", e))?;

    Ok(SavePlateResponse {
        date: date.to_string(),
        saved,
    })
}

/// Load the plate for a date: read saved entries and the full per-date
/// catalog (all dining halls and meal periods), reconcile, and aggregate
pub fn get_plate(db: &Database, date: &str) -> Result<PlateResponse, String> {
    validate_date(date)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let saved = SavedPlateItem::list_for_date(&conn, date)
        .map_err(|e| format!("Failed to load saved plate: {}", e))?;
    let catalog = CatalogItem::list_for_date(&conn, date, None, None)
        .map_err(|e| format!("Failed to load catalog: {}", e))?;

    let entries = reconcile(&saved, &catalog);
    let totals = aggregate(&entries);
    let dropped = saved.len() - entries.len();

    Ok(PlateResponse {
        date: date.to_string(),
        entries,
        totals,
        saved_count: saved.len(),
        dropped,
    })
}

/// Delete the saved plate for a date
pub fn clear_plate(db: &Database, date: &str) -> Result<ClearPlateResponse, String> {
    validate_date(date)?;

    let removed = db
        .with_conn(|conn| SavedPlateItem::clear_for_date(conn, date))
        .map_err(|e| format!("Failed to clear plate: {}", e))?;

    Ok(ClearPlateResponse {
        date: date.to_string(),
        removed,
    })
}
