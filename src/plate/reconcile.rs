//! Plate reconciliation
//!
//! Merges the persisted plate for a date against a freshly loaded catalog,
//! producing fully populated working entries. Catalog references that no
//! longer resolve are dropped: menus change between save and reload, so a
//! miss is expected lossy recovery, not an error.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{CatalogItem, MealPeriod, NutrientProfile, SavedPlateItem};

/// A fully populated working plate entry.
///
/// `entry_id` is session-local: fresh on every reconciliation, used only to
/// address the entry (e.g., for removal), never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlateEntry {
    pub entry_id: u64,
    /// Durable catalog id; None for custom entries
    pub menu_item_id: Option<String>,
    pub name: String,
    pub quantity: f64,
    pub nutrients: NutrientProfile,
    pub dining_hall: Option<String>,
    pub meal_period: Option<MealPeriod>,
    pub is_custom: bool,
}

/// Reconcile saved plate entries against the catalog for the same date.
///
/// The catalog must cover the whole date (all dining halls and meal periods),
/// not just a filtered view, so that references saved from any hall resolve.
/// Custom entries are self-contained and never consult the catalog.
pub fn reconcile(saved: &[SavedPlateItem], catalog: &[CatalogItem]) -> Vec<PlateEntry> {
    let by_menu_id: HashMap<&str, &CatalogItem> = catalog
        .iter()
        .map(|item| (item.menu_item_id.as_str(), item))
        .collect();

    let mut entries = Vec::with_capacity(saved.len());
    let mut next_id: u64 = 1;

    for item in saved {
        if item.is_custom {
            entries.push(PlateEntry {
                entry_id: next_id,
                menu_item_id: None,
                name: item
                    .display_name
                    .clone()
                    .unwrap_or_else(|| "Custom entry".to_string()),
                quantity: item.quantity,
                nutrients: item.custom_nutrients.clone(),
                dining_hall: None,
                meal_period: None,
                is_custom: true,
            });
            next_id += 1;
            continue;
        }

        let Some(menu_item_id) = item.menu_item_id.as_deref() else {
            // Neither a reference nor custom; schema forbids this, skip
            continue;
        };

        match by_menu_id.get(menu_item_id) {
            Some(catalog_item) => {
                entries.push(PlateEntry {
                    entry_id: next_id,
                    menu_item_id: Some(catalog_item.menu_item_id.clone()),
                    name: item
                        .display_name
                        .clone()
                        .unwrap_or_else(|| catalog_item.name.clone()),
                    quantity: item.quantity,
                    nutrients: catalog_item.nutrients.clone(),
                    dining_hall: Some(catalog_item.dining_hall.clone()),
                    meal_period: Some(catalog_item.meal_period),
                    is_custom: false,
                });
                next_id += 1;
            }
            None => {
                tracing::debug!(
                    "Dropping plate entry for '{}': no longer in the {} catalog",
                    menu_item_id,
                    item.date
                );
            }
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_item(menu_item_id: &str, name: &str, calories: f64) -> CatalogItem {
        CatalogItem {
            id: 0,
            menu_item_id: menu_item_id.to_string(),
            date: "2025-01-09".to_string(),
            dining_hall: "North Commons".to_string(),
            meal_period: MealPeriod::Lunch,
            name: name.to_string(),
            portion: Some("1 serving".to_string()),
            tags: Vec::new(),
            allergens: Vec::new(),
            nutrients: NutrientProfile {
                calories: Some(calories),
                ..Default::default()
            },
            created_at: String::new(),
        }
    }

    fn saved_reference(menu_item_id: &str, quantity: f64) -> SavedPlateItem {
        SavedPlateItem {
            id: 0,
            date: "2025-01-09".to_string(),
            menu_item_id: Some(menu_item_id.to_string()),
            quantity,
            display_name: None,
            custom_nutrients: NutrientProfile::unknown(),
            is_custom: false,
            created_at: String::new(),
        }
    }

    fn saved_custom(name: &str, calories: f64, quantity: f64) -> SavedPlateItem {
        SavedPlateItem {
            id: 0,
            date: "2025-01-09".to_string(),
            menu_item_id: None,
            quantity,
            display_name: Some(name.to_string()),
            custom_nutrients: NutrientProfile {
                calories: Some(calories),
                ..Default::default()
            },
            is_custom: true,
            created_at: String::new(),
        }
    }

    #[test]
    fn test_reconcile_resolves_catalog_reference() {
        let catalog = vec![catalog_item("m-101", "Grilled Chicken", 165.0)];
        let saved = vec![saved_reference("m-101", 2.0)];

        let entries = reconcile(&saved, &catalog);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Grilled Chicken");
        assert_eq!(entries[0].quantity, 2.0);
        assert_eq!(entries[0].nutrients.calories, Some(165.0));
        assert!(!entries[0].is_custom);
    }

    #[test]
    fn test_reconcile_drops_missing_reference() {
        let catalog = vec![catalog_item("m-101", "Grilled Chicken", 165.0)];
        let saved = vec![
            saved_reference("m-101", 1.0),
            saved_reference("m-999", 1.0), // rotated off the menu
        ];

        let entries = reconcile(&saved, &catalog);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].menu_item_id.as_deref(), Some("m-101"));
    }

    #[test]
    fn test_reconcile_custom_never_dropped() {
        // Empty catalog: the custom entry survives untouched
        let saved = vec![saved_custom("Protein shake", 150.0, 1.0)];

        let entries = reconcile(&saved, &[]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Protein shake");
        assert_eq!(entries[0].nutrients.calories, Some(150.0));
        assert!(entries[0].is_custom);
        assert!(entries[0].menu_item_id.is_none());
    }

    #[test]
    fn test_reconcile_all_misses_is_empty_plate() {
        let saved = vec![saved_reference("m-1", 1.0), saved_reference("m-2", 1.0)];
        let entries = reconcile(&saved, &[]);
        assert!(entries.is_empty());
    }

    #[test]
    fn test_reconcile_assigns_fresh_session_ids() {
        let catalog = vec![
            catalog_item("m-1", "Oatmeal", 150.0),
            catalog_item("m-2", "Scrambled Eggs", 180.0),
        ];
        let saved = vec![
            saved_reference("m-1", 1.0),
            saved_custom("Protein shake", 150.0, 1.0),
            saved_reference("m-2", 1.0),
        ];

        let entries = reconcile(&saved, &catalog);
        let ids: Vec<u64> = entries.iter().map(|e| e.entry_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_reconcile_keeps_saved_display_name() {
        let catalog = vec![catalog_item("m-1", "Oatmeal", 150.0)];
        let mut saved = saved_reference("m-1", 1.0);
        saved.display_name = Some("Morning oats".to_string());

        let entries = reconcile(&[saved], &catalog);
        assert_eq!(entries[0].name, "Morning oats");
    }
}
