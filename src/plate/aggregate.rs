//! Plate aggregation
//!
//! Sums nutrient fields across plate entries, weighted by quantity. Absent
//! values sum as zero; the per-item absent-vs-zero distinction stays on the
//! entries themselves.

use serde::{Deserialize, Serialize};

use crate::models::nutrition::{KCAL_PER_GRAM_CARBS, KCAL_PER_GRAM_FAT, KCAL_PER_GRAM_PROTEIN};
use super::PlateEntry;

/// Fully populated nutrient totals for a plate.
///
/// `calories` is the direct sum of stated calorie values; `calories_from_macros`
/// is derived from the summed macro grams. Source data does not always agree
/// with its own macros, so both figures are kept and never reconciled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlateTotals {
    pub calories: f64,
    pub protein: f64,       // grams
    pub carbs: f64,         // grams
    pub fat: f64,           // grams
    pub fiber: f64,         // grams
    pub sodium: f64,        // milligrams
    pub sugar: f64,         // grams
    pub saturated_fat: f64, // grams
    pub cholesterol: f64,   // milligrams
    pub calories_from_macros: f64,
}

/// Sum nutrient totals across plate entries.
///
/// Per field: sum of (value, or 0 when absent) x quantity. The output is
/// always fully populated; an empty plate yields all-zero totals.
pub fn aggregate(entries: &[PlateEntry]) -> PlateTotals {
    let mut totals = PlateTotals::default();

    for entry in entries {
        let n = &entry.nutrients;
        let qty = entry.quantity;

        totals.calories += n.calories.unwrap_or(0.0) * qty;
        totals.protein += n.protein.unwrap_or(0.0) * qty;
        totals.carbs += n.carbs.unwrap_or(0.0) * qty;
        totals.fat += n.fat.unwrap_or(0.0) * qty;
        totals.fiber += n.fiber.unwrap_or(0.0) * qty;
        totals.sodium += n.sodium.unwrap_or(0.0) * qty;
        totals.sugar += n.sugar.unwrap_or(0.0) * qty;
        totals.saturated_fat += n.saturated_fat.unwrap_or(0.0) * qty;
        totals.cholesterol += n.cholesterol.unwrap_or(0.0) * qty;
    }

    totals.calories_from_macros = totals.protein * KCAL_PER_GRAM_PROTEIN
        + totals.carbs * KCAL_PER_GRAM_CARBS
        + totals.fat * KCAL_PER_GRAM_FAT;

    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NutrientProfile;

    fn entry(nutrients: NutrientProfile, quantity: f64) -> PlateEntry {
        PlateEntry {
            entry_id: 1,
            menu_item_id: None,
            name: "test".to_string(),
            quantity,
            nutrients,
            dining_hall: None,
            meal_period: None,
            is_custom: true,
        }
    }

    #[test]
    fn test_aggregate_empty_is_all_zero() {
        assert_eq!(aggregate(&[]), PlateTotals::default());
    }

    #[test]
    fn test_aggregate_catalog_plus_custom() {
        // One catalog-style entry (200 kcal x 2) and one custom (150 kcal x 1)
        let entries = vec![
            entry(
                NutrientProfile { calories: Some(200.0), ..Default::default() },
                2.0,
            ),
            entry(
                NutrientProfile { calories: Some(150.0), ..Default::default() },
                1.0,
            ),
        ];

        let totals = aggregate(&entries);
        assert_eq!(totals.calories, 550.0);
    }

    #[test]
    fn test_aggregate_absent_sums_as_zero() {
        let entries = vec![
            entry(
                NutrientProfile {
                    calories: Some(100.0),
                    protein: Some(5.0),
                    ..Default::default()
                },
                1.0,
            ),
            // No values at all: contributes nothing, drops nothing
            entry(NutrientProfile::unknown(), 3.0),
        ];

        let totals = aggregate(&entries);
        assert_eq!(totals.calories, 100.0);
        assert_eq!(totals.protein, 5.0);
        assert_eq!(totals.carbs, 0.0);
    }

    #[test]
    fn test_aggregate_linear_in_quantity() {
        let base = vec![
            entry(
                NutrientProfile {
                    calories: Some(120.0),
                    protein: Some(8.0),
                    carbs: Some(15.0),
                    fat: Some(3.0),
                    sodium: Some(200.0),
                    ..Default::default()
                },
                1.5,
            ),
            entry(
                NutrientProfile {
                    calories: Some(90.0),
                    fat: Some(7.0),
                    ..Default::default()
                },
                2.0,
            ),
        ];

        let doubled: Vec<PlateEntry> = base
            .iter()
            .cloned()
            .map(|mut e| {
                e.quantity *= 2.0;
                e
            })
            .collect();

        let totals = aggregate(&base);
        let totals2 = aggregate(&doubled);

        assert!((totals2.calories - totals.calories * 2.0).abs() < 1e-9);
        assert!((totals2.protein - totals.protein * 2.0).abs() < 1e-9);
        assert!((totals2.carbs - totals.carbs * 2.0).abs() < 1e-9);
        assert!((totals2.fat - totals.fat * 2.0).abs() < 1e-9);
        assert!((totals2.sodium - totals.sodium * 2.0).abs() < 1e-9);
        assert!((totals2.calories_from_macros - totals.calories_from_macros * 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_macro_derived_calories_kept_separate() {
        // Stated calories disagree with the macros: both figures survive
        let entries = vec![entry(
            NutrientProfile {
                calories: Some(500.0),
                protein: Some(10.0),
                carbs: Some(20.0),
                fat: Some(10.0),
                ..Default::default()
            },
            1.0,
        )];

        let totals = aggregate(&entries);
        assert_eq!(totals.calories, 500.0);
        // 10*4 + 20*4 + 10*9 = 210
        assert_eq!(totals.calories_from_macros, 210.0);
    }
}
