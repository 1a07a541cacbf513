//! Shared nutrient data structure
//!
//! Used across catalog items, plate items, and reconciled plate entries.

use serde::{Deserialize, Serialize};

/// Energy density of one gram of protein, in kilocalories
pub const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
/// Energy density of one gram of carbohydrate, in kilocalories
pub const KCAL_PER_GRAM_CARBS: f64 = 4.0;
/// Energy density of one gram of fat, in kilocalories
pub const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Nutrient values for one portion of a food.
///
/// Every field is optional: `None` means the source did not report the value,
/// which is not the same as reporting 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientProfile {
    pub calories: Option<f64>,
    pub protein: Option<f64>,       // grams
    pub carbs: Option<f64>,         // grams
    pub fat: Option<f64>,           // grams
    pub fiber: Option<f64>,         // grams
    pub sodium: Option<f64>,        // milligrams
    pub sugar: Option<f64>,         // grams
    pub saturated_fat: Option<f64>, // grams
    pub cholesterol: Option<f64>,   // milligrams
}

impl NutrientProfile {
    /// A profile with no known values
    pub fn unknown() -> Self {
        Self::default()
    }

    /// True if no field carries a value
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Scale all present values by a multiplier, leaving absent values absent
    pub fn scale(&self, multiplier: f64) -> Self {
        Self {
            calories: self.calories.map(|v| v * multiplier),
            protein: self.protein.map(|v| v * multiplier),
            carbs: self.carbs.map(|v| v * multiplier),
            fat: self.fat.map(|v| v * multiplier),
            fiber: self.fiber.map(|v| v * multiplier),
            sodium: self.sodium.map(|v| v * multiplier),
            sugar: self.sugar.map(|v| v * multiplier),
            saturated_fat: self.saturated_fat.map(|v| v * multiplier),
            cholesterol: self.cholesterol.map(|v| v * multiplier),
        }
    }

    /// Energy implied by the macro grams (protein and carbs at 4 kcal/g, fat
    /// at 9 kcal/g), independent of the stated `calories` value.
    ///
    /// Returns `None` when no macro value is present at all.
    pub fn energy_from_macros(&self) -> Option<f64> {
        if self.protein.is_none() && self.carbs.is_none() && self.fat.is_none() {
            return None;
        }
        let protein = self.protein.unwrap_or(0.0) * KCAL_PER_GRAM_PROTEIN;
        let carbs = self.carbs.unwrap_or(0.0) * KCAL_PER_GRAM_CARBS;
        let fat = self.fat.unwrap_or(0.0) * KCAL_PER_GRAM_FAT;
        Some(protein + carbs + fat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_preserves_absence() {
        let profile = NutrientProfile {
            calories: Some(200.0),
            protein: Some(10.0),
            ..Default::default()
        };

        let scaled = profile.scale(2.0);
        assert_eq!(scaled.calories, Some(400.0));
        assert_eq!(scaled.protein, Some(20.0));
        assert_eq!(scaled.carbs, None);
        assert_eq!(scaled.fat, None);
    }

    #[test]
    fn test_energy_from_macros() {
        let profile = NutrientProfile {
            protein: Some(10.0),
            carbs: Some(20.0),
            fat: Some(5.0),
            ..Default::default()
        };

        // 10*4 + 20*4 + 5*9 = 165
        assert_eq!(profile.energy_from_macros(), Some(165.0));
    }

    #[test]
    fn test_energy_from_macros_all_absent() {
        let profile = NutrientProfile {
            calories: Some(120.0),
            ..Default::default()
        };
        assert_eq!(profile.energy_from_macros(), None);
    }
}
