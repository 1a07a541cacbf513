//! Macro ratio solver
//!
//! Re-balances the protein/carb/fat percentage split when one share changes,
//! honoring user-imposed locks. The split always sums to exactly 100.

use serde::{Deserialize, Serialize};

/// One of the three tracked macro nutrients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MacroNutrient {
    Protein,
    Carb,
    Fat,
}

impl MacroNutrient {
    pub const ALL: [MacroNutrient; 3] =
        [MacroNutrient::Protein, MacroNutrient::Carb, MacroNutrient::Fat];

    pub fn as_str(&self) -> &'static str {
        match self {
            MacroNutrient::Protein => "protein",
            MacroNutrient::Carb => "carb",
            MacroNutrient::Fat => "fat",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "protein" => Some(MacroNutrient::Protein),
            "carb" | "carbs" | "carbohydrate" => Some(MacroNutrient::Carb),
            "fat" => Some(MacroNutrient::Fat),
            _ => None,
        }
    }
}

/// Percentage shares of daily energy per macro. Invariant: sums to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroSplit {
    pub protein: i64,
    pub carb: i64,
    pub fat: i64,
}

impl MacroSplit {
    pub fn new(protein: i64, carb: i64, fat: i64) -> Self {
        Self { protein, carb, fat }
    }

    pub fn get(&self, m: MacroNutrient) -> i64 {
        match m {
            MacroNutrient::Protein => self.protein,
            MacroNutrient::Carb => self.carb,
            MacroNutrient::Fat => self.fat,
        }
    }

    pub fn set(&mut self, m: MacroNutrient, value: i64) {
        match m {
            MacroNutrient::Protein => self.protein = value,
            MacroNutrient::Carb => self.carb = value,
            MacroNutrient::Fat => self.fat = value,
        }
    }

    pub fn sum(&self) -> i64 {
        self.protein + self.carb + self.fat
    }
}

impl Default for MacroSplit {
    fn default() -> Self {
        Self { protein: 30, carb: 40, fat: 30 }
    }
}

/// User-designated locked macros. Invariant: at most two locks, since three
/// would leave the solver nothing to adjust.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockSet {
    protein: bool,
    carb: bool,
    fat: bool,
}

impl LockSet {
    pub fn contains(&self, m: MacroNutrient) -> bool {
        match m {
            MacroNutrient::Protein => self.protein,
            MacroNutrient::Carb => self.carb,
            MacroNutrient::Fat => self.fat,
        }
    }

    pub fn len(&self) -> usize {
        [self.protein, self.carb, self.fat]
            .iter()
            .filter(|&&locked| locked)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lock a macro. Returns false (and leaves the set unchanged) when two
    /// others are already locked.
    pub fn lock(&mut self, m: MacroNutrient) -> bool {
        if self.contains(m) {
            return true;
        }
        if self.len() >= 2 {
            return false;
        }
        match m {
            MacroNutrient::Protein => self.protein = true,
            MacroNutrient::Carb => self.carb = true,
            MacroNutrient::Fat => self.fat = true,
        }
        true
    }

    /// Unlock a macro. Returns true if it was locked.
    pub fn unlock(&mut self, m: MacroNutrient) -> bool {
        let was_locked = self.contains(m);
        match m {
            MacroNutrient::Protein => self.protein = false,
            MacroNutrient::Carb => self.carb = false,
            MacroNutrient::Fat => self.fat = false,
        }
        was_locked
    }

    /// Iterate the locked macros
    pub fn iter(&self) -> impl Iterator<Item = MacroNutrient> + '_ {
        MacroNutrient::ALL.into_iter().filter(|m| self.contains(*m))
    }
}

/// Resolve a new consistent split after one share is edited.
///
/// Locked shares keep their current value. The edited share takes the new
/// value (clamped so the locked total plus the edit never exceeds 100) and
/// the remaining unlocked shares absorb `100 - locked - value`, split in
/// proportion to their previous weights. An edit to a locked share is inert.
pub fn resolve(
    current: &MacroSplit,
    changed: MacroNutrient,
    new_value: i64,
    locks: &LockSet,
) -> MacroSplit {
    if locks.contains(changed) {
        return *current;
    }

    let locked_sum: i64 = locks.iter().map(|m| current.get(m)).sum();

    let absorbers: Vec<MacroNutrient> = MacroNutrient::ALL
        .into_iter()
        .filter(|m| *m != changed && !locks.contains(*m))
        .collect();

    let mut result = *current;

    if absorbers.is_empty() {
        // Two locks: the third share is fully determined, the edit is ignored
        result.set(changed, 100 - locked_sum);
        return result;
    }

    let value = new_value.clamp(0, 100).min(100 - locked_sum);
    let remainder = 100 - locked_sum - value;
    result.set(changed, value);

    match absorbers.as_slice() {
        [only] => {
            result.set(*only, remainder);
        }
        [a, b] => {
            let weight_a = current.get(*a);
            let weight_b = current.get(*b);
            let total = weight_a + weight_b;

            let (shares_a, shares_b) = if total == 0 {
                // Proportion is undefined at zero: split evenly
                let half = remainder / 2;
                (half, remainder - half)
            } else {
                // Round the smaller absorber, give the rounding remainder to
                // the larger so the sum stays exact
                if weight_a >= weight_b {
                    let small = proportional_share(remainder, weight_b, total);
                    (remainder - small, small)
                } else {
                    let small = proportional_share(remainder, weight_a, total);
                    (small, remainder - small)
                }
            };

            result.set(*a, shares_a);
            result.set(*b, shares_b);
        }
        _ => unreachable!("at most two unlocked non-changed shares"),
    }

    result
}

fn proportional_share(remainder: i64, weight: i64, total_weight: i64) -> i64 {
    ((remainder as f64) * (weight as f64) / (total_weight as f64)).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_sums_to_100() {
        let cases = [
            (MacroSplit::new(30, 40, 30), MacroNutrient::Protein, 55),
            (MacroSplit::new(10, 80, 10), MacroNutrient::Carb, 15),
            (MacroSplit::new(33, 34, 33), MacroNutrient::Fat, 0),
            (MacroSplit::new(0, 100, 0), MacroNutrient::Protein, 100),
            (MacroSplit::new(25, 50, 25), MacroNutrient::Carb, 51),
        ];

        for (current, changed, value) in cases {
            let resolved = resolve(&current, changed, value, &LockSet::default());
            assert_eq!(resolved.sum(), 100, "case {:?} -> {:?}", current, resolved);
        }
    }

    #[test]
    fn test_resolve_locked_protein_carb_edit() {
        // Lock protein at 30, set carb to 50: fat absorbs down to 20
        let current = MacroSplit::new(30, 40, 30);
        let mut locks = LockSet::default();
        assert!(locks.lock(MacroNutrient::Protein));

        let resolved = resolve(&current, MacroNutrient::Carb, 50, &locks);
        assert_eq!(resolved, MacroSplit::new(30, 50, 20));
    }

    #[test]
    fn test_resolve_edit_to_locked_share_is_inert() {
        let current = MacroSplit::new(30, 40, 30);
        let mut locks = LockSet::default();
        locks.lock(MacroNutrient::Carb);

        let resolved = resolve(&current, MacroNutrient::Carb, 70, &locks);
        assert_eq!(resolved, current);
    }

    #[test]
    fn test_resolve_two_locks_determine_third() {
        // Carb and fat locked at 40 + 30: protein is 30 no matter the edit
        let current = MacroSplit::new(30, 40, 30);
        let mut locks = LockSet::default();
        locks.lock(MacroNutrient::Carb);
        locks.lock(MacroNutrient::Fat);

        let resolved = resolve(&current, MacroNutrient::Protein, 90, &locks);
        assert_eq!(resolved, MacroSplit::new(30, 40, 30));

        let resolved = resolve(&current, MacroNutrient::Protein, 5, &locks);
        assert_eq!(resolved, MacroSplit::new(30, 40, 30));
    }

    #[test]
    fn test_resolve_proportional_absorption() {
        // No locks: protein to 50, carb/fat (40/30) absorb 50 proportionally.
        // Fat is the smaller absorber: round(50 * 30/70) = 21, carb gets 29.
        let current = MacroSplit::new(30, 40, 30);
        let resolved = resolve(&current, MacroNutrient::Protein, 50, &LockSet::default());
        assert_eq!(resolved, MacroSplit::new(50, 29, 21));
        assert_eq!(resolved.sum(), 100);
    }

    #[test]
    fn test_resolve_zero_absorbers_split_evenly() {
        // Both absorbers at zero: proportion undefined, split evenly
        let current = MacroSplit::new(100, 0, 0);
        let resolved = resolve(&current, MacroNutrient::Protein, 40, &LockSet::default());
        assert_eq!(resolved, MacroSplit::new(40, 30, 30));
    }

    #[test]
    fn test_resolve_clamps_new_value() {
        let current = MacroSplit::new(30, 40, 30);
        let resolved = resolve(&current, MacroNutrient::Carb, 150, &LockSet::default());
        assert_eq!(resolved.carb, 100);
        assert_eq!(resolved.sum(), 100);

        let resolved = resolve(&current, MacroNutrient::Carb, -10, &LockSet::default());
        assert_eq!(resolved.carb, 0);
        assert_eq!(resolved.sum(), 100);
    }

    #[test]
    fn test_resolve_clamp_respects_lock() {
        // Protein locked at 30: carb cannot exceed 70
        let current = MacroSplit::new(30, 40, 30);
        let mut locks = LockSet::default();
        locks.lock(MacroNutrient::Protein);

        let resolved = resolve(&current, MacroNutrient::Carb, 90, &locks);
        assert_eq!(resolved, MacroSplit::new(30, 70, 0));
    }

    #[test]
    fn test_lock_set_refuses_third_lock() {
        let mut locks = LockSet::default();
        assert!(locks.lock(MacroNutrient::Protein));
        assert!(locks.lock(MacroNutrient::Carb));
        assert!(!locks.lock(MacroNutrient::Fat));
        assert_eq!(locks.len(), 2);
        assert!(!locks.contains(MacroNutrient::Fat));
    }

    #[test]
    fn test_lock_set_relock_and_unlock() {
        let mut locks = LockSet::default();
        locks.lock(MacroNutrient::Protein);
        // Re-locking an already locked macro is a no-op success
        assert!(locks.lock(MacroNutrient::Protein));
        assert_eq!(locks.len(), 1);

        assert!(locks.unlock(MacroNutrient::Protein));
        assert!(locks.is_empty());
        assert!(!locks.unlock(MacroNutrient::Protein));
    }
}
