//! Profile and target tools
//!
//! Profile management, macro split editing under locks, and the derived
//! daily energy target. All input validation happens here, before the pure
//! calculators run.

use chrono::NaiveDate;
use serde::Serialize;

use crate::db::Database;
use crate::models::{Profile, ProfileSet};
use crate::plan::{
    self, ActivityLevel, BodyMetrics, GoalEta, LockSet, MacroNutrient, MacroSplit, WeightGoal,
};

/// Response for set_macro_target
#[derive(Debug, Serialize)]
pub struct MacroSplitResponse {
    pub protein_pct: i64,
    pub carb_pct: i64,
    pub fat_pct: i64,
    pub locked: Vec<String>,
    /// False when the edit targeted a locked share and was ignored
    pub changed: bool,
}

/// Response for lock_macro / unlock_macro
#[derive(Debug, Serialize)]
pub struct LockResponse {
    pub accepted: bool,
    pub locked: Vec<String>,
    pub message: String,
}

/// Response for get_energy_target
#[derive(Debug, Serialize)]
pub struct EnergyTargetResponse {
    pub maintenance_calories: i64,
    pub daily_target_calories: i64,
    pub daily_delta_calories: i64,
    pub direction: String,
    pub rate_lb_per_week: f64,
    pub estimated_time_to_goal: GoalEta,
}

/// Get the current profile, if one has been set
pub fn get_profile(db: &Database) -> Result<Option<Profile>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    Profile::get(&conn).map_err(|e| format!("Failed to get profile: {}", e))
}

/// Replace the profile after validating every field
pub fn set_profile(db: &Database, data: ProfileSet) -> Result<Profile, String> {
    validate_profile(&data)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    Profile::set(&conn, &data).map_err(|e| format!("Failed to set profile: {}", e))
}

fn validate_profile(data: &ProfileSet) -> Result<(), String> {
    let birth_date = NaiveDate::parse_from_str(&data.birth_date, "%Y-%m-%d")
        .map_err(|_| format!("Invalid birth_date '{}': expected YYYY-MM-DD", data.birth_date))?;
    if birth_date >= today() {
        return Err("birth_date must be in the past".to_string());
    }

    if !(data.height_in > 0.0) {
        return Err("height_in must be positive".to_string());
    }
    if !(data.weight_lb > 0.0) {
        return Err("weight_lb must be positive".to_string());
    }
    if !(data.target_weight_lb > 0.0) {
        return Err("target_weight_lb must be positive".to_string());
    }
    if data.rate_lb_per_week < 0.0 {
        return Err("rate_lb_per_week must not be negative".to_string());
    }

    let split = &data.macro_split;
    for (name, pct) in [
        ("protein", split.protein),
        ("carb", split.carb),
        ("fat", split.fat),
    ] {
        if !(0..=100).contains(&pct) {
            return Err(format!("{} percentage must be between 0 and 100", name));
        }
    }
    if split.sum() != 100 {
        return Err(format!(
            "macro percentages must sum to 100 (got {})",
            split.sum()
        ));
    }

    Ok(())
}

/// Set one macro share; the others re-balance around the locks
pub fn set_macro_target(
    db: &Database,
    macro_name: &str,
    value: i64,
) -> Result<MacroSplitResponse, String> {
    let changed = MacroNutrient::from_str(macro_name)
        .ok_or_else(|| format!("Unknown macro '{}': expected protein, carb, or fat", macro_name))?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let profile = Profile::get(&conn)
        .map_err(|e| format!("Failed to get profile: {}", e))?
        .ok_or_else(|| "No profile set; call set_profile first".to_string())?;

    let resolved = plan::resolve(&profile.macro_split, changed, value, &profile.locked_macros);
    let did_change = resolved != profile.macro_split;

    if did_change {
        Profile::update_macro_state(&conn, resolved, profile.locked_macros)
            .map_err(|e| format!("Failed to update macro split: {}", e))?;
    }

    Ok(macro_split_response(resolved, &profile.locked_macros, did_change))
}

/// Lock a macro share so edits to the others cannot move it.
/// Locking a third share is refused and reported as a no-op.
pub fn lock_macro(db: &Database, macro_name: &str) -> Result<LockResponse, String> {
    let target = MacroNutrient::from_str(macro_name)
        .ok_or_else(|| format!("Unknown macro '{}': expected protein, carb, or fat", macro_name))?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let profile = Profile::get(&conn)
        .map_err(|e| format!("Failed to get profile: {}", e))?
        .ok_or_else(|| "No profile set; call set_profile first".to_string())?;

    let mut locks = profile.locked_macros;
    let accepted = locks.lock(target);

    if accepted {
        Profile::update_macro_state(&conn, profile.macro_split, locks)
            .map_err(|e| format!("Failed to update locks: {}", e))?;
    }

    let message = if accepted {
        format!("{} locked", target.as_str())
    } else {
        "Refused: two shares are already locked; a third lock would leave nothing to adjust"
            .to_string()
    };

    Ok(LockResponse {
        accepted,
        locked: lock_names(&locks),
        message,
    })
}

/// Unlock a macro share
pub fn unlock_macro(db: &Database, macro_name: &str) -> Result<LockResponse, String> {
    let target = MacroNutrient::from_str(macro_name)
        .ok_or_else(|| format!("Unknown macro '{}': expected protein, carb, or fat", macro_name))?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let profile = Profile::get(&conn)
        .map_err(|e| format!("Failed to get profile: {}", e))?
        .ok_or_else(|| "No profile set; call set_profile first".to_string())?;

    let mut locks = profile.locked_macros;
    let was_locked = locks.unlock(target);

    if was_locked {
        Profile::update_macro_state(&conn, profile.macro_split, locks)
            .map_err(|e| format!("Failed to update locks: {}", e))?;
    }

    let message = if was_locked {
        format!("{} unlocked", target.as_str())
    } else {
        format!("{} was not locked", target.as_str())
    };

    Ok(LockResponse {
        accepted: was_locked,
        locked: lock_names(&locks),
        message,
    })
}

/// Compute the daily energy target from the stored profile
pub fn get_energy_target(db: &Database) -> Result<EnergyTargetResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let profile = Profile::get(&conn)
        .map_err(|e| format!("Failed to get profile: {}", e))?
        .ok_or_else(|| "No profile set; call set_profile first".to_string())?;

    energy_target_for(&profile)
}

/// Pure assembly of the energy target response from a profile record
pub fn energy_target_for(profile: &Profile) -> Result<EnergyTargetResponse, String> {
    let birth_date = NaiveDate::parse_from_str(&profile.birth_date, "%Y-%m-%d")
        .map_err(|_| format!("Stored birth_date '{}' is not a date", profile.birth_date))?;

    let metrics = BodyMetrics {
        sex: profile.sex,
        age_years: plan::age_on(birth_date, today()),
        height_in: profile.height_in,
        weight_lb: profile.weight_lb,
    };
    let goal = WeightGoal {
        current_weight_lb: profile.weight_lb,
        target_weight_lb: profile.target_weight_lb,
        rate_lb_per_week: profile.rate_lb_per_week,
    };

    let maintenance = plan::maintenance_calories(&metrics, profile.activity_level);
    let target = plan::daily_target(&metrics, profile.activity_level, &goal);

    Ok(EnergyTargetResponse {
        maintenance_calories: maintenance.round() as i64,
        daily_target_calories: target,
        daily_delta_calories: plan::daily_delta(&goal).round() as i64,
        direction: goal.direction().as_str().to_string(),
        rate_lb_per_week: goal.rate_lb_per_week,
        estimated_time_to_goal: plan::time_to_goal(&goal),
    })
}

/// Map an activity level string, rejecting unknown codes
pub fn parse_activity_level(s: &str) -> Result<ActivityLevel, String> {
    ActivityLevel::from_str(s).ok_or_else(|| {
        format!(
            "Unknown activity_level '{}': expected sedentary, lightly_active, \
             moderately_active, very_active, or extra_active",
            s
        )
    })
}

fn macro_split_response(split: MacroSplit, locks: &LockSet, changed: bool) -> MacroSplitResponse {
    MacroSplitResponse {
        protein_pct: split.protein,
        carb_pct: split.carb,
        fat_pct: split.fat,
        locked: lock_names(locks),
        changed,
    }
}

fn lock_names(locks: &LockSet) -> Vec<String> {
    locks.iter().map(|m| m.as_str().to_string()).collect()
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
