//! Profile model
//!
//! Single-row user profile: body metrics, activity level, macro split with
//! locks, and the weight goal. Stored as one upserted row.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use crate::plan::{ActivityLevel, LockSet, MacroNutrient, MacroSplit, Sex};

/// The user profile (single row table)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub sex: Sex,
    pub birth_date: String, // ISO date: "2003-09-14"
    pub height_in: f64,
    pub weight_lb: f64,
    pub activity_level: ActivityLevel,
    pub macro_split: MacroSplit,
    pub locked_macros: LockSet,
    pub target_weight_lb: f64,
    pub rate_lb_per_week: f64,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for a replace-style profile update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSet {
    pub sex: Sex,
    pub birth_date: String,
    pub height_in: f64,
    pub weight_lb: f64,
    pub activity_level: ActivityLevel,
    #[serde(default)]
    pub macro_split: MacroSplit,
    pub target_weight_lb: f64,
    #[serde(default)]
    pub rate_lb_per_week: f64,
}

impl Profile {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let sex_str: String = row.get("sex")?;
        let activity_str: String = row.get("activity_level")?;
        let locked_str: String = row.get("locked_macros")?;

        Ok(Self {
            id: row.get("id")?,
            sex: Sex::from_str(&sex_str).unwrap_or(Sex::Female),
            birth_date: row.get("birth_date")?,
            height_in: row.get("height_in")?,
            weight_lb: row.get("weight_lb")?,
            activity_level: ActivityLevel::from_str(&activity_str)
                .unwrap_or(ActivityLevel::LightlyActive),
            macro_split: MacroSplit {
                protein: row.get("protein_pct")?,
                carb: row.get("carb_pct")?,
                fat: row.get("fat_pct")?,
            },
            locked_macros: decode_locks(&locked_str),
            target_weight_lb: row.get("target_weight_lb")?,
            rate_lb_per_week: row.get("rate_lb_per_week")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Get the profile (single row table)
    pub fn get(conn: &Connection) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM profile WHERE id = 1")?;

        let result = stmt.query_row([], Self::from_row);
        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set or replace the profile (upsert)
    pub fn set(conn: &Connection, data: &ProfileSet) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO profile (
                id, sex, birth_date, height_in, weight_lb, activity_level,
                protein_pct, carb_pct, fat_pct,
                target_weight_lb, rate_lb_per_week
            )
            VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT(id) DO UPDATE SET
                sex = excluded.sex,
                birth_date = excluded.birth_date,
                height_in = excluded.height_in,
                weight_lb = excluded.weight_lb,
                activity_level = excluded.activity_level,
                protein_pct = excluded.protein_pct,
                carb_pct = excluded.carb_pct,
                fat_pct = excluded.fat_pct,
                target_weight_lb = excluded.target_weight_lb,
                rate_lb_per_week = excluded.rate_lb_per_week,
                updated_at = datetime('now')
            "#,
            params![
                data.sex.as_str(),
                data.birth_date,
                data.height_in,
                data.weight_lb,
                data.activity_level.as_str(),
                data.macro_split.protein,
                data.macro_split.carb,
                data.macro_split.fat,
                data.target_weight_lb,
                data.rate_lb_per_week,
            ],
        )?;

        Self::get(conn)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Persist a new macro split and lock set
    pub fn update_macro_state(
        conn: &Connection,
        split: MacroSplit,
        locks: LockSet,
    ) -> DbResult<()> {
        conn.execute(
            r#"
            UPDATE profile SET
                protein_pct = ?1,
                carb_pct = ?2,
                fat_pct = ?3,
                locked_macros = ?4,
                updated_at = datetime('now')
            WHERE id = 1
            "#,
            params![split.protein, split.carb, split.fat, encode_locks(&locks)],
        )?;
        Ok(())
    }
}

/// Encode a lock set as a comma-separated column value
pub fn encode_locks(locks: &LockSet) -> String {
    locks
        .iter()
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// Decode a comma-separated column value into a lock set
pub fn decode_locks(s: &str) -> LockSet {
    let mut locks = LockSet::default();
    for part in s.split(',') {
        if let Some(m) = MacroNutrient::from_str(part.trim()) {
            locks.lock(m);
        }
    }
    locks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_encoding_round_trip() {
        let mut locks = LockSet::default();
        locks.lock(MacroNutrient::Protein);
        locks.lock(MacroNutrient::Fat);

        let encoded = encode_locks(&locks);
        assert_eq!(encoded, "protein,fat");
        assert_eq!(decode_locks(&encoded), locks);
    }

    #[test]
    fn test_decode_locks_empty_and_garbage() {
        assert!(decode_locks("").is_empty());
        assert!(decode_locks("fiber,unknown").is_empty());
    }
}
