//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    // Create migrations table if it doesn't exist
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    // Get current version
    let current_version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    // Run migrations
    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- PROFILE
        -- Single-row user profile (body metrics, macro
        -- split, locks, weight goal)
        -- ============================================
        CREATE TABLE profile (
            id INTEGER PRIMARY KEY CHECK(id = 1),
            sex TEXT NOT NULL CHECK(sex IN ('male', 'female')),
            birth_date TEXT NOT NULL,            -- ISO date: "2003-09-14"
            height_in REAL NOT NULL,             -- inches
            weight_lb REAL NOT NULL,             -- pounds
            activity_level TEXT NOT NULL CHECK(activity_level IN
                ('sedentary', 'lightly_active', 'moderately_active', 'very_active', 'extra_active')),

            -- Macro percentage split, always sums to 100
            protein_pct INTEGER NOT NULL DEFAULT 30,
            carb_pct INTEGER NOT NULL DEFAULT 40,
            fat_pct INTEGER NOT NULL DEFAULT 30,
            -- Locked macros, comma-separated subset of protein,carb,fat (max 2)
            locked_macros TEXT NOT NULL DEFAULT '',

            -- Weight goal
            target_weight_lb REAL NOT NULL,
            rate_lb_per_week REAL NOT NULL DEFAULT 0,  -- non-negative magnitude

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- CATALOG ITEMS
        -- Menu items per (date, dining hall, meal period)
        -- ============================================
        CREATE TABLE catalog_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            menu_item_id TEXT NOT NULL,          -- stable id from the menu feed
            date TEXT NOT NULL,                  -- ISO date: "2025-01-09"
            dining_hall TEXT NOT NULL,
            meal_period TEXT NOT NULL CHECK(meal_period IN ('breakfast', 'lunch', 'dinner')),
            name TEXT NOT NULL,
            portion TEXT,                        -- e.g., "1 cup", "6 oz"
            tags TEXT,                           -- JSON array, e.g. ["vegan","halal"]
            allergens TEXT,                      -- JSON array

            -- Nutrient values per portion; NULL means unknown, distinct from 0
            calories REAL,
            protein REAL,                        -- grams
            carbs REAL,                          -- grams
            fat REAL,                            -- grams
            fiber REAL,                          -- grams
            sodium REAL,                         -- milligrams
            sugar REAL,                          -- grams
            saturated_fat REAL,                  -- grams
            cholesterol REAL,                    -- milligrams

            created_at TEXT NOT NULL DEFAULT (datetime('now')),

            UNIQUE(date, dining_hall, meal_period, menu_item_id)
        );

        CREATE INDEX idx_catalog_items_date ON catalog_items(date);
        CREATE INDEX idx_catalog_items_scope ON catalog_items(date, dining_hall, meal_period);
        CREATE INDEX idx_catalog_items_menu_id ON catalog_items(menu_item_id);

        -- ============================================
        -- PLATE ITEMS
        -- Saved plate entries per date; either a catalog
        -- reference or an inline custom entry
        -- ============================================
        CREATE TABLE plate_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,                  -- ISO date: "2025-01-09"
            menu_item_id TEXT,                   -- references a catalog feed id, or NULL for custom
            quantity REAL NOT NULL CHECK(quantity > 0),
            display_name TEXT,

            -- Inline custom nutrients; NULL means unknown, distinct from 0
            custom_calories REAL,
            custom_protein REAL,
            custom_carbs REAL,
            custom_fat REAL,
            custom_fiber REAL,
            custom_sodium REAL,
            custom_sugar REAL,
            custom_saturated_fat REAL,
            custom_cholesterol REAL,
            is_custom INTEGER NOT NULL DEFAULT 0,  -- boolean

            created_at TEXT NOT NULL DEFAULT (datetime('now')),

            -- Constraint: a catalog reference or a custom entry, never neither
            CHECK (menu_item_id IS NOT NULL OR is_custom = 1)
        );

        CREATE INDEX idx_plate_items_date ON plate_items(date);
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}
