//! Utility to set the user profile in the database

use std::path::PathBuf;

use plateful::models::ProfileSet;
use plateful::plan::{ActivityLevel, MacroSplit, Sex};

fn get_database_path() -> PathBuf {
    std::env::var("PLATEFUL_DATABASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(parent) = path.parent() {
                    if let Some(grandparent) = parent.parent() {
                        path = grandparent.to_path_buf();
                    }
                }
            }

            path.push("data");
            std::fs::create_dir_all(&path).ok();
            path.push("plateful.db");
            path
        })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let db_path = get_database_path();
    println!("Database path: {}", db_path.display());

    let database = plateful::db::Database::new(&db_path)?;

    // Run migrations
    database.with_conn(|conn| {
        plateful::db::migrations::run_migrations(conn)?;
        Ok(())
    })?;

    // Set the profile
    database.with_conn(|conn| {
        let profile = plateful::models::Profile::set(
            conn,
            &ProfileSet {
                sex: Sex::Female,
                birth_date: "2004-06-15".to_string(),
                height_in: 65.0,
                weight_lb: 140.0,
                activity_level: ActivityLevel::ModeratelyActive,
                macro_split: MacroSplit::default(),
                target_weight_lb: 130.0,
                rate_lb_per_week: 1.0,
            },
        )?;
        println!("Profile set:");
        println!("  Sex: {}", profile.sex.as_str());
        println!("  Birth date: {}", profile.birth_date);
        println!("  Activity: {}", profile.activity_level.as_str());
        println!("  Updated: {}", profile.updated_at);
        Ok(())
    })?;

    Ok(())
}
