//! Plateful status tool
//!
//! Provides runtime status information about the Plateful service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Plate tracking instructions for AI assistants
pub const PLATE_INSTRUCTIONS: &str = r#"
# Plateful Instructions

This guide explains how to track dining hall meals with the Plateful tools.

## Overview

Plateful works with three kinds of data:
1. **Profile** - Body metrics, activity level, macro split, and weight goal
2. **Catalog** - Menu items imported per (date, dining hall, meal period)
3. **Plate** - The saved list of what the user put on their plate for a date

## Setting Up the Profile

Call `set_profile` once with the full record (it replaces the stored row):

```
set_profile(
  sex: "female",
  birth_date: "2004-06-15",
  height_in: 65,
  weight_lb: 140,
  activity_level: "moderately_active",
  target_weight_lb: 130,
  rate_lb_per_week: 1.0
)
```

- `activity_level` is one of: sedentary, lightly_active, moderately_active,
  very_active, extra_active
- `rate_lb_per_week` is a magnitude and must not be negative; whether it is
  a surplus or deficit follows from target vs current weight
- Targets within 1 lb of the current weight count as maintaining

Then `get_energy_target` returns maintenance calories, the daily target, the
goal direction, and the estimated time to goal.

## Macro Split and Locks

The profile carries a protein/carb/fat percentage split that always sums
to 100.

- `set_macro_target(macro: "carb", value: 50)` - set one share; the unlocked
  remaining shares re-balance proportionally
- `lock_macro(macro: "protein")` - hold a share fixed while editing others
- At most two shares can be locked; a third lock request is refused and
  nothing changes
- Editing a locked share does nothing (`changed: false` in the response)

## Importing Menus

Import replaces the whole (date, hall, meal period) scope:

```
import_menu(
  date: "2025-01-09",
  dining_hall: "North Commons",
  meal_period: "lunch",
  items: [
    {
      menu_item_id: "nc-4212",
      name: "Grilled Chicken Breast",
      portion: "4 oz",
      tags: ["gluten-free"],
      allergens: [],
      nutrients: { calories: 165, protein: 31, carbs: 0, fat: 3.6 }
    }
  ]
)
```

Nutrient fields may be omitted when the feed does not report them; omitted
is recorded as unknown, which is not the same as 0.

## Saving and Loading the Plate

`save_plate` replaces the plate for a date. Each item is either a catalog
reference or a custom entry with inline nutrients:

```
save_plate(
  date: "2025-01-09",
  items: [
    { menu_item_id: "nc-4212", quantity: 2 },
    {
      quantity: 1,
      display_name: "Protein shake from home",
      custom_nutrients: { calories: 150, protein: 25 }
    }
  ]
)
```

`get_plate(date)` returns the reconciled plate:
- Catalog references are matched against that date's catalog across ALL
  dining halls, not just the one they came from
- References that no longer match (menus change) are dropped silently; the
  response reports `dropped` so you can tell the user
- Custom entries always come back; they never depend on the catalog
- `totals` sums every nutrient field weighted by quantity, plus
  `calories_from_macros` (protein*4 + carbs*4 + fat*9) as a secondary figure

Each returned entry has an `entry_id` that is only valid for that response;
ids are reassigned on every `get_plate` call and are never stored.

## Quick Reference

| Task | Tool |
|------|------|
| Set profile | `set_profile` |
| View profile | `get_profile` |
| Energy target | `get_energy_target` |
| Edit macro share | `set_macro_target` |
| Lock/unlock share | `lock_macro` / `unlock_macro` |
| Import a menu | `import_menu` |
| Browse a menu | `get_menu` |
| Search a menu | `search_menu` |
| Save the plate | `save_plate` |
| Load plate + totals | `get_plate` |
| Clear the plate | `clear_plate` |

## Notes

- Dates use ISO format: YYYY-MM-DD
- Quantities are positive and may be fractional (1.5 servings)
- An empty reconciled plate is not an error; check `saved_count` and
  `dropped` to explain it to the user
"#;

/// Runtime status of the Plateful service
#[derive(Debug, Clone, Serialize)]
pub struct PlatefulStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> PlatefulStatus {
        let build_info = BuildInfo::current();

        // Get database size if it exists
        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        // Get process info
        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        PlatefulStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
