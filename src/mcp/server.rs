//! Plateful MCP Server Implementation
//!
//! Implements the MCP server with all Plateful tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::db::Database;
use crate::models::{CatalogItemCreate, NutrientProfile, ProfileSet, SavedPlateItemCreate};
use crate::plan::MacroSplit;
use crate::tools::catalog;
use crate::tools::plate;
use crate::tools::profile;
use crate::tools::status::StatusTracker;

/// Plateful MCP Service
#[derive(Clone)]
pub struct PlatefulService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    tool_router: ToolRouter<PlatefulService>,
}

impl PlatefulService {
    pub fn new(database_path: PathBuf, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            tool_router: Self::tool_router(),
        }
    }
}

// ============================================================================
// Profile Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetProfileParams {
    /// Biological sex: male or female
    pub sex: String,
    /// Birth date in ISO format: YYYY-MM-DD
    pub birth_date: String,
    /// Height in inches
    pub height_in: f64,
    /// Current weight in pounds
    pub weight_lb: f64,
    /// One of: sedentary, lightly_active, moderately_active, very_active, extra_active
    pub activity_level: String,
    /// Protein percentage (default 30)
    #[serde(default = "default_protein_pct")]
    pub protein_pct: i64,
    /// Carbohydrate percentage (default 40)
    #[serde(default = "default_carb_pct")]
    pub carb_pct: i64,
    /// Fat percentage (default 30)
    #[serde(default = "default_fat_pct")]
    pub fat_pct: i64,
    /// Target weight in pounds
    pub target_weight_lb: f64,
    /// Weight change rate in pounds per week, non-negative (default 0)
    #[serde(default)]
    pub rate_lb_per_week: f64,
}

fn default_protein_pct() -> i64 { 30 }
fn default_carb_pct() -> i64 { 40 }
fn default_fat_pct() -> i64 { 30 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetMacroTargetParams {
    /// Which share to edit: protein, carb, or fat
    #[serde(rename = "macro")]
    pub macro_name: String,
    /// New percentage value (0-100)
    pub value: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MacroLockParams {
    /// Which share: protein, carb, or fat
    #[serde(rename = "macro")]
    pub macro_name: String,
}

// ============================================================================
// Catalog Parameter Structs
// ============================================================================

/// One menu item in an import payload. Omitted nutrient fields are recorded
/// as unknown, which is distinct from zero.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MenuItemParam {
    /// Stable id from the menu feed
    pub menu_item_id: String,
    pub name: String,
    /// Portion description, e.g. "1 cup" or "4 oz"
    pub portion: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub allergens: Vec<String>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub fiber: Option<f64>,
    pub sodium: Option<f64>,
    pub sugar: Option<f64>,
    pub saturated_fat: Option<f64>,
    pub cholesterol: Option<f64>,
}

impl MenuItemParam {
    fn into_create(self) -> CatalogItemCreate {
        CatalogItemCreate {
            menu_item_id: self.menu_item_id,
            name: self.name,
            portion: self.portion,
            tags: self.tags,
            allergens: self.allergens,
            nutrients: NutrientProfile {
                calories: self.calories,
                protein: self.protein,
                carbs: self.carbs,
                fat: self.fat,
                fiber: self.fiber,
                sodium: self.sodium,
                sugar: self.sugar,
                saturated_fat: self.saturated_fat,
                cholesterol: self.cholesterol,
            },
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ImportMenuParams {
    /// Date in ISO format: YYYY-MM-DD
    pub date: String,
    pub dining_hall: String,
    /// Meal period: breakfast, lunch, or dinner
    pub meal_period: String,
    /// Menu items for this scope; replaces any previous import
    pub items: Vec<MenuItemParam>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetMenuParams {
    /// Date in ISO format: YYYY-MM-DD
    pub date: String,
    /// Optional dining hall filter
    pub dining_hall: Option<String>,
    /// Optional meal period filter: breakfast, lunch, or dinner
    pub meal_period: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchMenuParams {
    /// Date in ISO format: YYYY-MM-DD
    pub date: String,
    /// Name substring to search for
    pub query: String,
    #[serde(default = "default_search_limit")]
    pub limit: i64,
}

fn default_search_limit() -> i64 { 20 }

// ============================================================================
// Plate Parameter Structs
// ============================================================================

/// One saved plate entry: a catalog reference (menu_item_id) or a custom
/// entry with inline nutrient values.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PlateItemParam {
    /// Catalog feed id; omit for custom entries
    pub menu_item_id: Option<String>,
    /// Positive quantity multiplier (servings taken)
    pub quantity: f64,
    /// Display name override; required in spirit for custom entries
    pub display_name: Option<String>,
    pub custom_calories: Option<f64>,
    pub custom_protein: Option<f64>,
    pub custom_carbs: Option<f64>,
    pub custom_fat: Option<f64>,
    pub custom_fiber: Option<f64>,
    pub custom_sodium: Option<f64>,
    pub custom_sugar: Option<f64>,
    pub custom_saturated_fat: Option<f64>,
    pub custom_cholesterol: Option<f64>,
}

impl PlateItemParam {
    fn into_create(self) -> SavedPlateItemCreate {
        let custom = NutrientProfile {
            calories: self.custom_calories,
            protein: self.custom_protein,
            carbs: self.custom_carbs,
            fat: self.custom_fat,
            fiber: self.custom_fiber,
            sodium: self.custom_sodium,
            sugar: self.custom_sugar,
            saturated_fat: self.custom_saturated_fat,
            cholesterol: self.custom_cholesterol,
        };

        SavedPlateItemCreate {
            menu_item_id: self.menu_item_id,
            quantity: self.quantity,
            display_name: self.display_name,
            custom_nutrients: if custom.is_empty() { None } else { Some(custom) },
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SavePlateParams {
    /// Date in ISO format: YYYY-MM-DD
    pub date: String,
    /// Plate entries; replaces the saved plate for this date
    pub items: Vec<PlateItemParam>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetPlateParams {
    /// Date in ISO format: YYYY-MM-DD
    pub date: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ClearPlateParams {
    /// Date in ISO format: YYYY-MM-DD
    pub date: String,
}

#[tool_router]
impl PlatefulService {
    // --- Status ---

    #[tool(description = "Get the current status of the Plateful service including build info, database status, and process information")]
    async fn plateful_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status();
        let json = serde_json::to_string_pretty(&status)
            .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get step-by-step instructions for tracking dining hall meals. Call this when starting a new tracking session or when unsure how to use the Plateful tools.")]
    fn plate_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::PLATE_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(PLATE_INSTRUCTIONS)]))
    }

    // --- Profile ---

    #[tool(description = "Set or replace the user profile: body metrics, activity level, macro split, and weight goal. Negative rates and inconsistent macro percentages are rejected.")]
    fn set_profile(&self, Parameters(p): Parameters<SetProfileParams>) -> Result<CallToolResult, McpError> {
        let sex = crate::plan::Sex::from_str(&p.sex)
            .ok_or_else(|| McpError::invalid_params(format!("Unknown sex '{}': expected male or female", p.sex), None))?;
        let activity_level = profile::parse_activity_level(&p.activity_level)
            .map_err(|e| McpError::invalid_params(e, None))?;

        let data = ProfileSet {
            sex,
            birth_date: p.birth_date,
            height_in: p.height_in,
            weight_lb: p.weight_lb,
            activity_level,
            macro_split: MacroSplit::new(p.protein_pct, p.carb_pct, p.fat_pct),
            target_weight_lb: p.target_weight_lb,
            rate_lb_per_week: p.rate_lb_per_week,
        };
        let result = profile::set_profile(&self.database, data).map_err(|e| McpError::invalid_params(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get the current user profile, or null if none has been set")]
    fn get_profile(&self) -> Result<CallToolResult, McpError> {
        let result = profile::get_profile(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Compute the daily energy target from the stored profile: maintenance calories, goal-adjusted target, direction, and estimated time to goal")]
    fn get_energy_target(&self) -> Result<CallToolResult, McpError> {
        let result = profile::get_energy_target(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Set one macro percentage share; unlocked shares re-balance so the split still sums to 100. Edits to a locked share have no effect.")]
    fn set_macro_target(&self, Parameters(p): Parameters<SetMacroTargetParams>) -> Result<CallToolResult, McpError> {
        let result = profile::set_macro_target(&self.database, &p.macro_name, p.value)
            .map_err(|e| McpError::invalid_params(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Lock a macro share so it keeps its value while others are edited. At most two shares can be locked; a third lock is refused as a no-op.")]
    fn lock_macro(&self, Parameters(p): Parameters<MacroLockParams>) -> Result<CallToolResult, McpError> {
        let result = profile::lock_macro(&self.database, &p.macro_name)
            .map_err(|e| McpError::invalid_params(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Unlock a previously locked macro share")]
    fn unlock_macro(&self, Parameters(p): Parameters<MacroLockParams>) -> Result<CallToolResult, McpError> {
        let result = profile::unlock_macro(&self.database, &p.macro_name)
            .map_err(|e| McpError::invalid_params(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Catalog ---

    #[tool(description = "Import the menu for a (date, dining hall, meal period) scope, replacing any previous import for that scope")]
    fn import_menu(&self, Parameters(p): Parameters<ImportMenuParams>) -> Result<CallToolResult, McpError> {
        let items: Vec<CatalogItemCreate> = p.items.into_iter().map(MenuItemParam::into_create).collect();
        let result = catalog::import_menu(&self.database, &p.date, &p.dining_hall, &p.meal_period, items)
            .map_err(|e| McpError::invalid_params(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "List the imported menu for a date, optionally filtered by dining hall and meal period")]
    fn get_menu(&self, Parameters(p): Parameters<GetMenuParams>) -> Result<CallToolResult, McpError> {
        let result = catalog::get_menu(&self.database, &p.date, p.dining_hall.as_deref(), p.meal_period.as_deref())
            .map_err(|e| McpError::invalid_params(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Search menu items by name within a date")]
    fn search_menu(&self, Parameters(p): Parameters<SearchMenuParams>) -> Result<CallToolResult, McpError> {
        let result = catalog::search_menu(&self.database, &p.date, &p.query, p.limit)
            .map_err(|e| McpError::invalid_params(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Plate ---

    #[tool(description = "Save the plate for a date, replacing any previously saved plate. Each item is a catalog reference (menu_item_id) or a custom entry with inline nutrients.")]
    fn save_plate(&self, Parameters(p): Parameters<SavePlateParams>) -> Result<CallToolResult, McpError> {
        let items: Vec<SavedPlateItemCreate> = p.items.into_iter().map(PlateItemParam::into_create).collect();
        let result = plate::save_plate(&self.database, &p.date, items)
            .map_err(|e| McpError::invalid_params(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Load the plate for a date: saved entries are reconciled against that date's full catalog (all dining halls) and aggregated into nutrition totals. Stale catalog references are dropped and counted.")]
    fn get_plate(&self, Parameters(p): Parameters<GetPlateParams>) -> Result<CallToolResult, McpError> {
        let result = plate::get_plate(&self.database, &p.date)
            .map_err(|e| McpError::invalid_params(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Clear the saved plate for a date")]
    fn clear_plate(&self, Parameters(p): Parameters<ClearPlateParams>) -> Result<CallToolResult, McpError> {
        let result = plate::clear_plate(&self.database, &p.date)
            .map_err(|e| McpError::invalid_params(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

#[tool_handler]
impl ServerHandler for PlatefulService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "plateful".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Plateful".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Plateful - Dining hall menu and nutrition tracking. \
                 IMPORTANT: Call plate_instructions when starting a tracking session. \
                 Profile: set_profile/get_profile, get_energy_target. \
                 Macros: set_macro_target, lock_macro/unlock_macro (max two locks). \
                 Menus: import_menu (replaces a date+hall+meal scope), get_menu, search_menu. \
                 Plate: save_plate (replaces the date's plate), get_plate (reconciles against \
                 the catalog and returns totals), clear_plate."
                    .into(),
            ),
        }
    }
}
