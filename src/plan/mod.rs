//! Target planning module
//!
//! Pure computation for macro ratio targets and daily energy targets.

pub mod energy;
pub mod macro_split;

pub use energy::{
    age_on, daily_delta, daily_target, maintenance_calories, time_to_goal, ActivityLevel,
    BodyMetrics, GoalDirection, GoalEta, Sex, WeightGoal,
};
pub use macro_split::{resolve, LockSet, MacroNutrient, MacroSplit};
