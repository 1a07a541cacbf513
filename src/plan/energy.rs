//! Daily energy target calculation
//!
//! Derives maintenance calories from body metrics via the Mifflin-St Jeor
//! equation, applies the activity multiplier, and converts a weekly
//! weight-change rate into a daily calorie surplus or deficit.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Energy equivalent of one pound of body weight, in kilocalories
pub const KCAL_PER_POUND: f64 = 3500.0;

const KG_PER_LB: f64 = 0.453_592;
const CM_PER_IN: f64 = 2.54;

/// Deadband around the current weight within which a goal counts as
/// maintaining, in pounds
const MAINTAIN_DEADBAND_LB: f64 = 1.0;

/// Biological sex for the basal-rate formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "male" | "m" => Some(Sex::Male),
            "female" | "f" => Some(Sex::Female),
            _ => None,
        }
    }
}

/// Activity level tiers with their fixed maintenance multipliers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    VeryActive,
    ExtraActive,
}

impl ActivityLevel {
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtraActive => 1.9,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::LightlyActive => "lightly_active",
            ActivityLevel::ModeratelyActive => "moderately_active",
            ActivityLevel::VeryActive => "very_active",
            ActivityLevel::ExtraActive => "extra_active",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sedentary" => Some(ActivityLevel::Sedentary),
            "lightly_active" => Some(ActivityLevel::LightlyActive),
            "moderately_active" => Some(ActivityLevel::ModeratelyActive),
            "very_active" => Some(ActivityLevel::VeryActive),
            "extra_active" => Some(ActivityLevel::ExtraActive),
            _ => None,
        }
    }
}

/// Direction of a weight goal, derived from current vs target weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalDirection {
    Losing,
    Gaining,
    Maintaining,
}

impl GoalDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalDirection::Losing => "losing",
            GoalDirection::Gaining => "gaining",
            GoalDirection::Maintaining => "maintaining",
        }
    }
}

/// Body metrics feeding the basal-rate formula
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BodyMetrics {
    pub sex: Sex,
    pub age_years: i64,
    pub height_in: f64,
    pub weight_lb: f64,
}

/// A weight-change goal. Direction is derived, never stored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WeightGoal {
    pub current_weight_lb: f64,
    pub target_weight_lb: f64,
    /// Non-negative magnitude; direction supplies the sign
    pub rate_lb_per_week: f64,
}

impl WeightGoal {
    /// Direction from the sign of (target - current), with a small deadband
    /// mapping to maintaining
    pub fn direction(&self) -> GoalDirection {
        let diff = self.target_weight_lb - self.current_weight_lb;
        if diff.abs() <= MAINTAIN_DEADBAND_LB {
            GoalDirection::Maintaining
        } else if diff < 0.0 {
            GoalDirection::Losing
        } else {
            GoalDirection::Gaining
        }
    }
}

/// Estimated time until the goal weight is reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "value", rename_all = "snake_case")]
pub enum GoalEta {
    Days(i64),
    Weeks(i64),
    NotApplicable,
}

/// Age in whole years on a given date
pub fn age_on(birth_date: NaiveDate, today: NaiveDate) -> i64 {
    let mut age = i64::from(today.year() - birth_date.year());
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    age.max(0)
}

/// Basal metabolic rate via Mifflin-St Jeor, in kcal/day
fn basal_rate(metrics: &BodyMetrics) -> f64 {
    let weight_kg = metrics.weight_lb * KG_PER_LB;
    let height_cm = metrics.height_in * CM_PER_IN;
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * metrics.age_years as f64;

    match metrics.sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    }
}

/// Maintenance calories: basal rate scaled by the activity multiplier
pub fn maintenance_calories(metrics: &BodyMetrics, activity: ActivityLevel) -> f64 {
    basal_rate(metrics) * activity.multiplier()
}

/// Daily calorie delta implied by the goal, signed. Zero when maintaining.
pub fn daily_delta(goal: &WeightGoal) -> f64 {
    let magnitude = goal.rate_lb_per_week * KCAL_PER_POUND / 7.0;
    match goal.direction() {
        GoalDirection::Maintaining => 0.0,
        GoalDirection::Losing => -magnitude,
        GoalDirection::Gaining => magnitude,
    }
}

/// Daily calorie target: maintenance plus the signed goal delta, rounded to
/// whole kilocalories
pub fn daily_target(metrics: &BodyMetrics, activity: ActivityLevel, goal: &WeightGoal) -> i64 {
    let maintenance = maintenance_calories(metrics, activity);
    (maintenance + daily_delta(goal)).round() as i64
}

/// Estimated time to reach the target weight at the stated rate.
///
/// Maintaining goals and zero rates have no meaningful estimate and resolve
/// to `NotApplicable` rather than a division by zero.
pub fn time_to_goal(goal: &WeightGoal) -> GoalEta {
    if goal.direction() == GoalDirection::Maintaining || goal.rate_lb_per_week <= 0.0 {
        return GoalEta::NotApplicable;
    }

    let weeks = (goal.target_weight_lb - goal.current_weight_lb).abs() / goal.rate_lb_per_week;
    if weeks < 1.0 {
        GoalEta::Days((weeks * 7.0).ceil() as i64)
    } else {
        GoalEta::Weeks(weeks.ceil() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_metrics() -> BodyMetrics {
        BodyMetrics {
            sex: Sex::Female,
            age_years: 20,
            height_in: 65.0,
            weight_lb: 140.0,
        }
    }

    #[test]
    fn test_maintenance_female_moderately_active() {
        let metrics = sample_metrics();
        let maintenance = maintenance_calories(&metrics, ActivityLevel::ModeratelyActive);

        // 10*63.50288 + 6.25*165.1 - 5*20 - 161 = 1405.9038, * 1.55
        let expected = (10.0 * 140.0 * 0.453_592 + 6.25 * 65.0 * 2.54 - 100.0 - 161.0) * 1.55;
        assert!((maintenance - expected).abs() < 0.001);
    }

    #[test]
    fn test_lose_one_pound_per_week_is_500_deficit() {
        let metrics = sample_metrics();
        let goal = WeightGoal {
            current_weight_lb: 140.0,
            target_weight_lb: 130.0,
            rate_lb_per_week: 1.0,
        };

        let maintenance = maintenance_calories(&metrics, ActivityLevel::ModeratelyActive);
        let target = daily_target(&metrics, ActivityLevel::ModeratelyActive, &goal);

        assert_eq!(goal.direction(), GoalDirection::Losing);
        assert_eq!(target, (maintenance - 500.0).round() as i64);
        assert_eq!(time_to_goal(&goal), GoalEta::Weeks(10));
    }

    #[test]
    fn test_maintaining_ignores_rate() {
        let metrics = sample_metrics();
        let goal = WeightGoal {
            current_weight_lb: 140.0,
            target_weight_lb: 140.5,
            rate_lb_per_week: 2.0,
        };

        assert_eq!(goal.direction(), GoalDirection::Maintaining);

        let maintenance = maintenance_calories(&metrics, ActivityLevel::ModeratelyActive);
        let target = daily_target(&metrics, ActivityLevel::ModeratelyActive, &goal);
        assert_eq!(target, maintenance.round() as i64);
        assert_eq!(time_to_goal(&goal), GoalEta::NotApplicable);
    }

    #[test]
    fn test_gaining_adds_surplus() {
        let metrics = BodyMetrics {
            sex: Sex::Male,
            age_years: 22,
            height_in: 70.0,
            weight_lb: 150.0,
        };
        let goal = WeightGoal {
            current_weight_lb: 150.0,
            target_weight_lb: 160.0,
            rate_lb_per_week: 0.5,
        };

        let maintenance = maintenance_calories(&metrics, ActivityLevel::VeryActive);
        let target = daily_target(&metrics, ActivityLevel::VeryActive, &goal);

        assert_eq!(goal.direction(), GoalDirection::Gaining);
        // 0.5 lb/week = 250 kcal/day surplus
        assert_eq!(target, (maintenance + 250.0).round() as i64);
    }

    #[test]
    fn test_eta_under_a_week_reports_days() {
        let goal = WeightGoal {
            current_weight_lb: 141.5,
            target_weight_lb: 140.0,
            rate_lb_per_week: 2.0,
        };
        // 1.5 lb at 2 lb/week = 0.75 weeks = 5.25 days, ceiling 6
        assert_eq!(time_to_goal(&goal), GoalEta::Days(6));
    }

    #[test]
    fn test_eta_zero_rate_not_applicable() {
        let goal = WeightGoal {
            current_weight_lb: 150.0,
            target_weight_lb: 140.0,
            rate_lb_per_week: 0.0,
        };
        assert_eq!(time_to_goal(&goal), GoalEta::NotApplicable);
    }

    #[test]
    fn test_activity_multipliers() {
        assert_eq!(ActivityLevel::Sedentary.multiplier(), 1.2);
        assert_eq!(ActivityLevel::LightlyActive.multiplier(), 1.375);
        assert_eq!(ActivityLevel::ModeratelyActive.multiplier(), 1.55);
        assert_eq!(ActivityLevel::VeryActive.multiplier(), 1.725);
        assert_eq!(ActivityLevel::ExtraActive.multiplier(), 1.9);
    }

    #[test]
    fn test_age_on() {
        let birth = NaiveDate::from_ymd_opt(2004, 6, 15).unwrap();
        assert_eq!(age_on(birth, NaiveDate::from_ymd_opt(2025, 6, 14).unwrap()), 20);
        assert_eq!(age_on(birth, NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()), 21);
        assert_eq!(age_on(birth, NaiveDate::from_ymd_opt(2025, 6, 16).unwrap()), 21);
    }
}
