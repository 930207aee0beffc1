//! Wire-format adapter for daily plans.
//!
//! Older plans (and the model's raw output) carry a single optional
//! `snack`; current plans carry a `snacks` list. Both shapes deserialize
//! into [`DailyPlanInput`], which is converted into a [`DailyPlan`] with
//! a normalized `snacks` list. Code past this point only sees `snacks`.

use serde::Deserialize;

use super::daily_plan::DailyPlan;
use super::meal::Meal;

#[derive(Debug, Clone, Deserialize)]
pub struct DailyPlanInput {
    pub day: u32,
    pub breakfast: Meal,
    pub lunch: Meal,
    pub dinner: Meal,
    #[serde(default)]
    pub snacks: Option<Vec<Meal>>,
    #[serde(default)]
    pub snack: Option<Meal>,
}

impl From<DailyPlanInput> for DailyPlan {
    fn from(input: DailyPlanInput) -> Self {
        let snacks = match (input.snacks, input.snack) {
            (Some(snacks), _) => snacks,
            (None, Some(snack)) => vec![snack],
            (None, None) => Vec::new(),
        };
        DailyPlan {
            day: input.day,
            breakfast: input.breakfast,
            lunch: input.lunch,
            dinner: input.dinner,
            snacks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEALS: &str = r#""breakfast":{"title":"B","prepNotes":""},
        "lunch":{"title":"L","prepNotes":""},
        "dinner":{"title":"D","prepNotes":""}"#;

    #[test]
    fn test_legacy_snack_becomes_list() {
        let json = format!(r#"{{"day":1,{},"snack":{{"title":"Apple","prepNotes":""}}}}"#, MEALS);
        let plan: DailyPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(plan.snacks.len(), 1);
        assert_eq!(plan.snacks[0].title, "Apple");
    }

    #[test]
    fn test_snacks_list_wins_over_legacy_field() {
        let json = format!(
            r#"{{"day":1,{},"snack":{{"title":"Old","prepNotes":""}},"snacks":[]}}"#,
            MEALS
        );
        let plan: DailyPlan = serde_json::from_str(&json).unwrap();
        assert!(plan.snacks.is_empty());
    }

    #[test]
    fn test_missing_snacks_defaults_to_empty() {
        let json = format!(r#"{{"day":4,{}}}"#, MEALS);
        let plan: DailyPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(plan.day, 4);
        assert!(plan.snacks.is_empty());
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let json = format!(r#"{{"day":1,{},"snack":{{"title":"Apple","prepNotes":""}}}}"#, MEALS);
        let once: DailyPlan = serde_json::from_str(&json).unwrap();
        let twice: DailyPlan =
            serde_json::from_str(&serde_json::to_string(&once).unwrap()).unwrap();
        assert_eq!(once, twice);
    }
}
