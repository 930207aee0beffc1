use serde::{Deserialize, Serialize};
use std::fmt;

/// Default prep time for snacks added by hand.
pub const DEFAULT_SNACK_PREP_TIME: &str = "5 mins";
/// Default cook time for snacks added by hand.
pub const DEFAULT_SNACK_COOK_TIME: &str = "0 mins";

/// A single meal suggestion.
///
/// Meals are values: edits and swaps replace the whole meal rather than
/// patching fields in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub title: String,
    #[serde(default)]
    pub prep_notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<String>,
}

impl Meal {
    pub fn new(title: impl Into<String>, prep_notes: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            prep_notes: prep_notes.into(),
            prep_time: None,
            cook_time: None,
        }
    }

    pub fn with_times(mut self, prep_time: impl Into<String>, cook_time: impl Into<String>) -> Self {
        self.prep_time = Some(prep_time.into());
        self.cook_time = Some(cook_time.into());
        self
    }

    /// Returns a copy with new title and notes, keeping prep/cook times.
    pub fn edited(&self, title: impl Into<String>, prep_notes: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            prep_notes: prep_notes.into(),
            prep_time: self.prep_time.clone(),
            cook_time: self.cook_time.clone(),
        }
    }

    /// Builds a hand-added snack, filling in default times when omitted.
    pub fn snack(
        title: impl Into<String>,
        prep_notes: impl Into<String>,
        prep_time: Option<String>,
        cook_time: Option<String>,
    ) -> Self {
        Self {
            title: title.into(),
            prep_notes: prep_notes.into(),
            prep_time: Some(prep_time.unwrap_or_else(|| DEFAULT_SNACK_PREP_TIME.to_string())),
            cook_time: Some(cook_time.unwrap_or_else(|| DEFAULT_SNACK_COOK_TIME.to_string())),
        }
    }

    /// "Prep: 5 mins | Cook: 10 mins", or `None` when neither time is known.
    pub fn time_summary(&self) -> Option<String> {
        let parts: Vec<String> = [
            self.prep_time.as_ref().map(|t| format!("Prep: {}", t)),
            self.cook_time.as_ref().map(|t| format!("Cook: {}", t)),
        ]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" | "))
        }
    }
}

impl fmt::Display for Meal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)?;
        if let Some(times) = self.time_summary() {
            write!(f, " ({})", times)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edited_keeps_times() {
        let meal = Meal::new("Oat Pancakes", "Mash banana").with_times("5 mins", "10 mins");
        let edited = meal.edited("Oat Waffles", "Use the waffle iron");

        assert_eq!(edited.title, "Oat Waffles");
        assert_eq!(edited.prep_notes, "Use the waffle iron");
        assert_eq!(edited.prep_time.as_deref(), Some("5 mins"));
        assert_eq!(edited.cook_time.as_deref(), Some("10 mins"));
    }

    #[test]
    fn test_snack_defaults() {
        let snack = Meal::snack("Cheese Cubes", "", None, None);
        assert_eq!(snack.prep_time.as_deref(), Some("5 mins"));
        assert_eq!(snack.cook_time.as_deref(), Some("0 mins"));

        let snack = Meal::snack("Muffin", "", Some("10 mins".into()), None);
        assert_eq!(snack.prep_time.as_deref(), Some("10 mins"));
    }

    #[test]
    fn test_time_summary() {
        assert_eq!(Meal::new("Toast", "").time_summary(), None);

        let mut meal = Meal::new("Toast", "");
        meal.cook_time = Some("3 mins".into());
        assert_eq!(meal.time_summary().as_deref(), Some("Cook: 3 mins"));

        let meal = meal.with_times("1 min", "3 mins");
        assert_eq!(meal.time_summary().as_deref(), Some("Prep: 1 min | Cook: 3 mins"));
    }

    #[test]
    fn test_json_field_names() {
        let meal = Meal::new("Toast", "Cut in strips");
        let json = serde_json::to_value(&meal).unwrap();
        assert_eq!(json["prepNotes"], "Cut in strips");
        assert!(json.get("prepTime").is_none());

        let parsed: Meal = serde_json::from_str(r#"{"title":"Yogurt"}"#).unwrap();
        assert_eq!(parsed.prep_notes, "");
    }
}
