use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of meal, as named to the alternatives provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub fn label(&self) -> &'static str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
            MealType::Snack => "Snack",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MealType::Breakfast => write!(f, "breakfast"),
            MealType::Lunch => write!(f, "lunch"),
            MealType::Dinner => write!(f, "dinner"),
            MealType::Snack => write!(f, "snack"),
        }
    }
}

impl FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            "snack" => Ok(MealType::Snack),
            _ => Err(format!(
                "Invalid meal type '{}'. Valid options: breakfast, lunch, dinner, snack",
                s
            )),
        }
    }
}

/// Address of one meal within a day.
///
/// Snacks are addressed by their position in the day's snack list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack(usize),
}

impl MealSlot {
    pub fn meal_type(&self) -> MealType {
        match self {
            MealSlot::Breakfast => MealType::Breakfast,
            MealSlot::Lunch => MealType::Lunch,
            MealSlot::Dinner => MealType::Dinner,
            MealSlot::Snack(_) => MealType::Snack,
        }
    }

    /// Display label; snacks are numbered only when a day has several.
    pub fn label(&self, snack_count: usize) -> String {
        match self {
            MealSlot::Snack(index) if snack_count > 1 => format!("Snack {}", index + 1),
            other => other.meal_type().label().to_string(),
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MealSlot::Snack(index) => write!(f, "snack-{}", index),
            other => write!(f, "{}", other.meal_type()),
        }
    }
}

impl FromStr for MealSlot {
    type Err = String;

    /// Accepts `breakfast`, `lunch`, `dinner`, `snack` (first snack) and
    /// `snack-N` (0-based).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        if let Some(index) = lower.strip_prefix("snack-") {
            return index
                .parse()
                .map(MealSlot::Snack)
                .map_err(|_| format!("Invalid snack index in '{}'", s));
        }
        match lower.parse::<MealType>()? {
            MealType::Breakfast => Ok(MealSlot::Breakfast),
            MealType::Lunch => Ok(MealSlot::Lunch),
            MealType::Dinner => Ok(MealSlot::Dinner),
            MealType::Snack => Ok(MealSlot::Snack(0)),
        }
    }
}
