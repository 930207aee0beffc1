//! Caregiver preferences collected by the setup wizard.
//!
//! Multi-choice answers are stored as comma-joined strings (the wire
//! format the hosted API and saved sessions use). [`UserPreferences::toggle`]
//! keeps each of them a de-duplicated set of trimmed tokens.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Sentinel choice that clears a multi-choice field.
pub const NONE_CHOICE: &str = "None";

pub const AGE_BRACKETS: [&str; 6] = [
    "6-9 months",
    "9-12 months",
    "1 year",
    "18 months",
    "2 years",
    "3+ years",
];

pub const FAVORITE_CHOICES: [&str; 8] = [
    "Pasta", "Yogurt", "Berries", "Eggs", "Chicken", "Toast", "Cheese", "Avocado",
];

pub const WANTS_MORE_OF_CHOICES: [&str; 8] = [
    "Veggies",
    "Protein",
    "Iron-rich",
    "Fruit",
    "Fiber",
    "Healthy Fats",
    "New Textures",
    "Leafy Greens",
];

pub const ALLERGY_CHOICES: [&str; 7] = [
    "Dairy", "Eggs", "Peanuts", "Tree Nuts", "Wheat", "Soy", "Fish",
];

pub const DISLIKE_CHOICES: [&str; 11] = [
    "Broccoli",
    "Mushrooms",
    "Onions",
    "Garlic",
    "Spicy",
    "Lumps",
    "Bitter Greens",
    "Strong Smells",
    "Soggy Foods",
    "Slimy Textures",
    "Too Much Color",
];

pub const DIETARY_CHOICES: [&str; 9] = [
    "Organic",
    "Vegan",
    "Vegetarian",
    "Gluten-Free",
    "Low Sodium",
    "No Sugar Added",
    "No Salt",
    "Grass-Fed",
    "Pasture-Raised",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EatingStyle {
    Purees,
    FingerFoods,
    TableFood,
    #[default]
    Mixed,
}

impl EatingStyle {
    pub fn description(&self) -> &'static str {
        match self {
            EatingStyle::Purees => "Purees / Spoon-fed",
            EatingStyle::FingerFoods => "Soft Finger Foods",
            EatingStyle::TableFood => "Table Food",
            EatingStyle::Mixed => "Mix of Styles",
        }
    }
}

impl fmt::Display for EatingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EatingStyle::Purees => write!(f, "purees"),
            EatingStyle::FingerFoods => write!(f, "finger-foods"),
            EatingStyle::TableFood => write!(f, "table-food"),
            EatingStyle::Mixed => write!(f, "mixed"),
        }
    }
}

impl FromStr for EatingStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "purees" => Ok(EatingStyle::Purees),
            "finger-foods" => Ok(EatingStyle::FingerFoods),
            "table-food" => Ok(EatingStyle::TableFood),
            "mixed" => Ok(EatingStyle::Mixed),
            _ => Err(format!(
                "Invalid eating style '{}'. Valid options: purees, finger-foods, table-food, mixed",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CookingSituation {
    Surviving,
    Batching,
    #[default]
    Mixed,
}

impl CookingSituation {
    pub fn description(&self) -> &'static str {
        match self {
            CookingSituation::Surviving => "I'm just surviving",
            CookingSituation::Batching => "I can batch prep",
            CookingSituation::Mixed => "A healthy mix",
        }
    }
}

impl fmt::Display for CookingSituation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CookingSituation::Surviving => write!(f, "surviving"),
            CookingSituation::Batching => write!(f, "batching"),
            CookingSituation::Mixed => write!(f, "mixed"),
        }
    }
}

impl FromStr for CookingSituation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "surviving" => Ok(CookingSituation::Surviving),
            "batching" => Ok(CookingSituation::Batching),
            "mixed" => Ok(CookingSituation::Mixed),
            _ => Err(format!(
                "Invalid cooking situation '{}'. Valid options: surviving, batching, mixed",
                s
            )),
        }
    }
}

/// The comma-joined multi-choice fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceField {
    Favorites,
    WantsMoreOf,
    Allergies,
    HatesGags,
    DietaryPreferences,
}

impl PreferenceField {
    pub fn choices(&self) -> &'static [&'static str] {
        match self {
            PreferenceField::Favorites => &FAVORITE_CHOICES,
            PreferenceField::WantsMoreOf => &WANTS_MORE_OF_CHOICES,
            PreferenceField::Allergies => &ALLERGY_CHOICES,
            PreferenceField::HatesGags => &DISLIKE_CHOICES,
            PreferenceField::DietaryPreferences => &DIETARY_CHOICES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    pub age: String,
    pub eating_style: EatingStyle,
    pub favorites: String,
    pub wants_more_of: String,
    pub allergies: String,
    pub hates_gags: String,
    pub cooking_situation: CookingSituation,
    pub dietary_preferences: String,
}

impl UserPreferences {
    fn field(&self, field: PreferenceField) -> &String {
        match field {
            PreferenceField::Favorites => &self.favorites,
            PreferenceField::WantsMoreOf => &self.wants_more_of,
            PreferenceField::Allergies => &self.allergies,
            PreferenceField::HatesGags => &self.hates_gags,
            PreferenceField::DietaryPreferences => &self.dietary_preferences,
        }
    }

    fn field_mut(&mut self, field: PreferenceField) -> &mut String {
        match field {
            PreferenceField::Favorites => &mut self.favorites,
            PreferenceField::WantsMoreOf => &mut self.wants_more_of,
            PreferenceField::Allergies => &mut self.allergies,
            PreferenceField::HatesGags => &mut self.hates_gags,
            PreferenceField::DietaryPreferences => &mut self.dietary_preferences,
        }
    }

    /// Tokens of a multi-choice field, trimmed, de-duplicated, in order.
    pub fn items(&self, field: PreferenceField) -> Vec<String> {
        split_items(self.field(field))
    }

    pub fn contains(&self, field: PreferenceField, item: &str) -> bool {
        self.items(field).iter().any(|i| i == item.trim())
    }

    /// Adds the item if absent, removes it if present. `"None"` clears
    /// the field instead of being stored.
    pub fn toggle(&mut self, field: PreferenceField, item: &str) {
        let item = item.trim();
        if item.is_empty() {
            return;
        }
        if item == NONE_CHOICE {
            self.field_mut(field).clear();
            return;
        }

        let mut items = self.items(field);
        if let Some(pos) = items.iter().position(|i| i == item) {
            items.remove(pos);
        } else {
            items.push(item.to_string());
        }
        *self.field_mut(field) = items.join(", ");
    }

    /// Replaces a field from free text, normalizing it to the set form.
    pub fn set_items(&mut self, field: PreferenceField, text: &str) {
        *self.field_mut(field) = split_items(text).join(", ");
    }

    /// Re-joins every multi-choice field in canonical form.
    pub fn normalize(&mut self) {
        for field in [
            PreferenceField::Favorites,
            PreferenceField::WantsMoreOf,
            PreferenceField::Allergies,
            PreferenceField::HatesGags,
            PreferenceField::DietaryPreferences,
        ] {
            let text = self.field(field).clone();
            self.set_items(field, &text);
        }
        self.age = self.age.trim().to_string();
    }

    /// The wizard asks about eating style only for infants.
    pub fn is_infant(&self) -> bool {
        matches!(self.age.as_str(), "6-9 months" | "9-12 months")
    }

    pub fn has_allergies(&self) -> bool {
        !self.items(PreferenceField::Allergies).is_empty()
    }

    /// Age is the only required answer.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.age.trim().is_empty() {
            return Err(ValidationError::MissingAge);
        }
        Ok(())
    }
}

fn split_items(text: &str) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    for token in text.split(',').map(str::trim) {
        if token.is_empty() || token == NONE_CHOICE {
            continue;
        }
        if !items.iter().any(|i| i == token) {
            items.push(token.to_string());
        }
    }
    items
}
