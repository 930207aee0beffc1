use serde::{Deserialize, Serialize};
use std::fmt;

use super::input::DailyPlanInput;
use super::meal::Meal;
use super::meal_type::MealSlot;

/// Days per calendar week bucket.
pub const DAYS_PER_WEEK: u32 = 7;

/// Week bucket for a day number: `ceil(day / 7)`.
pub fn week_of(day: u32) -> u32 {
    day.div_ceil(DAYS_PER_WEEK)
}

/// The meals planned for one day.
///
/// Deserialization goes through [`DailyPlanInput`] so the legacy single
/// `snack` field is folded into `snacks` exactly once, at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "DailyPlanInput")]
pub struct DailyPlan {
    pub day: u32,
    pub breakfast: Meal,
    pub lunch: Meal,
    pub dinner: Meal,
    pub snacks: Vec<Meal>,
}

impl DailyPlan {
    pub fn new(day: u32, breakfast: Meal, lunch: Meal, dinner: Meal) -> Self {
        Self {
            day,
            breakfast,
            lunch,
            dinner,
            snacks: Vec::new(),
        }
    }

    pub fn with_snacks(mut self, snacks: Vec<Meal>) -> Self {
        self.snacks = snacks;
        self
    }

    pub fn week(&self) -> u32 {
        week_of(self.day)
    }

    pub fn meal(&self, slot: MealSlot) -> Option<&Meal> {
        match slot {
            MealSlot::Breakfast => Some(&self.breakfast),
            MealSlot::Lunch => Some(&self.lunch),
            MealSlot::Dinner => Some(&self.dinner),
            MealSlot::Snack(index) => self.snacks.get(index),
        }
    }

    pub fn meal_mut(&mut self, slot: MealSlot) -> Option<&mut Meal> {
        match slot {
            MealSlot::Breakfast => Some(&mut self.breakfast),
            MealSlot::Lunch => Some(&mut self.lunch),
            MealSlot::Dinner => Some(&mut self.dinner),
            MealSlot::Snack(index) => self.snacks.get_mut(index),
        }
    }

    /// Breakfast, lunch and dinner with their slots.
    pub fn main_meals(&self) -> [(MealSlot, &Meal); 3] {
        [
            (MealSlot::Breakfast, &self.breakfast),
            (MealSlot::Lunch, &self.lunch),
            (MealSlot::Dinner, &self.dinner),
        ]
    }

    /// Every meal of the day in display order, snacks last.
    pub fn all_meals(&self) -> impl Iterator<Item = (MealSlot, &Meal)> {
        self.main_meals().into_iter().chain(
            self.snacks
                .iter()
                .enumerate()
                .map(|(i, snack)| (MealSlot::Snack(i), snack)),
        )
    }
}

impl fmt::Display for DailyPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let heading = format!("Day {}", self.day);
        writeln!(f, "{}", heading)?;
        writeln!(f, "{}", "-".repeat(heading.len()))?;
        for (slot, meal) in self.all_meals() {
            writeln!(f, "  {:10} {}", slot.label(self.snacks.len()), meal)?;
        }
        Ok(())
    }
}
