use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use super::daily_plan::{week_of, DailyPlan};
use super::weekly_data::WeeklyData;
use crate::error::PlanError;

/// Cap on how many existing titles are sent as "must avoid" when asking
/// for alternatives.
pub const MAX_AVOID_TITLES: usize = 50;

/// A generated plan: days of meals plus per-week grocery data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullMealPlan {
    pub days: Vec<DailyPlan>,
    pub weeks: Vec<WeeklyData>,
}

impl FullMealPlan {
    pub fn new(days: Vec<DailyPlan>, weeks: Vec<WeeklyData>) -> Self {
        Self { days, weeks }
    }

    /// Checks the invariants a plan must satisfy before it can become the
    /// working copy.
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.days.is_empty() {
            return Err(PlanError::NoDays);
        }

        let mut seen = HashSet::new();
        for day in &self.days {
            if day.day == 0 {
                return Err(PlanError::InvalidDayNumber(day.day));
            }
            if !seen.insert(day.day) {
                return Err(PlanError::DuplicateDay(day.day));
            }
            for (slot, meal) in day.all_meals() {
                if meal.title.trim().is_empty() {
                    return Err(PlanError::EmptyTitle {
                        day: day.day,
                        slot: slot.to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Week numbers referenced by days that have no grocery/prep entry.
    pub fn uncovered_weeks(&self) -> Vec<u32> {
        let covered: HashSet<u32> = self.weeks.iter().map(|w| w.week).collect();
        self.day_weeks()
            .into_iter()
            .filter(|w| !covered.contains(w))
            .collect()
    }

    /// Distinct week buckets derived from the days, ascending.
    pub fn day_weeks(&self) -> Vec<u32> {
        self.days
            .iter()
            .map(DailyPlan::week)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn day(&self, day: u32) -> Option<&DailyPlan> {
        self.days.iter().find(|d| d.day == day)
    }

    pub fn day_mut(&mut self, day: u32) -> Option<&mut DailyPlan> {
        self.days.iter_mut().find(|d| d.day == day)
    }

    /// Days whose `ceil(day / 7)` equals `week`, in plan order.
    pub fn days_in_week(&self, week: u32) -> Vec<&DailyPlan> {
        self.days.iter().filter(|d| week_of(d.day) == week).collect()
    }

    pub fn week_data(&self, week: u32) -> Option<&WeeklyData> {
        self.weeks.iter().find(|w| w.week == week)
    }

    /// Breakfast, lunch and dinner titles in plan order, capped at
    /// [`MAX_AVOID_TITLES`]. Snacks are left out.
    pub fn avoid_titles(&self) -> Vec<String> {
        self.days
            .iter()
            .flat_map(|d| {
                [
                    d.breakfast.title.clone(),
                    d.lunch.title.clone(),
                    d.dinner.title.clone(),
                ]
            })
            .take(MAX_AVOID_TITLES)
            .collect()
    }

    /// Count of breakfast/lunch/dinner titles that repeat somewhere else.
    pub fn repeated_main_titles(&self) -> usize {
        let mut seen = HashSet::new();
        self.days
            .iter()
            .flat_map(|d| d.main_meals())
            .filter(|(_, meal)| !seen.insert(meal.title.trim().to_lowercase()))
            .count()
    }
}
