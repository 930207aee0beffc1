//! Read-side projections of the working copy.
//!
//! [`ViewProjector`] holds only view state (mode, day position, selected
//! week, snack visibility, grocery check marks) and derives views from a
//! borrowed plan. It never mutates the plan.

use std::collections::{HashMap, HashSet};

use crate::models::{CookingSituation, DailyPlan, FullMealPlan, Meal, MealSlot, UserPreferences};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Today,
    Calendar,
}

impl ViewMode {
    /// People who are "just surviving" land on a single day; everyone
    /// else sees the whole week.
    pub fn initial_for(prefs: &UserPreferences) -> Self {
        if prefs.cooking_situation == CookingSituation::Surviving {
            ViewMode::Today
        } else {
            ViewMode::Calendar
        }
    }
}

/// One day's meals as shown, with snacks hidden when the toggle is off.
#[derive(Debug, Clone, PartialEq)]
pub struct DayCard<'a> {
    pub day: u32,
    pub meals: Vec<(MealSlot, &'a Meal)>,
    pub snack_count: usize,
}

impl<'a> DayCard<'a> {
    fn project(day: &'a DailyPlan, show_snacks: bool) -> Self {
        let meals = day
            .all_meals()
            .filter(|(slot, _)| show_snacks || !matches!(slot, MealSlot::Snack(_)))
            .collect();
        Self {
            day: day.day,
            meals,
            snack_count: day.snacks.len(),
        }
    }

    pub fn label(&self, slot: MealSlot) -> String {
        slot.label(self.snack_count)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TodayView<'a> {
    /// 0-based position in the current day order.
    pub index: usize,
    pub total: usize,
    pub card: DayCard<'a>,
    pub has_prev: bool,
    pub has_next: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarView<'a> {
    pub week: u32,
    pub days: Vec<DayCard<'a>>,
    /// Empty when the plan has no data for this week.
    pub grocery_list: &'a [String],
    pub batch_prep_tips: &'a [String],
}

#[derive(Debug, Clone)]
pub struct ViewProjector {
    mode: ViewMode,
    current_day_index: usize,
    selected_week: u32,
    show_snacks: bool,
    checked: HashMap<u32, HashSet<String>>,
}

impl Default for ViewProjector {
    fn default() -> Self {
        Self {
            mode: ViewMode::Calendar,
            current_day_index: 0,
            selected_week: 1,
            show_snacks: true,
            checked: HashMap::new(),
        }
    }
}

impl ViewProjector {
    pub fn new(prefs: &UserPreferences) -> Self {
        Self {
            mode: ViewMode::initial_for(prefs),
            ..Self::default()
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
    }

    pub fn current_day_index(&self) -> usize {
        self.current_day_index
    }

    pub fn selected_week(&self) -> u32 {
        self.selected_week
    }

    pub fn show_snacks(&self) -> bool {
        self.show_snacks
    }

    pub fn set_show_snacks(&mut self, show: bool) {
        self.show_snacks = show;
    }

    pub fn toggle_snacks(&mut self) {
        self.show_snacks = !self.show_snacks;
    }

    /// Jumps to a position, clamped to the plan's range.
    pub fn go_to(&mut self, plan: &FullMealPlan, index: usize) {
        self.current_day_index = index.min(plan.days.len().saturating_sub(1));
    }

    pub fn next_day(&mut self, plan: &FullMealPlan) {
        self.go_to(plan, self.current_day_index + 1);
    }

    pub fn prev_day(&mut self) {
        self.current_day_index = self.current_day_index.saturating_sub(1);
    }

    pub fn select_week(&mut self, week: u32) {
        self.selected_week = week.max(1);
    }

    /// The day at the current position, or `None` for an empty plan.
    pub fn today<'a>(&self, plan: &'a FullMealPlan) -> Option<TodayView<'a>> {
        let total = plan.days.len();
        if total == 0 {
            return None;
        }
        let index = self.current_day_index.min(total - 1);
        Some(TodayView {
            index,
            total,
            card: DayCard::project(&plan.days[index], self.show_snacks),
            has_prev: index > 0,
            has_next: index + 1 < total,
        })
    }

    /// Days bucketed into the selected week plus that week's grocery data.
    pub fn calendar<'a>(&self, plan: &'a FullMealPlan) -> CalendarView<'a> {
        let days = plan
            .days_in_week(self.selected_week)
            .into_iter()
            .map(|d| DayCard::project(d, self.show_snacks))
            .collect();
        let week_data = plan.week_data(self.selected_week);

        CalendarView {
            week: self.selected_week,
            days,
            grocery_list: week_data.map(|w| w.grocery_list.as_slice()).unwrap_or(&[]),
            batch_prep_tips: week_data
                .map(|w| w.batch_prep_tips.as_slice())
                .unwrap_or(&[]),
        }
    }

    /// Flips the checked state of a grocery item in the selected week.
    pub fn toggle_grocery(&mut self, item: &str) -> bool {
        let checked = self.checked.entry(self.selected_week).or_default();
        let key = item.trim().to_lowercase();
        if !checked.remove(&key) {
            checked.insert(key);
            true
        } else {
            false
        }
    }

    pub fn is_checked(&self, item: &str) -> bool {
        self.checked
            .get(&self.selected_week)
            .is_some_and(|c| c.contains(&item.trim().to_lowercase()))
    }
}
