//! The plan editor: owner of the working copy of a meal plan.
//!
//! All user mutations go through [`PlanEditor`]. Operations addressed to a
//! day or snack that does not exist are no-ops and return `false`.
//!
//! Swaps are split in two phases so the alternatives request can be
//! awaited outside the editor: [`PlanEditor::begin_swap`] hands out a
//! [`SwapTicket`], and responses are only accepted while that ticket is
//! still the live swap target. Starting another swap or cancelling makes
//! older tickets stale, and their responses are dropped.

use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;

use crate::error::PlanError;
use crate::models::{FullMealPlan, Meal, MealSlot, MealType};

/// Minimum time between requesting a shuffle and committing the new order.
pub const SHUFFLE_TRANSITION: Duration = Duration::from_millis(600);

/// Identifies one swap request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SwapTicket {
    pub day: u32,
    pub slot: MealSlot,
    seq: u64,
}

/// Everything the alternatives provider needs for one swap.
#[derive(Debug, Clone)]
pub struct SwapRequest {
    pub ticket: SwapTicket,
    pub meal_type: MealType,
    pub current_meal: Meal,
    pub avoid_titles: Vec<String>,
}

/// Progress of the live swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapStatus {
    Loading,
    Ready(Vec<Meal>),
    Failed(String),
}

#[derive(Debug, Clone)]
struct PendingSwap {
    ticket: SwapTicket,
    status: SwapStatus,
}

#[derive(Debug, Default)]
pub struct PlanEditor {
    plan: Option<FullMealPlan>,
    pending_swap: Option<PendingSwap>,
    next_seq: u64,
    shuffling: bool,
}

impl PlanEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the working copy with `plan` after checking it.
    ///
    /// Snack normalization already happened when the plan was
    /// deserialized; a rejected plan leaves the current copy untouched.
    pub fn initialize(&mut self, plan: FullMealPlan) -> Result<(), PlanError> {
        plan.validate()?;
        let uncovered = plan.uncovered_weeks();
        if !uncovered.is_empty() {
            tracing::warn!(
                "Plan has days in weeks {:?} without grocery data; those panels will be empty",
                uncovered
            );
        }
        self.plan = Some(plan);
        self.pending_swap = None;
        self.shuffling = false;
        Ok(())
    }

    pub fn plan(&self) -> Option<&FullMealPlan> {
        self.plan.as_ref()
    }

    pub fn has_plan(&self) -> bool {
        self.plan.is_some()
    }

    /// Drops the working copy and any in-flight swap or shuffle.
    pub fn reset(&mut self) {
        self.plan = None;
        self.pending_swap = None;
        self.shuffling = false;
    }

    /// Replaces title and notes of one meal, keeping its prep/cook times.
    pub fn edit_meal(
        &mut self,
        day: u32,
        slot: MealSlot,
        title: impl Into<String>,
        prep_notes: impl Into<String>,
    ) -> bool {
        let Some(meal) = self.meal_mut(day, slot) else {
            return false;
        };
        *meal = meal.edited(title, prep_notes);
        true
    }

    /// Appends a snack to a day. Missing times default to 5 / 0 mins.
    pub fn add_snack(
        &mut self,
        day: u32,
        title: impl Into<String>,
        prep_notes: impl Into<String>,
        prep_time: Option<String>,
        cook_time: Option<String>,
    ) -> bool {
        let Some(plan_day) = self.plan.as_mut().and_then(|p| p.day_mut(day)) else {
            return false;
        };
        plan_day
            .snacks
            .push(Meal::snack(title, prep_notes, prep_time, cook_time));
        true
    }

    /// Removes the snack at `index`; later snacks shift down by one.
    pub fn remove_snack(&mut self, day: u32, index: usize) -> bool {
        let Some(plan_day) = self.plan.as_mut().and_then(|p| p.day_mut(day)) else {
            return false;
        };
        if index >= plan_day.snacks.len() {
            return false;
        }
        plan_day.snacks.remove(index);

        // A swap on this or a later snack now points at a different meal.
        let moved = self.swap_target().is_some_and(|t| {
            t.day == day && matches!(t.slot, MealSlot::Snack(i) if i >= index)
        });
        if moved {
            self.pending_swap = None;
        }
        true
    }

    /// Starts a swap for one meal, superseding any swap already pending.
    pub fn begin_swap(&mut self, day: u32, slot: MealSlot) -> Option<SwapRequest> {
        let plan = self.plan.as_ref()?;
        let current_meal = plan.day(day)?.meal(slot)?.clone();
        let avoid_titles = plan.avoid_titles();

        self.next_seq += 1;
        let ticket = SwapTicket {
            day,
            slot,
            seq: self.next_seq,
        };
        self.pending_swap = Some(PendingSwap {
            ticket,
            status: SwapStatus::Loading,
        });

        Some(SwapRequest {
            ticket,
            meal_type: slot.meal_type(),
            current_meal,
            avoid_titles,
        })
    }

    pub fn swap_target(&self) -> Option<SwapTicket> {
        self.pending_swap.as_ref().map(|p| p.ticket)
    }

    pub fn swap_status(&self) -> Option<&SwapStatus> {
        self.pending_swap.as_ref().map(|p| &p.status)
    }

    pub fn is_loading_alternatives(&self) -> bool {
        matches!(self.swap_status(), Some(SwapStatus::Loading))
    }

    fn live_swap_mut(&mut self, ticket: SwapTicket) -> Option<&mut PendingSwap> {
        self.pending_swap
            .as_mut()
            .filter(|pending| pending.ticket == ticket)
    }

    /// Stores candidates for a swap. Returns `false` (and drops them) when
    /// the ticket is no longer the live swap target.
    pub fn receive_alternatives(&mut self, ticket: SwapTicket, alternatives: Vec<Meal>) -> bool {
        match self.live_swap_mut(ticket) {
            Some(pending) => {
                pending.status = SwapStatus::Ready(alternatives);
                true
            }
            None => {
                tracing::debug!("Discarding alternatives for superseded swap {:?}", ticket);
                false
            }
        }
    }

    /// Records a failed alternatives fetch. The swap stays pending so the
    /// caller can retry or cancel.
    pub fn fail_swap(&mut self, ticket: SwapTicket, message: impl Into<String>) -> bool {
        match self.live_swap_mut(ticket) {
            Some(pending) => {
                pending.status = SwapStatus::Failed(message.into());
                true
            }
            None => false,
        }
    }

    /// Re-arms a failed swap for another attempt, returning a fresh request
    /// for the same target.
    pub fn retry_swap(&mut self) -> Option<SwapRequest> {
        let ticket = self.swap_target()?;
        self.begin_swap(ticket.day, ticket.slot)
    }

    /// Replaces the target meal wholesale with `meal`, including its times.
    pub fn apply_alternative(&mut self, ticket: SwapTicket, meal: Meal) -> bool {
        if self.live_swap_mut(ticket).is_none() {
            return false;
        }
        self.pending_swap = None;
        match self.meal_mut(ticket.day, ticket.slot) {
            Some(target) => {
                *target = meal;
                true
            }
            None => false,
        }
    }

    /// Applies the `index`-th received candidate.
    pub fn choose_alternative(&mut self, ticket: SwapTicket, index: usize) -> bool {
        let chosen = match &self.pending_swap {
            Some(PendingSwap {
                ticket: live,
                status: SwapStatus::Ready(alternatives),
            }) if *live == ticket => alternatives.get(index).cloned(),
            _ => None,
        };
        match chosen {
            Some(meal) => self.apply_alternative(ticket, meal),
            None => false,
        }
    }

    pub fn cancel_swap(&mut self) {
        self.pending_swap = None;
    }

    pub fn is_shuffling(&self) -> bool {
        self.shuffling
    }

    /// Marks a shuffle as in progress. Returns `false` if there is no plan
    /// or a shuffle is already running.
    pub fn begin_shuffle(&mut self) -> bool {
        if self.plan.is_none() || self.shuffling {
            return false;
        }
        self.shuffling = true;
        true
    }

    /// Randomly reorders the days and renumbers them `1..=N`.
    ///
    /// Weekly grocery data is left where it is, so after a shuffle the
    /// grocery list for week `w` still belongs to days `7w-6..=7w` even
    /// though different meals now sit there. Any pending swap is dropped
    /// because its target has moved.
    pub fn commit_shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if !self.shuffling {
            return false;
        }
        self.shuffling = false;
        let Some(plan) = self.plan.as_mut() else {
            return false;
        };

        plan.days.shuffle(rng);
        for (index, day) in plan.days.iter_mut().enumerate() {
            day.day = index as u32 + 1;
        }
        self.pending_swap = None;
        true
    }

    fn meal_mut(&mut self, day: u32, slot: MealSlot) -> Option<&mut Meal> {
        self.plan.as_mut()?.day_mut(day)?.meal_mut(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyPlan, WeeklyData};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_plan(days: u32) -> FullMealPlan {
        let days = (1..=days)
            .map(|n| {
                DailyPlan::new(
                    n,
                    Meal::new(format!("Breakfast {}", n), "b").with_times("5 mins", "5 mins"),
                    Meal::new(format!("Lunch {}", n), "l"),
                    Meal::new(format!("Dinner {}", n), "d"),
                )
            })
            .collect();
        let weeks = (1..=4)
            .map(|w| WeeklyData::new(w).with_groceries(vec![format!("Item {}", w)]))
            .collect();
        FullMealPlan::new(days, weeks)
    }

    fn editor_with(days: u32) -> PlanEditor {
        let mut editor = PlanEditor::new();
        editor.initialize(sample_plan(days)).unwrap();
        editor
    }

    fn day(editor: &PlanEditor, n: u32) -> &DailyPlan {
        editor.plan().unwrap().day(n).unwrap()
    }

    #[test]
    fn test_initialize_rejects_invalid_plan_and_keeps_copy() {
        let mut editor = editor_with(3);
        let err = editor.initialize(FullMealPlan::new(vec![], vec![]));
        assert_eq!(err, Err(PlanError::NoDays));
        assert_eq!(editor.plan().unwrap().days.len(), 3);
    }

    #[test]
    fn test_edit_meal_preserves_times() {
        let mut editor = editor_with(3);
        assert!(editor.edit_meal(2, MealSlot::Breakfast, "Waffles", "Use leftovers"));

        let meal = &day(&editor, 2).breakfast;
        assert_eq!(meal.title, "Waffles");
        assert_eq!(meal.prep_notes, "Use leftovers");
        assert_eq!(meal.prep_time.as_deref(), Some("5 mins"));
        assert_eq!(day(&editor, 1).breakfast.title, "Breakfast 1");
    }

    #[test]
    fn test_edit_unknown_day_is_noop() {
        let mut editor = editor_with(3);
        let before = editor.plan().unwrap().clone();
        assert!(!editor.edit_meal(9, MealSlot::Lunch, "X", "Y"));
        assert!(!editor.edit_meal(1, MealSlot::Snack(0), "X", "Y"));
        assert_eq!(editor.plan().unwrap(), &before);
    }

    #[test]
    fn test_add_snack_defaults_times() {
        let mut editor = editor_with(2);
        assert!(editor.add_snack(1, "Cheese Cubes", "Cut small", None, None));
        assert!(editor.add_snack(1, "Muffin", "", Some("2 mins".into()), Some("20 mins".into())));

        let snacks = &day(&editor, 1).snacks;
        assert_eq!(snacks.len(), 2);
        assert_eq!(snacks[0].prep_time.as_deref(), Some("5 mins"));
        assert_eq!(snacks[0].cook_time.as_deref(), Some("0 mins"));
        assert_eq!(snacks[1].cook_time.as_deref(), Some("20 mins"));
        assert!(!editor.add_snack(5, "Nope", "", None, None));
    }

    #[test]
    fn test_remove_snack_shifts_indices() {
        let mut editor = editor_with(1);
        for title in ["A", "B", "C"] {
            editor.add_snack(1, title, "", None, None);
        }

        assert!(editor.remove_snack(1, 1));
        let titles: Vec<&str> = day(&editor, 1).snacks.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "C"]);

        assert!(editor.remove_snack(1, 1));
        let titles: Vec<&str> = day(&editor, 1).snacks.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["A"]);

        assert!(!editor.remove_snack(1, 5));
        assert!(!editor.remove_snack(7, 0));
    }

    #[test]
    fn test_swap_replaces_whole_meal() {
        let mut editor = editor_with(3);
        let request = editor.begin_swap(2, MealSlot::Breakfast).unwrap();
        assert_eq!(request.meal_type, MealType::Breakfast);
        assert_eq!(request.current_meal.title, "Breakfast 2");
        assert_eq!(request.avoid_titles.len(), 9);

        let candidate = Meal::new("Chia Pudding", "Soak overnight").with_times("2 mins", "0 mins");
        assert!(editor.receive_alternatives(request.ticket, vec![candidate.clone()]));
        assert!(editor.choose_alternative(request.ticket, 0));

        assert_eq!(day(&editor, 2).breakfast, candidate);
        assert!(editor.swap_target().is_none());
    }

    #[test]
    fn test_stale_swap_response_is_discarded() {
        let mut editor = editor_with(3);
        let first = editor.begin_swap(1, MealSlot::Lunch).unwrap();
        let second = editor.begin_swap(1, MealSlot::Dinner).unwrap();

        assert!(!editor.receive_alternatives(first.ticket, vec![Meal::new("Late", "")]));
        assert!(!editor.apply_alternative(first.ticket, Meal::new("Late", "")));
        assert_eq!(editor.swap_status(), Some(&SwapStatus::Loading));
        assert_eq!(day(&editor, 1).lunch.title, "Lunch 1");

        assert!(editor.receive_alternatives(second.ticket, vec![Meal::new("Fresh", "")]));
        assert!(editor.choose_alternative(second.ticket, 0));
        assert_eq!(day(&editor, 1).dinner.title, "Fresh");
    }

    #[test]
    fn test_reissued_swap_on_same_slot_invalidates_old_ticket() {
        let mut editor = editor_with(2);
        let first = editor.begin_swap(1, MealSlot::Lunch).unwrap();
        let again = editor.begin_swap(1, MealSlot::Lunch).unwrap();
        assert_ne!(first.ticket, again.ticket);
        assert!(!editor.receive_alternatives(first.ticket, vec![]));
    }

    #[test]
    fn test_cancelled_swap_ignores_late_result() {
        let mut editor = editor_with(2);
        let request = editor.begin_swap(2, MealSlot::Dinner).unwrap();
        editor.cancel_swap();
        assert!(!editor.receive_alternatives(request.ticket, vec![Meal::new("Late", "")]));
        assert!(!editor.apply_alternative(request.ticket, Meal::new("Late", "")));
        assert_eq!(day(&editor, 2).dinner.title, "Dinner 2");
    }

    #[test]
    fn test_removing_earlier_snack_drops_snack_swap() {
        let mut editor = editor_with(1);
        for title in ["A", "B", "C"] {
            editor.add_snack(1, title, "", None, None);
        }
        let request = editor.begin_swap(1, MealSlot::Snack(1)).unwrap();
        assert_eq!(request.current_meal.title, "B");

        assert!(editor.remove_snack(1, 0));
        assert_eq!(editor.swap_target(), None);
        assert!(!editor.receive_alternatives(request.ticket, vec![Meal::new("New", "")]));
        assert!(!editor.choose_alternative(request.ticket, 0));

        let titles: Vec<_> = day(&editor, 1).snacks.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "C"]);
    }

    #[test]
    fn test_removing_later_snack_keeps_snack_swap() {
        let mut editor = editor_with(1);
        for title in ["A", "B"] {
            editor.add_snack(1, title, "", None, None);
        }
        let request = editor.begin_swap(1, MealSlot::Snack(0)).unwrap();
        assert!(editor.remove_snack(1, 1));
        assert_eq!(editor.swap_target(), Some(request.ticket));
    }

    #[test]
    fn test_failed_swap_stays_pending_for_retry() {
        let mut editor = editor_with(2);
        let request = editor.begin_swap(1, MealSlot::Breakfast).unwrap();
        assert!(editor.fail_swap(request.ticket, "timeout"));
        assert_eq!(
            editor.swap_status(),
            Some(&SwapStatus::Failed("timeout".into()))
        );

        let retry = editor.retry_swap().unwrap();
        assert_eq!(retry.ticket.day, 1);
        assert_eq!(retry.ticket.slot, MealSlot::Breakfast);
        assert!(editor.is_loading_alternatives());
    }

    #[test]
    fn test_swap_snack_slot() {
        let mut editor = editor_with(1);
        editor.add_snack(1, "Veggie Sticks", "", None, None);
        let request = editor.begin_swap(1, MealSlot::Snack(0)).unwrap();
        assert_eq!(request.meal_type, MealType::Snack);
        assert!(editor.apply_alternative(request.ticket, Meal::new("Hummus", "")));
        assert_eq!(day(&editor, 1).snacks[0].title, "Hummus");
        assert!(editor.begin_swap(1, MealSlot::Snack(3)).is_none());
    }

    #[test]
    fn test_shuffle_preserves_content_and_renumbers() {
        let mut editor = editor_with(28);
        editor.add_snack(4, "Banana Bites", "", None, None);
        let before = editor.plan().unwrap().clone();

        assert!(editor.begin_shuffle());
        assert!(editor.is_shuffling());
        assert!(!editor.begin_shuffle());
        assert!(editor.commit_shuffle(&mut StdRng::seed_from_u64(7)));
        assert!(!editor.is_shuffling());

        let after = editor.plan().unwrap();
        assert_eq!(after.days.len(), before.days.len());

        let numbers: Vec<u32> = after.days.iter().map(|d| d.day).collect();
        assert_eq!(numbers, (1..=28).collect::<Vec<_>>());

        let content = |p: &FullMealPlan| {
            let mut meals: Vec<String> = p
                .days
                .iter()
                .map(|d| format!("{:?}{:?}{:?}{:?}", d.breakfast, d.lunch, d.dinner, d.snacks))
                .collect();
            meals.sort();
            meals
        };
        assert_eq!(content(after), content(&before));
        assert_ne!(after.days, before.days);
    }

    #[test]
    fn test_shuffle_leaves_weeks_in_place() {
        let mut editor = editor_with(28);
        let weeks_before = editor.plan().unwrap().weeks.clone();
        editor.begin_shuffle();
        editor.commit_shuffle(&mut StdRng::seed_from_u64(42));
        assert_eq!(editor.plan().unwrap().weeks, weeks_before);
    }

    #[test]
    fn test_commit_without_begin_is_noop() {
        let mut editor = editor_with(5);
        let before = editor.plan().unwrap().clone();
        assert!(!editor.commit_shuffle(&mut StdRng::seed_from_u64(1)));
        assert_eq!(editor.plan().unwrap(), &before);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut editor = editor_with(3);
        editor.begin_swap(1, MealSlot::Lunch);
        editor.begin_shuffle();
        editor.reset();
        assert!(editor.plan().is_none());
        assert!(editor.swap_target().is_none());
        assert!(!editor.is_shuffling());
        assert!(!editor.begin_shuffle());
    }
}
