use clap::Args;
use serde_json::json;

use threemeals_core::{DayCard, FullMealPlan, Planner, ViewProjector};

use super::{require_unlocked, OutputFormat};

/// Prints one day's meals with their labels, times and notes.
fn print_card(card: &DayCard) {
    println!("Day {}", card.day);
    for (slot, meal) in &card.meals {
        match meal.time_summary() {
            Some(times) => println!("  {:<10} {} ({})", card.label(*slot), meal.title, times),
            None => println!("  {:<10} {}", card.label(*slot), meal.title),
        }
        if !meal.prep_notes.trim().is_empty() {
            println!("  {:<10} {}", "", meal.prep_notes);
        }
    }
}

fn no_plan() -> Box<dyn std::error::Error> {
    "No meal plan yet. Run `threemeals new --age <AGE>` first.".into()
}

#[derive(Args)]
pub struct TodayArgs {
    /// Day number to show (defaults to the first day)
    #[arg(long, short)]
    pub day: Option<usize>,

    /// Hide snacks
    #[arg(long)]
    pub hide_snacks: bool,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl TodayArgs {
    pub fn run(&self, planner: &Planner) -> Result<(), Box<dyn std::error::Error>> {
        let plan = planner.plan().ok_or_else(no_plan)?;
        let locked = !planner.is_unlocked();

        let mut view = planner.view().clone();
        view.set_show_snacks(!self.hide_snacks);
        let position = match self.day {
            Some(day) if !locked => day.max(1) - 1,
            _ => 0,
        };
        view.go_to(plan, position);
        let Some(today) = view.today(plan) else {
            return Err(no_plan());
        };

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&plan.days[today.index])?);
            }
            OutputFormat::Text => {
                println!("Day {} of {}", today.index + 1, today.total);
                println!();
                print_card(&today.card);
                println!();
                if locked {
                    println!("This is a preview. Run `threemeals unlock <EMAIL>` to see every day.");
                } else {
                    let mut nav = Vec::new();
                    if today.has_prev {
                        nav.push(format!("--day {} for the previous day", today.index));
                    }
                    if today.has_next {
                        nav.push(format!("--day {} for the next day", today.index + 2));
                    }
                    if !nav.is_empty() {
                        println!("Use {}.", nav.join(", "));
                    }
                }
            }
        }
        Ok(())
    }
}

#[derive(Args)]
pub struct CalendarArgs {
    /// Week to show
    #[arg(long, short, default_value = "1")]
    pub week: u32,

    /// Hide snacks
    #[arg(long)]
    pub hide_snacks: bool,

    /// Mark a grocery item as bought in this listing (can be repeated)
    #[arg(long = "check", value_name = "ITEM")]
    pub checked: Vec<String>,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl CalendarArgs {
    pub fn run(&self, planner: &Planner) -> Result<(), Box<dyn std::error::Error>> {
        require_unlocked(planner)?;
        let plan = planner.plan().ok_or_else(no_plan)?;

        let mut view = planner.view().clone();
        view.set_show_snacks(!self.hide_snacks);
        view.select_week(self.week);
        for item in &self.checked {
            view.toggle_grocery(item);
        }

        match self.format {
            OutputFormat::Json => print_week_json(&view, plan)?,
            OutputFormat::Text => print_week(&view, plan),
        }
        Ok(())
    }
}

fn print_week(view: &ViewProjector, plan: &FullMealPlan) {
    let calendar = view.calendar(plan);
    let weeks = plan.day_weeks();

    println!("Week {} of {}", calendar.week, weeks.len());
    println!("{}", "=".repeat(40));
    if calendar.days.is_empty() {
        println!("No days planned for this week.");
        return;
    }
    for card in &calendar.days {
        println!();
        print_card(card);
    }

    if !calendar.grocery_list.is_empty() {
        println!();
        println!("Grocery List");
        for item in calendar.grocery_list {
            let mark = if view.is_checked(item) { "x" } else { " " };
            println!("  [{}] {}", mark, item);
        }
    }

    if !calendar.batch_prep_tips.is_empty() {
        println!();
        println!("Batch Prep Tips");
        for (i, tip) in calendar.batch_prep_tips.iter().enumerate() {
            println!("  {}. {}", i + 1, tip);
        }
    }
}

fn print_week_json(
    view: &ViewProjector,
    plan: &FullMealPlan,
) -> Result<(), Box<dyn std::error::Error>> {
    let calendar = view.calendar(plan);
    let groceries: Vec<_> = calendar
        .grocery_list
        .iter()
        .map(|item| json!({ "item": item, "checked": view.is_checked(item) }))
        .collect();
    let output = json!({
        "week": calendar.week,
        "days": plan.days_in_week(calendar.week),
        "groceryList": groceries,
        "batchPrepTips": calendar.batch_prep_tips,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
