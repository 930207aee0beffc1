use clap::{Args, Subcommand};
use std::io::{self, Write};

use threemeals_core::{suggested_snacks, Meal, MealSlot, Planner, SwapStatus};

use super::require_unlocked;

#[derive(Args)]
pub struct EditArgs {
    /// Day number
    #[arg(long, short)]
    pub day: u32,

    /// Meal slot (breakfast, lunch, dinner, snack, snack-N)
    #[arg(long, short)]
    pub slot: MealSlot,

    /// New title
    #[arg(long, short)]
    pub title: String,

    /// New prep notes
    #[arg(long, short, default_value = "")]
    pub notes: String,
}

impl EditArgs {
    pub fn run(&self, planner: &mut Planner) -> Result<(), Box<dyn std::error::Error>> {
        require_unlocked(planner)?;
        if self.title.trim().is_empty() {
            return Err("Title cannot be empty".into());
        }
        if !planner.edit_meal(self.day, self.slot, self.title.trim(), self.notes.trim()) {
            return Err(format!("Day {} has no {}", self.day, self.slot).into());
        }
        println!("Updated day {} {}: {}", self.day, self.slot, self.title.trim());
        Ok(())
    }
}

#[derive(Args)]
pub struct SwapArgs {
    /// Day number
    #[arg(long, short)]
    pub day: u32,

    /// Meal slot (breakfast, lunch, dinner, snack, snack-N)
    #[arg(long, short)]
    pub slot: MealSlot,

    /// Pick this alternative (1-based) instead of prompting
    #[arg(long)]
    pub pick: Option<usize>,
}

impl SwapArgs {
    pub async fn run(&self, planner: &mut Planner) -> Result<(), Box<dyn std::error::Error>> {
        require_unlocked(planner)?;

        println!("Finding alternatives...");
        let ticket = planner.swap(self.day, self.slot).await?;
        let alternatives = match planner.swap_status() {
            Some(SwapStatus::Ready(alternatives)) => alternatives.clone(),
            _ => return Err("No alternatives were returned".into()),
        };

        for (i, meal) in alternatives.iter().enumerate() {
            match meal.time_summary() {
                Some(times) => println!("  {}. {} ({})", i + 1, meal.title, times),
                None => println!("  {}. {}", i + 1, meal.title),
            }
            if !meal.prep_notes.trim().is_empty() {
                println!("     {}", meal.prep_notes);
            }
        }

        let choice = match self.pick {
            Some(n) => Some(n),
            None => {
                print!(
                    "Choose an alternative [1-{}], or Enter to keep the current meal: ",
                    alternatives.len()
                );
                io::stdout().flush()?;

                let mut input = String::new();
                io::stdin().read_line(&mut input)?;
                let input = input.trim();
                if input.is_empty() {
                    None
                } else {
                    Some(
                        input
                            .parse::<usize>()
                            .map_err(|_| format!("Invalid choice '{}'", input))?,
                    )
                }
            }
        };

        let Some(n) = choice else {
            planner.cancel_swap();
            println!("Swap cancelled.");
            return Ok(());
        };
        if n == 0 || n > alternatives.len() {
            planner.cancel_swap();
            return Err(format!("Choose a number between 1 and {}", alternatives.len()).into());
        }

        planner.choose_alternative(ticket, n - 1)?;
        println!(
            "Swapped day {} {} for {}",
            self.day,
            self.slot,
            alternatives[n - 1].title
        );
        Ok(())
    }
}

#[derive(Args)]
pub struct SnackCommand {
    #[command(subcommand)]
    pub command: SnackSubcommand,
}

#[derive(Subcommand)]
pub enum SnackSubcommand {
    /// Add a snack to a day
    Add {
        /// Day number
        #[arg(long, short)]
        day: u32,

        /// Snack title (or use --suggestion)
        #[arg(long, short, required_unless_present = "suggestion")]
        title: Option<String>,

        /// Prep notes
        #[arg(long, short, default_value = "")]
        notes: String,

        /// Prep time (defaults to "5 mins")
        #[arg(long)]
        prep_time: Option<String>,

        /// Cook time (defaults to "0 mins")
        #[arg(long)]
        cook_time: Option<String>,

        /// Add a suggested snack by number (see `snack suggestions`)
        #[arg(long, conflicts_with = "title")]
        suggestion: Option<usize>,
    },

    /// Remove a snack from a day
    Remove {
        /// Day number
        #[arg(long, short)]
        day: u32,

        /// Snack number within the day (1-based)
        #[arg(long, short, default_value = "1")]
        index: usize,
    },

    /// List suggested snacks
    Suggestions,
}

impl SnackCommand {
    pub fn run(&self, planner: &mut Planner) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            SnackSubcommand::Add {
                day,
                title,
                notes,
                prep_time,
                cook_time,
                suggestion,
            } => {
                require_unlocked(planner)?;
                let snack = match (suggestion, title) {
                    (Some(n), _) => {
                        let suggestions = suggested_snacks();
                        n.checked_sub(1)
                            .and_then(|i| suggestions.get(i).cloned())
                            .ok_or_else(|| format!("No suggested snack #{}", n))?
                    }
                    (None, Some(title)) if !title.trim().is_empty() => Meal::snack(
                        title.trim(),
                        notes.trim(),
                        prep_time.clone(),
                        cook_time.clone(),
                    ),
                    _ => return Err("Snack title cannot be empty".into()),
                };

                let added = planner.add_snack(
                    *day,
                    snack.title.clone(),
                    snack.prep_notes,
                    snack.prep_time,
                    snack.cook_time,
                );
                if !added {
                    return Err(format!("Day {} not found", day).into());
                }
                println!("Added snack to day {}: {}", day, snack.title);
                Ok(())
            }
            SnackSubcommand::Remove { day, index } => {
                require_unlocked(planner)?;
                let removed = index
                    .checked_sub(1)
                    .is_some_and(|i| planner.remove_snack(*day, i));
                if !removed {
                    return Err(format!("Day {} has no snack #{}", day, index).into());
                }
                println!("Removed snack #{} from day {}", index, day);
                Ok(())
            }
            SnackSubcommand::Suggestions => {
                for (i, snack) in suggested_snacks().iter().enumerate() {
                    println!("  {}. {}", i + 1, snack.title);
                    if !snack.prep_notes.is_empty() {
                        println!("     {}", snack.prep_notes);
                    }
                }
                Ok(())
            }
        }
    }
}
