mod account;
mod config_cmd;
mod edit;
mod export_cmd;
mod plan;
mod view;

pub use account::{EmailsArgs, RetrieveArgs, UnlockArgs};
pub use config_cmd::ConfigCommand;
pub use edit::{EditArgs, SnackCommand, SwapArgs};
pub use export_cmd::ExportArgs;
pub use plan::{NewArgs, PrefsCommand};
pub use view::{CalendarArgs, TodayArgs};

use clap::ValueEnum;

use threemeals_core::Planner;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Fails with a hint when the plan is still behind the email gate.
fn require_unlocked(planner: &Planner) -> Result<(), Box<dyn std::error::Error>> {
    if planner.plan().is_none() {
        return Err("No meal plan yet. Run `threemeals new --age <AGE>` first.".into());
    }
    if !planner.is_unlocked() {
        return Err(
            "Your plan is locked. Run `threemeals unlock <EMAIL>` to see all of it.".into(),
        );
    }
    Ok(())
}
