use clap::Args;

use threemeals_core::{Planner, RemotePersistence};

use super::OutputFormat;

#[derive(Args)]
pub struct UnlockArgs {
    /// Email to save the plan under
    pub email: String,
}

impl UnlockArgs {
    pub async fn run(&self, planner: &mut Planner) -> Result<(), Box<dyn std::error::Error>> {
        if planner.is_unlocked() {
            println!("Your plan is already unlocked ({}).", planner.email());
            return Ok(());
        }
        planner.submit_email(&self.email)?;
        // Saving is best-effort; failures are logged, the unlock stands.
        planner.deliver_events().await;

        println!("Unlocked! Your plan is saved to {}.", planner.email());
        println!("Run `threemeals calendar` to see week 1.");
        Ok(())
    }
}

#[derive(Args)]
pub struct RetrieveArgs {
    /// Email the plan was saved under
    pub email: String,
}

impl RetrieveArgs {
    pub async fn run(&self, planner: &mut Planner) -> Result<(), Box<dyn std::error::Error>> {
        println!("Looking up your plan...");
        planner.retrieve_plan(&self.email).await?;

        let days = planner.plan().map(|p| p.days.len()).unwrap_or_default();
        println!("Welcome back! Loaded your {}-day plan.", days);
        Ok(())
    }
}

#[derive(Args)]
pub struct EmailsArgs {
    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl EmailsArgs {
    pub async fn run(
        &self,
        persistence: &dyn RemotePersistence,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let list = persistence.list_emails().await?;
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&list)?);
            }
            OutputFormat::Text => {
                if list.emails.is_empty() {
                    println!("No emails saved yet.");
                    return Ok(());
                }
                println!("{:<25} EMAIL", "SAVED AT");
                println!("{}", "-".repeat(60));
                for entry in &list.emails {
                    println!(
                        "{:<25} {}",
                        entry.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
                        entry.email
                    );
                }
                println!();
                println!("{} saved", list.count);
            }
        }
        Ok(())
    }
}
