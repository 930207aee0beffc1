use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use threemeals::commands::{
    CalendarArgs, ConfigCommand, EditArgs, EmailsArgs, ExportArgs, NewArgs, PrefsCommand,
    RetrieveArgs, SnackCommand, SwapArgs, TodayArgs, UnlockArgs,
};
use threemeals::config::Config;
use threemeals::gemini::model_from_config;
use threemeals::persistence::{open_backend, HttpBackend};
use threemeals_core::{Collaborators, FileStorage, Planner, SessionStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "threemeals")]
#[command(version)]
#[command(about = "A 30-day meal plan for your toddler", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer the setup questions and generate a new plan
    New(NewArgs),

    /// Show one day of the plan
    Today(TodayArgs),

    /// Show a week of the plan with its grocery list
    Calendar(CalendarArgs),

    /// Change a meal's title and notes
    Edit(EditArgs),

    /// Replace a meal with one of a few alternatives
    Swap(SwapArgs),

    /// Add, remove or browse snacks
    Snack(SnackCommand),

    /// Shuffle the order of the days
    Shuffle,

    /// Unlock the full plan by saving it to your email
    Unlock(UnlockArgs),

    /// Load a plan saved under your email
    Retrieve(RetrieveArgs),

    /// Write the plan to a printable document
    Export(ExportArgs),

    /// Start over: forget the plan, email and preferences
    Reset {
        /// Skip confirmation
        #[arg(long, short)]
        force: bool,
    },

    /// View or change preferences
    Prefs(PrefsCommand),

    /// List every email a plan was saved under
    Emails(EmailsArgs),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "threemeals=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Wires the collaborators: a hosted API when `server_url` is set,
/// otherwise the model directly plus a local backend.
async fn collaborators(config: &Config) -> Result<Collaborators, Box<dyn std::error::Error>> {
    if let Some(url) = &config.server_url.value {
        let backend = Arc::new(HttpBackend::new(url.as_str()));
        return Ok(Collaborators {
            generator: backend.clone(),
            alternatives: backend.clone(),
            persistence: backend,
        });
    }

    let (generator, alternatives) = model_from_config(config);
    Ok(Collaborators {
        generator,
        alternatives,
        persistence: open_backend(config).await?,
    })
}

/// Restores the saved session around freshly wired collaborators.
async fn planner(config: &Config) -> Result<Planner, Box<dyn std::error::Error>> {
    let session = SessionStore::new(FileStorage::new(config.data_dir.value.clone()));
    Ok(Planner::new(collaborators(config).await?, session))
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;

    let Some(command) = cli.command else {
        println!("Use --help to see available commands");
        return Ok(());
    };

    match command {
        Commands::New(cmd) => cmd.run(&mut planner(&config).await?).await?,
        Commands::Today(cmd) => cmd.run(&planner(&config).await?)?,
        Commands::Calendar(cmd) => cmd.run(&planner(&config).await?)?,
        Commands::Edit(cmd) => cmd.run(&mut planner(&config).await?)?,
        Commands::Swap(cmd) => cmd.run(&mut planner(&config).await?).await?,
        Commands::Snack(cmd) => cmd.run(&mut planner(&config).await?)?,
        Commands::Shuffle => {
            let mut planner = planner(&config).await?;
            println!("Shuffling...");
            planner.shuffle().await?;
            println!("Days shuffled.");
        }
        Commands::Unlock(cmd) => cmd.run(&mut planner(&config).await?).await?,
        Commands::Retrieve(cmd) => cmd.run(&mut planner(&config).await?).await?,
        Commands::Export(cmd) => cmd.run(&planner(&config).await?)?,
        Commands::Reset { force } => {
            if !force {
                print!("Forget your plan, email and preferences? [y/N] ");
                io::stdout().flush()?;

                let mut input = String::new();
                io::stdin().read_line(&mut input)?;

                if !input.trim().eq_ignore_ascii_case("y") {
                    println!("Reset cancelled.");
                    return Ok(());
                }
            }
            planner(&config).await?.reset();
            println!("Starting fresh.");
        }
        Commands::Prefs(cmd) => cmd.run(&mut planner(&config).await?)?,
        Commands::Emails(cmd) => {
            let collaborators = collaborators(&config).await?;
            cmd.run(collaborators.persistence.as_ref()).await?;
        }
        Commands::Config(cmd) => cmd.run(&config)?,
    }

    Ok(())
}
