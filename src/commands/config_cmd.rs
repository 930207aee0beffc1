use clap::{Args, Subcommand};
use std::fmt::Display;

use crate::config::{Config, ConfigValue};

use super::OutputFormat;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

fn print_value<T>(name: &str, value: &ConfigValue<T>, shown: impl Display) {
    println!("{}: {}", name, shown);
    println!("  source: {}", value.source);
    println!();
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        if let Some(path) = &config.config_file {
                            println!("Config file: {}", path.display());
                        } else {
                            println!(
                                "Config file: {} (not found)",
                                Config::default_config_path().display()
                            );
                        }
                        println!();

                        print_value(
                            "data_dir",
                            &config.data_dir,
                            config.data_dir.value.display(),
                        );
                        print_value(
                            "server_url",
                            &config.server_url,
                            config.server_url.value.as_deref().unwrap_or("(none)"),
                        );
                        let api_key = if config.api_key.value.is_some() {
                            "********"
                        } else {
                            "(not set)"
                        };
                        print_value("gemini.api_key", &config.api_key, api_key);
                        print_value("gemini.model", &config.model, &config.model.value);
                        print_value("plan.days", &config.plan_days, config.plan_days.value);
                        print_value(
                            "plan.strategy",
                            &config.plan_strategy,
                            config.plan_strategy.value,
                        );
                        print_value(
                            "storage.backend",
                            &config.storage_backend,
                            config.storage_backend.value,
                        );
                        print_value(
                            "storage.database_path",
                            &config.database_path,
                            config.database_path.value.display(),
                        );
                        print_value("server.port", &config.port, config.port.value);
                    }
                }
                Ok(())
            }
        }
    }
}
