use clap::Args;
use std::path::PathBuf;

use threemeals_core::{Planner, TextExporter};

use super::require_unlocked;

#[derive(Args)]
pub struct ExportArgs {
    /// Directory to write the document to
    #[arg(long, short, default_value = ".")]
    pub out_dir: PathBuf,
}

impl ExportArgs {
    pub fn run(&self, planner: &Planner) -> Result<(), Box<dyn std::error::Error>> {
        require_unlocked(planner)?;
        let path = planner.export(&TextExporter::new(&self.out_dir))?;
        println!("Saved your plan to {}", path.display());
        Ok(())
    }
}
