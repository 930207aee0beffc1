use clap::{Args, Subcommand, ValueEnum};

use threemeals_core::{
    CookingSituation, EatingStyle, Planner, PreferenceField, UnlockState, UserPreferences,
    AGE_BRACKETS,
};

use super::OutputFormat;

/// Preference flags shared by `new` and `prefs set`
#[derive(Args, Default)]
pub struct PrefsArgs {
    /// Child's age bracket (e.g. "18 months")
    #[arg(long)]
    pub age: Option<String>,

    /// Eating style (purees, finger-foods, table-food, mixed)
    #[arg(long)]
    pub eating_style: Option<EatingStyle>,

    /// Cooking situation (surviving, batching, mixed)
    #[arg(long)]
    pub cooking: Option<CookingSituation>,

    /// Favorite foods, comma separated
    #[arg(long)]
    pub favorites: Option<String>,

    /// Nutrition goals, comma separated
    #[arg(long)]
    pub wants_more_of: Option<String>,

    /// Allergies, comma separated ("None" to clear)
    #[arg(long)]
    pub allergies: Option<String>,

    /// Dislikes and gag triggers, comma separated
    #[arg(long)]
    pub dislikes: Option<String>,

    /// Dietary preferences, comma separated
    #[arg(long)]
    pub dietary: Option<String>,
}

impl PrefsArgs {
    fn apply(&self, prefs: &mut UserPreferences) {
        if let Some(age) = &self.age {
            prefs.age = age.trim().to_string();
        }
        if let Some(style) = self.eating_style {
            prefs.eating_style = style;
        }
        if let Some(cooking) = self.cooking {
            prefs.cooking_situation = cooking;
        }
        let lists = [
            (PreferenceField::Favorites, &self.favorites),
            (PreferenceField::WantsMoreOf, &self.wants_more_of),
            (PreferenceField::Allergies, &self.allergies),
            (PreferenceField::HatesGags, &self.dislikes),
            (PreferenceField::DietaryPreferences, &self.dietary),
        ];
        for (field, text) in lists {
            if let Some(text) = text {
                prefs.set_items(field, text);
            }
        }
    }
}

#[derive(Args)]
pub struct NewArgs {
    #[command(flatten)]
    pub prefs: PrefsArgs,
}

impl NewArgs {
    pub async fn run(&self, planner: &mut Planner) -> Result<(), Box<dyn std::error::Error>> {
        let mut prefs = planner.prefs().clone();
        self.prefs.apply(&mut prefs);
        planner.set_preferences(prefs);

        println!("Creating your plan...");
        planner.generate().await?;

        let days = planner.plan().map(|p| p.days.len()).unwrap_or_default();
        println!("Your {}-day meal plan is ready!", days);
        match planner.unlock_state() {
            UnlockState::Unlocked => {
                println!("Run `threemeals calendar` to see this week.");
            }
            _ => {
                println!("Here's a preview. Run `threemeals today` to see day 1.");
                println!("Run `threemeals unlock <EMAIL>` to unlock the full plan.");
            }
        }
        Ok(())
    }
}

/// Multi-choice preference fields
#[derive(Clone, Copy, ValueEnum)]
pub enum FieldArg {
    Favorites,
    WantsMoreOf,
    Allergies,
    Dislikes,
    Dietary,
}

impl From<FieldArg> for PreferenceField {
    fn from(field: FieldArg) -> Self {
        match field {
            FieldArg::Favorites => PreferenceField::Favorites,
            FieldArg::WantsMoreOf => PreferenceField::WantsMoreOf,
            FieldArg::Allergies => PreferenceField::Allergies,
            FieldArg::Dislikes => PreferenceField::HatesGags,
            FieldArg::Dietary => PreferenceField::DietaryPreferences,
        }
    }
}

#[derive(Args)]
pub struct PrefsCommand {
    #[command(subcommand)]
    pub command: PrefsSubcommand,
}

#[derive(Subcommand)]
pub enum PrefsSubcommand {
    /// Show saved preferences
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Update preferences without generating a plan
    Set {
        #[command(flatten)]
        prefs: PrefsArgs,
    },

    /// Add an item to a list, or remove it if already present
    Toggle {
        #[arg(value_enum)]
        field: FieldArg,

        /// Item to toggle ("None" clears the list)
        item: String,
    },

    /// List the choices offered for each question
    Choices,
}

impl PrefsCommand {
    pub fn run(&self, planner: &mut Planner) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            PrefsSubcommand::Show { format } => {
                let prefs = planner.prefs();
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(prefs)?);
                    }
                    OutputFormat::Text => print_prefs(prefs),
                }
                Ok(())
            }
            PrefsSubcommand::Set { prefs: args } => {
                let mut prefs = planner.prefs().clone();
                args.apply(&mut prefs);
                planner.set_preferences(prefs);
                print_prefs(planner.prefs());
                Ok(())
            }
            PrefsSubcommand::Toggle { field, item } => {
                let field = PreferenceField::from(*field);
                planner.toggle_preference(field, item);
                let items = planner.prefs().items(field);
                if items.is_empty() {
                    println!("(none)");
                } else {
                    println!("{}", items.join(", "));
                }
                Ok(())
            }
            PrefsSubcommand::Choices => {
                println!("Age: {}", AGE_BRACKETS.join(", "));
                let fields = [
                    ("Favorites", FieldArg::Favorites),
                    ("Wants more of", FieldArg::WantsMoreOf),
                    ("Allergies", FieldArg::Allergies),
                    ("Dislikes", FieldArg::Dislikes),
                    ("Dietary", FieldArg::Dietary),
                ];
                for (label, field) in fields {
                    println!(
                        "{}: {}",
                        label,
                        PreferenceField::from(field).choices().join(", ")
                    );
                }
                Ok(())
            }
        }
    }
}

fn print_prefs(prefs: &UserPreferences) {
    let or_none = |s: &str| {
        if s.trim().is_empty() {
            "(none)".to_string()
        } else {
            s.to_string()
        }
    };

    println!("Age:            {}", or_none(&prefs.age));
    if prefs.is_infant() {
        println!("Eating style:   {}", prefs.eating_style.description());
    }
    println!("Cooking:        {}", prefs.cooking_situation.description());
    println!("Favorites:      {}", or_none(&prefs.favorites));
    println!("Wants more of:  {}", or_none(&prefs.wants_more_of));
    println!("Allergies:      {}", or_none(&prefs.allergies));
    println!("Dislikes:       {}", or_none(&prefs.hates_gags));
    println!("Dietary:        {}", or_none(&prefs.dietary_preferences));
}
