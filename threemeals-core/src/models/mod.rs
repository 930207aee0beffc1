mod daily_plan;
mod input;
mod meal;
mod meal_plan;
mod meal_type;
mod preferences;
mod weekly_data;

pub use daily_plan::{week_of, DailyPlan, DAYS_PER_WEEK};
pub use input::DailyPlanInput;
pub use meal::{Meal, DEFAULT_SNACK_COOK_TIME, DEFAULT_SNACK_PREP_TIME};
pub use meal_plan::{FullMealPlan, MAX_AVOID_TITLES};
pub use meal_type::{MealSlot, MealType};
pub use preferences::{
    CookingSituation, EatingStyle, PreferenceField, UserPreferences, AGE_BRACKETS,
    ALLERGY_CHOICES, DIETARY_CHOICES, DISLIKE_CHOICES, FAVORITE_CHOICES, NONE_CHOICE,
    WANTS_MORE_OF_CHOICES,
};
pub use weekly_data::WeeklyData;
