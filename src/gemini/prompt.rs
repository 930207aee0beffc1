use threemeals_core::{Meal, MealType, UserPreferences, MAX_AVOID_TITLES};

fn or_none(value: &str) -> &str {
    if value.trim().is_empty() {
        "none"
    } else {
        value
    }
}

fn child_details(prefs: &UserPreferences) -> String {
    let mut details = String::new();
    if prefs.is_infant() {
        details.push_str(&format!("Eating Style: {}\n", prefs.eating_style.description()));
    }
    details.push_str(&format!("Favorites: {}\n", or_none(&prefs.favorites)));
    details.push_str(&format!("Wants more of: {}\n", or_none(&prefs.wants_more_of)));
    details.push_str(&format!("ALLERGIES (AVOID): {}\n", or_none(&prefs.allergies)));
    details.push_str(&format!("Dislikes: {}\n", or_none(&prefs.hates_gags)));
    details.push_str(&format!(
        "Dietary preferences: {}\n",
        or_none(&prefs.dietary_preferences)
    ));
    details.push_str(&format!("Cooking: {}\n", prefs.cooking_situation.description()));
    details
}

/// Prompt asking for every day of the plan at once.
pub fn full_plan(prefs: &UserPreferences, days: u32) -> String {
    let weeks = days.div_ceil(7);
    format!(
        "Create a {days}-day meal plan for a {age} child.\n\n\
         {details}\n\
         Rules:\n\
         1. {days} days: Breakfast, Lunch, Dinner, Snack each day. Number days 1 to {days}.\n\
         2. NO REPEATS for main meals.\n\
         3. Age-appropriate textures (purees for 6-9mo, soft foods for 1yr+, table food for 2yr+).\n\
         4. BRIEF prep notes (1 short sentence max, under 50 characters).\n\
         5. {weeks} weekly grocery lists (10 key items max each), one per 7-day block.\n\
         6. 2 batch prep tips per week max.\n",
        days = days,
        age = prefs.age,
        details = child_details(prefs),
        weeks = weeks,
    )
}

/// Prompt asking for one week that will be rotated across four.
pub fn template_plan(prefs: &UserPreferences) -> String {
    format!(
        "Create a 7-day meal plan template for a {age} child, plus grocery lists and prep tips for 4 weeks.\n\n\
         {details}\n\
         Rules:\n\
         1. Create 7 unique days of meals (these will be rotated across 4 weeks).\n\
         2. No repeated main meals within the 7 days.\n\
         3. Age-appropriate textures.\n\
         4. Brief prep notes for each meal.\n\
         5. Create 4 weeks of grocery lists (15-20 items each) - vary items slightly each week.\n\
         6. Include 4-5 practical batch prep tips for each of the 4 weeks.\n",
        age = prefs.age,
        details = child_details(prefs),
    )
}

/// Prompt asking for three replacements for one meal.
pub fn alternatives(
    prefs: &UserPreferences,
    meal_type: MealType,
    current: &Meal,
    avoid_titles: &[String],
) -> String {
    let avoid: Vec<&str> = avoid_titles
        .iter()
        .take(MAX_AVOID_TITLES)
        .map(String::as_str)
        .collect();
    format!(
        "Provide 3 alternative {meal_type} ideas for a child who is {age} old.\n\
         Current meal being replaced: \"{current}\".\n\
         Eating style: {style}.\n\
         Cooking situation: {cooking}.\n\
         ALLERGIES (AVOID): {allergies}.\n\n\
         CRITICAL: Avoid these existing meals to prevent repeats: {avoid}.\n\n\
         Ensure alternatives are safe, age-appropriate, and follow dietary preferences: {dietary}.\n\
         Include prep time and cook time estimates (e.g., \"5 mins\", \"10 mins\"). Use \"0 mins\" for no-cook items.\n\
         Tone: Supportive and realistic.\n",
        meal_type = meal_type,
        age = prefs.age,
        current = current.title,
        style = prefs.eating_style.description(),
        cooking = prefs.cooking_situation.description(),
        allergies = or_none(&prefs.allergies),
        avoid = avoid.join(", "),
        dietary = or_none(&prefs.dietary_preferences),
    )
}
