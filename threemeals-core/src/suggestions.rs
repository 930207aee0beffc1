//! Canned snack ideas offered when adding a snack by hand.

use crate::models::Meal;

const SUGGESTED_SNACKS: [(&str, &str); 6] = [
    (
        "Apple Slices with Almond Butter",
        "Slice apple and serve with a small dollop of almond butter.",
    ),
    ("Cheese Cubes", "Cut cheese into small, easy-to-grab cubes."),
    ("Banana Bites", "Slice banana into bite-sized pieces."),
    ("Yogurt with Berries", "Mix plain yogurt with fresh berries."),
    ("Veggie Sticks", "Cut cucumber and carrots into sticks."),
    (
        "Crackers with Hummus",
        "Serve whole grain crackers with a side of hummus.",
    ),
];

/// The suggested snacks, with the default snack prep and cook times.
pub fn suggested_snacks() -> Vec<Meal> {
    SUGGESTED_SNACKS
        .iter()
        .map(|(title, notes)| Meal::snack(*title, *notes, None, None))
        .collect()
}
