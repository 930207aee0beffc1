//! JSON response schemas sent with each request.

use serde_json::{json, Value};

fn meal(with_times: bool) -> Value {
    if with_times {
        json!({
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING" },
                "prepNotes": { "type": "STRING" },
                "prepTime": { "type": "STRING" },
                "cookTime": { "type": "STRING" }
            },
            "required": ["title", "prepNotes", "prepTime", "cookTime"]
        })
    } else {
        json!({
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING" },
                "prepNotes": { "type": "STRING" }
            },
            "required": ["title", "prepNotes"]
        })
    }
}

/// `{ days: [...], weeks: [...] }`, one snack per day.
pub fn meal_plan() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "days": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "day": { "type": "INTEGER" },
                        "breakfast": meal(false),
                        "lunch": meal(false),
                        "dinner": meal(false),
                        "snack": meal(false)
                    },
                    "required": ["day", "breakfast", "lunch", "dinner", "snack"]
                }
            },
            "weeks": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "week": { "type": "INTEGER" },
                        "groceryList": { "type": "ARRAY", "items": { "type": "STRING" } },
                        "batchPrepTips": { "type": "ARRAY", "items": { "type": "STRING" } }
                    },
                    "required": ["week", "groceryList", "batchPrepTips"]
                }
            }
        },
        "required": ["days", "weeks"]
    })
}

/// An array of meals carrying prep and cook times.
pub fn alternatives() -> Value {
    json!({
        "type": "ARRAY",
        "items": meal(true)
    })
}
