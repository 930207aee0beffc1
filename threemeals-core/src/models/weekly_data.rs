use serde::{Deserialize, Serialize};

/// Grocery list and batch prep tips for one calendar week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyData {
    pub week: u32,
    #[serde(default)]
    pub grocery_list: Vec<String>,
    #[serde(default)]
    pub batch_prep_tips: Vec<String>,
}

impl WeeklyData {
    pub fn new(week: u32) -> Self {
        Self {
            week,
            grocery_list: Vec::new(),
            batch_prep_tips: Vec::new(),
        }
    }

    pub fn with_groceries(mut self, items: Vec<String>) -> Self {
        self.grocery_list = items;
        self
    }

    pub fn with_tips(mut self, tips: Vec<String>) -> Self {
        self.batch_prep_tips = tips;
        self
    }

    /// Drops repeated grocery items (case-insensitive), keeping first occurrence.
    pub fn dedup_groceries(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.grocery_list
            .retain(|item| seen.insert(item.trim().to_lowercase()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_groceries() {
        let mut week = WeeklyData::new(1).with_groceries(vec![
            "Bananas".into(),
            "Oats".into(),
            "bananas ".into(),
        ]);
        week.dedup_groceries();
        assert_eq!(week.grocery_list, vec!["Bananas", "Oats"]);
    }

    #[test]
    fn test_json_field_names() {
        let week = WeeklyData::new(2).with_tips(vec!["Cook rice on Sunday".into()]);
        let json = serde_json::to_value(&week).unwrap();
        assert_eq!(json["week"], 2);
        assert_eq!(json["batchPrepTips"][0], "Cook rice on Sunday");
        assert!(json["groceryList"].as_array().unwrap().is_empty());
    }
}
