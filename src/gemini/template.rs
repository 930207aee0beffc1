//! Rotation of a one-week template into a four-week plan.

use threemeals_core::{FullMealPlan, PlanError, WeeklyData, DAYS_PER_WEEK};

/// Weeks the template is rotated across (28 days).
pub const TEMPLATE_WEEKS: u32 = 4;

/// Repeats the template days across [`TEMPLATE_WEEKS`] weeks, numbering
/// them `week * 7 + i + 1`. A template shorter than a week wraps around.
pub fn expand_template(template: FullMealPlan) -> Result<FullMealPlan, PlanError> {
    if template.days.is_empty() {
        return Err(PlanError::NoDays);
    }

    let mut days = Vec::with_capacity((TEMPLATE_WEEKS * DAYS_PER_WEEK) as usize);
    for week in 0..TEMPLATE_WEEKS {
        for i in 0..DAYS_PER_WEEK {
            let mut day = template.days[i as usize % template.days.len()].clone();
            day.day = week * DAYS_PER_WEEK + i + 1;
            days.push(day);
        }
    }

    Ok(FullMealPlan::new(days, pad_weeks(template.weeks, TEMPLATE_WEEKS)))
}

/// Makes `weeks` exactly `count` entries long, numbered `1..=count`.
///
/// Missing weeks copy the grocery list and tips of the last entry (or
/// start empty when there is none).
pub fn pad_weeks(mut weeks: Vec<WeeklyData>, count: u32) -> Vec<WeeklyData> {
    weeks.sort_by_key(|w| w.week);
    while weeks.len() < count as usize {
        let next = weeks.len() as u32 + 1;
        let padded = match weeks.last() {
            Some(last) => WeeklyData::new(next)
                .with_groceries(last.grocery_list.clone())
                .with_tips(last.batch_prep_tips.clone()),
            None => WeeklyData::new(next),
        };
        weeks.push(padded);
    }
    weeks.truncate(count as usize);
    for (index, week) in weeks.iter_mut().enumerate() {
        week.week = index as u32 + 1;
    }
    weeks
}

#[cfg(test)]
mod tests {
    use super::*;
    use threemeals_core::{DailyPlan, Meal};

    fn template(days: u32, weeks: Vec<WeeklyData>) -> FullMealPlan {
        let days = (1..=days)
            .map(|n| {
                DailyPlan::new(
                    n,
                    Meal::new(format!("B{}", n), ""),
                    Meal::new(format!("L{}", n), ""),
                    Meal::new(format!("D{}", n), ""),
                )
            })
            .collect();
        FullMealPlan::new(days, weeks)
    }

    #[test]
    fn test_expand_rotates_week() {
        let plan = expand_template(template(7, vec![WeeklyData::new(1)])).unwrap();
        assert_eq!(plan.days.len(), 28);
        assert_eq!(plan.days[0].day, 1);
        assert_eq!(plan.days[27].day, 28);
        assert_eq!(plan.days[7].breakfast.title, "B1");
        assert_eq!(plan.days[13].dinner.title, "D7");
        assert!(plan.validate().is_ok());
        for week in 1..=4 {
            assert_eq!(plan.days_in_week(week).len(), 7);
        }
    }

    #[test]
    fn test_expand_short_template_wraps() {
        let plan = expand_template(template(3, vec![])).unwrap();
        assert_eq!(plan.days[3].lunch.title, "L1");
        assert_eq!(plan.weeks.len(), 4);
    }

    #[test]
    fn test_expand_empty_template() {
        assert_eq!(
            expand_template(template(0, vec![])).unwrap_err(),
            PlanError::NoDays
        );
    }

    #[test]
    fn test_pad_weeks_copies_last() {
        let weeks = vec![
            WeeklyData::new(1).with_groceries(vec!["Oats".into()]),
            WeeklyData::new(2)
                .with_groceries(vec!["Rice".into()])
                .with_tips(vec!["Batch rice".into()]),
        ];
        let padded = pad_weeks(weeks, 4);
        assert_eq!(padded.len(), 4);
        assert_eq!(
            padded.iter().map(|w| w.week).collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
        assert_eq!(padded[3].grocery_list, vec!["Rice".to_string()]);
        assert_eq!(padded[3].batch_prep_tips, vec!["Batch rice".to_string()]);
    }

    #[test]
    fn test_pad_weeks_truncates_and_renumbers() {
        let weeks = (3..=8).map(WeeklyData::new).collect();
        let padded = pad_weeks(weeks, 4);
        assert_eq!(padded.len(), 4);
        assert_eq!(padded[0].week, 1);
    }
}
