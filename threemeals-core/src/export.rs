//! Printable plan document.
//!
//! The document is plain text split into fixed-height pages separated by
//! form feeds, so it prints one page per sheet. Each week gets its own
//! section: a header, the day-by-day meals, then the week's grocery list
//! and prep tips. A closing page ends the document.

use chrono::{Local, NaiveDate};
use std::fs;
use std::path::PathBuf;

use crate::collaborators::DocumentExporter;
use crate::error::ExportError;
use crate::models::{DailyPlan, FullMealPlan, UserPreferences, WeeklyData};

/// Lines per page.
pub const PAGE_LINES: usize = 60;
/// Characters per line.
pub const PAGE_WIDTH: usize = 78;

const PAGE_BREAK: &str = "\u{000C}\n";

/// `3meals-plan-Oct-19-2026.txt`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("3meals-plan-{}.txt", date.format("%b-%-d-%Y"))
}

/// Renders the whole document.
pub fn render_plan(plan: &FullMealPlan, prefs: &UserPreferences) -> String {
    let mut doc = PageWriter::default();
    let weeks = plan.day_weeks();
    let week_count = weeks.last().copied().unwrap_or(0);

    for (i, &week) in weeks.iter().enumerate() {
        if i > 0 {
            doc.break_page();
        }
        write_header(&mut doc, &prefs.age, week, week_count);
        for day in plan.days_in_week(week) {
            write_day(&mut doc, day);
        }
        if let Some(data) = plan.week_data(week) {
            write_week_data(&mut doc, data);
        }
    }

    doc.break_page();
    for _ in 0..PAGE_LINES / 3 {
        doc.line("");
    }
    doc.centered(&format!("Your {}-Day Plan is Ready!", plan.days.len()));
    doc.blank();
    doc.centered("Remember: fed is best. You're doing amazing!");
    doc.centered("- The 3meals Team");

    doc.finish()
}

fn write_header(doc: &mut PageWriter, age: &str, week: u32, week_count: u32) {
    doc.centered("3MEALS");
    doc.centered(&format!("Your {} old's Meal Plan", age));
    doc.centered(&format!("Week {} of {}", week, week_count));
    doc.centered("\"You've got this!\"");
    doc.blank();
    doc.line("-".repeat(PAGE_WIDTH));
    doc.blank();
}

fn write_day(doc: &mut PageWriter, day: &DailyPlan) {
    // Keep the day heading with at least its breakfast
    doc.ensure_room(4);
    doc.line(format!("Day {}", day.day));

    let snack_count = day.snacks.len();
    for (slot, meal) in day.all_meals() {
        let label = format!("  {}: {}", slot.label(snack_count), meal.title);
        match meal.time_summary() {
            Some(times) if label.len() + times.len() + 2 <= PAGE_WIDTH => {
                let pad = PAGE_WIDTH - label.len() - times.len();
                doc.line(format!("{}{}{}", label, " ".repeat(pad), times));
            }
            Some(times) => {
                doc.line(label);
                doc.line(format!("{:>width$}", times, width = PAGE_WIDTH));
            }
            None => doc.line(label),
        }
        for note in wrap(&meal.prep_notes, PAGE_WIDTH - 6) {
            doc.line(format!("      {}", note));
        }
    }
    doc.blank();
}

fn write_week_data(doc: &mut PageWriter, data: &WeeklyData) {
    doc.ensure_room(6);
    doc.line(format!("Grocery List - Week {}", data.week));
    doc.blank();
    for item in &data.grocery_list {
        doc.line(format!("  [ ]  {}", item));
    }
    doc.blank();

    doc.ensure_room(4);
    doc.line("Batch Prep Tips");
    doc.blank();
    for (i, tip) in data.batch_prep_tips.iter().enumerate() {
        let prefix = format!("  {}. ", i + 1);
        let indent = " ".repeat(prefix.len());
        for (n, line) in wrap(tip, PAGE_WIDTH - prefix.len()).into_iter().enumerate() {
            if n == 0 {
                doc.line(format!("{}{}", prefix, line));
            } else {
                doc.line(format!("{}{}", indent, line));
            }
        }
    }
}

/// Greedy word wrap. Words longer than `width` get a line of their own.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[derive(Default)]
struct PageWriter {
    pages: Vec<Vec<String>>,
    current: Vec<String>,
}

impl PageWriter {
    fn line(&mut self, text: impl Into<String>) {
        if self.current.len() >= PAGE_LINES {
            self.break_page();
        }
        self.current.push(text.into());
    }

    fn blank(&mut self) {
        // Blank lines never start a page
        if self.current.is_empty() && !self.pages.is_empty() {
            return;
        }
        self.line("");
    }

    fn centered(&mut self, text: &str) {
        let line = format!("{:^width$}", text, width = PAGE_WIDTH);
        self.line(line.trim_end());
    }

    fn ensure_room(&mut self, lines: usize) {
        if PAGE_LINES - self.current.len().min(PAGE_LINES) < lines {
            self.break_page();
        }
    }

    fn break_page(&mut self) {
        if !self.current.is_empty() {
            self.pages.push(std::mem::take(&mut self.current));
        }
    }

    fn finish(mut self) -> String {
        self.break_page();
        self.pages
            .iter()
            .map(|page| {
                let mut text = page.join("\n");
                text.push('\n');
                text
            })
            .collect::<Vec<_>>()
            .join(PAGE_BREAK)
    }
}

/// Writes the document as a text file into a directory.
#[derive(Debug, Clone)]
pub struct TextExporter {
    out_dir: PathBuf,
}

impl TextExporter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }
}

impl DocumentExporter for TextExporter {
    fn export(
        &self,
        plan: &FullMealPlan,
        prefs: &UserPreferences,
    ) -> Result<PathBuf, ExportError> {
        let path = self
            .out_dir
            .join(export_file_name(Local::now().date_naive()));
        fs::create_dir_all(&self.out_dir).map_err(|source| ExportError::Io {
            path: self.out_dir.clone(),
            source,
        })?;
        fs::write(&path, render_plan(plan, prefs)).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::info!("Exported meal plan to {}", path.display());
        Ok(path)
    }
}
