use chrono::{DateTime, Utc};
use colored::Colorize;
use std::fmt::Write;

use liftmate::models::{CompletedWorkout, Goal, WeightUnit};
use liftmate::services::history_service::format_duration;
use liftmate::services::WorkoutSummary;

const RULE: &str = "────────────────────────────────";
const BAR_WIDTH: usize = 20;
const FALLBACK_DATE_FORMAT: &str = "%Y-%m-%d";

pub fn heading(title: &str) {
    println!("{}", title.bold());
    println!("{}", RULE);
}

/// Render `date` with a strftime `format`, using `%Y-%m-%d` if the format is invalid
pub fn format_date(date: DateTime<Utc>, format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(format)).is_ok() {
        return out;
    }
    tracing::warn!("Invalid date format {:?}, using {}", format, FALLBACK_DATE_FORMAT);
    date.format(FALLBACK_DATE_FORMAT).to_string()
}

/// Text progress bar such as `[██████░░░░]`
pub fn progress_bar(percentage: f64) -> String {
    let filled = ((percentage.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!(
        "[{}{}]",
        "█".repeat(filled),
        "░".repeat(BAR_WIDTH - filled)
    )
}

pub fn format_weight(weight: f64, unit: WeightUnit) -> String {
    if weight.fract() == 0.0 {
        format!("{:.0} {}", weight, unit)
    } else {
        format!("{:.1} {}", weight, unit)
    }
}

pub fn print_summary(summary: &WorkoutSummary, unit: WeightUnit) {
    println!();
    heading("Workout Summary");
    println!(
        "Exercises: {}   Sets: {}",
        summary.stats.completed_exercises.to_string().cyan(),
        summary.stats.total_sets.to_string().cyan()
    );
    println!(
        "Total volume: {}",
        format_weight(summary.stats.total_volume, unit).green().bold()
    );
    println!(
        "Average per set: {}",
        format_weight(summary.stats.average_weight, unit)
    );

    if !summary.personal_bests.is_empty() {
        println!();
        println!("{}", "Best sets".bold());
        for best in &summary.personal_bests {
            println!(
                "  {} {} x {}",
                best.exercise_name,
                format_weight(best.weight, unit),
                best.reps
            );
        }
    }
    println!();
}

pub fn print_workout_line(workout: &CompletedWorkout, unit: WeightUnit, date_format: &str) {
    println!(
        "  {}  {:<24} {:>6}  {:>3} sets  {}",
        format_date(workout.date, date_format).dimmed(),
        workout.template_name.as_deref().unwrap_or("Workout"),
        format_duration(workout.duration_seconds),
        workout.stats.total_sets,
        format_weight(workout.total_volume(), unit)
    );
    println!("    {}", workout.id.dimmed());
}

pub fn print_goal(goal: &Goal) {
    let status = if goal.completed {
        "✓".green().to_string()
    } else {
        " ".to_string()
    };
    let unit = goal.unit.as_deref().unwrap_or("");

    println!(
        "{} {:<28} {} {:>5.1}%  {}/{} {}",
        status,
        goal.title(),
        progress_bar(goal.progress_percentage()),
        goal.progress_percentage(),
        goal.current,
        goal.target,
        unit
    );
    println!("    {}", goal.id.dimmed());
}
