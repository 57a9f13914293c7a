use anyhow::{Context, Result};
use chrono::Utc;
use colored::Colorize;

use liftmate::services::history_service::{self, format_duration, Period};

use super::{confirm, AppContext};
use crate::ui::display;

pub fn list_workouts(
    ctx: &AppContext,
    search: Option<&str>,
    period: &str,
    limit: usize,
) -> Result<()> {
    let period: Period = period.parse()?;
    let unit = ctx.storage.get_settings()?.weight_unit;
    let workouts = ctx.storage.list_workouts()?;

    let mut matching = history_service::filter_workouts(&workouts, search, period, Utc::now());
    matching.truncate(limit);

    display::heading(&format!("Workout History ({})", period));
    if matching.is_empty() {
        println!("No workouts found");
        return Ok(());
    }

    for week in history_service::group_by_week(&matching) {
        println!(
            "{}",
            format!(
                "Week of {} - {}",
                week.week_start.format("%b %d"),
                week.week_end().format("%b %d")
            )
            .bold()
        );
        for workout in &week.workouts {
            display::print_workout_line(workout, unit, &ctx.config.ui.date_format);
        }
        println!();
    }

    Ok(())
}

pub fn show_workout(ctx: &AppContext, id: &str) -> Result<()> {
    let workout = ctx
        .storage
        .get_workout(id)?
        .with_context(|| format!("Workout {} not found", id))?;
    let unit = ctx.storage.get_settings()?.weight_unit;

    display::heading(workout.template_name.as_deref().unwrap_or("Workout"));
    println!(
        "Date: {}",
        display::format_date(workout.date, &ctx.config.ui.date_format)
    );
    println!("Duration: {}", format_duration(workout.duration_seconds));
    println!(
        "Volume: {}   Sets: {}",
        display::format_weight(workout.total_volume(), unit).green(),
        workout.stats.total_sets
    );
    println!();

    for log in &workout.exercises {
        println!(
            "{}  {}",
            log.exercise_name.bold(),
            display::format_weight(log.volume(), unit).dimmed()
        );
        for (i, set) in log.sets.iter().enumerate() {
            println!(
                "  Set {}: {} x {}",
                i + 1,
                display::format_weight(set.weight, unit),
                set.reps
            );
        }
    }

    Ok(())
}

pub fn delete_workout(ctx: &AppContext, id: &str, force: bool) -> Result<()> {
    if ctx.storage.get_workout(id)?.is_none() {
        anyhow::bail!("Workout {} not found", id);
    }

    if !confirm("Delete this workout?", force)? {
        println!("Cancelled");
        return Ok(());
    }

    ctx.storage.delete_workout(id)?;
    println!("✓ Deleted workout {}", id);
    Ok(())
}
