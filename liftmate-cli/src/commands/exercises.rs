use anyhow::{Context, Result};
use colored::Colorize;

use liftmate::models::Exercise;

use super::AppContext;
use crate::ui::display;

pub fn list_exercises(ctx: &AppContext, muscle: Option<&str>) -> Result<()> {
    let exercises: Vec<Exercise> = ctx
        .storage
        .list_exercises()?
        .into_iter()
        .filter(|e| muscle.map_or(true, |m| e.targets(m)))
        .collect();

    display::heading("Exercises");
    if exercises.is_empty() {
        println!("No exercises found");
        return Ok(());
    }

    for exercise in exercises {
        println!(
            "{:<28} {}",
            exercise.name.bold(),
            exercise.muscles.join(", ").dimmed()
        );
    }

    Ok(())
}

pub fn add_exercise(ctx: &AppContext, name: &str, muscles: Vec<String>) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("Exercise name cannot be empty");
    }

    let existing = ctx.storage.list_exercises()?;
    if existing.iter().any(|e| e.name.eq_ignore_ascii_case(name)) {
        anyhow::bail!("Exercise '{}' already exists", name);
    }

    let muscles = muscles
        .into_iter()
        .map(|m| m.trim().to_lowercase())
        .filter(|m| !m.is_empty())
        .collect();
    let exercise = Exercise::new(name, muscles);
    ctx.storage.save_exercise(&exercise)?;

    println!("✓ Added exercise {}", exercise.name.bold());
    Ok(())
}

pub fn delete_exercise(ctx: &AppContext, id_or_name: &str) -> Result<()> {
    let exercise = ctx
        .storage
        .list_exercises()?
        .into_iter()
        .find(|e| e.id == id_or_name || e.name.eq_ignore_ascii_case(id_or_name))
        .with_context(|| format!("Exercise '{}' not found", id_or_name))?;

    ctx.storage.delete_exercise(&exercise.id)?;
    println!("✓ Deleted exercise {}", exercise.name);
    Ok(())
}
