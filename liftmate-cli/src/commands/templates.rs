use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::{Input, Select};

use liftmate::models::{Exercise, PlannedExercise, SetSpec, WorkoutTemplate};

use super::template_parser::{PlannedLine, TemplateParser};
use super::{confirm, AppContext};
use crate::ui::display;

pub fn list_templates(ctx: &AppContext) -> Result<()> {
    let templates = ctx.storage.list_templates()?;

    display::heading("Templates");
    if templates.is_empty() {
        println!("No templates yet. Create one with: liftmate templates create");
        return Ok(());
    }

    for template in templates {
        let last_used = template
            .last_used
            .map(|d| display::format_date(d, &ctx.config.ui.date_format))
            .unwrap_or_else(|| "never".to_string());

        println!(
            "{:<28} {:>2} exercises  {:>3} sets  last used {}",
            template.name.bold(),
            template.exercises.len(),
            template.total_sets(),
            last_used
        );
        println!("    {}", template.id.dimmed());
    }

    Ok(())
}

pub fn show_template(ctx: &AppContext, id_or_name: &str) -> Result<()> {
    let template = find(ctx, id_or_name)?;
    let default_rest = ctx.config.session.default_rest_seconds;

    display::heading(&template.name);
    if let Some(ref description) = template.description {
        println!("{}", description);
    }
    if let Some(ref category) = template.category {
        println!("Category: {}", category);
    }
    println!();

    for exercise in &template.exercises {
        println!("{}", exercise.exercise_name.bold());
        for (i, set) in exercise.sets.iter().enumerate() {
            println!(
                "  Set {}: {} reps, rest {}s",
                i + 1,
                set.target_reps,
                set.rest_or(default_rest)
            );
        }
    }

    Ok(())
}

pub fn create_template(
    ctx: &AppContext,
    name: Option<String>,
    description: Option<String>,
    lines: &[String],
) -> Result<()> {
    let name = match name {
        Some(name) => name,
        None => Input::new().with_prompt("Template name").interact_text()?,
    };
    if name.trim().is_empty() {
        anyhow::bail!("Template name cannot be empty");
    }

    let catalogue = ctx.storage.list_exercises()?;
    let exercises = if lines.is_empty() {
        prompt_exercises(&catalogue)?
    } else {
        let parser = TemplateParser::new();
        lines
            .iter()
            .map(|line| planned_from_line(&catalogue, parser.parse(line)?))
            .collect::<Result<Vec<_>>>()?
    };

    if exercises.is_empty() {
        anyhow::bail!("A template needs at least one exercise");
    }

    let mut template = WorkoutTemplate::new(name.trim());
    template.description = description;
    template.exercises = exercises;
    ctx.storage.save_template(&template)?;

    println!(
        "✓ Created template {} with {} sets",
        template.name.bold(),
        template.total_sets()
    );
    println!("    {}", template.id.dimmed());
    Ok(())
}

pub fn delete_template(ctx: &AppContext, id_or_name: &str, force: bool) -> Result<()> {
    let template = find(ctx, id_or_name)?;

    if !confirm(&format!("Delete template '{}'?", template.name), force)? {
        println!("Cancelled");
        return Ok(());
    }

    ctx.storage.delete_template(&template.id)?;
    println!("✓ Deleted template {}", template.name);
    Ok(())
}

fn find(ctx: &AppContext, id_or_name: &str) -> Result<WorkoutTemplate> {
    ctx.storage
        .find_template(id_or_name)?
        .with_context(|| format!("Template '{}' not found", id_or_name))
}

fn lookup<'a>(catalogue: &'a [Exercise], name: &str) -> Result<&'a Exercise> {
    catalogue
        .iter()
        .find(|e| e.name.eq_ignore_ascii_case(name) || e.id == name)
        .with_context(|| {
            format!(
                "Exercise '{}' is not in the catalogue. Add it with: liftmate exercises add",
                name
            )
        })
}

fn planned_from_line(catalogue: &[Exercise], line: PlannedLine) -> Result<PlannedExercise> {
    let exercise = lookup(catalogue, &line.exercise)?;

    Ok(PlannedExercise {
        exercise_id: exercise.id.clone(),
        exercise_name: exercise.name.clone(),
        sets: vec![
            SetSpec {
                target_reps: line.reps,
                rest_seconds: line.rest_seconds,
            };
            line.sets as usize
        ],
    })
}

fn prompt_exercises(catalogue: &[Exercise]) -> Result<Vec<PlannedExercise>> {
    if catalogue.is_empty() {
        anyhow::bail!("The exercise catalogue is empty");
    }

    let mut items: Vec<String> = catalogue.iter().map(|e| e.name.clone()).collect();
    items.push("Done".to_string());
    let done = items.len() - 1;

    let mut planned = Vec::new();
    loop {
        let selection = Select::new()
            .with_prompt("Add exercise")
            .items(&items)
            .default(done)
            .interact()?;
        if selection == done {
            break;
        }

        let sets: u32 = Input::new().with_prompt("Sets").default(3).interact_text()?;
        let reps: u32 = Input::new().with_prompt("Reps per set").default(10).interact_text()?;
        let rest: u32 = Input::new()
            .with_prompt("Rest seconds")
            .default(60)
            .interact_text()?;

        planned.push(planned_from_line(
            catalogue,
            PlannedLine {
                exercise: catalogue[selection].name.clone(),
                sets,
                reps,
                rest_seconds: Some(rest),
            },
        )?);
    }

    Ok(planned)
}
