use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use colored::Colorize;
use console::Term;
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use liftmate::errors::SessionError;
use liftmate::models::WeightUnit;
use liftmate::services::workout_session_service::format_rest_time;
use liftmate::services::{
    history_service, DiscardOutcome, GoalService, SessionOptions, SessionState, WorkoutSession,
};

use super::AppContext;
use crate::ui::{display, TerminalNotifier};

const FINISH_WORD: &str = "done";

#[derive(Args)]
pub struct StartCommand {
    /// Template ID or name
    template: String,
}

enum Choice {
    Save,
    Discard,
}

impl StartCommand {
    pub async fn execute(self, ctx: &AppContext) -> Result<()> {
        let template = ctx
            .storage
            .find_template(&self.template)?
            .with_context(|| format!("Template '{}' not found", self.template))?;

        let settings = ctx.storage.get_settings()?;
        let unit = settings.weight_unit;
        let options = SessionOptions {
            default_rest_seconds: ctx.config.session.default_rest_seconds,
            weight_unit: unit,
        };
        let history = ctx.storage.list_workouts()?;
        let references = history_service::reference_bests(&history, &template);
        let notifier = TerminalNotifier::new(ctx.config.session.rest_cue);

        println!(
            "{} {} ({} sets)",
            "Starting".bold(),
            template.name.cyan().bold(),
            template.total_sets()
        );
        println!("Type '{}' at the weight prompt to finish early.", FINISH_WORD);
        println!();

        let mut session = WorkoutSession::start(template, &ctx.storage, &notifier, options)
            .with_references(references);

        while matches!(
            session.state(),
            SessionState::Logging | SessionState::Resting { .. }
        ) {
            match session.state() {
                SessionState::Logging => log_set(&mut session, unit)?,
                _ => rest(&mut session).await?,
            }
        }

        display::print_summary(&session.summary(), unit);

        loop {
            match choose()? {
                Choice::Save => {
                    if save(&mut session)? {
                        refresh_goals(ctx);
                        return Ok(());
                    }
                    if session.state() == SessionState::Discarded {
                        return Ok(());
                    }
                }
                Choice::Discard => match session.discard(false)? {
                    DiscardOutcome::Discarded => return Ok(()),
                    DiscardOutcome::ConfirmationRequired => {
                        let sets = session.completed_sets().total_sets();
                        let prompt = format!("Discard {} logged sets?", sets);
                        if Confirm::new().with_prompt(prompt).default(false).interact()? {
                            session.discard(true)?;
                            return Ok(());
                        }
                    }
                },
            }
        }
    }
}

fn log_set(session: &mut WorkoutSession<'_>, unit: WeightUnit) -> Result<()> {
    let Some(exercise) = session.current_exercise() else {
        return Ok(());
    };
    let (_, set_index) = session.position();
    let exercise_name = exercise.exercise_name.clone();
    let total_sets = exercise.sets.len();
    let target_reps = session.current_set_spec().map(|s| s.target_reps).unwrap_or(1);

    println!(
        "{}  set {}/{}  target {} reps   {}",
        exercise_name.bold(),
        set_index + 1,
        total_sets,
        target_reps,
        format!("{:.0}%", session.progress_percent()).dimmed()
    );
    if let Some(reference) = session.reference_for(&exercise.exercise_id) {
        println!(
            "  Last time: {} x {}",
            display::format_weight(reference.weight, unit),
            reference.reps
        );
    }

    let weight_input: String = Input::new()
        .with_prompt(format!("Weight ({})", unit))
        .interact_text()?;
    if weight_input.trim().eq_ignore_ascii_case(FINISH_WORD) {
        session.end_early()?;
        return Ok(());
    }
    let Ok(weight) = weight_input.trim().parse::<f64>() else {
        println!("{}", "Please enter a number".yellow());
        return Ok(());
    };

    let reps: u32 = Input::new()
        .with_prompt("Reps")
        .default(target_reps)
        .interact_text()?;

    match session.complete_set(weight, reps) {
        Ok(_) => Ok(()),
        // Already reported by the notifier; ask again
        Err(SessionError::InvalidSet { .. }) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Count the rest period down, skipping on any keypress
async fn rest(session: &mut WorkoutSession<'_>) -> Result<()> {
    let total = session.rest_remaining().unwrap_or(0);
    let bar = ProgressBar::new(total as u64);
    bar.set_style(
        ProgressStyle::with_template("Rest {msg} [{bar:30.cyan/blue}] press any key to skip")?
            .progress_chars("█▓░"),
    );
    bar.set_message(format_rest_time(total));

    let mut keypress = tokio::task::spawn_blocking(|| Term::stdout().read_key());
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    // The first tick completes immediately
    interval.tick().await;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match session.tick() {
                    SessionState::Resting { remaining_seconds } => {
                        bar.set_position((total - remaining_seconds) as u64);
                        bar.set_message(format_rest_time(remaining_seconds));
                    }
                    _ => {
                        bar.finish_and_clear();
                        break;
                    }
                }
            }
            _ = &mut keypress => {
                bar.finish_and_clear();
                session.skip_rest()?;
                return Ok(());
            }
        }
    }

    // The pending key read must finish before the next prompt reads the terminal
    println!("{}", "Rest complete. Press any key for the next set.".green());
    let _ = keypress.await;
    Ok(())
}

fn choose() -> Result<Choice> {
    let items = ["Save workout", "Discard workout"];
    let selection = Select::new()
        .with_prompt("What now?")
        .items(&items)
        .default(0)
        .interact()?;

    Ok(if selection == 0 {
        Choice::Save
    } else {
        Choice::Discard
    })
}

/// Returns true once the workout is stored
fn save(session: &mut WorkoutSession<'_>) -> Result<bool> {
    loop {
        match session.finalize() {
            Ok(_) => return Ok(true),
            Err(SessionError::NoCompletedSets) => {
                session.discard(false)?;
                return Ok(false);
            }
            Err(SessionError::Persistence(_)) => {
                let retry = Confirm::new()
                    .with_prompt("Retry saving?")
                    .default(true)
                    .interact()?;
                if !retry {
                    return Ok(false);
                }
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn refresh_goals(ctx: &AppContext) {
    match GoalService::new(&ctx.storage).refresh_from_history(Utc::now()) {
        Ok(completed) => {
            for goal in completed {
                println!("{} Goal reached: {}", "🎯".green(), goal.title().bold());
            }
        }
        Err(e) => tracing::warn!("Failed to refresh goals: {:#}", e),
    }
}
