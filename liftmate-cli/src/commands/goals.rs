use anyhow::Result;
use chrono::Utc;
use clap::{ArgGroup, Args};
use colored::Colorize;

use liftmate::models::{GoalKind, Timeframe};
use liftmate::services::GoalService;

use super::{confirm, AppContext};
use crate::ui::display;

#[derive(Args)]
#[command(group(ArgGroup::new("kind").required(true).args(["exercise", "body_weight", "visits"])))]
pub struct GoalsCreateCommand {
    /// Lift goal for this exercise
    #[arg(long)]
    exercise: Option<String>,

    /// Body-weight goal
    #[arg(long)]
    body_weight: bool,

    /// Visits goal per timeframe (weekly or monthly)
    #[arg(long)]
    visits: Option<String>,

    /// Target value
    #[arg(short, long)]
    target: f64,
}

impl GoalsCreateCommand {
    pub fn execute(self, ctx: &AppContext) -> Result<()> {
        let weight_unit = ctx.storage.get_settings()?.weight_unit.to_string();

        let (kind, unit) = if let Some(exercise_name) = self.exercise {
            (GoalKind::Exercise { exercise_name }, Some(weight_unit))
        } else if self.body_weight {
            (GoalKind::BodyWeight, Some(weight_unit))
        } else if let Some(timeframe) = self.visits {
            let timeframe: Timeframe = timeframe.parse()?;
            (GoalKind::Visits { timeframe }, Some("workouts".to_string()))
        } else {
            anyhow::bail!("Choose one of --exercise, --body-weight or --visits");
        };

        let service = GoalService::new(&ctx.storage);
        let goal = service.create_goal(kind, self.target, unit)?;

        println!("✓ Created goal: {}", goal.title().bold());
        println!("    {}", goal.id.dimmed());

        // Lift and visit goals may already have progress in history
        service.refresh_from_history(Utc::now())?;
        Ok(())
    }
}

pub fn list_goals(ctx: &AppContext, show_all: bool) -> Result<()> {
    let goals = GoalService::new(&ctx.storage).list_goals(show_all)?;

    display::heading("Goals");
    if goals.is_empty() {
        println!("No goals yet. Create one with: liftmate goals create");
        return Ok(());
    }

    for goal in &goals {
        display::print_goal(goal);
    }

    Ok(())
}

pub fn update_progress(ctx: &AppContext, id: &str, value: f64) -> Result<()> {
    let goal = GoalService::new(&ctx.storage).update_progress(id, value)?;

    display::print_goal(&goal);
    if goal.completed {
        println!("{} Goal reached!", "🎯".green());
    }
    Ok(())
}

pub fn refresh_goals(ctx: &AppContext) -> Result<()> {
    let completed = GoalService::new(&ctx.storage).refresh_from_history(Utc::now())?;

    if completed.is_empty() {
        println!("✓ Goals updated");
    }
    for goal in completed {
        println!("{} Goal reached: {}", "🎯".green(), goal.title().bold());
    }
    Ok(())
}

pub fn complete_goal(ctx: &AppContext, id: &str) -> Result<()> {
    GoalService::new(&ctx.storage).complete_goal(id)?;
    println!("✓ Goal marked as complete");
    Ok(())
}

pub fn delete_goal(ctx: &AppContext, id: &str, force: bool) -> Result<()> {
    if !confirm("Delete this goal?", force)? {
        println!("Cancelled");
        return Ok(());
    }

    if GoalService::new(&ctx.storage).delete_goal(id)? {
        println!("✓ Goal deleted");
        Ok(())
    } else {
        anyhow::bail!("Goal {} not found", id)
    }
}
