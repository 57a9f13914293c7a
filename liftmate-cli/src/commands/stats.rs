use anyhow::Result;
use chrono::Utc;
use clap::Args;
use colored::Colorize;

use liftmate::services::history_service::{self, format_duration, Period};

use super::AppContext;
use crate::ui::display;

const TOP_EXERCISES: usize = 5;

#[derive(Args)]
pub struct StatsCommand {
    /// Show weekly stats
    #[arg(long, conflicts_with_all = ["month", "year"])]
    week: bool,

    /// Show monthly stats
    #[arg(long, conflicts_with = "year")]
    month: bool,

    /// Show yearly stats
    #[arg(long)]
    year: bool,
}

impl StatsCommand {
    fn period(&self) -> Period {
        if self.week {
            Period::Week
        } else if self.month {
            Period::Month
        } else if self.year {
            Period::Year
        } else {
            Period::All
        }
    }

    pub fn execute(self, ctx: &AppContext) -> Result<()> {
        let period = self.period();
        let unit = ctx.storage.get_settings()?.weight_unit;
        let workouts = ctx.storage.list_workouts()?;
        let in_period = history_service::filter_workouts(&workouts, None, period, Utc::now());
        let totals = history_service::totals(in_period.iter().copied());

        display::heading("Training Statistics");
        println!("Period: {}", period);
        println!();

        if totals.workouts == 0 {
            println!("No workouts in this period");
            return Ok(());
        }

        println!("Workouts:      {}", totals.workouts.to_string().cyan());
        println!("Sets:          {}", totals.sets);
        println!(
            "Total volume:  {}",
            display::format_weight(totals.volume, unit).green().bold()
        );
        println!("Time trained:  {}", format_duration(totals.duration_seconds));
        println!(
            "Avg duration:  {}",
            format_duration(totals.duration_seconds / totals.workouts as u64)
        );

        println!();
        println!("{}", "Top exercises by volume".bold());
        for (name, volume) in totals.top_exercises.iter().take(TOP_EXERCISES) {
            println!("  {:<28} {}", name, display::format_weight(*volume, unit));
        }

        Ok(())
    }
}
