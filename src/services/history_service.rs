use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc};
use std::collections::HashMap;

use crate::models::{CompletedWorkout, PreviousPerformance, WorkoutFilter, WorkoutTemplate};

/// Time window for history listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    #[default]
    All,
    Week,
    Month,
    ThreeMonths,
    Year,
}

impl Period {
    /// Start of the window relative to `now`, None for all time
    pub fn since(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Period::All => None,
            Period::Week => now.checked_sub_days(Days::new(7)),
            Period::Month => now.checked_sub_months(Months::new(1)),
            Period::ThreeMonths => now.checked_sub_months(Months::new(3)),
            Period::Year => now.checked_sub_months(Months::new(12)),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Period::All => write!(f, "All Time"),
            Period::Week => write!(f, "This Week"),
            Period::Month => write!(f, "This Month"),
            Period::ThreeMonths => write!(f, "3 Months"),
            Period::Year => write!(f, "This Year"),
        }
    }
}

impl std::str::FromStr for Period {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Period::All),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "3months" | "three-months" => Ok(Period::ThreeMonths),
            "year" => Ok(Period::Year),
            _ => Err(anyhow::anyhow!("Invalid period: {}", s)),
        }
    }
}

/// Workouts from the same Sunday-started week
#[derive(Debug)]
pub struct WeekGroup<'a> {
    pub week_start: NaiveDate,
    pub workouts: Vec<&'a CompletedWorkout>,
}

impl WeekGroup<'_> {
    pub fn week_end(&self) -> NaiveDate {
        self.week_start + Days::new(6)
    }
}

/// Totals over a slice of history
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryTotals {
    pub workouts: usize,
    pub sets: usize,
    pub volume: f64,
    pub duration_seconds: u64,
    /// (exercise name, volume), highest volume first
    pub top_exercises: Vec<(String, f64)>,
}

pub fn filter_workouts<'a>(
    workouts: &'a [CompletedWorkout],
    search: Option<&str>,
    period: Period,
    now: DateTime<Utc>,
) -> Vec<&'a CompletedWorkout> {
    let filter = WorkoutFilter {
        search: search.map(str::to_string),
        from_date: period.since(now),
        ..Default::default()
    };

    workouts.iter().filter(|w| filter.matches(w)).collect()
}

/// Sunday on or before the workout's (UTC) date
pub fn week_start(date: DateTime<Utc>) -> NaiveDate {
    let day = date.date_naive();
    day - Days::new(day.weekday().num_days_from_sunday() as u64)
}

/// Group workouts by week, keeping the input order of both weeks and workouts
pub fn group_by_week<'a>(workouts: &[&'a CompletedWorkout]) -> Vec<WeekGroup<'a>> {
    let mut groups: Vec<WeekGroup<'a>> = Vec::new();

    for &workout in workouts {
        let start = week_start(workout.date);
        match groups.iter_mut().find(|g| g.week_start == start) {
            Some(group) => group.workouts.push(workout),
            None => groups.push(WeekGroup {
                week_start: start,
                workouts: vec![workout],
            }),
        }
    }

    groups
}

/// Format a duration as m:ss
pub fn format_duration(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Heaviest set from the most recent workout that included the exercise
pub fn previous_performance(
    workouts: &[CompletedWorkout],
    exercise_id: &str,
) -> Option<PreviousPerformance> {
    workouts
        .iter()
        .filter_map(|w| w.find_exercise(exercise_id).map(|log| (w, log)))
        .max_by_key(|(w, _)| w.date)
        .and_then(|(w, log)| {
            log.heaviest_set().map(|set| PreviousPerformance {
                weight: set.weight,
                reps: set.reps,
                date: w.date,
            })
        })
}

/// Reference bests for every exercise in a template
pub fn reference_bests(
    workouts: &[CompletedWorkout],
    template: &WorkoutTemplate,
) -> HashMap<String, PreviousPerformance> {
    template
        .exercises
        .iter()
        .filter_map(|planned| {
            previous_performance(workouts, &planned.exercise_id)
                .map(|perf| (planned.exercise_id.clone(), perf))
        })
        .collect()
}

pub fn totals<'a, I>(workouts: I) -> HistoryTotals
where
    I: IntoIterator<Item = &'a CompletedWorkout>,
{
    let mut totals = HistoryTotals::default();
    let mut by_exercise: Vec<(String, f64)> = Vec::new();

    for workout in workouts {
        totals.workouts += 1;
        totals.duration_seconds += workout.duration_seconds;

        for log in &workout.exercises {
            let volume = log.volume();
            totals.sets += log.sets.len();
            totals.volume += volume;

            match by_exercise.iter_mut().find(|(name, _)| *name == log.exercise_name) {
                Some((_, total)) => *total += volume,
                None => by_exercise.push((log.exercise_name.clone(), volume)),
            }
        }
    }

    by_exercise.sort_by(|a, b| b.1.total_cmp(&a.1));
    totals.top_exercises = by_exercise;
    totals
}
