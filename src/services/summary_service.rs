// Aggregate figures for a finished session
//
// Everything here is a pure function of the completed-sets mapping and the
// template the session ran from.

use serde::{Deserialize, Serialize};

use crate::models::{ExerciseLog, WorkoutSet, WorkoutStats, WorkoutTemplate};

const PERSONAL_BEST_LIMIT: usize = 3;

/// Logged sets keyed by exercise ID, kept in template order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletedSets {
    entries: Vec<(String, Vec<WorkoutSet>)>,
}

impl CompletedSets {
    /// One empty entry per distinct exercise in the template
    pub fn for_template(template: &WorkoutTemplate) -> Self {
        let mut completed = Self::default();
        for exercise in &template.exercises {
            completed.entry(&exercise.exercise_id);
        }
        completed
    }

    pub fn push(&mut self, exercise_id: &str, set: WorkoutSet) {
        self.entry(exercise_id).push(set);
    }

    pub fn get(&self, exercise_id: &str) -> &[WorkoutSet] {
        self.entries
            .iter()
            .find(|(id, _)| id == exercise_id)
            .map(|(_, sets)| sets.as_slice())
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[WorkoutSet])> {
        self.entries
            .iter()
            .map(|(id, sets)| (id.as_str(), sets.as_slice()))
    }

    pub fn total_sets(&self) -> usize {
        self.entries.iter().map(|(_, sets)| sets.len()).sum()
    }

    pub fn completed_exercise_count(&self) -> usize {
        self.entries.iter().filter(|(_, sets)| !sets.is_empty()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.total_sets() == 0
    }

    pub fn clear(&mut self) {
        for (_, sets) in &mut self.entries {
            sets.clear();
        }
    }

    fn entry(&mut self, exercise_id: &str) -> &mut Vec<WorkoutSet> {
        let index = match self.entries.iter().position(|(id, _)| id == exercise_id) {
            Some(index) => index,
            None => {
                self.entries.push((exercise_id.to_string(), Vec::new()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[index].1
    }
}

/// Heaviest set of one exercise in the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalBest {
    pub exercise_id: String,
    pub exercise_name: String,
    pub weight: f64,
    pub reps: u32,
}

impl PersonalBest {
    pub fn volume(&self) -> f64 {
        self.weight * self.reps as f64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutSummary {
    pub stats: WorkoutStats,
    pub personal_bests: Vec<PersonalBest>,
}

pub fn summarize(completed: &CompletedSets, template: &WorkoutTemplate) -> WorkoutSummary {
    WorkoutSummary {
        stats: calculate_stats(completed),
        personal_bests: personal_bests(completed, template),
    }
}

pub fn calculate_stats(completed: &CompletedSets) -> WorkoutStats {
    let total_volume: f64 = completed
        .iter()
        .flat_map(|(_, sets)| sets.iter())
        .map(WorkoutSet::volume)
        .sum();
    let total_sets = completed.total_sets();

    let average_weight = if total_sets > 0 {
        (total_volume / total_sets as f64).round()
    } else {
        0.0
    };

    WorkoutStats {
        total_volume,
        total_sets,
        completed_exercises: completed.completed_exercise_count(),
        average_weight,
    }
}

/// Top three per-exercise heaviest sets, ranked by weight x reps
pub fn personal_bests(completed: &CompletedSets, template: &WorkoutTemplate) -> Vec<PersonalBest> {
    let mut bests: Vec<PersonalBest> = completed
        .iter()
        .filter_map(|(exercise_id, sets)| {
            let planned = template
                .exercises
                .iter()
                .find(|e| e.exercise_id == exercise_id)?;
            let heaviest = sets.iter().fold(None, |best: Option<&WorkoutSet>, set| match best {
                Some(b) if b.weight >= set.weight => Some(b),
                _ => Some(set),
            })?;

            Some(PersonalBest {
                exercise_id: exercise_id.to_string(),
                exercise_name: planned.exercise_name.clone(),
                weight: heaviest.weight,
                reps: heaviest.reps,
            })
        })
        .collect();

    // Stable sort: equal volumes keep template order
    bests.sort_by(|a, b| b.volume().total_cmp(&a.volume()));
    bests.truncate(PERSONAL_BEST_LIMIT);
    bests
}

/// Exercises with at least one logged set, in template order
pub fn exercise_logs(completed: &CompletedSets, template: &WorkoutTemplate) -> Vec<ExerciseLog> {
    completed
        .iter()
        .filter(|(_, sets)| !sets.is_empty())
        .map(|(exercise_id, sets)| {
            let exercise_name = template
                .exercises
                .iter()
                .find(|e| e.exercise_id == exercise_id)
                .map(|e| e.exercise_name.clone())
                .unwrap_or_else(|| exercise_id.to_string());

            ExerciseLog {
                exercise_id: exercise_id.to_string(),
                exercise_name,
                sets: sets.to_vec(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SetSpec;
    use pretty_assertions::assert_eq;

    fn template(exercises: &[&str]) -> WorkoutTemplate {
        exercises.iter().fold(WorkoutTemplate::new("Test"), |t, name| {
            t.with_exercise(name.to_lowercase(), *name, vec![SetSpec::new(10, 60); 3])
        })
    }

    fn completed(entries: &[(&str, &[(f64, u32)])]) -> CompletedSets {
        let mut completed = CompletedSets::default();
        for (id, sets) in entries {
            for &(weight, reps) in sets.iter() {
                completed.push(id, WorkoutSet::new(weight, reps));
            }
        }
        completed
    }

    #[test]
    fn test_total_volume() {
        let sets = completed(&[("bench", &[(100.0, 10), (120.0, 8)])]);
        let stats = calculate_stats(&sets);

        assert_eq!(stats.total_volume, 1960.0);
        assert_eq!(stats.total_sets, 2);
        assert_eq!(stats.completed_exercises, 1);
        assert_eq!(stats.average_weight, 980.0);
    }

    #[test]
    fn test_empty_stats() {
        let stats = calculate_stats(&CompletedSets::for_template(&template(&["Squat"])));
        assert_eq!(stats, WorkoutStats::default());
    }

    #[test]
    fn test_average_weight_rounds() {
        let sets = completed(&[("curl", &[(12.5, 3), (10.0, 1)])]);
        // (37.5 + 10) / 2 = 23.75
        assert_eq!(calculate_stats(&sets).average_weight, 24.0);
    }

    #[test]
    fn test_completed_exercise_count_ignores_empty() {
        let mut sets = CompletedSets::for_template(&template(&["Squat", "Bench"]));
        sets.push("squat", WorkoutSet::new(100.0, 5));

        assert_eq!(sets.completed_exercise_count(), 1);
        assert_eq!(sets.get("bench"), &[] as &[WorkoutSet]);
    }

    #[test]
    fn test_personal_bests_top_three_by_volume() {
        let template = template(&["Squat", "Bench", "Row", "Curl"]);
        let sets = completed(&[
            ("squat", &[(100.0, 5), (140.0, 3)]),
            ("bench", &[(80.0, 10), (80.0, 8)]),
            ("row", &[(60.0, 12)]),
            ("curl", &[(15.0, 12)]),
        ]);

        let bests = personal_bests(&sets, &template);

        assert_eq!(bests.len(), 3);
        // Bench: first 80kg set wins the tie (800), row 720, squat 420
        assert_eq!(bests[0].exercise_name, "Bench");
        assert_eq!((bests[0].weight, bests[0].reps), (80.0, 10));
        assert_eq!(bests[1].exercise_name, "Row");
        assert_eq!(bests[2].exercise_name, "Squat");
        assert_eq!((bests[2].weight, bests[2].reps), (140.0, 3));
    }

    #[test]
    fn test_exercise_logs_drop_empty_exercises() {
        let template = template(&["Squat", "Bench"]);
        let mut sets = CompletedSets::for_template(&template);
        sets.push("bench", WorkoutSet::new(60.0, 10));

        let logs = exercise_logs(&sets, &template);

        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].exercise_name, "Bench");
    }

    #[test]
    fn test_summary_is_deterministic() {
        let template = template(&["Squat", "Bench"]);
        let sets = completed(&[("squat", &[(100.0, 5)]), ("bench", &[(50.0, 10)])]);

        assert_eq!(summarize(&sets, &template), summarize(&sets, &template));
    }
}
