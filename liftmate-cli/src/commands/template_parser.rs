use anyhow::{Context, Result};
use regex::Regex;

/// One exercise line of a template plan, e.g. "Bench Press:3x10@90"
#[derive(Debug, PartialEq)]
pub struct PlannedLine {
    pub exercise: String,
    pub sets: u32,
    pub reps: u32,
    pub rest_seconds: Option<u32>,
}

pub struct TemplateParser {
    line_pattern: Regex,
}

impl Default for TemplateParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateParser {
    pub fn new() -> Self {
        // NAME:SETSxREPS with an optional @REST suffix
        let line_pattern =
            Regex::new(r"(?i)^\s*(?P<name>[^:]+?)\s*:\s*(?P<sets>\d+)\s*x\s*(?P<reps>\d+)\s*(?:@\s*(?P<rest>\d+)\s*s?)?\s*$")
                .expect("valid template line pattern");

        Self { line_pattern }
    }

    pub fn parse(&self, line: &str) -> Result<PlannedLine> {
        let caps = self.line_pattern.captures(line).with_context(|| {
            format!(
                "Could not parse '{}'. Expected NAME:SETSxREPS[@REST], e.g. \"Squat:3x10@90\"",
                line
            )
        })?;

        let number = |name: &str| -> Result<Option<u32>> {
            caps.name(name)
                .map(|m| m.as_str().parse::<u32>())
                .transpose()
                .with_context(|| format!("Number out of range in '{}'", line))
        };

        let sets = number("sets")?.unwrap_or(0);
        let reps = number("reps")?.unwrap_or(0);
        if sets == 0 || reps == 0 {
            anyhow::bail!("Sets and reps must be at least 1 in '{}'", line);
        }

        Ok(PlannedLine {
            exercise: caps["name"].to_string(),
            sets,
            reps,
            rest_seconds: number("rest")?,
        })
    }
}
