use anyhow::Result;
use colored::Colorize;
use console::Term;

use liftmate::services::{Notification, Notifier};

/// Prints session notifications to stdout and rings the bell on rest end
pub struct TerminalNotifier {
    rest_cue: bool,
}

impl TerminalNotifier {
    pub fn new(rest_cue: bool) -> Self {
        Self { rest_cue }
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        match notification {
            Notification::Info(message) => println!("{} {}", "✓".green(), message),
            Notification::ValidationError(message) => println!("{} {}", "!".yellow(), message.yellow()),
            Notification::PersonalRecord {
                exercise_name,
                weight,
                reps,
            } => println!(
                "{} {} {} x {}",
                "🏆 New personal record!".bold().magenta(),
                exercise_name.bold(),
                weight,
                reps
            ),
            Notification::Error(message) => eprintln!("{} {}", "✗".red(), message.red()),
        }
    }

    fn play_rest_cue(&self) -> Result<()> {
        if self.rest_cue {
            Term::stdout().write_str("\x07")?;
        }
        Ok(())
    }
}
