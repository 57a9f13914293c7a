// Terminal output: notifications, tables and summaries

pub mod display;
mod notifier;

pub use notifier::TerminalNotifier;
