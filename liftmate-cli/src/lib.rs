// Library exports for the LiftMate CLI
// This allows testing of internal modules

pub mod commands;
pub mod ui;
