//! Presentation layer for roundtable
//!
//! This crate contains the CLI definition and the console meeting observer.

pub mod cli;
pub mod output;

// Re-export commonly used types
pub use cli::Cli;
pub use output::console::ConsoleObserver;
