//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `ai` - Text-generation backend test
//! - `core` - Shared utilities (config loading, month resolution, pipeline wiring)
//! - `reports` - Monthly report, stats and prompt commands

pub mod ai;
pub mod core;
pub mod reports;

// Re-export command functions for main.rs
pub use ai::*;
pub use self::core::*;
pub use reports::*;
