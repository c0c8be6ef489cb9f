#![forbid(unsafe_code)]

//! Core library for the Liftoscript training plan generator.
//!
//! This crate provides:
//! - Domain types (lifts, set specs, sessions, upcoming workouts)
//! - The Liftoscript parser, weight resolver and plan builder
//! - Output materialization and upcoming workout stores
//! - Presets, configuration and one-rep-max estimation
//! - Session completion into history and per-exercise progression views

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod lexer;
pub mod category;
pub mod setspec;
pub mod resolver;
pub mod builder;
pub mod materialize;
pub mod store;
pub mod export;
pub mod presets;
pub mod progression;
pub mod history;
pub mod generate;
pub mod transfer;
pub mod report;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use builder::{build_plan, parse_template};
pub use generate::Generator;
pub use materialize::{materialize, publish};
pub use store::{JsonFileStore, MemoryStore, StoredWorkout, UpcomingStore};
pub use presets::{get_preset, list_presets, PresetContent, PresetInfo};
pub use progression::estimate_one_rep_max;
pub use history::{append_history, estimate_maxes, load_logged_sets, HistoryEntry};
pub use transfer::{complete_session, TransferResult};
pub use report::{progression_report, ProgressionReport};
