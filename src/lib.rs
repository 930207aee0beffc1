//! 3meals: a 30-day toddler meal planner.
//!
//! The planning logic lives in `threemeals-core`. This crate adds the
//! pieces that talk to the outside world: configuration, the Gemini
//! client, the persistence backends, the hosted API and the CLI commands.

pub mod api;
pub mod commands;
pub mod config;
pub mod gemini;
pub mod persistence;
pub mod server;
