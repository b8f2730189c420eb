//! Consistency tracking engine: per-day workout and diet logging, streak
//! derivation, 30-day cycles, windowed statistics, and scheduled
//! motivational reminders.

pub mod clock;
pub mod config;
pub mod cycle;
pub mod db;
pub mod error;
pub mod models;
pub mod motivation;
pub mod notify;
pub mod scheduler;
pub mod service;
pub mod stats;
pub mod store;
pub mod streak;

#[cfg(test)]
pub mod test_utils;

pub use error::{CoreError, Result};
