//! Shared configuration and error types for the kunai recurrence engine.

pub mod config;
pub mod error;
