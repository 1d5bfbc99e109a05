//! teamsync CLI library
//!
//! Exposes the command modules so integration tests can drive them without
//! spawning the binary.

pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod teams;
