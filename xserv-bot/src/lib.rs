//! xserv Bot Library
//!
//! This library exposes the bot's internal modules for integration testing.

pub mod bot;
pub mod commands;
pub mod constants;
pub mod files;
pub mod session;
pub mod transfers;
