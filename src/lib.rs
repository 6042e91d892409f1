pub mod catalog;
pub mod config;
pub mod error;
pub mod leaderboard;
pub mod search;
pub mod shell;
pub mod stats;
// cmd and reports are binary modules (see main.rs).
