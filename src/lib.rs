//! PAUL - a GitHub App that keeps pull requests tidy.
//!
//! Each repository opts in through a `PAUL.yaml` file. Webhook deliveries drive
//! the pull-request checks and slash commands; a periodic sweep labels stale
//! pull requests and merges the ones marked ready.

pub mod checks;
pub mod commands;
pub mod config;
pub mod fun;
pub mod github;
pub mod messages;
pub mod scheduler;
pub mod server;
pub mod settings;
pub mod types;
pub mod webhooks;

#[cfg(test)]
pub(crate) mod test_utils;
