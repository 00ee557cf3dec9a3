//! gemup - incremental Gemfile updater library
//!
//! Moves each gem of a Bundler project forward one bump level at a time
//! (patch, then minor, then major). Every step re-resolves the lockfile,
//! runs the test suite and is committed to git, or reverted when anything
//! fails.

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod progress;
pub mod registry;
pub mod shell;
pub mod update;
pub mod vcs;
