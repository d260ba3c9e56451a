//! CLI command implementations
//!
//! This module contains the implementation of all CLI subcommands.

pub mod start;
pub mod status;
pub mod stop;
