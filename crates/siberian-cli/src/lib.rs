//! Siberian CLI
//!
//! Argument definitions, commands and terminal output for the `siberian`
//! binary. Commands write through [`output::StyledOutput`] so they can run
//! against in-memory buffers.

pub mod cli;
pub mod commands;
pub mod output;
