//! Command-line front end for the `swda-corpus` reader.

mod cli;
pub use cli::*;

mod commands;
pub use commands::*;
