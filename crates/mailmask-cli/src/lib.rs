//! Command-line front end for the masking engine.

pub mod cli;

pub use cli::run;
