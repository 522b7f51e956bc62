//! CLI subcommand implementations.
//!
//! Commands return their output as a `String`; `main` writes it to stdout.

pub mod cart;
pub mod catalogs;
