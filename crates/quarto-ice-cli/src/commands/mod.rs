//! Command implementations for the quarto-ice CLI
//!
//! Each command module handles the CLI interface and delegates to
//! quarto-ice for the actual template work.

pub mod fill;
