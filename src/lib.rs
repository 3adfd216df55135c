//! Command-line front end for the closed-loop simulation.
//!
//! The engine lives in `nob_core`; this crate only wires configuration
//! files, command-line overrides and log persistence around it.

pub mod runner;

pub use runner::{execute, load_config, run_from_file, RunOverrides, RunReport};
