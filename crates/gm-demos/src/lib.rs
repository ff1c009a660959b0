//! `gm-demos` - the matrix addition, subtraction and multiplication demos.
//!
//! The binaries under `src/bin` are thin wrappers: they parse flags, set up
//! logging, pick a backend and hand stdin/stdout to a runner in [`runners`].

pub mod cli;
pub mod error;
pub mod fixtures;
pub mod input;
pub mod logging;
pub mod report;
pub mod runners;

pub use error::{DemoError, Result};
