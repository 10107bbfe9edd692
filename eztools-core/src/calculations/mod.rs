//! Tax calculation modules.
//!
//! This module provides the monthly personal income tax (PIT) worksheet and
//! the shared helpers it relies on.

pub mod common;
pub mod pit;

pub use pit::{PitWorksheet, compute_tax};
