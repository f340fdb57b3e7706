//! Simulation for stickhdl designs.
//!
//! - [`Simulator`] evaluates a netlist for one input assignment.
//! - [`truth_table`] enumerates every input assignment.
//! - [`ScanEngine`] drives a [`PinBackend`] the way the board would:
//!   sample inputs, propagate, update outputs.

pub mod backend;
pub mod engine;
pub mod eval;

pub use backend::{PinBackend, SimBackend};
pub use engine::ScanEngine;
pub use eval::{Simulator, TruthRow, TruthTable, parse_stimulus, truth_table};

use stickhdl_ir::NetlistError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("no value given for input `{0}`")]
    MissingInput(String),
    #[error("`{0}` is not an input of this design")]
    UnknownInput(String),
    #[error("truth table over {count} inputs exceeds the limit of {limit}")]
    TooManyInputs { count: usize, limit: usize },
    #[error("invalid stimulus `{0}`, expected NAME=0|1[,NAME=0|1...]")]
    Stimulus(String),
    #[error("backend error: {0}")]
    Backend(String),
    #[error(transparent)]
    Netlist(#[from] NetlistError),
}
