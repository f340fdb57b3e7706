//! FPGA board descriptions for stickhdl.
//!
//! A [`Board`] is built from a [`BoardSpec`] (TOML). Pins are renamed,
//! given a direction and enabled in place, then [`Board::main`] turns the
//! enabled pins into the ports of a top-level circuit.
//!
//! Bundled boards: Lattice iCEstick (`BoardSpec::icestick`).

pub mod board;
pub mod pin;
pub mod spec;

pub use board::{Board, Main};
pub use pin::Pin;
pub use spec::{BoardSpec, FixedPin};

use stickhdl_ir::{Direction, NetlistError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("board config error: {0}")]
    Config(String),
    #[error("board `{board}` has no pin named `{name}`")]
    UnknownPin { board: String, name: String },
    #[error("board `{board}` has no header `{name}`")]
    UnknownHeader { board: String, name: String },
    #[error("header `{header}` has {len} pins, index {index} is out of range")]
    HeaderIndex {
        header: String,
        index: usize,
        len: usize,
    },
    #[error("site {0} is assigned to more than one pin")]
    DuplicateSite(u16),
    #[error("pin name `{0}` is used by more than one enabled pin")]
    DuplicateName(String),
    #[error("pin `{0}` is enabled but has no direction")]
    MissingDirection(String),
    #[error("port `{name}` is not an {expected} of the top level")]
    WrongDirection { name: String, expected: Direction },
    #[error(transparent)]
    Netlist(#[from] NetlistError),
}
