//! The full-adder demo for the iCEstick.
//!
//! J1 pins 0..3 become switches `S1`..`S3`, LED `D1` shows the sum and
//! `D2` the carry.

use crate::adder::fulladder;
use crate::config::BuildConfig;
use crate::error::StickError;
use stickhdl_board::{Board, BoardError, BoardSpec, Main};
use stickhdl_ir::{Design, wire};

pub const SWITCHES: [&str; 3] = ["S1", "S2", "S3"];
pub const SUM_LED: &str = "D1";
pub const CARRY_LED: &str = "D2";

/// Configure the board's pins and wire the adder to the LEDs.
pub fn build_fulladder(board: &mut Board) -> Result<Main, BoardError> {
    for (index, name) in SWITCHES.iter().enumerate() {
        board.header("J1", index)?.rename(*name).input().on();
    }
    board.pin(SUM_LED)?.on();
    board.pin(CARRY_LED)?.on();

    let main = board.main()?;

    let (sum, carry) = fulladder(
        main.input(SWITCHES[0])?,
        main.input(SWITCHES[1])?,
        main.input(SWITCHES[2])?,
    );

    wire(&sum, &main.output(SUM_LED)?)?;
    wire(&carry, &main.output(CARRY_LED)?)?;
    Ok(main)
}

pub fn load_board(config: &BuildConfig) -> Result<Board, BoardError> {
    match &config.board {
        Some(path) => {
            log::info!("loading board description {}", path.display());
            Board::new(BoardSpec::from_file(path)?)
        }
        None => Board::icestick(),
    }
}

pub fn fulladder_design(config: &BuildConfig) -> Result<Design, StickError> {
    let mut board = load_board(config)?;
    let main = build_fulladder(&mut board)?;
    let design = main.into_design(config.top.clone());
    log::info!(
        "design {}: {} ports, {} gates",
        design.top,
        design.ports.len(),
        design.netlist.gate_count()
    );
    Ok(design)
}
