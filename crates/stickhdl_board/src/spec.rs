use crate::BoardError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use stickhdl_ir::{BoardInfo, Direction};

const ICESTICK_TOML: &str = include_str!("../boards/icestick.toml");

/// Board description as written in a board TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoardSpec {
    pub board: BoardInfo,
    #[serde(default)]
    pub pins: BTreeMap<String, FixedPin>,
    #[serde(default)]
    pub headers: BTreeMap<String, Vec<u16>>,
}

/// A pin with a fixed role on the board, e.g. an LED or the clock.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FixedPin {
    pub site: u16,
    pub direction: Direction,
    #[serde(default)]
    pub enabled: bool,
}

impl BoardSpec {
    pub fn from_toml(content: &str) -> Result<Self, BoardError> {
        toml::from_str(content).map_err(|e| BoardError::Config(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, BoardError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| BoardError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    pub fn icestick() -> Result<Self, BoardError> {
        Self::from_toml(ICESTICK_TOML)
    }
}
