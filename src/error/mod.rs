use stickhdl_board::BoardError;
use stickhdl_codegen::CodegenError;
use stickhdl_ir::NetlistError;
use stickhdl_sim::SimError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StickError {
    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Netlist(#[from] NetlistError),
    #[error(transparent)]
    Codegen(#[from] CodegenError),
    #[error(transparent)]
    Sim(#[from] SimError),
    #[error("failed to serialize design: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_errors_keep_their_message() {
        let err: StickError = NetlistError::AlreadyDriven("D1".into()).into();
        assert_eq!(err.to_string(), "output `D1` is already driven");

        let err: StickError = BoardError::MissingDirection("J1_4".into()).into();
        assert_eq!(err.to_string(), "pin `J1_4` is enabled but has no direction");
    }

    #[test]
    fn config_errors_are_prefixed() {
        let err = StickError::Config("missing file".into());
        assert_eq!(err.to_string(), "config error: missing file");
    }
}
