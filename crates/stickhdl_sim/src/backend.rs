use crate::SimError;
use std::collections::HashMap;

/// Pin-level I/O of a board, real or simulated.
pub trait PinBackend {
    fn read_input(&self, pin: &str) -> bool;
    fn write_output(&mut self, pin: &str, value: bool);
    fn refresh_inputs(&mut self) -> Result<(), SimError>;
    fn flush_outputs(&mut self) -> Result<(), SimError>;
}

impl PinBackend for Box<dyn PinBackend> {
    fn read_input(&self, pin: &str) -> bool {
        (**self).read_input(pin)
    }
    fn write_output(&mut self, pin: &str, value: bool) {
        (**self).write_output(pin, value)
    }
    fn refresh_inputs(&mut self) -> Result<(), SimError> {
        (**self).refresh_inputs()
    }
    fn flush_outputs(&mut self) -> Result<(), SimError> {
        (**self).flush_outputs()
    }
}

/// In-memory board: switches are set by the caller, LEDs are read back.
#[derive(Debug, Default)]
pub struct SimBackend {
    inputs: HashMap<String, bool>,
    outputs: HashMap<String, bool>,
}

impl SimBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_input(&mut self, pin: &str, value: bool) {
        self.inputs.insert(pin.to_string(), value);
    }

    pub fn get_output(&self, pin: &str) -> Option<bool> {
        self.outputs.get(pin).copied()
    }
}

impl PinBackend for SimBackend {
    fn read_input(&self, pin: &str) -> bool {
        self.inputs.get(pin).copied().unwrap_or(false)
    }

    fn write_output(&mut self, pin: &str, value: bool) {
        self.outputs.insert(pin.to_string(), value);
    }

    fn refresh_inputs(&mut self) -> Result<(), SimError> {
        Ok(())
    }

    fn flush_outputs(&mut self) -> Result<(), SimError> {
        Ok(())
    }
}
