use crate::{PinBackend, SimError, Simulator};
use std::collections::BTreeMap;

/// Repeatedly samples a backend's inputs, propagates them through the
/// design and drives the result onto its outputs.
pub struct ScanEngine<B: PinBackend> {
    pub backend: B,
    pub cycle_count: u64,
    simulator: Simulator,
}

impl<B: PinBackend> ScanEngine<B> {
    pub fn new(backend: B, simulator: Simulator) -> Self {
        Self {
            backend,
            cycle_count: 0,
            simulator,
        }
    }

    pub fn step(&mut self) -> Result<BTreeMap<String, bool>, SimError> {
        self.backend.refresh_inputs()?;
        let inputs: BTreeMap<String, bool> = self
            .simulator
            .inputs()
            .into_iter()
            .map(|name| (name.to_string(), self.backend.read_input(name)))
            .collect();
        let outputs = self.simulator.eval(&inputs)?;
        for (name, &value) in &outputs {
            self.backend.write_output(name, value);
        }
        self.backend.flush_outputs()?;
        self.cycle_count += 1;
        log::trace!("cycle {}: {inputs:?} -> {outputs:?}", self.cycle_count);
        Ok(outputs)
    }

    pub fn run_cycles(&mut self, count: u64) -> Result<(), SimError> {
        for _ in 0..count {
            self.step()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SimBackend;
    use stickhdl_board::Board;
    use stickhdl_ir::wire;

    fn inverter() -> Simulator {
        let mut board = Board::icestick().unwrap();
        board.header("J1", 0).unwrap().rename("SW").input().on();
        board.pin("D1").unwrap().on();
        let main = board.main().unwrap();
        wire(&!main.input("SW").unwrap(), &main.output("D1").unwrap()).unwrap();
        Simulator::new(&main.into_design("inv")).unwrap()
    }

    #[test]
    fn step_drives_outputs_from_inputs() {
        let mut engine = ScanEngine::new(SimBackend::new(), inverter());
        engine.step().unwrap();
        assert_eq!(engine.backend.get_output("D1"), Some(true));

        engine.backend.set_input("SW", true);
        engine.step().unwrap();
        assert_eq!(engine.backend.get_output("D1"), Some(false));
        assert_eq!(engine.cycle_count, 2);
    }

    #[test]
    fn run_cycles_counts() {
        let mut engine = ScanEngine::new(SimBackend::new(), inverter());
        engine.run_cycles(5).unwrap();
        assert_eq!(engine.cycle_count, 5);
    }

    struct FailingBackend;

    impl PinBackend for FailingBackend {
        fn read_input(&self, _pin: &str) -> bool {
            false
        }
        fn write_output(&mut self, _pin: &str, _value: bool) {}
        fn refresh_inputs(&mut self) -> Result<(), SimError> {
            Err(SimError::Backend("link down".into()))
        }
        fn flush_outputs(&mut self) -> Result<(), SimError> {
            Ok(())
        }
    }

    #[test]
    fn backend_errors_stop_the_cycle() {
        let mut engine = ScanEngine::new(FailingBackend, inverter());
        assert!(matches!(engine.step(), Err(SimError::Backend(_))));
        assert_eq!(engine.cycle_count, 0);
    }
}
