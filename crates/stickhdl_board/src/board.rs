use crate::{BoardError, BoardSpec, Pin};
use std::collections::{BTreeMap, HashSet};
use stickhdl_ir::{BoardInfo, Circuit, Design, Direction, Port, PortBinding, Signal, check_identifier};

pub struct Board {
    info: BoardInfo,
    pins: Vec<Pin>,
    fixed: BTreeMap<String, usize>,
    headers: BTreeMap<String, Vec<usize>>,
}

impl Board {
    pub fn new(spec: BoardSpec) -> Result<Self, BoardError> {
        let mut pins = Vec::new();
        let mut fixed = BTreeMap::new();
        let mut headers = BTreeMap::new();
        let mut sites = HashSet::new();

        for (name, def) in spec.pins {
            if !sites.insert(def.site) {
                return Err(BoardError::DuplicateSite(def.site));
            }
            let mut pin = Pin::new(name.clone(), def.site, Some(def.direction));
            if def.enabled {
                pin.on();
            }
            fixed.insert(name, pins.len());
            pins.push(pin);
        }

        for (header, header_sites) in spec.headers {
            let mut slots = Vec::with_capacity(header_sites.len());
            for (index, site) in header_sites.into_iter().enumerate() {
                if !sites.insert(site) {
                    return Err(BoardError::DuplicateSite(site));
                }
                slots.push(pins.len());
                pins.push(Pin::new(format!("{header}_{index}"), site, None));
            }
            headers.insert(header, slots);
        }

        log::debug!(
            "board {}: {} pins, {} headers",
            spec.board.name,
            pins.len(),
            headers.len()
        );

        Ok(Self {
            info: spec.board,
            pins,
            fixed,
            headers,
        })
    }

    pub fn icestick() -> Result<Self, BoardError> {
        Self::new(BoardSpec::icestick()?)
    }

    pub fn info(&self) -> &BoardInfo {
        &self.info
    }

    /// Fixed pin by its board name (`D1`, `CLKIN`, ...).
    pub fn pin(&mut self, name: &str) -> Result<&mut Pin, BoardError> {
        let slot = *self
            .fixed
            .get(name)
            .ok_or_else(|| BoardError::UnknownPin {
                board: self.info.name.clone(),
                name: name.to_string(),
            })?;
        Ok(&mut self.pins[slot])
    }

    /// Header GPIO by header name and position (`J1`, 0).
    pub fn header(&mut self, name: &str, index: usize) -> Result<&mut Pin, BoardError> {
        let slots = self
            .headers
            .get(name)
            .ok_or_else(|| BoardError::UnknownHeader {
                board: self.info.name.clone(),
                name: name.to_string(),
            })?;
        let slot = *slots.get(index).ok_or_else(|| BoardError::HeaderIndex {
            header: name.to_string(),
            index,
            len: slots.len(),
        })?;
        Ok(&mut self.pins[slot])
    }

    /// Build the top level from the enabled pins.
    ///
    /// Inputs come first, then outputs, each sorted by name.
    pub fn main(&self) -> Result<Main, BoardError> {
        let mut names = HashSet::new();
        let mut bindings = Vec::new();
        for pin in self.pins.iter().filter(|pin| pin.is_enabled()) {
            if !names.insert(pin.name()) {
                return Err(BoardError::DuplicateName(pin.name().to_string()));
            }
            let direction = pin
                .direction()
                .ok_or_else(|| BoardError::MissingDirection(pin.name().to_string()))?;
            check_identifier(pin.name())?;
            log::debug!(
                "{} ({}) at site {} as {direction}",
                pin.name(),
                pin.default_name(),
                pin.site()
            );
            bindings.push(PortBinding {
                name: pin.name().to_string(),
                site: pin.site(),
                direction,
            });
        }
        bindings.sort_by(|a, b| {
            (a.direction != Direction::Input, &a.name)
                .cmp(&(b.direction != Direction::Input, &b.name))
        });

        let circuit = Circuit::new();
        let mut inputs = BTreeMap::new();
        let mut outputs = BTreeMap::new();
        for binding in &bindings {
            match binding.direction {
                Direction::Input => {
                    inputs.insert(binding.name.clone(), circuit.input(&binding.name)?);
                }
                Direction::Output => {
                    outputs.insert(binding.name.clone(), circuit.output(&binding.name)?);
                }
            }
        }

        log::info!(
            "{}: top level with {} inputs, {} outputs",
            self.info.name,
            inputs.len(),
            outputs.len()
        );

        Ok(Main {
            circuit,
            board: self.info.clone(),
            bindings,
            inputs,
            outputs,
        })
    }
}

/// Top-level circuit of a board: one port per enabled pin.
#[derive(Debug)]
pub struct Main {
    circuit: Circuit,
    board: BoardInfo,
    bindings: Vec<PortBinding>,
    inputs: BTreeMap<String, Signal>,
    outputs: BTreeMap<String, Port>,
}

impl Main {
    pub fn input(&self, name: &str) -> Result<Signal, BoardError> {
        self.inputs.get(name).cloned().ok_or_else(|| {
            self.lookup_error(name, Direction::Input)
        })
    }

    pub fn output(&self, name: &str) -> Result<Port, BoardError> {
        self.outputs.get(name).cloned().ok_or_else(|| {
            self.lookup_error(name, Direction::Output)
        })
    }

    fn lookup_error(&self, name: &str, expected: Direction) -> BoardError {
        if self.bindings.iter().any(|binding| binding.name == name) {
            BoardError::WrongDirection {
                name: name.to_string(),
                expected,
            }
        } else {
            BoardError::UnknownPin {
                board: self.board.name.clone(),
                name: name.to_string(),
            }
        }
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub fn bindings(&self) -> &[PortBinding] {
        &self.bindings
    }

    pub fn into_design(self, top: impl Into<String>) -> Design {
        let Main {
            circuit,
            board,
            bindings,
            inputs,
            outputs,
        } = self;
        drop(inputs);
        drop(outputs);
        Design {
            top: top.into(),
            board,
            ports: bindings,
            netlist: circuit.into_netlist(),
        }
    }
}
