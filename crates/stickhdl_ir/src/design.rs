use crate::{Direction, Netlist, NetlistError, is_gate_wire_name};
use serde::{Deserialize, Serialize};

const VERILOG_KEYWORDS: &[&str] = &[
    "always", "and", "assign", "begin", "buf", "case", "casex", "casez", "default", "defparam",
    "else", "end", "endcase", "endfunction", "endgenerate", "endmodule", "endtask", "for",
    "forever", "function", "generate", "genvar", "if", "initial", "inout", "input", "integer",
    "localparam", "module", "nand", "negedge", "nor", "not", "or", "output", "parameter",
    "posedge", "reg", "repeat", "signed", "supply0", "supply1", "task", "tri", "wand", "while",
    "wire", "wor", "xnor", "xor",
];

/// Check that `name` can be used verbatim as a Verilog module or port name.
pub fn check_identifier(name: &str) -> Result<(), NetlistError> {
    let invalid = |reason| {
        Err(NetlistError::InvalidName {
            name: name.to_string(),
            reason,
        })
    };
    let mut chars = name.chars();
    let well_formed = chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if !well_formed {
        return invalid("expected [A-Za-z_][A-Za-z0-9_$]*");
    }
    if VERILOG_KEYWORDS.contains(&name) {
        return invalid("Verilog keyword");
    }
    if is_gate_wire_name(name) {
        return invalid("reserved for generated gate wires");
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardInfo {
    pub name: String,
    pub device: String,
    pub package: String,
}

/// A top-level port pinned to a package site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PortBinding {
    pub name: String,
    pub site: u16,
    pub direction: Direction,
}

/// Finished design handed to code generation or simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Design {
    pub top: String,
    pub board: BoardInfo,
    pub ports: Vec<PortBinding>,
    pub netlist: Netlist,
}

impl Design {
    pub fn inputs(&self) -> impl Iterator<Item = &PortBinding> {
        self.ports
            .iter()
            .filter(|port| port.direction == Direction::Input)
    }

    pub fn outputs(&self) -> impl Iterator<Item = &PortBinding> {
        self.ports
            .iter()
            .filter(|port| port.direction == Direction::Output)
    }

    /// Check names are emittable, every bound port exists in the netlist,
    /// and the netlist is acyclic.
    pub fn validate(&self) -> Result<(), NetlistError> {
        check_identifier(&self.top)?;
        for (_, name) in self.netlist.inputs().into_iter().chain(self.netlist.outputs()) {
            check_identifier(name)?;
        }
        for binding in &self.ports {
            if self.netlist.port(&binding.name).is_none() {
                return Err(NetlistError::UnknownPort(binding.name.clone()));
            }
        }
        self.netlist.topological_order().map(|_| ())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
