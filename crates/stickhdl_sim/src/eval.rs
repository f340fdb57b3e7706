use crate::SimError;
use std::collections::BTreeMap;
use std::fmt;
use stickhdl_ir::{Design, Node, NodeIndex};

/// Enumerating more inputs than this is refused.
pub const MAX_TRUTH_TABLE_INPUTS: usize = 16;

/// Evaluates a design's netlist in a fixed topological order.
#[derive(Debug, Clone)]
pub struct Simulator {
    design: Design,
    /// Every node in topological order with its slot-ordered operands.
    schedule: Vec<(NodeIndex, Vec<NodeIndex>)>,
}

impl Simulator {
    pub fn new(design: &Design) -> Result<Self, SimError> {
        design.validate()?;
        let netlist = &design.netlist;
        let schedule: Vec<_> = netlist
            .topological_order()?
            .into_iter()
            .map(|node| (node, netlist.operands(node)))
            .collect();
        log::debug!(
            "simulator for {}: {} nodes, {} gates",
            design.top,
            schedule.len(),
            netlist.gate_count()
        );
        Ok(Self {
            design: design.clone(),
            schedule,
        })
    }

    /// Input names in port binding order.
    pub fn inputs(&self) -> Vec<&str> {
        self.design.inputs().map(|port| port.name.as_str()).collect()
    }

    pub fn outputs(&self) -> Vec<&str> {
        self.design.outputs().map(|port| port.name.as_str()).collect()
    }

    /// Fail on the first assigned name that is not an input of the design.
    pub fn check_stimulus(&self, inputs: &BTreeMap<String, bool>) -> Result<(), SimError> {
        match inputs
            .keys()
            .find(|name| !self.design.inputs().any(|port| &port.name == *name))
        {
            Some(name) => Err(SimError::UnknownInput(name.clone())),
            None => Ok(()),
        }
    }

    /// Output values for one input assignment. Undriven outputs read low.
    pub fn eval(&self, inputs: &BTreeMap<String, bool>) -> Result<BTreeMap<String, bool>, SimError> {
        self.check_stimulus(inputs)?;
        let graph = &self.design.netlist.graph;
        let mut values = vec![false; graph.node_count()];
        let mut outputs = BTreeMap::new();

        for (node, operands) in &self.schedule {
            let value = match &graph[*node] {
                Node::Input { port } => *inputs
                    .get(port)
                    .ok_or_else(|| SimError::MissingInput(port.clone()))?,
                Node::Const { value } => *value,
                Node::Gate { op } => {
                    let operands: Vec<bool> = operands
                        .iter()
                        .map(|operand| values[operand.index()])
                        .collect();
                    op.apply(&operands)
                }
                Node::Output { port } => {
                    let value = operands
                        .first()
                        .is_some_and(|driver| values[driver.index()]);
                    outputs.insert(port.clone(), value);
                    value
                }
            };
            values[node.index()] = value;
        }

        Ok(outputs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruthRow {
    pub inputs: Vec<bool>,
    pub outputs: Vec<bool>,
}

/// Every input assignment of a design with its outputs.
///
/// Rows count up in binary with the first input as the most significant bit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruthTable {
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub rows: Vec<TruthRow>,
}

pub fn truth_table(design: &Design) -> Result<TruthTable, SimError> {
    let simulator = Simulator::new(design)?;
    let inputs: Vec<String> = simulator.inputs().into_iter().map(str::to_string).collect();
    let outputs: Vec<String> = simulator.outputs().into_iter().map(str::to_string).collect();

    if inputs.len() > MAX_TRUTH_TABLE_INPUTS {
        return Err(SimError::TooManyInputs {
            count: inputs.len(),
            limit: MAX_TRUTH_TABLE_INPUTS,
        });
    }

    let width = inputs.len();
    let mut rows = Vec::with_capacity(1 << width);
    for pattern in 0u32..(1 << width) {
        let bits: Vec<bool> = (0..width)
            .map(|i| pattern >> (width - 1 - i) & 1 == 1)
            .collect();
        let assignment: BTreeMap<String, bool> = inputs.iter().cloned().zip(bits.iter().copied()).collect();
        let values = simulator.eval(&assignment)?;
        rows.push(TruthRow {
            inputs: bits,
            outputs: outputs
                .iter()
                .map(|name| values.get(name).copied().unwrap_or(false))
                .collect(),
        });
    }

    Ok(TruthTable {
        inputs,
        outputs,
        rows,
    })
}

fn bits(values: &[bool]) -> String {
    values
        .iter()
        .map(|&v| if v { "1" } else { "0" })
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for TruthTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "| {} | {} |", self.inputs.join(" "), self.outputs.join(" "))?;
        for row in &self.rows {
            writeln!(f, "| {} | {} |", bits(&row.inputs), bits(&row.outputs))?;
        }
        Ok(())
    }
}

/// Parse `S1=1,S2=0` into an input assignment.
pub fn parse_stimulus(text: &str) -> Result<BTreeMap<String, bool>, SimError> {
    let mut assignment = BTreeMap::new();
    for item in text.split(',').map(str::trim).filter(|item| !item.is_empty()) {
        let (name, value) = item
            .split_once('=')
            .ok_or_else(|| SimError::Stimulus(item.to_string()))?;
        let value = match value.trim() {
            "1" | "true" | "on" => true,
            "0" | "false" | "off" => false,
            _ => return Err(SimError::Stimulus(item.to_string())),
        };
        assignment.insert(name.trim().to_string(), value);
    }
    Ok(assignment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stickhdl_board::Board;
    use stickhdl_ir::wire;

    fn xor_design() -> Design {
        let mut board = Board::icestick().unwrap();
        board.header("J1", 0).unwrap().rename("A").input().on();
        board.header("J1", 1).unwrap().rename("B").input().on();
        board.pin("D1").unwrap().on();
        board.pin("D2").unwrap().on();
        let main = board.main().unwrap();
        let a = main.input("A").unwrap();
        let b = main.input("B").unwrap();
        wire(&(a ^ b), &main.output("D1").unwrap()).unwrap();
        main.into_design("xor_top")
    }

    #[test]
    fn evaluates_one_assignment() {
        let sim = Simulator::new(&xor_design()).unwrap();
        let out = sim.eval(&parse_stimulus("A=1,B=0").unwrap()).unwrap();
        assert_eq!(out.get("D1"), Some(&true));
        assert_eq!(out.get("D2"), Some(&false));
    }

    #[test]
    fn missing_input_is_an_error() {
        let sim = Simulator::new(&xor_design()).unwrap();
        let err = sim.eval(&parse_stimulus("A=1").unwrap()).unwrap_err();
        assert!(matches!(err, SimError::MissingInput(name) if name == "B"));
    }

    #[test]
    fn unknown_input_is_an_error() {
        let sim = Simulator::new(&xor_design()).unwrap();
        let stimulus = parse_stimulus("A=1,B=0,S9=1").unwrap();
        assert!(matches!(
            sim.check_stimulus(&stimulus),
            Err(SimError::UnknownInput(name)) if name == "S9"
        ));
        assert!(matches!(
            sim.eval(&stimulus),
            Err(SimError::UnknownInput(name)) if name == "S9"
        ));
        assert!(sim.check_stimulus(&parse_stimulus("B=1").unwrap()).is_ok());
    }

    #[test]
    fn evaluates_not_and_constants() {
        let mut board = Board::icestick().unwrap();
        board.header("J1", 0).unwrap().rename("A").input().on();
        board.pin("D1").unwrap().on();
        board.pin("D2").unwrap().on();
        let main = board.main().unwrap();
        let a = main.input("A").unwrap();
        let one = main.circuit().constant(true);
        wire(&!(a & one), &main.output("D1").unwrap()).unwrap();
        let sim = Simulator::new(&main.into_design("nand_top")).unwrap();

        for (level, d1) in [(false, true), (true, false)] {
            let out = sim.eval(&BTreeMap::from([("A".to_string(), level)])).unwrap();
            assert_eq!(out.get("D1"), Some(&d1));
            assert_eq!(out.get("D2"), Some(&false));
        }
    }

    #[test]
    fn table_counts_up_msb_first() {
        let table = truth_table(&xor_design()).unwrap();
        assert_eq!(table.inputs, vec!["A", "B"]);
        assert_eq!(table.outputs, vec!["D1", "D2"]);
        let d1: Vec<bool> = table.rows.iter().map(|row| row.outputs[0]).collect();
        assert_eq!(d1, vec![false, true, true, false]);
        assert_eq!(table.rows[1].inputs, vec![false, true]);
    }

    #[test]
    fn table_renders_as_markdown_rows() {
        let rendered = truth_table(&xor_design()).unwrap().to_string();
        assert!(rendered.starts_with("| A B | D1 D2 |\n"));
        assert!(rendered.contains("| 1 0 | 1 0 |\n"));
    }

    #[test]
    fn refuses_huge_tables() {
        let mut board = Board::icestick().unwrap();
        for (header, index) in ["J1", "J3"].iter().flat_map(|h| (0..8).map(move |i| (*h, i))) {
            board.header(header, index).unwrap().input().on();
        }
        board.pin("CLKIN").unwrap().on();
        let design = board.main().unwrap().into_design("wide");
        assert!(matches!(
            truth_table(&design),
            Err(SimError::TooManyInputs { count: 17, limit: 16 })
        ));
    }

    #[test]
    fn stimulus_syntax() {
        let parsed = parse_stimulus(" S1=1, S2=off ,S3=true").unwrap();
        assert_eq!(parsed.get("S1"), Some(&true));
        assert_eq!(parsed.get("S2"), Some(&false));
        assert_eq!(parsed.get("S3"), Some(&true));
        assert!(matches!(parse_stimulus("S1"), Err(SimError::Stimulus(_))));
        assert!(matches!(parse_stimulus("S1=2"), Err(SimError::Stimulus(_))));
    }
}
