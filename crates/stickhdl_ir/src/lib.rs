//! Netlist IR shared by the board, codegen and simulation crates.
//!
//! A [`Netlist`] is a DAG of single-bit nodes. Edges run from an operand
//! to the node consuming it and carry the operand slot, so `a ^ b` is a
//! `Gate { op: Xor }` node with edges `a -(0)-> gate` and `b -(1)-> gate`.

use petgraph::algo::toposort;
use petgraph::graph::DiGraph;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod circuit;
pub mod design;

pub use circuit::{Circuit, Port, Signal, wire};
pub use design::{BoardInfo, Design, PortBinding, check_identifier};
pub use petgraph::graph::NodeIndex;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetlistError {
    #[error("port `{0}` is declared twice")]
    DuplicatePort(String),
    #[error("output `{0}` is already driven")]
    AlreadyDriven(String),
    #[error("signal and port belong to different circuits")]
    ForeignSignal,
    #[error("no port named `{0}`")]
    UnknownPort(String),
    #[error("node {0} is not an output port")]
    NotAnOutput(usize),
    #[error("combinational loop through node {0}")]
    Cycle(usize),
    #[error("invalid name `{name}`: {reason}")]
    InvalidName { name: String, reason: &'static str },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Input,
    Output,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => f.write_str("input"),
            Self::Output => f.write_str("output"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GateOp {
    Not,
    And,
    Or,
    Xor,
}

impl GateOp {
    pub fn arity(self) -> usize {
        match self {
            Self::Not => 1,
            Self::And | Self::Or | Self::Xor => 2,
        }
    }

    /// Evaluate the gate. `operands` must hold exactly `arity()` values.
    pub fn apply(self, operands: &[bool]) -> bool {
        match (self, operands) {
            (Self::Not, [a]) => !a,
            (Self::And, [a, b]) => a & b,
            (Self::Or, [a, b]) => a | b,
            (Self::Xor, [a, b]) => a ^ b,
            _ => panic!(
                "{self:?} takes {} operands, got {}",
                self.arity(),
                operands.len()
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Input { port: String },
    Output { port: String },
    Const { value: bool },
    Gate { op: GateOp },
}

impl Node {
    pub fn port_name(&self) -> Option<&str> {
        match self {
            Self::Input { port } | Self::Output { port } => Some(port),
            Self::Const { .. } | Self::Gate { .. } => None,
        }
    }
}

/// Prefix of the wires generated for gate nodes. Port names of the form
/// `n<digits>` are rejected so they never collide with these.
pub const GATE_WIRE_PREFIX: char = 'n';

pub fn gate_wire_name(node: NodeIndex) -> String {
    format!("{GATE_WIRE_PREFIX}{}", node.index())
}

pub fn is_gate_wire_name(name: &str) -> bool {
    name.strip_prefix(GATE_WIRE_PREFIX)
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Netlist {
    pub graph: DiGraph<Node, usize>,
}

impl Netlist {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
        }
    }

    pub fn add_input(&mut self, name: &str) -> Result<NodeIndex, NetlistError> {
        self.add_port(Node::Input {
            port: name.to_string(),
        })
    }

    pub fn add_output(&mut self, name: &str) -> Result<NodeIndex, NetlistError> {
        self.add_port(Node::Output {
            port: name.to_string(),
        })
    }

    fn add_port(&mut self, node: Node) -> Result<NodeIndex, NetlistError> {
        if let Some(name) = node.port_name() {
            if self.port(name).is_some() {
                return Err(NetlistError::DuplicatePort(name.to_string()));
            }
        }
        Ok(self.graph.add_node(node))
    }

    pub fn add_const(&mut self, value: bool) -> NodeIndex {
        self.graph.add_node(Node::Const { value })
    }

    /// Append a gate. Operands must already exist and must not be outputs.
    pub fn add_gate(&mut self, op: GateOp, operands: &[NodeIndex]) -> NodeIndex {
        assert_eq!(
            operands.len(),
            op.arity(),
            "{op:?} takes {} operands",
            op.arity()
        );
        let gate = self.graph.add_node(Node::Gate { op });
        for (slot, &operand) in operands.iter().enumerate() {
            assert!(
                !matches!(self.graph[operand], Node::Output { .. }),
                "output ports cannot be read"
            );
            self.graph.add_edge(operand, gate, slot);
        }
        gate
    }

    /// Drive `output` from `source`. Each output accepts a single driver.
    pub fn connect(&mut self, source: NodeIndex, output: NodeIndex) -> Result<(), NetlistError> {
        let Node::Output { port } = &self.graph[output] else {
            return Err(NetlistError::NotAnOutput(output.index()));
        };
        if self.driver(output).is_some() {
            return Err(NetlistError::AlreadyDriven(port.clone()));
        }
        log::debug!("wire node {} -> {port}", source.index());
        self.graph.add_edge(source, output, 0);
        Ok(())
    }

    /// Operands of `node`, ordered by slot.
    pub fn operands(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut edges: Vec<(usize, NodeIndex)> = self
            .graph
            .edges_directed(node, petgraph::Direction::Incoming)
            .map(|edge| (*edge.weight(), edge.source()))
            .collect();
        edges.sort_by_key(|(slot, _)| *slot);
        edges.into_iter().map(|(_, source)| source).collect()
    }

    pub fn driver(&self, output: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .edges_directed(output, petgraph::Direction::Incoming)
            .next()
            .map(|edge| edge.source())
    }

    pub fn port(&self, name: &str) -> Option<NodeIndex> {
        self.graph
            .node_indices()
            .find(|&index| self.graph[index].port_name() == Some(name))
    }

    pub fn inputs(&self) -> Vec<(NodeIndex, &str)> {
        self.ports_where(|node| matches!(node, Node::Input { .. }))
    }

    pub fn outputs(&self) -> Vec<(NodeIndex, &str)> {
        self.ports_where(|node| matches!(node, Node::Output { .. }))
    }

    fn ports_where(&self, keep: impl Fn(&Node) -> bool) -> Vec<(NodeIndex, &str)> {
        self.graph
            .node_indices()
            .filter(|&index| keep(&self.graph[index]))
            .filter_map(|index| self.graph[index].port_name().map(|name| (index, name)))
            .collect()
    }

    pub fn gate_count(&self) -> usize {
        self.graph
            .node_weights()
            .filter(|node| matches!(node, Node::Gate { .. }))
            .count()
    }

    pub fn topological_order(&self) -> Result<Vec<NodeIndex>, NetlistError> {
        toposort(&self.graph, None).map_err(|cycle| NetlistError::Cycle(cycle.node_id().index()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operands_follow_slot_order() {
        let mut netlist = Netlist::new();
        let a = netlist.add_input("a").unwrap();
        let b = netlist.add_input("b").unwrap();
        let gate = netlist.add_gate(GateOp::And, &[b, a]);
        assert_eq!(netlist.operands(gate), vec![b, a]);
    }

    #[test]
    fn rejects_duplicate_port_names() {
        let mut netlist = Netlist::new();
        netlist.add_input("S1").unwrap();
        assert_eq!(
            netlist.add_output("S1"),
            Err(NetlistError::DuplicatePort("S1".into()))
        );
    }

    #[test]
    fn output_accepts_one_driver() {
        let mut netlist = Netlist::new();
        let a = netlist.add_input("a").unwrap();
        let led = netlist.add_output("led").unwrap();
        netlist.connect(a, led).unwrap();
        assert_eq!(netlist.driver(led), Some(a));
        assert_eq!(
            netlist.connect(a, led),
            Err(NetlistError::AlreadyDriven("led".into()))
        );
    }

    #[test]
    fn connect_requires_output_destination() {
        let mut netlist = Netlist::new();
        let a = netlist.add_input("a").unwrap();
        let b = netlist.add_input("b").unwrap();
        assert_eq!(
            netlist.connect(a, b),
            Err(NetlistError::NotAnOutput(b.index()))
        );
    }

    #[test]
    fn topological_order_puts_operands_first() {
        let mut netlist = Netlist::new();
        let a = netlist.add_input("a").unwrap();
        let b = netlist.add_input("b").unwrap();
        let x = netlist.add_gate(GateOp::Xor, &[a, b]);
        let n = netlist.add_gate(GateOp::Not, &[x]);
        let order = netlist.topological_order().unwrap();
        let pos = |node| order.iter().position(|&i| i == node).unwrap();
        assert!(pos(a) < pos(x));
        assert!(pos(b) < pos(x));
        assert!(pos(x) < pos(n));
    }

    #[test]
    fn detects_cycles_in_hand_built_graphs() {
        let mut netlist = Netlist::new();
        let a = netlist.add_input("a").unwrap();
        let g = netlist.add_gate(GateOp::Not, &[a]);
        let h = netlist.add_gate(GateOp::Not, &[g]);
        netlist.graph.add_edge(h, g, 1);
        assert!(matches!(
            netlist.topological_order(),
            Err(NetlistError::Cycle(_))
        ));
    }

    #[test]
    fn gate_op_truth() {
        assert!(GateOp::Xor.apply(&[true, false]));
        assert!(!GateOp::Xor.apply(&[true, true]));
        assert!(GateOp::Or.apply(&[false, true]));
        assert!(!GateOp::And.apply(&[false, true]));
        assert!(GateOp::Not.apply(&[false]));
    }

    #[test]
    fn node_serializes_with_kind_tag() {
        let json = serde_json::to_value(Node::Gate { op: GateOp::Xor }).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "gate", "op": "xor" }));
    }
}
