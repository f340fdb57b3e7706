//! Builder handles over a shared [`Netlist`].
//!
//! `Signal` overloads `^`, `&`, `|` and `!`, so combinational logic is
//! written as plain Rust expressions and each operator appends one gate.

use crate::{GateOp, Netlist, NetlistError};
use petgraph::graph::NodeIndex;
use std::cell::RefCell;
use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Not};
use std::rc::Rc;

#[derive(Clone, Default)]
pub struct Circuit {
    inner: Rc<RefCell<Netlist>>,
}

impl Circuit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self, name: &str) -> Result<Signal, NetlistError> {
        let node = self.inner.borrow_mut().add_input(name)?;
        Ok(Signal {
            circuit: self.clone(),
            node,
        })
    }

    pub fn output(&self, name: &str) -> Result<Port, NetlistError> {
        let node = self.inner.borrow_mut().add_output(name)?;
        Ok(Port {
            circuit: self.clone(),
            node,
            name: name.to_string(),
        })
    }

    pub fn constant(&self, value: bool) -> Signal {
        let node = self.inner.borrow_mut().add_const(value);
        Signal {
            circuit: self.clone(),
            node,
        }
    }

    pub fn same(&self, other: &Circuit) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Copy of the netlist built so far.
    pub fn snapshot(&self) -> Netlist {
        self.inner.borrow().clone()
    }

    /// Take the netlist out, cloning only if signals are still alive.
    pub fn into_netlist(self) -> Netlist {
        match Rc::try_unwrap(self.inner) {
            Ok(cell) => cell.into_inner(),
            Err(shared) => shared.borrow().clone(),
        }
    }

    fn gate(&self, op: GateOp, operands: &[&Signal]) -> Signal {
        let nodes: Vec<NodeIndex> = operands
            .iter()
            .map(|signal| {
                assert!(
                    self.same(&signal.circuit),
                    "cannot combine signals from different circuits"
                );
                signal.node
            })
            .collect();
        let node = self.inner.borrow_mut().add_gate(op, &nodes);
        Signal {
            circuit: self.clone(),
            node,
        }
    }
}

impl fmt::Debug for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let netlist = self.inner.borrow();
        f.debug_struct("Circuit")
            .field("nodes", &netlist.graph.node_count())
            .field("edges", &netlist.graph.edge_count())
            .finish()
    }
}

/// A single-bit value inside a circuit.
#[derive(Debug, Clone)]
pub struct Signal {
    circuit: Circuit,
    node: NodeIndex,
}

impl Signal {
    pub fn node(&self) -> NodeIndex {
        self.node
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }
}

/// Write-only handle on an output node; the destination side of [`wire`].
#[derive(Debug, Clone)]
pub struct Port {
    circuit: Circuit,
    node: NodeIndex,
    name: String,
}

impl Port {
    pub fn node(&self) -> NodeIndex {
        self.node
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Record a connection from `source` to the output `destination`.
pub fn wire(source: &Signal, destination: &Port) -> Result<(), NetlistError> {
    if !source.circuit.same(&destination.circuit) {
        return Err(NetlistError::ForeignSignal);
    }
    destination
        .circuit
        .inner
        .borrow_mut()
        .connect(source.node, destination.node)
}

macro_rules! binary_gate {
    ($trait:ident, $method:ident, $op:expr) => {
        impl $trait for Signal {
            type Output = Signal;
            fn $method(self, rhs: Signal) -> Signal {
                self.circuit.gate($op, &[&self, &rhs])
            }
        }

        impl $trait<&Signal> for Signal {
            type Output = Signal;
            fn $method(self, rhs: &Signal) -> Signal {
                self.circuit.gate($op, &[&self, rhs])
            }
        }

        impl $trait<Signal> for &Signal {
            type Output = Signal;
            fn $method(self, rhs: Signal) -> Signal {
                self.circuit.gate($op, &[self, &rhs])
            }
        }

        impl $trait<&Signal> for &Signal {
            type Output = Signal;
            fn $method(self, rhs: &Signal) -> Signal {
                self.circuit.gate($op, &[self, rhs])
            }
        }
    };
}

binary_gate!(BitXor, bitxor, GateOp::Xor);
binary_gate!(BitAnd, bitand, GateOp::And);
binary_gate!(BitOr, bitor, GateOp::Or);

impl Not for Signal {
    type Output = Signal;
    fn not(self) -> Signal {
        self.circuit.gate(GateOp::Not, &[&self])
    }
}

impl Not for &Signal {
    type Output = Signal;
    fn not(self) -> Signal {
        self.circuit.gate(GateOp::Not, &[self])
    }
}
