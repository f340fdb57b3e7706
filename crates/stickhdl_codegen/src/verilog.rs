use std::fmt::Write;
use stickhdl_ir::{Design, GateOp, Netlist, NetlistError, Node, NodeIndex, gate_wire_name};

/// Name of `node` when used as an operand in Verilog.
fn operand_expr(netlist: &Netlist, node: NodeIndex) -> String {
    match &netlist.graph[node] {
        Node::Input { port } | Node::Output { port } => port.clone(),
        Node::Const { value: true } => "1'b1".to_string(),
        Node::Const { value: false } => "1'b0".to_string(),
        Node::Gate { .. } => gate_wire_name(node),
    }
}

fn gate_expr(netlist: &Netlist, op: GateOp, node: NodeIndex) -> String {
    let operands: Vec<String> = netlist
        .operands(node)
        .into_iter()
        .map(|operand| operand_expr(netlist, operand))
        .collect();
    match (op, operands.as_slice()) {
        (GateOp::Not, [a]) => format!("~{a}"),
        (GateOp::And, [a, b]) => format!("{a} & {b}"),
        (GateOp::Or, [a, b]) => format!("{a} | {b}"),
        (GateOp::Xor, [a, b]) => format!("{a} ^ {b}"),
        _ => format!("/* malformed {op:?} */ 1'b0"),
    }
}

fn emit_module_header(out: &mut String, design: &Design) {
    writeln!(
        out,
        "// {} top for {} ({}-{})",
        design.top, design.board.name, design.board.device, design.board.package
    )
    .unwrap();
    writeln!(out, "module {} (", design.top).unwrap();
    let count = design.ports.len();
    for (index, port) in design.ports.iter().enumerate() {
        let sep = if index + 1 == count { "" } else { "," };
        writeln!(out, "    {} {}{sep}", port.direction, port.name).unwrap();
    }
    writeln!(out, ");").unwrap();
}

/// One `wire` per gate, in dependency order.
fn emit_gates(out: &mut String, netlist: &Netlist) -> Result<(), NetlistError> {
    for node in netlist.topological_order()? {
        if let Node::Gate { op } = &netlist.graph[node] {
            writeln!(
                out,
                "    wire {} = {};",
                gate_wire_name(node),
                gate_expr(netlist, *op, node)
            )
            .unwrap();
        }
    }
    Ok(())
}

fn emit_assigns(out: &mut String, netlist: &Netlist) {
    for (node, port) in netlist.outputs() {
        let source = match netlist.driver(node) {
            Some(driver) => operand_expr(netlist, driver),
            None => {
                log::warn!("output {port} is not driven, tying it low");
                "1'b0".to_string()
            }
        };
        writeln!(out, "    assign {port} = {source};").unwrap();
    }
}

/// Render the design as a single structural Verilog module.
pub fn emit_verilog(design: &Design) -> Result<String, NetlistError> {
    design.validate()?;
    let mut out = String::new();
    emit_module_header(&mut out, design);
    if design.netlist.gate_count() > 0 {
        writeln!(out).unwrap();
        emit_gates(&mut out, &design.netlist)?;
    }
    writeln!(out).unwrap();
    emit_assigns(&mut out, &design.netlist);
    writeln!(out, "endmodule").unwrap();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stickhdl_board::Board;
    use stickhdl_ir::wire;

    fn and_gate_design() -> Design {
        let mut board = Board::icestick().unwrap();
        board.header("J1", 0).unwrap().rename("A").input().on();
        board.header("J1", 1).unwrap().rename("B").input().on();
        board.pin("D1").unwrap().on();
        board.pin("D2").unwrap().on();
        let main = board.main().unwrap();
        let y = main.input("A").unwrap() & main.input("B").unwrap();
        wire(&y, &main.output("D1").unwrap()).unwrap();
        main.into_design("and_top")
    }

    #[test]
    fn module_lists_ports_in_binding_order() {
        let verilog = emit_verilog(&and_gate_design()).unwrap();
        assert!(verilog.contains("module and_top ("));
        assert!(verilog.contains("    input A,\n    input B,\n    output D1,\n    output D2\n);"));
        assert!(verilog.trim_end().ends_with("endmodule"));
    }

    #[test]
    fn gates_become_wires_and_outputs_assigns() {
        let design = and_gate_design();
        let verilog = emit_verilog(&design).unwrap();
        let d1 = design.netlist.port("D1").unwrap();
        let gate = design.netlist.driver(d1).unwrap();
        assert!(verilog.contains(&format!("wire n{} = A & B;", gate.index())));
        assert!(verilog.contains(&format!("assign D1 = n{};", gate.index())));
    }

    #[test]
    fn undriven_output_is_tied_low() {
        let verilog = emit_verilog(&and_gate_design()).unwrap();
        assert!(verilog.contains("assign D2 = 1'b0;"));
    }

    #[test]
    fn port_named_like_a_gate_wire_is_refused() {
        let mut netlist = Netlist::new();
        let b = netlist.add_input("B").unwrap();
        let n3 = netlist.add_input("n3").unwrap();
        let led = netlist.add_output("D1").unwrap();
        let gate = netlist.add_gate(GateOp::And, &[b, n3]);
        assert_eq!(gate.index(), 3);
        netlist.connect(gate, led).unwrap();
        let design = Design {
            netlist,
            ..and_gate_design()
        };
        assert!(matches!(
            emit_verilog(&design),
            Err(NetlistError::InvalidName { name, .. }) if name == "n3"
        ));
    }

    #[test]
    fn keyword_top_is_refused() {
        let design = Design {
            top: "module".into(),
            ..and_gate_design()
        };
        assert!(matches!(
            emit_verilog(&design),
            Err(NetlistError::InvalidName { name, .. }) if name == "module"
        ));
    }

    #[test]
    fn constants_and_not_render() {
        let mut board = Board::icestick().unwrap();
        board.pin("D3").unwrap().on();
        let main = board.main().unwrap();
        let one = main.circuit().constant(true);
        wire(&!one, &main.output("D3").unwrap()).unwrap();
        let verilog = emit_verilog(&main.into_design("const_top")).unwrap();
        assert!(verilog.contains("= ~1'b1;"));
    }
}
