use std::fmt::Write;
use stickhdl_ir::Design;

/// Physical constraints for icestorm/nextpnr: one `set_io` per port.
pub fn emit_pcf(design: &Design) -> String {
    let mut out = String::new();
    writeln!(
        out,
        "# {} on {} ({}-{})",
        design.top, design.board.name, design.board.device, design.board.package
    )
    .unwrap();
    for port in &design.ports {
        writeln!(out, "set_io {} {}", port.name, port.site).unwrap();
    }
    out
}
