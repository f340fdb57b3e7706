//! Code generation: Design → structural Verilog, PCF pin constraints and
//! a JSON netlist dump, ready for yosys / nextpnr-ice40.

pub mod pcf;
pub mod verilog;

pub use pcf::emit_pcf;
pub use verilog::emit_verilog;

use std::fs;
use std::path::{Path, PathBuf};
use stickhdl_ir::{Design, NetlistError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to serialize netlist: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Netlist(#[from] NetlistError),
}

#[derive(Debug, Clone)]
pub struct CodegenConfig {
    pub emit_pcf: bool,
    pub emit_json: bool,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            emit_pcf: true,
            emit_json: true,
        }
    }
}

/// Write `<top>.v` (and optionally `<top>.pcf`, `<top>.json`) into
/// `output_dir`, returning the paths written.
pub fn generate_project(
    design: &Design,
    config: &CodegenConfig,
    output_dir: &Path,
) -> Result<Vec<PathBuf>, CodegenError> {
    // emit_verilog validates `design.top`, so it is a plain file stem here.
    let mut files = vec![(format!("{}.v", design.top), emit_verilog(design)?)];
    if config.emit_pcf {
        files.push((format!("{}.pcf", design.top), emit_pcf(design)));
    }
    if config.emit_json {
        files.push((format!("{}.json", design.top), design.to_json()?));
    }

    fs::create_dir_all(output_dir).map_err(|source| CodegenError::Io {
        path: output_dir.display().to_string(),
        source,
    })?;

    let mut written = Vec::with_capacity(files.len());
    for (name, contents) in files {
        let path = output_dir.join(name);
        fs::write(&path, contents).map_err(|source| CodegenError::Io {
            path: path.display().to_string(),
            source,
        })?;
        log::info!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}
