//! Build configuration, read from a TOML file such as `config/stickhdl.toml`.

use crate::error::StickError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use stickhdl_codegen::CodegenConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct BuildConfig {
    /// Board description to load instead of the bundled iCEstick.
    #[serde(default)]
    pub board: Option<PathBuf>,
    #[serde(default = "default_top")]
    pub top: String,
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
    #[serde(default)]
    pub codegen: CodegenSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CodegenSection {
    #[serde(default = "default_true")]
    pub pcf: bool,
    #[serde(default = "default_true")]
    pub json: bool,
}

fn default_top() -> String {
    "main".to_string()
}
fn default_out_dir() -> PathBuf {
    PathBuf::from("build")
}
fn default_true() -> bool {
    true
}

impl Default for CodegenSection {
    fn default() -> Self {
        Self {
            pcf: true,
            json: true,
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            board: None,
            top: default_top(),
            out_dir: default_out_dir(),
            codegen: CodegenSection::default(),
        }
    }
}

impl BuildConfig {
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load from a file. A relative `board` path is resolved against the
    /// config file's directory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StickError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| StickError::Config(format!("{}: {e}", path.display())))?;
        let mut config = Self::from_toml(&content)
            .map_err(|e| StickError::Config(format!("{}: {e}", path.display())))?;
        if let Some(board) = config.board.take() {
            config.board = Some(match path.parent() {
                Some(dir) if board.is_relative() => dir.join(board),
                _ => board,
            });
        }
        Ok(config)
    }

    pub fn codegen_config(&self) -> CodegenConfig {
        CodegenConfig {
            emit_pcf: self.codegen.pcf,
            emit_json: self.codegen.json,
        }
    }
}
