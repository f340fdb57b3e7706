pub mod adder;
pub mod config;
pub mod demo;
pub mod error;

pub use adder::fulladder;
pub use config::BuildConfig;
pub use demo::{build_fulladder, fulladder_design};
pub use error::StickError;
