pub mod defs;
pub mod run_config;

pub use run_config::{load_run_config, RunConfig};
