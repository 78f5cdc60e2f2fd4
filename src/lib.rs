// src/lib.rs
pub mod config;
pub mod utils;
pub mod pipelines;
pub mod targets;
pub mod cli;
pub use cli::Arguments;
