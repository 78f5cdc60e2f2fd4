// src/pipelines/engine.rs: hand-off to the workflow engine

use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;

use log::{debug, info};
use serde::Serialize;
use tokio::process::Command;

use crate::config::defs::{PipelineError, SNAKEMAKE_TAG};
use crate::utils::command::{check_version, generate_cli};


/// Everything the engine is told about a run. Targets are already validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineRequest {
    pub targets: Vec<PathBuf>,
    pub dry_run: bool,
    pub configfile: PathBuf,
    pub snakefile: PathBuf,
    pub cores: usize,
    pub mem_mb: u64,
    /// Forwarded as `--config num_threads=.. mem_gb=..` for the rules.
    pub num_threads: usize,
    pub mem_gb: u32,
    pub stats: PathBuf,
}


/// The DAG engine. Only success or failure of a run is observed.
pub trait WorkflowEngine {
    fn run(&self, request: &EngineRequest) -> impl Future<Output = Result<bool, PipelineError>> + Send;
}


/// Runs `snakemake` as a child process with inherited stdio.
#[derive(Debug, Clone)]
pub struct SnakemakeEngine {
    pub bin: String,
}

impl SnakemakeEngine {
    pub fn new(bin: impl Into<String>) -> Self {
        SnakemakeEngine { bin: bin.into() }
    }
}

impl WorkflowEngine for SnakemakeEngine {
    async fn run(&self, request: &EngineRequest) -> Result<bool, PipelineError> {
        let version = check_version(SNAKEMAKE_TAG, &self.bin).await?;
        debug!("Using {} {}", self.bin, version);

        let args = generate_cli(SNAKEMAKE_TAG, request)?;
        info!("Running: {} {}", self.bin, args.join(" "));

        let status = Command::new(&self.bin)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| PipelineError::ToolExecution {
                tool: self.bin.clone(),
                error: e.to_string(),
            })?;

        info!("{} exited with {}", self.bin, status);
        Ok(status.success())
    }
}
