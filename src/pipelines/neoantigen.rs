use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::cli::Arguments;
use crate::config::defs::{PipelineError, STATS_JSON};
use crate::config::{load_run_config, RunConfig};
use crate::pipelines::engine::{EngineRequest, WorkflowEngine};
use crate::targets::{derive_catalog, resolve_mode, select_targets, ModeFlags, RunMode};
use crate::utils::command::snakemake::mem_mb;
use crate::utils::system::{check_memory_budget, detect_cores};


/// Validates the requested targets and, when they pass, hands them to the engine.
/// Nothing reaches the engine if config, mode or target validation fails.
///
/// # Arguments
///
/// * `args` - Parsed command line.
/// * `engine` - Workflow engine to dispatch to.
///
/// # Returns
///
/// Ok on engine success (or after `--list-targets`).
pub async fn run<E: WorkflowEngine>(args: &Arguments, engine: &E) -> Result<(), PipelineError> {
    let config = load_run_config(Path::new(&args.configfile))?;
    info!("Loaded config for sample {}", config.sample_name());

    let mode = resolve_mode(&config, &ModeFlags::from(args))?;
    info!(
        "Run mode: {}{}, {} GB",
        if mode.dna_only { "DNA only" } else { "DNA + RNA" },
        if mode.somatic_only { ", somatic variant calling only" } else { "" },
        mode.memory_gb
    );

    if args.list_targets {
        let catalog = derive_catalog(&config, &mode);
        let json = serde_json::to_string_pretty(&catalog)
            .map_err(|e| PipelineError::IOError(e.to_string()))?;
        println!("{}", json);
        return Ok(());
    }

    let targets = select_targets(&config, &mode)?;
    info!("{} target(s) selected", targets.len());
    for target in &targets {
        debug!("  {}", target.display());
    }

    check_memory_budget(mode.memory_gb);
    let request = build_request(args, &config, &mode, targets);

    if engine.run(&request).await? {
        Ok(())
    } else {
        Err(PipelineError::EngineFailed)
    }
}


/// Assembles the engine request for validated targets.
pub fn build_request(args: &Arguments, config: &RunConfig, mode: &RunMode, targets: Vec<PathBuf>) -> EngineRequest {
    let cores = detect_cores(args.cores);
    let stats = match &args.stats {
        Some(path) => PathBuf::from(path),
        None => config.output_dir().join(STATS_JSON),
    };

    EngineRequest {
        targets,
        dry_run: args.dry_run,
        configfile: PathBuf::from(&args.configfile),
        snakefile: PathBuf::from(&args.snakefile),
        cores,
        mem_mb: mem_mb(mode.memory_gb),
        num_threads: cores,
        mem_gb: mode.memory_gb,
        stats,
    }
}
