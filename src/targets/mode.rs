// src/targets/mode.rs: CLI flags + config -> RunMode

use std::path::PathBuf;

use log::debug;

use crate::cli::Arguments;
use crate::config::RunConfig;
use crate::config::defs::PipelineError;


/// Normalized run mode. Derived per invocation, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunMode {
    /// No RNA input is configured.
    pub dna_only: bool,
    /// Only somatic VCFs (plus DNA-side QC and reference prep) are wanted.
    pub somatic_only: bool,
    pub memory_gb: u32,
    pub explicit_target: Option<PathBuf>,
}

/// Mode flags as they arrive from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeFlags {
    pub somatic_only: bool,
    pub memory_gb: u32,
    pub target: Option<PathBuf>,
}

impl From<&Arguments> for ModeFlags {
    fn from(args: &Arguments) -> Self {
        ModeFlags {
            somatic_only: args.somatic_variant_calling_only,
            memory_gb: args.memory,
            target: args.target.as_ref().map(PathBuf::from),
        }
    }
}


/// Resolves the run mode.
///
/// `dna_only` comes from the config alone; `--somatic-variant-calling-only`
/// narrows what is requested and needs tumor, normal and a caller to be
/// configured. RNA inputs may be present and simply go unused.
///
/// # Arguments
///
/// * `config` - Validated run configuration.
/// * `flags` - Mode flags from the command line.
///
/// # Returns
///
/// RunMode, or InvalidModeConfiguration when the flags ask for something the
/// config cannot support.
pub fn resolve_mode(config: &RunConfig, flags: &ModeFlags) -> Result<RunMode, PipelineError> {
    if flags.memory_gb == 0 {
        return Err(PipelineError::InvalidModeConfiguration(
            "memory budget must be a positive number of GB".to_string(),
        ));
    }

    if flags.somatic_only && !config.is_dna_capable() {
        return Err(PipelineError::InvalidModeConfiguration(format!(
            "--somatic-variant-calling-only needs tumor and normal DNA input and at least one variant caller; sample {} has {} tumor fragment(s), {} normal fragment(s), {} caller(s)",
            config.sample_name(),
            config.input.tumor.len(),
            config.input.normal.len(),
            config.variant_callers.len()
        )));
    }

    let mode = RunMode {
        dna_only: !config.has_rna(),
        somatic_only: flags.somatic_only,
        memory_gb: flags.memory_gb,
        explicit_target: flags.target.clone(),
    };
    debug!("Resolved run mode: {:?}", mode);
    Ok(mode)
}
