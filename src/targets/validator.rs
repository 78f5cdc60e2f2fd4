// src/targets/validator.rs: explicit target checks

use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::config::RunConfig;
use crate::config::defs::{InvalidTargetReason, PipelineError};
use crate::targets::catalog::{capability_catalog, derive_catalog, stage_availability};
use crate::targets::mode::RunMode;
use crate::targets::naming;


/// Computes the target list handed to the workflow engine.
///
/// With no explicit target the whole catalog for the mode is returned.
/// An explicit target must be byte-for-byte one of the catalog's paths; it
/// is then the only target.
///
/// # Arguments
///
/// * `config` - Validated run configuration.
/// * `mode` - Resolved run mode, carrying the optional explicit target.
///
/// # Returns
///
/// Target paths, or InvalidTarget naming the rejected path and why.
pub fn select_targets(config: &RunConfig, mode: &RunMode) -> Result<Vec<PathBuf>, PipelineError> {
    let catalog = derive_catalog(config, mode);
    debug!("{} targets available in this mode", catalog.len());

    let Some(target) = &mode.explicit_target else {
        return Ok(catalog.to_target_list());
    };

    if let Some(stage) = catalog.stage_of(target) {
        info!("Accepted {} target {}", stage, target.display());
        return Ok(vec![target.clone()]);
    }

    Err(PipelineError::InvalidTarget {
        target: target.clone(),
        reason: rejection_reason(config, mode, target),
    })
}


/// Tells apart a path the mode rules out, one the configuration never
/// produces, and one that follows no naming pattern at all.
fn rejection_reason(config: &RunConfig, mode: &RunMode, target: &Path) -> InvalidTargetReason {
    if let Some(stage) = capability_catalog(config).stage_of(target) {
        let detail = stage_availability(config, mode, stage)
            .err()
            .unwrap_or_else(|| "not selected".to_string());
        return InvalidTargetReason::UnavailableInMode { stage, detail };
    }
    match naming::recognize(config, target) {
        Some(stage) => InvalidTargetReason::UnconfiguredCombination(stage),
        None => InvalidTargetReason::UnknownPattern,
    }
}
