// src/targets/catalog.rs: legal targets per stage for a (config, mode) pair

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::RunConfig;
use crate::config::defs::TargetStage;
use crate::targets::mode::RunMode;
use crate::targets::naming;


/// Immutable, stage-partitioned set of output paths. Only stages available
/// in the mode it was derived for are present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TargetSet {
    stages: BTreeMap<TargetStage, Vec<PathBuf>>,
}

impl TargetSet {
    pub fn stage(&self, stage: TargetStage) -> &[PathBuf] {
        self.stages.get(&stage).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn stages(&self) -> impl Iterator<Item = TargetStage> + '_ {
        self.stages.keys().copied()
    }

    /// Exact match on the path's bytes.
    pub fn stage_of(&self, path: &Path) -> Option<TargetStage> {
        self.stages
            .iter()
            .find(|(_, paths)| paths.iter().any(|p| p.as_os_str() == path.as_os_str()))
            .map(|(stage, _)| *stage)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.stage_of(path).is_some()
    }

    /// All paths, stage by stage.
    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.stages.values().flatten()
    }

    pub fn to_target_list(&self) -> Vec<PathBuf> {
        self.paths().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.stages.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}


/// One VCF per configured caller, in configured order.
pub fn somatic_vcf_targets(config: &RunConfig) -> Vec<PathBuf> {
    let output_dir = config.output_dir();
    config
        .variant_callers
        .iter()
        .map(|caller| naming::somatic_vcf_path(&output_dir, *caller))
        .collect()
}

/// The vaccine-peptide report in all four formats. Empty unless both variant
/// callers and epitope prediction are configured.
pub fn default_vaxrank_targets(config: &RunConfig) -> Vec<PathBuf> {
    match config.epitope_prediction() {
        Some((predictor, database)) if !config.variant_callers.is_empty() => {
            let base = naming::vaccine_report_base(predictor, database, &config.variant_callers);
            naming::vaccine_report_paths(&config.output_dir(), &base)
        }
        _ => Vec::new(),
    }
}

/// Paths the configuration can produce for `stage`, ignoring the run mode.
pub fn stage_targets(config: &RunConfig, stage: TargetStage) -> Vec<PathBuf> {
    let output_dir = config.output_dir();
    match stage {
        TargetStage::SomaticVcf => somatic_vcf_targets(config),
        TargetStage::VaccineReport => default_vaxrank_targets(config),
        TargetStage::RnaAlignment => naming::rna_alignment_paths(&output_dir),
        TargetStage::Qc => naming::qc_paths(&output_dir, config.has_capture_kit()),
        TargetStage::ReferencePrep => naming::reference_prep_paths(&config.reference.genome),
        TargetStage::GermlineVcf => naming::germline_vcf_paths(&output_dir, config.has_capture_kit()),
    }
}


/// Availability predicate of `stage` under `mode`.
///
/// # Returns
///
/// Ok when the stage may be built, otherwise a short description of what
/// rules it out.
pub fn stage_availability(config: &RunConfig, mode: &RunMode, stage: TargetStage) -> Result<(), String> {
    match stage {
        TargetStage::SomaticVcf | TargetStage::Qc | TargetStage::ReferencePrep => Ok(()),
        TargetStage::GermlineVcf => {
            if mode.somatic_only {
                Err("germline calling is skipped with --somatic-variant-calling-only".to_string())
            } else {
                Ok(())
            }
        }
        TargetStage::RnaAlignment => {
            if mode.dna_only {
                return Err("the configuration has no RNA input".to_string());
            }
            if mode.somatic_only {
                return Err("RNA is not processed with --somatic-variant-calling-only".to_string());
            }
            match config.rna_min_memory_gb {
                Some(min) if mode.memory_gb < min => Err(format!(
                    "RNA alignment needs at least {} GB of memory, {} GB given",
                    min, mode.memory_gb
                )),
                _ => Ok(()),
            }
        }
        TargetStage::VaccineReport => stage_availability(config, mode, TargetStage::RnaAlignment)
            .map_err(|e| format!("the report needs RNA expression data, but {}", e)),
    }
}


/// Every target available for `(config, mode)`. Same inputs, same set.
pub fn derive_catalog(config: &RunConfig, mode: &RunMode) -> TargetSet {
    let stages = TargetStage::ALL
        .iter()
        .filter(|stage| stage_availability(config, mode, **stage).is_ok())
        .map(|stage| (*stage, stage_targets(config, *stage)))
        .filter(|(_, paths)| !paths.is_empty())
        .collect();
    TargetSet { stages }
}

/// Every target the configuration could produce under its most permissive
/// run mode.
pub fn capability_catalog(config: &RunConfig) -> TargetSet {
    let stages = TargetStage::ALL
        .iter()
        .map(|stage| (*stage, stage_targets(config, *stage)))
        .filter(|(_, paths)| !paths.is_empty())
        .collect();
    TargetSet { stages }
}
