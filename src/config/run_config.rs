// src/config/run_config.rs: typed YAML run configuration

use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

use log::debug;
use serde::Deserialize;

use crate::config::defs::{PipelineError, VariantCaller};


#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReadLayout {
    PairedEnd,
    SingleEnd,
}

/// One sequencing fragment (lane) of FASTQ input.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FastqInput {
    #[serde(default)]
    pub fragment_id: Option<String>,
    #[serde(rename = "type")]
    pub layout: ReadLayout,
    #[serde(default)]
    pub r1: Option<PathBuf>,
    #[serde(default)]
    pub r2: Option<PathBuf>,
    #[serde(default)]
    pub r: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputConfig {
    pub id: String,
    #[serde(default)]
    pub normal: Vec<FastqInput>,
    #[serde(default)]
    pub tumor: Vec<FastqInput>,
    #[serde(default)]
    pub rna: Vec<FastqInput>,
}

/// Reference files. Only `genome` feeds target names; the rest is forwarded
/// to the rules untouched.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReferenceConfig {
    pub genome: PathBuf,
    #[serde(default)]
    pub dbsnp: Option<PathBuf>,
    #[serde(default)]
    pub cosmic: Option<PathBuf>,
    #[serde(default)]
    pub transcripts: Option<PathBuf>,
    #[serde(default)]
    pub capture_kit_coverage_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    pub workdir: PathBuf,
    pub input: InputConfig,
    pub reference: ReferenceConfig,
    #[serde(default)]
    pub variant_callers: Vec<VariantCaller>,
    #[serde(default)]
    pub mhc_predictor: Option<String>,
    #[serde(default)]
    pub mhc_database: Option<String>,
    #[serde(default)]
    pub mhc_alleles: Vec<String>,
    #[serde(default)]
    pub vaxrank: Option<serde_yaml::Mapping>,
    /// Smallest memory budget (GB) RNA alignment is attempted with.
    #[serde(default)]
    pub rna_min_memory_gb: Option<u32>,
}


impl RunConfig {
    /// Parses and validates a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, PipelineError> {
        let config: RunConfig = serde_yaml::from_str(yaml)
            .map_err(|e| PipelineError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn sample_name(&self) -> &str {
        &self.input.id
    }

    /// Every per-sample artifact lives under `{workdir}/{sample}`.
    pub fn output_dir(&self) -> PathBuf {
        self.workdir.join(&self.input.id)
    }

    /// Directory holding the genome FASTA and its derived indexes.
    pub fn reference_dir(&self) -> PathBuf {
        self.reference
            .genome
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }

    pub fn has_rna(&self) -> bool {
        !self.input.rna.is_empty()
    }

    pub fn has_capture_kit(&self) -> bool {
        self.reference.capture_kit_coverage_file.is_some()
    }

    /// Tumor and normal DNA plus at least one somatic caller.
    pub fn is_dna_capable(&self) -> bool {
        !self.input.normal.is_empty() && !self.input.tumor.is_empty() && !self.variant_callers.is_empty()
    }

    /// `(predictor, database)` when epitope prediction is configured.
    pub fn epitope_prediction(&self) -> Option<(&str, &str)> {
        match (&self.mhc_predictor, &self.mhc_database) {
            (Some(predictor), Some(database)) => Some((predictor.as_str(), database.as_str())),
            _ => None,
        }
    }

    /// Rejects values the YAML schema alone cannot rule out.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.input.id.trim().is_empty() {
            return Err(PipelineError::InvalidConfig("input.id must not be empty".to_string()));
        }
        if !is_single_component(&self.input.id) {
            return Err(PipelineError::InvalidConfig(format!(
                "input.id must be a single path component, got {}",
                self.input.id
            )));
        }
        if self.workdir.as_os_str().is_empty() {
            return Err(PipelineError::InvalidConfig("workdir must not be empty".to_string()));
        }
        if self.reference.genome.file_name().is_none() {
            return Err(PipelineError::InvalidConfig(format!(
                "reference.genome must name a FASTA file, got {}",
                self.reference.genome.display()
            )));
        }

        let mut seen = HashSet::new();
        for caller in &self.variant_callers {
            if !seen.insert(caller) {
                return Err(PipelineError::InvalidConfig(format!(
                    "variant caller {} listed more than once",
                    caller
                )));
            }
        }

        match (&self.mhc_predictor, &self.mhc_database) {
            (Some(_), None) | (None, Some(_)) => {
                return Err(PipelineError::InvalidConfig(
                    "mhc_predictor and mhc_database must be given together".to_string(),
                ));
            }
            (Some(p), Some(d)) if p.trim().is_empty() || d.trim().is_empty() => {
                return Err(PipelineError::InvalidConfig(
                    "mhc_predictor and mhc_database must not be empty".to_string(),
                ));
            }
            (Some(p), Some(d)) if has_separator(p) || has_separator(d) => {
                return Err(PipelineError::InvalidConfig(format!(
                    "mhc_predictor and mhc_database end up in report file names and must not contain a path separator, got {} and {}",
                    p, d
                )));
            }
            _ => {}
        }

        if self.has_rna() && self.reference.transcripts.is_none() {
            return Err(PipelineError::InvalidConfig(
                "RNA input requires reference.transcripts".to_string(),
            ));
        }

        if self.rna_min_memory_gb == Some(0) {
            return Err(PipelineError::InvalidConfig("rna_min_memory_gb must be positive".to_string()));
        }

        for (tissue, fragments) in [
            ("normal", &self.input.normal),
            ("tumor", &self.input.tumor),
            ("rna", &self.input.rna),
        ] {
            for fragment in fragments {
                validate_fragment(tissue, fragment)?;
            }
        }

        debug!(
            "Config for sample {} validated: {} caller(s), RNA {}",
            self.input.id,
            self.variant_callers.len(),
            if self.has_rna() { "present" } else { "absent" }
        );
        Ok(())
    }
}


/// The sample id names a directory under `workdir`, so it must be exactly one
/// normal path component (no `.`, `..`, root or separator).
fn is_single_component(id: &str) -> bool {
    if has_separator(id) {
        return false;
    }
    let mut components = Path::new(id).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

fn has_separator(name: &str) -> bool {
    name.contains('/') || name.contains(MAIN_SEPARATOR)
}


fn validate_fragment(tissue: &str, fragment: &FastqInput) -> Result<(), PipelineError> {
    let label = fragment.fragment_id.as_deref().unwrap_or("<unnamed>");
    let ok = match fragment.layout {
        ReadLayout::PairedEnd => fragment.r1.is_some() && fragment.r2.is_some(),
        ReadLayout::SingleEnd => fragment.r.is_some() || fragment.r1.is_some(),
    };
    if ok {
        Ok(())
    } else {
        Err(PipelineError::InvalidConfig(format!(
            "{} fragment {}: {:?} input is missing read files",
            tissue, label, fragment.layout
        )))
    }
}


/// Reads and validates the YAML config at `path`.
///
/// # Arguments
///
/// * `path` - Path to the `--configfile`.
///
/// # Returns
///
/// Validated RunConfig.
pub fn load_run_config(path: &Path) -> Result<RunConfig, PipelineError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| PipelineError::IOError(format!("{}: {}", path.display(), e)))?;
    RunConfig::from_yaml_str(&contents)
}
