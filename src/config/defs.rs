use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// External software
pub const SNAKEMAKE_TAG: &str = "snakemake";

lazy_static! {
    /// Minimum (major, minor) version of each external tool.
    pub static ref TOOL_VERSIONS: HashMap<&'static str, (u32, u32)> = {
        let mut m = HashMap::new();
        m.insert(SNAKEMAKE_TAG, (5, 2));

        m
    };
}

// Static Filenames
pub const DEFAULT_SNAKEFILE: &str = "Snakefile";
pub const STATS_JSON: &str = "stats.json";

pub const VCF_EXT: &str = "vcf";
pub const VACCINE_REPORT_PREFIX: &str = "vaccine-peptide-report";
pub const VACCINE_REPORT_EXTS: &[&'static str] = &["txt", "json", "pdf", "xlsx"];

pub const RNA_FINAL_BAM: &str = "rna_final.bam";
pub const RNA_FINAL_BAI: &str = "rna_final.bam.bai";

pub const FASTQC_DONE: &str = "fastqc.done";
/// Picard CollectHsMetrics output: `{normal,tumor}` + this suffix.
pub const HS_METRICS_SUFFIX: &str = "_aligned_coordinate_sorted_dups_indelreal_bqsr_hs_metrics.txt";

pub const GERMLINE_VCF: &str = "normal_germline_snps_indels.vcf";
pub const FILTERED_GERMLINE_VCF: &str = "filtered_normal_germline_snps_indels.vcf";
pub const FILTERED_COVERED_GERMLINE_VCF: &str = "filtered_covered_normal_germline_snps_indels.vcf";

pub const DICT_EXT: &str = "dict";
pub const FAI_EXT: &str = "fai";
pub const CONTIGS_EXT: &str = "contigs";
pub const DONE_EXT: &str = "done";

pub const TISSUE_TAGS: &[&'static str] = &["normal", "tumor"];


// Static Parameters
pub const MB_PER_GB: u64 = 1024;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantCaller {
    Mutect,
    Mutect2,
    Strelka,
}

impl VariantCaller {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariantCaller::Mutect => "mutect",
            VariantCaller::Mutect2 => "mutect2",
            VariantCaller::Strelka => "strelka",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "mutect" => Some(VariantCaller::Mutect),
            "mutect2" => Some(VariantCaller::Mutect2),
            "strelka" => Some(VariantCaller::Strelka),
            _ => None,
        }
    }
}

impl fmt::Display for VariantCaller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


/// Pipeline stages that produce user-requestable targets. Declaration order is
/// the order targets are listed and dispatched in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetStage {
    SomaticVcf,
    VaccineReport,
    RnaAlignment,
    Qc,
    ReferencePrep,
    GermlineVcf,
}

impl TargetStage {
    pub const ALL: [TargetStage; 6] = [
        TargetStage::SomaticVcf,
        TargetStage::VaccineReport,
        TargetStage::RnaAlignment,
        TargetStage::Qc,
        TargetStage::ReferencePrep,
        TargetStage::GermlineVcf,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetStage::SomaticVcf => "somatic_vcf",
            TargetStage::VaccineReport => "vaccine_report",
            TargetStage::RnaAlignment => "rna_alignment",
            TargetStage::Qc => "qc",
            TargetStage::ReferencePrep => "reference_prep",
            TargetStage::GermlineVcf => "germline_vcf",
        }
    }
}

impl fmt::Display for TargetStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


/// Why an explicit target was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidTargetReason {
    /// The path matches none of the pipeline's output naming patterns.
    UnknownPattern,
    /// The file name looks like a `stage` output, but not one this
    /// configuration can produce (e.g. an unconfigured variant caller).
    UnconfiguredCombination(TargetStage),
    /// The configuration can produce it, the current run mode cannot.
    UnavailableInMode { stage: TargetStage, detail: String },
}

impl fmt::Display for InvalidTargetReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidTargetReason::UnknownPattern => {
                write!(f, "it does not match any known output naming pattern")
            }
            InvalidTargetReason::UnconfiguredCombination(stage) => write!(
                f,
                "it looks like a {} output but is not produced by this configuration",
                stage
            ),
            InvalidTargetReason::UnavailableInMode { stage, detail } => {
                write!(f, "{} outputs are unavailable in this run mode: {}", stage, detail)
            }
        }
    }
}


#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid target {}: {reason}", .target.display())]
    InvalidTarget {
        target: PathBuf,
        reason: InvalidTargetReason,
    },

    #[error("Invalid mode configuration: {0}")]
    InvalidModeConfiguration(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    IOError(String),

    #[error("{0} not found. Is it installed?")]
    ToolNotFound(String),

    #[error("{tool} failed: {error}")]
    ToolExecution { tool: String, error: String },

    #[error("Workflow engine reported failure")]
    EngineFailed,
}
