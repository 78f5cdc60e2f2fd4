// src/targets/naming.rs: canonical output file names

use std::path::{Path, PathBuf};

use crate::config::RunConfig;
use crate::config::defs::{
    TargetStage, VariantCaller, CONTIGS_EXT, DICT_EXT, DONE_EXT, FAI_EXT, FASTQC_DONE,
    FILTERED_COVERED_GERMLINE_VCF, FILTERED_GERMLINE_VCF, GERMLINE_VCF, HS_METRICS_SUFFIX,
    RNA_FINAL_BAI, RNA_FINAL_BAM, TISSUE_TAGS, VACCINE_REPORT_EXTS, VACCINE_REPORT_PREFIX, VCF_EXT,
};


/// `{output_dir}/{caller}.vcf`
pub fn somatic_vcf_path(output_dir: &Path, caller: VariantCaller) -> PathBuf {
    output_dir.join(format!("{}.{}", caller, VCF_EXT))
}

/// Joins callers in configured order, e.g. `mutect-strelka`.
pub fn caller_suffix(callers: &[VariantCaller]) -> String {
    callers
        .iter()
        .map(VariantCaller::as_str)
        .collect::<Vec<_>>()
        .join("-")
}

/// `vaccine-peptide-report_{predictor}-{database}_{callers}` with no extension.
pub fn vaccine_report_base(predictor: &str, database: &str, callers: &[VariantCaller]) -> String {
    format!(
        "{}_{}-{}_{}",
        VACCINE_REPORT_PREFIX,
        predictor,
        database,
        caller_suffix(callers)
    )
}

/// The report base name in every output format, in `VACCINE_REPORT_EXTS` order.
pub fn vaccine_report_paths(output_dir: &Path, base: &str) -> Vec<PathBuf> {
    VACCINE_REPORT_EXTS
        .iter()
        .map(|ext| output_dir.join(format!("{}.{}", base, ext)))
        .collect()
}

pub fn rna_alignment_paths(output_dir: &Path) -> Vec<PathBuf> {
    vec![output_dir.join(RNA_FINAL_BAM), output_dir.join(RNA_FINAL_BAI)]
}

/// FastQC stamp, plus Picard hybrid-selection metrics when a capture kit
/// defines the bait intervals.
pub fn qc_paths(output_dir: &Path, capture_kit: bool) -> Vec<PathBuf> {
    let mut paths = vec![output_dir.join(FASTQC_DONE)];
    if capture_kit {
        for tissue in TISSUE_TAGS {
            paths.push(output_dir.join(format!("{}{}", tissue, HS_METRICS_SUFFIX)));
        }
    }
    paths
}

pub fn germline_vcf_paths(output_dir: &Path, capture_kit: bool) -> Vec<PathBuf> {
    let mut paths = vec![
        output_dir.join(GERMLINE_VCF),
        output_dir.join(FILTERED_GERMLINE_VCF),
    ];
    if capture_kit {
        paths.push(output_dir.join(FILTERED_COVERED_GERMLINE_VCF));
    }
    paths
}

/// Sequence dictionary, FASTA index, contig list and index stamp, all next to
/// the genome FASTA. `b37decoy.fasta` gives `b37decoy.dict`,
/// `b37decoy.fasta.fai`, `b37decoy.fasta.contigs`, `b37decoy.fasta.done`.
pub fn reference_prep_paths(genome: &Path) -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(4);
    paths.push(genome.with_extension(DICT_EXT));
    for ext in [FAI_EXT, CONTIGS_EXT, DONE_EXT] {
        let mut name = genome.as_os_str().to_owned();
        name.push(".");
        name.push(ext);
        paths.push(PathBuf::from(name));
    }
    paths
}


/// Names the stage whose naming pattern `path` follows, whether or not the
/// configuration actually produces that file.
///
/// # Arguments
///
/// * `config` - Run configuration; supplies the output and reference dirs.
/// * `path` - Candidate target.
///
/// # Returns
///
/// The matching stage, or None for paths that look like no pipeline output.
pub fn recognize(config: &RunConfig, path: &Path) -> Option<TargetStage> {
    let file_name = path.file_name()?.to_str()?;
    let parent = path.parent()?;

    if parent == config.reference_dir() {
        let genome_name = config.reference.genome.file_name()?.to_str()?;
        let genome_stem = config.reference.genome.file_stem()?.to_str()?;
        let is_prep = file_name == format!("{}.{}", genome_stem, DICT_EXT)
            || [FAI_EXT, CONTIGS_EXT, DONE_EXT]
                .iter()
                .any(|ext| file_name == format!("{}.{}", genome_name, ext));
        return is_prep.then_some(TargetStage::ReferencePrep);
    }

    if parent != config.output_dir() {
        return None;
    }

    if let Some(rest) = file_name.strip_prefix(VACCINE_REPORT_PREFIX) {
        let has_ext = VACCINE_REPORT_EXTS
            .iter()
            .any(|ext| rest.ends_with(&format!(".{}", ext)));
        return (rest.starts_with('_') && has_ext).then_some(TargetStage::VaccineReport);
    }

    if file_name == RNA_FINAL_BAM || file_name == RNA_FINAL_BAI {
        return Some(TargetStage::RnaAlignment);
    }

    if file_name == FASTQC_DONE || file_name.ends_with(HS_METRICS_SUFFIX) {
        return Some(TargetStage::Qc);
    }

    if [GERMLINE_VCF, FILTERED_GERMLINE_VCF, FILTERED_COVERED_GERMLINE_VCF].contains(&file_name) {
        return Some(TargetStage::GermlineVcf);
    }

    file_name
        .strip_suffix(&format!(".{}", VCF_EXT))
        .and_then(VariantCaller::from_name)
        .map(|_| TargetStage::SomaticVcf)
}
