use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;
use clap::Parser;
use tempfile::{NamedTempFile, TempDir};

use neoantigen_pipeline::cli::Arguments;
use neoantigen_pipeline::config::RunConfig;
use neoantigen_pipeline::config::defs::{InvalidTargetReason, PipelineError, TargetStage};
use neoantigen_pipeline::pipelines::engine::{EngineRequest, WorkflowEngine};
use neoantigen_pipeline::pipelines::neoantigen;
use neoantigen_pipeline::targets::{
    default_vaxrank_targets, derive_catalog, resolve_mode, somatic_vcf_targets, ModeFlags,
};

const SAMPLE: &str = "idh1-test-sample";


/// Stands in for snakemake: records every request, reports a fixed outcome.
struct RecordingEngine {
    calls: Mutex<Vec<EngineRequest>>,
    succeed: bool,
}

impl RecordingEngine {
    fn new(succeed: bool) -> Self {
        RecordingEngine { calls: Mutex::new(Vec::new()), succeed }
    }

    fn calls(&self) -> Vec<EngineRequest> {
        self.calls.lock().unwrap().clone()
    }
}

impl WorkflowEngine for RecordingEngine {
    async fn run(&self, request: &EngineRequest) -> Result<bool, PipelineError> {
        self.calls.lock().unwrap().push(request.clone());
        Ok(self.succeed)
    }
}


/// Fixture configs rewritten to point at temp dirs.
struct Fixture {
    workdir: TempDir,
    referencedir: TempDir,
    _inputdir: TempDir,
    config: NamedTempFile,
    dna_only_config: NamedTempFile,
}

impl Fixture {
    fn new() -> Result<Self> {
        let workdir = TempDir::new()?;
        let referencedir = TempDir::new()?;
        let inputdir = TempDir::new()?;
        let config = populate_config("idh1_config.yaml", &workdir, &referencedir, &inputdir)?;
        let dna_only_config = populate_config("idh1_config_dna_only.yaml", &workdir, &referencedir, &inputdir)?;
        Ok(Fixture { workdir, referencedir, _inputdir: inputdir, config, dna_only_config })
    }

    fn sample_path(&self, name: &str) -> String {
        self.workdir.path().join(SAMPLE).join(name).to_string_lossy().into_owned()
    }

    fn reference_path(&self, name: &str) -> String {
        self.referencedir.path().join(name).to_string_lossy().into_owned()
    }

    fn args(&self, dna_only: bool, extra: &[&str]) -> Arguments {
        let config = if dna_only { &self.dna_only_config } else { &self.config };
        let mut argv = vec![
            "neoantigen-pipeline".to_string(),
            "--configfile".to_string(),
            config.path().to_string_lossy().into_owned(),
            "--dry-run".to_string(),
            "--cores".to_string(),
            "4".to_string(),
        ];
        argv.extend(extra.iter().map(|s| s.to_string()));
        Arguments::try_parse_from(argv).unwrap()
    }
}

fn data_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("data").join(name)
}

fn populate_config(basename: &str, workdir: &TempDir, referencedir: &TempDir, inputdir: &TempDir) -> Result<NamedTempFile> {
    let contents = std::fs::read_to_string(data_path(basename))?
        .replace("/outputs", &workdir.path().to_string_lossy())
        .replace("/reference-genome/b37decoy", &referencedir.path().to_string_lossy())
        .replace("/inputs", &inputdir.path().to_string_lossy());
    let mut file = NamedTempFile::new()?;
    std::io::Write::write_all(&mut file, contents.as_bytes())?;
    Ok(file)
}

fn raw_config(basename: &str) -> Result<RunConfig> {
    Ok(RunConfig::from_yaml_str(&std::fs::read_to_string(data_path(basename))?)?)
}

fn invalid_target_reason(result: std::result::Result<(), PipelineError>) -> InvalidTargetReason {
    match result {
        Err(PipelineError::InvalidTarget { reason, .. }) => reason,
        other => panic!("expected InvalidTarget, got {:?}", other),
    }
}


#[test]
fn test_vaxrank_targets() -> Result<()> {
    let config = raw_config("idh1_config.yaml")?;
    let targets = default_vaxrank_targets(&config);
    let expected: Vec<PathBuf> = ["txt", "json", "pdf", "xlsx"]
        .iter()
        .map(|ext| {
            PathBuf::from(format!(
                "/outputs/idh1-test-sample/vaccine-peptide-report_netmhcpan-iedb_mutect-strelka.{}",
                ext
            ))
        })
        .collect();
    assert_eq!(targets, expected);
    Ok(())
}

#[test]
fn test_somatic_vcf_targets() -> Result<()> {
    let config = raw_config("idh1_config.yaml")?;
    let targets = somatic_vcf_targets(&config);
    assert_eq!(
        targets,
        vec![
            PathBuf::from("/outputs/idh1-test-sample/mutect.vcf"),
            PathBuf::from("/outputs/idh1-test-sample/strelka.vcf"),
        ]
    );
    Ok(())
}

#[test]
fn test_catalog_is_idempotent() -> Result<()> {
    let config = raw_config("idh1_config.yaml")?;
    let flags = ModeFlags { somatic_only: false, memory_gb: 32, target: None };
    let mode = resolve_mode(&config, &flags)?;
    assert_eq!(derive_catalog(&config, &mode), derive_catalog(&config, &mode));
    Ok(())
}

#[tokio::test]
async fn test_dna_only_setup() -> Result<()> {
    let fixture = Fixture::new()?;
    let engine = RecordingEngine::new(true);
    let args = fixture.args(true, &["--memory", "15", "--somatic-variant-calling-only"]);
    neoantigen::run(&args, &engine).await?;

    let calls = engine.calls();
    assert_eq!(calls.len(), 1);
    let request = &calls[0];
    assert!(request.dry_run);
    assert_eq!(request.mem_mb, 15 * 1024);
    assert_eq!(request.cores, 4);

    let names: Vec<String> = request
        .targets
        .iter()
        .filter_map(|t| t.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect();
    assert!(names.contains(&"mutect.vcf".to_string()));
    assert!(names.contains(&"strelka.vcf".to_string()));
    assert!(names.contains(&"fastqc.done".to_string()));
    assert!(names.contains(&"b37decoy.dict".to_string()));
    assert!(!names.iter().any(|n| n.starts_with("rna_")), "no RNA targets: {:?}", names);
    assert!(!names.iter().any(|n| n.starts_with("vaccine-peptide-report")), "no report targets: {:?}", names);
    assert!(!names.iter().any(|n| n.contains("germline")), "no germline targets: {:?}", names);
    Ok(())
}

#[tokio::test]
async fn test_entrypoint_valid_targets() -> Result<()> {
    let fixture = Fixture::new()?;
    let engine = RecordingEngine::new(true);

    let rna_bam = fixture.sample_path("rna_final.bam");
    neoantigen::run(&fixture.args(false, &["--memory", "32", "--target", &rna_bam]), &engine).await?;

    let mutect = fixture.sample_path("mutect.vcf");
    neoantigen::run(&fixture.args(false, &["--memory", "15", "--target", &mutect]), &engine).await?;

    neoantigen::run(&fixture.args(false, &["--memory", "15", "--somatic-variant-calling-only"]), &engine).await?;

    let germline = fixture.sample_path("filtered_covered_normal_germline_snps_indels.vcf");
    neoantigen::run(&fixture.args(false, &["--memory", "15", "--target", &germline]), &engine).await?;

    let calls = engine.calls();
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[0].targets, vec![PathBuf::from(&rna_bam)]);
    assert_eq!(calls[1].targets, vec![PathBuf::from(&mutect)]);
    assert!(calls[2].targets.iter().all(|t| !t.to_string_lossy().contains("rna_final")));
    assert_eq!(calls[3].targets, vec![PathBuf::from(&germline)]);
    assert_eq!(calls[0].stats, PathBuf::from(fixture.sample_path("stats.json")));
    Ok(())
}

#[tokio::test]
async fn test_entrypoint_reference_and_qc_targets() -> Result<()> {
    let fixture = Fixture::new()?;
    let engine = RecordingEngine::new(true);

    for target in [
        fixture.reference_path("b37decoy.dict"),
        fixture.sample_path("fastqc.done"),
        fixture.sample_path("normal_aligned_coordinate_sorted_dups_indelreal_bqsr_hs_metrics.txt"),
    ] {
        neoantigen::run(&fixture.args(false, &["--memory", "33", "--target", &target]), &engine).await?;
        let last = engine.calls().pop().unwrap();
        assert_eq!(last.targets, vec![PathBuf::from(&target)]);
    }
    Ok(())
}

#[tokio::test]
async fn test_default_run_includes_report() -> Result<()> {
    let fixture = Fixture::new()?;
    let engine = RecordingEngine::new(true);
    neoantigen::run(&fixture.args(false, &["--memory", "32"]), &engine).await?;
    let request = engine.calls().pop().unwrap();
    let report = fixture.sample_path("vaccine-peptide-report_netmhcpan-iedb_mutect-strelka.pdf");
    assert!(request.targets.contains(&PathBuf::from(report)));
    Ok(())
}

#[tokio::test]
async fn test_entrypoint_failures() -> Result<()> {
    let fixture = Fixture::new()?;
    let engine = RecordingEngine::new(true);

    let fake = fixture.sample_path("fakey_fakerson");
    let reason = invalid_target_reason(
        neoantigen::run(&fixture.args(false, &["--memory", "32", "--target", &fake]), &engine).await,
    );
    assert_eq!(reason, InvalidTargetReason::UnknownPattern);

    let bad_report = fixture.sample_path("vaccine-peptide-report_netmhcpan-iedb_mutect-strelka-mutect2.txt");
    let reason = invalid_target_reason(
        neoantigen::run(&fixture.args(false, &["--memory", "32", "--target", &bad_report]), &engine).await,
    );
    assert_eq!(reason, InvalidTargetReason::UnconfiguredCombination(TargetStage::VaccineReport));

    // Below the configured RNA memory floor.
    let rna_bam = fixture.sample_path("rna_final.bam");
    let reason = invalid_target_reason(
        neoantigen::run(&fixture.args(false, &["--memory", "15", "--target", &rna_bam]), &engine).await,
    );
    assert!(matches!(reason, InvalidTargetReason::UnavailableInMode { stage: TargetStage::RnaAlignment, .. }));

    assert!(engine.calls().is_empty(), "engine must not run after a rejected target");
    Ok(())
}

#[tokio::test]
async fn test_rna_target_rejected_by_mode() -> Result<()> {
    let fixture = Fixture::new()?;
    let engine = RecordingEngine::new(true);
    let rna_bam = fixture.sample_path("rna_final.bam");

    let somatic_only = fixture.args(false, &["--memory", "64", "--somatic-variant-calling-only", "--target", &rna_bam]);
    let reason = invalid_target_reason(neoantigen::run(&somatic_only, &engine).await);
    assert!(matches!(reason, InvalidTargetReason::UnavailableInMode { stage: TargetStage::RnaAlignment, .. }));

    let dna_only = fixture.args(true, &["--memory", "64", "--target", &rna_bam]);
    let reason = invalid_target_reason(neoantigen::run(&dna_only, &engine).await);
    assert!(matches!(reason, InvalidTargetReason::UnavailableInMode { stage: TargetStage::RnaAlignment, .. }));

    let report = fixture.sample_path("vaccine-peptide-report_netmhcpan-iedb_mutect-strelka.txt");
    let dna_only_report = fixture.args(true, &["--memory", "64", "--target", &report]);
    let reason = invalid_target_reason(neoantigen::run(&dna_only_report, &engine).await);
    assert!(matches!(reason, InvalidTargetReason::UnavailableInMode { stage: TargetStage::VaccineReport, .. }));

    assert!(engine.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_engine_failure_surfaces() -> Result<()> {
    let fixture = Fixture::new()?;
    let engine = RecordingEngine::new(false);
    let result = neoantigen::run(&fixture.args(true, &["--memory", "15", "--somatic-variant-calling-only"]), &engine).await;
    assert!(matches!(result, Err(PipelineError::EngineFailed)), "got {:?}", result);
    assert_eq!(engine.calls().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_list_targets_does_not_dispatch() -> Result<()> {
    let fixture = Fixture::new()?;
    let engine = RecordingEngine::new(true);
    neoantigen::run(&fixture.args(false, &["--memory", "32", "--list-targets"]), &engine).await?;
    assert!(engine.calls().is_empty());
    Ok(())
}

#[test]
fn test_memory_must_be_positive() {
    let result = Arguments::try_parse_from(["neoantigen-pipeline", "--configfile", "c.yaml", "--memory", "0"]);
    assert!(result.is_err());
}
