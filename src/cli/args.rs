use clap::Parser;

use crate::config::defs::{DEFAULT_SNAKEFILE, SNAKEMAKE_TAG};

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "neoantigen-pipeline", version, about = "Validate targets and dispatch the neoantigen vaccine pipeline")]
pub struct Arguments {

    #[arg(long = "configfile", help = "YAML run configuration (sample, references, callers, epitope prediction)")]
    pub configfile: String,

    #[arg(long = "dry-run", action, help = "Ask the workflow engine to plan the run without executing any rule")]
    pub dry_run: bool,

    #[arg(long, value_parser = clap::value_parser!(u32).range(1..), help = "Memory budget in GB, forwarded to the workflow engine")]
    pub memory: u32,

    #[arg(long, help = "Single output file to build. Must be a target the configuration and run mode can produce")]
    pub target: Option<String>,

    #[arg(long = "somatic-variant-calling-only", action, help = "Only build somatic VCFs plus DNA QC and reference prep; skips RNA, germline and the vaccine report")]
    pub somatic_variant_calling_only: bool,

    #[arg(long, help = "Cores handed to the workflow engine; defaults to the detected physical core count")]
    pub cores: Option<usize>,

    #[arg(long, default_value = DEFAULT_SNAKEFILE)]
    pub snakefile: String,

    #[arg(long = "snakemake", default_value = SNAKEMAKE_TAG, help = "Workflow engine executable")]
    pub engine_bin: String,

    #[arg(long, help = "Engine run statistics output. Defaults to <workdir>/<sample>/stats.json")]
    pub stats: Option<String>,

    #[arg(long = "list-targets", action, help = "Print the targets available in this run mode as JSON and exit")]
    pub list_targets: bool,

    #[arg(short = 'v', long = "verbose", action)]
    pub verbose: bool,
}
