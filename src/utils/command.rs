/// Functions for building external tool command lines and checking the tools are present

use crate::config::defs::{PipelineError, SNAKEMAKE_TAG, TOOL_VERSIONS};
use crate::pipelines::engine::EngineRequest;


pub mod snakemake {
    use std::process::Stdio;

    use tokio::process::Command;

    use crate::config::defs::{PipelineError, MB_PER_GB};
    use crate::pipelines::engine::EngineRequest;

    pub async fn snakemake_presence_check(bin: &str) -> Result<String, PipelineError> {
        let output = Command::new(bin)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| PipelineError::ToolNotFound(format!("{} ({})", bin, e)))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let first_line = stdout
            .lines()
            .next()
            .ok_or_else(|| PipelineError::ToolExecution {
                tool: bin.to_string(),
                error: "no output from --version".to_string(),
            })?;
        let version = first_line.trim().to_string();
        if version.is_empty() {
            return Err(PipelineError::ToolExecution {
                tool: bin.to_string(),
                error: format!("empty version in --version output: {}", first_line),
            });
        }
        Ok(version)
    }

    pub fn arg_generator(request: &EngineRequest) -> Vec<String> {
        let mut args_vec: Vec<String> = Vec::new();
        args_vec.push("--snakefile".to_string());
        args_vec.push(request.snakefile.to_string_lossy().to_string());
        args_vec.push("--configfile".to_string());
        args_vec.push(request.configfile.to_string_lossy().to_string());
        args_vec.push("--cores".to_string());
        args_vec.push(request.cores.to_string());
        args_vec.push("--resources".to_string());
        args_vec.push(format!("mem_mb={}", request.mem_mb));
        args_vec.push("--config".to_string());
        args_vec.push(format!("num_threads={}", request.num_threads));
        args_vec.push(format!("mem_gb={}", request.mem_gb));
        args_vec.push("--stats".to_string());
        args_vec.push(request.stats.to_string_lossy().to_string());
        args_vec.push("--printshellcmds".to_string());
        if request.dry_run {
            args_vec.push("--dryrun".to_string());
        }
        // Terminates `--config` so targets are not read as key=value pairs.
        args_vec.push("--".to_string());
        for target in &request.targets {
            args_vec.push(target.to_string_lossy().to_string());
        }
        args_vec
    }

    pub fn mem_mb(memory_gb: u32) -> u64 {
        u64::from(memory_gb) * MB_PER_GB
    }
}


pub fn generate_cli(tool: &str, request: &EngineRequest) -> Result<Vec<String>, PipelineError> {
    let cmd = match tool {
        SNAKEMAKE_TAG => snakemake::arg_generator(request),
        _ => return Err(PipelineError::ToolNotFound(tool.to_string())),
    };

    Ok(cmd)
}


/// Parses the leading `major.minor` of a version string, e.g. `7.32.4`.
pub fn parse_major_minor(version: &str) -> Option<(u32, u32)> {
    let mut parts = version.trim().split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts
        .next()
        .map(|m| m.chars().take_while(char::is_ascii_digit).collect::<String>())
        .and_then(|m| m.parse().ok())
        .unwrap_or(0);
    Some((major, minor))
}


/// Runs the tool's presence check and compares against `TOOL_VERSIONS`.
///
/// # Arguments
///
/// * `tool` - Tool tag, e.g. SNAKEMAKE_TAG.
/// * `bin` - Executable to run for that tool.
///
/// # Returns
///
/// The reported version string.
pub async fn check_version(tool: &str, bin: &str) -> Result<String, PipelineError> {
    let version = match tool {
        SNAKEMAKE_TAG => snakemake::snakemake_presence_check(bin).await?,
        _ => return Err(PipelineError::ToolNotFound(tool.to_string())),
    };

    if let Some(&minimum) = TOOL_VERSIONS.get(tool) {
        match parse_major_minor(&version) {
            Some(found) if found >= minimum => {}
            _ => {
                return Err(PipelineError::ToolExecution {
                    tool: tool.to_string(),
                    error: format!(
                        "version {} found, {}.{} or newer required",
                        version, minimum.0, minimum.1
                    ),
                });
            }
        }
    }
    Ok(version)
}
