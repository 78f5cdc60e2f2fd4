use std::env;
use std::io::Write;
use std::time::Instant;

use anyhow::Result;
use env_logger::Builder;
use log::{error, info, LevelFilter};

use neoantigen_pipeline::cli::parse;
use neoantigen_pipeline::pipelines::engine::SnakemakeEngine;
use neoantigen_pipeline::pipelines::neoantigen;


#[tokio::main]
async fn main() -> Result<()> {
    let run_start = Instant::now();

    let args = parse();

    let log_level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    Builder::new()
        .filter_level(log_level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();

    if !args.list_targets {
        println!("\n-------------\n Neoantigen Vaccine Pipeline\n-------------\n");
    }

    let dir = env::current_dir()?;
    info!("The current directory is {:?}", dir);

    let engine = SnakemakeEngine::new(args.engine_bin.clone());

    if let Err(e) = neoantigen::run(&args, &engine).await {
        error!("Pipeline failed: {} at {} milliseconds.", e, run_start.elapsed().as_millis());
        std::process::exit(1);
    }

    info!("Run complete: {} milliseconds.", run_start.elapsed().as_millis());
    Ok(())
}
