use clap::Parser;
use log::{info, warn};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use sixs_emulator::batch::{BatchRunner, read_observations};
use sixs_emulator::{Config, Emulator, TableStore};

#[derive(Parser, Debug)]
#[command(version, about = "Sentinel-2 atmospheric correction with a 6S emulator")]
struct Args {
    /// Path to the JSON run configuration
    #[arg(short, long, default_value = "./config.json")]
    config: PathBuf,

    /// Worker threads (overrides the configuration)
    #[arg(short, long)]
    threads: Option<usize>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let config = Config::from_file(&args.config)?;

    if let Some(threads) = args.threads.or(config.threads()) {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
        info!("Using {} worker threads", threads);
    }

    let layout = config.table_layout();
    info!(
        "Loading {} tables from {} for {} scenes",
        layout,
        config.table_directory().display(),
        layout.mission.collection()
    );
    let store = TableStore::load_layout(config.tables_root(), layout)?;

    if !store.report().is_complete() {
        warn!(
            "{} table files could not be loaded; their bands will not be corrected",
            store.report().failures.len()
        );
    }
    if store.is_empty() {
        return Err(format!(
            "No usable tables in {}",
            config.table_directory().display()
        )
        .into());
    }

    let observations = read_observations(config.observations())?;

    let emulator = Emulator::new(&store)
        .with_domain_policy(config.domain_policy())
        .with_reflectance_scale(config.reflectance_scale());
    let report = BatchRunner::new(emulator).run_set(&observations);

    println!("Bands available: {}", store.available_bands().join(", "));
    print!("{}", report.summary);

    if let Some(output) = config.output() {
        let writer = BufWriter::new(File::create(output)?);
        serde_json::to_writer_pretty(writer, &report)?;
        info!("Report written to {}", output.display());
    }

    Ok(())
}
