use anyhow::{Context, Result};
use clap::Parser;
use coupling_cluster_analyzer::config::Config;
use coupling_cluster_analyzer::data::{self, EventFilter};
use coupling_cluster_analyzer::{pipeline, storage, viz};
use itertools::Itertools;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "coupling-cluster-analyzer",
    about = "Recover modules from class coupling by hierarchical clustering"
)]
struct Cli {
    /// Invocation event file (.txt/.csv lines, .json or .parquet)
    #[clap(long)]
    input: PathBuf,

    /// Output directory for results
    #[clap(long, default_value = "cluster_results")]
    output_dir: PathBuf,

    /// Average coupling a cluster pair must exceed to merge (overrides config)
    #[clap(long)]
    threshold: Option<f64>,

    /// JSON configuration file
    #[clap(long)]
    config: Option<PathBuf>,

    /// File listing the project's classes, one per line
    #[clap(long)]
    classes: Option<PathBuf>,

    /// Skip graph exports
    #[clap(long)]
    skip_viz: bool,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    // Set number of threads
    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        // If threads = 0, use all available cores
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }
    config.validate()?;

    log::info!("Starting coupling analysis");
    log::info!("Input: {}", args.input.display());
    log::info!("Output: {}", args.output_dir.display());
    log::info!("Threshold: {}", config.threshold);

    // 1. Load events
    let events = data::load_events(&args.input)
        .with_context(|| format!("reading events from {}", args.input.display()))?;

    // 2. Keep project classes only
    let mut filter = EventFilter::new(config.excluded_prefixes.clone());
    if let Some(path) = &args.classes {
        filter = filter.with_project_classes(data::load_class_list(path)?);
    }
    let (events, filter_stats) = filter.apply(events);

    // 3. Aggregate and cluster
    let analysis = pipeline::analyze(events, &config);

    for cluster in &analysis.outcome.clusters {
        log::info!(
            "Module {} ({} classes, cohesion {:.4}): {}",
            cluster.id,
            cluster.size,
            cluster.cohesion,
            cluster.members.iter().join(", ")
        );
    }

    // 4. Save results
    storage::save_results(
        &analysis.matrix,
        &analysis.outcome,
        &analysis.summary,
        &filter_stats,
        config.top_pairs,
        &args.output_dir,
    )?;

    // 5. Export graph files if requested
    if !args.skip_viz {
        viz::export_graph(&analysis.matrix, &analysis.outcome.clusters, &args.output_dir)?;
    }

    log::info!(
        "Analysis complete. Results saved to {}",
        args.output_dir.display()
    );

    Ok(())
}
