use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use page_crawler::config::{ConfigLoader, ResultsOutput};
use page_crawler::metrics::snapshot::MetricsSnapshot;
use page_crawler::output::console::ConsoleOutput;
use page_crawler::output::{ReportSink, export_results};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "page-crawler")]
#[command(version = "0.1.0")]
#[command(about = "Fetch web pages, save them locally and report link and image counts", long_about = None)]
struct Cli {
    /// URLs to fetch, in order
    urls: Vec<String>,

    /// Path to a configuration file (JSON/YAML/TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Redirect hops allowed per URL
    #[arg(long)]
    max_redirects: Option<u32>,

    /// Pause between URLs, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Never pause between URLs (non-interactive runs)
    #[arg(long, default_value_t = false)]
    no_delay: bool,

    /// Directory the fetched pages are written to
    #[arg(short, long)]
    output_dir: Option<String>,

    /// Export per-URL results to a .json or .csv file
    #[arg(short, long)]
    results: Option<PathBuf>,

    /// Show a progress bar (stderr)
    #[arg(short, long, default_value_t = false)]
    progress: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        unsafe { std::env::set_var("RUST_LOG", "info"); }
    }
    let cli = Cli::parse();

    if cli.urls.is_empty() {
        eprintln!("Usage: page-crawler [OPTIONS] URL1 URL2 ...");
        std::process::exit(1);
    }

    let logger = env_logger::Builder::from_default_env().build();
    let multi = Arc::new(indicatif::MultiProgress::new());

    if cli.progress {
        indicatif_log_bridge::LogWrapper::new((*multi).clone(), logger).try_init()?;
    } else {
        let level = logger.filter();
        log::set_boxed_logger(Box::new(logger))?;
        log::set_max_level(level);
    }

    let mut config = ConfigLoader::load_or_default(cli.config.as_deref())?;
    if let Some(max_redirects) = cli.max_redirects {
        config.max_redirects = max_redirects;
    }
    if let Some(delay_ms) = cli.delay_ms {
        config.delay_ms = delay_ms;
    }
    if cli.no_delay {
        config = config.non_interactive();
    }
    if let Some(output_dir) = cli.output_dir {
        config.output_dir = output_dir;
    }
    if let Some(results) = &cli.results {
        config.results = Some(ResultsOutput::from_path(results));
    }

    let sink: Arc<dyn ReportSink> = if cli.progress {
        Arc::new(ConsoleOutput::new(Some(multi.clone())))
    } else {
        Arc::new(ConsoleOutput::default())
    };
    let engine = ConfigLoader::create_engine(&config, sink, None)?;
    std::fs::create_dir_all(&config.output_dir)?;
    let mut results_output = ConfigLoader::create_results_output(&config)?;

    let mut progress_bar: Option<ProgressBar> = None;
    let mut progress_task = None;
    if cli.progress {
        let pb = multi.add(ProgressBar::new(cli.urls.len() as u64));
        pb.set_style(ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"));

        let mut metrics_rx = engine.watch_metrics();
        let pb_clone = pb.clone();
        progress_bar = Some(pb);
        progress_task = Some(tokio::spawn(async move {
            while metrics_rx.changed().await.is_ok() {
                let snapshot: MetricsSnapshot = metrics_rx.borrow().clone();
                pb_clone.set_position(snapshot.urls_processed);
                pb_clone.set_message(format!(
                    "Saved: {} | Failed: {} | Redirects: {}",
                    snapshot.pages_saved,
                    snapshot.fetches_failed + snapshot.urls_invalid,
                    snapshot.redirects_followed
                ));
            }
        }));
    }

    log::info!("Crawling {} URL(s) into {}", cli.urls.len(), config.output_dir);
    let results = engine.crawl_urls(cli.urls.as_slice()).await;

    if let Some(task) = progress_task {
        task.abort();
    }
    if let Some(pb) = progress_bar {
        let final_metrics = engine.get_metrics();
        pb.set_position(final_metrics.urls_processed);
        pb.finish_with_message(format!("Success: {:.1}% - Completed", final_metrics.success_rate));
    }

    if let Some(handler) = results_output.as_mut() {
        export_results(handler.as_mut(), &results).await?;
        log::info!("Results written to {:?}", config.results);
    }

    let final_metrics = engine.get_metrics();
    println!("\n✅ Crawl Completed:");
    println!("   URLs Processed: {}", final_metrics.urls_processed);
    println!("   Pages Saved: {}", final_metrics.pages_saved);
    println!("   Failed: {}", final_metrics.fetches_failed + final_metrics.urls_invalid);
    println!("   Redirects Followed: {}", final_metrics.redirects_followed);
    println!("   Average Duration: {}ms", final_metrics.avg_response_time_ms);
    println!("   Total Time: {:.1}s", final_metrics.elapsed_seconds);

    Ok(())
}
