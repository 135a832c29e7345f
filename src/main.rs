use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::process;
use std::time::Instant;

use utm_builder::cli_args::CommandLineArgs;
use utm_builder::common::constants::{PROGRESS_BAR_CHARS, PROGRESS_BAR_TEMPLATE};
use utm_builder::errors::TaggingError;
use utm_builder::export::{render_table, save_csv};
use utm_builder::settings::Settings;
use utm_builder::tagging::{process_batch_with_progress, BatchRow, CampaignRequest};
use utm_builder::url_fetcher::UrlFetcher;

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let start_time = Instant::now();
    info!("UTM Builder v{} starting up...", env!("CARGO_PKG_VERSION"));

    debug!("Parsing command line arguments...");
    let cli_args = CommandLineArgs::parse_args();

    debug!("Loading application settings...");
    let settings = Settings::resolve(cli_args.settings.as_deref())?;
    info!("Settings loaded successfully");

    info!("Collecting URLs to tag...");
    let urls = UrlFetcher::new(&cli_args)?.urls;
    info!("Found {} URLs to tag", urls.len());

    let request = cli_args.campaign_request();
    let rows = match run_batch(&request, &urls, &settings) {
        Ok(rows) => rows,
        Err(e @ TaggingError::MissingRequiredField(_)) => {
            error!("{}", e);
            process::exit(2);
        }
        Err(e) => return Err(e.into()),
    };

    print!("{}", render_table(&rows));

    if let Some(output) = &cli_args.output {
        save_csv(output, &rows)?;
    }

    let failed = rows.iter().filter(|r| r.is_error()).count();
    if failed > 0 {
        warn!(
            "Tagging completed with {} failed URLs out of {}",
            failed,
            rows.len()
        );
    } else {
        info!("All {} URLs tagged successfully!", rows.len());
    }

    info!(
        "Processing completed in {:.2} seconds",
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}

fn run_batch(
    request: &CampaignRequest,
    urls: &[String],
    settings: &Settings,
) -> Result<Vec<BatchRow>, TaggingError> {
    let pb = create_progress_bar(urls.len());
    let result = process_batch_with_progress(request, urls, settings, &pb);
    match &result {
        Ok(rows) => pb.finish_with_message(format!("Completed! {} URL(s)", rows.len())),
        Err(_) => pb.abandon(),
    }
    result
}

fn create_progress_bar(total_urls: usize) -> ProgressBar {
    let pb = ProgressBar::new(total_urls as u64);
    match ProgressStyle::default_bar().template(PROGRESS_BAR_TEMPLATE) {
        Ok(style) => pb.set_style(style.progress_chars(PROGRESS_BAR_CHARS)),
        Err(e) => debug!("Falling back to the default progress style: {}", e),
    }
    pb
}
