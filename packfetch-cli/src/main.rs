//! Packfetch CLI - downloads the latest wanted device packs.
//!
//! Runs the full pipeline with no required arguments: read the vendor's
//! pack index, keep the latest version of each wanted device family,
//! download the archives into `dl/`, and unpack each one into `packs/`.
//!
//! Exit code is 0 only when every selected pack was processed; a fatal
//! index failure or any per-pack failure exits non-zero so automated
//! toolchain builds can detect partial results.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use packfetch::{FetchConfig, FetchError, FetchReport, PackFetcher};

#[derive(Debug, Parser)]
#[command(
    name = "packfetch",
    version,
    about = "Fetch the latest Microchip device packs for toolchain builds"
)]
struct Cli {
    /// Pack index URL to read.
    #[arg(long, default_value = packfetch::index::DEFAULT_INDEX_URL)]
    index_url: String,

    /// Directory for raw downloaded archives.
    #[arg(long, default_value = "dl")]
    download_dir: PathBuf,

    /// Directory receiving one subdirectory per extracted pack.
    #[arg(long, default_value = "packs")]
    packs_dir: PathBuf,

    /// HTTP timeout per request, in seconds.
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// Additional device-family prefixes to keep (repeatable).
    ///
    /// Extends the built-in 32-bit ARM whitelist, e.g. `--family avr`.
    #[arg(long = "family", value_name = "PREFIX")]
    families: Vec<String>,

    /// List the selected latest pack versions without downloading.
    #[arg(long)]
    list_only: bool,

    /// Enable verbose (debug-level) logging.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn fetch_config(&self) -> FetchConfig {
        let mut filter = packfetch::PackFilter::arm_32bit();
        for prefix in &self.families {
            filter = filter.allow_family_prefix(prefix);
        }

        FetchConfig::new()
            .with_index_url(&self.index_url)
            .with_download_dir(&self.download_dir)
            .with_packs_dir(&self.packs_dir)
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_filter(filter)
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn list_packs(fetcher: &PackFetcher) -> Result<(), FetchError> {
    let selected = fetcher.select_packs()?;

    for pack in &selected {
        println!("Latest version of pack {} is {}", pack.family, pack.version);
    }
    println!("{} pack(s) selected", selected.len());

    Ok(())
}

fn print_summary(report: &FetchReport) {
    for outcome in &report.completed {
        println!(
            "{:<30} v{:<12} {} ({} files)",
            outcome.pack.family,
            outcome.pack.version,
            outcome.action.name(),
            outcome.files_extracted
        );
    }

    for (pack, error) in &report.failed {
        println!("{:<30} v{:<12} FAILED: {}", pack.family, pack.version, error);
    }

    println!(
        "\n{} pack(s) fetched, {} failed",
        report.completed.len(),
        report.failed.len()
    );
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let fetcher = PackFetcher::new(cli.fetch_config());

    if cli.list_only {
        return match list_packs(&fetcher) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    match fetcher.run() {
        Ok(report) => {
            print_summary(&report);
            if report.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
