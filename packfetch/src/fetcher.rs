//! High-level fetch orchestration.
//!
//! [`PackFetcher`] wires the pipeline together: fetch the index, filter it,
//! keep the latest version per family, then download and extract each
//! survivor in turn. Failure to obtain a usable index aborts the run;
//! failure on one pack is logged, recorded, and does not stop the rest.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{info, warn};

use crate::download::PackDownloader;
use crate::error::{FetchError, FetchResult};
use crate::extract::ZipExtractor;
use crate::index::{IndexClient, DEFAULT_INDEX_URL};
use crate::pack::{select_latest, DevicePack, PackFilter};

/// Configuration for a fetch run.
///
/// All destinations and rules are explicit so each component stays
/// independently testable; nothing reads module-level state.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// URL of the vendor's pack index.
    pub index_url: String,

    /// Directory receiving raw downloaded archives.
    pub download_dir: PathBuf,

    /// Directory receiving one subdirectory per extracted pack.
    pub packs_dir: PathBuf,

    /// Per-request HTTP timeout.
    pub timeout: Duration,

    /// Device-family whitelist.
    pub filter: PackFilter,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            index_url: DEFAULT_INDEX_URL.to_string(),
            download_dir: PathBuf::from("dl"),
            packs_dir: PathBuf::from("packs"),
            timeout: Duration::from_secs(10),
            filter: PackFilter::arm_32bit(),
        }
    }
}

impl FetchConfig {
    /// Create a config with default directories and the stock ARM filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the index URL.
    pub fn with_index_url(mut self, url: impl Into<String>) -> Self {
        self.index_url = url.into();
        self
    }

    /// Set the download directory.
    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }

    /// Set the extraction root directory.
    pub fn with_packs_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.packs_dir = dir.into();
        self
    }

    /// Set the HTTP timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the pack filter.
    pub fn with_filter(mut self, filter: PackFilter) -> Self {
        self.filter = filter;
        self
    }
}

/// What happened to one selected pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackAction {
    /// The archive was downloaded from the index.
    Downloaded,
    /// A complete archive from an earlier run was reused.
    AlreadyPresent,
}

impl PackAction {
    /// Human-readable name for status output.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Downloaded => "downloaded",
            Self::AlreadyPresent => "already present",
        }
    }
}

/// Successful outcome for one pack.
#[derive(Debug, Clone)]
pub struct PackOutcome {
    /// The pack that was processed.
    pub pack: DevicePack,
    /// Whether the archive was fetched or reused.
    pub action: PackAction,
    /// Local path of the archive under the download directory.
    pub archive_path: PathBuf,
    /// Directory the pack was extracted into.
    pub install_path: PathBuf,
    /// Number of files extracted.
    pub files_extracted: usize,
}

/// Summary of a fetch run.
#[derive(Debug, Default)]
pub struct FetchReport {
    /// Packs downloaded and extracted successfully.
    pub completed: Vec<PackOutcome>,
    /// Packs that failed, with the error that stopped them.
    pub failed: Vec<(DevicePack, FetchError)>,
}

impl FetchReport {
    /// True when every selected pack was processed without error.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Fetches the latest wanted packs and unpacks them locally.
pub struct PackFetcher {
    config: FetchConfig,
    index: IndexClient,
    downloader: PackDownloader,
    extractor: ZipExtractor,
}

impl PackFetcher {
    /// Create a fetcher for the given configuration.
    pub fn new(config: FetchConfig) -> Self {
        let index = IndexClient::with_timeout(config.index_url.clone(), config.timeout);
        let downloader = PackDownloader::with_timeout(config.timeout);

        Self {
            config,
            index,
            downloader,
            extractor: ZipExtractor::new(),
        }
    }

    /// The configuration this fetcher runs with.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetch the index and return the latest wanted pack per family.
    ///
    /// This is the read-only half of a run: no directories are created and
    /// nothing is downloaded. Index fetch or parse failures propagate.
    pub fn select_packs(&self) -> FetchResult<Vec<DevicePack>> {
        let records = self.index.fetch()?;
        let total = records.len();

        let wanted = records.into_iter().filter(|r| self.config.filter.keep(r));
        let selected: Vec<DevicePack> = select_latest(wanted).into_values().collect();

        info!(
            indexed = total,
            selected = selected.len(),
            "selected packs from index"
        );

        Ok(selected)
    }

    /// Run the full pipeline: select, download, and extract.
    ///
    /// Index failures are fatal and propagate before anything is written to
    /// disk. Per-pack download or extraction failures are isolated: the
    /// pack is recorded in the report and the run continues.
    pub fn run(&self) -> FetchResult<FetchReport> {
        let selected = self.select_packs()?;

        let mut report = FetchReport::default();

        for pack in selected {
            match self.process_pack(&pack) {
                Ok(outcome) => {
                    info!(
                        pack = %pack,
                        action = outcome.action.name(),
                        files = outcome.files_extracted,
                        "pack ready"
                    );
                    report.completed.push(outcome);
                }
                Err(e) => {
                    warn!(pack = %pack, "skipping pack: {}", e);
                    report.failed.push((pack, e));
                }
            }
        }

        Ok(report)
    }

    /// Download and extract one pack.
    fn process_pack(&self, pack: &DevicePack) -> FetchResult<PackOutcome> {
        let before = archive_present(&self.config.download_dir, pack);

        let archive_path = self.downloader.download(pack, &self.config.download_dir)?;
        let action = if before {
            PackAction::AlreadyPresent
        } else {
            PackAction::Downloaded
        };

        let install_path = self.config.packs_dir.join(&pack.family);
        let files_extracted = self.extractor.extract(&archive_path, &install_path)?;

        Ok(PackOutcome {
            pack: pack.clone(),
            action,
            archive_path,
            install_path,
            files_extracted,
        })
    }
}

/// Whether a previously downloaded archive for this pack exists.
fn archive_present(download_dir: &Path, pack: &DevicePack) -> bool {
    download_dir.join(pack.archive_filename()).is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FetchConfig::default();
        assert_eq!(config.index_url, DEFAULT_INDEX_URL);
        assert_eq!(config.download_dir, PathBuf::from("dl"));
        assert_eq!(config.packs_dir, PathBuf::from("packs"));
        assert_eq!(config.timeout.as_secs(), 10);
    }

    #[test]
    fn test_builder_pattern() {
        let config = FetchConfig::new()
            .with_index_url("https://mirror.example.com/")
            .with_download_dir("/tmp/dl")
            .with_packs_dir("/tmp/packs")
            .with_timeout(Duration::from_secs(30))
            .with_filter(PackFilter::new().allow_manufacturer("ARM"));

        assert_eq!(config.index_url, "https://mirror.example.com/");
        assert_eq!(config.download_dir, PathBuf::from("/tmp/dl"));
        assert_eq!(config.packs_dir, PathBuf::from("/tmp/packs"));
        assert_eq!(config.timeout.as_secs(), 30);
    }

    #[test]
    fn test_fetcher_exposes_config() {
        let fetcher = PackFetcher::new(FetchConfig::new().with_download_dir("dl2"));
        assert_eq!(fetcher.config().download_dir, PathBuf::from("dl2"));
    }

    #[test]
    fn test_report_success() {
        let report = FetchReport::default();
        assert!(report.is_success());
    }

    #[test]
    fn test_report_failure() {
        let pack = DevicePack::from_href(
            "https://packs.download.microchip.com/",
            "Microchip.SAML10_DFP.3.5.87.atpack",
        )
        .unwrap();

        let mut report = FetchReport::default();
        report.failed.push((
            pack,
            FetchError::DownloadFailed {
                url: "https://example.com/x.atpack".to_string(),
                reason: "connection reset".to_string(),
            },
        ));

        assert!(!report.is_success());
    }

    #[test]
    fn test_pack_action_name() {
        assert_eq!(PackAction::Downloaded.name(), "downloaded");
        assert_eq!(PackAction::AlreadyPresent.name(), "already present");
    }

    #[test]
    fn test_run_fails_fast_on_unreachable_index() {
        use tempfile::TempDir;

        let temp = TempDir::new().unwrap();
        let dl = temp.path().join("dl");
        let packs = temp.path().join("packs");

        let fetcher = PackFetcher::new(
            FetchConfig::new()
                .with_index_url("http://packs.invalid/")
                .with_download_dir(&dl)
                .with_packs_dir(&packs)
                .with_timeout(Duration::from_secs(1)),
        );

        assert!(fetcher.run().is_err());
        // A fatal index failure must not touch the filesystem.
        assert!(!dl.exists());
        assert!(!packs.exists());
    }
}
