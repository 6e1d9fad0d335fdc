//! HTTP download of pack archives.

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, info};

use crate::error::{FetchError, FetchResult};
use crate::pack::DevicePack;

/// Default timeout for HTTP requests in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Buffer size for streaming downloads (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// Downloads pack archives to a local directory.
///
/// Each archive is written under the destination directory using the pack's
/// canonical filename (`Manufacturer.Family.X.Y.Z.atpack`), so the same
/// name+version always maps to the same local file. A file that already
/// exists with the expected size is not downloaded again; downloaded
/// archives from earlier runs double as a cache.
#[derive(Debug)]
pub struct PackDownloader {
    client: Client,
    timeout: Duration,
}

impl Default for PackDownloader {
    fn default() -> Self {
        Self::new()
    }
}

impl PackDownloader {
    /// Create a downloader with the default timeout.
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a downloader with a custom per-request timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create HTTP client");

        Self { client, timeout }
    }

    /// Get the remote file size via HEAD request.
    ///
    /// Returns `None` if the size cannot be determined.
    fn remote_size(&self, url: &str) -> Option<u64> {
        self.client
            .head(url)
            .send()
            .ok()
            .filter(|r| r.status().is_success())
            .and_then(|r| {
                r.headers()
                    .get("content-length")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
            })
    }

    /// Download a pack's archive into `dest_dir`, creating it if needed.
    ///
    /// Returns the path of the local archive. If the file is already present
    /// with the server-reported size (or any non-empty content when the
    /// server does not report one), the existing file is kept as-is.
    pub fn download(&self, pack: &DevicePack, dest_dir: &Path) -> FetchResult<PathBuf> {
        fs::create_dir_all(dest_dir).map_err(|e| FetchError::CreateDirFailed {
            path: dest_dir.to_path_buf(),
            source: e,
        })?;

        let dest = dest_dir.join(pack.archive_filename());
        let remote_size = self.remote_size(&pack.url);

        if let Some(existing) = existing_size(&dest) {
            let complete = match remote_size {
                Some(total) => existing == total,
                None => existing > 0,
            };
            if complete {
                debug!(pack = %pack, path = %dest.display(), "archive already downloaded");
                return Ok(dest);
            }
        }

        info!(pack = %pack, url = %pack.url, "downloading archive");
        self.stream_to_file(&pack.url, &dest)?;

        Ok(dest)
    }

    /// Stream a GET response body to a file.
    fn stream_to_file(&self, url: &str, dest: &Path) -> FetchResult<u64> {
        let mut response = self.client.get(url).send().map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                    timeout_secs: self.timeout.as_secs(),
                }
            } else {
                FetchError::DownloadFailed {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::DownloadFailed {
                url: url.to_string(),
                reason: format!("request failed with status {}", status),
            });
        }

        let file = File::create(dest).map_err(|e| FetchError::WriteFailed {
            path: dest.to_path_buf(),
            source: e,
        })?;

        let mut writer = BufWriter::new(file);
        let mut buffer = vec![0u8; BUFFER_SIZE];
        let mut written = 0u64;

        loop {
            let bytes_read = response
                .read(&mut buffer)
                .map_err(|e| FetchError::DownloadFailed {
                    url: url.to_string(),
                    reason: format!("read error: {}", e),
                })?;

            if bytes_read == 0 {
                break;
            }

            writer
                .write_all(&buffer[..bytes_read])
                .map_err(|e| FetchError::WriteFailed {
                    path: dest.to_path_buf(),
                    source: e,
                })?;

            written += bytes_read as u64;
        }

        writer.flush().map_err(|e| FetchError::WriteFailed {
            path: dest.to_path_buf(),
            source: e,
        })?;

        Ok(written)
    }
}

/// Size of an existing file, or `None` if it does not exist.
fn existing_size(path: &Path) -> Option<u64> {
    path.metadata().ok().filter(|m| m.is_file()).map(|m| m.len())
}
