//! ZIP extraction of pack archives.
//!
//! Device packs are ordinary ZIP files with an `.atpack` extension. Entry
//! names come from an external source, so every name is validated against
//! the destination root before a single byte is written; an archive with an
//! escaping entry (for example `../../evil`) fails extraction outright and
//! leaves the destination untouched.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use zip::ZipArchive;

use crate::error::{FetchError, FetchResult};

/// Extracts pack archives into per-pack directories.
#[derive(Debug, Default)]
pub struct ZipExtractor;

impl ZipExtractor {
    /// Create a new extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract `archive` into `dest_dir`, replacing any prior extraction.
    ///
    /// Returns the number of files written. Fails with
    /// [`FetchError::ExtractionFailed`] if the archive is corrupt or
    /// unreadable, and with [`FetchError::UnsafeArchivePath`] if any entry
    /// would land outside `dest_dir`. All entry names are checked before
    /// anything is written, so a rejected archive leaves `dest_dir` exactly
    /// as it was.
    pub fn extract(&self, archive: &Path, dest_dir: &Path) -> FetchResult<usize> {
        let file = File::open(archive).map_err(|e| FetchError::ReadFailed {
            path: archive.to_path_buf(),
            source: e,
        })?;

        let mut zip = ZipArchive::new(file).map_err(|e| FetchError::ExtractionFailed {
            path: archive.to_path_buf(),
            reason: e.to_string(),
        })?;

        // Validate every entry name up front.
        let entry_paths = self.validate_entries(archive, &mut zip)?;

        // Replace any prior extraction for this destination.
        if dest_dir.exists() {
            fs::remove_dir_all(dest_dir).map_err(|e| FetchError::WriteFailed {
                path: dest_dir.to_path_buf(),
                source: e,
            })?;
        }
        fs::create_dir_all(dest_dir).map_err(|e| FetchError::CreateDirFailed {
            path: dest_dir.to_path_buf(),
            source: e,
        })?;

        let mut files_written = 0;

        for (idx, relative) in entry_paths.iter().enumerate() {
            let mut entry = zip
                .by_index(idx)
                .map_err(|e| FetchError::ExtractionFailed {
                    path: archive.to_path_buf(),
                    reason: e.to_string(),
                })?;

            let outpath = dest_dir.join(relative);

            if entry.is_dir() {
                fs::create_dir_all(&outpath).map_err(|e| FetchError::CreateDirFailed {
                    path: outpath.clone(),
                    source: e,
                })?;
                continue;
            }

            if let Some(parent) = outpath.parent() {
                fs::create_dir_all(parent).map_err(|e| FetchError::CreateDirFailed {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }

            let mut outfile = File::create(&outpath).map_err(|e| FetchError::WriteFailed {
                path: outpath.clone(),
                source: e,
            })?;

            io::copy(&mut entry, &mut outfile).map_err(|e| FetchError::WriteFailed {
                path: outpath.clone(),
                source: e,
            })?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Some(mode) = entry.unix_mode() {
                    fs::set_permissions(&outpath, fs::Permissions::from_mode(mode)).ok();
                }
            }

            files_written += 1;
        }

        debug!(
            archive = %archive.display(),
            dest = %dest_dir.display(),
            files = files_written,
            "archive extracted"
        );

        Ok(files_written)
    }

    /// Check every entry name and return the sanitized relative paths,
    /// indexed by entry position.
    fn validate_entries(
        &self,
        archive: &Path,
        zip: &mut ZipArchive<File>,
    ) -> FetchResult<Vec<PathBuf>> {
        let mut paths = Vec::with_capacity(zip.len());

        for idx in 0..zip.len() {
            let entry = zip
                .by_index(idx)
                .map_err(|e| FetchError::ExtractionFailed {
                    path: archive.to_path_buf(),
                    reason: e.to_string(),
                })?;

            match entry.enclosed_name() {
                Some(relative) => paths.push(relative.to_path_buf()),
                None => {
                    return Err(FetchError::UnsafeArchivePath {
                        archive: archive.to_path_buf(),
                        entry: entry.name().to_string(),
                    });
                }
            }
        }

        Ok(paths)
    }
}
