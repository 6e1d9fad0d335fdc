//! Core device pack record.

use std::fmt;

use crate::error::{FetchError, FetchResult};

use super::version::PackVersion;

/// Filename extension used by vendor pack archives.
pub(crate) const PACK_EXTENSION: &str = "atpack";

/// One entry parsed from the vendor's pack index.
///
/// A record is parsed from a single index link and never mutated afterwards.
/// The `family` field is the pack's identity: filtering and latest-version
/// selection both key on it.
///
/// # Example
///
/// ```
/// use packfetch::pack::DevicePack;
///
/// let pack = DevicePack::from_href(
///     "https://packs.download.microchip.com/",
///     "Microchip.SAML10_DFP.3.5.87.atpack",
/// ).unwrap();
///
/// assert_eq!(pack.manufacturer, "Microchip");
/// assert_eq!(pack.family, "SAML10_DFP");
/// assert_eq!(pack.version.as_str(), "3.5.87");
/// assert_eq!(pack.archive_filename(), "Microchip.SAML10_DFP.3.5.87.atpack");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevicePack {
    /// Manufacturer field of the pack name (e.g., "Microchip", "ARM").
    pub manufacturer: String,

    /// Device family the pack applies to (e.g., "SAML10_DFP").
    pub family: String,

    /// Pack version parsed from the name.
    pub version: PackVersion,

    /// Absolute download URL for this version's archive.
    pub url: String,
}

impl DevicePack {
    /// Parse a pack record from an index link.
    ///
    /// `href` is the link target as it appears in the index, either relative
    /// to `base_url` or already absolute. The filename must follow the
    /// vendor scheme `Manufacturer.Family.X.Y.Z.atpack` (six dot-separated
    /// fields); anything else is rejected with [`FetchError::BadPackName`].
    pub fn from_href(base_url: &str, href: &str) -> FetchResult<Self> {
        let bad = || FetchError::BadPackName {
            href: href.to_string(),
        };

        // The filename is the last path segment of the link.
        let filename = href.rsplit('/').next().ok_or_else(bad)?;

        let parts: Vec<&str> = filename.split('.').collect();
        if parts.len() != 6 || parts[5] != PACK_EXTENSION {
            return Err(bad());
        }

        let manufacturer = parts[0];
        let family = parts[1];
        if manufacturer.is_empty() || family.is_empty() {
            return Err(bad());
        }

        let version = PackVersion::new(&format!("{}.{}.{}", parts[2], parts[3], parts[4]));

        let url = if href.starts_with("http://") || href.starts_with("https://") {
            href.to_string()
        } else {
            format!(
                "{}/{}",
                base_url.trim_end_matches('/'),
                href.trim_start_matches('/')
            )
        };

        Ok(Self {
            manufacturer: manufacturer.to_string(),
            family: family.to_string(),
            version,
            url,
        })
    }

    /// The canonical archive filename for this record.
    ///
    /// Deterministic from manufacturer, family, and version; used as the
    /// local filename under the download directory.
    pub fn archive_filename(&self) -> String {
        format!(
            "{}.{}.{}.{}",
            self.manufacturer, self.family, self.version, PACK_EXTENSION
        )
    }
}

impl fmt::Display for DevicePack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} v{}", self.family, self.version)
    }
}
