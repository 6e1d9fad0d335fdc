//! Packfetch - device pack retrieval for toolchain builds
//!
//! Packfetch mirrors the subset of a vendor's device pack repository that a
//! bare-metal toolchain build needs. It reads the repository's HTML index,
//! keeps only the wanted device families at their latest published version,
//! downloads the `.atpack` archives, and unpacks each one into its own
//! directory.
//!
//! # Pipeline
//!
//! ```text
//! IndexClient ──► Vec<DevicePack> ──► PackFilter ──► select_latest
//!                                                        │
//!                        PackOutcome ◄── ZipExtractor ◄── PackDownloader
//! ```
//!
//! Each stage is usable on its own; [`fetcher::PackFetcher`] wires them
//! together for the common case.

pub mod download;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod index;
pub mod pack;

pub use download::PackDownloader;
pub use error::{FetchError, FetchResult};
pub use extract::ZipExtractor;
pub use fetcher::{FetchConfig, FetchReport, PackAction, PackFetcher, PackOutcome};
pub use index::IndexClient;
pub use pack::{select_latest, DevicePack, PackFilter, PackVersion};
