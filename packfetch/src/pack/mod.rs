//! Device pack model, filtering, and latest-version selection.
//!
//! A device pack is a vendor-distributed archive of metadata, headers, and
//! linker scripts for one microcontroller family. The vendor's index names
//! packs as:
//!
//! ```text
//! Manufacturer.DeviceFamily.X.Y.Z.atpack
//! ```
//!
//! For example `Microchip.SAML10_DFP.3.5.87.atpack`. Device family packs end
//! in `_DFP`; tool packs for debuggers and programmers end in `_TP` and are
//! not wanted here.
//!
//! This module provides:
//!
//! - [`DevicePack`]: one parsed index entry (immutable once constructed)
//! - [`PackVersion`]: dot-separated version with numeric component ordering
//! - [`PackFilter`]: configurable device-family whitelist
//! - [`select_latest`]: collapse records to the newest version per family

mod core;
mod filter;
mod select;
mod version;

pub use core::DevicePack;
pub use filter::PackFilter;
pub use select::select_latest;
pub use version::PackVersion;
