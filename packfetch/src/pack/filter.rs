//! Configurable device-family whitelist.

use super::core::DevicePack;

/// Predicate deciding which packs are worth downloading.
///
/// The filter is a plain rule object: allowed manufacturers, allowed family
/// name prefixes, and excluded family name suffixes, all matched
/// case-insensitively. Widening the device set means adding rules, not
/// editing match logic.
///
/// [`PackFilter::arm_32bit`] is the stock rule set covering Microchip's
/// 32-bit ARM-based families.
///
/// # Example
///
/// ```
/// use packfetch::pack::{DevicePack, PackFilter};
///
/// let filter = PackFilter::arm_32bit();
/// let base = "https://packs.download.microchip.com/";
///
/// let saml = DevicePack::from_href(base, "Microchip.SAML10_DFP.3.5.87.atpack").unwrap();
/// let avr = DevicePack::from_href(base, "Microchip.ATmega_DFP.2.0.401.atpack").unwrap();
///
/// assert!(filter.keep(&saml));
/// assert!(!filter.keep(&avr));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PackFilter {
    manufacturers: Vec<String>,
    family_prefixes: Vec<String>,
    excluded_suffixes: Vec<String>,
}

impl PackFilter {
    /// Create an empty filter that keeps nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock whitelist for 32-bit ARM-based Microchip devices.
    ///
    /// Covers the SAM and PIC32C series, PIC32W wireless parts with ARM
    /// cores, CEC/DEC/MEC embedded controllers, and WRL LoRa modules. Tool
    /// packs (`*_TP`, debuggers and programmers) are excluded.
    pub fn arm_32bit() -> Self {
        Self::new()
            .allow_manufacturer("Microchip")
            .allow_family_prefix("sam")
            .allow_family_prefix("pic32c")
            .allow_family_prefix("pic32w")
            .allow_family_prefix("cec")
            .allow_family_prefix("dec")
            .allow_family_prefix("mec")
            .allow_family_prefix("wrl")
            .exclude_family_suffix("_tp")
    }

    /// Allow packs from the given manufacturer.
    pub fn allow_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturers.push(manufacturer.into().to_lowercase());
        self
    }

    /// Allow families whose name starts with the given prefix.
    pub fn allow_family_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.family_prefixes.push(prefix.into().to_lowercase());
        self
    }

    /// Reject families whose name ends with the given suffix, regardless of
    /// prefix rules.
    pub fn exclude_family_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.excluded_suffixes.push(suffix.into().to_lowercase());
        self
    }

    /// Decide whether a pack record belongs to the wanted device set.
    ///
    /// Pure and deterministic; unmatched records simply return `false`.
    pub fn keep(&self, pack: &DevicePack) -> bool {
        let manufacturer = pack.manufacturer.to_lowercase();
        if !self.manufacturers.iter().any(|m| *m == manufacturer) {
            return false;
        }

        let family = pack.family.to_lowercase();
        if self.excluded_suffixes.iter().any(|s| family.ends_with(s)) {
            return false;
        }

        self.family_prefixes.iter().any(|p| family.starts_with(p))
    }
}
