//! Latest-version selection over pack records.

use std::collections::BTreeMap;

use super::core::DevicePack;

/// Collapse pack records to the newest version per family.
///
/// Records are grouped by `family` and folded with the version comparison
/// defined on [`PackVersion`](super::PackVersion), keeping the maximum.
/// When two records carry the same family and an equal version, the record
/// encountered later in the input wins (last-wins tie-break), so the result
/// is deterministic for any fixed input sequence.
///
/// The returned map is ordered by family name, which gives downstream
/// download/extract steps a stable processing order.
///
/// # Example
///
/// ```
/// use packfetch::pack::{select_latest, DevicePack};
///
/// let base = "https://packs.download.microchip.com/";
/// let records = vec![
///     DevicePack::from_href(base, "Microchip.SAML10_DFP.3.5.87.atpack").unwrap(),
///     DevicePack::from_href(base, "Microchip.SAML10_DFP.3.6.1.atpack").unwrap(),
/// ];
///
/// let latest = select_latest(records);
/// assert_eq!(latest["SAML10_DFP"].version.as_str(), "3.6.1");
/// ```
pub fn select_latest(
    records: impl IntoIterator<Item = DevicePack>,
) -> BTreeMap<String, DevicePack> {
    let mut latest: BTreeMap<String, DevicePack> = BTreeMap::new();

    for record in records {
        match latest.get(&record.family) {
            Some(current) if record.version < current.version => {}
            _ => {
                latest.insert(record.family.clone(), record);
            }
        }
    }

    latest
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://packs.download.microchip.com/";

    fn pack(name: &str) -> DevicePack {
        DevicePack::from_href(BASE, name).unwrap()
    }

    #[test]
    fn test_keeps_highest_version() {
        let latest = select_latest(vec![
            pack("Microchip.SAML10_DFP.3.5.87.atpack"),
            pack("Microchip.SAML10_DFP.3.10.2.atpack"),
            pack("Microchip.SAML10_DFP.3.9.40.atpack"),
        ]);

        assert_eq!(latest.len(), 1);
        assert_eq!(latest["SAML10_DFP"].version.as_str(), "3.10.2");
    }

    #[test]
    fn test_one_record_per_family() {
        let latest = select_latest(vec![
            pack("Microchip.SAML10_DFP.1.0.0.atpack"),
            pack("Microchip.SAML10_DFP.2.0.0.atpack"),
            pack("Microchip.SAMD21_DFP.1.0.0.atpack"),
        ]);

        assert_eq!(latest.len(), 2);
        assert_eq!(latest["SAML10_DFP"].version.as_str(), "2.0.0");
        assert_eq!(latest["SAMD21_DFP"].version.as_str(), "1.0.0");
    }

    #[test]
    fn test_input_order_does_not_matter_for_distinct_versions() {
        let forward = select_latest(vec![
            pack("Microchip.SAML10_DFP.1.0.0.atpack"),
            pack("Microchip.SAML10_DFP.2.0.0.atpack"),
        ]);
        let reverse = select_latest(vec![
            pack("Microchip.SAML10_DFP.2.0.0.atpack"),
            pack("Microchip.SAML10_DFP.1.0.0.atpack"),
        ]);

        assert_eq!(forward["SAML10_DFP"], reverse["SAML10_DFP"]);
    }

    #[test]
    fn test_equal_versions_last_wins() {
        // Same family and version from two different locations; the later
        // index entry must win.
        let first = DevicePack::from_href(BASE, "Microchip.SAML10_DFP.1.0.0.atpack").unwrap();
        let second = DevicePack::from_href(
            BASE,
            "https://mirror.example.com/Microchip.SAML10_DFP.1.0.0.atpack",
        )
        .unwrap();

        let latest = select_latest(vec![first, second.clone()]);
        assert_eq!(latest["SAML10_DFP"], second);
    }

    #[test]
    fn test_padded_version_tie_last_wins() {
        // "1.2" and "1.2.0" compare equal, so the later entry is kept.
        let latest = select_latest(vec![
            pack("pool/Microchip.SAML10_DFP.1.2.0.atpack"),
            pack("mirror/Microchip.SAML10_DFP.1.2.0.atpack"),
        ]);
        assert!(latest["SAML10_DFP"].url.contains("mirror/"));
    }

    #[test]
    fn test_empty_input() {
        let latest = select_latest(Vec::new());
        assert!(latest.is_empty());
    }

    #[test]
    fn test_result_is_sorted_by_family() {
        let latest = select_latest(vec![
            pack("Microchip.WRL089_DFP.1.0.0.atpack"),
            pack("Microchip.CEC173x_DFP.1.0.0.atpack"),
            pack("Microchip.SAMD21_DFP.1.0.0.atpack"),
        ]);

        let families: Vec<&String> = latest.keys().collect();
        assert_eq!(families, vec!["CEC173x_DFP", "SAMD21_DFP", "WRL089_DFP"]);
    }
}
