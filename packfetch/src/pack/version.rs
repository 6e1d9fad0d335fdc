//! Pack version parsing and ordering.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// One dot-separated version component.
///
/// Components that parse as integers compare numerically; anything else is
/// kept as text and compares lexically. A numeric component always orders
/// above a text component, so `2.0.0` is newer than `2.0.0-beta`.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Component {
    Number(u64),
    Text(String),
}

impl Component {
    fn parse(s: &str) -> Self {
        match s.parse::<u64>() {
            Ok(n) => Self::Number(n),
            Err(_) => Self::Text(s.to_string()),
        }
    }
}

impl Ord for Component {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.cmp(b),
            (Self::Number(_), Self::Text(_)) => Ordering::Greater,
            (Self::Text(_), Self::Number(_)) => Ordering::Less,
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Component {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A pack version such as `3.5.87`.
///
/// Versions compare component by component, left to right. Numeric
/// components compare as integers (`1.10.0` is newer than `1.9.0`), and a
/// version with fewer components is padded with trailing zeros, so
/// `1.2` equals `1.2.0`. Parsing never fails; unparseable components fall
/// back to lexical comparison rather than aborting a whole run for one
/// odd index entry.
///
/// # Example
///
/// ```
/// use packfetch::pack::PackVersion;
///
/// let old: PackVersion = "1.9.0".parse().unwrap();
/// let new: PackVersion = "1.10.0".parse().unwrap();
/// assert!(new > old);
///
/// let short: PackVersion = "1.2".parse().unwrap();
/// let long: PackVersion = "1.2.0".parse().unwrap();
/// assert_eq!(short, long);
/// ```
#[derive(Debug, Clone)]
pub struct PackVersion {
    components: Vec<Component>,
    raw: String,
}

impl PackVersion {
    /// Parse a version string.
    pub fn new(s: &str) -> Self {
        Self {
            components: s.split('.').map(Component::parse).collect(),
            raw: s.to_string(),
        }
    }

    /// The version string as it appeared in the index.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    fn component(&self, idx: usize) -> Component {
        // Missing components compare as zero.
        self.components
            .get(idx)
            .cloned()
            .unwrap_or(Component::Number(0))
    }
}

impl FromStr for PackVersion {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl fmt::Display for PackVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Ord for PackVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        for idx in 0..len {
            match self.component(idx).cmp(&other.component(idx)) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for PackVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PackVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PackVersion {}
