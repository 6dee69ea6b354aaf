// ─── Minecraft Version ───
// Numeric release identifiers (`1.12.2`) with total ordering.

use std::fmt;
use std::str::FromStr;

use crate::core::error::PackError;

/// A release version such as `1.16.5`. A missing patch component is `0`,
/// so `1.16` and `1.16.0` compare equal. Field order gives the ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct McVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl McVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl FromStr for McVersion {
    type Err = PackError;

    /// Only plain release ids are accepted; snapshots and pre-releases
    /// (`21w03a`, `1.17-pre1`) are rejected.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let unsupported = || PackError::UnsupportedVersion(raw.to_string());

        let parts = raw
            .trim()
            .split('.')
            .map(|segment| {
                if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                segment.parse::<u32>().ok()
            })
            .collect::<Option<Vec<u32>>>()
            .ok_or_else(unsupported)?;

        match parts.as_slice() {
            [major, minor] => Ok(Self::new(*major, *minor, 0)),
            [major, minor, patch] => Ok(Self::new(*major, *minor, *patch)),
            _ => Err(unsupported()),
        }
    }
}

impl fmt::Display for McVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.patch == 0 {
            write!(f, "{}.{}", self.major, self.minor)
        } else {
            write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_release_ids() {
        assert_eq!("1.12.2".parse::<McVersion>().unwrap(), McVersion::new(1, 12, 2));
        assert_eq!("1.16".parse::<McVersion>().unwrap(), McVersion::new(1, 16, 0));
    }

    #[test]
    fn rejects_snapshots_and_garbage() {
        for raw in ["21w03a", "1.17-pre1", "1", "", "1..2", "1.2.3.4"] {
            assert!(
                matches!(raw.parse::<McVersion>(), Err(PackError::UnsupportedVersion(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn orders_numerically_not_lexically() {
        let a: McVersion = "1.9.4".parse().unwrap();
        let b: McVersion = "1.10.2".parse().unwrap();
        assert!(a < b);
    }

    #[test]
    fn display_drops_zero_patch() {
        assert_eq!(McVersion::new(1, 13, 0).to_string(), "1.13");
        assert_eq!(McVersion::new(1, 7, 10).to_string(), "1.7.10");
    }
}
