use std::collections::HashMap;

use crate::error::ConfigError;

/// Target meaning "the newest syntax this crate knows about".
pub const LATEST: u16 = 0;
pub const OLDEST_SUPPORTED: u16 = 2015;
pub const NEWEST_SUPPORTED: u16 = 2025;

/// Syntax that a rewrite may introduce only when the target engine understands it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Feature {
    CatchWithoutBinding,
    OptionalChaining,
    NullishCoalescing,
    LogicalAssignment,
    NumericSeparator,
}

const MINIMUM_VERSIONS: &[(Feature, u16)] = &[
    (Feature::CatchWithoutBinding, 2019),
    (Feature::OptionalChaining, 2020),
    (Feature::NullishCoalescing, 2020),
    (Feature::LogicalAssignment, 2021),
    (Feature::NumericSeparator, 2021),
];

pub fn validate_version(version: u16) -> Result<(), ConfigError> {
    if version == LATEST || (OLDEST_SUPPORTED..=NEWEST_SUPPORTED).contains(&version) {
        Ok(())
    } else {
        Err(ConfigError::UnsupportedVersion(version))
    }
}

pub struct VersionPolicy {
    minimums: HashMap<Feature, u16>,
}

impl VersionPolicy {
    pub fn new() -> VersionPolicy {
        VersionPolicy {
            minimums: MINIMUM_VERSIONS.iter().copied().collect(),
        }
    }

    pub fn allowed(&self, feature: Feature, target_version: u16) -> bool {
        target_version == LATEST
            || self
                .minimums
                .get(&feature)
                .map_or(true, |&min| target_version >= min)
    }
}

impl Default for VersionPolicy {
    fn default() -> Self {
        VersionPolicy::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_version, Feature, VersionPolicy};
    use crate::error::ConfigError;

    #[test]
    fn test_allowed() {
        let policy = VersionPolicy::new();
        assert!(!policy.allowed(Feature::NullishCoalescing, 2019));
        assert!(policy.allowed(Feature::NullishCoalescing, 2020));
        assert!(!policy.allowed(Feature::CatchWithoutBinding, 2018));
        assert!(policy.allowed(Feature::CatchWithoutBinding, 2019));
        assert!(!policy.allowed(Feature::LogicalAssignment, 2020));
        assert!(policy.allowed(Feature::NumericSeparator, 2025));
    }

    #[test]
    fn test_latest_allows_everything() {
        let policy = VersionPolicy::new();
        assert!(policy.allowed(Feature::OptionalChaining, 0));
        assert!(policy.allowed(Feature::LogicalAssignment, 0));
    }

    #[test]
    fn test_validate_version() {
        assert_eq!(validate_version(0), Ok(()));
        assert_eq!(validate_version(2015), Ok(()));
        assert_eq!(validate_version(2025), Ok(()));
        assert_eq!(
            validate_version(2014),
            Err(ConfigError::UnsupportedVersion(2014))
        );
        assert_eq!(validate_version(6), Err(ConfigError::UnsupportedVersion(6)));
    }
}
