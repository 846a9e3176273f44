//! Version comparison for the OTA update flow (§4.H).

/// A parsed `major.minor.patch` version. Equality/ordering are
/// lexicographic over the three components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version(u64, u64, u64);

impl Version {
    /// Parses a version string that must be exactly three dot-separated
    /// non-negative integers. Anything else is malformed.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = parts.next()?.parse().ok()?;
        let patch = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self(major, minor, patch))
    }
}

/// Whether `candidate` is strictly newer than `current`. Malformed
/// versions (on either side) are treated as "not newer" (§4.H).
pub fn is_newer(candidate: &str, current: &str) -> bool {
    match (Version::parse(candidate), Version::parse(current)) {
        (Some(candidate), Some(current)) => candidate > current,
        _ => false,
    }
}

/// Sanitizes a version string for use as a filesystem path component
/// (§4.H step 2: `firmware-{sanitized-version}.tar.gz`).
pub fn sanitize_for_path(version: &str) -> String {
    version
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_version() {
        assert_eq!(Version::parse("1.2.3"), Some(Version(1, 2, 3)));
    }

    #[test]
    fn rejects_wrong_component_count() {
        assert_eq!(Version::parse("1.2"), None);
        assert_eq!(Version::parse("1.2.3.4"), None);
    }

    #[test]
    fn rejects_non_numeric_components() {
        assert_eq!(Version::parse("1.2.x"), None);
        assert_eq!(Version::parse("v1.2.3"), None);
    }

    #[test]
    fn lexicographic_comparison() {
        assert!(is_newer("2.1.0", "2.0.9"));
        assert!(!is_newer("2.0.9", "2.1.0"));
        assert!(!is_newer("2.0.0", "2.0.0"));
    }

    #[test]
    fn malformed_candidate_is_not_newer() {
        assert!(!is_newer("not-a-version", "1.0.0"));
    }

    #[test]
    fn malformed_current_is_not_newer() {
        assert!(!is_newer("2.0.0", "not-a-version"));
    }

    #[test]
    fn sanitizes_unsafe_path_characters() {
        assert_eq!(sanitize_for_path("1.2.3"), "1.2.3");
        assert_eq!(sanitize_for_path("../../etc/passwd"), ".._.._etc_passwd");
    }
}
