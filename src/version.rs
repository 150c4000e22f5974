/// Represents a semantic version with major, minor, and patch components.
///
/// Follows semantic versioning specification (major.minor.patch). Ordering
/// compares major first, then minor, then patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

/// Magnitude of a semantic version increment.
///
/// Totally ordered: `None < Patch < Minor < Major` (declaration order).
/// `None` means a pull request carried no recognized precedence label and
/// no release should be cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BumpLevel {
    None,
    Patch,
    Minor,
    Major,
}

impl Version {
    /// Creates a new Version with the specified major, minor, and patch components.
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl BumpLevel {
    /// Maps a single label name to its bump level.
    ///
    /// `"major"`, `"minor"` and `"patch"` are the recognized precedence
    /// labels; any other name contributes nothing.
    pub fn from_label(label: &str) -> BumpLevel {
        match label {
            "major" => BumpLevel::Major,
            "minor" => BumpLevel::Minor,
            "patch" => BumpLevel::Patch,
            _ => BumpLevel::None,
        }
    }

    /// Computes the bump level implied by a full label set.
    ///
    /// The result is the maximum precedence present, so a pull request
    /// labeled both `patch` and `minor` bumps at the minor level.
    pub fn from_labels<'a>(labels: impl IntoIterator<Item = &'a str>) -> BumpLevel {
        labels
            .into_iter()
            .map(BumpLevel::from_label)
            .max()
            .unwrap_or(BumpLevel::None)
    }
}

/// Parses a version from a git tag string.
///
/// Extracts version numbers from tag names by removing common prefixes ('v' or 'V')
/// and splitting by dots. Expects exactly three version components (major.minor.patch).
///
/// # Arguments
/// * `tag` - Tag string to parse (e.g., "v1.2.3" or "1.2.3")
///
/// # Returns
/// * `Some(Version)` - Successfully parsed version
/// * `None` - If tag doesn't match the pattern or has wrong number of components
pub fn parse_version_from_tag(tag: &str) -> Option<Version> {
    // Remove common prefixes like 'v', 'V', etc.
    let clean_tag = tag.trim_start_matches('v').trim_start_matches('V');

    // Split by dots and try to parse numbers
    let parts: Vec<&str> = clean_tag.split('.').collect();
    if parts.len() != 3 {
        return None;
    }

    let major = parts[0].parse::<u32>().ok()?;
    let minor = parts[1].parse::<u32>().ok()?;
    let patch = parts[2].parse::<u32>().ok()?;

    Some(Version::new(major, minor, patch))
}

/// Bumps a version according to the specified bump level.
///
/// Increments the appropriate version component and resets lower components to 0:
/// - **Major**: major += 1, minor = 0, patch = 0
/// - **Minor**: minor += 1, patch = 0
/// - **Patch**: patch += 1
/// - **None**: version is returned unchanged
pub fn bump_version(mut version: Version, level: BumpLevel) -> Version {
    match level {
        BumpLevel::Major => {
            version.major += 1;
            version.minor = 0;
            version.patch = 0;
        }
        BumpLevel::Minor => {
            version.minor += 1;
            version.patch = 0;
        }
        BumpLevel::Patch => {
            version.patch += 1;
        }
        BumpLevel::None => {}
    }
    version
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parse() {
        let v = parse_version_from_tag("v1.2.3").unwrap();
        assert_eq!(v.major, 1);
        assert_eq!(v.minor, 2);
        assert_eq!(v.patch, 3);
    }

    #[test]
    fn test_version_parse_without_v() {
        let v = parse_version_from_tag("1.2.3").unwrap();
        assert_eq!(v, Version::new(1, 2, 3));
    }

    #[test]
    fn test_version_parse_uppercase_v() {
        let v = parse_version_from_tag("V1.2.3").unwrap();
        assert_eq!(v, Version::new(1, 2, 3));
    }

    #[test]
    fn test_version_parse_invalid() {
        assert!(parse_version_from_tag("1.2").is_none());
        assert!(parse_version_from_tag("v1.2.3.4").is_none());
        assert!(parse_version_from_tag("notaversion").is_none());
        assert!(parse_version_from_tag("v1.x.3").is_none());
    }

    #[test]
    fn test_version_ordering() {
        assert!(Version::new(1, 3, 0) > Version::new(1, 2, 9));
        assert!(Version::new(2, 0, 0) > Version::new(1, 9, 9));
        assert!(Version::new(0, 0, 1) > Version::new(0, 0, 0));
    }

    #[test]
    fn test_version_bump_major() {
        let bumped = bump_version(Version::new(1, 2, 3), BumpLevel::Major);
        assert_eq!(bumped, Version::new(2, 0, 0));
    }

    #[test]
    fn test_version_bump_minor() {
        let bumped = bump_version(Version::new(1, 2, 3), BumpLevel::Minor);
        assert_eq!(bumped, Version::new(1, 3, 0));
    }

    #[test]
    fn test_version_bump_patch() {
        let bumped = bump_version(Version::new(1, 2, 3), BumpLevel::Patch);
        assert_eq!(bumped, Version::new(1, 2, 4));
    }

    #[test]
    fn test_version_bump_none() {
        let bumped = bump_version(Version::new(1, 2, 3), BumpLevel::None);
        assert_eq!(bumped, Version::new(1, 2, 3));
    }

    #[test]
    fn test_version_display() {
        let v = Version::new(1, 2, 3);
        assert_eq!(v.to_string(), "1.2.3");
    }

    #[test]
    fn test_bump_level_ordering() {
        assert!(BumpLevel::None < BumpLevel::Patch);
        assert!(BumpLevel::Patch < BumpLevel::Minor);
        assert!(BumpLevel::Minor < BumpLevel::Major);
    }

    #[test]
    fn test_bump_level_from_label() {
        assert_eq!(BumpLevel::from_label("major"), BumpLevel::Major);
        assert_eq!(BumpLevel::from_label("minor"), BumpLevel::Minor);
        assert_eq!(BumpLevel::from_label("patch"), BumpLevel::Patch);
        assert_eq!(BumpLevel::from_label("documentation"), BumpLevel::None);
    }

    #[test]
    fn test_bump_level_from_labels_takes_maximum() {
        let level = BumpLevel::from_labels(vec!["patch", "minor"]);
        assert_eq!(level, BumpLevel::Minor);

        let level = BumpLevel::from_labels(vec!["bug", "patch", "major"]);
        assert_eq!(level, BumpLevel::Major);
    }

    #[test]
    fn test_bump_level_from_labels_empty() {
        assert_eq!(BumpLevel::from_labels(vec![]), BumpLevel::None);
        assert_eq!(
            BumpLevel::from_labels(vec!["enhancement", "bug"]),
            BumpLevel::None
        );
    }
}
