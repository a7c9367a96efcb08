use std::sync::LazyLock;

use regex::Regex;

use crate::error::InspectError;

/// Tags like `v1.2.3`, up to three digits per component. Not anchored at the
/// end, so `v1.2.3-rc1` matches too; append `$` for an exact match.
pub const VERSION_333: &str = r"^v[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}";

static VERSION_333_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(VERSION_333).expect("unable to compile version regex"));

/// Acceptance rules applied to every release of an inspection.
#[derive(Debug, Clone)]
pub struct ValidationPolicy {
    /// Accept draft releases. Should be false unless you know what you are doing.
    pub include_draft: bool,
    pub include_prerelease: bool,
    /// Every accepted tag must match. Anchoring is up to the pattern.
    pub tag_pattern: Regex,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self::new(VERSION_333_RE.clone())
    }
}

impl ValidationPolicy {
    pub fn new(tag_pattern: Regex) -> Self {
        Self {
            include_draft: false,
            include_prerelease: false,
            tag_pattern,
        }
    }

    /// Compiles `pattern` into a policy that rejects drafts and prereleases.
    pub fn with_pattern(pattern: &str) -> Result<Self, InspectError> {
        let tag_pattern = Regex::new(pattern).map_err(|source| {
            InspectError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;
        Ok(Self::new(tag_pattern))
    }

    pub fn include_draft(mut self, include: bool) -> Self {
        self.include_draft = include;
        self
    }

    pub fn include_prerelease(mut self, include: bool) -> Self {
        self.include_prerelease = include;
        self
    }

    pub fn tag_matches(&self, tag: &str) -> bool {
        self.tag_pattern.is_match(tag)
    }
}
