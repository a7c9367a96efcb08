use std::fmt;

use miette::Diagnostic;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// One reason a release failed validation.
#[derive(Error, Diagnostic, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    #[error("release is draft")]
    #[diagnostic(code(grelease_inspect::draft))]
    Draft,

    #[error("release is pre-release")]
    #[diagnostic(code(grelease_inspect::prerelease))]
    Prerelease,

    #[error("release has no asset")]
    #[diagnostic(code(grelease_inspect::no_assets))]
    NoAssets,

    #[error("release has bad tag name")]
    #[diagnostic(code(grelease_inspect::bad_tag))]
    BadTag,
}

impl Rejection {
    /// Every reason, in reporting order.
    pub const ALL: [Rejection; 4] = [
        Rejection::Draft,
        Rejection::Prerelease,
        Rejection::NoAssets,
        Rejection::BadTag,
    ];

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// The set of reasons a release was rejected. Empty means accepted.
///
/// Iteration and display follow [`Rejection::ALL`] order regardless of the
/// order reasons were inserted.
///
/// # Examples
///
/// ```
/// use grelease_inspect::{Rejection, RejectionSet};
///
/// let set: RejectionSet = [Rejection::BadTag, Rejection::Draft].into_iter().collect();
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.to_string(), "release is draft\nrelease has bad tag name");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RejectionSet(u8);

impl RejectionSet {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, reason: Rejection) {
        self.0 |= reason.bit();
    }

    pub fn contains(&self, reason: Rejection) -> bool {
        self.0 & reason.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = Rejection> + '_ {
        Rejection::ALL.into_iter().filter(|r| self.contains(*r))
    }
}

impl FromIterator<Rejection> for RejectionSet {
    fn from_iter<I: IntoIterator<Item = Rejection>>(iter: I) -> Self {
        let mut set = Self::new();
        for reason in iter {
            set.insert(reason);
        }
        set
    }
}

impl fmt::Display for RejectionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, reason) in self.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{reason}")?;
        }
        Ok(())
    }
}

impl Serialize for RejectionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}
