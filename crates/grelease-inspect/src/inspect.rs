use grelease_dl::{
    repository::{GithubRelease, Repository},
    traits::Release,
};
use serde::{ser::SerializeStruct, Serialize, Serializer};
use tracing::debug;

use crate::{
    error::InspectError,
    policy::ValidationPolicy,
    rejection::{Rejection, RejectionSet},
};

/// Verdict for one release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome<'a, R> {
    pub release: &'a R,
    pub rejections: RejectionSet,
}

impl<R> ValidationOutcome<'_, R> {
    pub fn is_accepted(&self) -> bool {
        self.rejections.is_empty()
    }
}

impl<R: Release> Serialize for ValidationOutcome<'_, R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationOutcome", 5)?;
        state.serialize_field("id", &self.release.id())?;
        state.serialize_field("tag_name", self.release.tag())?;
        state.serialize_field("name", self.release.name())?;
        state.serialize_field("accepted", &self.is_accepted())?;
        state.serialize_field("rejections", &self.rejections)?;
        state.end()
    }
}

/// Applies every check of `policy` to `release`.
///
/// All checks run; a release can be rejected for several reasons at once.
/// Assets are only checked for presence, not inspected.
pub fn inspect_one<'a, R: Release>(
    release: &'a R,
    policy: &ValidationPolicy,
) -> ValidationOutcome<'a, R> {
    let mut rejections = RejectionSet::new();

    if !policy.include_draft && release.is_draft() {
        rejections.insert(Rejection::Draft);
    }
    if !policy.include_prerelease && release.is_prerelease() {
        rejections.insert(Rejection::Prerelease);
    }
    if release.assets().is_empty() {
        rejections.insert(Rejection::NoAssets);
    }
    if !policy.tag_matches(release.tag()) {
        rejections.insert(Rejection::BadTag);
    }

    ValidationOutcome {
        release,
        rejections,
    }
}

/// Validates `releases` in order, one outcome per release.
///
/// # Errors
///
/// [`InspectError::NoReleases`] if `releases` is empty.
pub fn inspect_releases<'a, R: Release>(
    releases: &'a [R],
    policy: &ValidationPolicy,
) -> Result<Vec<ValidationOutcome<'a, R>>, InspectError> {
    if releases.is_empty() {
        return Err(InspectError::NoReleases);
    }

    let outcomes: Vec<_> = releases.iter().map(|r| inspect_one(r, policy)).collect();
    debug!(
        "Inspected {} releases, {} accepted",
        outcomes.len(),
        outcomes.iter().filter(|o| o.is_accepted()).count()
    );
    Ok(outcomes)
}

/// Validates every release synced for `repo`.
pub fn inspect<'a>(
    repo: &'a Repository,
    policy: &ValidationPolicy,
) -> Result<Vec<ValidationOutcome<'a, GithubRelease>>, InspectError> {
    inspect_releases(&repo.releases, policy)
}

/// Counts over a batch of outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InspectSummary {
    pub total: usize,
    pub accepted: usize,
    pub draft: usize,
    pub prerelease: usize,
    pub no_assets: usize,
    pub bad_tag: usize,
}

impl InspectSummary {
    pub fn from_outcomes<R>(outcomes: &[ValidationOutcome<'_, R>]) -> Self {
        let mut summary = Self {
            total: outcomes.len(),
            ..Self::default()
        };

        for outcome in outcomes {
            if outcome.is_accepted() {
                summary.accepted += 1;
            }
            for reason in outcome.rejections.iter() {
                match reason {
                    Rejection::Draft => summary.draft += 1,
                    Rejection::Prerelease => summary.prerelease += 1,
                    Rejection::NoAssets => summary.no_assets += 1,
                    Rejection::BadTag => summary.bad_tag += 1,
                }
            }
        }

        summary
    }

    pub fn rejected(&self) -> usize {
        self.total - self.accepted
    }
}
