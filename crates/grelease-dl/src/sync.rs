use tracing::{debug, warn};

use crate::{
    error::{FetchError, Result},
    github::Github,
    repository::Repository,
    traits::Transport,
};

/// How a sync treats releases already held by the repository.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncMode {
    /// Drop existing releases once the first page has been fetched.
    #[default]
    Replace,
    /// Keep existing releases and append after them.
    Append,
}

/// Outcome of one [`Github::sync_releases`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub pages_fetched: u32,
    /// Last page advertised upstream, `0` if undeterminable.
    pub last_page: u32,
    pub releases_fetched: usize,
    /// More pages exist upstream than the call budget allowed.
    pub truncated: bool,
}

impl<T: Transport> Github<T> {
    /// Fetches the release history of `repo` page by page, at most
    /// `max_calls` requests.
    ///
    /// Page 1 tells how many pages exist; pages `2..=min(last, max_calls)`
    /// follow in increasing order and are appended to `repo.releases` as
    /// they arrive. The first failing page aborts the sync and its error is
    /// returned unchanged; pages appended before it stay in `repo`.
    pub fn sync_releases(
        &self,
        repo: &mut Repository,
        max_calls: u32,
        mode: SyncMode,
    ) -> Result<SyncReport> {
        if max_calls < 1 {
            return Err(FetchError::InvalidParameter(
                "max_calls must be larger than 0".into(),
            ));
        }

        let (releases, info) = self.list_releases(repo, 1)?;
        if mode == SyncMode::Replace {
            repo.releases.clear();
        }

        let mut report = SyncReport {
            pages_fetched: 1,
            last_page: info.last_page,
            releases_fetched: releases.len(),
            truncated: false,
        };
        repo.append_releases(releases);

        if info.last_page < 2 {
            debug!(
                "Synced {} releases of {} in 1 request",
                report.releases_fetched,
                repo.full_name()
            );
            return Ok(report);
        }

        let max_page = info.last_page.min(max_calls);
        for page in 2..=max_page {
            let (releases, _) = self.list_releases(repo, page)?;
            debug!("Appending {} releases from page {}", releases.len(), page);
            report.pages_fetched += 1;
            report.releases_fetched += releases.len();
            repo.append_releases(releases);
        }

        report.truncated = info.last_page > max_calls;
        if report.truncated {
            warn!(
                "{} has {} pages of releases, only {} fetched",
                repo.full_name(),
                info.last_page,
                max_calls
            );
        }
        debug!(
            "Synced {} releases of {} in {} requests",
            report.releases_fetched,
            repo.full_name(),
            report.pages_fetched
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        http_client::ClientConfig,
        test_utils::{error_response, page_response, release, FakeTransport},
    };

    fn github(transport: FakeTransport) -> Github<FakeTransport> {
        Github::with_transport(ClientConfig::default(), transport)
    }

    fn ids(repo: &Repository) -> Vec<u64> {
        repo.releases.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_sync_single_page_without_link() {
        let gh = github(FakeTransport::new(vec![Ok(page_response(1..6, None))]));
        let mut repo = Repository::new("a", "b");

        let report = gh.sync_releases(&mut repo, 10, SyncMode::Replace).unwrap();

        assert_eq!(gh.transport().requests().len(), 1);
        assert_eq!(ids(&repo), vec![1, 2, 3, 4, 5]);
        assert_eq!(report.pages_fetched, 1);
        assert_eq!(report.last_page, 0);
        assert!(!report.truncated);
    }

    #[test]
    fn test_sync_single_page_last_is_one() {
        let gh = github(FakeTransport::new(vec![Ok(page_response(1..3, Some(1)))]));
        let mut repo = Repository::new("a", "b");

        gh.sync_releases(&mut repo, 50, SyncMode::Replace).unwrap();
        assert_eq!(gh.transport().requests().len(), 1);
    }

    #[test]
    fn test_sync_fetches_all_pages_in_order() {
        let gh = github(FakeTransport::new(vec![
            Ok(page_response(1..4, Some(3))),
            Ok(page_response(4..6, Some(3))),
            Ok(page_response(6..7, Some(3))),
        ]));
        let mut repo = Repository::new("a", "b");

        let report = gh.sync_releases(&mut repo, 10, SyncMode::Replace).unwrap();

        assert_eq!(ids(&repo), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(report.pages_fetched, 3);
        assert_eq!(report.releases_fetched, 6);
        assert!(!report.truncated);

        let pages: Vec<_> = gh
            .transport()
            .requests()
            .into_iter()
            .map(|r| r.url)
            .collect();
        assert_eq!(
            pages,
            vec![
                "https://api.github.com/repos/a/b/releases?per_page=100&page=1",
                "https://api.github.com/repos/a/b/releases?per_page=100&page=2",
                "https://api.github.com/repos/a/b/releases?per_page=100&page=3",
            ]
        );
    }

    #[test]
    fn test_sync_respects_call_budget() {
        let gh = github(FakeTransport::new(vec![
            Ok(page_response(1..101, Some(5))),
            Ok(page_response(101..201, Some(5))),
        ]));
        let mut repo = Repository::new("a", "b");

        let report = gh.sync_releases(&mut repo, 2, SyncMode::Replace).unwrap();

        assert_eq!(gh.transport().requests().len(), 2);
        assert_eq!(repo.releases.len(), 200);
        assert_eq!(report.last_page, 5);
        assert!(report.truncated);
    }

    #[test]
    fn test_sync_budget_of_one() {
        let gh = github(FakeTransport::new(vec![Ok(page_response(1..3, Some(9)))]));
        let mut repo = Repository::new("a", "b");

        let report = gh.sync_releases(&mut repo, 1, SyncMode::Replace).unwrap();
        assert_eq!(gh.transport().requests().len(), 1);
        assert!(report.truncated);
    }

    #[test]
    fn test_sync_zero_budget_is_invalid() {
        let gh = github(FakeTransport::new(vec![]));
        let mut repo = Repository::new("a", "b");

        let result = gh.sync_releases(&mut repo, 0, SyncMode::Replace);
        assert!(matches!(result, Err(FetchError::InvalidParameter(_))));
        assert!(gh.transport().requests().is_empty());
    }

    #[test]
    fn test_sync_failure_keeps_partial_pages() {
        let gh = github(FakeTransport::new(vec![
            Ok(page_response(1..3, Some(4))),
            Ok(page_response(3..5, Some(4))),
            Ok(error_response(502, "Bad Gateway")),
        ]));
        let mut repo = Repository::new("a", "b");

        let err = gh
            .sync_releases(&mut repo, 10, SyncMode::Replace)
            .unwrap_err();

        assert!(matches!(err, FetchError::UpstreamStatus { status: 502, .. }));
        assert_eq!(gh.transport().requests().len(), 3);
        assert_eq!(ids(&repo), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_sync_first_page_failure_keeps_existing() {
        let gh = github(FakeTransport::new(vec![Ok(error_response(404, "Not Found"))]));
        let mut repo = Repository::new("a", "b");
        repo.append_releases(vec![release(99)]);

        assert!(gh.sync_releases(&mut repo, 10, SyncMode::Replace).is_err());
        assert_eq!(ids(&repo), vec![99]);
    }

    #[test]
    fn test_sync_replace_and_append_modes() {
        let gh = github(FakeTransport::new(vec![
            Ok(page_response(1..3, None)),
            Ok(page_response(3..4, None)),
        ]));
        let mut repo = Repository::new("a", "b");
        repo.append_releases(vec![release(99)]);

        gh.sync_releases(&mut repo, 10, SyncMode::Replace).unwrap();
        assert_eq!(ids(&repo), vec![1, 2]);

        gh.sync_releases(&mut repo, 10, SyncMode::Append).unwrap();
        assert_eq!(ids(&repo), vec![1, 2, 3]);
    }
}
