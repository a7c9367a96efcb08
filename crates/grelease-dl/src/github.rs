use tracing::debug;
use url::Url;

use crate::{
    error::{FetchError, Result},
    http_client::{ClientConfig, UreqTransport, API_VERSION_HEADER},
    pagination::PageInfo,
    repository::{GithubRelease, Repository},
    traits::Transport,
};

/// GitHub's default page size when `per_page` is omitted.
pub const RELEASES_PER_PAGE_DEFAULT: u8 = 30;
pub const RELEASES_PER_PAGE_MAX: u8 = 100;

/// Release client for one GitHub API endpoint.
///
/// All requests go through the [`Transport`] given at construction, carrying
/// the configured `Accept` and API version headers.
pub struct Github<T: Transport = UreqTransport> {
    config: ClientConfig,
    transport: T,
}

impl Github<UreqTransport> {
    pub fn new(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(&config);
        Self {
            config,
            transport,
        }
    }
}

impl<T: Transport> Github<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            config,
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Builds the release listing URL for one page.
    ///
    /// # Errors
    ///
    /// * [`FetchError::InvalidParameter`] if `per_page` is outside `1..=100`,
    ///   `page` is `0`, owner/name is empty, or the API URL cannot carry a path
    /// * [`FetchError::InvalidUrl`] if the configured API URL does not parse
    ///
    /// # Examples
    ///
    /// ```
    /// use grelease_dl::{github::Github, http_client::ClientConfig};
    ///
    /// let github = Github::new(ClientConfig::default());
    /// let url = github.releases_url("gohugoio", "hugo", 30, 20).unwrap();
    /// assert_eq!(
    ///     url.as_str(),
    ///     "https://api.github.com/repos/gohugoio/hugo/releases?per_page=30&page=20"
    /// );
    /// ```
    pub fn releases_url(&self, owner: &str, name: &str, per_page: u8, page: u32) -> Result<Url> {
        if !(1..=RELEASES_PER_PAGE_MAX).contains(&per_page) {
            return Err(FetchError::InvalidParameter(format!(
                "per_page must be between 1 and {RELEASES_PER_PAGE_MAX}, got {per_page}"
            )));
        }
        if page < 1 {
            return Err(FetchError::InvalidParameter(
                "page must be larger than 0".into(),
            ));
        }
        if owner.is_empty() || name.is_empty() {
            return Err(FetchError::InvalidParameter(
                "repository owner and name must not be empty".into(),
            ));
        }

        let api_url = &self.config.api_url;
        let mut url = Url::parse(api_url).map_err(|source| {
            FetchError::InvalidUrl {
                url: api_url.clone(),
                source,
            }
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                FetchError::InvalidParameter(format!("API URL {api_url} cannot carry a path"))
            })?
            .pop_if_empty()
            .extend(["repos", owner, name, "releases"]);
        url.query_pairs_mut()
            .append_pair("per_page", &per_page.to_string())
            .append_pair("page", &page.to_string());

        Ok(url)
    }

    /// Fetches one page of releases with a single request.
    ///
    /// Parameters are validated before anything is sent. The returned
    /// [`PageInfo`] carries the `last` page advertised by the provider.
    pub fn fetch_page(
        &self,
        owner: &str,
        name: &str,
        per_page: u8,
        page: u32,
    ) -> Result<(Vec<GithubRelease>, PageInfo)> {
        let url = self.releases_url(owner, name, per_page, page)?;
        debug!("Fetching releases page {} of {}/{}: {}", page, owner, name, url);

        let headers = [
            ("Accept", self.config.accept.as_str()),
            (API_VERSION_HEADER, self.config.api_version.as_str()),
        ];
        let resp = self.transport.get(url.as_str(), &headers)?;

        if !resp.is_success() {
            return Err(FetchError::UpstreamStatus {
                status: resp.status,
                reason: resp.reason,
                url: url.to_string(),
            });
        }

        let releases: Vec<GithubRelease> =
            serde_json::from_slice(&resp.body).map_err(|source| {
                FetchError::Decode {
                    location: url.to_string(),
                    source,
                }
            })?;

        let info = PageInfo::from_link(page, per_page, resp.link.as_deref());
        debug!(
            "Page {} returned {} releases (last page: {})",
            page,
            releases.len(),
            info.last_page
        );

        Ok((releases, info))
    }

    /// Fetches one page of `repo`'s releases at the maximum page size.
    pub fn list_releases(
        &self,
        repo: &Repository,
        page: u32,
    ) -> Result<(Vec<GithubRelease>, PageInfo)> {
        self.fetch_page(&repo.owner, &repo.name, RELEASES_PER_PAGE_MAX, page)
    }
}
