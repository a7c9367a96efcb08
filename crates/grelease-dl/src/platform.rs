use std::{str::FromStr, sync::LazyLock};

use regex::Regex;

use crate::{error::FetchError, repository::Repository};

pub const GITHUB_HOST: &str = "github.com";

static REPO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i:https?://)?([^/\s]+)/([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+?)(?:\.git)?/?$")
        .expect("unable to compile repository regex")
});

/// Owner and name of a GitHub repository given as `github.com/OWNER/REPO`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLocator {
    pub owner: String,
    pub name: String,
}

impl RepoLocator {
    /// Parses `github.com/OWNER/REPO`, optionally prefixed with a scheme and
    /// suffixed with `.git` or `/`.
    ///
    /// # Examples
    ///
    /// ```
    /// use grelease_dl::platform::RepoLocator;
    ///
    /// let loc = RepoLocator::parse("https://github.com/gohugoio/hugo.git").unwrap();
    /// assert_eq!(loc.owner, "gohugoio");
    /// assert_eq!(loc.name, "hugo");
    /// ```
    pub fn parse(input: impl AsRef<str>) -> Result<Self, FetchError> {
        let input = input.as_ref().trim();
        let caps = REPO_RE
            .captures(input)
            .ok_or_else(|| FetchError::InvalidRepository(input.to_string()))?;

        let host = &caps[1];
        if !host.eq_ignore_ascii_case(GITHUB_HOST) {
            return Err(FetchError::UnsupportedHost(host.to_string()));
        }

        let (owner, name) = (&caps[2], &caps[3]);
        if [owner, name].iter().any(|s| matches!(*s, "." | "..")) {
            return Err(FetchError::InvalidRepository(input.to_string()));
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    pub fn into_repository(self) -> Repository {
        Repository::new(self.owner, self.name)
    }
}

impl FromStr for RepoLocator {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        let loc = RepoLocator::parse("github.com/gohugoio/hugo").unwrap();
        assert_eq!(
            loc,
            RepoLocator {
                owner: "gohugoio".into(),
                name: "hugo".into()
            }
        );
    }

    #[test]
    fn test_parse_variants() {
        for input in [
            "https://github.com/gohugoio/hugo",
            "http://github.com/gohugoio/hugo/",
            "HTTPS://GitHub.com/gohugoio/hugo.git",
            "  github.com/gohugoio/hugo  ",
        ] {
            let loc = RepoLocator::parse(input).unwrap();
            assert_eq!(loc.owner, "gohugoio", "{input}");
            assert_eq!(loc.name, "hugo", "{input}");
        }
    }

    #[test]
    fn test_parse_wrong_segment_count() {
        for input in [
            "github.com/gohugoio",
            "github.com/gohugoio/hugo/releases",
            "gohugoio/hugo",
            "github.com//hugo",
            "",
        ] {
            assert!(
                matches!(
                    RepoLocator::parse(input),
                    Err(FetchError::InvalidRepository(_))
                ),
                "{input}"
            );
        }
    }

    #[test]
    fn test_parse_rejects_url_syntax_in_names() {
        for input in [
            "github.com/a/b#x",
            "github.com/a/b?page=9",
            "github.com/a%2F/b",
            "github.com/a/b c",
            "github.com/../b",
            "github.com/a/.",
        ] {
            assert!(
                matches!(
                    RepoLocator::parse(input),
                    Err(FetchError::InvalidRepository(_))
                ),
                "{input}"
            );
        }
    }

    #[test]
    fn test_parse_github_name_charset() {
        let loc = RepoLocator::parse("github.com/my-org_1/repo.name-2").unwrap();
        assert_eq!(loc.owner, "my-org_1");
        assert_eq!(loc.name, "repo.name-2");
    }

    #[test]
    fn test_parse_unsupported_host() {
        let result = RepoLocator::parse("gitlab.com/group/project");
        assert!(matches!(result, Err(FetchError::UnsupportedHost(h)) if h == "gitlab.com"));
    }

    #[test]
    fn test_into_repository() {
        let repo: Repository = "github.com/a/b"
            .parse::<RepoLocator>()
            .unwrap()
            .into_repository();
        assert_eq!(repo.full_name(), "a/b");
        assert!(repo.releases.is_empty());
    }
}
