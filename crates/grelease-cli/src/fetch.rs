use std::{
    io::Write,
    path::{Path, PathBuf},
};

use grelease_dl::{
    github::Github,
    platform::RepoLocator,
    repository::Repository,
    sync::{SyncMode, SyncReport},
    traits::Transport,
};
use nu_ansi_term::Color::{Blue, Cyan, Green};
use tracing::info;

use crate::{
    error::{CliError, CliResult, ErrorContext},
    utils::Colored,
};

pub struct FetchContext {
    pub repo: String,
    pub file: Option<PathBuf>,
    pub print: bool,
    pub max_calls: u32,
    pub append: bool,
}

/// Syncs the release history of `locator` into a fresh repository handle.
pub fn sync_repository<T: Transport>(
    github: &Github<T>,
    locator: RepoLocator,
    max_calls: u32,
) -> CliResult<(Repository, SyncReport)> {
    let mut repo = locator.into_repository();
    let report = github.sync_releases(&mut repo, max_calls, SyncMode::Replace)?;
    Ok((repo, report))
}

fn load_existing(path: &Path, locator: &RepoLocator) -> CliResult<Option<Repository>> {
    let exists = path
        .try_exists()
        .with_context(|| format!("checking {}", path.display()))?;
    if !exists {
        return Ok(None);
    }

    let repo = Repository::read_json_file(path)?;
    if repo.owner != locator.owner || repo.name != locator.name {
        return Err(CliError::RepositoryMismatch {
            file: path.display().to_string(),
            found: repo.full_name(),
            requested: format!("{}/{}", locator.owner, locator.name),
        });
    }
    Ok(Some(repo))
}

pub fn fetch<T: Transport, W: Write>(
    github: &Github<T>,
    ctx: &FetchContext,
    stdout: W,
) -> CliResult<()> {
    let locator = RepoLocator::parse(&ctx.repo)?;

    let existing = match (&ctx.file, ctx.append) {
        (Some(path), true) => load_existing(path, &locator)?,
        _ => None,
    };

    let (mut repo, mode) = match existing {
        Some(repo) => (repo, SyncMode::Append),
        None => (locator.into_repository(), SyncMode::Replace),
    };

    let before = repo.releases.len();
    let report = github.sync_releases(&mut repo, ctx.max_calls, mode)?;

    match &ctx.file {
        Some(path) if !ctx.print => {
            repo.write_json_file(path)?;
            info!(
                "{} Saved {} releases of {} to {}",
                Colored(Green, "✓"),
                Colored(Cyan, repo.releases.len() - before),
                Colored(Blue, repo.full_name()),
                path.display()
            );
        }
        _ => repo.to_json_writer(stdout)?,
    }

    if report.truncated {
        info!(
            "Raise --max-calls above {} to fetch all {} pages",
            ctx.max_calls, report.last_page
        );
    }

    Ok(())
}
