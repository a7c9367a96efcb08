use std::error::Error;

use grelease_config::error::ConfigError;
use grelease_dl::error::FetchError;
use grelease_inspect::InspectError;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Inspect(#[from] InspectError),

    #[error("Error while {action}")]
    #[diagnostic(code(grelease::io), help("Check file permissions and disk space"))]
    IoError {
        action: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(code(grelease::toml), help("Check your configuration syntax"))]
    TomlError(#[from] toml::ser::Error),

    #[error(transparent)]
    #[diagnostic(code(grelease::json))]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid header: {0}")]
    #[diagnostic(
        code(grelease::header),
        help("Headers are given as 'Name: value'")
    )]
    InvalidHeader(String),

    #[error("{file} holds releases of {found}, not {requested}")]
    #[diagnostic(
        code(grelease::repository_mismatch),
        help("Append to a file written for the same repository, or drop --append")
    )]
    RepositoryMismatch {
        file: String,
        found: String,
        requested: String,
    },

    #[error("{rejected} of {total} releases rejected")]
    #[diagnostic(
        code(grelease::rejected),
        help("Run without --strict to only report rejections")
    )]
    Rejected { rejected: usize, total: usize },
}

impl CliError {
    /// Single-line description including the innermost cause.
    pub fn message(&self) -> String {
        let message = self.to_string();
        match self.root_cause() {
            Some(cause) if !message.contains(&cause) => format!("{message}: {cause}"),
            _ => message,
        }
    }

    pub fn root_cause(&self) -> Option<String> {
        let mut source = self.source()?;
        while let Some(next) = source.source() {
            source = next;
        }
        Some(source.to_string())
    }
}

pub type CliResult<T> = std::result::Result<T, CliError>;

/// Trait for adding context to IO errors.
pub trait ErrorContext<T> {
    fn with_context<C>(self, context: C) -> CliResult<T>
    where
        C: FnOnce() -> String;
}

impl<T> ErrorContext<T> for std::io::Result<T> {
    fn with_context<C>(self, context: C) -> CliResult<T>
    where
        C: FnOnce() -> String,
    {
        self.map_err(|err| {
            CliError::IoError {
                action: context(),
                source: err,
            }
        })
    }
}
