use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum InspectError {
    #[error("Repository has no release")]
    #[diagnostic(
        code(grelease_inspect::no_releases),
        help("Fetch the releases before inspecting them")
    )]
    NoReleases,

    #[error("Invalid tag pattern: {pattern}")]
    #[diagnostic(code(grelease_inspect::invalid_pattern))]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
