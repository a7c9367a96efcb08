use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum FetchError {
    #[error("Invalid parameter: {0}")]
    #[diagnostic(
        code(grelease_dl::invalid_parameter),
        help("Page size must be within 1..=100 and page numbers start at 1")
    )]
    InvalidParameter(String),

    #[error(transparent)]
    #[diagnostic(
        code(grelease_dl::transport),
        help("Check your internet connection or try again later")
    )]
    Transport(#[from] Box<ureq::Error>),

    #[error("{status} {reason} from {url}")]
    #[diagnostic(code(grelease_dl::upstream_status))]
    UpstreamStatus {
        status: u16,
        reason: String,
        url: String,
    },

    #[error("Failed to decode releases from {location}")]
    #[diagnostic(
        code(grelease_dl::decode),
        help("The response body is not a JSON array of releases")
    )]
    Decode {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid URL: {url}")]
    #[diagnostic(code(grelease_dl::invalid_url))]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Invalid repository: {0}")]
    #[diagnostic(
        code(grelease_dl::invalid_repository),
        help("Expected github.com/OWNER/REPO")
    )]
    InvalidRepository(String),

    #[error("Hostname not supported: {0}")]
    #[diagnostic(
        code(grelease_dl::unsupported_host),
        help("Only github.com repositories are supported")
    )]
    UnsupportedHost(String),

    #[error(transparent)]
    #[diagnostic(code(grelease_dl::io))]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FetchError>;

impl From<ureq::Error> for FetchError {
    fn from(e: ureq::Error) -> Self {
        Self::Transport(Box::new(e))
    }
}
