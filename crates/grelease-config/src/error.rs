use grelease_inspect::InspectError;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("TOML serialization error: {0}")]
    #[diagnostic(
        code(grelease_config::toml_serialize),
        help("Check your configuration structure for invalid values")
    )]
    TomlSerError(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    #[diagnostic(
        code(grelease_config::toml_deserialize),
        help("Check your config.toml syntax and structure")
    )]
    TomlDeError(#[from] toml::de::Error),

    #[error("Configuration file already exists")]
    #[diagnostic(
        code(grelease_config::already_exists),
        help("Remove the existing config file or use a different location")
    )]
    ConfigAlreadyExists,

    #[error("Invalid timeout: {0} seconds")]
    #[diagnostic(
        code(grelease_config::invalid_timeout),
        help("timeout_secs must be between 1 and 300")
    )]
    InvalidTimeout(u64),

    #[error("Invalid max_calls: {0}")]
    #[diagnostic(
        code(grelease_config::invalid_max_calls),
        help("max_calls must be at least 1")
    )]
    InvalidMaxCalls(u32),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Policy(#[from] InspectError),

    #[error("Path is empty")]
    #[diagnostic(code(grelease_config::empty_path))]
    EmptyPath,

    #[error("Environment variable `{var}` not set in `{input}`")]
    #[diagnostic(code(grelease_config::missing_env_var))]
    MissingEnvVar { var: String, input: String },

    #[error("Unclosed variable expression starting at `{input}`")]
    #[diagnostic(code(grelease_config::unclosed_variable))]
    UnclosedVariable { input: String },

    #[error("IO error: {0}")]
    #[diagnostic(code(grelease_config::io))]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    #[diagnostic(code(grelease_config::toml))]
    Toml(#[from] toml_edit::TomlError),

    #[error("Encountered unexpected TOML item: {0}")]
    #[diagnostic(code(grelease_config::unexpected_toml_item))]
    UnexpectedTomlItem(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
