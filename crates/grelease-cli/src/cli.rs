use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

#[derive(Parser)]
#[command(
    author,
    version,
    about,
    help_template = "{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}",
    arg_required_else_help = true
)]
pub struct Args {
    /// Set output verbosity
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress outputs
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as json
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Provide custom config file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set proxy
    #[arg(required = false, long, short = 'P', global = true)]
    pub proxy: Option<String>,

    /// Set request headers
    #[arg(required = false, long, short = 'H', global = true)]
    pub header: Option<Vec<String>>,

    /// Set user agent
    #[arg(required = false, long, short = 'A', global = true)]
    pub user_agent: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

/// Overrides for the configured validation policy.
#[derive(clap::Args, Clone, Debug, Default)]
pub struct PolicyArgs {
    /// Accept draft releases
    #[arg(required = false, long)]
    pub include_draft: bool,

    /// Accept prereleases
    #[arg(required = false, long)]
    pub include_prerelease: bool,

    /// Regular expression accepted tags must match
    #[arg(required = false, long, short = 't')]
    pub tag_pattern: Option<String>,

    /// Exit with an error if any release is rejected
    #[arg(required = false, long)]
    pub strict: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the release history of a repository
    #[command(arg_required_else_help = true)]
    Fetch {
        /// Repository as github.com/OWNER/REPO
        #[arg(required = true)]
        repo: String,

        /// File to write the releases to
        #[arg(
            required_unless_present = "print",
            conflicts_with = "print",
            value_hint = ValueHint::FilePath
        )]
        file: Option<PathBuf>,

        /// Print the releases to stdout instead of writing a file
        #[arg(required = false, short, long)]
        print: bool,

        /// Maximum number of page requests
        #[arg(required = false, short, long)]
        max_calls: Option<u32>,

        /// Append to the releases already stored in FILE
        #[arg(required = false, short, long, requires = "file")]
        append: bool,
    },

    /// Validate the releases stored in a file
    #[command(arg_required_else_help = true)]
    Inspect {
        /// File written by `fetch`
        #[arg(required = true, value_hint = ValueHint::FilePath)]
        file: PathBuf,

        #[command(flatten)]
        policy: PolicyArgs,
    },

    /// Fetch and validate releases without writing them
    #[command(arg_required_else_help = true)]
    Check {
        /// Repository as github.com/OWNER/REPO
        #[arg(required = true)]
        repo: String,

        /// Maximum number of page requests
        #[arg(required = false, short, long)]
        max_calls: Option<u32>,

        #[command(flatten)]
        policy: PolicyArgs,
    },

    /// Print the effective configuration
    Config,

    /// Generate default config with documentation
    #[clap(name = "defconfig")]
    DefConfig,
}
