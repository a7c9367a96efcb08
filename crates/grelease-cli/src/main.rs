use std::{io::stdout, process::ExitCode};

use clap::Parser;
use cli::{Args, Commands};
use error::{CliError, CliResult};
use fetch::{fetch, sync_repository, FetchContext};
use grelease_config::{
    config::{config_path, generate_default_config, set_config_path, Config},
    path::resolve_path,
};
use grelease_dl::{
    error::FetchError, github::Github, http_client::ClientConfig, platform::RepoLocator,
};
use inspect::{inspect_file, report, resolve_policy};
use logging::setup_logging;
use tracing::{debug, error, info};
use ureq::Proxy;
use utils::{parse_headers, set_color};

mod cli;
mod error;
mod fetch;
mod inspect;
mod logging;
mod utils;

/// Transport settings from the config file with command line overrides.
fn client_config(args: &Args, config: &Config) -> CliResult<ClientConfig> {
    let mut client = config.client_config();

    if let Some(proxy) = args.proxy.as_deref() {
        client.proxy = Some(Proxy::new(proxy).map_err(FetchError::from)?);
    }

    if let Some(user_agent) = &args.user_agent {
        client.user_agent = Some(user_agent.clone());
    }

    if let Some(headers) = &args.header {
        client.headers = Some(parse_headers(headers)?);
    }

    Ok(client)
}

fn handle_cli(args: Args) -> CliResult<()> {
    if args.no_color {
        set_color(false);
    }

    if let Some(ref c) = args.config {
        set_config_path(resolve_path(c)?);
    }
    debug!("Using configuration at {}", config_path().display());

    match args.command {
        Commands::DefConfig => {
            generate_default_config()?;
        }
        Commands::Config => {
            let config = Config::new()?;
            info!("{}", toml::to_string_pretty(&config)?);
        }
        ref command => {
            let config = Config::new()?;
            let github = Github::new(client_config(&args, &config)?);

            match command {
                Commands::Fetch {
                    repo,
                    file,
                    print,
                    max_calls,
                    append,
                } => {
                    let ctx = FetchContext {
                        repo: repo.clone(),
                        file: file.clone(),
                        print: *print,
                        max_calls: max_calls.unwrap_or_else(|| config.max_calls()),
                        append: *append,
                    };
                    fetch(&github, &ctx, stdout().lock())?;
                }
                Commands::Inspect {
                    file,
                    policy,
                } => {
                    let validation = resolve_policy(&config, policy)?;
                    inspect_file(file, &validation, policy.strict, args.json, stdout().lock())?;
                }
                Commands::Check {
                    repo,
                    max_calls,
                    policy,
                } => {
                    let validation = resolve_policy(&config, policy)?;
                    let locator = RepoLocator::parse(repo)?;
                    let max_calls = max_calls.unwrap_or_else(|| config.max_calls());
                    let (repo, _) = sync_repository(&github, locator, max_calls)?;
                    report(&repo, &validation, policy.strict, args.json, stdout().lock())?;
                }
                Commands::Config | Commands::DefConfig => unreachable!(),
            }
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    let args = Args::parse();
    setup_logging(&args);
    let verbose = args.verbose > 0;

    match handle_cli(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(err, verbose);
            ExitCode::FAILURE
        }
    }
}

/// One line by default; the full diagnostic with help text when verbose.
fn report_error(err: CliError, verbose: bool) {
    if verbose {
        eprintln!("{:?}", miette::Report::new(err));
    } else {
        error!("{}", err.message());
    }
}
