use std::{io::Write, path::Path};

use grelease_config::config::Config;
use grelease_dl::{repository::Repository, traits::Release};
use grelease_inspect::{inspect, InspectSummary, ValidationOutcome, ValidationPolicy};
use nu_ansi_term::Color::{Blue, Cyan, Green, Red, Yellow};
use tabled::{
    builder::Builder,
    settings::{peaker::PriorityMax, themes::BorderCorrection, Panel, Style, Width},
};
use tracing::info;

use crate::{
    cli::PolicyArgs,
    error::{CliError, CliResult, ErrorContext},
    utils::{term_width, Colored, Icons},
};

/// Configured policy with command line overrides applied.
pub fn resolve_policy(config: &Config, args: &PolicyArgs) -> CliResult<ValidationPolicy> {
    let base = config.policy()?;
    let policy = match &args.tag_pattern {
        Some(pattern) => ValidationPolicy::with_pattern(pattern)?,
        None => base.clone(),
    };

    Ok(policy
        .include_draft(base.include_draft || args.include_draft)
        .include_prerelease(base.include_prerelease || args.include_prerelease))
}

pub fn outcome_line<R: Release>(outcome: &ValidationOutcome<'_, R>) -> String {
    let release = outcome.release;
    if outcome.is_accepted() {
        format!(
            "{} {} (id {})",
            Colored(Green, Icons::CHECK),
            Colored(Cyan, release.tag()),
            release.id()
        )
    } else {
        let reasons: Vec<_> = outcome.rejections.iter().map(|r| r.to_string()).collect();
        format!(
            "{} {} (id {}): {}",
            Colored(Red, Icons::CROSS),
            Colored(Cyan, release.tag()),
            release.id(),
            Colored(Yellow, reasons.join(", "))
        )
    }
}

fn summary_table(repo: &Repository, summary: &InspectSummary) -> String {
    let mut builder = Builder::new();
    builder.push_record(["Total".to_string(), summary.total.to_string()]);
    builder.push_record([
        "Accepted".to_string(),
        Colored(Green, summary.accepted).to_string(),
    ]);
    builder.push_record([
        "Rejected".to_string(),
        Colored(Red, summary.rejected()).to_string(),
    ]);
    builder.push_record(["  Draft".to_string(), summary.draft.to_string()]);
    builder.push_record(["  Pre-release".to_string(), summary.prerelease.to_string()]);
    builder.push_record(["  No asset".to_string(), summary.no_assets.to_string()]);
    builder.push_record(["  Bad tag name".to_string(), summary.bad_tag.to_string()]);

    builder
        .build()
        .with(Panel::header(format!(
            "Releases of {}",
            Colored(Blue, repo.full_name())
        )))
        .with(Style::rounded())
        .with(BorderCorrection {})
        .with(Width::wrap(term_width()).priority(PriorityMax::default()))
        .to_string()
}

/// Validates every release of `repo` and reports the outcomes.
///
/// With `json`, one JSON object per outcome followed by the summary is
/// written to `out`; otherwise outcomes and a summary table are logged.
pub fn report<W: Write>(
    repo: &Repository,
    policy: &ValidationPolicy,
    strict: bool,
    json: bool,
    mut out: W,
) -> CliResult<InspectSummary> {
    let outcomes = inspect(repo, policy)?;
    let summary = InspectSummary::from_outcomes(&outcomes);

    if json {
        for outcome in &outcomes {
            serde_json::to_writer(&mut out, outcome)?;
            writeln!(out).with_context(|| "writing inspection output".to_string())?;
        }
        serde_json::to_writer(&mut out, &summary)?;
        writeln!(out).with_context(|| "writing inspection output".to_string())?;
    } else {
        for outcome in &outcomes {
            info!("{}", outcome_line(outcome));
        }
        info!("\n{}", summary_table(repo, &summary));
    }

    if strict && summary.rejected() > 0 {
        return Err(CliError::Rejected {
            rejected: summary.rejected(),
            total: summary.total,
        });
    }

    Ok(summary)
}

pub fn inspect_file<W: Write>(
    path: &Path,
    policy: &ValidationPolicy,
    strict: bool,
    json: bool,
    out: W,
) -> CliResult<InspectSummary> {
    let repo = Repository::read_json_file(path)?;
    report(&repo, policy, strict, json, out)
}
