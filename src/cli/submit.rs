//! Submit command - submit one approved change

use crate::cli::progress::CliProgress;
use crate::cli::style::{arrow, check, hyperlink_url, Stream, Stylize};
use anstream::println;
use git_land::error::Result;
use git_land::repo::GitRepository;
use git_land::review::{create_review_service, parse_gerrit_config};
use git_land::submit::{submit_change, ReconcileOutcome, SubmitOptions, SubmitOutcome};
use std::env;
use std::path::Path;

/// Run the submit command
pub async fn run_submit(
    path: &Path,
    commit: Option<&str>,
    remote: &str,
    dry_run: bool,
) -> Result<()> {
    let repo = GitRepository::open(path, remote).await?;

    // Detect Gerrit from the remote URL
    let remote_url = repo.remote_url().await?;
    let host_override = env::var("GERRIT_HOST").ok();
    let config = parse_gerrit_config(&remote_url, host_override.as_deref())?;

    let review = create_review_service(&config).await?;

    let options = SubmitOptions {
        dry_run,
        ..SubmitOptions::default()
    };
    let progress = CliProgress::default();
    let result = submit_change(&repo, review.as_ref(), commit, &options, &progress).await;
    progress.finish();
    let result = result?;

    let number = format!("#{}", result.change.number);
    let url = config.change_url(result.change.number);

    println!();
    match &result.outcome {
        SubmitOutcome::StoppedBeforeSubmit => {
            println!(
                "{} Would submit change {} ({})",
                arrow(),
                number.accent(),
                result.commit.subject
            );
            if !result.change.is_current_revision(&result.commit.hash) {
                println!(
                    "  {}",
                    format!("would first push {}", result.branch.push_spec(&result.commit)).muted()
                );
            }
        }
        SubmitOutcome::Merged { reconcile } => {
            println!(
                "{} Submitted change {} ({})",
                check(),
                number.accent(),
                result.commit.subject
            );
            if let ReconcileOutcome::Synced { revision } = reconcile {
                let short = &revision[..7.min(revision.len())];
                println!(
                    "  {} is now at {}",
                    result.branch.name.accent(),
                    short.accent()
                );
            }
        }
    }
    println!("  {}", hyperlink_url(Stream::Stdout, &url));

    Ok(())
}
