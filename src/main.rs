//! git-land - submit approved Gerrit changes
//!
//! CLI binary; usable as `git land` when on `PATH`.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "git-land")]
#[command(about = "Submit approved Gerrit changes from a local git branch")]
#[command(version)]
struct Cli {
    /// Path to git repository (defaults to current directory)
    #[arg(short, long, global = true)]
    path: Option<PathBuf>,

    /// Log debug details to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit an approved change and sync the local branch
    Submit {
        /// Commit to submit (defaults to the branch's only pending commit)
        commit: Option<String>,

        /// Dry run - run every check but stop before pushing or submitting
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Git remote Gerrit is reached through
        #[arg(long, default_value = "origin")]
        remote: String,
    },

    /// Authentication management
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Test authentication against the Gerrit server
    Test {
        /// Git remote Gerrit is reached through
        #[arg(long, default_value = "origin")]
        remote: String,
    },
    /// Show authentication setup instructions
    Setup,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "git_land=debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let path = cli.path.unwrap_or_else(|| PathBuf::from("."));

    match cli.command {
        Commands::Submit {
            commit,
            dry_run,
            remote,
        } => {
            cli::run_submit(&path, commit.as_deref(), &remote, dry_run).await?;
        }
        Commands::Auth { action } => match action {
            AuthAction::Test { remote } => cli::run_auth_test(&path, &remote).await?,
            AuthAction::Setup => cli::run_auth_setup(),
        },
    }

    Ok(())
}
