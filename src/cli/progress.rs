//! CLI progress callback with styled output and a merge-wait spinner

use crate::cli::style::{check, cross, spinner_style, Stylize};
use anstream::{eprintln, println};
use async_trait::async_trait;
use git_land::submit::{Phase, ProgressCallback, PushStatus};
use git_land::types::{ChangeStatus, Commit};
use indicatif::ProgressBar;
use std::sync::Mutex;
use std::time::Duration;

/// Spinner redraw interval
const SPINNER_TICK: Duration = Duration::from_millis(80);

/// CLI progress callback that prints to stdout
///
/// While waiting for the merge a spinner replaces per-poll output.
#[derive(Default)]
pub struct CliProgress {
    spinner: Mutex<Option<ProgressBar>>,
}

impl CliProgress {
    /// Remove the spinner, if one is running
    pub fn finish(&self) {
        if let Some(spinner) = self.spinner.lock().ok().and_then(|mut s| s.take()) {
            spinner.finish_and_clear();
        }
    }

    fn with_spinner(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.spinner.lock() {
            if let Some(spinner) = guard.as_ref() {
                f(spinner);
            }
        }
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_phase(&self, phase: Phase) {
        self.finish();

        match phase {
            Phase::WaitingForMerge => {
                let spinner = ProgressBar::new_spinner();
                spinner.set_style(spinner_style());
                spinner.set_message(phase.to_string());
                spinner.enable_steady_tick(SPINNER_TICK);
                if let Ok(mut slot) = self.spinner.lock() {
                    *slot = Some(spinner);
                }
            }
            Phase::Complete => println!("{} {}", check(), phase.to_string().success()),
            _ => println!("{}...", phase.to_string().emphasis()),
        }
    }

    async fn on_push(&self, commit: &Commit, status: PushStatus) {
        let hash = commit.short_hash();
        match &status {
            PushStatus::Started => println!("  Pushing {}...", hash.accent()),
            PushStatus::Success => println!("  {} Pushed {}", check(), hash.emphasis()),
            PushStatus::AlreadyUploaded | PushStatus::Skipped => println!(
                "  {} {} {}",
                "-".muted(),
                hash.accent(),
                status.to_string().muted()
            ),
            PushStatus::Failed(_) => eprintln!(
                "  {} Failed to push {}: {}",
                cross(),
                hash.accent().for_stderr(),
                status.to_string().error()
            ),
        }
    }

    async fn on_poll(&self, attempt: u32, delay: Duration, status: &ChangeStatus) {
        let message = format!("Waiting for merge (poll {attempt} after {delay:?}: {status})");
        self.with_spinner(|spinner| spinner.set_message(message));
    }

    async fn on_warning(&self, message: &str) {
        self.finish();
        eprintln!("{}", message.warn());
    }

    async fn on_message(&self, message: &str) {
        println!("  {}", message.muted());
    }
}
