//! Auth command - test and explain Gerrit authentication

use anstream::println;
use git_land::auth::get_gerrit_auth;
use git_land::error::{Error, Result};
use git_land::repo::GitRepository;
use git_land::review::{parse_gerrit_config, GerritService};
use std::env;
use std::path::Path;

use crate::cli::style::{check, Stylize};

/// Run the auth test command
pub async fn run_auth_test(path: &Path, remote: &str) -> Result<()> {
    let repo = GitRepository::open(path, remote).await?;
    let remote_url = repo.remote_url().await?;
    let host_override = env::var("GERRIT_HOST").ok();
    let config = parse_gerrit_config(&remote_url, host_override.as_deref())?;
    let host = config
        .host()
        .ok_or_else(|| Error::Parse(format!("no host in {}", config.url)))?;

    println!("Testing Gerrit authentication for {}...", host.accent());
    let auth = get_gerrit_auth(&host).await?;
    let service = GerritService::new(config, Some(auth.credentials));
    let account = service.current_account().await?;

    println!("{} Authenticated as: {}", check(), account.emphasis());
    println!("Credential source: {:?}", auth.source);
    Ok(())
}

/// Run the auth setup command (show instructions)
pub fn run_auth_setup() {
    println!("{}", "Gerrit Authentication Setup".emphasis());
    println!("===========================");
    println!();
    println!("Option 1: Cookie file (recommended for googlesource.com)");
    println!("  Generate a password at https://<gerrit-host>/new-password");
    println!("  and follow the instructions to append it to ~/.gitcookies");
    println!("  (or the file named by git config http.cookiefile)");
    println!();
    println!("Option 2: .netrc");
    println!("  machine <gerrit-host> login <user> password <http-password>");
    println!();
    println!("Option 3: Environment variables");
    println!("  Set GERRIT_USER and GERRIT_PASSWORD");
    println!();
    println!("To use a Gerrit server other than the one serving your remote:");
    println!("  Set GERRIT_HOST to its hostname");
}
