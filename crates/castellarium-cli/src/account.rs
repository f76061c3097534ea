//! Session commands. Signing in pulls the user's saved lists, which replace
//! the local ones; signing out keeps the local lists as they are.

use clap::Subcommand;

use castellarium_store::SignInOutcome;

use crate::app::AppContext;

/// Sub-commands available under `account`.
#[derive(Debug, Subcommand)]
pub enum AccountCommands {
    /// Start a session and load the user's saved lists
    SignIn {
        /// User id issued by the identity provider
        user_id: String,
    },
    /// End the session; local lists are kept
    SignOut,
    /// Show the current session and sync mode
    Status,
}

/// # Errors
///
/// Returns an error if local storage cannot be written.
pub(crate) async fn run_account(
    ctx: &mut AppContext,
    command: AccountCommands,
) -> anyhow::Result<()> {
    match command {
        AccountCommands::SignIn { user_id } => {
            let user_id = user_id.trim();
            if user_id.is_empty() {
                anyhow::bail!("user id must not be blank");
            }
            let outcome = ctx.tracker.reconcile_on_sign_in(user_id).await?;
            report_sign_in(user_id, &outcome);
        }
        AccountCommands::SignOut => {
            let previous = ctx.tracker.session_user().map(str::to_owned);
            ctx.tracker.reconcile_on_sign_out()?;
            match previous {
                Some(user_id) => println!("signed out {user_id}; lists are kept on this device"),
                None => println!("not signed in"),
            }
        }
        AccountCommands::Status => {
            match ctx.tracker.session_user() {
                Some(user_id) => println!("signed in as {user_id}"),
                None => println!("not signed in"),
            }
            if ctx.tracker.has_remote() {
                println!("sync: remote store configured");
            } else {
                println!("sync: local only (set CASTELLARIUM_REMOTE_URL to sync)");
            }
            let ids = ctx.tracker.ids();
            println!(
                "lists: {} visited, {} on the wishlist",
                ids.visited().len(),
                ids.wishlisted().len()
            );
        }
    }
    Ok(())
}

fn report_sign_in(user_id: &str, outcome: &SignInOutcome) {
    match outcome {
        SignInOutcome::Replaced {
            visited: 0,
            wishlisted: 0,
        } => println!("signed in as {user_id}; no saved lists yet, starting empty"),
        SignInOutcome::Replaced {
            visited,
            wishlisted,
        } => println!(
            "signed in as {user_id}; loaded {visited} visited and {wishlisted} wishlisted castles"
        ),
        SignInOutcome::RemoteUnavailable => {
            println!("signed in as {user_id}; no remote store configured, lists stay local");
        }
        SignInOutcome::FetchFailed { reason } => {
            println!("signed in as {user_id}");
            eprintln!("warning: could not load saved lists: {reason}");
        }
    }
}
