//! Auth command feature.
//!
//! Owns "bhhub auth login|signup|reset|logout|status".

use super::CommandContext;
use crate::auth::{AuthClient, SessionStore, SignUp};
use crate::cli::{prompt, AuthAction};
use crate::config::Config;
use crate::theme::Theme;
use anyhow::Context;
use chrono::Utc;

fn client(ctx: &CommandContext) -> anyhow::Result<AuthClient> {
    if ctx.demo {
        anyhow::bail!("Authentication is not available in --demo mode");
    }
    AuthClient::new(
        &ctx.config.backend.url,
        &ctx.config.backend.anon_key,
        ctx.config.timeout(),
    )
    .map_err(|e| {
        crate::cli::print_setup_hint();
        anyhow::anyhow!(e)
    })
}

fn store() -> anyhow::Result<SessionStore> {
    let dir = Config::data_dir().context("Failed to locate data directory")?;
    Ok(SessionStore::new(&dir))
}

fn password(given: Option<String>) -> anyhow::Result<String> {
    match given.or_else(|| prompt("Password")) {
        Some(p) if !p.is_empty() => Ok(p),
        _ => anyhow::bail!("A password is required"),
    }
}

pub(crate) fn handle_auth(ctx: &CommandContext, action: AuthAction) -> anyhow::Result<()> {
    match action {
        AuthAction::Login { email, password: given } => {
            let client = client(ctx)?;
            let session = client.sign_in(&email, &password(given)?)?;
            store()?.save(&session)?;
            println!("{} Signed in as {}.", Theme::success("OK"), email);
        }
        AuthAction::Signup { email, password: given } => {
            let client = client(ctx)?;
            match client.sign_up(&email, &password(given)?)? {
                SignUp::SignedIn(session) => {
                    store()?.save(&session)?;
                    println!("{} Account created; signed in as {}.", Theme::success("OK"), email);
                }
                SignUp::ConfirmationSent => {
                    println!(
                        "{} Check {} to confirm the account, then run {}.",
                        Theme::success("OK"),
                        email,
                        Theme::command("bhhub auth login")
                    );
                }
            }
        }
        AuthAction::Reset { email } => {
            client(ctx)?.reset_password(&email)?;
            println!("{} Password reset e-mail sent to {}.", Theme::success("OK"), email);
        }
        AuthAction::Logout => {
            let store = store()?;
            if let Some(session) = store.load() {
                // A dead token is still a sign-out locally.
                if let Err(e) = client(ctx).and_then(|c| c.sign_out(&session).map_err(Into::into)) {
                    tracing::warn!(error = %e, "remote sign-out failed");
                }
            }
            store.clear()?;
            println!("{} Signed out.", Theme::success("OK"));
        }
        AuthAction::Status => {
            let store = store()?;
            match store.load() {
                Some(s) if !s.is_expired(Utc::now()) => println!(
                    "Signed in as {}{}",
                    s.email.as_deref().unwrap_or("(unknown)"),
                    s.expires_at
                        .map(|at| format!(" until {}", at.format("%Y-%m-%d %H:%M UTC")))
                        .unwrap_or_default()
                ),
                Some(_) => println!("{}", Theme::warning("Session expired; using the anonymous key.")),
                None => println!("Not signed in; using the anonymous key."),
            }
        }
    }
    Ok(())
}
