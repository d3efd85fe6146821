//! Persisted login state and cart.

pub mod storage;

use std::future::Future;

use anyhow::{Context, Result};
use sylvan_http::HttpSession;

/// Load the saved session or fail with a hint to log in.
pub fn require() -> Result<HttpSession> {
    storage::load_session()
        .context("Failed to load session")?
        .context("No active session. Run 'sylvan auth login' first.")
}

/// Save the session again after a command that may have refreshed tokens.
pub async fn persist(session: &HttpSession) -> Result<()> {
    match session.export().await {
        Some(exported) => storage::save_session(session.storefront().api(), &exported),
        None => storage::clear_session(),
    }
}

/// Run `command` against the session and save the session afterwards, even
/// when the command fails. A 401 inside the command may have rotated the
/// tokens before the retried request failed.
///
/// The command's error takes precedence over a failure to save.
pub async fn persisting<T>(
    session: &HttpSession,
    command: impl Future<Output = Result<T>>,
) -> Result<T> {
    let result = command.await;
    let saved = persist(session).await.context("Failed to save session");
    let value = result?;
    saved?;
    Ok(value)
}
