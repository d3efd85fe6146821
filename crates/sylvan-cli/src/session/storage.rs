//! Files under the platform data directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use sylvan_core::{AccessToken, ApiUrl, AuthSession, Cart, Customer, RefreshToken};
use sylvan_http::{HttpSession, HttpStorefront};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Session file contents.
#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    api: String,
    customer: Customer,
    access_token: String,
    refresh_token: Option<String>,
}

fn data_dir() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "sylvan").context("Could not determine data directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.to_path_buf())
}

fn session_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("session.json"))
}

fn cart_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("cart.json"))
}

/// Save a session to disk, readable by the owner only.
pub fn save_session(api: &ApiUrl, session: &AuthSession) -> Result<()> {
    let stored = StoredSession {
        api: api.to_string(),
        customer: session.customer.clone(),
        access_token: session.access_token.as_str().to_string(),
        refresh_token: session
            .refresh_token
            .as_ref()
            .map(|t| t.as_str().to_string()),
    };

    let path = session_path()?;
    let json = serde_json::to_string_pretty(&stored)?;
    fs::write(&path, &json).context("Failed to write session file")?;

    #[cfg(unix)]
    {
        let mut perms = fs::metadata(&path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(&path, perms)?;
    }

    debug!(path = %path.display(), "session saved");
    Ok(())
}

/// Load the saved session, bound to the backend it was created against.
pub fn load_session() -> Result<Option<HttpSession>> {
    let path = session_path()?;
    if !path.exists() {
        return Ok(None);
    }

    let json = fs::read_to_string(&path).context("Failed to read session file")?;
    let stored: StoredSession = serde_json::from_str(&json).context("Invalid session file")?;

    let api = ApiUrl::new(&stored.api).context("Invalid API URL in session")?;
    let storefront = HttpStorefront::new(api).context("Failed to create HTTP client")?;

    Ok(Some(storefront.resume(AuthSession {
        customer: stored.customer,
        access_token: AccessToken::new(stored.access_token),
        refresh_token: stored.refresh_token.map(RefreshToken::new),
    })))
}

/// Remove the session file.
pub fn clear_session() -> Result<()> {
    remove_if_exists(&session_path()?).context("Failed to remove session file")
}

/// Load the cart, empty if none was saved.
pub fn load_cart() -> Result<Cart> {
    let path = cart_path()?;
    if !path.exists() {
        return Ok(Cart::new());
    }

    let json = fs::read_to_string(&path).context("Failed to read cart file")?;
    serde_json::from_str(&json).context("Invalid cart file")
}

pub fn save_cart(cart: &Cart) -> Result<()> {
    let path = cart_path()?;
    if cart.is_empty() {
        return remove_if_exists(&path).context("Failed to remove cart file");
    }

    let json = serde_json::to_string_pretty(cart)?;
    fs::write(&path, json).context("Failed to write cart file")
}

fn remove_if_exists(path: &Path) -> std::io::Result<()> {
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}
