// crates/cli/src/credentials.rs
//! Token resolution for the CLI.
//!
//! Precedence: `--token` flag, then `JOBWATCH_TOKEN`, then the token file
//! under the user config directory. Whatever wins is read once here and
//! passed into the client as an explicit credential.

use std::path::{Path, PathBuf};

use jobwatch_client::Credentials;

const TOKEN_ENV: &str = "JOBWATCH_TOKEN";

/// Resolve credentials from flag, environment, or token file.
pub fn resolve(flag: Option<String>) -> Credentials {
    if let Some(token) = flag {
        return Credentials::bearer(token);
    }

    if let Ok(token) = std::env::var(TOKEN_ENV) {
        if !token.trim().is_empty() {
            return Credentials::bearer(token.trim().to_string());
        }
    }

    if let Some(path) = token_file_path() {
        if let Some(token) = read_token_file(&path) {
            tracing::debug!(path = %path.display(), "using token file");
            return Credentials::bearer(token);
        }
    }

    Credentials::anonymous()
}

/// `~/.config/jobwatch/token` (platform equivalent).
fn token_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("jobwatch").join("token"))
}

fn read_token_file(path: &Path) -> Option<String> {
    let raw = std::fs::read_to_string(path).ok()?;
    let token = raw.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
