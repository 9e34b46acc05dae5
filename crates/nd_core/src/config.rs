use crate::{Error, Result};
use std::fmt;

/// Startup configuration. Built once from the environment and passed
/// explicitly to every component that needs it; there is no ambient lookup
/// after construction.
#[derive(Clone)]
pub struct Config {
    /// Access credential for the GitHub contents API.
    pub github_token: String,
    /// Repository holding the JSON documents, as "owner/name".
    pub github_repo: String,
    /// Credential for the Gemini generateContent endpoint.
    pub gemini_api_key: String,
    /// Shared admin password for the management surface.
    pub admin_password: String,
    /// When false, the view counter is kept in memory only and never
    /// written back to the store.
    pub persist_views: bool,
    /// Address the web server binds to.
    pub bind_addr: String,
}

impl Config {
    /// Read configuration from the environment. Any missing credential is
    /// fatal: startup must halt rather than run partially configured.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            github_token: require("GITHUB_TOKEN")?,
            github_repo: require("GITHUB_REPO")?,
            gemini_api_key: require("GEMINI_API_KEY")?,
            admin_password: require("ADMIN_PASSWORD")?,
            persist_views: flag("PERSIST_VIEW_COUNT"),
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
        })
    }
}

fn require(key: &str) -> Result<String> {
    match std::env::var(key) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(Error::Config(format!("{} is not set", key))),
    }
}

fn flag(key: &str) -> bool {
    matches!(
        std::env::var(key).as_deref(),
        Ok("1") | Ok("true") | Ok("yes") | Ok("on")
    )
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("github_token", &"<redacted>")
            .field("github_repo", &self.github_repo)
            .field("gemini_api_key", &"<redacted>")
            .field("admin_password", &"<redacted>")
            .field("persist_views", &self.persist_views)
            .field("bind_addr", &self.bind_addr)
            .finish()
    }
}
