use route_core::config::Config;
use route_core::{Store, Workspace};
use std::path::PathBuf;
use std::sync::Arc;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
    pub config: Arc<Config>,
    pub store: Arc<Store>,
    pub http: reqwest::Client,
    /// Completion API key, read once from `companion.api_key_env`.
    pub companion_key: Option<String>,
    /// Payment gateway secret, read once from `billing.secret_key_env`.
    pub billing_secret: Option<String>,
}

fn env_secret(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl AppState {
    pub fn new(root: PathBuf) -> route_core::Result<Self> {
        let ws = Workspace::open(&root)?;
        let companion_key = env_secret(&ws.config.companion.api_key_env);
        let billing_secret = env_secret(&ws.config.billing.secret_key_env);
        if companion_key.is_none() {
            tracing::info!(var = %ws.config.companion.api_key_env, "companion key not set; /api/chat will fail");
        }
        Ok(Self {
            root,
            config: Arc::new(ws.config),
            store: Arc::new(ws.store),
            http: reqwest::Client::new(),
            companion_key,
            billing_secret,
        })
    }

    /// State over an explicit store and config, with no secrets.
    pub fn from_parts(root: PathBuf, config: Config, store: Store) -> Self {
        Self {
            root,
            config: Arc::new(config),
            store: Arc::new(store),
            http: reqwest::Client::new(),
            companion_key: None,
            billing_secret: None,
        }
    }

    pub fn with_companion_key(mut self, key: impl Into<String>) -> Self {
        self.companion_key = Some(key.into());
        self
    }

    pub fn with_billing_secret(mut self, secret: impl Into<String>) -> Self {
        self.billing_secret = Some(secret.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_opens_workspace_without_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let state = AppState::new(dir.path().to_path_buf()).unwrap();
        assert_eq!(state.root, dir.path());
        assert_eq!(state.store.backend_name(), "file");
    }

    #[test]
    fn parts_carry_no_secrets() {
        let state = AppState::from_parts(PathBuf::from("/tmp/route"), Config::default(), Store::in_memory())
            .with_billing_secret("sk_test");
        assert!(state.companion_key.is_none());
        assert_eq!(state.billing_secret.as_deref(), Some("sk_test"));
    }
}
