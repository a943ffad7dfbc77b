use crate::error::{Result, RouteError};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// StorageConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    File,
    Redb,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StorageBackend::File => "file",
            StorageBackend::Redb => "redb",
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
}

// ---------------------------------------------------------------------------
// CompanionConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanionConfig {
    #[serde(default = "default_companion_base_url")]
    pub base_url: String,
    #[serde(default = "default_companion_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_companion_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_companion_model() -> String {
    "claude-sonnet-4-5".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_api_key_env() -> String {
    "ANTHROPIC_API_KEY".to_string()
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            base_url: default_companion_base_url(),
            model: default_companion_model(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            api_key_env: default_api_key_env(),
        }
    }
}

// ---------------------------------------------------------------------------
// BillingConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanConfig {
    pub id: String,
    pub name: String,
    pub price_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingConfig {
    #[serde(default = "default_stripe_base")]
    pub stripe_base: String,
    #[serde(default = "default_secret_key_env")]
    pub secret_key_env: String,
    #[serde(default = "default_success_url")]
    pub success_url: String,
    #[serde(default = "default_cancel_url")]
    pub cancel_url: String,
    #[serde(default = "default_plans")]
    pub plans: Vec<PlanConfig>,
}

fn default_stripe_base() -> String {
    "https://api.stripe.com".to_string()
}

fn default_secret_key_env() -> String {
    "STRIPE_SECRET_KEY".to_string()
}

fn default_success_url() -> String {
    "http://localhost:3141/billing?status=success".to_string()
}

fn default_cancel_url() -> String {
    "http://localhost:3141/billing?status=cancelled".to_string()
}

fn default_plans() -> Vec<PlanConfig> {
    vec![
        PlanConfig {
            id: "pro".to_string(),
            name: "Pro".to_string(),
            price_id: "price_pro_monthly".to_string(),
        },
        PlanConfig {
            id: "founder".to_string(),
            name: "Founder".to_string(),
            price_id: "price_founder_monthly".to_string(),
        },
    ]
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            stripe_base: default_stripe_base(),
            secret_key_env: default_secret_key_env(),
            success_url: default_success_url(),
            cancel_url: default_cancel_url(),
            plans: default_plans(),
        }
    }
}

impl BillingConfig {
    pub fn plan(&self, id: &str) -> Option<&PlanConfig> {
        self.plans.iter().find(|p| p.id == id)
    }
}

// ---------------------------------------------------------------------------
// AccessConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessConfig {
    #[serde(default = "default_invite_codes")]
    pub invite_codes: Vec<String>,
    #[serde(default = "default_founder_codes")]
    pub founder_codes: Vec<String>,
}

fn default_invite_codes() -> Vec<String> {
    ["FOUNDERSROUTE", "EARLYACCESS", "BUILDINPUBLIC"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_founder_codes() -> Vec<String> {
    ["FOUNDER100", "LIFEPATH-FOUNDER"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            invite_codes: default_invite_codes(),
            founder_codes: default_founder_codes(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    pub name: String,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            name: "founders-route".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub workspace: WorkspaceConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub companion: CompanionConfig,
    #[serde(default)]
    pub billing: BillingConfig,
    #[serde(default)]
    pub access: AccessConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            workspace: WorkspaceConfig::default(),
            storage: StorageConfig::default(),
            companion: CompanionConfig::default(),
            billing: BillingConfig::default(),
            access: AccessConfig::default(),
        }
    }
}

impl Config {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: default_version(),
            workspace: WorkspaceConfig { name: name.into() },
            ..Default::default()
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let data = crate::io::read_if_exists(&paths::config_path(root))?
            .ok_or(RouteError::NotInitialized)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        crate::migrations::migrate_config(cfg)
    }

    /// Like [`Config::load`], but an uninitialized root yields defaults.
    pub fn load_or_default(root: &Path) -> Result<Self> {
        match Self::load(root) {
            Err(RouteError::NotInitialized) => Ok(Self::default()),
            other => other,
        }
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.companion.model.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "companion.model is empty".to_string(),
            });
        }
        if self.companion.timeout_secs == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "companion.timeout_secs must be greater than zero".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for plan in &self.billing.plans {
            if !seen.insert(plan.id.as_str()) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("duplicate plan id '{}' in billing.plans", plan.id),
                });
            }
            if plan.price_id.trim().is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("plan '{}' has no price_id", plan.id),
                });
            }
        }

        if self.access.invite_codes.is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "access.invite_codes is empty: registration cannot be unlocked"
                    .to_string(),
            });
        }
        if self.access.founder_codes.is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "access.founder_codes is empty".to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
