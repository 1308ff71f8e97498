//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CTP_PROJECT_KEY` - commercetools project key
//! - `CTP_CLIENT_ID` - API client ID
//! - `CTP_CLIENT_SECRET` - API client secret
//!
//! ## Optional
//! - `CTP_API_URL` - API host (default: europe-west1 GCP region)
//! - `CTP_AUTH_URL` - OAuth host (default: europe-west1 GCP region)
//! - `CTP_SCOPES` - Token scopes (default: `manage_project:{project key}`)

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "https://api.europe-west1.gcp.commercetools.com";
const DEFAULT_AUTH_URL: &str = "https://auth.europe-west1.gcp.commercetools.com";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// commercetools API client configuration.
///
/// Implements `Debug` manually to redact the client secret.
#[derive(Clone)]
pub struct CommercetoolsConfig {
    /// Project key, part of every API path
    pub project_key: String,
    /// API client ID
    pub client_id: String,
    /// API client secret
    pub client_secret: SecretString,
    /// API host
    pub api_url: Url,
    /// OAuth host
    pub auth_url: Url,
    /// Scopes requested for the access token
    pub scopes: String,
}

impl std::fmt::Debug for CommercetoolsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommercetoolsConfig")
            .field("project_key", &self.project_key)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("api_url", &self.api_url.as_str())
            .field("auth_url", &self.auth_url.as_str())
            .field("scopes", &self.scopes)
            .finish()
    }
}

impl CommercetoolsConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, URLs fail
    /// to parse, or the client secret looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let project_key = get_required_env("CTP_PROJECT_KEY")?;
        let client_id = get_required_env("CTP_CLIENT_ID")?;
        let client_secret = get_validated_secret("CTP_CLIENT_SECRET")?;
        let api_url = get_url_or_default("CTP_API_URL", DEFAULT_API_URL)?;
        let auth_url = get_url_or_default("CTP_AUTH_URL", DEFAULT_AUTH_URL)?;
        let scopes =
            get_env_or_default("CTP_SCOPES", &format!("manage_project:{project_key}"));

        Ok(Self {
            project_key,
            client_id,
            client_secret,
            api_url,
            auth_url,
            scopes,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get an environment variable as a URL, falling back to a default.
fn get_url_or_default(key: &str, default: &str) -> Result<Url, ConfigError> {
    let value = get_env_or_default(key, default);
    Url::parse(&value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Validate that a secret is not an obvious placeholder.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }
    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
