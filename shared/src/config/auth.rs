//! Authentication configuration: JWT signing and OAuth providers

use serde::{Deserialize, Serialize};

use super::{lookup_any, parse_or, required, ConfigError};

/// Signing algorithms accepted for the shared-secret setup
pub const SUPPORTED_ALGORITHMS: [&str; 3] = ["HS256", "HS384", "HS512"];

/// Longest accepted access token lifetime (one week)
pub const MAX_ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 7 * 24 * 60;

/// Longest accepted refresh token lifetime
pub const MAX_REFRESH_TOKEN_EXPIRY_DAYS: i64 = 365;

/// JWT authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,

    /// Algorithm name for JWT signing (default: HS256)
    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    /// Access token lifetime in minutes
    pub access_token_expiry_minutes: i64,

    /// Refresh token lifetime in days
    pub refresh_token_expiry_days: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from("development-secret-please-change-in-production"),
            algorithm: default_algorithm(),
            access_token_expiry_minutes: 30,
            refresh_token_expiry_days: 7,
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry_minutes = minutes;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry_days = days;
        self
    }

    /// Load from `SECRET_KEY` (or `JWT_SECRET`), `ALGORITHM`,
    /// `ACCESS_TOKEN_EXPIRE_MINUTES` and `REFRESH_TOKEN_EXPIRE_DAYS`
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            secret: required(lookup, &["SECRET_KEY", "JWT_SECRET"])?,
            algorithm: lookup_any(lookup, &["ALGORITHM", "JWT_ALGORITHM"])
                .map(|a| a.to_uppercase())
                .unwrap_or_else(default_algorithm),
            access_token_expiry_minutes: parse_or(lookup, "ACCESS_TOKEN_EXPIRE_MINUTES", 30)?,
            refresh_token_expiry_days: parse_or(lookup, "REFRESH_TOKEN_EXPIRE_DAYS", 7)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values the token service cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !SUPPORTED_ALGORITHMS.contains(&self.algorithm.as_str()) {
            return Err(ConfigError::Invalid {
                name: "ALGORITHM".to_string(),
                reason: format!(
                    "unsupported algorithm '{}', expected one of {}",
                    self.algorithm,
                    SUPPORTED_ALGORITHMS.join(", ")
                ),
            });
        }
        check_lifetime(
            "ACCESS_TOKEN_EXPIRE_MINUTES",
            self.access_token_expiry_minutes,
            MAX_ACCESS_TOKEN_EXPIRY_MINUTES,
        )?;
        check_lifetime(
            "REFRESH_TOKEN_EXPIRE_DAYS",
            self.refresh_token_expiry_days,
            MAX_REFRESH_TOKEN_EXPIRY_DAYS,
        )
    }
}

/// Credentials for a single OAuth provider
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OAuthProviderConfig {
    /// OAuth client ID
    pub client_id: String,

    /// OAuth client secret
    pub client_secret: String,

    /// Callback URL registered with the provider
    pub redirect_uri: String,
}

/// OAuth provider configurations; a provider without credentials is disabled
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OAuthConfig {
    #[serde(default)]
    pub google: Option<OAuthProviderConfig>,

    #[serde(default)]
    pub github: Option<OAuthProviderConfig>,
}

impl OAuthConfig {
    /// Load `GOOGLE_*` and `GITHUB_*` credentials
    ///
    /// The redirect URI defaults to `{public_base_url}/auth/login/{provider}/callback`.
    pub fn from_lookup<F>(lookup: &F, public_base_url: &str) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            google: provider_from_lookup(lookup, "GOOGLE", "google", public_base_url)?,
            github: provider_from_lookup(lookup, "GITHUB", "github", public_base_url)?,
        })
    }
}

fn provider_from_lookup<F>(
    lookup: &F,
    prefix: &str,
    path_name: &str,
    public_base_url: &str,
) -> Result<Option<OAuthProviderConfig>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let id_var = format!("{}_CLIENT_ID", prefix);
    let secret_var = format!("{}_CLIENT_SECRET", prefix);
    let client_id = lookup_any(lookup, &[id_var.as_str()]);
    let client_secret = lookup_any(lookup, &[secret_var.as_str()]);

    match (client_id, client_secret) {
        (None, None) => Ok(None),
        (Some(client_id), Some(client_secret)) => {
            let redirect_uri = lookup_any(lookup, &[format!("{}_REDIRECT_URI", prefix).as_str()])
                .unwrap_or_else(|| {
                    format!(
                        "{}/auth/login/{}/callback",
                        public_base_url.trim_end_matches('/'),
                        path_name
                    )
                });
            Ok(Some(OAuthProviderConfig {
                client_id,
                client_secret,
                redirect_uri,
            }))
        }
        (Some(_), None) => Err(ConfigError::Missing { name: secret_var }),
        (None, Some(_)) => Err(ConfigError::Missing { name: id_var }),
    }
}

fn check_lifetime(name: &str, value: i64, max: i64) -> Result<(), ConfigError> {
    if (1..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            name: name.to_string(),
            reason: format!("must be between 1 and {}, got {}", max, value),
        })
    }
}

fn default_algorithm() -> String {
    String::from("HS256")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_config_default() {
        let config = JwtConfig::default();
        assert_eq!(config.access_token_expiry_minutes, 30);
        assert_eq!(config.refresh_token_expiry_days, 7);
        assert_eq!(config.algorithm, "HS256");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_jwt_config_builder() {
        let config = JwtConfig::new("my-secret")
            .with_access_expiry_minutes(15)
            .with_refresh_expiry_days(14);

        assert_eq!(config.secret, "my-secret");
        assert_eq!(config.access_token_expiry_minutes, 15);
        assert_eq!(config.refresh_token_expiry_days, 14);
    }

    #[test]
    fn test_asymmetric_algorithm_rejected() {
        let mut config = JwtConfig::new("secret");
        config.algorithm = "RS256".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { name, .. }) if name == "ALGORITHM"));
    }

    #[test]
    fn test_non_positive_lifetime_rejected() {
        let config = JwtConfig::new("secret").with_access_expiry_minutes(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_lifetime_rejected() {
        let config = JwtConfig::new("s").with_refresh_expiry_days(100_000_000);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { name, .. }) if name == "REFRESH_TOKEN_EXPIRE_DAYS"
        ));

        let config = JwtConfig::new("s").with_access_expiry_minutes(i64::MAX);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { name, .. }) if name == "ACCESS_TOKEN_EXPIRE_MINUTES"
        ));

        let config = JwtConfig::new("s")
            .with_access_expiry_minutes(MAX_ACCESS_TOKEN_EXPIRY_MINUTES)
            .with_refresh_expiry_days(MAX_REFRESH_TOKEN_EXPIRY_DAYS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_oauth_provider_redirect_default() {
        let lookup = |name: &str| match name {
            "GITHUB_CLIENT_ID" => Some("gh-id".to_string()),
            "GITHUB_CLIENT_SECRET" => Some("gh-secret".to_string()),
            _ => None,
        };
        let config = OAuthConfig::from_lookup(&lookup, "https://auth.example.com/").unwrap();

        assert!(config.google.is_none());
        let github = config.github.unwrap();
        assert_eq!(github.client_id, "gh-id");
        assert_eq!(
            github.redirect_uri,
            "https://auth.example.com/auth/login/github/callback"
        );
    }

    #[test]
    fn test_oauth_provider_half_configured_is_error() {
        let lookup = |name: &str| match name {
            "GOOGLE_CLIENT_ID" => Some("google-id".to_string()),
            _ => None,
        };
        let err = OAuthConfig::from_lookup(&lookup, "http://localhost:8080").unwrap_err();
        assert_eq!(
            err,
            ConfigError::Missing {
                name: "GOOGLE_CLIENT_SECRET".to_string()
            }
        );
    }
}
