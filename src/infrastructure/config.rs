use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    #[serde(default)]
    pub server: ServerSettings,
    pub api: ApiSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub cdn: CdnSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    #[serde(default = "default_api_path")]
    pub path: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ApiSettings {
    /// Fully resolved readings endpoint
    pub fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = self.path.trim_start_matches('/');
        if path.is_empty() {
            base.to_string()
        } else {
            format!("{}/{}", base, path)
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Cognito,
    Static,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AuthSettings {
    #[serde(default)]
    pub provider: ProviderKind,
    pub region: Option<String>,
    pub user_pool_id: Option<String>,
    pub client_id: Option<String>,
    pub identity_pool_id: Option<String>,
    pub static_token: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CdnSettings {
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSettings {
    #[serde(default = "default_window_days")]
    pub window_days: u32,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
        }
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_api_path() -> String {
    "/graphql".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_window_days() -> u32 {
    1
}

/// Load `config/dashboard.*` (optional) overlaid with `AURORA__*` environment variables
pub fn load_dashboard_config() -> Result<DashboardConfig, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(
            config::Environment::with_prefix("AURORA")
                .prefix_separator("__")
                .separator("__"),
        );

    from_builder(builder)
}

fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<DashboardConfig, ConfigError> {
    let config: DashboardConfig = builder.build()?.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

impl DashboardConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Message("api.base_url is not configured".to_string()));
        }

        match self.auth.provider {
            ProviderKind::Cognito => {
                for (key, value) in [
                    ("auth.region", &self.auth.region),
                    ("auth.client_id", &self.auth.client_id),
                ] {
                    if value.as_deref().is_none_or(str::is_empty) {
                        return Err(ConfigError::Message(format!(
                            "{} is required for the cognito provider",
                            key
                        )));
                    }
                }
            }
            ProviderKind::Static => {
                if self.auth.static_token.as_deref().is_none_or(str::is_empty) {
                    return Err(ConfigError::Message(
                        "auth.static_token is required for the static provider".to_string(),
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    fn parse(toml: &str) -> Result<DashboardConfig, ConfigError> {
        from_builder(config::Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    #[test]
    fn test_full_config() {
        let config = parse(
            r#"
            [server]
            bind_addr = "127.0.0.1:3000"

            [api]
            base_url = "https://d111111abcdef8.cloudfront.net/"
            path = "/example"

            [auth]
            provider = "cognito"
            region = "eu-west-2"
            user_pool_id = "eu-west-2_abc"
            client_id = "client"
            identity_pool_id = "eu-west-2:pool"

            [cdn]
            base_url = "https://d111111abcdef8.cloudfront.net"

            [dashboard]
            window_days = 7
            "#,
        )
        .unwrap();

        assert_eq!(config.server.bind_addr, "127.0.0.1:3000");
        assert_eq!(config.api.endpoint(), "https://d111111abcdef8.cloudfront.net/example");
        assert_eq!(config.auth.provider, ProviderKind::Cognito);
        assert_eq!(config.auth.identity_pool_id.as_deref(), Some("eu-west-2:pool"));
        assert_eq!(config.dashboard.window_days, 7);
    }

    #[test]
    fn test_defaults() {
        let config = parse(
            r#"
            [api]
            base_url = "https://api.example.com"

            [auth]
            provider = "static"
            static_token = "dev-token"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.api.endpoint(), "https://api.example.com/graphql");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.dashboard.window_days, 1);
        assert!(config.cdn.base_url.is_none());
    }

    #[test]
    fn test_missing_api_url_is_rejected() {
        let error = parse(
            r#"
            [api]
            base_url = ""
            "#,
        )
        .unwrap_err();
        assert!(error.to_string().contains("api.base_url"));
    }

    #[test]
    fn test_cognito_requires_client_id() {
        let error = parse(
            r#"
            [api]
            base_url = "https://api.example.com"

            [auth]
            region = "eu-west-2"
            "#,
        )
        .unwrap_err();
        assert!(error.to_string().contains("auth.client_id"));
    }
}
