use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::env;

use crate::reports::{DateBasis, ScopeMatch};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub reports: ReportConfig,
    #[serde(default)]
    pub geo: GeoConfig,
    #[serde(default)]
    pub bootstrap_admin: Option<BootstrapAdminConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expires_in: i64,  // seconds
    pub refresh_token_expires_in: i64, // seconds
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// IANA timezone used for "today", week and month boundaries.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub scope_match: ScopeMatch,
    #[serde(default)]
    pub period_date_basis: DateBasis,
    /// 0 disables the periodic store refresh.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoConfig {
    #[serde(default = "default_geo_base_url")]
    pub base_url: String,
    #[serde(default = "default_geo_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapAdminConfig {
    pub email: String,
    pub password: String,
    #[serde(default = "default_admin_name")]
    pub full_name: String,
}

fn default_timezone() -> String {
    "Asia/Jakarta".to_string()
}

fn default_refresh_interval() -> u64 {
    300
}

fn default_geo_base_url() -> String {
    "https://www.emsifa.com/api-wilayah-indonesia/api".to_string()
}

fn default_geo_timeout() -> u64 {
    10
}

fn default_admin_name() -> String {
    "Administrator".to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            scope_match: ScopeMatch::default(),
            period_date_basis: DateBasis::default(),
            refresh_interval_secs: default_refresh_interval(),
        }
    }
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            base_url: default_geo_base_url(),
            timeout_secs: default_geo_timeout(),
        }
    }
}

impl ReportConfig {
    pub fn tz(&self) -> Result<Tz, String> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| format!("Invalid report timezone {}: {e}", self.timezone))
    }
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // No config file: rely on environment variables and defaults
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => toml::from_str(&config_str)
                .map_err(|e| format!("Failed to parse config file: {e}"))?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                let database_url = get_env("DATABASE_URL")
                    .ok_or("DATABASE_URL is not set and config.toml was not found")?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    jwt: JwtConfig {
                        secret: get_env("JWT_SECRET")
                            .unwrap_or_else(|| "change-me-in-production".to_string()),
                        access_token_expires_in: get_env_parse("JWT_ACCESS_EXPIRES_IN", 7200i64),
                        refresh_token_expires_in: get_env_parse(
                            "JWT_REFRESH_EXPIRES_IN",
                            2_592_000i64,
                        ),
                    },
                    reports: ReportConfig::default(),
                    geo: GeoConfig::default(),
                    bootstrap_admin: None,
                }
            }
            Err(e) => {
                return Err(format!("Cannot read config file {config_path}: {e}").into());
            }
        };

        // Environment always wins over the file
        if let Ok(v) = env::var("SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            config.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            config.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            config.database.max_connections = mc;
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            config.jwt.secret = v;
        }
        if let Ok(v) = env::var("JWT_ACCESS_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            config.jwt.access_token_expires_in = n;
        }
        if let Ok(v) = env::var("JWT_REFRESH_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            config.jwt.refresh_token_expires_in = n;
        }

        // Reports
        if let Ok(v) = env::var("REPORT_TIMEZONE") {
            config.reports.timezone = v;
        }
        if let Ok(v) = env::var("REPORT_SCOPE_MATCH") {
            config.reports.scope_match = v.parse()?;
        }
        if let Ok(v) = env::var("REPORT_PERIOD_DATE_BASIS") {
            config.reports.period_date_basis = v.parse()?;
        }
        if let Ok(v) = env::var("STORE_REFRESH_INTERVAL_SECS")
            && let Ok(n) = v.parse()
        {
            config.reports.refresh_interval_secs = n;
        }

        // Geography lookup
        if let Ok(v) = env::var("GEO_BASE_URL") {
            config.geo.base_url = v;
        }
        if let Ok(v) = env::var("GEO_TIMEOUT_SECS")
            && let Ok(n) = v.parse()
        {
            config.geo.timeout_secs = n;
        }

        // Bootstrap admin only when both credentials are present
        if let (Ok(email), Ok(password)) = (
            env::var("BOOTSTRAP_ADMIN_EMAIL"),
            env::var("BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            config.bootstrap_admin = Some(BootstrapAdminConfig {
                email,
                password,
                full_name: env::var("BOOTSTRAP_ADMIN_NAME").unwrap_or_else(|_| default_admin_name()),
            });
        }

        config.reports.tz()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_config_defaults() {
        let cfg = ReportConfig::default();
        assert_eq!(cfg.tz().unwrap(), chrono_tz::Asia::Jakarta);
        assert_eq!(cfg.scope_match, ScopeMatch::UserId);
        assert_eq!(cfg.period_date_basis, DateBasis::EntryDate);
    }

    #[test]
    fn test_invalid_timezone_rejected() {
        let cfg = ReportConfig {
            timezone: "Mars/Olympus".to_string(),
            ..ReportConfig::default()
        };
        assert!(cfg.tz().is_err());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let cfg: Config = toml::from_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = 9000

            [database]
            url = "sqlite::memory:"
            max_connections = 1

            [jwt]
            secret = "s"
            access_token_expires_in = 60
            refresh_token_expires_in = 120

            [reports]
            scope_match = "full_name"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.reports.scope_match, ScopeMatch::FullName);
        assert_eq!(cfg.reports.timezone, "Asia/Jakarta");
        assert_eq!(cfg.geo.timeout_secs, 10);
        assert!(cfg.bootstrap_admin.is_none());
    }
}
