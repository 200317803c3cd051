//! Runtime configuration.
//!
//! Settings come from three layers, highest precedence first:
//!
//! 1. command-line flags ([`Cli`])
//! 2. an optional YAML file passed with `--config`
//! 3. built-in defaults
//!
//! The result is split in two: [`DashboardConfig`], the immutable set of
//! values that drive one render, and the source settings (endpoint and
//! timeout) used once to build the HTTP client.
//!
//! # File format
//!
//! ```yaml
//! query: "(harcèlement OR agression sexuelle) (théâtre OR cinéma) France"
//! days: 14
//! gdelt: true
//! title_filter: ""
//! domain_filter: "lemonde.fr"
//! timeout_secs: 30
//! ```

use crate::cli::Cli;
use crate::error::ConfigError;
use crate::filter::ResultFilter;
use crate::sources::gdelt::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

/// Query used when neither the CLI nor the config file provides one.
pub const DEFAULT_QUERY: &str = "(violences sexuelles OR violences sexistes OR agression sexuelle OR harcèlement) (cinéma OR théâtre OR musique OR art OR artiste OR exposition OR festival) France";
pub const DEFAULT_WINDOW_DAYS: u32 = 30;
pub const MIN_WINDOW_DAYS: u32 = 1;
pub const MAX_WINDOW_DAYS: u32 = 365;

/// Contents of the optional YAML config file. Every key is optional.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub query: Option<String>,
    pub days: Option<u32>,
    pub gdelt: Option<bool>,
    pub title_filter: Option<String>,
    pub domain_filter: Option<String>,
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Parse a YAML document.
    pub fn from_yaml(path: &str, contents: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    /// Read and parse the file at `path`.
    #[instrument(level = "info")]
    pub async fn load(path: &str) -> Result<Self, ConfigError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_string(),
                source,
            })?;
        let config = Self::from_yaml(path, &contents)?;
        debug!(?config, "Loaded config file");
        Ok(config)
    }
}

/// The values that drive one render of the dashboard.
///
/// Never mutated in place: changing a setting means building a new value
/// with one of the `with_*` methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub query: String,
    pub window_days: u32,
    pub use_gdelt: bool,
    pub title_filter: String,
    pub domain_filter: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            query: DEFAULT_QUERY.to_string(),
            window_days: DEFAULT_WINDOW_DAYS,
            use_gdelt: true,
            title_filter: String::new(),
            domain_filter: String::new(),
        }
    }
}

impl DashboardConfig {
    /// Build a config, rejecting a window outside `1..=365` days.
    pub fn new(
        query: impl Into<String>,
        window_days: u32,
        use_gdelt: bool,
        title_filter: impl Into<String>,
        domain_filter: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            query: query.into(),
            window_days: validate_window(window_days)?,
            use_gdelt,
            title_filter: title_filter.into(),
            domain_filter: domain_filter.into(),
        })
    }

    pub fn with_query(self, query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..self
        }
    }

    pub fn with_window_days(self, window_days: u32) -> Result<Self, ConfigError> {
        Ok(Self {
            window_days: validate_window(window_days)?,
            ..self
        })
    }

    pub fn with_gdelt(self, use_gdelt: bool) -> Self {
        Self { use_gdelt, ..self }
    }

    pub fn with_title_filter(self, title_filter: impl Into<String>) -> Self {
        Self {
            title_filter: title_filter.into(),
            ..self
        }
    }

    pub fn with_domain_filter(self, domain_filter: impl Into<String>) -> Self {
        Self {
            domain_filter: domain_filter.into(),
            ..self
        }
    }

    /// The filters this config asks for.
    pub fn filter(&self) -> ResultFilter {
        ResultFilter::new(self.title_filter.clone(), self.domain_filter.clone())
    }
}

fn validate_window(window_days: u32) -> Result<u32, ConfigError> {
    if (MIN_WINDOW_DAYS..=MAX_WINDOW_DAYS).contains(&window_days) {
        Ok(window_days)
    } else {
        Err(ConfigError::WindowOutOfRange(window_days))
    }
}

/// Everything resolved from the CLI, the config file and the defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub dashboard: DashboardConfig,
    pub endpoint: String,
    pub timeout: Duration,
    pub json_output_dir: Option<String>,
    pub interactive: bool,
}

impl Settings {
    /// Merge CLI flags over file values over defaults.
    pub fn resolve(cli: &Cli, file: FileConfig) -> Result<Self, ConfigError> {
        let defaults = DashboardConfig::default();

        let dashboard = DashboardConfig::new(
            cli.query.clone().or(file.query).unwrap_or(defaults.query),
            cli.days.or(file.days).unwrap_or(defaults.window_days),
            !cli.no_gdelt && file.gdelt.unwrap_or(defaults.use_gdelt),
            cli.title_filter
                .clone()
                .or(file.title_filter)
                .unwrap_or(defaults.title_filter),
            cli.domain_filter
                .clone()
                .or(file.domain_filter)
                .unwrap_or(defaults.domain_filter),
        )?;

        let timeout = cli
            .timeout_secs
            .or(file.timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        Ok(Self {
            dashboard,
            endpoint: cli
                .endpoint
                .clone()
                .or(file.endpoint)
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            timeout,
            json_output_dir: cli.json_output_dir.clone(),
            interactive: cli.interactive,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults_without_flags_or_file() {
        let cli = Cli::parse_from(["press_watch"]);
        let settings = Settings::resolve(&cli, FileConfig::default()).unwrap();

        assert_eq!(settings.dashboard, DashboardConfig::default());
        assert_eq!(settings.dashboard.window_days, 30);
        assert!(settings.dashboard.use_gdelt);
        assert_eq!(settings.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(settings.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = FileConfig::from_yaml(
            "config.yaml",
            "query: from file\ndays: 14\ndomain_filter: liberation.fr\ntimeout_secs: 10\n",
        )
        .unwrap();
        let cli = Cli::parse_from(["press_watch", "--query", "from cli"]);
        let settings = Settings::resolve(&cli, file).unwrap();

        assert_eq!(settings.dashboard.query, "from cli");
        assert_eq!(settings.dashboard.window_days, 14);
        assert_eq!(settings.dashboard.domain_filter, "liberation.fr");
        assert_eq!(settings.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_no_gdelt_flag_wins_over_file() {
        let file = FileConfig {
            gdelt: Some(true),
            ..FileConfig::default()
        };
        let cli = Cli::parse_from(["press_watch", "--no-gdelt"]);
        assert!(!Settings::resolve(&cli, file).unwrap().dashboard.use_gdelt);
    }

    #[test]
    fn test_file_window_is_validated() {
        let file = FileConfig {
            days: Some(400),
            ..FileConfig::default()
        };
        let cli = Cli::parse_from(["press_watch"]);
        let err = Settings::resolve(&cli, file).unwrap_err();
        assert!(matches!(err, ConfigError::WindowOutOfRange(400)));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let err = FileConfig::from_yaml("config.yaml", "querry: typo\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_with_methods_replace_single_fields() {
        let base = DashboardConfig::default();
        let next = base
            .clone()
            .with_query("festival")
            .with_title_filter("cannes")
            .with_window_days(7)
            .unwrap();

        assert_eq!(next.query, "festival");
        assert_eq!(next.title_filter, "cannes");
        assert_eq!(next.window_days, 7);
        assert_eq!(next.domain_filter, base.domain_filter);
        assert!(base.clone().with_window_days(0).is_err());
        assert!(!base.with_gdelt(false).use_gdelt);
    }

    #[test]
    fn test_filter_reflects_patterns() {
        let config = DashboardConfig::default().with_domain_filter("lemonde.fr");
        assert_eq!(config.filter(), ResultFilter::new("", "lemonde.fr"));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = FileConfig::load("/definitely/not/here.yaml").await.unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
