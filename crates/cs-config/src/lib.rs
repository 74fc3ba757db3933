//! Configuration management for citysite.
//!
//! Parses `citysite.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `site.root_domain`

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override root domain.
    pub root_domain: Option<String>,
    /// Override loose city data directory.
    pub data_dir: Option<PathBuf>,
    /// Override packed archive path.
    pub archive: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "citysite.toml";

/// Root domain used when nothing is configured.
pub const DEFAULT_ROOT_DOMAIN: &str = "localhost:3000";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Site configuration (paths are relative strings from TOML).
    site: SiteConfigRaw,

    /// Resolved site configuration (set after loading).
    #[serde(skip)]
    pub site_resolved: SiteConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 3000,
        }
    }
}

/// Raw site configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SiteConfigRaw {
    root_domain: Option<String>,
    data_dir: Option<String>,
    archive: Option<String>,
    public_dir: Option<String>,
}

/// Resolved site configuration with absolute paths.
#[derive(Debug, Default)]
pub struct SiteConfig {
    /// Root domain (`host[:port]`) under which state and city subdomains live.
    pub root_domain: String,
    /// Directory of loose `<slug>.json` city files.
    pub data_dir: PathBuf,
    /// Packed zip archive of city files.
    pub archive: PathBuf,
    /// Directory of static assets.
    pub public_dir: PathBuf,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.root_domain`").
        field: String,
        /// Error message (e.g., "${`ROOT_DOMAIN`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Expand braced environment references in one config field.
///
/// Bare `$VAR` is left alone. An unset variable without a `:-default`
/// is an error naming the field.
fn expand_field<'a>(field: &str, value: &'a str) -> Result<Cow<'a, str>, ConfigError> {
    if !value.contains("${") {
        return Ok(Cow::Borrowed(value));
    }
    shellexpand::env_with_context(value, |var| std::env::var(var).map(Some)).map_err(|e| {
        ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("{}: {}", e.var_name, e.cause),
        }
    })
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `citysite.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the final configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(root_domain) = &settings.root_domain {
            self.site_resolved.root_domain.clone_from(root_domain);
        }
        if let Some(data_dir) = &settings.data_dir {
            self.site_resolved.data_dir.clone_from(data_dir);
        }
        if let Some(archive) = &settings.archive {
            self.site_resolved.archive.clone_from(archive);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    #[must_use]
    pub fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            site: SiteConfigRaw::default(),
            site_resolved: SiteConfig {
                root_domain: DEFAULT_ROOT_DOMAIN.to_owned(),
                data_dir: base.join("data/cities"),
                archive: base.join("data/cities.zip"),
                public_dir: base.join("public"),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_site()?;
        Ok(())
    }

    /// Validate server configuration.
    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Validate site configuration.
    ///
    /// The root domain is compared against `Host` headers, so it must be a
    /// bare `host[:port]` without scheme or path.
    fn validate_site(&self) -> Result<(), ConfigError> {
        let root_domain = &self.site_resolved.root_domain;
        require_non_empty(root_domain, "site.root_domain")?;

        if root_domain.contains("://") {
            return Err(ConfigError::Validation(
                "site.root_domain must not include a scheme (use example.com, not https://example.com)"
                    .to_owned(),
            ));
        }
        if root_domain.contains('/') {
            return Err(ConfigError::Validation(
                "site.root_domain must not include a path".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand `${VAR}` references in the host and root domain.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand_field("server.host", &self.server.host)?.into_owned();
        if let Some(root_domain) = &self.site.root_domain {
            let expanded = expand_field("site.root_domain", root_domain)?.into_owned();
            self.site.root_domain = Some(expanded);
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.site_resolved = SiteConfig {
            root_domain: self
                .site
                .root_domain
                .clone()
                .unwrap_or_else(|| DEFAULT_ROOT_DOMAIN.to_owned()),
            data_dir: resolve(self.site.data_dir.as_deref(), "data/cities"),
            archive: resolve(self.site.archive.as_deref(), "data/cities.zip"),
            public_dir: resolve(self.site.public_dir.as_deref(), "public"),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.site_resolved.root_domain, "localhost:3000");
        assert_eq!(
            config.site_resolved.data_dir,
            PathBuf::from("/test/data/cities")
        );
        assert_eq!(
            config.site_resolved.archive,
            PathBuf::from("/test/data/cities.zip")
        );
        assert_eq!(config.site_resolved.public_dir, PathBuf::from("/test/public"));
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_parse_server_config() {
        let toml = r#"
[server]
host = "0.0.0.0"
port = 9000
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[site]
root_domain = "plumbers.example"
data_dir = "content/cities"
archive = "dist/cities.zip"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.site_resolved.root_domain, "plumbers.example");
        assert_eq!(
            config.site_resolved.data_dir,
            PathBuf::from("/project/content/cities")
        );
        assert_eq!(
            config.site_resolved.archive,
            PathBuf::from("/project/dist/cities.zip")
        );
        assert_eq!(
            config.site_resolved.public_dir,
            PathBuf::from("/project/public")
        );
    }

    #[test]
    fn test_resolve_paths_defaults_root_domain() {
        let mut config: Config = toml::from_str("[site]\n").unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.site_resolved.root_domain, DEFAULT_ROOT_DOMAIN);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            "[server]\nport = 8080\n\n[site]\nroot_domain = \"example.com\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.site_resolved.root_domain, "example.com");
        assert_eq!(config.site_resolved.data_dir, dir.path().join("data/cities"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let err = Config::load(Some(Path::new("/nonexistent/citysite.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_rejects_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[server\nport = 1").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_apply_cli_settings_host_and_port() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            host: Some("0.0.0.0".to_owned()),
            port: Some(9000),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.site_resolved.root_domain, "localhost:3000");
    }

    #[test]
    fn test_apply_cli_settings_site_paths() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            root_domain: Some("example.com".to_owned()),
            data_dir: Some(PathBuf::from("/srv/cities")),
            archive: Some(PathBuf::from("/srv/cities.zip")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.site_resolved.root_domain, "example.com");
        assert_eq!(config.site_resolved.data_dir, PathBuf::from("/srv/cities"));
        assert_eq!(config.site_resolved.archive, PathBuf::from("/srv/cities.zip"));
        assert_eq!(config.site_resolved.public_dir, PathBuf::from("/test/public"));
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let before = Config::default_with_base(Path::new("/test"));
        let mut config = Config::default_with_base(Path::new("/test"));

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.server.host, before.server.host);
        assert_eq!(config.server.port, before.server.port);
        assert_eq!(config.site_resolved.data_dir, before.site_resolved.data_dir);
    }

    #[test]
    fn test_expand_env_vars_root_domain() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("CS_CONFIG_TEST_DOMAIN", "plumbers.example");
        }

        let toml = r#"
[site]
root_domain = "${CS_CONFIG_TEST_DOMAIN}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.site_resolved.root_domain, "plumbers.example");

        unsafe {
            std::env::remove_var("CS_CONFIG_TEST_DOMAIN");
        }
    }

    #[test]
    fn test_expand_field_default_and_embedded() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("CS_UNSET_DOMAIN_TEST");
            std::env::set_var("CS_PORT_TEST", "8443");
        }

        let with_default = expand_field("site.root_domain", "${CS_UNSET_DOMAIN_TEST:-localhost:3000}");
        let embedded = expand_field("site.root_domain", "example.com:${CS_PORT_TEST}");

        assert_eq!(with_default.unwrap(), "localhost:3000");
        assert_eq!(embedded.unwrap(), "example.com:8443");
        unsafe {
            std::env::remove_var("CS_PORT_TEST");
        }
    }

    #[test]
    fn test_expand_field_leaves_literals_borrowed() {
        assert!(matches!(
            expand_field("server.host", "$HOST").unwrap(),
            Cow::Borrowed("$HOST")
        ));
        assert!(matches!(
            expand_field("site.root_domain", "example.com").unwrap(),
            Cow::Borrowed("example.com")
        ));
    }

    #[test]
    fn test_load_reports_unset_variable_with_field() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("CS_MISSING_HOST_TEST");
        }
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[server]\nhost = \"${CS_MISSING_HOST_TEST}\"\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        let msg = err.to_string();
        assert!(msg.contains("server.host"), "{msg}");
        assert!(msg.contains("CS_MISSING_HOST_TEST"), "{msg}");
    }

    // Validation tests

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_server_host_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.host = String::new();
        assert_validation_error(&config, &["server.host", "empty"]);
    }

    #[test]
    fn test_validate_server_port_zero() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.port = 0;
        assert_validation_error(&config, &["server.port"]);
    }

    #[test]
    fn test_validate_root_domain_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site_resolved.root_domain = String::new();
        assert_validation_error(&config, &["site.root_domain", "empty"]);
    }

    #[test]
    fn test_validate_root_domain_with_scheme() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site_resolved.root_domain = "https://example.com".to_owned();
        assert_validation_error(&config, &["site.root_domain", "scheme"]);
    }

    #[test]
    fn test_validate_root_domain_with_path() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site_resolved.root_domain = "example.com/site".to_owned();
        assert_validation_error(&config, &["site.root_domain", "path"]);
    }

    #[test]
    fn test_validate_root_domain_with_port_passes() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site_resolved.root_domain = "example.com:8443".to_owned();
        assert!(config.validate().is_ok());
    }
}
