//! Configuration management for mdweave.
//!
//! Parses `mdweave.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Path Expansion
//!
//! Path-valued fields (`diagrams.command`, `docx.output_dir`,
//! `gdocs.token_file`) support `~` and `${VAR}` expansion.

mod expand;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::expand::expand_path;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the remote mermaid rendering URL.
    pub mermaid_url: Option<String>,
    /// Force the local mermaid CLI renderer.
    pub use_local: Option<bool>,
    /// Override DOCX output directory.
    pub output_dir: Option<PathBuf>,
    /// Override the access token file.
    pub token_file: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdweave.toml";

/// Default remote mermaid rendering endpoint.
pub const DEFAULT_MERMAID_URL: &str = "https://mermaid.ink";

/// Default remote render timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Diagram rendering configuration (paths are raw strings from TOML).
    #[serde(default)]
    diagrams: DiagramsConfigRaw,
    /// DOCX output configuration.
    #[serde(default)]
    docx: DocxConfigRaw,
    /// Google Docs output configuration.
    #[serde(default)]
    gdocs: GdocsConfigRaw,

    /// Resolved diagrams configuration (set after loading).
    #[serde(skip)]
    pub diagrams_resolved: DiagramsConfig,
    /// Resolved DOCX configuration (set after loading).
    #[serde(skip)]
    pub docx_resolved: DocxConfig,
    /// Resolved Google Docs configuration (set after loading).
    #[serde(skip)]
    pub gdocs_resolved: GdocsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Which mermaid renderer to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// Remote HTTP rendering service.
    #[default]
    Remote,
    /// Local mermaid CLI executable.
    Local,
}

/// Raw diagrams configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DiagramsConfigRaw {
    renderer: Option<RendererKind>,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    command: Option<String>,
}

/// Resolved diagram rendering configuration.
#[derive(Debug)]
pub struct DiagramsConfig {
    /// Selected renderer.
    pub renderer: RendererKind,
    /// Remote rendering endpoint.
    pub base_url: String,
    /// Remote render timeout.
    pub timeout: Duration,
    /// Local mermaid CLI executable.
    pub command: PathBuf,
}

impl Default for DiagramsConfig {
    fn default() -> Self {
        Self {
            renderer: RendererKind::Remote,
            base_url: DEFAULT_MERMAID_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            command: PathBuf::from("mmdc"),
        }
    }
}

/// Raw DOCX configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocxConfigRaw {
    output_dir: Option<String>,
}

/// Resolved DOCX output configuration.
#[derive(Debug, Default)]
pub struct DocxConfig {
    /// Directory output files are written into.
    pub output_dir: PathBuf,
}

/// Raw Google Docs configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct GdocsConfigRaw {
    token_file: Option<String>,
    docs_endpoint: Option<String>,
    drive_endpoint: Option<String>,
}

/// Resolved Google Docs output configuration.
#[derive(Debug)]
pub struct GdocsConfig {
    /// File holding the bearer access token.
    pub token_file: PathBuf,
    /// Docs API endpoint.
    pub docs_endpoint: String,
    /// Drive API endpoint.
    pub drive_endpoint: String,
}

impl Default for GdocsConfig {
    fn default() -> Self {
        Self {
            token_file: PathBuf::from("token.json"),
            docs_endpoint: "https://docs.googleapis.com".to_owned(),
            drive_endpoint: "https://www.googleapis.com".to_owned(),
        }
    }
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
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`gdocs.token_file`").
        field: String,
        /// Error message (e.g., "${`HOME`} not set").
        message: String,
    },
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mdweave.toml` in current directory and
    /// parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing
    /// CLI arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
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
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(url) = &settings.mermaid_url {
            self.diagrams_resolved.base_url.clone_from(url);
        }
        if settings.use_local == Some(true) {
            self.diagrams_resolved.renderer = RendererKind::Local;
        }
        if let Some(output_dir) = &settings.output_dir {
            self.docx_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(token_file) = &settings.token_file {
            self.gdocs_resolved.token_file.clone_from(token_file);
        }
    }

    /// Search for config file in current directory and parents.
    #[must_use]
    pub fn discover_config() -> Option<PathBuf> {
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
    #[must_use]
    pub fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    #[must_use]
    pub fn default_with_base(base: &Path) -> Self {
        Self {
            diagrams: DiagramsConfigRaw::default(),
            docx: DocxConfigRaw::default(),
            gdocs: GdocsConfigRaw::default(),
            diagrams_resolved: DiagramsConfig::default(),
            docx_resolved: DocxConfig {
                output_dir: base.join("docx"),
            },
            gdocs_resolved: GdocsConfig {
                token_file: base.join("token.json"),
                ..GdocsConfig::default()
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve(config_dir)?;
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Resolve raw values, expanding paths relative to the config directory.
    fn resolve(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        let defaults = DiagramsConfig::default();
        self.diagrams_resolved = DiagramsConfig {
            renderer: self.diagrams.renderer.unwrap_or_default(),
            base_url: self
                .diagrams
                .base_url
                .clone()
                .unwrap_or(defaults.base_url),
            timeout: self
                .diagrams
                .timeout_secs
                .map_or(defaults.timeout, Duration::from_secs),
            command: match &self.diagrams.command {
                Some(raw) => expand_path(raw, "diagrams.command")?,
                None => defaults.command,
            },
        };

        self.docx_resolved = DocxConfig {
            output_dir: match &self.docx.output_dir {
                Some(raw) => resolve_relative(config_dir, &expand_path(raw, "docx.output_dir")?),
                None => config_dir.join("docx"),
            },
        };

        let gdocs_defaults = GdocsConfig::default();
        self.gdocs_resolved = GdocsConfig {
            token_file: match &self.gdocs.token_file {
                Some(raw) => resolve_relative(config_dir, &expand_path(raw, "gdocs.token_file")?),
                None => config_dir.join("token.json"),
            },
            docs_endpoint: self
                .gdocs
                .docs_endpoint
                .clone()
                .unwrap_or(gdocs_defaults.docs_endpoint),
            drive_endpoint: self
                .gdocs
                .drive_endpoint
                .clone()
                .unwrap_or(gdocs_defaults.drive_endpoint),
        };

        Ok(())
    }
}

/// Join relative paths onto the config directory; keep absolute paths as-is.
fn resolve_relative(config_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        config_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn load_str(content: &str) -> Config {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, content).unwrap();
        let mut config = Config::load(Some(&path), None).unwrap();
        // Detach from the temp dir for assertions on relative layout.
        config.config_path = None;
        config
    }

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.diagrams_resolved.renderer, RendererKind::Remote);
        assert_eq!(config.diagrams_resolved.base_url, DEFAULT_MERMAID_URL);
        assert_eq!(config.docx_resolved.output_dir, PathBuf::from("/test/docx"));
        assert_eq!(
            config.gdocs_resolved.token_file,
            PathBuf::from("/test/token.json")
        );
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = load_str("");
        assert_eq!(config.diagrams_resolved.renderer, RendererKind::Remote);
        assert_eq!(
            config.diagrams_resolved.timeout,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_parse_diagrams_section() {
        let config = load_str(
            r#"
[diagrams]
renderer = "local"
command = "/usr/local/bin/mmdc"
timeout_secs = 5
"#,
        );
        assert_eq!(config.diagrams_resolved.renderer, RendererKind::Local);
        assert_eq!(
            config.diagrams_resolved.command,
            PathBuf::from("/usr/local/bin/mmdc")
        );
        assert_eq!(config.diagrams_resolved.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_output_dir_relative_to_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[docx]\noutput_dir = \"out\"\n").unwrap();
        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.docx_resolved.output_dir, dir.path().join("out"));
    }

    #[test]
    fn test_cli_settings_take_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[diagrams]\nbase_url = \"https://example.com\"\n").unwrap();

        let settings = CliSettings {
            mermaid_url: Some("https://override.example".to_owned()),
            use_local: Some(true),
            ..CliSettings::default()
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();
        assert_eq!(config.diagrams_resolved.base_url, "https://override.example");
        assert_eq!(config.diagrams_resolved.renderer, RendererKind::Local);
    }

    #[test]
    fn test_missing_explicit_path_is_not_found() {
        let err = Config::load(Some(Path::new("/nonexistent/mdweave.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_gdocs_endpoints_overridable() {
        let config = load_str(
            r#"
[gdocs]
docs_endpoint = "http://localhost:9999"
drive_endpoint = "http://localhost:9998"
"#,
        );
        assert_eq!(config.gdocs_resolved.docs_endpoint, "http://localhost:9999");
        assert_eq!(
            config.gdocs_resolved.drive_endpoint,
            "http://localhost:9998"
        );
    }
}
