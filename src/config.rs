//! Engine configuration loaded from TOML.
//!
//! ```toml
//! production = true
//! namespace = "#app"
//! vendor_prefixes = true
//! plugins = ["rtl"]
//!
//! [server]
//! nonce = "abc123"
//! ```

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use crate::server::ServerStyleSheet;
use crate::sheet::SheetOptions;
use crate::stylis::{RtlPlugin, Stylis, StylisOptions, StylisPlugin};

/// Parsed engine configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Production mode; defaults to the build profile.
    pub production: bool,
    /// Selector prepended to every emitted style rule.
    pub namespace: Option<String>,
    /// Emit `-webkit-`/`-moz-`/`-ms-` variants of declarations.
    pub vendor_prefixes: bool,
    /// Built-in transform plugins, in application order.
    pub plugins: Vec<String>,
    /// Server rendering settings.
    pub server: ServerConfig,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServerConfig {
    /// CSP nonce written on server style tags.
    pub nonce: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            production: SheetOptions::default().production,
            namespace: None,
            vendor_prefixes: false,
            plugins: Vec::new(),
            server: ServerConfig::default(),
        }
    }
}

/// Raw TOML structure.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEngineConfig {
    production: Option<bool>,
    namespace: Option<String>,
    #[serde(default)]
    vendor_prefixes: bool,
    #[serde(default)]
    plugins: Vec<String>,
    #[serde(default)]
    server: RawServerConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawServerConfig {
    nonce: Option<String>,
}

/// Errors while loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Validation error: {0}")]
    Validation(String),
}

impl EngineConfig {
    /// Parse from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(format!("Failed to read {}: {}", path.as_ref().display(), e)))?;
        content.parse()
    }

    /// Sheet options for this configuration.
    pub fn sheet_options(&self) -> SheetOptions {
        SheetOptions::default().production(self.production)
    }

    /// Build the configured CSS transform.
    pub fn stylis(&self) -> Result<Stylis, ConfigError> {
        let plugins = self
            .plugins
            .iter()
            .map(|name| builtin_plugin(name))
            .collect::<Result<Vec<_>, _>>()?;
        let options = StylisOptions {
            namespace: self.namespace.clone(),
            prefix: self.vendor_prefixes,
        };
        Stylis::with_plugins(options, plugins).map_err(|e| ConfigError::Validation(e.to_string()))
    }

    /// A fresh server sheet for one render.
    pub fn server_sheet(&self) -> ServerStyleSheet {
        let sheet = ServerStyleSheet::new(self.sheet_options());
        match &self.server.nonce {
            Some(nonce) => sheet.with_nonce(nonce.clone()),
            None => sheet,
        }
    }
}

impl FromStr for EngineConfig {
    type Err = ConfigError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let raw: RawEngineConfig = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        if let Some(namespace) = &raw.namespace
            && namespace.trim().is_empty()
        {
            return Err(ConfigError::Validation("namespace must not be empty".into()));
        }
        for name in &raw.plugins {
            builtin_plugin(name)?;
        }

        Ok(Self {
            production: raw.production.unwrap_or_else(|| SheetOptions::default().production),
            namespace: raw.namespace,
            vendor_prefixes: raw.vendor_prefixes,
            plugins: raw.plugins,
            server: ServerConfig {
                nonce: raw.server.nonce,
            },
        })
    }
}

fn builtin_plugin(name: &str) -> Result<Arc<dyn StylisPlugin>, ConfigError> {
    match name {
        RtlPlugin::NAME => Ok(Arc::new(RtlPlugin)),
        other => Err(ConfigError::Validation(format!(
            "Unknown plugin '{}': expected one of ['{}']",
            other,
            RtlPlugin::NAME
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn parse_full_config() {
        let toml = r##"
production = true
namespace = "#app"
plugins = ["rtl"]

[server]
nonce = "abc123"
"##;
        let config: EngineConfig = toml.parse().unwrap();
        assert!(config.production);
        assert_eq!(config.namespace.as_deref(), Some("#app"));
        assert_eq!(config.plugins, vec!["rtl"]);
        assert_eq!(config.server.nonce.as_deref(), Some("abc123"));

        let stylis = config.stylis().unwrap();
        assert!(stylis.has_plugins());
        assert_eq!(stylis.namespace(), Some("#app"));
        assert!(config.sheet_options().production);
        assert_eq!(config.server_sheet().nonce(), Some("abc123"));
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: EngineConfig = "".parse().unwrap();
        assert_eq!(config, EngineConfig::default());
        assert!(!config.stylis().unwrap().has_plugins());
    }

    #[test]
    fn unknown_plugin_is_rejected() {
        let err = "plugins = [\"autoprefix\"]".parse::<EngineConfig>().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(msg) if msg.contains("autoprefix")));
    }

    #[test]
    fn vendor_prefixes_enable_the_prefixer() {
        let config: EngineConfig = "vendor_prefixes = true".parse().unwrap();
        assert!(config.vendor_prefixes);

        let stylis = config.stylis().unwrap();
        assert!(stylis.is_prefixing());
        assert_ne!(stylis.hash(), "");
        assert_eq!(
            stylis.compile("user-select: none;", ".a", None, "A").unwrap(),
            vec![".a{-webkit-user-select:none;-moz-user-select:none;-ms-user-select:none;user-select:none;}"]
        );

        let plain: EngineConfig = "".parse().unwrap();
        assert!(!plain.vendor_prefixes);
        assert!(!plain.stylis().unwrap().is_prefixing());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = "prodution = true".parse::<EngineConfig>().unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn empty_namespace_is_rejected() {
        let err = "namespace = \"  \"".parse::<EngineConfig>().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("styled.toml");
        fs::write(&path, "production = false\nplugins = [\"rtl\"]\n").unwrap();

        let config = EngineConfig::from_file(&path).unwrap();
        assert!(!config.production);
        assert_eq!(config.plugins, vec!["rtl"]);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let err = EngineConfig::from_file(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
