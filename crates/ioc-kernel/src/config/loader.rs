use std::path::Path;
use std::sync::OnceLock;

use config::{Config as Cfg, Environment, File};
use regex::Regex;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{ContainerConfig, ENV_PREFIX};

pub use config::FileFormat;

/// Configuration loading error
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parsing error: {0}")]
    Parse(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Detect configuration format from file extension
///
/// - YAML: `.yaml`, `.yml`
/// - TOML: `.toml`
/// - JSON: `.json`
/// - INI: `.ini`
/// - RON: `.ron`
/// - JSON5: `.json5`
pub fn detect_format(path: &str) -> ConfigResult<FileFormat> {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| ConfigError::UnsupportedFormat("No file extension found".to_string()))?;

    match ext.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(FileFormat::Yaml),
        "toml" => Ok(FileFormat::Toml),
        "json" => Ok(FileFormat::Json),
        "ini" => Ok(FileFormat::Ini),
        "ron" => Ok(FileFormat::Ron),
        "json5" => Ok(FileFormat::Json5),
        _ => Err(ConfigError::UnsupportedFormat(ext.to_string())),
    }
}

fn braced_var() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("braced env pattern is valid")
    })
}

fn bare_var() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)\b").expect("bare env pattern is valid"))
}

/// Substitute `${VAR}` and `$VAR` references with environment values.
///
/// Unset variables are left as written.
pub fn substitute_env_vars(content: &str) -> String {
    let lookup = |caps: &regex::Captures| {
        std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
    };

    // Braced form first so `${A}B` is not read as `$A`.
    let braced = braced_var().replace_all(content, lookup);
    bare_var().replace_all(&braced, lookup).into_owned()
}

fn finish<T: DeserializeOwned>(built: Result<Cfg, config::ConfigError>) -> ConfigResult<T> {
    built
        .map_err(|e| ConfigError::Parse(e.to_string()))?
        .try_deserialize()
        .map_err(|e| ConfigError::Serialization(e.to_string()))
}

/// Read a file and substitute environment references in it.
fn read_source(path: &str) -> ConfigResult<(String, FileFormat)> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    debug!(path, ?format, bytes = content.len(), "config file read");
    Ok((substitute_env_vars(&content), format))
}

/// Load configuration from a file, format detected from the extension.
pub fn load_config<T: DeserializeOwned>(path: &str) -> ConfigResult<T> {
    let (content, format) = read_source(path)?;
    finish(
        Cfg::builder()
            .add_source(File::from_str(&content, format))
            .build(),
    )
}

/// Load configuration from a string with an explicit format.
pub fn from_str<T: DeserializeOwned>(content: &str, format: FileFormat) -> ConfigResult<T> {
    finish(
        Cfg::builder()
            .add_source(File::from_str(&substitute_env_vars(content), format))
            .build(),
    )
}

/// Merge several in-memory sources; later sources override earlier ones.
pub fn merge_configs<T: DeserializeOwned>(sources: &[(&str, FileFormat)]) -> ConfigResult<T> {
    let builder = sources.iter().fold(Cfg::builder(), |builder, (content, format)| {
        builder.add_source(File::from_str(&substitute_env_vars(content), *format))
    });
    finish(builder.build())
}

/// Load several files; later files override earlier ones.
pub fn load_merged<T: DeserializeOwned>(paths: &[&str]) -> ConfigResult<T> {
    let mut builder = Cfg::builder();
    for path in paths {
        let (content, format) = read_source(path)?;
        builder = builder.add_source(File::from_str(&content, format));
    }
    finish(builder.build())
}

/// Load a file and apply `<PREFIX>_SECTION__FIELD` environment overrides.
pub fn load_with_env<T: DeserializeOwned>(path: &str, env_prefix: &str) -> ConfigResult<T> {
    let (content, format) = read_source(path)?;
    finish(
        Cfg::builder()
            .add_source(File::from_str(&content, format))
            .add_source(
                Environment::with_prefix(env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build(),
    )
}

impl ContainerConfig {
    /// Load from a file, then apply `IOC_*` environment overrides.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref().to_string_lossy();
        load_with_env(&path, ENV_PREFIX)
    }

    pub fn from_str_with_format(content: &str, format: FileFormat) -> ConfigResult<Self> {
        from_str(content, format)
    }
}
