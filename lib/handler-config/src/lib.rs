mod env_overrides;
pub mod http_server;
pub mod log;
pub mod response;

use std::path::PathBuf;

use config::{Config, File, FileFormat, FileSourceFile};
use envconfig::Envconfig;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use crate::env_overrides::{EnvVarOverrides, EnvVarOverridesError};
use crate::{http_server::HttpServerConfig, log::LoggingConfig, response::ResponseConfig};

#[derive(Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct HandlerConfig {
    /// The logger configuration.
    ///
    /// Defaults to `debug` with compact output in debug builds, and to `info` with JSON
    /// output in release builds.
    #[serde(default)]
    pub log: LoggingConfig,

    /// Configuration for the HTTP server/listener.
    #[serde(default)]
    pub http: HttpServerConfig,

    /// Configuration of the JSON responses.
    #[serde(default)]
    pub response: ResponseConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum HandlerConfigError {
    #[error("Failed to load configuration: {0}")]
    ConfigLoadError(#[from] config::ConfigError),
    #[error("Failed to apply configuration overrides: {0}")]
    EnvVarOverridesError(#[from] EnvVarOverridesError),
    #[error("Failed to load the environment variables: {0}")]
    EnvVarLoadError(#[from] envconfig::Error),
}

static DEFAULT_FILE_NAMES: &[&str] = &[
    "graphql-handler.config.yaml",
    "graphql-handler.config.yml",
    "graphql-handler.config.json",
    "graphql-handler.config.json5",
];

/// Loads the configuration from `override_config_path`, or from the first default file
/// name found in the working directory, then applies environment variable overrides.
///
/// Every section is optional, so no file at all yields the defaults.
pub fn load_config(
    override_config_path: Option<String>,
) -> Result<HandlerConfig, HandlerConfigError> {
    let env_overrides = EnvVarOverrides::init_from_env()?;
    load_config_with_overrides(override_config_path, env_overrides)
}

pub fn load_config_with_overrides(
    override_config_path: Option<String>,
    env_overrides: EnvVarOverrides,
) -> Result<HandlerConfig, HandlerConfigError> {
    let mut config = Config::builder();

    if let Some(path_str) = override_config_path {
        let as_file: File<FileSourceFile, _> = PathBuf::from(path_str).into();
        config = config.add_source(as_file.required(true));
    } else {
        for name in DEFAULT_FILE_NAMES {
            config = config.add_source(File::with_name(name).required(false));
        }
    }

    config = env_overrides.apply_overrides(config)?;

    Ok(config.build()?.try_deserialize::<HandlerConfig>()?)
}

pub fn parse_yaml_config(config_raw: String) -> Result<HandlerConfig, HandlerConfigError> {
    Config::builder()
        .add_source(File::from_str(&config_raw, FileFormat::Yaml))
        .build()?
        .try_deserialize::<HandlerConfig>()
        .map_err(HandlerConfigError::ConfigLoadError)
}
