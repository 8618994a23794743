use anyhow::{Error, anyhow, bail};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, Map, Source, Value};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix for environment variables overriding the config file,
/// nested keys are separated by `__` e.g. `PARAMPROPS__PLUGIN__PREFIX`
pub const ENV_PREFIX: &str = "PARAMPROPS";

/// Section of the collected env keys holding plugin overrides
const PLUGIN_ENV_SECTION: &str = "plugin.";

/// Raw plugin configuration exactly as the host stores it, every field
/// is a string. Booleans are the literal `"true"`, anything else is false
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Builder)]
#[serde(rename_all = "camelCase", default)]
#[builder(default, setter(into))]
pub struct PluginConfig {
    pub ignore_case: String,
    pub prefix: String,
    pub set_as_initial_user_properties: String,
    pub set_as_user_properties: String,
    pub suffix: String,
    /// Comma separated query parameter names
    pub parameters: String,
}

impl PluginConfig {
    /// Applies `PARAMPROPS__PLUGIN__*` overrides. Env keys arrive lowercased
    /// so names match ignoring case and underscores, both `IGNORECASE`
    /// and `IGNORE_CASE` set `ignoreCase`
    fn apply_env_overrides(&mut self, vars: &Map<String, Value>) -> Result<(), Error> {
        for (key, value) in vars {
            let field = match key.strip_prefix(PLUGIN_ENV_SECTION) {
                Some(field) => field.replace('_', ""),
                None => continue,
            };
            let value = value.clone().into_string()?;

            match field.as_str() {
                "ignorecase" => self.ignore_case = value,
                "prefix" => self.prefix = value,
                "setasinitialuserproperties" => self.set_as_initial_user_properties = value,
                "setasuserproperties" => self.set_as_user_properties = value,
                "suffix" => self.suffix = value,
                "parameters" => self.parameters = value,
                _ => bail!(
                    "Unknown plugin override {}__PLUGIN__{}",
                    ENV_PREFIX,
                    key[PLUGIN_ENV_SECTION.len()..].to_uppercase()
                ),
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, Builder)]
#[builder(default)]
pub struct AppConfig {
    #[serde(default)]
    pub plugin: PluginConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileRotation {
    #[default]
    Daily,
    Hourly,
    Never,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSink {
    #[serde(flatten)]
    pub dest: LogType,
}

/// There is no stdout sink, stdout carries the enriched event stream
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LogType {
    Stderr {
        #[serde(default = "default_true")]
        color: bool,
        #[serde(default)]
        json: bool,
        #[serde(default = "default_true")]
        spans: bool,
    },
    File {
        path: PathBuf,
        #[serde(default)]
        json: bool,
        #[serde(default)]
        rotation: FileRotation,
        #[serde(default)]
        max_files: usize,
        #[serde(default = "default_true")]
        spans: bool,
    },
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_sample_rate")]
    pub span_sample_rate: f32,
    #[serde(default = "default_sinks")]
    pub sinks: Vec<LogSink>,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_sample_rate() -> f32 {
    0.01
}

fn default_sinks() -> Vec<LogSink> {
    vec![LogSink {
        dest: LogType::Stderr {
            color: true,
            json: false,
            spans: false,
        },
    }]
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            span_sample_rate: default_sample_rate(),
            sinks: default_sinks(),
        }
    }
}

impl LoggingConfig {
    /// Validates the logging configuration
    pub fn validate(&self) -> Result<(), Error> {
        if self.sinks.is_empty() {
            bail!("At least one logging sink must be configured");
        }

        self.level.parse::<tracing::Level>().map_err(|_| {
            anyhow!(
                "Invalid log level: '{}'. Valid levels: trace, debug, info, warn, error",
                self.level
            )
        })?;

        if !(0.0..=1.0).contains(&self.span_sample_rate) {
            bail!(
                "span_sample_rate must be between 0.0 and 1.0, got {}",
                self.span_sample_rate
            );
        }

        Ok(())
    }
}

impl AppConfig {
    /// Loads the yaml config at `path`, with `PARAMPROPS__*` environment
    /// variables taking precedence over values from the file
    pub fn load(path: &Path) -> Result<AppConfig, Error> {
        let builder = Config::builder().add_source(config::File::from(path.to_path_buf()));

        Self::build(builder, env_source())
    }

    /// The plugin keys are camelCase in the file but lowercased by the env
    /// source, so plugin overrides are applied after deserializing rather
    /// than merged, leaving a single spelling of each key
    fn build(builder: ConfigBuilder<DefaultState>, env: Environment) -> Result<AppConfig, Error> {
        let cfg = builder.add_source(env.clone()).build()?;
        let mut app: AppConfig = cfg.try_deserialize()?;

        app.plugin.apply_env_overrides(&env.collect()?)?;

        Ok(app)
    }
}
