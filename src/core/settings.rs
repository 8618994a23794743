use crate::app::config::PluginConfig;
use derive_builder::Builder;
use std::borrow::Cow;
use std::collections::BTreeSet;

/// The typed, normalized form of ['PluginConfig']. Built once at setup
/// and shared read-only by every event processed afterwards
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder)]
#[builder(default, setter(into))]
pub struct Settings {
    /// Match query parameter names regardless of case
    pub ignore_case: bool,
    /// Mirror matches into `$set_once` under an `initial_` key
    pub set_as_initial_user_properties: bool,
    /// Mirror matches into `$set`
    pub set_as_user_properties: bool,
    /// Query parameter names to extract, trimmed and never empty
    pub parameters: BTreeSet<String>,
    pub prefix: String,
    pub suffix: String,
}

fn parse_flag(raw: &str) -> bool {
    raw == "true"
}

fn parse_parameters(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

impl From<&PluginConfig> for Settings {
    /// Never fails, anything unrecognized falls back to false or empty
    fn from(config: &PluginConfig) -> Self {
        Settings {
            ignore_case: parse_flag(&config.ignore_case),
            set_as_initial_user_properties: parse_flag(&config.set_as_initial_user_properties),
            set_as_user_properties: parse_flag(&config.set_as_user_properties),
            parameters: parse_parameters(&config.parameters),
            prefix: config.prefix.clone(),
            suffix: config.suffix.clone(),
        }
    }
}

impl Settings {
    /// The name to look a configured parameter up by in the
    /// (possibly case folded) query of an event url
    pub fn lookup_key<'a>(&self, name: &'a str) -> Cow<'a, str> {
        if self.ignore_case {
            Cow::Owned(name.to_lowercase())
        } else {
            Cow::Borrowed(name)
        }
    }

    /// The property key a matched parameter is written under. Always
    /// built from the configured name, never the case folded one
    pub fn property_key(&self, name: &str) -> String {
        format!("{}{}{}", self.prefix, name, self.suffix)
    }
}
