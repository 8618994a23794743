use crate::core::enrichment::query::QueryParams;
use crate::core::models::event::{INITIAL_PREFIX, PluginEvent, SET, SET_ONCE, is_truthy};
use crate::core::settings::Settings;
use anyhow::{Result, anyhow, bail};
use log::{debug, trace};
use serde_json::{Map, Value};

/// A configured parameter found in the url with a non-empty value
#[derive(Debug, PartialEq)]
pub struct ParamMatch<'a> {
    pub key: String,
    pub value: &'a str,
}

/// Resolves every configured parameter against the query, skipping
/// those missing from the url or present with an empty value
pub fn find_matches<'a>(settings: &Settings, query: &'a QueryParams) -> Vec<ParamMatch<'a>> {
    settings
        .parameters
        .iter()
        .filter_map(|name| {
            let value = query.get(&settings.lookup_key(name))?;
            if value.is_empty() {
                trace!("Skipping parameter {} with empty value", name);
                return None;
            }

            Some(ParamMatch {
                key: settings.property_key(name),
                value,
            })
        })
        .collect()
}

/// A mirror map may be missing or falsy, in which case it is created on
/// first write, but anything else that is not an object cant be merged into
fn check_mirror_target(properties: &Map<String, Value>, field: &str) -> Result<()> {
    match properties.get(field) {
        Some(Value::Object(_)) | None => Ok(()),
        Some(value) if !is_truthy(value) => Ok(()),
        Some(value) => bail!("{} is not an object, cannot merge into it: {}", field, value),
    }
}

/// A matched key naming an enabled mirror map would replace that map
/// with a string, and the mirrored write would then have nowhere to go
fn check_key_collision(settings: &Settings, matches: &[ParamMatch]) -> Result<()> {
    for ParamMatch { key, .. } in matches {
        if (settings.set_as_user_properties && key == SET)
            || (settings.set_as_initial_user_properties && key == SET_ONCE)
        {
            bail!(
                "Parameter key {} collides with the user property map of the same name",
                key
            );
        }
    }

    Ok(())
}

fn object_entry<'a>(properties: &'a mut Map<String, Value>, field: &str) -> Result<&'a mut Map<String, Value>> {
    if !matches!(properties.get(field), Some(Value::Object(_))) {
        properties.insert(field.to_string(), Value::Object(Map::new()));
    }

    properties
        .get_mut(field)
        .and_then(Value::as_object_mut)
        .ok_or_else(|| anyhow!("{} missing after insert", field))
}

/// Writes all matched parameters into the event properties, and into the
/// `$set`/`$set_once` user property maps when enabled. Existing entries in
/// those maps are kept, matched keys overwrite.
///
/// All checks run before the first write so a failing event is never
/// left half enriched. Returns the number of parameters written
pub fn inject(settings: &Settings, query: &QueryParams, event: &mut PluginEvent) -> Result<usize> {
    let properties = match event.properties_mut() {
        Some(properties) => properties,
        None => return Ok(0),
    };

    let matches = find_matches(settings, query);
    if matches.is_empty() {
        return Ok(0);
    }

    if settings.set_as_user_properties {
        check_mirror_target(properties, SET)?;
    }
    if settings.set_as_initial_user_properties {
        check_mirror_target(properties, SET_ONCE)?;
    }
    check_key_collision(settings, &matches)?;

    for ParamMatch { key, value } in &matches {
        debug!("Injecting query parameter {}={}", key, value);

        properties.insert(key.clone(), Value::from(*value));

        if settings.set_as_user_properties {
            object_entry(properties, SET)?.insert(key.clone(), Value::from(*value));
        }

        if settings.set_as_initial_user_properties {
            object_entry(properties, SET_ONCE)?
                .insert(format!("{}{}", INITIAL_PREFIX, key), Value::from(*value));
        }
    }

    Ok(matches.len())
}
