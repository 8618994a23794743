pub mod injector;
pub mod query;

use crate::core::enrichment::injector::inject;
use crate::core::enrichment::query::QueryParams;
use crate::core::models::event::PluginEvent;
use crate::core::settings::Settings;
use anyhow::Result;
use log::debug;

/// Copies the configured query parameters of the event's current url into
/// its properties, and optionally its `$set`/`$set_once` user properties.
///
/// Events without a current url are returned untouched. A current url
/// which fails to parse is an error, raised before the event is modified,
/// and it is up to the caller to decide whether to drop or keep the event
pub fn extract(settings: &Settings, mut event: PluginEvent) -> Result<PluginEvent> {
    let query = match QueryParams::from_event(&event, settings.ignore_case)? {
        Some(query) => query,
        None => return Ok(event),
    };

    let written = inject(settings, &query, &mut event)?;
    debug!("Enriched event with {} query parameters", written);

    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::PluginConfigBuilder;
    use serde_json::{Value, json};

    fn settings(
        ignore_case: &str,
        prefix: &str,
        suffix: &str,
        set: &str,
        set_once: &str,
        parameters: &str,
    ) -> Settings {
        let config = PluginConfigBuilder::default()
            .ignore_case(ignore_case)
            .prefix(prefix)
            .suffix(suffix)
            .set_as_user_properties(set)
            .set_as_initial_user_properties(set_once)
            .parameters(parameters)
            .build()
            .unwrap();

        Settings::from(&config)
    }

    fn pageview(url: Value) -> PluginEvent {
        serde_json::from_value(json!({
            "event": "$pageview",
            "distinct_id": "user-1",
            "properties": { "$current_url": url, "$browser": "Firefox" },
        }))
        .unwrap()
    }

    fn props(event: &PluginEvent) -> &serde_json::Map<String, Value> {
        event.properties().unwrap()
    }

    #[test]
    fn test_noop_without_current_url() {
        let s = settings("true", "p_", "_s", "true", "true", "ref,source");

        for url in [json!(null), json!("")] {
            let input = pageview(url);
            assert_eq!(extract(&s, input.clone()).unwrap(), input);
        }

        let missing: PluginEvent = serde_json::from_value(json!({
            "event": "$pageview",
            "properties": { "ref": "kept" },
        }))
        .unwrap();
        assert_eq!(extract(&s, missing.clone()).unwrap(), missing);

        let bare = PluginEvent::default();
        assert_eq!(extract(&s, bare.clone()).unwrap(), bare);
    }

    #[test]
    fn test_prefix_and_suffix() {
        let s = settings("false", "utm_", "_p", "false", "false", "source");
        let out = extract(&s, pageview(json!("https://x.com/?source=google"))).unwrap();

        assert_eq!(props(&out).get("utm_source_p"), Some(&json!("google")));
        assert_eq!(props(&out).get("source"), None);
        assert_eq!(props(&out).get("$browser"), Some(&json!("Firefox")));
    }

    #[test]
    fn test_ignore_case_keeps_configured_key() {
        let s = settings("true", "", "", "false", "false", "Source");
        let out = extract(&s, pageview(json!("https://x.com/?source=bing"))).unwrap();

        assert_eq!(props(&out).get("Source"), Some(&json!("bing")));
        assert_eq!(props(&out).get("source"), None);
    }

    #[test]
    fn test_case_sensitive_mismatch() {
        let s = settings("false", "", "", "false", "false", "Source");
        let input = pageview(json!("https://x.com/?source=bing"));

        assert_eq!(extract(&s, input.clone()).unwrap(), input);
    }

    #[test]
    fn test_user_property_mirroring() {
        let s = settings("false", "p_", "_s", "true", "true", "ref");
        let out = extract(&s, pageview(json!("https://x.com/?ref=abc"))).unwrap();

        assert_eq!(props(&out).get("p_ref_s"), Some(&json!("abc")));
        assert_eq!(props(&out).get("$set"), Some(&json!({ "p_ref_s": "abc" })));
        assert_eq!(
            props(&out).get("$set_once"),
            Some(&json!({ "initial_p_ref_s": "abc" }))
        );
    }

    #[test]
    fn test_user_property_maps_merged() {
        let s = settings("false", "", "", "true", "true", "ref");
        let input: PluginEvent = serde_json::from_value(json!({
            "properties": {
                "$current_url": "https://x.com/?ref=abc",
                "$set": { "email": "a@b.c" },
                "$set_once": { "initial_referrer": "direct" },
            }
        }))
        .unwrap();

        let out = extract(&s, input).unwrap();

        assert_eq!(
            props(&out).get("$set"),
            Some(&json!({ "email": "a@b.c", "ref": "abc" }))
        );
        assert_eq!(
            props(&out).get("$set_once"),
            Some(&json!({ "initial_referrer": "direct", "initial_ref": "abc" }))
        );
    }

    #[test]
    fn test_mirroring_disabled() {
        let s = settings("false", "", "", "false", "false", "ref");
        let out = extract(&s, pageview(json!("https://x.com/?ref=abc"))).unwrap();

        assert_eq!(props(&out).get("ref"), Some(&json!("abc")));
        assert_eq!(props(&out).get("$set"), None);
        assert_eq!(props(&out).get("$set_once"), None);
    }

    #[test]
    fn test_empty_value_skipped() {
        let s = settings("false", "", "", "true", "true", "ref");
        let input = pageview(json!("https://x.com/?ref="));

        assert_eq!(extract(&s, input.clone()).unwrap(), input);
    }

    #[test]
    fn test_no_parameters_configured() {
        let s = settings("false", "", "", "true", "true", "");
        let input = pageview(json!("https://x.com/?ref=abc"));

        assert_eq!(extract(&s, input.clone()).unwrap(), input);
    }

    #[test]
    fn test_malformed_url_propagates() {
        let s = settings("false", "", "", "false", "false", "ref");
        let result = extract(&s, pageview(json!("not a url")));

        let err = result.unwrap_err();
        assert!(err.downcast_ref::<url::ParseError>().is_some());
    }

    #[test]
    fn test_malformed_url_fails_even_without_parameters() {
        let s = settings("false", "", "", "false", "false", "");
        assert!(extract(&s, pageview(json!("/relative?ref=abc"))).is_err());
    }

    #[test]
    fn test_non_string_url_fails() {
        let s = settings("false", "", "", "false", "false", "ref");
        assert!(extract(&s, pageview(json!(12))).is_err());
    }
}
