use crate::core::models::event::PluginEvent;
use anyhow::{Context, Result};
use url::Url;

/// The decoded query string of an event url, kept as an ordered multimap.
/// Lookups return the first occurrence of a name, later duplicates are shadowed
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn from_url(url: &Url) -> Self {
        QueryParams {
            pairs: url
                .query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        }
    }

    /// Parses a raw url string. A string which is not an absolute url
    /// is an error, the underlying ['url::ParseError'] is kept as the cause
    pub fn parse(raw_url: &str) -> Result<Self> {
        let url = Url::parse(raw_url).with_context(|| format!("invalid url '{}'", raw_url))?;

        Ok(Self::from_url(&url))
    }

    /// Extracts the query of the event's current url, case folding every
    /// parameter name if `ignore_case` is set.
    ///
    /// Returns `Ok(None)` if the event has no current url to work with
    pub fn from_event(event: &PluginEvent, ignore_case: bool) -> Result<Option<Self>> {
        let raw_url = match event.current_url()? {
            Some(raw_url) => raw_url,
            None => return Ok(None),
        };

        let params = Self::parse(raw_url)?;

        Ok(Some(if ignore_case {
            params.lowercased()
        } else {
            params
        }))
    }

    /// Lowercases every name, values are left alone
    pub fn lowercased(self) -> Self {
        QueryParams {
            pairs: self
                .pairs
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
