use log::debug;
use std::collections::HashSet;
use url::{form_urlencoded, Url};

use super::assembler::OutputParams;
use crate::errors::{TaggingError, TaggingResult};

fn validate_url(url: &str) -> TaggingResult<&str> {
    let trimmed = url.trim();
    let parsed = Url::parse(trimmed).map_err(|e| {
        debug!("Failed to parse URL '{}': {}", trimmed, e);
        TaggingError::InvalidUrl(trimmed.to_string())
    })?;

    if parsed.scheme().is_empty() || !parsed.has_host() || parsed.cannot_be_a_base() {
        return Err(TaggingError::InvalidUrl(trimmed.to_string()));
    }
    Ok(trimmed)
}

/// The caller's URL cut into its raw pieces. Nothing is decoded or re-encoded.
struct RawUrl<'a> {
    /// Scheme, authority and path exactly as given
    base: &'a str,
    segments: Vec<&'a str>,
    fragment: Option<&'a str>,
}

impl<'a> RawUrl<'a> {
    fn split(url: &'a str) -> Self {
        let (rest, fragment) = match url.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment)),
            None => (url, None),
        };
        let (base, query) = match rest.split_once('?') {
            Some((base, query)) => (base, query),
            None => (rest, ""),
        };
        let segments = query.split('&').filter(|s| !s.is_empty()).collect();
        RawUrl {
            base,
            segments,
            fragment,
        }
    }

    fn assemble(&self, segments: &[String]) -> String {
        let mut out = self.base.to_string();
        if !segments.is_empty() {
            out.push('?');
            out.push_str(&segments.join("&"));
        }
        if let Some(fragment) = self.fragment {
            out.push('#');
            out.push_str(fragment);
        }
        out
    }
}

/// Decoded key of a raw `key=value` segment, used only for comparison
fn segment_key(segment: &str) -> String {
    form_urlencoded::parse(segment.as_bytes())
        .next()
        .map(|(k, _)| k.into_owned())
        .unwrap_or_default()
}

fn encode_pair(key: &str, value: &str) -> String {
    form_urlencoded::Serializer::new(String::new())
        .append_pair(key, value)
        .finish()
}

/// Non-empty parameters, in order. Empty values are dropped rather than emitted as `key=`.
fn effective_params(params: &OutputParams) -> Vec<(&'static str, &str)> {
    params
        .iter()
        .filter_map(|(key, value)| {
            if value.is_empty() {
                debug!("Parameter '{}' has no value and is left off the URL", key);
                None
            } else {
                Some((key.as_str(), value))
            }
        })
        .collect()
}

/// Appends `params` to the URL's query.
///
/// Existing segments whose key is not being set are copied byte for byte, keeping
/// their order, duplicates and blank values. Segments whose key is being set are
/// removed, and the new values are form-encoded and appended in the order of
/// `params`. Everything before the `?` and the fragment are copied unchanged.
pub fn merge(url: &str, params: &OutputParams) -> TaggingResult<String> {
    let raw = RawUrl::split(validate_url(url)?);
    let new_params = effective_params(params);
    let new_keys: HashSet<&str> = new_params.iter().map(|(k, _)| *k).collect();

    let mut segments: Vec<String> = raw
        .segments
        .iter()
        .filter(|seg| !new_keys.contains(segment_key(seg).as_str()))
        .map(|seg| seg.to_string())
        .collect();
    debug!(
        "Keeping {} existing query segment(s), appending {}",
        segments.len(),
        new_params.len()
    );

    segments.extend(new_params.iter().map(|(k, v)| encode_pair(k, v)));
    Ok(raw.assemble(&segments))
}

/// Key to value overwrite of the existing query.
///
/// Repeated keys collapse into one entry holding the last value, at the position of
/// their first occurrence, and new keys land after all existing ones.
#[deprecated(note = "use `merge`, which keeps duplicate keys and appends in declared order")]
pub fn merge_overwrite(url: &str, params: &OutputParams) -> TaggingResult<String> {
    let raw = RawUrl::split(validate_url(url)?);

    let existing = raw
        .segments
        .iter()
        .map(|seg| (segment_key(seg), seg.to_string()));
    let updates = effective_params(params)
        .into_iter()
        .map(|(k, v)| (k.to_string(), encode_pair(k, v)));

    let mut query: Vec<(String, String)> = Vec::new();
    for (key, segment) in existing.chain(updates) {
        match query.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = segment,
            None => query.push((key, segment)),
        }
    }

    let segments: Vec<String> = query.into_iter().map(|(_, seg)| seg).collect();
    Ok(raw.assemble(&segments))
}
