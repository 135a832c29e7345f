use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::common::constants::DEFAULT_SETTINGS_PATH;

/// Maximum lengths per field, in characters. 0 disables the check.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct FieldLimits {
    pub salesforce_id: usize,
    pub region: usize,
    pub short_name: usize,
    pub activity: usize,
    pub country: usize,
    pub language: usize,
    pub format: usize,
    pub audience: usize,
    pub asset: usize,
    pub utm_campaign: usize,
    pub utm_content: usize,
    pub utm_term: usize,
}

impl Default for FieldLimits {
    fn default() -> Self {
        Self {
            salesforce_id: 18,
            region: 0,
            short_name: 20,
            activity: 10,
            country: 2,
            language: 2,
            format: 20,
            audience: 20,
            asset: 30,
            utm_campaign: 100,
            utm_content: 50,
            utm_term: 50,
        }
    }
}

/// Option lists and limits, loaded once and shared read-only by every URL of a batch
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub utm_sources: Vec<String>,
    pub utm_mediums: Vec<String>,
    /// Display name to campaign token
    pub vehicle_models: BTreeMap<String, String>,
    /// Model token to allowed engine tokens
    pub vehicle_engines: BTreeMap<String, Vec<String>>,
    /// Keyed by utm_medium
    pub formats: BTreeMap<String, Vec<String>>,
    /// Keyed by utm_medium
    pub audiences: BTreeMap<String, Vec<String>>,
    /// Campaign phase name to utm_content code
    pub phase_codes: BTreeMap<String, String>,
    pub limits: FieldLimits,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn pairs(values: &[(&str, &str)]) -> BTreeMap<String, String> {
    values
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl Default for Settings {
    fn default() -> Self {
        let vehicle_models = pairs(&[
            ("Grecale", "grecale"),
            ("GranTurismo", "granturismo"),
            ("GranCabrio", "grancabrio"),
            ("MC20", "mc20"),
            ("MCPura", "mcpura"),
            ("MCPura Cielo", "mcpura-cielo"),
        ]);
        let vehicle_engines = [
            ("grecale", strings(&["ice", "hev", "bev"])),
            ("granturismo", strings(&["ice", "bev"])),
            ("grancabrio", strings(&["ice", "bev"])),
            ("mc20", strings(&["ice"])),
            ("mcpura", strings(&["ice"])),
            ("mcpura-cielo", strings(&["ice"])),
        ]
        .into_iter()
        .map(|(token, allowed)| (token.to_string(), allowed))
        .collect();

        let mut formats = BTreeMap::new();
        formats.insert(
            "paid-search".to_string(),
            strings(&["text", "responsive", "pmax"]),
        );
        formats.insert(
            "paid-social".to_string(),
            strings(&["image", "video", "carousel", "story", "reel"]),
        );
        formats.insert(
            "display".to_string(),
            strings(&["banner", "video", "native"]),
        );

        let mut audiences = BTreeMap::new();
        audiences.insert(
            "paid-search".to_string(),
            strings(&["brand", "generic", "competitor"]),
        );
        audiences.insert(
            "paid-social".to_string(),
            strings(&["prospecting", "retargeting", "lookalike"]),
        );
        audiences.insert(
            "display".to_string(),
            strings(&["prospecting", "retargeting"]),
        );

        Self {
            utm_sources: strings(&[
                "google",
                "meta",
                "facebook",
                "instagram",
                "linkedin",
                "tiktok",
                "youtube",
                "newsletter",
                "crm",
                "partner",
            ]),
            utm_mediums: strings(&[
                "paid-search",
                "paid-social",
                "organic-social",
                "display",
                "email",
                "referral",
                "affiliate",
            ]),
            vehicle_models,
            vehicle_engines,
            formats,
            audiences,
            phase_codes: pairs(&[
                ("Awareness", "aw"),
                ("Consideration", "co"),
                ("Conversion", "cv"),
                ("Retention", "re"),
            ]),
            limits: FieldLimits::default(),
        }
    }
}

impl Settings {
    pub fn load(settings_file: &str) -> Result<Self> {
        let path = Path::new(settings_file);
        if !path.exists() {
            return Err(anyhow::anyhow!(
                "settings file not found at '{}'. Exiting...",
                settings_file
            ));
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", settings_file))?;

        let settings: Settings = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings file: {}", settings_file))?;

        info!("Settings loaded from '{}'.", settings_file);
        Ok(settings)
    }

    /// An explicit path must load; otherwise the default file is optional.
    pub fn resolve(explicit: Option<&str>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_SETTINGS_PATH).exists() => {
                Self::load(DEFAULT_SETTINGS_PATH)
            }
            None => {
                warn!(
                    "No '{}' found, using built-in option lists.",
                    DEFAULT_SETTINGS_PATH
                );
                Ok(Self::default())
            }
        }
    }

    /// Resolves a model display name (case-insensitive) to its token
    pub fn model_token(&self, model: &str) -> Option<&str> {
        let model = model.trim();
        self.vehicle_models
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(model))
            .map(|(_, token)| token.as_str())
    }

    pub fn engine_allowed(&self, model_token: &str, engine: &str) -> bool {
        match self.vehicle_engines.get(model_token) {
            Some(allowed) => allowed.iter().any(|e| e == engine),
            None => true,
        }
    }

    pub fn phase_code(&self, phase: &str) -> Option<&str> {
        let phase = phase.trim();
        self.phase_codes
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(phase))
            .map(|(_, code)| code.as_str())
    }

    /// True when `value` is in `options`, or when no options are configured.
    pub fn is_known_option(options: &[String], value: &str) -> bool {
        let known = options.is_empty() || options.iter().any(|o| o == value);
        if !known {
            debug!("'{}' not among {} configured options", value, options.len());
        }
        known
    }

    pub fn formats_for(&self, medium: &str) -> &[String] {
        self.formats.get(medium).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn audiences_for(&self, medium: &str) -> &[String] {
        self.audiences.get(medium).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_settings_load_valid() {
        let json_content = r#"{
            "utm_sources": ["google"],
            "utm_mediums": ["paid-search"],
            "vehicle_models": {"MCPura Cielo": "mcpura-cielo"},
            "vehicle_engines": {"mcpura-cielo": ["ice"]},
            "phase_codes": {"Awareness": "aw"},
            "limits": {"short_name": 5}
        }"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(json_content.as_bytes()).unwrap();
        let temp_path = temp_file.path().to_str().unwrap();

        let settings = Settings::load(temp_path).unwrap();
        assert_eq!(settings.utm_sources, vec!["google".to_string()]);
        assert_eq!(settings.model_token("mcpura cielo"), Some("mcpura-cielo"));
        assert_eq!(settings.limits.short_name, 5);
        // Omitted sections and limits keep their defaults
        assert_eq!(settings.limits.salesforce_id, 18);
        assert_eq!(settings.formats, Settings::default().formats);
    }

    #[test]
    fn test_settings_load_missing_file() {
        let result = Settings::load("nonexistent_file.json");
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_load_invalid_json() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"{ not json").unwrap();
        let result = Settings::load(temp_file.path().to_str().unwrap());
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_explicit_missing_is_error() {
        assert!(Settings::resolve(Some("missing/settings.json")).is_err());
    }

    #[test]
    fn test_default_lookups() {
        let settings = Settings::default();
        assert_eq!(settings.phase_code("awareness"), Some("aw"));
        assert_eq!(settings.phase_code("Launch"), None);
        assert_eq!(settings.model_token("Grecale"), Some("grecale"));
        assert!(settings.engine_allowed("grecale", "bev"));
        assert!(!settings.engine_allowed("mcpura-cielo", "bev"));
        assert!(settings.engine_allowed("unknown-model", "anything"));
        assert!(!settings.formats_for("paid-search").is_empty());
        assert!(settings.formats_for("email").is_empty());
    }

    #[test]
    fn test_is_known_option() {
        let options = vec!["google".to_string()];
        assert!(Settings::is_known_option(&options, "google"));
        assert!(!Settings::is_known_option(&options, "bing"));
        assert!(Settings::is_known_option(&[], "bing"));
    }
}
