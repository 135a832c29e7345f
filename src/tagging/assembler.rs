use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::normalize::{enforce_max_len, is_code, is_placeholder, normalize};
use crate::common::{current_yyyymm, is_valid_yyyymm, Mode, ParamKey, Separator};
use crate::errors::TaggingResult;
use crate::settings::Settings;

/// Raw, user-supplied campaign inputs
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CampaignFields {
    pub salesforce_id: String,
    /// Replaces the concatenated utm_campaign when non-blank
    pub campaign_override: String,
    pub region: String,
    pub short_name: String,
    pub activity: String,
    pub country: String,
    /// Defaults to the current month when blank
    pub yyyymm: String,
    pub language: String,
    pub model: String,
    pub engine: String,
    pub source: String,
    pub medium: String,
    pub format: String,
    pub audience: String,
    pub phase: String,
    pub targeting: String,
    pub asset: String,
    pub term: String,
}

/// Output parameters in emission order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputParams {
    pairs: Vec<(ParamKey, String)>,
}

impl OutputParams {
    pub fn new(pairs: Vec<(ParamKey, String)>) -> Self {
        Self { pairs }
    }

    pub fn get(&self, key: ParamKey) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> Vec<ParamKey> {
        self.pairs.iter().map(|(k, _)| *k).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ParamKey, &str)> {
        self.pairs.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

enum CampaignToken<'a> {
    Free {
        label: &'static str,
        raw: &'a str,
        max: usize,
    },
    Literal(&'a str),
}

/// Builds the parameters a URL should carry for `mode`.
///
/// `campaignName` and `wtl_source` carry the Salesforce ID as typed. `utm_campaign`
/// is the normalized manual override when one is given, otherwise the field tokens
/// joined in their declared order. The campaign name is only built, and only
/// length-checked, when the mode emits `utm_campaign`. Other values for keys the
/// mode does not permit are computed and then dropped.
pub fn assemble(
    mode: Mode,
    sep: Separator,
    fields: &CampaignFields,
    settings: &Settings,
) -> TaggingResult<OutputParams> {
    let desc = mode.descriptor();
    let limits = &settings.limits;

    let salesforce_id = enforce_max_len(
        "Salesforce campaign ID",
        fields.salesforce_id.trim(),
        limits.salesforce_id,
    )?;

    let mut computed = vec![
        (ParamKey::CampaignName, salesforce_id.clone()),
        (ParamKey::WtlSource, salesforce_id),
    ];

    if desc.permitted.contains(&ParamKey::UtmCampaign) {
        let campaign = if fields.campaign_override.trim().is_empty() {
            build_campaign_name(sep, fields, settings, desc.media_builder)?
        } else {
            debug!("Using manual campaign name '{}'", fields.campaign_override);
            normalize(&fields.campaign_override, sep)
        };
        let campaign = enforce_max_len("utm_campaign", &campaign, limits.utm_campaign)?;
        computed.push((ParamKey::UtmCampaign, campaign));
    } else {
        debug!("{} mode does not emit utm_campaign, skipping campaign fields", mode);
    }

    if desc.media_builder {
        let source = fields.source.trim().to_string();
        let medium = fields.medium.trim().to_string();
        if !source.is_empty() && !Settings::is_known_option(&settings.utm_sources, &source) {
            warn!("utm_source '{}' is not a configured option", source);
        }
        if !medium.is_empty() && !Settings::is_known_option(&settings.utm_mediums, &medium) {
            warn!("utm_medium '{}' is not a configured option", medium);
        }

        let content = enforce_max_len(
            "utm_content",
            &build_content(sep, fields, settings)?,
            limits.utm_content,
        )?;
        let term = enforce_max_len("utm_term", &normalize(&fields.term, sep), limits.utm_term)?;

        computed.push((ParamKey::UtmSource, source));
        computed.push((ParamKey::UtmMedium, medium));
        computed.push((ParamKey::UtmContent, content));
        computed.push((ParamKey::UtmTerm, term));
    }

    let pairs = desc
        .permitted
        .iter()
        .filter_map(|key| {
            computed
                .iter()
                .find(|(k, _)| k == key)
                .map(|(k, v)| (*k, v.clone()))
        })
        .collect();

    Ok(OutputParams::new(pairs))
}

/// Joins the normalized field tokens in their fixed order.
pub fn build_campaign_name(
    sep: Separator,
    fields: &CampaignFields,
    settings: &Settings,
    media_builder: bool,
) -> TaggingResult<String> {
    let limits = &settings.limits;
    let yyyymm = match fields.yyyymm.trim() {
        "" => current_yyyymm(),
        given => {
            if !is_valid_yyyymm(given) {
                warn!("Year-month '{}' is not in YYYYMM form", given);
            }
            given.to_string()
        }
    };
    let model = literal_code("vehicle model", resolve_model(&fields.model, settings));
    let engine = literal_code("vehicle engine", &fields.engine);
    if is_code(&model) && is_code(&engine) && !settings.engine_allowed(&model, &engine) {
        warn!("Engine '{}' is not listed for model '{}'", engine, model);
    }

    let mut tokens = vec![
        CampaignToken::Free {
            label: "region",
            raw: &fields.region,
            max: limits.region,
        },
        CampaignToken::Free {
            label: "short name",
            raw: &fields.short_name,
            max: limits.short_name,
        },
        CampaignToken::Free {
            label: "activity",
            raw: &fields.activity,
            max: limits.activity,
        },
        CampaignToken::Free {
            label: "country",
            raw: &fields.country,
            max: limits.country,
        },
        CampaignToken::Free {
            label: "year-month",
            raw: &yyyymm,
            max: 0,
        },
        CampaignToken::Free {
            label: "language",
            raw: &fields.language,
            max: limits.language,
        },
        CampaignToken::Literal(&model),
        CampaignToken::Literal(&engine),
    ];

    if media_builder {
        let medium = fields.medium.trim();
        check_listed("format", &fields.format, settings.formats_for(medium), sep);
        check_listed("audience", &fields.audience, settings.audiences_for(medium), sep);
        tokens.push(CampaignToken::Free {
            label: "format",
            raw: &fields.format,
            max: limits.format,
        });
        tokens.push(CampaignToken::Free {
            label: "audience",
            raw: &fields.audience,
            max: limits.audience,
        });
    }

    join_tokens(&tokens, sep)
}

/// Phase code, then targeting code, then asset reference.
pub fn build_content(
    sep: Separator,
    fields: &CampaignFields,
    settings: &Settings,
) -> TaggingResult<String> {
    let phase = match settings.phase_code(&fields.phase) {
        Some(code) => code.to_string(),
        None => fields.phase.clone(),
    };

    let tokens = [
        CampaignToken::Free {
            label: "phase",
            raw: &phase,
            max: 0,
        },
        CampaignToken::Free {
            label: "targeting",
            raw: &fields.targeting,
            max: 0,
        },
        CampaignToken::Free {
            label: "asset",
            raw: &fields.asset,
            max: settings.limits.asset,
        },
    ];

    join_tokens(&tokens, sep)
}

fn join_tokens(tokens: &[CampaignToken<'_>], sep: Separator) -> TaggingResult<String> {
    let mut parts = Vec::with_capacity(tokens.len());
    for token in tokens {
        let value = match token {
            CampaignToken::Free { label, raw, max } => {
                if is_placeholder(raw) {
                    continue;
                }
                enforce_max_len(label, &normalize(raw, sep), *max)?
            }
            CampaignToken::Literal(raw) => {
                if is_placeholder(raw) {
                    continue;
                }
                raw.trim().to_string()
            }
        };
        if !value.is_empty() {
            parts.push(value);
        }
    }
    Ok(parts.join(sep.to_string().as_str()))
}

fn resolve_model<'a>(model: &'a str, settings: &'a Settings) -> &'a str {
    settings.model_token(model).unwrap_or_else(|| model.trim())
}

/// Vehicle codes go into the campaign as they are. Anything else is folded into
/// a hyphenated code, so an unmapped name cannot put spaces or capitals in the URL.
fn literal_code(label: &str, raw: &str) -> String {
    let value = raw.trim();
    if value.is_empty() || is_placeholder(value) || is_code(value) {
        return value.to_string();
    }
    let code = normalize(value, Separator::Hyphen);
    warn!("{} '{}' is not a known code, using '{}'", label, value, code);
    code
}

fn check_listed(label: &str, raw: &str, options: &[String], sep: Separator) {
    if raw.trim().is_empty() || is_placeholder(raw) || options.is_empty() {
        return;
    }
    let slug = normalize(raw, sep);
    if !options.iter().any(|o| normalize(o, sep) == slug) {
        warn!("{} '{}' is not listed for the selected medium", label, raw);
    }
}
