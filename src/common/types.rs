use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Business context controlling which parameters end up on a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
pub enum Mode {
    #[serde(rename = "CRM")]
    Crm,
    Media,
    Social,
    Dealer,
}

/// Query parameter keys the tool is able to emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKey {
    CampaignName,
    WtlSource,
    UtmSource,
    UtmMedium,
    UtmCampaign,
    UtmContent,
    UtmTerm,
}

impl ParamKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamKey::CampaignName => "campaignName",
            ParamKey::WtlSource => "wtl_source",
            ParamKey::UtmSource => "utm_source",
            ParamKey::UtmMedium => "utm_medium",
            ParamKey::UtmCampaign => "utm_campaign",
            ParamKey::UtmContent => "utm_content",
            ParamKey::UtmTerm => "utm_term",
        }
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    SalesforceId,
    Medium,
}

impl RequiredField {
    pub fn label(&self) -> &'static str {
        match self {
            RequiredField::SalesforceId => "Salesforce campaign ID",
            RequiredField::Medium => "utm_medium",
        }
    }
}

/// Per-mode rules, consulted once per batch
#[derive(Debug)]
pub struct ModeDescriptor {
    /// Emission order of the output parameters
    pub permitted: &'static [ParamKey],
    /// Enables source/medium/content/format/audience handling
    pub media_builder: bool,
    pub required: &'static [RequiredField],
}

const MEDIA_KEYS: &[ParamKey] = &[
    ParamKey::CampaignName,
    ParamKey::WtlSource,
    ParamKey::UtmMedium,
    ParamKey::UtmSource,
    ParamKey::UtmCampaign,
    ParamKey::UtmContent,
    ParamKey::UtmTerm,
];

static CRM: ModeDescriptor = ModeDescriptor {
    permitted: &[ParamKey::CampaignName, ParamKey::WtlSource],
    media_builder: false,
    required: &[RequiredField::SalesforceId],
};

static MEDIA: ModeDescriptor = ModeDescriptor {
    permitted: MEDIA_KEYS,
    media_builder: true,
    required: &[RequiredField::SalesforceId, RequiredField::Medium],
};

static SOCIAL: ModeDescriptor = ModeDescriptor {
    permitted: MEDIA_KEYS,
    media_builder: true,
    required: &[RequiredField::SalesforceId, RequiredField::Medium],
};

static DEALER: ModeDescriptor = ModeDescriptor {
    permitted: &[
        ParamKey::CampaignName,
        ParamKey::WtlSource,
        ParamKey::UtmCampaign,
    ],
    media_builder: false,
    required: &[RequiredField::SalesforceId],
};

impl Mode {
    pub fn descriptor(&self) -> &'static ModeDescriptor {
        match self {
            Mode::Crm => &CRM,
            Mode::Media => &MEDIA,
            Mode::Social => &SOCIAL,
            Mode::Dealer => &DEALER,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mode::Crm => "CRM",
            Mode::Media => "Media",
            Mode::Social => "Social",
            Mode::Dealer => "Dealer",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Character joining slug words and campaign tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Separator {
    #[default]
    Underscore,
    Hyphen,
}

impl Separator {
    pub fn as_char(&self) -> char {
        match self {
            Separator::Underscore => '_',
            Separator::Hyphen => '-',
        }
    }
}

impl FromStr for Separator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "_" => Ok(Separator::Underscore),
            "-" => Ok(Separator::Hyphen),
            other => Err(format!("separator must be '_' or '-', got '{}'", other)),
        }
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Processing statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub successful: usize,
    pub failed: usize,
    pub total: usize,
}

impl ProcessingStats {
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.successful as f64 / self.total as f64 * 100.0
        }
    }
}
