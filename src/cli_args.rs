use clap::Parser;
use log::info;

use crate::common::{Mode, Separator};
use crate::tagging::{CampaignFields, CampaignRequest};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineArgs {
    #[arg(long, value_enum, default_value = "media", ignore_case = true, help = "Business context")]
    pub mode: Mode,

    #[arg(long, default_value = "_", help = "Slug separator, '_' or '-'")]
    pub separator: Separator,

    #[arg(long, help = "Path to a settings.json with option lists and limits")]
    pub settings: Option<String>,

    #[arg(long = "url", help = "URL to tag (repeatable)")]
    pub urls: Vec<String>,

    #[arg(
        long = "src-files",
        value_delimiter = ',',
        help = "Comma-separated list of file paths containing URLs"
    )]
    pub src_files: Vec<String>,

    #[arg(long, help = "Write the results as CSV to this path")]
    pub output: Option<String>,

    #[arg(long = "sf-id", default_value = "", help = "Salesforce campaign ID")]
    pub salesforce_id: String,

    #[arg(long, default_value = "", help = "Manual utm_campaign value")]
    pub campaign: String,

    #[arg(long, default_value = "", help = "Region or department")]
    pub region: String,

    #[arg(long, default_value = "", help = "Campaign short name")]
    pub name: String,

    #[arg(long, default_value = "")]
    pub activity: String,

    #[arg(long, default_value = "")]
    pub country: String,

    #[arg(long, default_value = "", help = "Year and month as YYYYMM, defaults to now")]
    pub yyyymm: String,

    #[arg(long, default_value = "")]
    pub language: String,

    #[arg(long, default_value = "", help = "Vehicle model name or token")]
    pub model: String,

    #[arg(long, default_value = "", help = "Vehicle engine token")]
    pub engine: String,

    #[arg(long, default_value = "", help = "utm_source")]
    pub source: String,

    #[arg(long, default_value = "", help = "utm_medium")]
    pub medium: String,

    #[arg(long, default_value = "")]
    pub format: String,

    #[arg(long, default_value = "")]
    pub audience: String,

    #[arg(long, default_value = "", help = "Campaign phase, mapped to its utm_content code")]
    pub phase: String,

    #[arg(long, default_value = "", help = "Targeting code appended to utm_content")]
    pub targeting: String,

    #[arg(long, default_value = "", help = "Asset reference appended to utm_content")]
    pub asset: String,

    #[arg(long, default_value = "", help = "utm_term")]
    pub term: String,
}

impl CommandLineArgs {
    pub fn parse_args() -> Self {
        let args = CommandLineArgs::parse();

        info!("Mode: {}, separator: '{}'", args.mode, args.separator);
        info!("Parsed {} URL(s) from --url", args.urls.len());
        info!("Parsed {} file(s) from --src-files", args.src_files.len());

        args
    }

    pub fn campaign_request(&self) -> CampaignRequest {
        CampaignRequest {
            mode: self.mode,
            separator: self.separator,
            fields: CampaignFields {
                salesforce_id: self.salesforce_id.clone(),
                campaign_override: self.campaign.clone(),
                region: self.region.clone(),
                short_name: self.name.clone(),
                activity: self.activity.clone(),
                country: self.country.clone(),
                yyyymm: self.yyyymm.clone(),
                language: self.language.clone(),
                model: self.model.clone(),
                engine: self.engine.clone(),
                source: self.source.clone(),
                medium: self.medium.clone(),
                format: self.format.clone(),
                audience: self.audience.clone(),
                phase: self.phase.clone(),
                targeting: self.targeting.clone(),
                asset: self.asset.clone(),
                term: self.term.clone(),
            },
        }
    }
}
