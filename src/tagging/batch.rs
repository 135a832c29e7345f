use indicatif::ProgressBar;
use log::{debug, error, info, warn};
use serde::Serialize;

use super::assembler::{assemble, CampaignFields};
use super::url_merge::merge;
use crate::common::constants::ERROR_MARKER;
use crate::common::{Mode, ProcessingStats, RequiredField, Separator};
use crate::errors::{TaggingError, TaggingResult};
use crate::settings::Settings;

/// Everything shared by the URLs of one batch
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignRequest {
    pub mode: Mode,
    pub separator: Separator,
    pub fields: CampaignFields,
}

/// One output line: the original URL and either the tagged URL or an error message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchRow {
    pub mode: Mode,
    pub original_url: String,
    pub tagged_url: String,
}

impl BatchRow {
    pub fn is_error(&self) -> bool {
        self.tagged_url.starts_with(ERROR_MARKER)
    }
}

/// Fails before any URL is touched when a mandatory input is blank.
pub fn check_required(request: &CampaignRequest, urls: &[String]) -> TaggingResult<()> {
    for field in request.mode.descriptor().required {
        let value = match field {
            RequiredField::SalesforceId => &request.fields.salesforce_id,
            RequiredField::Medium => &request.fields.medium,
        };
        if value.trim().is_empty() {
            error!("{} is required in {} mode", field.label(), request.mode);
            return Err(TaggingError::MissingRequiredField(field.label().to_string()));
        }
    }

    if urls.iter().all(|u| u.trim().is_empty()) {
        error!("No URLs supplied");
        return Err(TaggingError::MissingRequiredField("URL list".to_string()));
    }

    Ok(())
}

pub fn tag_url(request: &CampaignRequest, url: &str, settings: &Settings) -> TaggingResult<String> {
    let params = assemble(request.mode, request.separator, &request.fields, settings)?;
    debug!("Assembled {} parameter(s) for {}", params.len(), url);
    merge(url, &params)
}

pub fn process_batch(
    request: &CampaignRequest,
    urls: &[String],
    settings: &Settings,
) -> TaggingResult<Vec<BatchRow>> {
    process_batch_with_progress(request, urls, settings, &ProgressBar::hidden())
}

/// Tags every URL in order. Only the required-field check can fail the whole batch;
/// any other failure is written into that URL's row.
pub fn process_batch_with_progress(
    request: &CampaignRequest,
    urls: &[String],
    settings: &Settings,
    pb: &ProgressBar,
) -> TaggingResult<Vec<BatchRow>> {
    check_required(request, urls)?;

    let mut stats = ProcessingStats {
        total: urls.len(),
        ..Default::default()
    };
    let mut rows = Vec::with_capacity(urls.len());

    for (i, url) in urls.iter().enumerate() {
        pb.set_message(format!("Tagging URL {}/{}", i + 1, stats.total));

        let tagged_url = match tag_url(request, url, settings) {
            Ok(tagged) => {
                stats.successful += 1;
                debug!("Tagged URL {}/{}: {}", i + 1, stats.total, tagged);
                tagged
            }
            Err(e) => {
                stats.failed += 1;
                warn!("Failed to tag URL {}/{}: {} - Error: {}", i + 1, stats.total, url, e);
                format!("{}{}", ERROR_MARKER, e)
            }
        };

        rows.push(BatchRow {
            mode: request.mode,
            original_url: url.clone(),
            tagged_url,
        });
        pb.inc(1);
    }

    info!(
        "Tagged {} of {} URL(s) ({:.1}% success)",
        stats.successful,
        stats.total,
        stats.success_rate()
    );
    Ok(rows)
}
