mod assembler;
mod batch;
mod normalize;
mod url_merge;

pub use assembler::{assemble, build_campaign_name, build_content, CampaignFields, OutputParams};
pub use batch::{
    check_required, process_batch, process_batch_with_progress, tag_url, BatchRow,
    CampaignRequest,
};
pub use normalize::{enforce_max_len, is_code, is_placeholder, normalize};
#[allow(deprecated)]
pub use url_merge::{merge, merge_overwrite};
