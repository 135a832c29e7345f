pub mod constants;
pub mod time_utils;
pub mod types;

pub use time_utils::{current_yyyymm, is_valid_yyyymm};
pub use types::{Mode, ModeDescriptor, ParamKey, ProcessingStats, RequiredField, Separator};
