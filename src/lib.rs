pub mod cli_args;
pub mod common;
pub mod errors;
pub mod export;
pub mod settings;
pub mod tagging;
pub mod url_fetcher;
