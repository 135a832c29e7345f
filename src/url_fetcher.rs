use anyhow::{Context, Result};
use csv::ReaderBuilder;
use log::{debug, error};
use std::fs::File;
use std::path::Path;

use crate::cli_args::CommandLineArgs;

/// Collects the raw URLs of a batch from the command line and from files
pub struct UrlFetcher {
    pub urls: Vec<String>,
}

impl UrlFetcher {
    pub fn new(cli_args: &CommandLineArgs) -> Result<Self> {
        Self::from_sources(&cli_args.urls, &cli_args.src_files)
    }

    pub fn from_sources(urls: &[String], src_files: &[String]) -> Result<Self> {
        let mut fetcher = UrlFetcher { urls: Vec::new() };

        fetcher.urls.extend(clean_urls(urls));
        for file_path in src_files {
            let from_file = fetcher.urls_from_file(file_path)?;
            debug!("Read {} URL(s) from {}", from_file.len(), file_path);
            fetcher.urls.extend(from_file);
        }

        Ok(fetcher)
    }

    /// One URL per line, or several per line as CSV fields. There is no header row.
    fn urls_from_file(&self, file_path: &str) -> Result<Vec<String>> {
        let path = Path::new(file_path);
        if !path.exists() {
            error!("File '{}' not found. Skipping...", file_path);
            return Ok(Vec::new());
        }

        let file =
            File::open(path).with_context(|| format!("Failed to open URL file: {}", file_path))?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);
        let mut result = Vec::new();

        for record in reader.records() {
            let record =
                record.with_context(|| format!("Failed to read URL file: {}", file_path))?;
            result.extend(clean_urls(record.iter()));
        }

        Ok(result)
    }
}

fn clean_urls<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .map(|u| u.as_ref().trim().to_string())
        .filter(|u| !u.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_urls_from_args_are_trimmed() {
        let fetcher = UrlFetcher::from_sources(
            &["  https://a.com ".to_string(), "   ".to_string()],
            &[],
        )
        .unwrap();
        assert_eq!(fetcher.urls, vec!["https://a.com"]);
    }

    #[test]
    fn test_urls_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "https://a.com/one").unwrap();
        writeln!(temp_file).unwrap();
        writeln!(temp_file, "https://b.com/two, https://c.com/three").unwrap();
        writeln!(temp_file, "\"https://d.com/?x=1,2\"").unwrap();

        let fetcher = UrlFetcher::from_sources(
            &["https://first.com".to_string()],
            &[temp_file.path().to_str().unwrap().to_string()],
        )
        .unwrap();
        assert_eq!(
            fetcher.urls,
            vec![
                "https://first.com",
                "https://a.com/one",
                "https://b.com/two",
                "https://c.com/three",
                "https://d.com/?x=1,2",
            ]
        );
    }

    #[test]
    fn test_missing_file_is_skipped() {
        let fetcher =
            UrlFetcher::from_sources(&[], &["does/not/exist.txt".to_string()]).unwrap();
        assert!(fetcher.urls.is_empty());
    }
}
