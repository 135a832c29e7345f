use tempfile::tempdir;
use utm_builder::common::{Mode, ParamKey, Separator};
use utm_builder::errors::TaggingError;
use utm_builder::settings::Settings;
use utm_builder::*;

#[cfg(test)]
mod tests {
    use super::*;
    use tagging::{CampaignFields, CampaignRequest};

    struct TestUrls;
    impl TestUrls {
        const LANDING: &'static str = "https://x.com/landing";
        const WITH_QUERY: &'static str = "https://a.com/p?x=1";
        const WITH_OLD_SOURCE: &'static str = "https://a.com?utm_source=old";
        const WITH_FRAGMENT: &'static str = "https://shop.example.com/cars/grecale?ref=home&ref=nav#specs";
        const INVALID_NOT_URL: &'static str = "not-a-url";
    }

    struct TestData;
    impl TestData {
        const SF_ID: &'static str = "701D0000000v4Gf";
        const CAMPAIGN: &'static str = "hq_crm_dstck_td_it_202501_it_mcpura-cielo_ice";
    }

    fn media_request() -> CampaignRequest {
        CampaignRequest {
            mode: Mode::Media,
            separator: Separator::Underscore,
            fields: CampaignFields {
                salesforce_id: TestData::SF_ID.to_string(),
                region: "HQ CRM".to_string(),
                short_name: "dstck".to_string(),
                activity: "td".to_string(),
                country: "IT".to_string(),
                yyyymm: "202501".to_string(),
                language: "IT".to_string(),
                model: "mcpura-cielo".to_string(),
                engine: "ice".to_string(),
                source: "google".to_string(),
                medium: "paid-search".to_string(),
                phase: "Awareness".to_string(),
                ..Default::default()
            },
        }
    }

    fn query_pairs(url: &str) -> Vec<(String, String)> {
        url::Url::parse(url)
            .unwrap()
            .query_pairs()
            .into_owned()
            .collect()
    }

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn test_end_to_end_media() {
        let rows = tagging::process_batch(
            &media_request(),
            &[TestUrls::LANDING.to_string()],
            &Settings::default(),
        )
        .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].mode, Mode::Media);
        assert_eq!(rows[0].original_url, TestUrls::LANDING);

        let pairs = query_pairs(&rows[0].tagged_url);
        assert_eq!(
            pairs,
            vec![
                pair("campaignName", TestData::SF_ID),
                pair("wtl_source", TestData::SF_ID),
                pair("utm_medium", "paid-search"),
                pair("utm_source", "google"),
                pair("utm_campaign", TestData::CAMPAIGN),
                pair("utm_content", "aw"),
            ]
        );
        assert!(rows[0].tagged_url.starts_with("https://x.com/landing?"));
        assert!(!rows[0].tagged_url.contains("utm_term"));
    }

    #[test]
    fn test_crm_mode_only_salesforce_params() {
        let mut request = media_request();
        request.mode = Mode::Crm;
        let rows = tagging::process_batch(
            &request,
            &[TestUrls::WITH_QUERY.to_string()],
            &Settings::default(),
        )
        .unwrap();

        assert_eq!(
            query_pairs(&rows[0].tagged_url),
            vec![
                pair("x", "1"),
                pair("campaignName", TestData::SF_ID),
                pair("wtl_source", TestData::SF_ID),
            ]
        );
    }

    #[test]
    fn test_merge_properties() {
        let source = tagging::OutputParams::new(vec![(ParamKey::UtmSource, "google".to_string())]);

        assert_eq!(
            tagging::merge(TestUrls::WITH_QUERY, &source).unwrap(),
            "https://a.com/p?x=1&utm_source=google"
        );

        let replaced = tagging::merge(TestUrls::WITH_OLD_SOURCE, &source).unwrap();
        assert_eq!(query_pairs(&replaced), vec![pair("utm_source", "google")]);

        assert_eq!(
            tagging::merge(TestUrls::INVALID_NOT_URL, &source),
            Err(TaggingError::InvalidUrl(TestUrls::INVALID_NOT_URL.to_string()))
        );
    }

    #[test]
    fn test_existing_params_and_fragment_survive() {
        let rows = tagging::process_batch(
            &media_request(),
            &[TestUrls::WITH_FRAGMENT.to_string()],
            &Settings::default(),
        )
        .unwrap();

        let tagged = &rows[0].tagged_url;
        assert!(tagged.starts_with("https://shop.example.com/cars/grecale?ref=home&ref=nav&"));
        assert!(tagged.ends_with("#specs"));
    }

    #[test]
    fn test_row_level_failures_do_not_abort_batch() {
        let rows = tagging::process_batch(
            &media_request(),
            &[
                TestUrls::INVALID_NOT_URL.to_string(),
                TestUrls::LANDING.to_string(),
            ],
            &Settings::default(),
        )
        .unwrap();

        assert!(rows[0].is_error());
        assert!(rows[0].tagged_url.starts_with("ERROR: "));
        assert!(!rows[1].is_error());
    }

    #[test]
    fn test_missing_medium_aborts_batch() {
        let mut request = media_request();
        request.fields.medium = " ".to_string();
        let result = tagging::process_batch(
            &request,
            &[TestUrls::LANDING.to_string()],
            &Settings::default(),
        );
        assert_eq!(
            result,
            Err(TaggingError::MissingRequiredField("utm_medium".to_string()))
        );
    }

    #[test]
    fn test_empty_url_list_aborts_batch() {
        let result = tagging::process_batch(&media_request(), &[], &Settings::default());
        assert!(matches!(result, Err(TaggingError::MissingRequiredField(_))));
    }

    #[test]
    fn test_override_with_hyphen_separator() {
        let mut request = media_request();
        request.separator = Separator::Hyphen;
        request.fields.campaign_override = "Black Friday – Été".to_string();

        let tagged = tagging::tag_url(&request, TestUrls::LANDING, &Settings::default()).unwrap();
        let pairs = query_pairs(&tagged);
        assert!(pairs.contains(&pair("utm_campaign", "black-friday-ete")));
        assert!(pairs.contains(&pair("campaignName", TestData::SF_ID)));
    }

    #[test]
    fn test_csv_export_round_trip() {
        let rows = tagging::process_batch(
            &media_request(),
            &[
                TestUrls::LANDING.to_string(),
                TestUrls::INVALID_NOT_URL.to_string(),
            ],
            &Settings::default(),
        )
        .unwrap();

        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("utm_output.csv");
        export::save_csv(path.to_str().unwrap(), &rows).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(
            reader.headers().unwrap().iter().collect::<Vec<_>>(),
            vec!["mode", "original_url", "tagged_url"]
        );
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][0], "Media");
        assert_eq!(&records[0][2], rows[0].tagged_url.as_str());
        assert!(records[1][2].starts_with("ERROR: "));
    }

    #[test]
    fn test_settings_file_drives_limits() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "limits": { "activity": 1 } }"#).unwrap();

        let settings = Settings::load(path.to_str().unwrap()).unwrap();
        let tagged = tagging::tag_url(&media_request(), TestUrls::LANDING, &settings);
        match tagged {
            Err(TaggingError::Validation { label, actual, max }) => {
                assert_eq!(label, "activity");
                assert_eq!(actual, 2);
                assert_eq!(max, 1);
            }
            other => panic!("expected a validation error, got {:?}", other),
        }
    }
}
