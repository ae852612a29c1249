#[cfg(test)]
mod tests {
    use crate::algorithms::expander::{expand_visits, BandPlan, VisitTarget, VisitTemplate};
    use crate::core::domain::{Band, SkyPosition};
    use crate::io::checksum::record_checksum;
    use crate::io::loaders::{generate_from_files, ConfigLoader, GridLoader, RecordWriter};
    use crate::time::ModifiedJulianDate;
    use std::io::Write;
    use std::path::Path;
    use tempfile::NamedTempFile;

    fn temp_file(content: &str, suffix: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    /// Test loading a grid file
    #[test]
    fn test_load_grid_file() {
        let file = temp_file(
            r#"{"mjd": [1.0, 2.0], "sun_alt": [-30.0, -30.0], "night": [1, 2],
                "fields": {"COSMOS": {"airmass": [1.1, 1.2], "m5_g": [24.0, 24.1]}}}"#,
            ".json",
        );
        let grid = GridLoader::load_from_file(file.path()).unwrap();
        assert_eq!(grid.len(), 2);
        assert!(grid.has_field("COSMOS"));
    }

    /// Test that errors name the offending file
    #[test]
    fn test_load_grid_errors_have_context() {
        let err = GridLoader::load_from_file(Path::new("/nonexistent/grid.json")).unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/grid.json"));

        let bad = temp_file(r#"{"mjd": [1.0], "sun_alt": [], "night": [1]}"#, ".json");
        let err = GridLoader::load_from_file(bad.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("sun_alt"));
    }

    /// Test loading an explicit TOML config
    #[test]
    fn test_load_config_file() {
        let file = temp_file(
            r#"
            [run]
            survey_length = 1.0

            [[fields]]
            name = "XMM_LSS"
            "#,
            ".toml",
        );
        let config = ConfigLoader::load(Some(file.path())).unwrap();
        assert_eq!(config.field_names(), vec!["XMM_LSS"]);
        assert_eq!(config.run.survey_length, 1.0);
    }

    /// Test that a survey table replaces the configured fields
    #[test]
    fn test_load_with_survey_table() {
        let config_file = temp_file("[run]\nsurvey_length = 2.0\n", ".toml");
        let survey_file = temp_file(
            r#"[
                {"field": "COSMOS", "season": 1, "season_seq": 40,
                 "u": 4, "g": 5, "r": 10, "i": 10, "z": 12, "y": 9, "season_length": 190.0},
                {"field": "COSMOS", "season": 2, "season_seq": 25,
                 "u": 4, "g": 5, "r": 10, "i": 10, "z": 12, "y": 9, "season_length": 190.0}
            ]"#,
            ".json",
        );
        let config =
            ConfigLoader::load_with_survey(Some(config_file.path()), Some(survey_file.path()))
                .unwrap();
        assert_eq!(config.field_names(), vec!["COSMOS"]);
        let cosmos = config.field("COSMOS").unwrap();
        assert_eq!(cosmos.demand.season_seq, vec![40, 25]);
        assert_eq!(cosmos.demand.boost_early_factor, Some(5.0));
        assert_eq!(config.run.survey_length, 2.0);
    }

    /// Test writing and reading back records
    #[test]
    fn test_write_and_read_records() {
        let records = expand_visits(
            &[VisitTarget::new("ECDFS", SkyPosition::new(53.125, -28.1))],
            &[ModifiedJulianDate::new(60800.1)],
            &[BandPlan::uniform(Band::I, 3, 2)],
            &[],
            &VisitTemplate::default(),
        );
        let out = NamedTempFile::new().unwrap();

        let checksum = RecordWriter::write_json(out.path(), &records).unwrap();
        assert_eq!(checksum, record_checksum(&records).unwrap());

        let back = RecordWriter::read_json(out.path()).unwrap();
        assert_eq!(back.len(), 3);
        assert_eq!(back[2].visit, 2);
        assert_eq!(back[0].band, Band::I);
        assert_eq!(back[0].target_name, "DD:ECDFS");
    }

    /// Grid of `nights` nights, four dark samples each, for `field`.
    fn grid_json(nights: usize, field: &str) -> String {
        let mut mjd = Vec::new();
        let mut night = Vec::new();
        for n in 0..nights {
            for k in 0..4 {
                mjd.push(60796.0 + n as f64 + 0.1 + 0.05 * k as f64);
                night.push(n as i64);
            }
        }
        let len = mjd.len();
        serde_json::json!({
            "mjd": mjd,
            "sun_alt": vec![-30.0; len],
            "night": night,
            "fields": {
                field: {"airmass": vec![1.2; len], "m5_g": vec![24.0; len]}
            }
        })
        .to_string()
    }

    /// Test that the survey table reaches file-based generation
    #[test]
    fn test_generate_from_files_with_survey_table() {
        let grid = temp_file(&grid_json(365, "COSMOS"), ".json");
        let config = temp_file(
            "[run]\nsurvey_length = 1.0\n\n[[fields]]\nname = \"COSMOS\"\n",
            ".toml",
        );
        let survey = temp_file(
            r#"[{"field": "COSMOS", "season": 1, "season_seq": 40,
                 "u": 1, "g": 0, "r": 0, "i": 0, "z": 0, "y": 0, "season_length": 200.0}]"#,
            ".json",
        );

        let plain = generate_from_files(grid.path(), Some(config.path()), None).unwrap();
        let surveyed =
            generate_from_files(grid.path(), Some(config.path()), Some(survey.path())).unwrap();

        assert!(!surveyed.is_empty());
        assert!(surveyed.iter().all(|r| r.band == Band::U));
        assert_ne!(
            record_checksum(&plain).unwrap(),
            record_checksum(&surveyed).unwrap()
        );
    }
}
