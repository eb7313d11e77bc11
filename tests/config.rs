#[cfg(test)]
mod tests {
    use chrono::Duration;
    use restwatch::libs::config::{parse_margin_secs, seconds, Config, ExportConfig, TrackerConfig, CONFIG_FILE_NAME};
    use restwatch::libs::data_storage::DataStorage;
    use restwatch::libs::error::TrackerError;
    use restwatch::libs::export::ExportFormat;
    use std::path::PathBuf;
    use std::sync::{Mutex, MutexGuard};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    // The data directory comes from process-wide environment variables.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Points the data directory at a fresh temporary home for each test.
    struct ConfigTestContext {
        _guard: MutexGuard<'static, ()>,
        _temp_dir: TempDir,
    }

    impl TestContext for ConfigTestContext {
        fn setup() -> Self {
            let guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
            let temp_dir = tempfile::tempdir().unwrap();
            std::env::set_var("HOME", temp_dir.path());
            std::env::set_var("LOCALAPPDATA", temp_dir.path());
            ConfigTestContext {
                _guard: guard,
                _temp_dir: temp_dir,
            }
        }
    }

    fn write_raw_config(content: &str) {
        let path = DataStorage::new().get_path(CONFIG_FILE_NAME).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.tracker.is_none());
        assert!(config.export.is_none());

        let tracker = TrackerConfig::default();
        assert_eq!(tracker.inactivity_margin, 10);
        assert_eq!(tracker.tick_interval, 100);
        assert!(tracker.breaks_enabled);
        assert_eq!(tracker.break_threshold, 3000);
        assert_eq!(tracker.break_duration, 600);
        assert!(tracker.seed_active_on_start);

        assert_eq!(ExportConfig::default().format, ExportFormat::Json);
        assert_eq!(ExportConfig::default().directory, None);
    }

    #[test]
    fn test_default_settings() {
        let settings = TrackerConfig::default().settings().unwrap();
        assert_eq!(settings.inactivity_margin, Duration::seconds(10));
        assert_eq!(settings.tick_interval, Duration::milliseconds(100));
        assert_eq!(settings.break_threshold, Duration::minutes(50));
        assert_eq!(settings.break_duration, Duration::minutes(10));
    }

    #[test]
    fn test_settings_validation() {
        let config = TrackerConfig {
            inactivity_margin: 0,
            ..TrackerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TrackerError::InvalidSetting { name: "inactivity_margin", .. })
        ));

        let config = TrackerConfig {
            break_threshold: 0,
            ..TrackerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TrackerError::InvalidSetting { name: "break_threshold", .. })
        ));

        // Break settings are irrelevant while breaks are disabled.
        let config = TrackerConfig {
            breaks_enabled: false,
            break_threshold: 0,
            break_duration: 0,
            ..TrackerConfig::default()
        };
        assert!(config.validate().is_ok());

        let config = TrackerConfig {
            inactivity_margin: u64::MAX,
            ..TrackerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_seconds() {
        assert_eq!(seconds("value", 90).unwrap(), Duration::seconds(90));
        assert!(seconds("value", 0).is_err());
    }

    #[test]
    fn test_parse_margin_secs() {
        assert_eq!(parse_margin_secs("15").unwrap(), Duration::seconds(15));
        assert_eq!(parse_margin_secs("  5 ").unwrap(), Duration::seconds(5));

        for input in ["", "0", "-3", "2.5", "ten", "1e3"] {
            assert!(parse_margin_secs(input).is_err(), "{input:?} should be rejected");
        }
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_read_nonexistent_config(_ctx: &mut ConfigTestContext) {
        let config = Config::read().unwrap();
        assert!(config.tracker.is_none());
        assert!(config.export.is_none());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_save_and_read_config(_ctx: &mut ConfigTestContext) {
        let config = Config {
            tracker: Some(TrackerConfig {
                inactivity_margin: 30,
                tick_interval: 250,
                breaks_enabled: true,
                break_threshold: 1800,
                break_duration: 300,
                seed_active_on_start: false,
            }),
            export: Some(ExportConfig {
                format: ExportFormat::Csv,
                directory: Some(PathBuf::from("/tmp/reports")),
            }),
        };
        config.save().unwrap();

        let read_config = Config::read().unwrap();
        assert_eq!(read_config.tracker, config.tracker);
        assert_eq!(read_config.export, config.export);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_partial_config(_ctx: &mut ConfigTestContext) {
        write_raw_config(r#"{ "export": { "format": "excel" } }"#);

        let config = Config::read().unwrap();
        assert!(config.tracker.is_none());
        let export = config.export.unwrap();
        assert_eq!(export.format, ExportFormat::Excel);
        assert_eq!(export.directory, None);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_save_rejects_invalid_tracker(_ctx: &mut ConfigTestContext) {
        let config = Config {
            tracker: Some(TrackerConfig {
                tick_interval: 0,
                ..TrackerConfig::default()
            }),
            export: None,
        };
        assert!(config.save().is_err());
        assert!(Config::read().unwrap().tracker.is_none());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_read_rejects_invalid_tracker(_ctx: &mut ConfigTestContext) {
        let invalid = TrackerConfig {
            inactivity_margin: 0,
            ..TrackerConfig::default()
        };
        write_raw_config(&serde_json::json!({ "tracker": invalid }).to_string());

        assert!(Config::read().is_err());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_delete_config(_ctx: &mut ConfigTestContext) {
        assert!(!Config::delete().unwrap());

        Config::default().save().unwrap();
        assert!(Config::delete().unwrap());
        assert!(!Config::delete().unwrap());
    }
}
