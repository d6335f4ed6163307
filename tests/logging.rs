extern crate chrono;
extern crate dagparse;
#[macro_use]
extern crate slog;
extern crate tempfile;

mod tests {
    use chrono::{TimeZone, Utc};

    use dagparse::logging::{self, Config, Error, Level};

    fn config_in(dir: &std::path::Path) -> Config {
        Config {
            level: Level::Debug,
            verbosity: Level::Off,
            logdir: dir.to_string_lossy().into_owned(),
            filename: "run-%Y%m%d.log".to_string(),
            filemode: 'n',
            ..Config::default()
        }
    }

    #[test]
    fn test_numbered_log_files() {
        let dir = tempfile::tempdir().unwrap();
        let time = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();
        let (logger, first) =
            logging::create_logger_with_kv_and_time(config_in(dir.path()), o!(), time).unwrap();
        info!(logger, "started"; "passage" => "p1");
        let first = first.unwrap();
        assert_eq!(first, dir.path().join("run-20200102-0.log"));
        assert!(first.exists());

        let (_, second) =
            logging::create_logger_with_kv_and_time(config_in(dir.path()), o!(), time).unwrap();
        assert_eq!(second.unwrap(), dir.path().join("run-20200102-1.log"));
    }

    #[test]
    fn test_logger_options() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            filemode: 'x',
            ..config_in(dir.path())
        };
        match logging::create_logger(config) {
            Err(Error::InvalidOption('x')) => {}
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }

        let config = Config {
            logdir: dir.path().join("missing").to_string_lossy().into_owned(),
            ..config_in(dir.path())
        };
        assert!(logging::create_logger(config).is_err());

        let config = Config {
            logdir: dir.path().join("created").to_string_lossy().into_owned(),
            mkdir: true,
            fileprefix: Some("dev-".to_string()),
            ..config_in(dir.path())
        };
        let time = Utc.with_ymd_and_hms(2021, 5, 6, 0, 0, 0).unwrap();
        let (_, path) = logging::create_logger_with_kv_and_time(config, o!(), time).unwrap();
        assert_eq!(
            path.unwrap(),
            dir.path().join("created").join("dev-run-20210506-0.log")
        );

        let disabled = Config {
            level: Level::Off,
            ..config_in(dir.path())
        };
        let (_, path) = logging::create_logger_with_kv_and_time(disabled, o!(), time).unwrap();
        assert!(path.is_none());
    }
}
