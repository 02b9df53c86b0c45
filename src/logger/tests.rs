use std::io::Write;

use tempfile::TempDir;
use tracing_subscriber::fmt::MakeWriter;

use super::writer::LogFileWriter;
use super::*;

fn file_config(dir: &TempDir, append: bool) -> FileConfig {
    FileConfig {
        enabled: true,
        path: dir.path().join("nested/relay.log"),
        append,
        format: LogFormat::Json,
    }
}

#[test]
fn test_default_config_is_valid() {
    assert!(LoggerConfig::default().validate().is_ok());
}

#[test]
fn test_level_validation() {
    assert!(is_valid_level("info"));
    assert!(is_valid_level("WARN"));
    assert!(is_valid_level("info,fizzy_relay=debug,hyper=warn"));
    assert!(!is_valid_level(""));
    assert!(!is_valid_level("verbose"));
    assert!(!is_valid_level("info,fizzy_relay=loud"));
}

#[test]
fn test_rejects_all_outputs_disabled() {
    let config = LoggerConfig {
        console: ConsoleConfig {
            enabled: false,
            ..Default::default()
        },
        ..Default::default()
    };
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("At least one output"));
}

#[test]
fn test_rejects_empty_file_path() {
    let config = LoggerConfig {
        file: FileConfig {
            enabled: true,
            path: "".into(),
            ..Default::default()
        },
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_log_format_parsing() {
    assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
    assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
    assert_eq!(LogFormat::Full.to_string(), "full");
    assert!(matches!(
        "pretty".parse::<LogFormat>(),
        Err(LoggerError::Format { .. })
    ));
}

#[test]
fn test_writer_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let config = file_config(&dir, true);

    let writer = LogFileWriter::new(&config).unwrap();
    writer.make_writer().write_all(b"first\n").unwrap();

    assert_eq!(std::fs::read_to_string(&config.path).unwrap(), "first\n");
}

#[test]
fn test_writer_appends_or_truncates() {
    let dir = TempDir::new().unwrap();

    let config = file_config(&dir, true);
    LogFileWriter::new(&config).unwrap().make_writer().write_all(b"one\n").unwrap();
    LogFileWriter::new(&config).unwrap().make_writer().write_all(b"two\n").unwrap();
    assert_eq!(std::fs::read_to_string(&config.path).unwrap(), "one\ntwo\n");

    let config = file_config(&dir, false);
    LogFileWriter::new(&config).unwrap().make_writer().write_all(b"three\n").unwrap();
    assert_eq!(std::fs::read_to_string(&config.path).unwrap(), "three\n");
}
