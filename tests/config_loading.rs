// tests/config_loading.rs

mod common;

use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use tempfile::NamedTempFile;

use photo_uploader::config::{ConfigFile, load_and_validate};
use photo_uploader::errors::UploaderError;
use photo_uploader::logging::resolve_level;

use crate::common::builders::ConfigBuilder;

type TestResult = Result<(), Box<dyn Error>>;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn full_config_is_parsed() -> TestResult {
    let file = write_config(
        r#"
watch_directory = "/srv/photos/inbox"
supported_extensions = [".HEIC", "heif", ".jpg"]

[rclone]
remote_name = "gphotos"
album_name = "Inbox"
delete_after_upload = true
check_duplicates = false

[logging]
level = "debug"
file_path = "/var/log/photo-uploader.log"
max_backups = 7

[upload]
concurrent_uploads = 4
wait_time = 3
retry_count = 5
retry_interval = 10
queue_capacity = 50
scan_existing = true
"#,
    );

    let cfg = load_and_validate(file.path())?;

    assert_eq!(cfg.watch_directory, PathBuf::from("/srv/photos/inbox"));
    assert_eq!(cfg.supported_extensions, vec![".heic", ".heif", ".jpg"]);
    assert_eq!(cfg.remote_destination(), "gphotos:Inbox");
    assert!(cfg.rclone.delete_after_upload);
    assert!(!cfg.rclone.check_duplicates);
    assert_eq!(cfg.logging.level, "debug");
    assert_eq!(
        cfg.logging.file_path,
        Some(PathBuf::from("/var/log/photo-uploader.log"))
    );
    assert_eq!(cfg.logging.max_backups, 7);
    assert_eq!(cfg.upload.concurrent_uploads, 4);
    assert_eq!(cfg.upload.settle_delay(), Duration::from_secs(3));
    assert_eq!(cfg.upload.retry_count, 5);
    assert_eq!(cfg.upload.retry_delay(), Duration::from_secs(10));
    assert_eq!(cfg.upload.queue_capacity, 50);
    assert!(cfg.upload.scan_existing);
    Ok(())
}

#[test]
fn minimal_config_gets_defaults() -> TestResult {
    let file = write_config(
        r#"
watch_directory = "/inbox"

[rclone]
remote_name = "gphotos"
"#,
    );

    let cfg = load_and_validate(file.path())?;

    assert_eq!(cfg.supported_extensions, vec![".heic", ".heif"]);
    assert_eq!(cfg.remote_destination(), "gphotos:");
    assert!(!cfg.rclone.delete_after_upload);
    assert!(!cfg.rclone.check_duplicates);
    assert_eq!(cfg.rclone.binary, PathBuf::from("rclone"));
    assert_eq!(cfg.logging.level, "info");
    assert_eq!(cfg.logging.file_path, None);
    assert_eq!(cfg.upload.concurrent_uploads, 2);
    assert_eq!(cfg.upload.wait_time, 2);
    assert_eq!(cfg.upload.retry_count, 3);
    assert_eq!(cfg.upload.retry_interval, 5);
    assert_eq!(cfg.upload.queue_capacity, 100);
    assert!(!cfg.upload.scan_existing);
    Ok(())
}

#[test]
fn demo_config_is_valid() -> TestResult {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let cfg = load_and_validate(manifest_dir.join("demos/config.toml"))?;

    assert!(!cfg.supported_extensions.is_empty());
    assert!(!cfg.rclone.remote_name.is_empty());
    Ok(())
}

#[test]
fn missing_remote_name_is_a_config_error() {
    let file = write_config(r#"watch_directory = "/inbox""#);

    match load_and_validate(file.path()) {
        Err(UploaderError::Config(msg)) => assert!(msg.contains("remote_name")),
        Err(e) => panic!("Expected Config error, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn missing_watch_directory_is_a_config_error() {
    let file = write_config(
        r#"
[rclone]
remote_name = "gphotos"
"#,
    );

    match load_and_validate(file.path()) {
        Err(UploaderError::Config(msg)) => assert!(msg.contains("watch_directory")),
        Err(e) => panic!("Expected Config error, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn zero_counts_are_rejected() {
    let cases = [
        ("concurrent_uploads", ConfigBuilder::new("/inbox").concurrent_uploads(0)),
        ("retry_count", ConfigBuilder::new("/inbox").retry_count(0)),
        ("queue_capacity", ConfigBuilder::new("/inbox").queue_capacity(0)),
    ];

    for (field, builder) in cases {
        match ConfigFile::try_from(builder.build_raw()) {
            Err(UploaderError::Config(msg)) => assert!(msg.contains(field), "{msg}"),
            other => panic!("expected Config error for {field}, got {other:?}"),
        }
    }
}

#[test]
fn empty_extension_list_is_rejected() {
    let raw = ConfigBuilder::new("/inbox").extensions(&[]).build_raw();
    assert!(matches!(
        ConfigFile::try_from(raw),
        Err(UploaderError::Config(_))
    ));

    let raw = ConfigBuilder::new("/inbox").extensions(&[".heic", "."]).build_raw();
    assert!(matches!(
        ConfigFile::try_from(raw),
        Err(UploaderError::Config(_))
    ));
}

#[test]
fn unknown_log_level_loads_and_falls_back_to_info() -> TestResult {
    let file = write_config(
        r#"
watch_directory = "/inbox"

[rclone]
remote_name = "gphotos"

[logging]
level = "chatty"
"#,
    );

    let cfg = load_and_validate(file.path())?;

    assert_eq!(cfg.logging.level, "chatty");
    assert_eq!(
        resolve_level(None, None, &cfg.logging.level),
        tracing::Level::INFO
    );
    Ok(())
}

#[test]
fn malformed_toml_is_a_toml_error() {
    let file = write_config("watch_directory = [");
    assert!(matches!(
        load_and_validate(file.path()),
        Err(UploaderError::Toml(_))
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    assert!(matches!(
        load_and_validate("/definitely/not/here/config.toml"),
        Err(UploaderError::Io(_))
    ));
}
