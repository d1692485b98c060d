//! Reading configuration files from disk

use std::io::Write;

use pretty_assertions::assert_eq;
use reuse_config::{ConfigError, ConfigMap};
use reuse_pool::{PoolConfig, PoolError};
use rstest::rstest;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    write_config_bytes(contents.as_bytes())
}

fn write_config_bytes(contents: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(contents).expect("Failed to write config");
    file
}

#[test]
fn test_host_and_port() {
    let file = write_config("host = localhost\nport = 8080\n");
    let mut config = ConfigMap::new().unwrap();

    assert_eq!(config.parse_file(file.path()).unwrap(), 2);
    assert_eq!(config.value_or_empty("host"), "localhost");
    assert_eq!(config.value_or_empty("port"), "8080");
}

#[test]
fn test_mixed_file() {
    let file = write_config(
        "# comment line\n\
         \n\
         \t host  =  example . org \r\n\
         no delimiter here\n\
         path=/a=b\n\
         =anonymous\n\
         host=override\n",
    );
    let mut config = ConfigMap::new().unwrap();
    config.parse_file(file.path()).unwrap();

    let entries: Vec<(&str, &str)> = config.iter().collect();
    assert_eq!(
        entries,
        vec![("", "anonymous"), ("host", "override"), ("path", "/a=b")]
    );
}

#[test]
fn test_invalid_utf8_line_keeps_rest_of_file() {
    let file = write_config_bytes(b"host=h\n# caf\xe9\nport=1\nname=caf\xe9\n");
    let mut config = ConfigMap::new().unwrap();

    assert_eq!(config.parse_file(file.path()).unwrap(), 3);
    assert_eq!(config.get("host"), Some("h"));
    assert_eq!(config.get("port"), Some("1"));
    assert_eq!(config.get("name"), Some("caf\u{FFFD}"));
}

#[test]
fn test_non_breaking_space_survives() {
    let file = write_config("host = a\u{00A0}b\n");
    let mut config = ConfigMap::new().unwrap();
    config.parse_file(file.path()).unwrap();

    assert_eq!(config.value_or_empty("host"), "a\u{00A0}b");
}

#[test]
fn test_missing_key_is_empty() {
    let file = write_config("host=h\n");
    let mut config = ConfigMap::new().unwrap();
    config.parse_file(file.path()).unwrap();

    assert_eq!(config.get("port"), None);
    assert_eq!(config.value_or_empty("port"), "");
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.txt");
    let mut config = ConfigMap::new().unwrap();

    let err = config.parse_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert_eq!(err.code(), "CONFIG:IO");
    assert!(err.to_string().contains("absent.txt"));
    assert!(config.is_empty());
}

#[test]
fn test_pool_too_small() {
    let file = write_config("a=1\nb=2\nc=3\n");
    let mut config = ConfigMap::with_pool_config(PoolConfig::bounded(2)).unwrap();

    let err = config.parse_file(file.path()).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Pool(PoolError::PoolExhausted { capacity: 2, .. })
    ));
    // lines before the failure were kept
    assert_eq!(config.len(), 2);
}

#[rstest]
#[case("", 0)]
#[case("# only a comment", 0)]
#[case("k=v", 1)]
#[case("k=v\nk=w\nx", 2)]
fn test_applied_counts(#[case] text: &str, #[case] expected: usize) {
    let file = write_config(text);
    let mut config = ConfigMap::new().unwrap();
    assert_eq!(config.parse_file(file.path()).unwrap(), expected);
}
