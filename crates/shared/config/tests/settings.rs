use cadenza_config::{DEFAULT_STORAGE_ROOT, Settings};
use serde_json::json;
use std::path::PathBuf;

#[test]
fn defaults_are_sane() {
    let settings = Settings::default();
    assert_eq!(settings.storage.root, PathBuf::from(DEFAULT_STORAGE_ROOT));
    assert!(settings.storage.create);
    assert!(settings.log.console);
    assert!(settings.log.dir.is_none());
    assert_eq!(settings.log.max_files, 7);
}

#[test]
fn partial_documents_keep_defaults() {
    let raw = json!({
        "storage": { "root": "/srv/cadenza/media" },
        "log": { "json": true, "dir": "/var/log/cadenza" }
    });

    let settings: Settings = serde_json::from_value(raw).expect("settings deserialize");
    assert_eq!(settings.storage.root, PathBuf::from("/srv/cadenza/media"));
    assert!(settings.storage.create);
    assert!(settings.log.json);
    assert_eq!(settings.log.level, "info");
    assert_eq!(settings.log.dir, Some(PathBuf::from("/var/log/cadenza")));
}
