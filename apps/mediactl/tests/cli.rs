use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn mediactl(workdir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_mediactl"));
    cmd.current_dir(workdir).env("RUST_LOG", "off");
    cmd
}

fn stored_reference(output: &[u8]) -> String {
    String::from_utf8(output.to_vec()).unwrap().trim().to_owned()
}

#[test]
fn test_store_prints_reference_and_writes_file() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("Cover Art.PNG"), b"\x89PNG").unwrap();

    let output = mediactl(temp.path())
        .args(["--root", "media", "store", "Cover Art.PNG", "--subdir", "images"])
        .args(["--content-type", "image/png"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^images/[0-9a-f]{32}\.png\n$").unwrap())
        .get_output()
        .stdout
        .clone();

    let reference = stored_reference(&output);
    let stored = temp.path().join("media").join(&reference);
    assert_eq!(std::fs::read(stored).unwrap(), b"\x89PNG");
}

#[test]
fn test_store_uses_name_override_for_extension() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("upload.tmp"), b"ID3").unwrap();

    mediactl(temp.path())
        .args(["--root", "media", "store", "upload.tmp", "--subdir", "audio-files"])
        .args(["--name", "Live Set.MP3", "--kind", "audio"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^audio-files/[0-9a-f]{32}\.mp3\n$").unwrap());
}

#[test]
fn test_store_rejects_wrong_kind() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("setup.exe"), b"MZ").unwrap();

    mediactl(temp.path())
        .args(["--root", "media", "store", "setup.exe", "--subdir", "images", "--kind", "image"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported media type"));

    assert!(!temp.path().join("media").join("images").exists());
}

#[test]
fn test_store_rejects_traversal_subdirectory() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("a.png"), b"x").unwrap();

    mediactl(temp.path())
        .args(["--root", "media", "store", "a.png", "--subdir", "../escape"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Path traversal"));

    assert!(!temp.path().join("escape").exists());
}

#[test]
fn test_store_empty_file_fails() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("empty.wav"), b"").unwrap();

    mediactl(temp.path())
        .args(["--root", "media", "store", "empty.wav", "--subdir", "audio-files"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Empty payload"));
}

#[test]
fn test_delete_is_idempotent() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("a.flac"), b"fLaC").unwrap();

    let output = mediactl(temp.path())
        .args(["--root", "media", "store", "a.flac", "--subdir", "audio-files"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let reference = stored_reference(&output);

    for _ in 0..2 {
        mediactl(temp.path())
            .args(["--root", "media", "delete", &reference])
            .assert()
            .success()
            .stdout(predicate::str::contains(reference.as_str()));
    }
    assert!(!temp.path().join("media").join(&reference).exists());
}

#[test]
fn test_delete_rejects_forged_reference() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("victim.txt"), b"keep").unwrap();

    mediactl(temp.path())
        .args(["--root", "media", "delete", "../victim.txt"])
        .assert()
        .failure();

    assert!(temp.path().join("victim.txt").exists());
}

#[test]
fn test_classify() {
    let temp = TempDir::new().unwrap();

    mediactl(temp.path())
        .args(["classify", "image/png", "x.png"])
        .assert()
        .success()
        .stdout("image\n");
    mediactl(temp.path())
        .args(["classify", "text/plain", "song.mp3"])
        .assert()
        .success()
        .stdout("audio\n");
    mediactl(temp.path())
        .args(["classify", "application/octet-stream", "x.exe"])
        .assert()
        .success()
        .stdout("none\n");

    assert!(!temp.path().join("uploads").exists());
}

#[test]
fn test_settings_file_sets_root() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("mediactl.toml"), "[storage]\nroot = \"from-config\"\n").unwrap();
    std::fs::write(temp.path().join("a.gif"), b"GIF89a").unwrap();

    mediactl(temp.path())
        .args(["--config", "mediactl.toml", "store", "a.gif", "--subdir", "images"])
        .assert()
        .success();

    assert!(temp.path().join("from-config").join("images").is_dir());
}

#[test]
fn test_settings_source_is_logged() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("mediactl.toml"), "[storage]\nroot = \"from-config\"\n").unwrap();

    mediactl(temp.path())
        .env("RUST_LOG", "info")
        .args(["--config", "mediactl.toml", "purge"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Settings loaded"))
        .stderr(predicate::str::contains("mediactl.toml"));
}

#[test]
fn test_purge_reports_removed_orphans() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("media");
    std::fs::create_dir_all(root.join("images")).unwrap();
    std::fs::write(root.join("images").join(".fresh.png.cdztmp"), b"in flight").unwrap();

    mediactl(temp.path())
        .args(["--root", "media", "purge"])
        .assert()
        .success()
        .stdout(predicate::str::contains("removed 0"));

    assert!(root.join("images").join(".fresh.png.cdztmp").exists());
}

#[test]
fn test_missing_subcommand_shows_help() {
    let temp = TempDir::new().unwrap();

    mediactl(temp.path()).assert().failure().stderr(predicate::str::contains("Usage"));
}
