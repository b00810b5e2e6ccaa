//! Run the installed binaries against a scratch release layout.
//!
//! `PATH` points at a scratch directory, so the only Sparkle tools found are
//! the fakes a test puts there.

use std::path::Path;
use std::process::{Command, Output};

use appcast_test::{SAMPLE_APPCAST, release_layout};

fn command(bin: &str, root: &Path, empty_path: &Path) -> Command {
    let mut cmd = Command::new(bin);
    cmd.current_dir(root)
        .env("PATH", empty_path)
        .env_remove("SPARKLE_PRIVATE_KEY")
        .env_remove("APPCAST_SIGNER_CONFIG")
        .env_remove("APPCAST_SIGNER_LOG");
    cmd
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn sign_without_secret_exits_zero_and_writes_nothing() {
    let root = tempfile::tempdir().unwrap();
    let empty = tempfile::tempdir().unwrap();
    let (dist, feeds) = release_layout(root.path());

    let output = command(env!("CARGO_BIN_EXE_appcast-sign"), root.path(), empty.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(stdout(&output).contains("SPARKLE_PRIVATE_KEY is not set"));
    assert!(!dist.join("signatures.json").exists());
    assert_eq!(std::fs::read_to_string(&feeds[0]).unwrap(), SAMPLE_APPCAST);
}

#[test]
fn sign_with_missing_assets_dir_exits_one() {
    let root = tempfile::tempdir().unwrap();
    let empty = tempfile::tempdir().unwrap();

    let output = command(env!("CARGO_BIN_EXE_appcast-sign"), root.path(), empty.path())
        .env("SPARKLE_PRIVATE_KEY", "BwcHBwcHBwcHBwcHBwcHBwcHBwcHBwcHBwcHBwcHBwc=")
        .arg("missing")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
}

#[test]
fn keygen_sign_verify_round() {
    let root = tempfile::tempdir().unwrap();
    let empty = tempfile::tempdir().unwrap();
    let (dist, feeds) = release_layout(root.path());

    let keygen = command(env!("CARGO_BIN_EXE_appcast-keygen"), root.path(), empty.path())
        .arg("keys")
        .output()
        .unwrap();
    assert!(keygen.status.success(), "{}", String::from_utf8_lossy(&keygen.stderr));
    assert!(stdout(&keygen).contains("<key>SUPublicEDKey</key>"));

    // A second run must not clobber the key.
    let again = command(env!("CARGO_BIN_EXE_appcast-keygen"), root.path(), empty.path())
        .arg("keys")
        .output()
        .unwrap();
    assert_eq!(again.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&again.stderr).contains("--force"));

    let private_key = std::fs::read_to_string(root.path().join("keys/sparkle_private_key.txt")).unwrap();
    let sign = command(env!("CARGO_BIN_EXE_appcast-sign"), root.path(), empty.path())
        .env("SPARKLE_PRIVATE_KEY", &private_key)
        .output()
        .unwrap();
    assert!(sign.status.success(), "{}", String::from_utf8_lossy(&sign.stderr));
    assert!(dist.join("signatures.json").exists());
    assert!(std::fs::read_to_string(&feeds[1]).unwrap().contains("sparkle:edSignature="));

    let verify = command(env!("CARGO_BIN_EXE_appcast-verify"), root.path(), empty.path())
        .args(["--public-key", "keys/sparkle_public_key.txt"])
        .output()
        .unwrap();
    assert!(verify.status.success(), "{}", stdout(&verify));
    assert!(stdout(&verify).contains("2 verified, 0 mismatched, 0 missing"));

    std::fs::write(dist.join("App-1.0.zip"), b"tampered").unwrap();
    let verify = command(env!("CARGO_BIN_EXE_appcast-verify"), root.path(), empty.path())
        .args(["--public-key", "keys/sparkle_public_key.txt"])
        .output()
        .unwrap();
    assert_eq!(verify.status.code(), Some(1));
}

#[cfg(unix)]
#[test]
fn keygen_falls_back_when_sparkle_tool_fails() {
    use std::os::unix::fs::PermissionsExt;

    let root = tempfile::tempdir().unwrap();
    let tools = tempfile::tempdir().unwrap();
    let script = tools.path().join("generate_keys");
    std::fs::write(&script, "#!/bin/sh\necho 'keychain locked' >&2\nexit 1\n").unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    let keygen = command(env!("CARGO_BIN_EXE_appcast-keygen"), root.path(), tools.path())
        .arg("keys")
        .output()
        .unwrap();

    assert!(keygen.status.success(), "{}", String::from_utf8_lossy(&keygen.stderr));
    assert!(stdout(&keygen).contains("native ed25519"));
    let public_key = std::fs::read_to_string(root.path().join("keys/sparkle_public_key.txt")).unwrap();
    assert!(appcast_crypto::PublicKey::from_base64(public_key.trim()).is_ok());
}
