//! Integration tests for gmextpack

use assert_cmd::{cargo::cargo_bin_cmd, Command};
use predicates::prelude::*;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Isolated working directory with the fixtures copied in and a private HOME
struct Workspace {
    dir: TempDir,
    config_path: PathBuf,
}

impl Workspace {
    fn new() -> io::Result<Self> {
        let dir = TempDir::new()?;
        for name in ["ext_health.yy", "ext_health.gml", "native.yy"] {
            fs::copy(fixtures_dir().join(name), dir.path().join(name))?;
        }
        let config_path = dir.path().join("home").join("gmextpack.toml");
        Ok(Workspace { dir, config_path })
    }

    fn with_fixture_config() -> io::Result<Self> {
        let ws = Self::new()?;
        if let Some(parent) = ws.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(fixtures_dir().join("gmextpack.toml"), &ws.config_path)?;
        Ok(ws)
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn command(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("gmextpack");
        cmd.current_dir(self.dir.path())
            .env("GMEXT_CONFIG", &self.config_path)
            .env("HOME", self.dir.path().join("home"))
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        cmd
    }
}

fn archive_entries(path: &Path) -> Vec<String> {
    let Ok(file) = File::open(path) else {
        return Vec::new();
    };
    let Ok(archive) = zip::ZipArchive::new(file) else {
        return Vec::new();
    };
    archive.file_names().map(str::to_string).collect()
}

fn read_json(path: &Path) -> serde_json::Value {
    fs::read_to_string(path)
        .ok()
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

#[test]
fn test_version() {
    cargo_bin_cmd!("gmextpack")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gmextpack"));
}

#[test]
fn test_help() {
    cargo_bin_cmd!("gmextpack")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("asset packages"));
}

#[test]
fn test_invalid_command() {
    cargo_bin_cmd!("gmextpack").arg("invalid").assert().failure();
}

#[test]
fn test_config_show() -> io::Result<()> {
    let ws = Workspace::with_fixture_config()?;
    ws.command()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration:"))
        .stdout(predicate::str::contains("default-target: v23"))
        .stdout(predicate::str::contains("publisher: Fixture Games"));
    Ok(())
}

#[test]
fn test_config_path() -> io::Result<()> {
    let ws = Workspace::new()?;
    ws.command()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gmextpack.toml"));
    Ok(())
}

#[test]
fn test_config_set_writes_file() -> io::Result<()> {
    let ws = Workspace::new()?;
    ws.command()
        .args(["config", "set", "default-target", "v22"])
        .assert()
        .success();
    let contents = fs::read_to_string(&ws.config_path)?;
    assert!(contents.contains("default_target = \"v22\""));
    Ok(())
}

#[test]
fn test_config_set_unknown_key_fails() -> io::Result<()> {
    let ws = Workspace::new()?;
    ws.command()
        .args(["config", "set", "colour", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key: colour"));
    assert!(!ws.config_path.exists());
    Ok(())
}

#[test]
fn test_convert_explodes_descriptor() -> io::Result<()> {
    let ws = Workspace::new()?;
    ws.command()
        .args(["convert", "ext_health.yy", "--v23"])
        .assert()
        .success()
        .stderr(predicate::str::contains("damage"))
        .stderr(predicate::str::contains(
            "Script did not specify a return type",
        ));

    let package = ws.path("ext_health.yymps");
    assert!(package.is_file());
    let entries = archive_entries(&package);
    assert!(entries.iter().any(|e| e == "assetpackage.yy"));
    assert!(entries.iter().any(|e| e == "scripts/heal/heal.gml"));
    assert!(entries.iter().any(|e| e == "scripts/heal/heal.yy"));
    assert!(entries
        .iter()
        .any(|e| e == "scripts/ext_health_ext_init/ext_health_ext_init.gml"));
    assert!(entries
        .iter()
        .any(|e| e == "scripts/ext_health_ext_macros/ext_health_ext_macros.gml"));
    Ok(())
}

#[test]
fn test_explode_uses_config_target_and_publisher() -> io::Result<()> {
    let ws = Workspace::with_fixture_config()?;
    ws.command()
        .args(["explode", "ext_health.yy"])
        .assert()
        .success();
    assert!(ws.path("ext_health.yymps").is_file());

    let extracted = ws.path("extracted");
    let file = File::open(ws.path("ext_health.yymps"))?;
    let Ok(mut archive) = zip::ZipArchive::new(file) else {
        return Err(io::Error::other("package is not a zip archive"));
    };
    archive.extract(&extracted).map_err(io::Error::other)?;

    let manifest = read_json(&extracted.join("assetpackage.yy"));
    assert_eq!(manifest["publisherName"], "Fixture Games");
    assert_eq!(manifest["packageID"], "ext_health");
    assert_eq!(manifest["version"], "1.4.0");
    Ok(())
}

#[test]
fn test_explode_without_target_fails() -> io::Result<()> {
    let ws = Workspace::new()?;
    ws.command()
        .args(["convert", "ext_health.yy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No target version"));
    assert!(!ws.path("ext_health.yymp").exists());
    assert!(!ws.path("ext_health.yymps").exists());
    Ok(())
}

#[test]
fn test_explode_rejects_native_files() -> io::Result<()> {
    let ws = Workspace::new()?;
    ws.command()
        .args(["convert", "native.yy", "--v22"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("only .gml sources are supported"));
    assert!(!ws.path("native.yymp").exists());
    Ok(())
}

#[test]
fn test_round_trip_through_package() -> io::Result<()> {
    let ws = Workspace::new()?;
    ws.command()
        .args(["convert", "ext_health.yy", "--v22"])
        .assert()
        .success();
    assert!(ws.path("ext_health.yymp").is_file());

    fs::create_dir_all(ws.path("out"))?;
    ws.command()
        .args(["convert", "ext_health.yymp", "out/ext_health.yy"])
        .assert()
        .success();

    let descriptor = read_json(&ws.path("out").join("ext_health.yy"));
    assert_eq!(descriptor["name"], "ext_health");
    assert_eq!(descriptor["version"], "1.4.0");

    let file = &descriptor["files"][0];
    assert_eq!(file["filename"], "ext_health.gml");
    assert_eq!(file["init"], "health_init");
    assert_eq!(file["constants"][0]["constantName"], "MAXHP");
    assert_eq!(file["constants"][0]["value"], "100");

    let names: Vec<&str> = file["functions"]
        .as_array()
        .map(|list| list.iter().filter_map(|f| f["name"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(names, vec!["health_init", "heal", "damage"]);

    let heal = &file["functions"][1];
    assert_eq!(heal["argCount"], 1);
    assert_eq!(heal["help"], "amount");
    assert_eq!(heal["returnType"], 2);

    let source = fs::read_to_string(ws.path("out").join("ext_health.gml"))?;
    assert!(source.contains("#define heal"));
    assert!(source.contains("return global.hp;"));
    assert!(!source.contains("ext_health_ext_init"));
    Ok(())
}

#[test]
fn test_collapse_rejects_non_archive() -> io::Result<()> {
    let ws = Workspace::new()?;
    fs::write(ws.path("broken.yymps"), "not a zip")?;
    ws.command()
        .args(["collapse", "broken.yymps"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Archive error"));
    assert!(!ws.path("broken.yy").exists());
    Ok(())
}
