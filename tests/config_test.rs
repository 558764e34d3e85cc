//! Tests for layered settings loading

use std::fs;
use std::path::{Path, PathBuf};

use rstest::{fixture, rstest};
use tempfile::TempDir;

use treeviz::config::{local_config_path, Settings, SettingsError};
use treeviz::domain::LayoutStrategy;
use treeviz::util::testing;

#[fixture]
fn temp_dir() -> TempDir {
    testing::init_test_setup();
    TempDir::new().unwrap()
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn env(pairs: &[(&str, &str)]) -> Option<config::Map<String, String>> {
    let mut map = config::Map::new();
    for (key, value) in pairs {
        map.insert(key.to_string(), value.to_string());
    }
    Some(map)
}

#[rstest]
fn given_no_sources_when_loading_then_defaults(temp_dir: TempDir) {
    let missing_global = temp_dir.path().join("treeviz.toml");

    let settings = Settings::load_from(Some(&missing_global), None, env(&[])).unwrap();

    assert_eq!(settings, Settings::default());
    assert_eq!(settings.layout.hbuff, 1.0);
    assert_eq!(settings.layout.vbuff, 1.0);
    assert_eq!(settings.layout.strategy, LayoutStrategy::Halving);
    assert!(!settings.layout.center);
    assert_eq!(settings.chain.buff, 1.0);
}

#[rstest]
fn given_local_file_when_loading_then_specified_keys_override(temp_dir: TempDir) {
    // Arrange
    let local = write(
        temp_dir.path(),
        ".treeviz.toml",
        "[layout]\nhbuff = 2.5\nstrategy = \"compact\"\n",
    );

    // Act
    let settings = Settings::load_from(None, Some(&local), env(&[])).unwrap();

    // Assert
    assert_eq!(settings.layout.hbuff, 2.5);
    assert_eq!(settings.layout.strategy, LayoutStrategy::Compact);
    assert_eq!(settings.layout.vbuff, 1.0);
    assert_eq!(settings.chain.buff, 1.0);
}

#[rstest]
fn given_global_and_local_when_loading_then_local_wins(temp_dir: TempDir) {
    // Arrange
    let global = write(
        temp_dir.path(),
        "treeviz.toml",
        "[layout]\nhbuff = 3.0\nvbuff = 4.0\n\n[chain]\nbuff = 6.0\n",
    );
    let local = write(temp_dir.path(), ".treeviz.toml", "[layout]\nvbuff = 0.5\n");

    // Act
    let settings = Settings::load_from(Some(&global), Some(&local), env(&[])).unwrap();

    // Assert
    assert_eq!(settings.layout.hbuff, 3.0);
    assert_eq!(settings.layout.vbuff, 0.5);
    assert_eq!(settings.chain.buff, 6.0);
}

#[rstest]
fn given_env_overrides_when_loading_then_env_wins_over_files(temp_dir: TempDir) {
    // Arrange
    let local = write(temp_dir.path(), ".treeviz.toml", "[layout]\nhbuff = 2.0\n");
    let vars = env(&[
        ("TREEVIZ_LAYOUT__HBUFF", "7.5"),
        ("TREEVIZ_LAYOUT__STRATEGY", "compact"),
        ("TREEVIZ_LAYOUT__CENTER", "true"),
        ("TREEVIZ_CHAIN__BUFF", "0.25"),
        ("OTHER_LAYOUT__VBUFF", "9"),
    ]);

    // Act
    let settings = Settings::load_from(None, Some(&local), vars).unwrap();

    // Assert
    assert_eq!(settings.layout.hbuff, 7.5);
    assert_eq!(settings.layout.strategy, LayoutStrategy::Compact);
    assert!(settings.layout.center);
    assert_eq!(settings.chain.buff, 0.25);
    assert_eq!(settings.layout.vbuff, 1.0);
}

#[rstest]
fn given_missing_local_file_when_loading_then_not_found(temp_dir: TempDir) {
    let local = local_config_path(temp_dir.path());

    let result = Settings::load_from(None, Some(&local), env(&[]));

    assert!(matches!(result, Err(SettingsError::NotFound(path)) if path == local));
}

#[rstest]
#[case("[layout\nhbuff = 1")]
#[case("[layout]\nhbuff = \"wide\"\n")]
#[case("[layout]\nstrategy = \"diagonal\"\n")]
fn given_malformed_file_when_loading_then_invalid(temp_dir: TempDir, #[case] content: &str) {
    let local = write(temp_dir.path(), ".treeviz.toml", content);

    let result = Settings::load_from(None, Some(&local), env(&[]));

    assert!(matches!(result, Err(SettingsError::Invalid { .. })), "{:?}", result);
}

#[rstest]
#[case("TREEVIZ_LAYOUT__HBUFF", "wide")]
#[case("TREEVIZ_LAYOUT__STRATEGY", "diagonal")]
fn given_malformed_env_value_when_loading_then_invalid(
    temp_dir: TempDir,
    #[case] key: &str,
    #[case] value: &str,
) {
    let missing_global = temp_dir.path().join("treeviz.toml");

    let result = Settings::load_from(Some(&missing_global), None, env(&[(key, value)]));

    assert!(matches!(result, Err(SettingsError::Invalid { .. })), "{:?}", result);
}

#[rstest]
fn given_non_positive_hbuff_in_file_when_building_spacing_then_rejected(temp_dir: TempDir) {
    // Loading keeps the raw value; validation happens when spacing is built
    let local = write(temp_dir.path(), ".treeviz.toml", "[layout]\nhbuff = 0.0\n");

    let settings = Settings::load_from(None, Some(&local), env(&[])).unwrap();

    assert!(settings.spacing().is_err());
}

#[rstest]
fn given_defaults_when_writing_template_then_loads_back_equal(temp_dir: TempDir) {
    let text = Settings::default().to_toml().unwrap();
    let local = write(temp_dir.path(), ".treeviz.toml", &text);

    let settings = Settings::load_from(None, Some(&local), env(&[])).unwrap();

    assert_eq!(settings, Settings::default());
    assert!(text.contains("strategy = \"halving\""));
}
