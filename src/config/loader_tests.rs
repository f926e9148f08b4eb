//! Tests for configuration file loading.

use super::*;
use serial_test::serial;
use std::env;
use std::fs;

fn write_temp_config(name: &str, contents: &str) -> PathBuf {
    let path = env::temp_dir().join(name);
    fs::write(&path, contents).expect("Failed to write test config");
    path
}

#[test]
fn default_config_path_ends_with_refscope_config_toml() {
    if let Some(path) = default_config_path() {
        let path_str = path.to_string_lossy();
        assert!(
            path_str.contains("refscope") && path_str.ends_with("config.toml"),
            "Path should contain 'refscope' and end with 'config.toml', got: {}",
            path_str
        );
    }
}

#[test]
fn default_log_path_ends_with_refscope_log() {
    let path = default_log_path();
    assert!(path.to_string_lossy().ends_with("refscope.log"));
}

#[test]
fn load_config_file_returns_ok_none_for_missing_file() {
    let result = load_config_file("/nonexistent/path/to/refscope.toml");
    assert_eq!(result, Ok(None));
}

#[test]
fn load_config_file_parses_valid_toml() {
    let path = write_temp_config(
        "refscope_test_valid.toml",
        r#"
ref_pane_width = 40
no_color = true
show_help_bar = false
log_level = "debug"
log_file_path = "/tmp/refscope-test.log"
"#,
    );

    let config = load_config_file(&path)
        .expect("valid TOML")
        .expect("file exists");

    assert_eq!(config.ref_pane_width, Some(40));
    assert_eq!(config.no_color, Some(true));
    assert_eq!(config.show_help_bar, Some(false));
    assert_eq!(config.log_level.as_deref(), Some("debug"));
    assert_eq!(
        config.log_file_path,
        Some(PathBuf::from("/tmp/refscope-test.log"))
    );

    fs::remove_file(path).ok();
}

#[test]
fn load_config_file_returns_error_for_invalid_toml() {
    let path = write_temp_config("refscope_test_invalid.toml", "this is not valid TOML ][}{");

    match load_config_file(&path) {
        Err(ConfigError::ParseError { path: err_path, .. }) => assert_eq!(err_path, path),
        other => panic!("Expected ParseError, got {:?}", other),
    }

    fs::remove_file(path).ok();
}

#[test]
fn load_config_file_rejects_unknown_keys() {
    let path = write_temp_config("refscope_test_unknown.toml", "theme = \"monokai\"\n");

    assert!(matches!(
        load_config_file(&path),
        Err(ConfigError::ParseError { .. })
    ));

    fs::remove_file(path).ok();
}

#[test]
fn merge_without_file_yields_defaults() {
    assert_eq!(merge_config(None), ResolvedConfig::default());
}

#[test]
fn merge_partial_file_keeps_other_defaults() {
    let file = ConfigFile {
        ref_pane_width: Some(50),
        ..ConfigFile::default()
    };

    let resolved = merge_config(Some(file));

    assert_eq!(resolved.ref_pane_width, 50);
    assert!(resolved.show_help_bar);
    assert_eq!(resolved.log_level, "info");
    assert_eq!(resolved.log_file_path, default_log_path());
}

#[test]
fn cli_overrides_win() {
    let resolved = apply_cli_overrides(ResolvedConfig::default(), Some(20), Some(true));
    assert_eq!(resolved.ref_pane_width, 20);
    assert!(resolved.no_color);
}

#[test]
fn unset_cli_flags_keep_earlier_values() {
    let base = ResolvedConfig {
        ref_pane_width: 44,
        ..ResolvedConfig::default()
    };
    let resolved = apply_cli_overrides(base.clone(), None, None);
    assert_eq!(resolved, base);
}

#[test]
#[serial(env)]
fn env_overrides_ref_pane_width() {
    env::set_var(REF_PANE_WIDTH_ENV_VAR, "27");
    let resolved = apply_env_overrides(ResolvedConfig::default());
    env::remove_var(REF_PANE_WIDTH_ENV_VAR);

    assert_eq!(resolved.ref_pane_width, 27);
}

#[test]
#[serial(env)]
fn env_ignores_unparseable_width() {
    env::set_var(REF_PANE_WIDTH_ENV_VAR, "wide");
    let resolved = apply_env_overrides(ResolvedConfig::default());
    env::remove_var(REF_PANE_WIDTH_ENV_VAR);

    assert_eq!(resolved.ref_pane_width, ResolvedConfig::default().ref_pane_width);
}

#[test]
#[serial(env)]
fn explicit_path_beats_env_var() {
    let explicit = write_temp_config("refscope_test_explicit.toml", "ref_pane_width = 11\n");
    let from_env = write_temp_config("refscope_test_env.toml", "ref_pane_width = 99\n");
    env::set_var(CONFIG_ENV_VAR, &from_env);

    let loaded = load_config_with_precedence(Some(explicit.clone()));
    let via_env = load_config_with_precedence(None);
    env::remove_var(CONFIG_ENV_VAR);

    assert_eq!(loaded.unwrap().unwrap().ref_pane_width, Some(11));
    assert_eq!(via_env.unwrap().unwrap().ref_pane_width, Some(99));

    fs::remove_file(explicit).ok();
    fs::remove_file(from_env).ok();
}
