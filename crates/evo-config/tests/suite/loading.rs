use std::io::Write;

use evo_config::{
    init_tracing, ConfigError, DefaultCandidate, GenerationConfig, LoggingConfig,
};
use pretty_assertions::assert_eq;

#[test]
fn loads_full_config_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
rank_bias = 1.4
seed = 42

[functional_mocking]
enabled = true
probability = 0.8

[[default_candidates]]
name = "java.lang.Object"

[[default_candidates]]
name = "java.util.HashMap"
priority = 3

[logging]
level = "debug"
json = true
"#
    )
    .unwrap();

    let config = GenerationConfig::load_from_path(file.path()).unwrap();
    assert_eq!(config.rank_bias, 1.4);
    assert_eq!(config.seed, Some(42));
    assert!(config.functional_mocking.is_active());
    assert_eq!(
        config.default_candidates,
        vec![
            DefaultCandidate {
                name: "java.lang.Object".to_owned(),
                priority: 0,
            },
            DefaultCandidate {
                name: "java.util.HashMap".to_owned(),
                priority: 3,
            },
        ]
    );
    assert_eq!(
        config.logging,
        LoggingConfig {
            level: "debug".to_owned(),
            json: true,
        }
    );
    assert!(config.validate().is_ok());
}

#[test]
fn missing_file_reports_io_error_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("evo.toml");

    let err = GenerationConfig::load_from_path(&path).unwrap_err();
    match err {
        ConfigError::Io { path: reported, .. } => {
            assert_eq!(reported, path.display().to_string())
        }
        other => panic!("expected io error, got {other:?}"),
    }
}

#[test]
fn wrong_value_type_is_a_toml_error() {
    let err = GenerationConfig::load_from_str("rank_bias = \"steep\"").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)), "{err}");
}

#[test]
fn init_tracing_is_idempotent() {
    let logging = LoggingConfig::default();
    init_tracing(&logging);
    init_tracing(&logging);
}
