use std::fs;

use ioc_kernel::KernelError;
use ioc_kernel::config::{load_with_env, ConfigError, FileFormat};
use ioc_runtime::{Behavior, ContainerBuilder, ContainerConfig, IocError, Value};
use ioc_testing::{init_tracing, movable_contract, ship, Vector};
use tempfile::TempDir;

#[test]
fn file_config_drives_adapter_naming() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ioc.yaml");
    fs::write(&path, "adapter:\n  suffix: Proxy\n  strip_leading_char: false\n").unwrap();

    let container = ContainerBuilder::from_config_file(&path).unwrap().build();
    let adapter = container
        .adapter(movable_contract(), ship(Vector::default(), Vector::default()))
        .unwrap();

    assert_eq!(adapter.adapter_name(), "IMovableProxy");
    assert!(container.root_scope().contains_key("IMovableProxy"));
}

#[test]
fn env_override_wins_over_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ioc.toml");
    fs::write(&path, "[resolution]\nmax_depth = 50\n").unwrap();

    // A prefix of its own keeps this variable away from every other loader.
    unsafe { std::env::set_var("IOCENVTEST_RESOLUTION__MAX_DEPTH", "3"); }
    let config: ContainerConfig = load_with_env(path.to_str().unwrap(), "IOCENVTEST").unwrap();
    unsafe { std::env::remove_var("IOCENVTEST_RESOLUTION__MAX_DEPTH"); }
    let container = ContainerBuilder::new().with_config(config).build();

    assert_eq!(container.config().resolution.max_depth, 3);

    container
        .register(
            "Loop",
            Behavior::new(|resolver, _| resolver.resolve("Loop", &[])),
        )
        .unwrap();
    assert!(matches!(
        container.resolve("Loop", &[]).unwrap_err(),
        IocError::ResolutionDepthExceeded { limit: 3, .. }
    ));
}

#[test]
fn inline_json_config() {
    let builder = ContainerBuilder::from_config_str(
        r#"{ "resolution": { "max_depth": 0, "log_resolutions": true } }"#,
        FileFormat::Json,
    )
    .unwrap();
    let container = builder.build();

    assert_eq!(container.config().resolution.max_depth, 0);
    container
        .register("Answer", Behavior::constant(Value::new(42u8)))
        .unwrap();
    assert_eq!(*container.resolve_as::<u8>("Answer", &[]).unwrap(), 42);
}

#[test]
fn malformed_config_reports_parse_failure() {
    let report = match ContainerBuilder::from_config_str("resolution: [unclosed", FileFormat::Yaml) {
        Ok(_) => panic!("expected a parse error"),
        Err(report) => report,
    };
    assert!(matches!(
        report.current_context(),
        KernelError::Config(ConfigError::Parse(_))
    ));
}

#[test]
fn unsupported_extension_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ioc.cfg");
    fs::write(&path, "max_depth=1").unwrap();

    let report = match ContainerBuilder::from_config_file(&path) {
        Ok(_) => panic!("expected an unsupported format error"),
        Err(report) => report,
    };
    assert!(matches!(
        report.current_context(),
        KernelError::Config(ConfigError::UnsupportedFormat(_))
    ));
}
