use crate::config::{Config, DEFAULT_MODEL_PATH, DEFAULT_PORT};
use std::env;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::OnceLock;

// Global lock to prevent race conditions when modifying environment variables in tests
static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn get_env_lock() -> &'static Mutex<()> {
    ENV_LOCK.get_or_init(|| Mutex::new(()))
}

const VARS: [&str; 4] = [
    "MODEL_PATH",
    "SERVER_BIND_ADDRESS",
    "SERVER_PORT",
    "METRICS_ENABLED",
];

fn clear_env() {
    for var in VARS {
        unsafe { env::remove_var(var) };
    }
}

#[test]
fn test_config_defaults() {
    let _guard = get_env_lock().lock().unwrap();
    clear_env();

    let config = Config::from_env().unwrap();

    assert_eq!(config.model_path, PathBuf::from(DEFAULT_MODEL_PATH));
    assert_eq!(config.bind_address, "0.0.0.0");
    assert_eq!(config.port, DEFAULT_PORT);
    assert!(config.metrics_enabled);
    assert_eq!(config.socket_addr().unwrap().port(), 5000);
}

#[test]
fn test_config_from_env_overrides() {
    let _guard = get_env_lock().lock().unwrap();
    clear_env();
    unsafe {
        env::set_var("MODEL_PATH", "/srv/models/credit.json");
        env::set_var("SERVER_BIND_ADDRESS", "127.0.0.1");
        env::set_var("SERVER_PORT", "8080");
        env::set_var("METRICS_ENABLED", "false");
    }

    let config = Config::from_env().unwrap();

    assert_eq!(config.model_path, PathBuf::from("/srv/models/credit.json"));
    assert_eq!(
        config.socket_addr().unwrap().to_string(),
        "127.0.0.1:8080"
    );
    assert!(!config.metrics_enabled);

    // Cleanup
    clear_env();
}

#[test]
fn test_invalid_port_is_an_error() {
    let _guard = get_env_lock().lock().unwrap();
    clear_env();
    unsafe { env::set_var("SERVER_PORT", "not-a-port") };

    let result = Config::from_env();
    assert!(result.is_err());

    // Cleanup
    clear_env();
}

#[test]
fn test_invalid_bind_address_is_an_error() {
    let _guard = get_env_lock().lock().unwrap();
    clear_env();
    unsafe { env::set_var("SERVER_BIND_ADDRESS", "not an address") };

    let config = Config::from_env().unwrap();
    assert!(config.socket_addr().is_err());

    // Cleanup
    clear_env();
}
