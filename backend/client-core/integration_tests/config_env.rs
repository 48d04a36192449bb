//! Process-environment overrides. These mutate global env vars, so they run serially.

use client_core::config::{ENV_API_URL, ENV_DEV_ORIGIN, ENV_ENVIRONMENT};
use client_core::{ApiConfig, Environment};

use serial_test::serial;

fn clear_vars() {
    // SAFETY: tests touching these vars are #[serial]
    unsafe {
        std::env::remove_var(ENV_ENVIRONMENT);
        std::env::remove_var(ENV_API_URL);
        std::env::remove_var(ENV_DEV_ORIGIN);
    }
}

/// **VALUE**: Verifies `CRM_ENV` and `CRM_API_URL` select the production address at startup.
#[test]
#[serial]
fn given_production_env_vars_when_from_env_then_resolves_production_url() {
    clear_vars();
    // SAFETY: serialized with the other env tests
    unsafe {
        std::env::set_var(ENV_ENVIRONMENT, "production");
        std::env::set_var(ENV_API_URL, "https://crm.example.org/api");
    }

    let config = ApiConfig::from_env().unwrap();

    assert_eq!(config.environment, Environment::Production);
    assert_eq!(
        config.resolve_base_url().unwrap().as_str(),
        "https://crm.example.org/api"
    );
    clear_vars();
}

#[test]
#[serial]
fn given_development_env_var_when_from_env_then_resolves_proxy_api_path() {
    clear_vars();
    // SAFETY: serialized with the other env tests
    unsafe {
        std::env::set_var(ENV_ENVIRONMENT, "dev");
        std::env::set_var(ENV_DEV_ORIGIN, "http://127.0.0.1:5173");
    }

    let config = ApiConfig::from_env().unwrap();

    assert_eq!(
        config.resolve_base_url().unwrap().as_str(),
        "http://127.0.0.1:5173/api"
    );
    clear_vars();
}

#[test]
#[serial]
fn given_invalid_env_var_when_from_env_then_errors() {
    clear_vars();
    // SAFETY: serialized with the other env tests
    unsafe {
        std::env::set_var(ENV_ENVIRONMENT, "qa");
    }

    assert!(ApiConfig::from_env().is_err());
    clear_vars();
}
