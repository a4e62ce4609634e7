use std::time::Duration;

use mealie_sdk::config::{
    ClientConfig, Credentials, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY, DEFAULT_TIMEOUT, ENV_API_TOKEN,
    ENV_BASE_URL, ENV_PASSWORD, ENV_RETRY_ATTEMPTS, ENV_RETRY_BACKOFF, ENV_RETRY_DELAY, ENV_TIMEOUT,
    ENV_USERNAME, ENV_VERIFY_SSL,
};
use mealie_sdk::{Backoff, MealieClient, MealieError};
use serial_test::serial;

const ALL_VARS: [&str; 9] = [
    ENV_BASE_URL,
    ENV_API_TOKEN,
    ENV_USERNAME,
    ENV_PASSWORD,
    ENV_TIMEOUT,
    ENV_RETRY_ATTEMPTS,
    ENV_RETRY_DELAY,
    ENV_RETRY_BACKOFF,
    ENV_VERIFY_SSL,
];

fn set_env(vars: &[(&str, &str)]) {
    for key in ALL_VARS {
        std::env::remove_var(key);
    }
    for (key, value) in vars {
        std::env::set_var(key, value);
    }
}

#[test_log::test]
#[serial]
fn test_env_token_takes_precedence() {
    set_env(&[
        (ENV_BASE_URL, "https://mealie.example.com/api/"),
        (ENV_API_TOKEN, "api-token"),
        (ENV_USERNAME, "cook"),
        (ENV_PASSWORD, "secret"),
    ]);

    let config = ClientConfig::from_env().expect("valid environment");
    assert_eq!(config.base_url(), "https://mealie.example.com");
    assert_eq!(config.credentials(), &Credentials::token("api-token"));
    assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
    assert_eq!(config.retry().max_attempts, DEFAULT_MAX_ATTEMPTS);
    assert_eq!(config.retry().delay, DEFAULT_RETRY_DELAY);
    assert_eq!(config.retry().backoff, Backoff::Fixed);
    assert!(config.verify_ssl());
    assert_eq!(config.api_url("recipes"), "https://mealie.example.com/api/recipes");
}

#[test_log::test]
#[serial]
fn test_env_password_and_tuning() {
    set_env(&[
        (ENV_BASE_URL, "http://localhost:9925"),
        (ENV_USERNAME, "cook"),
        (ENV_PASSWORD, "secret"),
        (ENV_TIMEOUT, "7.5"),
        (ENV_RETRY_ATTEMPTS, "4"),
        (ENV_RETRY_DELAY, "0.5"),
        (ENV_RETRY_BACKOFF, "Exponential"),
        (ENV_VERIFY_SSL, "false"),
    ]);

    let config = ClientConfig::from_env().expect("valid environment");
    assert_eq!(config.credentials(), &Credentials::password("cook", "secret"));
    assert_eq!(config.timeout(), Duration::from_millis(7500));
    assert_eq!(config.retry().max_attempts, 4);
    assert_eq!(config.retry().delay_for(1), Duration::from_millis(500));
    assert_eq!(config.retry().delay_for(3), Duration::from_secs(2));
    assert!(!config.verify_ssl());

    let client = MealieClient::from_env().expect("client from environment");
    assert_eq!(client.base_url(), "http://localhost:9925");
}

#[test_log::test]
#[serial]
fn test_env_rejects_bad_values() {
    let cases: [&[(&str, &str)]; 8] = [
        &[(ENV_API_TOKEN, "tok")],
        &[(ENV_BASE_URL, "ftp://mealie.example.com"), (ENV_API_TOKEN, "tok")],
        &[(ENV_BASE_URL, "https://mealie.example.com")],
        &[(ENV_BASE_URL, "https://mealie.example.com"), (ENV_API_TOKEN, "tok"), (ENV_RETRY_ATTEMPTS, "0")],
        &[(ENV_BASE_URL, "https://mealie.example.com"), (ENV_API_TOKEN, "tok"), (ENV_TIMEOUT, "soon")],
        &[(ENV_BASE_URL, "https://mealie.example.com"), (ENV_API_TOKEN, "tok"), (ENV_TIMEOUT, "1e30")],
        &[(ENV_BASE_URL, "https://mealie.example.com"), (ENV_API_TOKEN, "tok"), (ENV_RETRY_DELAY, "1e300")],
        &[(ENV_BASE_URL, "https://mealie.example.com"), (ENV_API_TOKEN, "tok"), (ENV_VERIFY_SSL, "maybe")],
    ];

    for vars in cases {
        set_env(vars);
        let result = ClientConfig::from_env();
        assert!(
            matches!(result, Err(MealieError::Config(_))),
            "expected config error for {:?}, got {:?}",
            vars,
            result
        );
    }
    set_env(&[]);
}

#[test]
fn test_credentials_are_redacted_in_debug_output() {
    let config = ClientConfig::builder("https://mealie.example.com")
        .password("cook", "hunter2")
        .build()
        .unwrap();

    let debug = format!("{:?}", config);
    assert!(debug.contains("cook"));
    assert!(!debug.contains("hunter2"));
}
