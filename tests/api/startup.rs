use std::sync::Arc;

use account_activation::configuration::{ApplicationSettings, Settings};
use account_activation::startup::Application;
use account_activation::users::InMemoryUserRepository;
use secrecy::Secret;

use crate::helpers::test_activation_settings;

fn settings_with(secret: &str, hours: u32) -> Settings {
    let mut activation = test_activation_settings();
    activation.secret_key = Secret::new(secret.to_string());
    activation.expiration_hours = hours;
    Settings {
        application: ApplicationSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        activation,
    }
}

#[tokio::test]
async fn the_application_refuses_to_start_without_a_secret() {
    // When
    let result =
        Application::build(settings_with("", 1), Arc::new(InMemoryUserRepository::new())).await;

    // Then
    assert!(result.is_err());
}

#[tokio::test]
async fn the_application_refuses_to_start_without_a_validity_window() {
    // When
    let result = Application::build(
        settings_with("test-secret", 0),
        Arc::new(InMemoryUserRepository::new()),
    )
    .await;

    // Then
    assert!(result.is_err());
}
