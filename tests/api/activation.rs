use crate::helpers::spawn_app;
use secrecy::ExposeSecret;

#[tokio::test]
async fn a_valid_token_activates_the_user() {
    // Given
    let app = spawn_app().await;
    let user = app.register("ursula@example.com");
    let token = app.issue_token("ursula@example.com").await;

    // When
    let response = app.activate_with("ursula@example.com", &token).await;

    // Then
    assert_eq!(200, response.status().as_u16());
    let saved = app.users.get(user.user_id).unwrap().unwrap();
    assert!(saved.is_active);
    assert!(saved.email_verification_token.is_none());
    assert!(saved.email_verification_expiration.is_none());
}

#[tokio::test]
async fn a_token_cannot_be_used_twice() {
    // Given
    let app = spawn_app().await;
    app.register("ursula@example.com");
    let token = app.issue_token("ursula@example.com").await;

    // When
    let first = app.activate_with("ursula@example.com", &token).await;
    let second = app.activate_with("ursula@example.com", &token).await;

    // Then
    assert_eq!(200, first.status().as_u16());
    assert_eq!(401, second.status().as_u16());
}

#[tokio::test]
async fn a_reissued_token_replaces_the_previous_one() {
    // Given
    let app = spawn_app().await;
    app.register("ursula@example.com");
    let first = app.issue_token("ursula@example.com").await;
    let second = app.issue_token("ursula@example.com").await;

    // When
    let stale = app.activate_with("ursula@example.com", &first).await;
    let fresh = app.activate_with("ursula@example.com", &second).await;

    // Then
    assert_eq!(401, stale.status().as_u16());
    assert_eq!(200, fresh.status().as_u16());
}

#[tokio::test]
async fn a_token_issued_for_another_account_is_rejected() {
    // Given
    let app = spawn_app().await;
    app.register("ursula@example.com");
    app.register("le.guin@example.com");
    let _ = app.issue_token("ursula@example.com").await;
    let other = app.issue_token("le.guin@example.com").await;

    // When
    let response = app.activate_with("ursula@example.com", &other).await;

    // Then
    assert_eq!(401, response.status().as_u16());
}

#[tokio::test]
async fn rejections_are_indistinguishable() {
    // Given
    let app = spawn_app().await;
    app.register("ursula@example.com");
    app.register("never.issued@example.com");
    let token = app.issue_token("ursula@example.com").await;
    let test_cases = vec![
        ("ursula@example.com", "wrong-token".to_string(), "wrong token"),
        ("nobody@example.com", token.expose_secret().clone(), "unknown user"),
        ("never.issued@example.com", token.expose_secret().clone(), "no token issued"),
    ];

    // When
    for (email, token, description) in test_cases {
        let response = app.get_activate(email, &token).await;

        // Then
        assert_eq!(
            401,
            response.status().as_u16(),
            "The API did not reject the activation when the case was {}.",
            description
        );
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body, serde_json::json!({ "error": "ACTIVATION_REJECTED" }));
    }
}

#[tokio::test]
async fn an_expired_token_is_rejected() {
    // Given
    let app = spawn_app().await;
    let user = app.register("ursula@example.com");
    let token = app.issue_token("ursula@example.com").await;

    let mut stored = app.users.get(user.user_id).unwrap().unwrap();
    stored.email_verification_expiration =
        Some(chrono::Utc::now() - chrono::Duration::seconds(1));
    app.users.insert_user(stored).unwrap();

    // When
    let response = app.activate_with("ursula@example.com", &token).await;

    // Then
    assert_eq!(401, response.status().as_u16());
    assert!(!app.users.get(user.user_id).unwrap().unwrap().is_active);
}

#[tokio::test]
async fn activate_returns_a_400_for_invalid_parameters() {
    // Given
    let app = spawn_app().await;
    let test_cases = vec![
        ("not-an-email", "token", "invalid email"),
        ("", "token", "empty email"),
        ("ursula@example.com", "", "empty token"),
    ];

    // When
    for (email, token, error_message) in test_cases {
        let response = app.get_activate(email, token).await;

        // Then
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload was {}.",
            error_message
        );
    }
}

#[tokio::test]
async fn activate_returns_a_400_when_parameters_are_missing() {
    // Given
    let app = spawn_app().await;

    // When
    let response = app
        .api_client
        .get(&format!("{}/activate", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    // Then
    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn an_invalid_email_is_not_echoed_back() {
    // Given
    let app = spawn_app().await;

    // When
    let response = app.get_activate("<script>not-an-email", "token").await;

    // Then
    assert_eq!(400, response.status().as_u16());
    let body = response.text().await.unwrap();
    assert!(!body.contains("<script>not-an-email"));
}
