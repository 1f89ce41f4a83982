use crate::helpers::spawn_app;

#[tokio::test]
async fn health_check_works() {
    // Given
    let app = spawn_app().await;

    // When
    let response = app
        .api_client
        .get(&format!("{}/health_check", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    // Then
    assert!(response.status().is_success());
    assert_eq!(Some(0), response.content_length());
}
