//! Integration tests for the login endpoints
//!
//! - POST /api/v1/login/access-token
//! - POST /api/v1/login/test-token
//! - POST /api/v1/password-recovery/{email}
//! - POST /api/v1/reset-password

mod common;

#[cfg(test)]
mod login_tests {
    use super::common::*;
    use axum::http::StatusCode;
    use backend::auth::generate_password_reset_token;
    use backend::dtos::{TokenDTO, UpdateUserDTO, UserDTO};
    use backend::repositories::Update;
    use serde_json::json;

    #[tokio::test]
    async fn test_login_success() {
        let (_, server) = setup().await;

        let response = server
            .post("/api/v1/login/access-token")
            .form(&[("username", SUPERUSER_EMAIL), ("password", SUPERUSER_PASSWORD)])
            .await;

        response.assert_status_ok();
        let token = response.json::<TokenDTO>();
        assert_eq!(token.token_type, "bearer");
        assert!(!token.access_token.is_empty());
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let (_, server) = setup().await;

        let response = server
            .post("/api/v1/login/access-token")
            .form(&[("username", SUPERUSER_EMAIL), ("password", "wrongpassword")])
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_login_unknown_user_same_answer_as_wrong_password() {
        let (_, server) = setup().await;

        let unknown = server
            .post("/api/v1/login/access-token")
            .form(&[("username", "ghost@example.com"), ("password", "password123")])
            .await;
        let wrong = server
            .post("/api/v1/login/access-token")
            .form(&[("username", SUPERUSER_EMAIL), ("password", "password123")])
            .await;

        unknown.assert_status_bad_request();
        assert_eq!(unknown.text(), wrong.text());
    }

    #[tokio::test]
    async fn test_login_inactive_user() {
        let (state, server) = setup().await;
        let user = insert_user(&state, "sleepy@example.com", "password123", false).await;
        state
            .user
            .update(
                &user.user_id,
                &UpdateUserDTO {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let response = server
            .post("/api/v1/login/access-token")
            .form(&[("username", "sleepy@example.com"), ("password", "password123")])
            .await;

        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Inactive user");
    }

    #[tokio::test]
    async fn test_login_missing_password_field() {
        let (_, server) = setup().await;

        let response = server
            .post("/api/v1/login/access-token")
            .form(&[("username", SUPERUSER_EMAIL)])
            .await;

        response.assert_status_unprocessable_entity();
    }

    #[tokio::test]
    async fn test_test_token_returns_current_user() {
        let (_, server) = setup().await;
        let token = superuser_token(&server).await;

        let response = server
            .post("/api/v1/login/test-token")
            .authorization_bearer(&token)
            .await;

        response.assert_status_ok();
        let user = response.json::<UserDTO>();
        assert_eq!(user.email, SUPERUSER_EMAIL);
        assert!(user.is_superuser);
    }

    #[tokio::test]
    async fn test_test_token_without_header_is_forbidden() {
        let (_, server) = setup().await;

        let response = server.post("/api/v1/login/test-token").await;

        response.assert_status_forbidden();
    }

    #[tokio::test]
    async fn test_test_token_with_garbage_token_is_forbidden() {
        let (_, server) = setup().await;

        let response = server
            .post("/api/v1/login/test-token")
            .authorization_bearer("not.a.jwt")
            .await;

        response.assert_status_forbidden();
    }

    #[tokio::test]
    async fn test_expired_access_token_is_forbidden() {
        let (state, server) = setup().await;
        let alice = insert_user(&state, "alice@example.com", "password123", false).await;
        // expired well past the default 60s leeway
        let token = backend::core::encode_jwt(alice.user_id, JWT_SECRET, -5).unwrap();

        let response = server
            .post("/api/v1/login/test-token")
            .authorization_bearer(&token)
            .await;

        response.assert_status_forbidden();
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Could not validate credentials");
    }

    #[tokio::test]
    async fn test_inactive_user_token_is_rejected() {
        let (state, server) = setup().await;
        let user = insert_user(&state, "sleepy@example.com", "password123", false).await;
        let token = create_test_jwt(user.user_id);
        state
            .user
            .update(
                &user.user_id,
                &UpdateUserDTO {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let response = server
            .get("/api/v1/users/me")
            .authorization_bearer(&token)
            .await;

        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Inactive user");
    }

    #[tokio::test]
    async fn test_token_for_missing_user_is_not_found() {
        let (_, server) = setup().await;

        let response = server
            .post("/api/v1/login/test-token")
            .authorization_bearer(create_test_jwt(9999))
            .await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn test_password_recovery_same_answer_for_unknown_email() {
        let (_, server) = setup().await;

        let known = server
            .post(&format!("/api/v1/password-recovery/{SUPERUSER_EMAIL}"))
            .await;
        let unknown = server
            .post("/api/v1/password-recovery/ghost@example.com")
            .await;

        known.assert_status_ok();
        unknown.assert_status_ok();
        assert_eq!(known.text(), unknown.text());
    }

    #[tokio::test]
    async fn test_reset_password_flow() {
        let (state, server) = setup().await;
        insert_user(&state, "forgetful@example.com", "oldpassword", false).await;
        let token = generate_password_reset_token("forgetful@example.com", JWT_SECRET, 48).unwrap();

        let response = server
            .post("/api/v1/reset-password")
            .json(&json!({ "token": token, "new_password": "newpassword" }))
            .await;

        response.assert_status_ok();

        let login = server
            .post("/api/v1/login/access-token")
            .form(&[("username", "forgetful@example.com"), ("password", "newpassword")])
            .await;
        login.assert_status_ok();
    }

    #[tokio::test]
    async fn test_reset_password_invalid_token() {
        let (_, server) = setup().await;

        let response = server
            .post("/api/v1/reset-password")
            .json(&json!({ "token": "invalid", "new_password": "newpassword" }))
            .await;

        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Invalid token");
    }

    #[tokio::test]
    async fn test_reset_password_expired_token() {
        let (state, server) = setup().await;
        insert_user(&state, "forgetful@example.com", "oldpassword", false).await;
        let token = generate_password_reset_token("forgetful@example.com", JWT_SECRET, -1).unwrap();

        let response = server
            .post("/api/v1/reset-password")
            .json(&json!({ "token": token, "new_password": "newpassword" }))
            .await;

        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Invalid token");

        // the old password still works
        login(&server, "forgetful@example.com", "oldpassword").await;
    }

    #[tokio::test]
    async fn test_reset_password_unknown_user() {
        let (_, server) = setup().await;
        let token = generate_password_reset_token("ghost@example.com", JWT_SECRET, 48).unwrap();

        let response = server
            .post("/api/v1/reset-password")
            .json(&json!({ "token": token, "new_password": "newpassword" }))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }
}
