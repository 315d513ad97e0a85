//! Email-link flows and account management: verification tokens, password
//! reset, password change, and role-gated user administration.

mod common;

use miprecio_api::auth::password;
use miprecio_api::user::User;

use common::{login, signup_verified, spawn_app, TestServer};

/// Insert a verified admin directly into the store; cheap cost keeps the
/// test suite fast.
async fn seed_admin(server: &TestServer) -> (String, String) {
    let email = "admin@example.com".to_string();
    let secret = "admin-password".to_string();
    let digest = password::hash(&secret, 4).expect("hash");
    let mut admin = User::new("Admin Account", &email, &digest);
    admin.role = "admin".to_string();
    admin.is_verified = true;
    server.state.users.insert(&admin).await.expect("insert");
    (email, secret)
}

#[tokio::test]
async fn verification_rejects_tampered_and_expired_tokens() {
    let server = spawn_app().await;

    let resp = server
        .client
        .get(server.url("/api/v1/auth/verify/not-a-real-token"))
        .send()
        .await
        .expect("verify request");
    assert_eq!(resp.status(), 401);
    let body: serde_json::Value = resp.json().await.expect("body");
    assert_eq!(body["error_code"], "invalid_token");

    let expired = server
        .state
        .safe_tokens
        .issue("ana@example.com", -1)
        .expect("issue");
    let resp = server
        .client
        .get(server.url(&format!("/api/v1/auth/verify/{expired}")))
        .send()
        .await
        .expect("verify request");
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn password_reset_flow_changes_the_password() {
    let server = spawn_app().await;
    let (email, old_password) = signup_verified(&server, "ana@example.com").await;

    // Request never discloses whether the account exists
    for candidate in [email.as_str(), "nobody@example.com"] {
        let resp = server
            .client
            .post(server.url("/api/v1/auth/password-reset-request"))
            .json(&serde_json::json!({ "email": candidate }))
            .send()
            .await
            .expect("reset request");
        assert_eq!(resp.status(), 200);
    }

    let token = server.state.safe_tokens.issue(&email, 900).expect("issue");
    let resp = server
        .client
        .post(server.url(&format!("/api/v1/auth/password-reset-confirm/{token}")))
        .json(&serde_json::json!({
            "new_password": "brand-new-password",
            "confirm_new_password": "brand-new-password",
        }))
        .send()
        .await
        .expect("confirm request");
    assert_eq!(resp.status(), 200);

    // Old password no longer works; the new one does
    let resp = server
        .client
        .post(server.url("/api/v1/auth/login"))
        .json(&serde_json::json!({ "email": email, "password": old_password }))
        .send()
        .await
        .expect("login request");
    assert_eq!(resp.status(), 400);

    login(&server, &email, "brand-new-password").await;
}

#[tokio::test]
async fn password_reset_confirm_requires_matching_passwords() {
    let server = spawn_app().await;
    let (email, _) = signup_verified(&server, "ana@example.com").await;

    let token = server.state.safe_tokens.issue(&email, 900).expect("issue");
    let resp = server
        .client
        .post(server.url(&format!("/api/v1/auth/password-reset-confirm/{token}")))
        .json(&serde_json::json!({
            "new_password": "one-password",
            "confirm_new_password": "another-password",
        }))
        .send()
        .await
        .expect("confirm request");
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = resp.json().await.expect("body");
    assert_eq!(body["error_code"], "password_not_match");
}

#[tokio::test]
async fn password_change_validates_old_and_new_passwords() {
    let server = spawn_app().await;
    let (email, current) = signup_verified(&server, "ana@example.com").await;
    let (access, _) = login(&server, &email, &current).await;

    // Mismatched confirmation
    let resp = server
        .client
        .patch(server.url("/api/v1/users/password"))
        .bearer_auth(&access)
        .json(&serde_json::json!({
            "old_password": current,
            "new_password": "next-password",
            "confirm_new_password": "different-password",
        }))
        .send()
        .await
        .expect("change request");
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.expect("body");
    assert_eq!(body["error_code"], "password_not_match");

    // New password identical to the old one
    let resp = server
        .client
        .patch(server.url("/api/v1/users/password"))
        .bearer_auth(&access)
        .json(&serde_json::json!({
            "old_password": current,
            "new_password": current,
            "confirm_new_password": current,
        }))
        .send()
        .await
        .expect("change request");
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.expect("body");
    assert_eq!(body["error_code"], "password_match");

    // Valid change
    let resp = server
        .client
        .patch(server.url("/api/v1/users/password"))
        .bearer_auth(&access)
        .json(&serde_json::json!({
            "old_password": current,
            "new_password": "next-password",
            "confirm_new_password": "next-password",
        }))
        .send()
        .await
        .expect("change request");
    assert_eq!(resp.status(), 200);

    login(&server, &email, "next-password").await;
}

#[tokio::test]
async fn user_listing_is_admin_only() {
    let server = spawn_app().await;
    let (email, secret) = signup_verified(&server, "ana@example.com").await;
    let (user_access, _) = login(&server, &email, &secret).await;

    let resp = server
        .client
        .get(server.url("/api/v1/users/"))
        .bearer_auth(&user_access)
        .send()
        .await
        .expect("list request");
    assert_eq!(resp.status(), 401);
    let body: serde_json::Value = resp.json().await.expect("body");
    assert_eq!(body["error_code"], "insufficient_permissions");

    let (admin_email, admin_secret) = seed_admin(&server).await;
    let (admin_access, _) = login(&server, &admin_email, &admin_secret).await;
    let resp = server
        .client
        .get(server.url("/api/v1/users/"))
        .bearer_auth(&admin_access)
        .send()
        .await
        .expect("list request");
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.expect("body");
    assert_eq!(body.as_array().expect("array").len(), 2);
}

#[tokio::test]
async fn admins_create_partner_accounts() {
    let server = spawn_app().await;
    let (admin_email, admin_secret) = seed_admin(&server).await;
    let (admin_access, _) = login(&server, &admin_email, &admin_secret).await;

    let resp = server
        .client
        .post(server.url("/api/v1/users/"))
        .bearer_auth(&admin_access)
        .json(&serde_json::json!({
            "fullname": "Partner Account",
            "email": "partner@example.com",
            "password": "partner-password",
        }))
        .send()
        .await
        .expect("create request");
    assert_eq!(resp.status(), 201);

    let body: serde_json::Value = resp.json().await.expect("body");
    assert_eq!(body["user"]["role"], "partner");

    // The partner verifies and logs in like any other account
    let token = server
        .state
        .safe_tokens
        .issue("partner@example.com", 900)
        .expect("safe token");
    let resp = server
        .client
        .get(server.url(&format!("/api/v1/auth/verify/{token}")))
        .send()
        .await
        .expect("verify request");
    assert_eq!(resp.status(), 200);

    let (partner_access, _) = login(&server, "partner@example.com", "partner-password").await;
    let resp = server
        .client
        .get(server.url("/api/v1/auth/me"))
        .bearer_auth(&partner_access)
        .send()
        .await
        .expect("me request");
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.expect("body");
    assert_eq!(body["role"], "partner");
}

#[tokio::test]
async fn partner_creation_is_admin_only_and_rejects_duplicates() {
    let server = spawn_app().await;
    let (user_email, user_secret) = signup_verified(&server, "ana@example.com").await;
    let (user_access, _) = login(&server, &user_email, &user_secret).await;

    let resp = server
        .client
        .post(server.url("/api/v1/users/"))
        .bearer_auth(&user_access)
        .json(&serde_json::json!({
            "fullname": "Sneaky Partner",
            "email": "sneaky@example.com",
            "password": "partner-password",
        }))
        .send()
        .await
        .expect("create request");
    assert_eq!(resp.status(), 401);
    let body: serde_json::Value = resp.json().await.expect("body");
    assert_eq!(body["error_code"], "insufficient_permissions");

    // An existing email cannot be turned into a partner account
    let (admin_email, admin_secret) = seed_admin(&server).await;
    let (admin_access, _) = login(&server, &admin_email, &admin_secret).await;
    let resp = server
        .client
        .post(server.url("/api/v1/users/"))
        .bearer_auth(&admin_access)
        .json(&serde_json::json!({
            "fullname": "Duplicate Partner",
            "email": user_email,
            "password": "partner-password",
        }))
        .send()
        .await
        .expect("create request");
    assert_eq!(resp.status(), 403);
    let body: serde_json::Value = resp.json().await.expect("body");
    assert_eq!(body["error_code"], "user_exists");
}

#[tokio::test]
async fn user_insert_is_atomic_on_duplicate_emails() {
    // Two accounts racing for the same email: the store admits exactly one,
    // and the loser surfaces as a duplicate even without the pre-check.
    let server = spawn_app().await;
    let digest = password::hash("s3cret-password", 4).expect("hash");

    let first = User::new("First Account", "race@example.com", &digest);
    let second = User::new("Second Account", "race@example.com", &digest);

    assert!(server.state.users.insert(&first).await.expect("insert"));
    assert!(!server.state.users.insert(&second).await.expect("insert"));

    let stored = server
        .state
        .users
        .find_by_email("race@example.com")
        .await
        .expect("lookup")
        .expect("exists");
    assert_eq!(stored.fullname, "First Account");
}

#[tokio::test]
async fn users_can_only_rename_themselves_unless_admin() {
    let server = spawn_app().await;
    let (ana_email, ana_secret) = signup_verified(&server, "ana@example.com").await;
    let (ben_email, ben_secret) = signup_verified(&server, "ben@example.com").await;
    let (ana_access, _) = login(&server, &ana_email, &ana_secret).await;
    let (ben_access, _) = login(&server, &ben_email, &ben_secret).await;

    let ana = server
        .state
        .users
        .find_by_email(&ana_email)
        .await
        .expect("lookup")
        .expect("ana exists");

    // Ben cannot rename Ana
    let resp = server
        .client
        .patch(server.url(&format!("/api/v1/users/{}", ana.uid)))
        .bearer_auth(&ben_access)
        .json(&serde_json::json!({ "fullname": "Hijacked" }))
        .send()
        .await
        .expect("patch request");
    assert_eq!(resp.status(), 401);

    // Ana can rename herself
    let resp = server
        .client
        .patch(server.url(&format!("/api/v1/users/{}", ana.uid)))
        .bearer_auth(&ana_access)
        .json(&serde_json::json!({ "fullname": "Ana Renamed" }))
        .send()
        .await
        .expect("patch request");
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.expect("body");
    assert_eq!(body["fullname"], "Ana Renamed");

    // An admin can rename anyone
    let (admin_email, admin_secret) = seed_admin(&server).await;
    let (admin_access, _) = login(&server, &admin_email, &admin_secret).await;
    let resp = server
        .client
        .patch(server.url(&format!("/api/v1/users/{}", ana.uid)))
        .bearer_auth(&admin_access)
        .json(&serde_json::json!({ "fullname": "Ana Admin-Renamed" }))
        .send()
        .await
        .expect("patch request");
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn malformed_user_ids_are_a_client_error() {
    let server = spawn_app().await;
    let (email, secret) = signup_verified(&server, "ana@example.com").await;
    let (access, _) = login(&server, &email, &secret).await;

    let resp = server
        .client
        .get(server.url("/api/v1/users/not-a-uuid"))
        .bearer_auth(&access)
        .send()
        .await
        .expect("get request");
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = resp.json().await.expect("body");
    assert_eq!(body["error_code"], "invalid_request");
}
