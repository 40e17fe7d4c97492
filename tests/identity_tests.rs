use std::sync::Arc;

use chrono::{Duration, Utc};

use inventra::config::{AuthConfig, SecurityConfig};
use inventra::db::Store;
use inventra::entities::users::{UserRole, UserStatus};
use inventra::services::{
    IdentityError, IdentityService, NewAccount, SeaOrmIdentityService, SeaOrmUserService,
    TokenIssuer, UserService,
};

fn test_security() -> SecurityConfig {
    SecurityConfig {
        argon2_memory_cost_kib: 1024,
        argon2_time_cost: 1,
        argon2_parallelism: 1,
    }
}

fn test_auth() -> AuthConfig {
    AuthConfig {
        jwt_key: "service-test-signing-key".to_string(),
        ..AuthConfig::default()
    }
}

struct TestHarness {
    store: Store,
    identity: SeaOrmIdentityService,
    users: SeaOrmUserService,
}

async fn spawn_services() -> TestHarness {
    spawn_services_with_auth(test_auth()).await
}

async fn spawn_services_with_auth(auth: AuthConfig) -> TestHarness {
    let store = Store::with_pool_options("sqlite::memory:", 1, 1)
        .await
        .expect("Failed to open in-memory store");

    let issuer = Arc::new(TokenIssuer::new(&auth).expect("Failed to build issuer"));

    TestHarness {
        store: store.clone(),
        identity: SeaOrmIdentityService::new(store.clone(), issuer, &auth),
        users: SeaOrmUserService::new(store, test_security()),
    }
}

async fn signup_and_activate(harness: &TestHarness, email: &str, password: &str) {
    let user = harness
        .users
        .signup(NewAccount {
            first_name: "Amara".to_string(),
            last_name: "Okafor".to_string(),
            email: email.to_string(),
            password: password.to_string(),
        })
        .await
        .expect("signup failed");

    let code = user.metadata.activation.code.clone().unwrap();
    harness
        .users
        .verify_account(email, &code)
        .await
        .expect("verification failed");
}

#[tokio::test]
async fn test_signup_creates_inactive_account_with_code() {
    let harness = spawn_services().await;

    let user = harness
        .users
        .signup(NewAccount {
            first_name: "Amara".to_string(),
            last_name: "Okafor".to_string(),
            email: "Amara.Okafor@Example.COM".to_string(),
            password: "S3curePass!".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(user.email, "amara.okafor@example.com");
    assert_eq!(user.role, UserRole::User);
    assert_eq!(user.status, UserStatus::Inactive);
    assert!(user.metadata.activation.pending);
    assert_eq!(user.metadata.activation.code.as_ref().unwrap().len(), 8);
    assert_ne!(user.password_hash, "S3curePass!");
    assert_eq!(user.auth_key.len(), 32);
}

#[tokio::test]
async fn test_verify_activates_account() {
    let harness = spawn_services().await;
    signup_and_activate(&harness, "amara@example.com", "S3curePass!").await;

    let user = harness
        .store
        .find_user_by_email("amara@example.com")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(user.status, UserStatus::Active);
    assert!(!user.metadata.activation.pending);
    assert!(user.metadata.activation.code.is_none());
    assert!(user.metadata.activation.completed_at.is_some());
}

#[tokio::test]
async fn test_login_updates_history_and_clears_revocation() {
    let harness = spawn_services().await;
    signup_and_activate(&harness, "amara@example.com", "S3curePass!").await;

    let session = harness
        .identity
        .login("amara@example.com", "S3curePass!", Some("10.0.0.7".to_string()))
        .await
        .unwrap();

    assert_eq!(session.user.metadata.logged_in_history.success_count, 1);
    assert_eq!(
        session.user.metadata.logged_in_history.last_ip.as_deref(),
        Some("10.0.0.7")
    );
    assert!(!session.user.metadata.security.token_invalidate);
    assert!(!session.token.token.is_empty());

    let session = harness
        .identity
        .login("amara@example.com", "S3curePass!", None)
        .await
        .unwrap();

    assert_eq!(session.user.metadata.logged_in_history.success_count, 2);
}

#[tokio::test]
async fn test_login_denied_before_verification() {
    let harness = spawn_services().await;

    harness
        .users
        .signup(NewAccount {
            first_name: "Amara".to_string(),
            last_name: "Okafor".to_string(),
            email: "amara@example.com".to_string(),
            password: "S3curePass!".to_string(),
        })
        .await
        .unwrap();

    let err = harness
        .identity
        .login("amara@example.com", "S3curePass!", None)
        .await
        .unwrap_err();

    assert!(matches!(err, IdentityError::PendingVerification));

    // Wrong password on an unverified account still reads as access denied,
    // the status guard runs after credential verification
    let err = harness
        .identity
        .login("amara@example.com", "wrong", None)
        .await
        .unwrap_err();

    assert!(matches!(err, IdentityError::AccessDenied));
}

#[tokio::test]
async fn test_logout_sets_revocation_flag() {
    let harness = spawn_services().await;
    signup_and_activate(&harness, "amara@example.com", "S3curePass!").await;

    let session = harness
        .identity
        .login("amara@example.com", "S3curePass!", None)
        .await
        .unwrap();

    let auth_key = session.user.auth_key.clone();
    harness.identity.logout(session.user).await.unwrap();

    let err = harness
        .identity
        .resolve_claims(&auth_key, UserRole::User)
        .await
        .unwrap_err();

    assert!(matches!(err, IdentityError::Revoked));

    // Auth key is kept by default
    let user = harness
        .store
        .find_user_by_email("amara@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.auth_key, auth_key);
}

#[tokio::test]
async fn test_logout_with_key_rotation() {
    let auth = AuthConfig {
        refresh_auth_key_after_logout: true,
        ..test_auth()
    };
    let harness = spawn_services_with_auth(auth).await;
    signup_and_activate(&harness, "amara@example.com", "S3curePass!").await;

    let session = harness
        .identity
        .login("amara@example.com", "S3curePass!", None)
        .await
        .unwrap();

    let old_key = session.user.auth_key.clone();
    harness.identity.logout(session.user).await.unwrap();

    // The old key no longer resolves to any account
    let err = harness
        .identity
        .resolve_claims(&old_key, UserRole::User)
        .await
        .unwrap_err();

    assert!(matches!(err, IdentityError::TokenInvalidated));

    let user = harness
        .store
        .find_user_by_email("amara@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_ne!(user.auth_key, old_key);
}

#[tokio::test]
async fn test_resolve_claims_guard_order() {
    let harness = spawn_services().await;
    signup_and_activate(&harness, "amara@example.com", "S3curePass!").await;

    let session = harness
        .identity
        .login("amara@example.com", "S3curePass!", None)
        .await
        .unwrap();
    let auth_key = session.user.auth_key.clone();

    // Role tamper on a healthy account
    let err = harness
        .identity
        .resolve_claims(&auth_key, UserRole::Admin)
        .await
        .unwrap_err();
    assert!(matches!(err, IdentityError::IneligibleRole));

    // Status outranks the revocation flag and the role check
    let mut user = session.user;
    user.status = UserStatus::Blocked;
    user.metadata.security.token_invalidate = true;
    harness.store.save_user(user).await.unwrap().unwrap();

    let err = harness
        .identity
        .resolve_claims(&auth_key, UserRole::Admin)
        .await
        .unwrap_err();
    assert!(matches!(err, IdentityError::AccountBlocked));

    // Unknown key outranks everything
    let err = harness
        .identity
        .resolve_claims("no-such-key", UserRole::User)
        .await
        .unwrap_err();
    assert!(matches!(err, IdentityError::TokenInvalidated));
}

#[tokio::test]
async fn test_password_reset_flow() {
    let harness = spawn_services().await;
    signup_and_activate(&harness, "amara@example.com", "S3curePass!").await;

    harness
        .users
        .request_password_reset("amara@example.com")
        .await
        .unwrap();

    let user = harness
        .store
        .find_user_by_email("amara@example.com")
        .await
        .unwrap()
        .unwrap();
    let code = user.metadata.password.reset_code.clone().unwrap();
    assert_eq!(code.len(), 8);

    // Wrong code is rejected
    let err = harness
        .users
        .reset_password("amara@example.com", "WRONGCOD", "New-Pass-1")
        .await
        .unwrap_err();
    assert!(matches!(err, IdentityError::NotFound(_)));

    harness
        .users
        .reset_password("amara@example.com", &code, "New-Pass-1")
        .await
        .unwrap();

    // Code is consumed, outstanding tokens are revoked
    let user = harness
        .store
        .find_user_by_email("amara@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(user.metadata.password.reset_code.is_none());
    assert_eq!(user.metadata.password.reset_count, 1);
    assert!(user.metadata.security.token_invalidate);

    let err = harness
        .identity
        .login("amara@example.com", "S3curePass!", None)
        .await
        .unwrap_err();
    assert!(matches!(err, IdentityError::AccessDenied));

    harness
        .identity
        .login("amara@example.com", "New-Pass-1", None)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_password_reset_code_expires() {
    let harness = spawn_services().await;
    signup_and_activate(&harness, "amara@example.com", "S3curePass!").await;

    harness
        .users
        .request_password_reset("amara@example.com")
        .await
        .unwrap();

    let mut user = harness
        .store
        .find_user_by_email("amara@example.com")
        .await
        .unwrap()
        .unwrap();
    let code = user.metadata.password.reset_code.clone().unwrap();

    // Backdate the request past the TTL
    user.metadata.password.reset_code_requested_at = Some(Utc::now() - Duration::days(4));
    harness.store.save_user(user).await.unwrap().unwrap();

    let err = harness
        .users
        .reset_password("amara@example.com", &code, "New-Pass-1")
        .await
        .unwrap_err();

    assert!(matches!(err, IdentityError::ExpiredCode));
}

#[tokio::test]
async fn test_change_password_rotates_auth_key() {
    let harness = spawn_services().await;
    signup_and_activate(&harness, "amara@example.com", "S3curePass!").await;

    let session = harness
        .identity
        .login("amara@example.com", "S3curePass!", None)
        .await
        .unwrap();
    let old_key = session.user.auth_key.clone();

    // Reusing the current password is a validation error
    let err = harness
        .users
        .change_password(session.user.clone(), "S3curePass!", "S3curePass!")
        .await
        .unwrap_err();
    assert!(matches!(err, IdentityError::Validation(_)));

    let updated = harness
        .users
        .change_password(session.user, "S3curePass!", "New-Pass-1")
        .await
        .unwrap();

    assert_ne!(updated.auth_key, old_key);
    assert_eq!(updated.metadata.password.updated_count, 1);

    harness
        .identity
        .login("amara@example.com", "New-Pass-1", None)
        .await
        .unwrap();
}
