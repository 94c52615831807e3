//! End-to-end tests for the signup / activation / login / 2FA flow,
//! driven against the in-memory repository.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    ActivateAccountUseCase, LoginInput, LoginOutput, LoginUseCase, SignUpInput, SignUpUseCase,
    VerifyTwoFactorInput, VerifyTwoFactorUseCase,
};
use crate::domain::repository::AccountRepository;
use crate::error::AuthError;
use crate::infra::memory::InMemoryAuthRepository;
use crate::infra::notifier::RecordingNotifier;

const EMAIL: &str = "alice@example.com";
const PASSWORD: &str = "CorrectHorse42!";

struct Harness {
    repo: Arc<InMemoryAuthRepository>,
    notifier: Arc<RecordingNotifier>,
    config: Arc<AuthConfig>,
}

impl Harness {
    fn new() -> Self {
        Self {
            repo: Arc::new(InMemoryAuthRepository::new()),
            notifier: Arc::new(RecordingNotifier::new()),
            config: Arc::new(AuthConfig::development()),
        }
    }

    async fn sign_up(&self, email: &str, password: &str) -> crate::error::AuthResult<kernel::id::AccountId> {
        let use_case = SignUpUseCase::new(
            self.repo.clone(),
            self.repo.clone(),
            self.notifier.clone(),
            self.config.clone(),
        );
        let output = use_case
            .execute(SignUpInput {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;
        Ok(output.account_id)
    }

    async fn activate(&self, raw_token: &str) -> crate::error::AuthResult<()> {
        ActivateAccountUseCase::new(self.repo.clone(), self.notifier.clone())
            .execute(raw_token)
            .await
    }

    async fn login(&self, email: &str, password: &str) -> crate::error::AuthResult<LoginOutput> {
        LoginUseCase::new(self.repo.clone(), self.config.clone())
            .execute(LoginInput {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await
    }

    async fn verify(
        &self,
        account_id: kernel::id::AccountId,
        code: &str,
    ) -> crate::error::AuthResult<String> {
        let use_case = VerifyTwoFactorUseCase::new(
            self.repo.clone(),
            self.repo.clone(),
            self.config.clone(),
        );
        let output = use_case
            .execute(VerifyTwoFactorInput {
                account_id,
                code: code.to_string(),
            })
            .await?;
        Ok(output.token)
    }

    /// Register and activate an account, returning its ID
    async fn activated_account(&self) -> kernel::id::AccountId {
        let account_id = self.sign_up(EMAIL, PASSWORD).await.unwrap();
        let raw = self.notifier.last_token_for(EMAIL).unwrap();
        self.activate(&raw).await.unwrap();
        account_id
    }

    /// Current TOTP code for the stored account secret
    async fn current_code(&self, account_id: &kernel::id::AccountId) -> String {
        let account = self.repo.find_by_id(account_id).await.unwrap().unwrap();
        account
            .totp_secret
            .generate_current(&account.email)
            .unwrap()
    }
}

// ============================================================================
// Signup and activation
// ============================================================================

#[tokio::test]
async fn test_signup_sends_activation_token() {
    let h = Harness::new();

    let account_id = h.sign_up(EMAIL, PASSWORD).await.unwrap();

    let account = h.repo.find_by_id(&account_id).await.unwrap().unwrap();
    assert!(!account.is_active);
    assert!(account.activation_token_hash.is_some());
    assert_eq!(account.roles.len(), 1);

    // Raw token went out, only the hash stayed behind
    let raw = h.notifier.last_token_for(EMAIL).unwrap();
    let hash = platform::one_time_token::hash_raw(&raw).unwrap();
    assert_eq!(account.activation_token_hash, Some(hash));
}

#[tokio::test]
async fn test_signup_duplicate_email_rejected() {
    let h = Harness::new();

    h.sign_up(EMAIL, PASSWORD).await.unwrap();
    let err = h.sign_up(EMAIL, PASSWORD).await.unwrap_err();
    assert!(matches!(err, AuthError::EmailTaken));
}

#[tokio::test]
async fn test_signup_rejects_invalid_input() {
    let h = Harness::new();

    assert!(matches!(
        h.sign_up("not-an-email", PASSWORD).await.unwrap_err(),
        AuthError::Validation(_)
    ));
    assert!(matches!(
        h.sign_up(EMAIL, "short").await.unwrap_err(),
        AuthError::Validation(_)
    ));
}

#[tokio::test]
async fn test_activation_token_is_single_use() {
    let h = Harness::new();

    h.sign_up(EMAIL, PASSWORD).await.unwrap();
    let raw = h.notifier.last_token_for(EMAIL).unwrap();

    h.activate(&raw).await.unwrap();

    // The hash was cleared on activation, so the lookup now misses
    let err = h.activate(&raw).await.unwrap_err();
    assert!(matches!(err, AuthError::ActivationTokenInvalid));
}

#[tokio::test]
async fn test_activation_unknown_token_rejected() {
    let h = Harness::new();

    let err = h.activate("definitely-not-a-token").await.unwrap_err();
    assert!(matches!(err, AuthError::ActivationTokenInvalid));
}

#[tokio::test]
async fn test_activation_expired_token_rejected() {
    let h = Harness::new();

    let account_id = h.sign_up(EMAIL, PASSWORD).await.unwrap();
    let raw = h.notifier.last_token_for(EMAIL).unwrap();

    // Push the stored expiry into the past
    let mut account = h.repo.find_by_id(&account_id).await.unwrap().unwrap();
    account.activation_token_expires_at = Some(chrono::Utc::now() - chrono::Duration::hours(1));
    h.repo.update(&account).await.unwrap();

    let err = h.activate(&raw).await.unwrap_err();
    assert!(matches!(err, AuthError::ActivationTokenExpired));
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_requires_activation() {
    let h = Harness::new();

    h.sign_up(EMAIL, PASSWORD).await.unwrap();

    let err = h.login(EMAIL, PASSWORD).await.unwrap_err();
    assert!(matches!(err, AuthError::AccountNotActivated));
}

#[tokio::test]
async fn test_login_wrong_password_rejected() {
    let h = Harness::new();
    h.activated_account().await;

    let err = h.login(EMAIL, "WrongPassword1!").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn test_login_unknown_email_rejected() {
    let h = Harness::new();

    let err = h.login("nobody@example.com", PASSWORD).await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn test_first_login_returns_enrollment_payload() {
    let h = Harness::new();
    h.activated_account().await;

    match h.login(EMAIL, PASSWORD).await.unwrap() {
        LoginOutput::SetupRequired {
            otpauth_url,
            qr_code,
            ..
        } => {
            assert!(otpauth_url.starts_with("otpauth://totp/"));
            assert!(!qr_code.is_empty());
        }
        LoginOutput::CodeRequired { .. } => panic!("expected enrollment payload"),
    }
}

#[tokio::test]
async fn test_second_login_only_asks_for_code() {
    let h = Harness::new();
    let account_id = h.activated_account().await;

    // Complete enrollment once
    let code = h.current_code(&account_id).await;
    h.verify(account_id, &code).await.unwrap();

    match h.login(EMAIL, PASSWORD).await.unwrap() {
        LoginOutput::CodeRequired { account_id: id } => assert_eq!(id, account_id),
        LoginOutput::SetupRequired { .. } => panic!("enrollment must not repeat"),
    }
}

// ============================================================================
// 2FA verification and token issuance
// ============================================================================

#[tokio::test]
async fn test_verify_issues_token_with_role_claims() {
    let h = Harness::new();
    let account_id = h.activated_account().await;

    let code = h.current_code(&account_id).await;
    let token = h.verify(account_id, &code).await.unwrap();

    let validator = token::TokenValidator::new(h.config.token.clone());
    let identity = validator.validate(&token).unwrap();

    assert_eq!(identity.subject, account_id.to_string());
    assert_eq!(identity.email, EMAIL);
    assert!(identity.roles.contains("ROLE_USER"));
    assert!(identity.permissions.contains("READ"));
}

#[tokio::test]
async fn test_verify_marks_enrollment_complete() {
    let h = Harness::new();
    let account_id = h.activated_account().await;

    let code = h.current_code(&account_id).await;
    h.verify(account_id, &code).await.unwrap();

    let account = h.repo.find_by_id(&account_id).await.unwrap().unwrap();
    assert!(account.two_factor_enabled);
}

#[tokio::test]
async fn test_verify_wrong_code_rejected() {
    let h = Harness::new();
    let account_id = h.activated_account().await;

    let err = h.verify(account_id, "000000").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidTwoFactorCode));

    // Failed enrollment must not flip the flag
    let account = h.repo.find_by_id(&account_id).await.unwrap().unwrap();
    assert!(!account.two_factor_enabled);
}

#[tokio::test]
async fn test_verify_unknown_account_rejected() {
    let h = Harness::new();

    let err = h.verify(kernel::id::AccountId::new(), "000000").await.unwrap_err();
    assert!(matches!(err, AuthError::AccountNotFound));
}

#[tokio::test]
async fn test_verify_requires_activation() {
    let h = Harness::new();

    let account_id = h.sign_up(EMAIL, PASSWORD).await.unwrap();
    let code = h.current_code(&account_id).await;

    let err = h.verify(account_id, &code).await.unwrap_err();
    assert!(matches!(err, AuthError::AccountNotActivated));
}

// ============================================================================
// HTTP surface
// ============================================================================

mod http {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::presentation::dto::{LoginResponse, SignUpResponse, TokenResponse, UserInfoResponse};
    use crate::presentation::router::auth_router_generic;

    fn router(h: &Harness) -> axum::Router {
        auth_router_generic(
            h.repo.clone(),
            h.notifier.clone(),
            (*h.config).clone(),
        )
    }

    async fn send(
        router: &axum::Router,
        method: &str,
        uri: &str,
        bearer: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_full_flow_over_http() {
        let h = Harness::new();
        let app = router(&h);

        // Signup
        let (status, body) = send(
            &app,
            "POST",
            "/signup",
            None,
            Some(serde_json::json!({ "email": EMAIL, "password": PASSWORD })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let signup: SignUpResponse = serde_json::from_slice(&body).unwrap();

        // Activate with the emailed token
        let raw = h.notifier.last_token_for(EMAIL).unwrap();
        let (status, _) = send(
            &app,
            "POST",
            "/activate",
            None,
            Some(serde_json::json!({ "token": raw })),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        // First login returns the enrollment payload
        let (status, body) = send(
            &app,
            "POST",
            "/login",
            None,
            Some(serde_json::json!({ "email": EMAIL, "password": PASSWORD })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let login: LoginResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(login.status, "2fa_setup");
        assert!(login.otpauth_url.unwrap().starts_with("otpauth://totp/"));
        assert!(!login.qr_code.unwrap().is_empty());

        // Verify the current code and receive the session token
        let code = h.current_code(&signup.account_id).await;
        let (status, body) = send(
            &app,
            "POST",
            "/verify-2fa",
            None,
            Some(serde_json::json!({ "accountId": signup.account_id, "code": code })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let issued: TokenResponse = serde_json::from_slice(&body).unwrap();

        // The token opens the protected route
        let (status, body) = send(&app, "GET", "/userinfo", Some(&issued.token), None).await;
        assert_eq!(status, StatusCode::OK);
        let info: UserInfoResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(info.email, EMAIL);
    }

    #[tokio::test]
    async fn test_userinfo_requires_bearer_token() {
        let h = Harness::new();
        let app = router(&h);

        let (status, _) = send(&app, "GET", "/userinfo", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, "GET", "/userinfo", Some("garbage"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_returning_login_has_no_enrollment_fields() {
        let h = Harness::new();
        let account_id = h.activated_account().await;
        let code = h.current_code(&account_id).await;
        h.verify(account_id, &code).await.unwrap();

        let app = router(&h);
        let (status, body) = send(
            &app,
            "POST",
            "/login",
            None,
            Some(serde_json::json!({ "email": EMAIL, "password": PASSWORD })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "2fa_required");
        assert!(json.get("otpauthUrl").is_none());
        assert!(json.get("qrCode").is_none());
    }
}
