//! 인증 API 라우트
//!
//! 로그인/로그아웃 엔드포인트를 제공합니다.
//!
//! # 엔드포인트
//!
//! - `POST /v1/auth/login` - 자격증명 검증 후 JWT 발급
//! - `POST /v1/auth/logout` - 인증 쿠키 제거
//!
//! 로그인 본문은 JSON(`{"username": ..., "password": ...}`)을 우선 해석하고,
//! 실패하면 urlencoded 폼 필드로 해석합니다. 서버는 세션을 유지하지 않으므로
//! 로그아웃은 쿠키 제거 외에 토큰을 무효화하지 않습니다.

use axum::{
    body::Body,
    extract::{Form, FromRequest, Request, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use utoipa::ToSchema;

use crate::auth::{create_token, Claims};
use crate::error::ApiError;
use crate::state::AppState;

/// 로그인 본문 최대 크기 (바이트).
const LOGIN_BODY_LIMIT: usize = 16 * 1024;

// ================================================================================================
// Request/Response Types
// ================================================================================================

/// 로그인 요청
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// 로그인 아이디
    pub username: String,
    /// 비밀번호 (평문, TLS 전제)
    pub password: String,
}

/// 로그인 응답
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// 발급된 JWT
    pub access_token: String,
    /// 토큰 타입 (항상 "Bearer")
    pub token_type: String,
}

/// 로그아웃 응답
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LogoutResponse {
    pub message: String,
}

// ================================================================================================
// Handlers
// ================================================================================================

/// 요청 본문을 로그인 자격증명으로 해석합니다.
///
/// JSON을 먼저 시도하고, 실패하면 urlencoded 폼으로 폴백합니다.
/// 폼 해석의 Content-Type 검사는 `Form` 추출기가 수행합니다.
async fn read_credentials(request: Request) -> Result<LoginRequest, ApiError> {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, LOGIN_BODY_LIMIT)
        .await
        .map_err(|_| ApiError::new(StatusCode::BAD_REQUEST, "Unable to read request body"))?;

    // JSON이 우선한다
    if let Ok(credentials) = serde_json::from_slice::<LoginRequest>(&bytes) {
        return Ok(credentials);
    }

    let request = Request::from_parts(parts, Body::from(bytes));
    match Form::<LoginRequest>::from_request(request, &()).await {
        Ok(Form(credentials)) => Ok(credentials),
        Err(_) => Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "Malformed login request",
        )),
    }
}

/// POST /v1/auth/login - 자격증명 검증 후 JWT 발급
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "로그인 성공", body = LoginResponse),
        (status = 400, description = "본문 해석 실패", body = ApiError),
        (status = 401, description = "인증 실패", body = ApiError)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<LoginResponse>, ApiError> {
    let path = request.uri().path().to_string();

    let credentials = read_credentials(request)
        .await
        .map_err(|err| err.with_path(path.clone()))?;

    debug!("로그인 시도: {}", credentials.username);

    let identity = state
        .verifier
        .verify(&credentials.username, &credentials.password)
        .await
        .map_err(|err| {
            warn!("로그인 실패: {}", credentials.username);
            ApiError::from(err).with_path(path.clone())
        })?;

    let claims = Claims::new(
        identity.username.clone(),
        identity.roles,
        state.token_ttl_minutes(),
    );
    let token = create_token(&claims, state.jwt_secret()).map_err(|err| {
        tracing::error!(error = %err, "토큰 발급 실패");
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Unexpected server error")
            .with_path(path.clone())
    })?;

    info!("로그인 성공: {}", identity.username);

    Ok(Json(LoginResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
    }))
}

/// POST /v1/auth/logout - 인증 쿠키 제거
///
/// 서버는 세션을 갖지 않으므로 토큰 자체는 만료까지 유효합니다.
/// 쿠키로 토큰을 보관하는 클라이언트를 위해 만료된 Set-Cookie를 내려줍니다.
#[utoipa::path(
    post,
    path = "/v1/auth/logout",
    responses(
        (status = 200, description = "로그아웃 성공", body = LogoutResponse)
    ),
    tag = "auth"
)]
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let expired_cookie = format!("{}=; Path=/; Max-Age=0; HttpOnly", state.cookie_name());

    (
        [(header::SET_COOKIE, expired_cookie)],
        Json(LogoutResponse {
            message: "Logged out successfully".to_string(),
        }),
    )
}

// ================================================================================================
// Router
// ================================================================================================

/// 인증 라우터 생성.
pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::auth::{decode_token, hash_password};
    use crate::state::TEST_JWT_SECRET;
    use ems_core::{
        AppConfig, InMemoryEmployeeStore, InMemoryUserStore, Role, UserAccount,
    };

    /// 사용자 하나를 시드한 테스트 앱을 만든다.
    async fn test_app(username: &str, password: &str, roles: Vec<Role>) -> Router {
        let users = InMemoryUserStore::new();
        let hash = hash_password(password).unwrap();
        users.seed(UserAccount::new(username, hash, roles)).await;

        let state = AppState::new(
            AppConfig::default(),
            TEST_JWT_SECRET,
            Arc::new(InMemoryEmployeeStore::new()),
            Arc::new(users),
        );

        Router::new().nest("/v1/auth", auth_router()).with_state(state)
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_login_returns_bearer_token() {
        let app = test_app("admin", "correct-horse", vec![Role::Admin]).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"username": "admin", "password": "correct-horse"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let login: LoginResponse = body_json(response).await;
        assert_eq!(login.token_type, "Bearer");

        // 토큰이 올바른 주체와 역할을 담는지 확인
        let decoded = decode_token(&login.access_token, TEST_JWT_SECRET).unwrap();
        assert_eq!(decoded.claims.sub, "admin");
        assert!(decoded.claims.roles.contains(&Role::Admin));
    }

    #[tokio::test]
    async fn test_login_failure_is_uniform_401() {
        let app = test_app("admin", "correct-horse", vec![Role::Admin]).await;

        // 잘못된 비밀번호와 존재하지 않는 사용자 모두 같은 메시지
        for body in [
            r#"{"username": "admin", "password": "wrong"}"#,
            r#"{"username": "nobody", "password": "correct-horse"}"#,
        ] {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/v1/auth/login")
                        .header(header::CONTENT_TYPE, "application/json")
                        .body(Body::from(body))
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

            let error: ApiError = body_json(response).await;
            assert_eq!(error.message, "Invalid username or password");
            assert_eq!(error.path, Some("/v1/auth/login".to_string()));
        }
    }

    #[tokio::test]
    async fn test_login_accepts_form_encoded_body() {
        let app = test_app("manager", "p@ss word", vec![Role::Manager]).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/auth/login")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    // 퍼센트 인코딩된 비밀번호가 복원되는지 확인
                    .body(Body::from("username=manager&password=p%40ss%20word"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_login_prefers_json_over_form_content_type() {
        // Content-Type이 폼이어도 본문이 유효한 JSON이면 JSON으로 해석한다
        let app = test_app("admin", "correct-horse", vec![Role::Admin]).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/auth/login")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(
                        r#"{"username": "admin", "password": "correct-horse"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_login_rejects_malformed_body() {
        let app = test_app("admin", "correct-horse", vec![Role::Admin]).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("not json at all"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_logout_clears_cookie() {
        let app = test_app("admin", "correct-horse", vec![Role::Admin]).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/auth/logout")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .unwrap()
            .to_string();
        assert_eq!(set_cookie, "jwt_token=; Path=/; Max-Age=0; HttpOnly");

        let logout: LogoutResponse = body_json(response).await;
        assert_eq!(logout.message, "Logged out successfully");
    }
}
