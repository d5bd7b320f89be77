//! 직원 관리 API 서버.
//!
//! Axum 기반 REST API 서버를 시작합니다.
//! JWT 인증, 역할 기반 접근 제어, 직원 레코드 CRUD 엔드포인트를 제공합니다.

use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, middleware, Router};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use ems_api::auth::{authenticate, hash_password};
use ems_api::openapi::swagger_ui_router;
use ems_api::repository::{PgEmployeeStore, PgUserStore};
use ems_api::routes::create_api_router;
use ems_api::state::AppState;
use ems_core::{
    init_logging, AppConfig, InMemoryEmployeeStore, InMemoryUserStore, LogConfig, Role,
    UserAccount,
};

/// AppState 초기화.
///
/// `DATABASE_URL`이 설정되어 있으면 PostgreSQL 저장소를, 없으면
/// 개발용 인메모리 저장소를 사용합니다. 연결 문자열이 주어졌는데
/// 연결할 수 없으면 기동을 중단합니다.
async fn create_app_state(
    config: AppConfig,
    jwt_secret: String,
) -> Result<AppState, Box<dyn std::error::Error>> {
    if let Ok(database_url) = std::env::var("DATABASE_URL") {
        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .acquire_timeout(Duration::from_secs(config.database.connection_timeout_secs))
            .idle_timeout(Duration::from_secs(config.database.idle_timeout_secs))
            .connect(&database_url)
            .await
            .map_err(|e| {
                error!("Failed to connect to database: {}", e);
                e
            })?;

        // 연결 테스트
        sqlx::query("SELECT 1").fetch_one(&pool).await.map_err(|e| {
            error!("Failed to verify database connection: {}", e);
            e
        })?;
        info!("Connected to PostgreSQL successfully");

        let state = AppState::new(
            config,
            jwt_secret,
            Arc::new(PgEmployeeStore::new(pool.clone())),
            Arc::new(PgUserStore::new(pool.clone())),
        )
        .with_db_pool(pool);

        return Ok(state);
    }

    warn!("DATABASE_URL not set, using in-memory stores (development mode)");
    in_memory_state(config, jwt_secret).await
}

/// 개발용 인메모리 상태 구성.
///
/// admin/manager/employee 기본 계정을 시드합니다.
/// 비밀번호는 계정 이름과 동일하므로 개발 환경에서만 사용하세요.
async fn in_memory_state(
    config: AppConfig,
    jwt_secret: String,
) -> Result<AppState, Box<dyn std::error::Error>> {
    let users = InMemoryUserStore::new();

    let dev_accounts = [
        ("admin", vec![Role::Admin, Role::Manager, Role::Employee]),
        ("manager", vec![Role::Manager, Role::Employee]),
        ("employee", vec![Role::Employee]),
    ];

    for (username, roles) in dev_accounts {
        let hash = hash_password(username)?;
        users.seed(UserAccount::new(username, hash, roles)).await;
    }
    info!("Seeded development accounts: admin, manager, employee (password = username)");

    Ok(AppState::new(
        config,
        jwt_secret,
        Arc::new(InMemoryEmployeeStore::new()),
        Arc::new(users),
    ))
}

/// CORS 미들웨어 구성.
///
/// CORS_ORIGINS 환경변수가 설정되어 있으면 해당 origin만 허용합니다.
/// 설정되지 않으면 개발 모드로 간주하여 모든 origin을 허용합니다.
///
/// # 환경변수
///
/// - `CORS_ORIGINS`: 쉼표로 구분된 허용 origin 목록
///   예: `https://hr.example.com,https://admin.example.com`
fn cors_layer() -> CorsLayer {
    let allow_origin = match std::env::var("CORS_ORIGINS") {
        Ok(origins) if !origins.is_empty() => {
            // 프로덕션: 특정 origin만 허용
            let origins: Vec<_> = origins
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();

            if origins.is_empty() {
                warn!("CORS_ORIGINS is set but contains no valid origins, allowing any");
                AllowOrigin::any()
            } else {
                info!("CORS configured with {} allowed origins", origins.len());
                AllowOrigin::list(origins)
            }
        }
        _ => {
            // 개발: 모든 origin 허용
            warn!("CORS_ORIGINS not set, allowing any origin (development mode)");
            AllowOrigin::any()
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        // 허용되는 HTTP 메서드
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        // 허용되는 헤더
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
        ])
        // 자격 증명 포함 허용 (CORS_ORIGINS 설정 시에만)
        .allow_credentials(std::env::var("CORS_ORIGINS").is_ok())
        // preflight 요청 캐시 시간
        .max_age(Duration::from_secs(3600))
}

/// 전체 라우터 생성.
///
/// 인증 미들웨어가 라우팅보다 먼저 실행되므로 접근 정책이
/// 등록되지 않은 경로에도 적용됩니다 (익명 요청은 401).
fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(create_api_router().with_state(state.clone()))
        // OpenAPI 문서 및 Swagger UI
        .merge(swagger_ui_router())
        // 인증/인가 미들웨어 (토큰 해석 + 접근 정책 평가)
        .layer(middleware::from_fn_with_state(state, authenticate))
        // 기타 미들웨어
        .layer(TraceLayer::new_for_http())
        // 전역 타임아웃 (30초) - 408 상태 코드 반환
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(cors_layer())
}

/// OpenAPI 스펙 내보내기 처리.
///
/// `--export-openapi` 플래그 또는 `EXPORT_OPENAPI` 환경변수가 설정된 경우
/// OpenAPI JSON 스펙을 stdout으로 출력하고 종료합니다.
fn handle_export_openapi() -> Result<(), Box<dyn std::error::Error>> {
    use ems_api::openapi::ApiDoc;
    use utoipa::OpenApi as _;

    // 명령줄 인자에서 --export-openapi 플래그 확인
    let export_flag = std::env::args().any(|arg| arg == "--export-openapi");

    // 환경변수 EXPORT_OPENAPI 확인
    let export_env = std::env::var("EXPORT_OPENAPI")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    if export_flag || export_env {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&spec)?;
        println!("{}", json);
        std::process::exit(0);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    // OpenAPI 내보내기 처리 (서버 시작 전)
    handle_export_openapi()?;

    // 설정 로드 (config/default.toml + EMS__ 환경변수)
    let config = AppConfig::load_default()?;

    // tracing 초기화 (RUST_LOG가 설정 파일의 레벨보다 우선)
    init_logging(LogConfig::from_settings(&config.logging))?;

    info!("Starting Employee Management API server...");

    let addr = config.server.socket_addr().map_err(|e| {
        error!(
            host = %config.server.host,
            port = config.server.port,
            error = %e,
            "소켓 주소 설정이 유효하지 않습니다. EMS__SERVER__HOST, EMS__SERVER__PORT 설정을 확인하세요."
        );
        e
    })?;

    // JWT 시크릿 로드
    let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
        warn!("JWT_SECRET not set, using default (INSECURE for development only)");
        "dev-secret-key-change-in-production".to_string()
    });

    // AppState 생성 (저장소 선택 포함)
    let state = create_app_state(config, jwt_secret).await?;

    info!(version = %state.version, "Application state initialized");
    info!(
        has_db = state.has_database(),
        token_ttl_minutes = state.token_ttl_minutes(),
        "Service connections status"
    );

    // 라우터 생성
    let app = create_router(state);

    // 서버 시작
    info!(%addr, "API server listening");
    info!("Swagger UI available at http://{}/swagger-ui", addr);
    info!("OpenAPI spec at http://{}/api-docs/openapi.json", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Graceful shutdown 처리 (진행 중인 요청은 완료 후 종료)
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");

    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 반환하여 서버 종료를 시작합니다.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request},
    };
    use tower::ServiceExt;

    use ems_api::routes::LoginResponse;

    const JWT_SECRET: &str = "integration-test-secret-key-32-chars-min";

    /// admin/manager/employee 계정이 시드된 전체 앱을 만든다.
    async fn full_app() -> Router {
        let state = in_memory_state(AppConfig::default(), JWT_SECRET.to_string())
            .await
            .unwrap();
        create_router(state)
    }

    /// 로그인해서 액세스 토큰을 받아온다.
    async fn login_token(app: &Router, username: &str) -> String {
        let body = serde_json::json!({
            "username": username,
            // 개발 시드 계정은 비밀번호가 계정 이름과 동일하다
            "password": username,
        });

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let login: LoginResponse = serde_json::from_slice(&bytes).unwrap();
        login.access_token
    }

    fn bearer(token: &str) -> String {
        format!("Bearer {}", token)
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let app = full_app().await;

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_openapi_spec_is_public() {
        let app = full_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_anonymous_employee_access_is_rejected() {
        let app = full_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/employees")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_role_matrix_across_full_stack() {
        let app = full_app().await;

        let employee_token = login_token(&app, "employee").await;
        let manager_token = login_token(&app, "manager").await;
        let admin_token = login_token(&app, "admin").await;

        // employee: 조회 가능
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/v1/employees")
                    .header(header::AUTHORIZATION, bearer(&employee_token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // employee: 생성 불가
        let new_employee =
            r#"{"first_name": "Kim", "last_name": "Minsu", "email": "minsu.kim@example.com"}"#;
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/employees")
                    .header(header::AUTHORIZATION, bearer(&employee_token))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(new_employee))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // manager: 생성 가능
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/employees")
                    .header(header::AUTHORIZATION, bearer(&manager_token))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(new_employee))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        // manager: 삭제 불가
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/v1/employees/1")
                    .header(header::AUTHORIZATION, bearer(&manager_token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // admin: 삭제 가능
        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/v1/employees/1")
                    .header(header::AUTHORIZATION, bearer(&admin_token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_unknown_path_requires_authentication() {
        let app = full_app().await;

        // 익명: 등록되지 않은 경로도 401 (기본 거부 정책)
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/v1/does-not-exist")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // 인증됨: 라우터까지 도달해 404
        let token = login_token(&app, "employee").await;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/does-not-exist")
                    .header(header::AUTHORIZATION, bearer(&token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
