//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/v1/auth/login` - 로그인 (JWT 발급)
//! - `/v1/auth/logout` - 로그아웃 (쿠키 제거)
//! - `/v1/employees` - 직원 레코드 CRUD 및 검색

pub mod auth;
pub mod employees;
pub mod health;

pub use auth::{auth_router, LoginRequest, LoginResponse, LogoutResponse};
pub use employees::{employees_router, PageQuery, SearchQuery};
pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};

use axum::Router;

use crate::state::AppState;

/// 전체 API 라우터 생성.
///
/// 모든 서브 라우터를 조합하여 하나의 라우터로 반환합니다.
/// 인증/인가 미들웨어는 여기서 적용하지 않으며, 바이너리가
/// 전체 앱을 조립할 때 바깥 레이어로 적용합니다.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        // 헬스 체크 엔드포인트
        .nest("/health", health_router())
        // API v1 엔드포인트
        .nest("/v1/auth", auth_router())
        .nest("/v1/employees", employees_router())
}
