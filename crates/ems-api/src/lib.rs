//! 직원 관리 REST API 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API
//! - JWT 인증 및 역할 기반 접근 제어
//! - 헬스 체크 엔드포인트
//! - OpenAPI 문서 및 Swagger UI
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`auth`]: JWT 발급/검증, 비밀번호 해싱, 접근 정책
//! - [`repository`]: PostgreSQL 저장소 구현
//! - [`error`]: HTTP 오류 응답 (ApiError)
//! - [`openapi`]: OpenAPI 문서 및 Swagger UI

pub mod auth;
pub mod error;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod state;

pub use auth::{
    authenticate, create_token, decode_token, hash_password, verify_password, Access, AccessPolicy,
    AccessRule, AuthContext, Claims, CredentialVerifier, Identity, JwtError, PasswordError,
};
pub use error::{ApiError, ApiResult};
pub use repository::{PgEmployeeStore, PgUserStore};
pub use routes::*;
pub use state::AppState;

#[cfg(any(test, feature = "test-utils"))]
pub use state::{create_test_state, TEST_JWT_SECRET};
