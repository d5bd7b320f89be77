//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.
//!
//! # 자동 생성 구조
//!
//! 각 라우트 모듈은 자체 스키마를 정의하고, 중앙 `ApiDoc`에서 집계합니다.
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ApiError;
use crate::routes::{
    ComponentHealth, ComponentStatus, HealthResponse, LoginRequest, LoginResponse, LogoutResponse,
};
use ems_core::{EmployeeInput, EmployeeRecord, Page};

// ==================== 보안 스킴 ====================

/// Bearer 토큰 보안 스킴을 스펙에 추가합니다.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("로그인 엔드포인트에서 발급된 JWT를 사용하세요."))
                        .build(),
                ),
            );
        }
    }
}

// ==================== OpenAPI 문서 정의 ====================

/// Employee Management API 문서.
///
/// 모든 엔드포인트와 스키마를 포함하는 OpenAPI 3.0 스펙입니다.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Employee Management API",
        version = "0.1.0",
        description = r#"
# 직원 관리 REST API

JWT 인증과 역할 기반 접근 제어가 적용된 직원 레코드 관리 API입니다.

## 주요 기능

- **인증**: 로그인으로 JWT 발급, 쿠키/Bearer 전송 지원
- **직원 관리**: 생성, 조회, 수정, 삭제
- **검색/페이지네이션**: 부분 일치 검색과 정렬/페이지 조회

## 인증

`POST /v1/auth/login`으로 토큰을 발급받은 뒤
`Authorization: Bearer <token>` 헤더를 포함하세요.

## 역할

- `employee` - 직원 목록/상세 조회
- `manager` - 조회 + 생성/수정
- `admin` - 모든 작업 (삭제 포함)
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
        contact(
            name = "EMS Backend Team",
            url = "https://github.com/user/ems-backend"
        )
    ),
    servers(
        (url = "http://localhost:3000", description = "로컬 개발 서버"),
    ),
    tags(
        (name = "health", description = "헬스 체크 - 서버 상태 확인"),
        (name = "auth", description = "인증 - 로그인/로그아웃"),
        (name = "employees", description = "직원 관리 - 직원 레코드 CRUD 및 검색")
    ),
    modifiers(&SecurityAddon),
    security(
        ("bearer_auth" = [])
    ),
    // ==================== 스키마 등록 ====================
    components(
        schemas(
            // ===== Health =====
            HealthResponse,
            ComponentHealth,
            ComponentStatus,

            // ===== Common =====
            ApiError,

            // ===== Auth =====
            LoginRequest,
            LoginResponse,
            LogoutResponse,

            // ===== Employees =====
            EmployeeRecord,
            EmployeeInput,
            Page<EmployeeRecord>,
        )
    ),
    // ==================== 경로 등록 ====================
    paths(
        // ===== Health =====
        crate::routes::health::health_check,
        crate::routes::health::health_ready,

        // ===== Auth =====
        crate::routes::auth::login,
        crate::routes::auth::logout,

        // ===== Employees =====
        crate::routes::employees::list_employees,
        crate::routes::employees::search_employees,
        crate::routes::employees::get_employee,
        crate::routes::employees::create_employee,
        crate::routes::employees::update_employee,
        crate::routes::employees::delete_employee,
    )
)]
pub struct ApiDoc;

// ==================== Swagger UI 라우터 ====================

/// Swagger UI 라우터 생성.
///
/// 다음 경로에 문서 UI를 마운트합니다:
/// - `/swagger-ui` - Swagger UI 대화형 문서
/// - `/api-docs/openapi.json` - OpenAPI JSON 스펙
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

// ==================== 테스트 ====================
