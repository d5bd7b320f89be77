//! 직원 관리 API 라우트
//!
//! 직원 레코드 CRUD와 페이지네이션 조회 API를 제공합니다.
//!
//! # 엔드포인트
//!
//! - `GET /v1/employees` - 직원 목록 조회 (페이지네이션/정렬)
//! - `GET /v1/employees/search` - 이름/성/이메일 부분 일치 검색
//! - `GET /v1/employees/{id}` - 직원 단건 조회
//! - `POST /v1/employees` - 직원 생성
//! - `PUT /v1/employees/{id}` - 직원 수정
//! - `DELETE /v1/employees/{id}` - 직원 삭제
//!
//! 접근 제어는 전역 인증 미들웨어가 담당하므로 여기 핸들러는
//! 역할 검사를 하지 않습니다.

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::debug;

use ems_core::{
    EmployeeInput, EmployeeRecord, EmsError, Page, PageRequest, SortSpec, DEFAULT_PAGE_SIZE,
};

use crate::error::ApiError;
use crate::state::AppState;

// ================================================================================================
// Query Types
// ================================================================================================

/// 목록 조회 쿼리 파라미터
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// 페이지 번호 (0부터 시작)
    #[serde(default)]
    pub page: u32,
    /// 페이지 크기 (1~100으로 보정)
    #[serde(default = "default_page_size")]
    pub size: u32,
    /// 정렬 지정 (`"field,asc|desc"`, camelCase/snake_case 허용)
    #[serde(default)]
    pub sort: Option<String>,
}

/// 검색 쿼리 파라미터
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// 검색어 (비어 있으면 전체 목록)
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub size: u32,
    #[serde(default)]
    pub sort: Option<String>,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// 쿼리 파라미터를 도메인 페이지 요청으로 변환합니다.
///
/// 빈 sort 파라미터는 정렬 없음으로 취급합니다.
fn to_page_request(page: u32, size: u32, sort: Option<&str>) -> Result<PageRequest, EmsError> {
    let mut request = PageRequest::new(page, size);
    if let Some(raw) = sort {
        if !raw.trim().is_empty() {
            request = request.with_sort(SortSpec::parse(raw)?);
        }
    }
    Ok(request)
}

// ================================================================================================
// Handlers
// ================================================================================================

/// GET /v1/employees - 직원 목록 조회
#[utoipa::path(
    get,
    path = "/v1/employees",
    params(
        ("page" = Option<u32>, Query, description = "페이지 번호 (0부터 시작)"),
        ("size" = Option<u32>, Query, description = "페이지 크기 (기본 20, 최대 100)"),
        ("sort" = Option<String>, Query, description = "정렬 지정 (예: lastName,desc)")
    ),
    responses(
        (status = 200, description = "직원 목록", body = Page<EmployeeRecord>),
        (status = 400, description = "잘못된 정렬 파라미터", body = ApiError)
    ),
    tag = "employees"
)]
pub async fn list_employees(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<EmployeeRecord>>, ApiError> {
    debug!("직원 목록 조회: page={} size={}", query.page, query.size);

    let request = to_page_request(query.page, query.size, query.sort.as_deref())
        .map_err(|err| ApiError::from(err).with_path(uri.path()))?;

    let page = state
        .employee_service
        .list(&request)
        .await
        .map_err(|err| ApiError::from(err).with_path(uri.path()))?;

    Ok(Json(page))
}

/// GET /v1/employees/search - 직원 검색
#[utoipa::path(
    get,
    path = "/v1/employees/search",
    params(
        ("q" = Option<String>, Query, description = "검색어 (이름/성/이메일 부분 일치, 대소문자 무시)"),
        ("page" = Option<u32>, Query, description = "페이지 번호 (0부터 시작)"),
        ("size" = Option<u32>, Query, description = "페이지 크기 (기본 20, 최대 100)"),
        ("sort" = Option<String>, Query, description = "정렬 지정 (예: lastName,desc)")
    ),
    responses(
        (status = 200, description = "검색 결과", body = Page<EmployeeRecord>),
        (status = 400, description = "잘못된 정렬 파라미터", body = ApiError)
    ),
    tag = "employees"
)]
pub async fn search_employees(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Page<EmployeeRecord>>, ApiError> {
    debug!("직원 검색: q={:?}", query.q);

    let request = to_page_request(query.page, query.size, query.sort.as_deref())
        .map_err(|err| ApiError::from(err).with_path(uri.path()))?;

    let page = state
        .employee_service
        .search(&query.q, &request)
        .await
        .map_err(|err| ApiError::from(err).with_path(uri.path()))?;

    Ok(Json(page))
}

/// GET /v1/employees/{id} - 직원 단건 조회
#[utoipa::path(
    get,
    path = "/v1/employees/{id}",
    params(
        ("id" = i32, Path, description = "직원 ID")
    ),
    responses(
        (status = 200, description = "직원 정보", body = EmployeeRecord),
        (status = 404, description = "직원 없음", body = ApiError)
    ),
    tag = "employees"
)]
pub async fn get_employee(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i32>,
) -> Result<Json<EmployeeRecord>, ApiError> {
    debug!("직원 조회: {}", id);

    let employee = state
        .employee_service
        .get(id)
        .await
        .map_err(|err| ApiError::from(err).with_path(uri.path()))?;

    Ok(Json(employee))
}

/// POST /v1/employees - 직원 생성
#[utoipa::path(
    post,
    path = "/v1/employees",
    request_body = EmployeeInput,
    responses(
        (status = 201, description = "생성된 직원", body = EmployeeRecord),
        (status = 400, description = "유효성 검증 실패", body = ApiError)
    ),
    tag = "employees"
)]
pub async fn create_employee(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Json(input): Json<EmployeeInput>,
) -> Result<(StatusCode, Json<EmployeeRecord>), ApiError> {
    let created = state
        .employee_service
        .create(&input)
        .await
        .map_err(|err| ApiError::from(err).with_path(uri.path()))?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /v1/employees/{id} - 직원 수정
#[utoipa::path(
    put,
    path = "/v1/employees/{id}",
    params(
        ("id" = i32, Path, description = "직원 ID")
    ),
    request_body = EmployeeInput,
    responses(
        (status = 200, description = "수정된 직원", body = EmployeeRecord),
        (status = 400, description = "유효성 검증 실패", body = ApiError),
        (status = 404, description = "직원 없음", body = ApiError)
    ),
    tag = "employees"
)]
pub async fn update_employee(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i32>,
    Json(input): Json<EmployeeInput>,
) -> Result<Json<EmployeeRecord>, ApiError> {
    let updated = state
        .employee_service
        .update(id, &input)
        .await
        .map_err(|err| ApiError::from(err).with_path(uri.path()))?;

    Ok(Json(updated))
}

/// DELETE /v1/employees/{id} - 직원 삭제
#[utoipa::path(
    delete,
    path = "/v1/employees/{id}",
    params(
        ("id" = i32, Path, description = "직원 ID")
    ),
    responses(
        (status = 204, description = "삭제 완료"),
        (status = 404, description = "직원 없음", body = ApiError)
    ),
    tag = "employees"
)]
pub async fn delete_employee(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state
        .employee_service
        .delete(id)
        .await
        .map_err(|err| ApiError::from(err).with_path(uri.path()))?;

    Ok(StatusCode::NO_CONTENT)
}

// ================================================================================================
// Router
// ================================================================================================

/// 직원 라우터 생성.
pub fn employees_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_employees).post(create_employee))
        .route("/search", get(search_employees))
        .route(
            "/{id}",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
}
