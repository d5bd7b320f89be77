//! 통합 API 에러 응답 타입.
//!
//! 도메인 에러(`EmsError`)를 HTTP 경계에서 일관된 JSON 페이로드로
//! 변환합니다. 내부 장애의 상세 내용은 서버 로그에만 남기고
//! 클라이언트에는 일반화된 메시지를 반환합니다.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use ems_core::EmsError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 통합 API 에러 응답.
///
/// 모든 실패 응답은 이 형태 하나로 직렬화됩니다.
///
/// # 예시
///
/// ```json
/// {
///   "timestamp": "2025-06-01T09:30:00Z",
///   "status": 404,
///   "error": "Not Found",
///   "message": "Employee not found with id 42",
///   "path": "/v1/employees/42"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// 에러 발생 시각 (RFC3339)
    pub timestamp: DateTime<Utc>,
    /// HTTP 상태 코드
    pub status: u16,
    /// 상태 코드의 표준 사유 구문 (예: "Not Found")
    pub error: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 요청 경로
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// 필드별 유효성 검증 실패 목록 (`"field: message"` 형식)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<Vec<String>>,
}

impl ApiError {
    /// 기본 에러 생성 (타임스탬프 포함).
    ///
    /// # Arguments
    ///
    /// * `status` - HTTP 상태 코드
    /// * `message` - 에러 메시지
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Unknown").to_string(),
            message: message.into(),
            path: None,
            validation_errors: None,
        }
    }

    /// 요청 경로를 추가합니다.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// 유효성 검증 실패 목록을 추가합니다.
    #[must_use]
    pub fn with_validation_errors(mut self, entries: Vec<String>) -> Self {
        self.validation_errors = Some(entries);
        self
    }

    /// HTTP 상태 코드 반환.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.status, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

// ==================== EmsError 변환 ====================

impl From<EmsError> for ApiError {
    fn from(err: EmsError) -> Self {
        match err {
            EmsError::NotFound(message) => Self::new(StatusCode::NOT_FOUND, message),
            EmsError::Validation(entries) => Self::new(StatusCode::BAD_REQUEST, "Validation failed")
                .with_validation_errors(entries),
            EmsError::InvalidSort(message) => Self::new(StatusCode::BAD_REQUEST, message),
            EmsError::InvalidCredentials => {
                // 미존재 사용자/비활성 계정/비밀번호 불일치를 구분하지 않는다
                Self::new(StatusCode::UNAUTHORIZED, "Invalid username or password")
            }
            EmsError::InvalidToken(reason) => {
                tracing::debug!(reason = %reason, "토큰 검증 실패");
                Self::new(StatusCode::UNAUTHORIZED, "Invalid or expired token")
            }
            EmsError::Unauthenticated(message) => Self::new(StatusCode::UNAUTHORIZED, message),
            EmsError::Forbidden(message) => Self::new(StatusCode::FORBIDDEN, message),
            EmsError::Store(detail) => {
                tracing::error!(error = %detail, "저장소 오류");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Unexpected server error")
            }
            EmsError::Config(detail) | EmsError::Internal(detail) => {
                tracing::error!(error = %detail, "내부 오류");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Unexpected server error")
            }
        }
    }
}

// ==================== Result Type Alias ====================

/// API 핸들러 Result 타입 별칭.
///
/// `ApiError`가 `IntoResponse`를 구현하므로 핸들러에서 `?`로 바로
/// 전파할 수 있습니다.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404_with_message() {
        let api: ApiError = EmsError::NotFound("Employee not found with id 42".into()).into();
        assert_eq!(api.status, 404);
        assert_eq!(api.error, "Not Found");
        assert_eq!(api.message, "Employee not found with id 42");
        assert!(api.validation_errors.is_none());
    }

    #[test]
    fn test_validation_maps_to_400_with_entries() {
        let api: ApiError = EmsError::Validation(vec![
            "first_name: First name must not be blank".to_string(),
            "email: Email must be a valid email address".to_string(),
        ])
        .into();
        assert_eq!(api.status, 400);
        assert_eq!(api.error, "Bad Request");
        assert_eq!(api.message, "Validation failed");
        assert_eq!(
            api.validation_errors.as_deref(),
            Some(
                &[
                    "first_name: First name must not be blank".to_string(),
                    "email: Email must be a valid email address".to_string(),
                ][..]
            )
        );
    }

    #[test]
    fn test_invalid_credentials_is_uniform_401() {
        let api: ApiError = EmsError::InvalidCredentials.into();
        assert_eq!(api.status, 401);
        // 어떤 실패 원인이든 동일한 메시지
        assert_eq!(api.message, "Invalid username or password");
    }

    #[test]
    fn test_auth_errors_map_to_401_and_403() {
        let api: ApiError = EmsError::Unauthenticated("Authentication required".into()).into();
        assert_eq!(api.status, 401);

        let api: ApiError = EmsError::Forbidden("Access denied".into()).into();
        assert_eq!(api.status, 403);
        assert_eq!(api.error, "Forbidden");
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let api: ApiError = EmsError::Store("connection refused (db:5432)".into()).into();
        assert_eq!(api.status, 500);
        assert_eq!(api.error, "Internal Server Error");
        assert_eq!(api.message, "Unexpected server error");
        // 내부 상세가 응답에 새지 않는다
        let json = serde_json::to_string(&api).unwrap();
        assert!(!json.contains("connection refused"));
    }

    #[test]
    fn test_json_omits_absent_optional_fields() {
        let api = ApiError::new(StatusCode::NOT_FOUND, "Employee not found with id 7");
        let json = serde_json::to_string(&api).unwrap();

        assert!(json.contains(r#""status":404"#));
        assert!(json.contains(r#""error":"Not Found""#));
        assert!(json.contains("timestamp"));
        assert!(!json.contains("path"));
        assert!(!json.contains("validation_errors"));
    }

    #[test]
    fn test_with_path_serializes_request_path() {
        let api = ApiError::new(StatusCode::FORBIDDEN, "Access denied")
            .with_path("/v1/employees/3");
        let json = serde_json::to_string(&api).unwrap();
        assert!(json.contains(r#""path":"/v1/employees/3""#));
    }
}
