//! 직원 관리 시스템의 에러 타입.
//!
//! 이 모듈은 인증/인가 파이프라인과 직원 서비스 전반에서
//! 사용되는 에러 분류를 정의합니다. 모든 실패는 값으로 전파되며
//! HTTP 경계에서 한 번만 응답 형식으로 변환됩니다.

use thiserror::Error;

/// 핵심 도메인 에러.
#[derive(Debug, Error)]
pub enum EmsError {
    /// 자격증명 불일치 (존재하지 않는 사용자 / 비활성 계정 / 잘못된 비밀번호)
    ///
    /// 계정 열거 방지를 위해 세 경우를 구분하지 않습니다.
    #[error("자격증명이 유효하지 않습니다")]
    InvalidCredentials,

    /// 토큰 검증 실패 (서명 불일치, 형식 오류, 만료)
    #[error("토큰 에러: {0}")]
    InvalidToken(String),

    /// 인증되지 않은 요청이 보호된 리소스에 접근
    #[error("인증 필요: {0}")]
    Unauthenticated(String),

    /// 인증은 되었으나 역할이 부족함
    #[error("접근 거부: {0}")]
    Forbidden(String),

    /// 요청한 리소스를 찾을 수 없음
    #[error("{0}")]
    NotFound(String),

    /// 입력 유효성 검증 실패 (모든 위반 사항 집계)
    #[error("유효성 검증 실패: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// 허용되지 않은 정렬 필드 또는 방향
    #[error("잘못된 정렬 파라미터: {0}")]
    InvalidSort(String),

    /// 저장소 백엔드 에러
    #[error("저장소 에러: {0}")]
    Store(String),

    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 도메인 작업을 위한 Result 타입.
pub type EmsResult<T> = Result<T, EmsError>;

impl EmsError {
    /// 클라이언트 측 원인(4xx 계열)인지 확인합니다.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            EmsError::Store(_) | EmsError::Config(_) | EmsError::Internal(_)
        )
    }

    /// 인증/인가 관련 에러인지 확인합니다.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            EmsError::InvalidCredentials
                | EmsError::InvalidToken(_)
                | EmsError::Unauthenticated(_)
                | EmsError::Forbidden(_)
        )
    }
}
