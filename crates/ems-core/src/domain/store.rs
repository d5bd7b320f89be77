//! 저장소 추상화.
//!
//! 직원 레코드와 사용자 계정 조회를 위한 백엔드 중립적인
//! 인터페이스를 제공합니다. 운영 환경은 PostgreSQL 구현을,
//! 테스트와 개발 모드는 인메모리 구현을 사용합니다.

use async_trait::async_trait;
use thiserror::Error;

use super::employee::{EmployeeInput, EmployeeRecord, Page, PageRequest};
use super::user::UserAccount;
use crate::error::EmsError;

// =============================================================================
// 에러 타입
// =============================================================================

/// 저장소 에러.
#[derive(Debug, Error)]
pub enum StoreError {
    /// 백엔드 에러 (연결 실패, 쿼리 실패 등)
    #[error("백엔드 에러: {0}")]
    Backend(String),

    /// 데이터 무결성 위반 (중복 키 등)
    #[error("무결성 위반: {0}")]
    Integrity(String),
}

impl From<StoreError> for EmsError {
    fn from(err: StoreError) -> Self {
        EmsError::Store(err.to_string())
    }
}

// =============================================================================
// EmployeeStore Trait
// =============================================================================

/// 직원 레코드 저장소 trait.
///
/// 모든 변경 연산은 원자적으로 수행됩니다. 동시에 삭제된 레코드에 대한
/// 수정/삭제는 부재(`None`/`false`)로 관측되며, 절반만 적용된 상태는
/// 노출되지 않습니다.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// 페이지 단위 직원 목록 조회.
    ///
    /// 정렬 지정이 없으면 id 오름차순입니다.
    async fn list(&self, request: &PageRequest) -> Result<Page<EmployeeRecord>, StoreError>;

    /// 이름/성/이메일에 대한 대소문자 무시 부분 일치 검색.
    async fn search(
        &self,
        term: &str,
        request: &PageRequest,
    ) -> Result<Page<EmployeeRecord>, StoreError>;

    /// id로 단건 조회.
    ///
    /// # Returns
    ///
    /// 존재하지 않으면 `None`.
    async fn find_by_id(&self, id: i32) -> Result<Option<EmployeeRecord>, StoreError>;

    /// 새 레코드 삽입. 식별자는 저장소가 부여합니다.
    async fn insert(&self, input: &EmployeeInput) -> Result<EmployeeRecord, StoreError>;

    /// 기존 레코드를 원자적으로 덮어씁니다. id는 유지됩니다.
    ///
    /// # Returns
    ///
    /// 레코드가 존재하지 않으면(동시 삭제 포함) `None`.
    async fn update(
        &self,
        id: i32,
        input: &EmployeeInput,
    ) -> Result<Option<EmployeeRecord>, StoreError>;

    /// 레코드 삭제 (hard delete).
    ///
    /// # Returns
    ///
    /// 존재하지 않는 id면 `false`.
    async fn delete(&self, id: i32) -> Result<bool, StoreError>;
}

// =============================================================================
// UserStore Trait
// =============================================================================

/// 사용자 계정 저장소 trait.
///
/// 이 시스템은 계정을 읽기만 합니다. 계정 프로비저닝은 외부에서 수행됩니다.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 로그인 아이디로 계정 조회.
    ///
    /// # Returns
    ///
    /// 존재하지 않으면 `None`. 비활성 계정도 반환되며
    /// 활성 여부 판단은 호출 측(자격증명 검증기)의 몫입니다.
    async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>, StoreError>;
}
