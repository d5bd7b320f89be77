//! 직원 관리 유스케이스 서비스.
//!
//! 저장소 구현(Postgres/인메모리)과 무관하게 조회/검색/생성/수정/삭제의
//! 비즈니스 규칙을 한곳에서 처리합니다. 핸들러는 이 서비스만 호출합니다.

use std::sync::Arc;

use crate::domain::{EmployeeInput, EmployeeRecord, EmployeeStore, Page, PageRequest};
use crate::error::{EmsError, EmsResult};

/// 직원 관리 서비스.
///
/// clone해도 같은 저장소를 공유합니다.
#[derive(Clone)]
pub struct EmployeeService {
    store: Arc<dyn EmployeeStore>,
}

impl EmployeeService {
    /// 새 서비스 인스턴스 생성.
    ///
    /// # Arguments
    ///
    /// * `store` - 직원 레코드 저장소
    pub fn new(store: Arc<dyn EmployeeStore>) -> Self {
        Self { store }
    }

    /// 직원 목록을 페이지 단위로 조회합니다.
    pub async fn list(&self, request: &PageRequest) -> EmsResult<Page<EmployeeRecord>> {
        let page = self.store.list(request).await?;
        tracing::debug!(total = page.total, page = request.page, "직원 목록 조회");
        Ok(page)
    }

    /// 이름/이메일 부분 일치 검색.
    ///
    /// 검색어가 비어 있거나 공백뿐이면 전체 목록 조회와 동일하게 동작합니다.
    pub async fn search(&self, term: &str, request: &PageRequest) -> EmsResult<Page<EmployeeRecord>> {
        let term = term.trim();
        if term.is_empty() {
            return self.list(request).await;
        }
        let page = self.store.search(term, request).await?;
        tracing::debug!(term = %term, total = page.total, "직원 검색");
        Ok(page)
    }

    /// id로 직원 단건 조회.
    ///
    /// 없는 id는 `EmsError::NotFound`로 반환됩니다.
    pub async fn get(&self, id: i32) -> EmsResult<EmployeeRecord> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| EmsError::NotFound(format!("Employee not found with id {}", id)))
    }

    /// 새 직원 레코드 생성.
    ///
    /// 입력 검증을 통과한 뒤 저장소가 id를 발급합니다.
    pub async fn create(&self, input: &EmployeeInput) -> EmsResult<EmployeeRecord> {
        input.validated()?;
        let record = self.store.insert(input).await?;
        tracing::info!(id = record.id, "직원 생성");
        Ok(record)
    }

    /// 기존 직원 레코드 전체 수정.
    ///
    /// 검증과 존재 확인을 모두 통과해야 하며, id는 변경되지 않습니다.
    pub async fn update(&self, id: i32, input: &EmployeeInput) -> EmsResult<EmployeeRecord> {
        input.validated()?;
        let updated = self
            .store
            .update(id, input)
            .await?
            .ok_or_else(|| EmsError::NotFound(format!("Employee not found with id {}", id)))?;
        tracing::info!(id = updated.id, "직원 수정");
        Ok(updated)
    }

    /// 직원 레코드 삭제.
    ///
    /// 없는 id 삭제 시도는 `EmsError::NotFound`로 반환됩니다.
    pub async fn delete(&self, id: i32) -> EmsResult<()> {
        let removed = self.store.delete(id).await?;
        if !removed {
            return Err(EmsError::NotFound(format!("Employee not found with id {}", id)));
        }
        tracing::info!(id = id, "직원 삭제");
        Ok(())
    }
}
