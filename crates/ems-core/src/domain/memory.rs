//! 인메모리 저장소 구현.
//!
//! 데이터베이스 없이 동작하는 개발 모드와 테스트에서 사용합니다.
//! 내용은 프로세스 수명 동안만 유지됩니다.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::employee::{EmployeeInput, EmployeeRecord, Page, PageRequest, SortDirection, SortField};
use super::store::{EmployeeStore, StoreError, UserStore};
use super::user::UserAccount;

// =============================================================================
// 직원 저장소
// =============================================================================

/// 직원 테이블 상태.
///
/// id 시퀀스와 레코드 맵을 하나의 락 아래 묶어
/// 삽입/수정/삭제가 단일 임계 구역에서 원자적으로 수행되게 합니다.
#[derive(Debug, Default)]
struct EmployeeTable {
    rows: BTreeMap<i32, EmployeeRecord>,
    next_id: i32,
}

/// 인메모리 직원 저장소.
///
/// clone해도 같은 테이블을 공유합니다.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEmployeeStore {
    table: Arc<RwLock<EmployeeTable>>,
}

impl InMemoryEmployeeStore {
    /// 빈 저장소를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 현재 레코드 수를 반환합니다.
    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    /// 저장소가 비어 있는지 확인합니다.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// 정렬/페이지 적용 공통 처리.
///
/// BTreeMap 순회는 id 오름차순이므로, 동일 키 값에 대해서는
/// 안정 정렬에 의해 id 순서가 유지됩니다.
fn sort_and_page(mut records: Vec<EmployeeRecord>, request: &PageRequest) -> Page<EmployeeRecord> {
    if let Some(sort) = request.sort {
        records.sort_by(|a, b| {
            let ordering = match sort.field {
                SortField::Id => a.id.cmp(&b.id),
                SortField::FirstName => a.first_name.cmp(&b.first_name),
                SortField::LastName => a.last_name.cmp(&b.last_name),
                SortField::Email => a.email.cmp(&b.email),
            };
            match sort.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }

    let total = records.len() as u64;
    let items: Vec<EmployeeRecord> = records
        .into_iter()
        .skip(request.offset() as usize)
        .take(request.size as usize)
        .collect();

    Page::new(items, total, request)
}

#[async_trait]
impl EmployeeStore for InMemoryEmployeeStore {
    async fn list(&self, request: &PageRequest) -> Result<Page<EmployeeRecord>, StoreError> {
        let table = self.table.read().await;
        let records: Vec<EmployeeRecord> = table.rows.values().cloned().collect();
        Ok(sort_and_page(records, request))
    }

    async fn search(
        &self,
        term: &str,
        request: &PageRequest,
    ) -> Result<Page<EmployeeRecord>, StoreError> {
        let needle = term.to_lowercase();
        let table = self.table.read().await;
        let records: Vec<EmployeeRecord> = table
            .rows
            .values()
            .filter(|record| {
                record.first_name.to_lowercase().contains(&needle)
                    || record.last_name.to_lowercase().contains(&needle)
                    || record.email.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        Ok(sort_and_page(records, request))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<EmployeeRecord>, StoreError> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn insert(&self, input: &EmployeeInput) -> Result<EmployeeRecord, StoreError> {
        let mut table = self.table.write().await;
        table.next_id += 1;
        let record = EmployeeRecord {
            id: table.next_id,
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            email: input.email.clone(),
        };
        table.rows.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        id: i32,
        input: &EmployeeInput,
    ) -> Result<Option<EmployeeRecord>, StoreError> {
        let mut table = self.table.write().await;
        match table.rows.get_mut(&id) {
            Some(record) => {
                record.first_name = input.first_name.clone();
                record.last_name = input.last_name.clone();
                record.email = input.email.clone();
                Ok(Some(record.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let mut table = self.table.write().await;
        Ok(table.rows.remove(&id).is_some())
    }
}

// =============================================================================
// 사용자 저장소
// =============================================================================

/// 인메모리 사용자 계정 저장소.
///
/// clone해도 같은 계정 맵을 공유합니다.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    accounts: Arc<RwLock<HashMap<String, UserAccount>>>,
}

impl InMemoryUserStore {
    /// 빈 저장소를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 계정을 등록하거나 덮어씁니다.
    ///
    /// 개발 모드 초기 계정과 테스트 픽스처 용도입니다.
    pub async fn seed(&self, account: UserAccount) {
        let mut accounts = self.accounts.write().await;
        accounts.insert(account.username.clone(), account);
    }

    /// 등록된 계정 수를 반환합니다.
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    /// 저장소가 비어 있는지 확인합니다.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>, StoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(username).cloned())
    }
}
