//! Employee Repository
//!
//! 직원 테이블 데이터베이스 연산을 담당합니다. 정렬 컬럼은
//! `SortField` 허용 목록에서만 나오므로 ORDER BY 조합이 안전합니다.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use ems_core::{
    EmployeeInput, EmployeeRecord, EmployeeStore, Page, PageRequest, StoreError,
};

// ================================================================================================
// Types
// ================================================================================================

/// 직원 테이블 행.
#[derive(Debug, Clone, FromRow)]
struct EmployeeRow {
    id: i32,
    first_name: String,
    last_name: String,
    email: String,
}

impl From<EmployeeRow> for EmployeeRecord {
    fn from(row: EmployeeRow) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
        }
    }
}

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

/// 정렬 지시를 ORDER BY 절로 변환합니다.
///
/// 정렬이 없으면 id 오름차순으로 고정해 페이지 순회를 결정적으로
/// 만듭니다.
fn order_clause(request: &PageRequest) -> String {
    match request.sort {
        Some(sort) => format!(
            "ORDER BY {} {}",
            sort.field.column(),
            sort.direction.keyword()
        ),
        None => "ORDER BY id ASC".to_string(),
    }
}

/// 검색어를 ILIKE 패턴으로 변환합니다 (메타문자 이스케이프).
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

// ================================================================================================
// Repository
// ================================================================================================

/// Postgres 직원 저장소.
#[derive(Debug, Clone)]
pub struct PgEmployeeStore {
    pool: PgPool,
}

impl PgEmployeeStore {
    /// 커넥션 풀로 저장소 생성.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeStore for PgEmployeeStore {
    async fn list(&self, request: &PageRequest) -> Result<Page<EmployeeRecord>, StoreError> {
        let sql = format!(
            r#"
            SELECT id, first_name, last_name, email
            FROM employee
            {}
            LIMIT $1 OFFSET $2
            "#,
            order_clause(request)
        );

        let rows = sqlx::query_as::<_, EmployeeRow>(&sql)
            .bind(request.size as i64)
            .bind(request.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employee")
            .fetch_one(&self.pool)
            .await
            .map_err(backend)?;

        let items = rows.into_iter().map(EmployeeRecord::from).collect();
        Ok(Page::new(items, total as u64, request))
    }

    async fn search(
        &self,
        term: &str,
        request: &PageRequest,
    ) -> Result<Page<EmployeeRecord>, StoreError> {
        let pattern = like_pattern(term);

        let sql = format!(
            r#"
            SELECT id, first_name, last_name, email
            FROM employee
            WHERE first_name ILIKE $1 OR last_name ILIKE $1 OR email ILIKE $1
            {}
            LIMIT $2 OFFSET $3
            "#,
            order_clause(request)
        );

        let rows = sqlx::query_as::<_, EmployeeRow>(&sql)
            .bind(&pattern)
            .bind(request.size as i64)
            .bind(request.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM employee
            WHERE first_name ILIKE $1 OR last_name ILIKE $1 OR email ILIKE $1
            "#,
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await
        .map_err(backend)?;

        let items = rows.into_iter().map(EmployeeRecord::from).collect();
        Ok(Page::new(items, total as u64, request))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<EmployeeRecord>, StoreError> {
        let row = sqlx::query_as::<_, EmployeeRow>(
            "SELECT id, first_name, last_name, email FROM employee WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        Ok(row.map(EmployeeRecord::from))
    }

    async fn insert(&self, input: &EmployeeInput) -> Result<EmployeeRecord, StoreError> {
        let row = sqlx::query_as::<_, EmployeeRow>(
            r#"
            INSERT INTO employee (first_name, last_name, email)
            VALUES ($1, $2, $3)
            RETURNING id, first_name, last_name, email
            "#,
        )
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.email)
        .fetch_one(&self.pool)
        .await
        .map_err(backend)?;

        Ok(EmployeeRecord::from(row))
    }

    async fn update(
        &self,
        id: i32,
        input: &EmployeeInput,
    ) -> Result<Option<EmployeeRecord>, StoreError> {
        // 단일 문장이므로 동시 삭제와 경합해도 원자적이다
        let row = sqlx::query_as::<_, EmployeeRow>(
            r#"
            UPDATE employee
            SET first_name = $2, last_name = $3, email = $4
            WHERE id = $1
            RETURNING id, first_name, last_name, email
            "#,
        )
        .bind(id)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.email)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        Ok(row.map(EmployeeRecord::from))
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM employee WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(backend)?;

        Ok(result.rows_affected() > 0)
    }
}
