//! User Repository
//!
//! 사용자 계정과 권한 테이블 조회를 담당합니다. 쓰기 연산은 없으며
//! 계정 관리는 마이그레이션/운영 도구의 몫입니다.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use ems_core::{Role, StoreError, UserAccount, UserStore};

/// users 테이블 행.
#[derive(Debug, Clone, FromRow)]
struct UserRow {
    username: String,
    password_hash: String,
    enabled: bool,
}

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

/// Postgres 사용자 계정 저장소.
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// 커넥션 풀로 저장소 생성.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT username, password_hash, enabled FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let authorities = sqlx::query_scalar::<_, String>(
            "SELECT authority FROM user_authority WHERE username = $1 ORDER BY authority",
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        // "ROLE_ADMIN" 같은 레거시 접두사 표기도 Role::parse가 수용한다
        let roles: Vec<Role> = authorities
            .iter()
            .filter_map(|authority| Role::parse(authority))
            .collect();

        Ok(Some(UserAccount {
            username: row.username,
            password_hash: row.password_hash,
            enabled: row.enabled,
            roles,
        }))
    }
}
