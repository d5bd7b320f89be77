//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 모든 API 핸들러에서 공유되는 상태를 관리합니다.
//! 내부 리소스는 Arc로 래핑되어 여러 요청 간에 안전하게 공유됩니다.
//! 서명 비밀 키와 정책 테이블은 기동 후 불변입니다.

use std::sync::Arc;

use ems_core::{AppConfig, EmployeeService, EmployeeStore, UserStore};

use crate::auth::{AccessPolicy, CredentialVerifier};

/// 애플리케이션 공유 상태.
///
/// Axum의 State extractor를 통해 핸들러에 주입됩니다.
#[derive(Clone)]
pub struct AppState {
    /// 애플리케이션 설정
    pub config: Arc<AppConfig>,

    /// 직원 유스케이스 서비스
    pub employee_service: EmployeeService,

    /// 로그인 자격증명 검증기
    pub verifier: CredentialVerifier,

    /// 접근 정책 테이블 (기동 시 구성, 이후 읽기 전용)
    pub policy: Arc<AccessPolicy>,

    /// 데이터베이스 연결 풀 (없으면 인메모리 모드)
    pub db_pool: Option<sqlx::PgPool>,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,

    /// JWT 서명 비밀 키 (응답/로그에 노출 금지)
    jwt_secret: String,
}

impl AppState {
    /// 새로운 AppState 생성.
    ///
    /// # 인자
    /// * `config` - 애플리케이션 설정
    /// * `jwt_secret` - JWT 서명 비밀 키
    /// * `employee_store` - 직원 레코드 저장소
    /// * `user_store` - 사용자 계정 저장소
    pub fn new(
        config: AppConfig,
        jwt_secret: impl Into<String>,
        employee_store: Arc<dyn EmployeeStore>,
        user_store: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            employee_service: EmployeeService::new(employee_store),
            verifier: CredentialVerifier::new(user_store),
            policy: Arc::new(AccessPolicy::default_table()),
            db_pool: None,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            jwt_secret: jwt_secret.into(),
        }
    }

    /// 데이터베이스 연결 설정.
    ///
    /// readiness 프로브가 이 풀로 연결 상태를 확인합니다.
    pub fn with_db_pool(mut self, pool: sqlx::PgPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// 커스텀 정책 테이블 설정.
    pub fn with_policy(mut self, policy: AccessPolicy) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    /// 데이터베이스 연결 설정 여부 확인.
    pub fn has_database(&self) -> bool {
        self.db_pool.is_some()
    }

    /// JWT 서명 비밀 키 반환.
    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    /// 인증 쿠키 이름 반환.
    pub fn cookie_name(&self) -> &str {
        &self.config.auth.cookie_name
    }

    /// 토큰 수명(분) 반환.
    pub fn token_ttl_minutes(&self) -> i64 {
        self.config.auth.token_ttl_minutes
    }

    /// 접근 정책 테이블 반환.
    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// 서버 업타임(초) 반환.
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }

    /// 데이터베이스 연결 상태 확인.
    ///
    /// 인메모리 모드에서는 항상 false입니다.
    pub async fn is_db_healthy(&self) -> bool {
        if let Some(pool) = &self.db_pool {
            sqlx::query("SELECT 1").fetch_one(pool).await.is_ok()
        } else {
            false
        }
    }
}

/// 테스트용 JWT 비밀 키.
#[cfg(any(test, feature = "test-utils"))]
pub const TEST_JWT_SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";

/// 테스트용 AppState 생성 헬퍼.
///
/// 실제 DB 연결 없이 인메모리 저장소로 동작하는 최소 상태를 생성합니다.
/// 사용자 계정이 필요한 테스트는 직접 `InMemoryUserStore`를 시드한 뒤
/// `AppState::new`를 호출하세요.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    use ems_core::{InMemoryEmployeeStore, InMemoryUserStore};

    AppState::new(
        AppConfig::default(),
        TEST_JWT_SECRET,
        Arc::new(InMemoryEmployeeStore::new()),
        Arc::new(InMemoryUserStore::new()),
    )
}
