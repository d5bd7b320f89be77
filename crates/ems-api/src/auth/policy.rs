//! 역할 기반 접근 제어 규칙 테이블.
//!
//! (메서드, 경로, 역할)의 순수 함수로 접근 허용 여부를 결정합니다.
//! 규칙은 기동 시 한 번 구성되어 순서대로 평가되고, 첫 번째로 매치되는
//! 규칙이 승리합니다. 어떤 규칙에도 매치되지 않는 요청은 기본적으로
//! 인증을 요구합니다 (default deny).

use axum::http::Method;
use ems_core::{EmsError, Role};

use super::middleware::AuthContext;

// =============================================================================
// 규칙 타입
// =============================================================================

/// 접근 수준.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// 누구나 접근 가능
    Public,
    /// 유효한 신원만 있으면 접근 가능
    Authenticated,
    /// 나열된 역할 중 하나 이상 보유 시 접근 가능
    AnyOf(Vec<Role>),
}

/// 단일 접근 규칙.
///
/// `methods`가 None이면 모든 메서드에 적용됩니다. 경로는 세그먼트
/// 경계 기준 접두사 매치입니다 (`/v1/employees`는 `/v1/employees`와
/// `/v1/employees/3`에 매치되지만 `/v1/employeesX`에는 매치되지 않음).
#[derive(Debug, Clone)]
pub struct AccessRule {
    methods: Option<Vec<Method>>,
    prefix: &'static str,
    access: Access,
}

impl AccessRule {
    /// 모든 메서드에 적용되는 규칙 생성.
    pub fn any_method(prefix: &'static str, access: Access) -> Self {
        Self {
            methods: None,
            prefix,
            access,
        }
    }

    /// 특정 메서드 집합에만 적용되는 규칙 생성.
    pub fn methods(methods: Vec<Method>, prefix: &'static str, access: Access) -> Self {
        Self {
            methods: Some(methods),
            prefix,
            access,
        }
    }

    fn matches(&self, method: &Method, path: &str) -> bool {
        if let Some(methods) = &self.methods {
            if !methods.contains(method) {
                return false;
            }
        }
        path == self.prefix
            || path
                .strip_prefix(self.prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

// =============================================================================
// 정책 테이블
// =============================================================================

/// 순서 있는 접근 규칙 테이블.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    rules: Vec<AccessRule>,
}

impl AccessPolicy {
    /// 규칙 목록으로 정책 생성.
    pub fn new(rules: Vec<AccessRule>) -> Self {
        Self { rules }
    }

    /// 기본 정책 테이블.
    ///
    /// - 헬스체크와 API 문서는 공개
    /// - 로그인/로그아웃은 공개
    /// - 직원 조회는 모든 역할, 생성/수정은 Manager/Admin, 삭제는 Admin
    /// - 그 외 모든 요청은 인증 필요
    pub fn default_table() -> Self {
        Self::new(vec![
            AccessRule::any_method("/health", Access::Public),
            AccessRule::any_method("/swagger-ui", Access::Public),
            AccessRule::any_method("/api-docs", Access::Public),
            AccessRule::methods(vec![Method::POST], "/v1/auth/login", Access::Public),
            AccessRule::methods(vec![Method::POST], "/v1/auth/logout", Access::Public),
            AccessRule::methods(
                vec![Method::GET],
                "/v1/employees",
                Access::AnyOf(vec![Role::Employee, Role::Manager, Role::Admin]),
            ),
            AccessRule::methods(
                vec![Method::POST, Method::PUT, Method::PATCH],
                "/v1/employees",
                Access::AnyOf(vec![Role::Manager, Role::Admin]),
            ),
            AccessRule::methods(
                vec![Method::DELETE],
                "/v1/employees",
                Access::AnyOf(vec![Role::Admin]),
            ),
        ])
    }

    /// 요청에 대한 접근 허용 여부를 판정합니다.
    ///
    /// # Arguments
    ///
    /// * `method` - HTTP 메서드
    /// * `path` - 요청 경로
    /// * `identity` - 인증된 신원 (익명이면 None)
    pub fn check(
        &self,
        method: &Method,
        path: &str,
        identity: Option<&AuthContext>,
    ) -> Result<(), EmsError> {
        let access = self
            .rules
            .iter()
            .find(|rule| rule.matches(method, path))
            .map(|rule| &rule.access)
            // 매치되는 규칙이 없으면 인증 요구
            .unwrap_or(&Access::Authenticated);

        match access {
            Access::Public => Ok(()),
            Access::Authenticated => {
                if identity.is_some() {
                    Ok(())
                } else {
                    Err(EmsError::Unauthenticated("Authentication required".into()))
                }
            }
            Access::AnyOf(required) => match identity {
                None => Err(EmsError::Unauthenticated("Authentication required".into())),
                Some(ctx) if required.iter().any(|role| ctx.has_role(*role)) => Ok(()),
                Some(_) => Err(EmsError::Forbidden("Access denied".into())),
            },
        }
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::default_table()
    }
}
