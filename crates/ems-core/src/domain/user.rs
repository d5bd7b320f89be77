//! 사용자 계정 및 역할.
//!
//! 역할 기반 접근 제어(RBAC)에 사용되는 역할 집합과
//! 자격증명 검증에 필요한 계정 정보를 정의합니다.
//! 계정의 생성/수정은 이 시스템 밖에서 이루어집니다.

use serde::{Deserialize, Serialize};

/// 사용자 역할.
///
/// 닫힌 집합이며 요청 허용 여부는 요청에 부여된 역할과
/// 라우트가 요구하는 역할 집합의 교집합으로 판정합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// 관리자 - 삭제를 포함한 모든 직원 조작 가능
    Admin,
    /// 매니저 - 직원 조회/생성/수정 가능
    Manager,
    /// 일반 직원 - 직원 조회만 가능
    Employee,
}

impl Role {
    /// 문자열에서 역할 파싱.
    ///
    /// 대소문자를 구분하지 않으며, 외부 계정 테이블에서 쓰이는
    /// `ROLE_` prefix 표기(`ROLE_ADMIN` 등)도 허용합니다.
    pub fn parse(s: &str) -> Option<Self> {
        let name = s.trim();
        let name = name.strip_prefix("ROLE_").unwrap_or(name);
        match name.to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "manager" => Some(Role::Manager),
            "employee" => Some(Role::Employee),
            _ => None,
        }
    }

    /// 소문자 이름을 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Employee => "employee",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 인증용 사용자 계정.
///
/// 비밀번호는 Argon2 PHC 문자열 해시로만 보관합니다.
#[derive(Debug, Clone, PartialEq)]
pub struct UserAccount {
    /// 로그인 아이디 (고유)
    pub username: String,
    /// Argon2 비밀번호 해시 (PHC 형식)
    pub password_hash: String,
    /// 활성화 여부 - 비활성 계정은 로그인 불가
    pub enabled: bool,
    /// 부여된 역할 목록
    pub roles: Vec<Role>,
}

impl UserAccount {
    /// 새 계정을 생성합니다.
    pub fn new(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        roles: Vec<Role>,
    ) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
            enabled: true,
            roles,
        }
    }

    /// 활성화 여부를 설정합니다.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// 주어진 역할을 가지는지 확인합니다.
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("MANAGER"), Some(Role::Manager));
        assert_eq!(Role::parse("Employee"), Some(Role::Employee));
        assert_eq!(Role::parse("ROLE_ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse(" role_employee "), None); // prefix는 대문자 표기만 허용
        assert_eq!(Role::parse("superuser"), None);
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&Role::Manager).unwrap();
        assert_eq!(json, "\"manager\"");

        let parsed: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(parsed, Role::Admin);
    }

    #[test]
    fn test_role_display_round_trip() {
        for role in [Role::Admin, Role::Manager, Role::Employee] {
            assert_eq!(Role::parse(&role.to_string()), Some(role));
        }
    }

    #[test]
    fn test_user_account_roles() {
        let account = UserAccount::new("jdoe", "$argon2id$...", vec![Role::Employee, Role::Manager]);

        assert!(account.enabled);
        assert!(account.has_role(Role::Manager));
        assert!(!account.has_role(Role::Admin));

        let disabled = account.with_enabled(false);
        assert!(!disabled.enabled);
    }
}
