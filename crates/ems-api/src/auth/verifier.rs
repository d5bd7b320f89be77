//! 자격증명 검증.
//!
//! 사용자 저장소 조회와 Argon2 비밀번호 검증을 묶어 로그인 자격증명을
//! 확인합니다. 미존재 사용자, 비활성 계정, 비밀번호 불일치는 모두
//! 동일한 실패로 수렴하여 사용자 열거를 막습니다.

use std::sync::Arc;

use ems_core::{EmsError, EmsResult, Role, UserStore};

use super::password::{hash_password, verify_password};

/// 검증에 성공한 사용자 신원.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// 사용자 이름
    pub username: String,
    /// 부여된 역할 목록
    pub roles: Vec<Role>,
}

/// 자격증명 검증기.
///
/// clone해도 같은 사용자 저장소를 공유합니다.
#[derive(Clone)]
pub struct CredentialVerifier {
    users: Arc<dyn UserStore>,
    /// 미존재/비활성 계정 경로에서도 동일한 검증 비용을 지불하기 위한 해시
    dummy_hash: String,
}

impl CredentialVerifier {
    /// 새 검증기 생성.
    ///
    /// # Arguments
    ///
    /// * `users` - 사용자 계정 저장소
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        let dummy_hash = hash_password("!credential-timing-equalizer!").unwrap_or_default();
        Self { users, dummy_hash }
    }

    /// 사용자 이름/비밀번호를 검증하고 신원을 반환합니다.
    ///
    /// 실패 원인은 구분하지 않고 전부 `EmsError::InvalidCredentials`입니다.
    pub async fn verify(&self, username: &str, password: &str) -> EmsResult<Identity> {
        let account = self.users.find_by_username(username).await?;

        match account {
            Some(account) if account.enabled => {
                verify_password(password, &account.password_hash)
                    .map_err(|_| EmsError::InvalidCredentials)?;
                Ok(Identity {
                    username: account.username,
                    roles: account.roles,
                })
            }
            _ => {
                // 계정이 없거나 비활성이어도 해시 검증 비용은 동일하게 지불한다
                let _ = verify_password(password, &self.dummy_hash);
                Err(EmsError::InvalidCredentials)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ems_core::{InMemoryUserStore, UserAccount};

    async fn verifier_with(accounts: Vec<UserAccount>) -> CredentialVerifier {
        let store = InMemoryUserStore::new();
        for account in accounts {
            store.seed(account).await;
        }
        CredentialVerifier::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_verify_accepts_correct_password() {
        let hash = hash_password("secret99").unwrap();
        let verifier = verifier_with(vec![UserAccount::new(
            "jsmith",
            hash,
            vec![Role::Manager, Role::Employee],
        )])
        .await;

        let identity = verifier.verify("jsmith", "secret99").await.unwrap();
        assert_eq!(identity.username, "jsmith");
        assert_eq!(identity.roles, vec![Role::Manager, Role::Employee]);
    }

    #[tokio::test]
    async fn test_verify_failures_are_indistinguishable() {
        let hash = hash_password("secret99").unwrap();
        let verifier = verifier_with(vec![
            UserAccount::new("jsmith", hash.clone(), vec![Role::Employee]),
            UserAccount::new("locked", hash, vec![Role::Employee]).with_enabled(false),
        ])
        .await;

        // 비밀번호 불일치
        let err = verifier.verify("jsmith", "wrong").await.unwrap_err();
        assert!(matches!(err, EmsError::InvalidCredentials));

        // 미존재 사용자
        let err = verifier.verify("ghost", "secret99").await.unwrap_err();
        assert!(matches!(err, EmsError::InvalidCredentials));

        // 비활성 계정은 올바른 비밀번호라도 거부
        let err = verifier.verify("locked", "secret99").await.unwrap_err();
        assert!(matches!(err, EmsError::InvalidCredentials));
    }
}
