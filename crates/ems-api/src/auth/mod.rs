//! 인증 및 권한 부여.
//!
//! JWT 기반 인증 및 역할 기반 접근 제어(RBAC)를 제공합니다.
//!
//! # 구성 요소
//!
//! - [`Claims`]: JWT 페이로드 구조체
//! - [`CredentialVerifier`]: 로그인 자격증명 검증기
//! - [`AccessPolicy`]: 순서 있는 접근 규칙 테이블 (first match wins)
//! - [`authenticate`]: 토큰 복원 + 정책 판정 미들웨어
//! - 토큰/비밀번호 처리 함수
//!
//! # 동작 개요
//!
//! 미들웨어는 토큰이 없거나 깨졌어도 요청을 막지 않고 익명으로
//! 통과시킵니다. 접근 거부는 정책 테이블의 판정으로만 일어나므로
//! 공개 경로는 토큰 상태와 무관하게 항상 동작합니다.

mod jwt;
mod middleware;
mod password;
mod policy;
mod verifier;

pub use jwt::{create_token, decode_token, Claims, JwtError};
pub use middleware::{authenticate, AuthContext};
pub use password::{hash_password, verify_password, PasswordError};
pub use policy::{Access, AccessPolicy, AccessRule};
pub use verifier::{CredentialVerifier, Identity};
