//! 요청 인증/인가 미들웨어.
//!
//! 모든 요청에서 토큰을 추출해 신원을 복원하고, 정책 테이블로 접근을
//! 판정합니다. 토큰 추출/검증 실패는 요청을 거부하지 않고 익명으로
//! 진행시키며, 거부 여부는 전적으로 정책이 결정합니다.

use axum::extract::{Request, State};
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use ems_core::Role;

use super::jwt::{decode_token, Claims};
use crate::error::ApiError;
use crate::state::AppState;

/// 요청 범위의 인증된 신원.
///
/// 미들웨어가 요청 extension에 삽입하며 해당 요청 처리 동안만
/// 유효합니다. 요청 간에 공유되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// 사용자 이름
    pub subject: String,
    /// 토큰에 실려 온 역할 목록
    pub roles: Vec<Role>,
}

impl AuthContext {
    /// 특정 역할 보유 여부.
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

impl From<Claims> for AuthContext {
    fn from(claims: Claims) -> Self {
        Self {
            subject: claims.sub,
            roles: claims.roles,
        }
    }
}

/// 인증 + 인가 미들웨어.
///
/// 1. `Authorization: Bearer` 헤더, 없으면 설정된 쿠키에서 토큰 추출
/// 2. 검증 성공 시 `AuthContext`를 요청 extension에 삽입 (실패는 익명 진행)
/// 3. 정책 테이블 판정 — 거부 시 401/403 `ApiError` 응답
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = extract_token(request.headers(), state.cookie_name()) {
        match decode_token(&token, state.jwt_secret()) {
            Ok(data) => {
                request
                    .extensions_mut()
                    .insert(AuthContext::from(data.claims));
            }
            Err(err) => {
                // 잘못된 토큰은 익명과 동일하게 취급한다
                tracing::debug!(error = %err, "토큰 검증 실패, 익명으로 진행");
            }
        }
    }

    let identity = request.extensions().get::<AuthContext>().cloned();
    if let Err(err) = state
        .policy()
        .check(request.method(), request.uri().path(), identity.as_ref())
    {
        let path = request.uri().path().to_string();
        return ApiError::from(err).with_path(path).into_response();
    }

    next.run(request).await
}

/// 요청 헤더에서 토큰 후보를 추출합니다.
///
/// Bearer 헤더가 우선이고, 없을 때만 쿠키를 봅니다.
fn extract_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    if let Some(value) = headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok()) {
        if let Some(token) = value.strip_prefix("Bearer ") {
            let token = token.trim();
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }

    headers
        .get(COOKIE)
        .and_then(|h| h.to_str().ok())
        .and_then(|raw| cookie_value(raw, cookie_name))
}

/// Cookie 헤더에서 이름이 일치하는 값을 찾습니다.
fn cookie_value(raw: &str, name: &str) -> Option<String> {
    raw.split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(entries: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in entries {
            map.append(
                axum::http::HeaderName::try_from(*name).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn test_bearer_header_takes_precedence_over_cookie() {
        let map = headers(&[
            ("authorization", "Bearer header-token"),
            ("cookie", "jwt_token=cookie-token"),
        ]);
        assert_eq!(
            extract_token(&map, "jwt_token"),
            Some("header-token".to_string())
        );
    }

    #[test]
    fn test_cookie_fallback_when_no_header() {
        let map = headers(&[("cookie", "theme=dark; jwt_token=cookie-token; lang=ko")]);
        assert_eq!(
            extract_token(&map, "jwt_token"),
            Some("cookie-token".to_string())
        );
    }

    #[test]
    fn test_no_candidate_returns_none() {
        let map = headers(&[("cookie", "theme=dark")]);
        assert_eq!(extract_token(&map, "jwt_token"), None);

        // Bearer 접두사가 아니면 무시
        let map = headers(&[("authorization", "Basic dXNlcjpwYXNz")]);
        assert_eq!(extract_token(&map, "jwt_token"), None);

        // 빈 Bearer 토큰도 후보가 아니다
        let map = headers(&[("authorization", "Bearer ")]);
        assert_eq!(extract_token(&map, "jwt_token"), None);
    }

    #[test]
    fn test_cookie_value_parsing() {
        assert_eq!(
            cookie_value("a=1; jwt_token=abc.def.ghi; b=2", "jwt_token"),
            Some("abc.def.ghi".to_string())
        );
        assert_eq!(cookie_value("jwt_token=", "jwt_token"), None);
        assert_eq!(cookie_value("other=x", "jwt_token"), None);
    }

    #[test]
    fn test_auth_context_from_claims() {
        let claims = Claims::new("jsmith", vec![Role::Admin, Role::Manager], 60);
        let ctx = AuthContext::from(claims);

        assert_eq!(ctx.subject, "jsmith");
        assert!(ctx.has_role(Role::Admin));
        assert!(ctx.has_role(Role::Manager));
        assert!(!ctx.has_role(Role::Employee));
    }
}
