//! 직원 레코드 도메인 모델.
//!
//! 이 모듈은 직원 리소스 관련 타입을 정의합니다:
//! - `EmployeeRecord` - 저장된 직원 레코드
//! - `EmployeeInput` - 생성/수정 입력 (유효성 검증 포함)
//! - `PageRequest` / `Page` - 페이지네이션
//! - `SortSpec` - 허용 목록 기반 정렬 파라미터

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

use crate::error::EmsError;

/// 이름/성 최대 길이.
pub const NAME_MAX_LEN: usize = 45;
/// 이메일 최대 길이.
pub const EMAIL_MAX_LEN: usize = 45;

/// 기본 페이지 크기.
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// 페이지 크기 상한.
pub const MAX_PAGE_SIZE: u32 = 100;

// =============================================================================
// 직원 레코드
// =============================================================================

/// 저장소가 식별자를 부여한 직원 레코드.
///
/// `id`는 저장소가 생성 시 부여하며 이후 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct EmployeeRecord {
    /// 저장소 부여 식별자 (불변)
    pub id: i32,
    /// 이름
    pub first_name: String,
    /// 성
    pub last_name: String,
    /// 이메일 주소
    pub email: String,
}

// =============================================================================
// 커스텀 검증 함수
// =============================================================================

/// 이름 공백 검증.
fn validate_first_name_present(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("first_name_blank")
            .with_message("First name must not be blank".into()));
    }
    Ok(())
}

/// 성 공백 검증.
fn validate_last_name_present(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("last_name_blank")
            .with_message("Last name must not be blank".into()));
    }
    Ok(())
}

/// 이메일 공백 및 형식 검증.
///
/// 공백이면 형식 검사 없이 공백 위반만 보고합니다.
fn validate_email_format(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(
            ValidationError::new("email_blank").with_message("Email must not be blank".into())
        );
    }
    if !value.validate_email() {
        return Err(ValidationError::new("email_format")
            .with_message("Email must be a valid email address".into()));
    }
    Ok(())
}

/// 직원 생성/수정 입력.
///
/// 유효성 검증은 모든 필드의 위반 사항을 집계하며,
/// 메시지 목록은 필드 선언 순서를 따릅니다.
/// JSON 본문에서 누락된 필드는 빈 문자열로 채워져 blank 위반으로 집계됩니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(default)]
pub struct EmployeeInput {
    /// 이름 (1~45자)
    #[validate(
        custom(function = "validate_first_name_present"),
        length(max = 45, message = "First name must be at most 45 characters")
    )]
    pub first_name: String,
    /// 성 (1~45자)
    #[validate(
        custom(function = "validate_last_name_present"),
        length(max = 45, message = "Last name must be at most 45 characters")
    )]
    pub last_name: String,
    /// 이메일 주소 (형식 검증, 최대 45자)
    #[validate(
        custom(function = "validate_email_format"),
        length(max = 45, message = "Email must be at most 45 characters")
    )]
    pub email: String,
}

impl EmployeeInput {
    /// 새 입력을 생성합니다.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
        }
    }

    /// 모든 필드를 검증하고 위반 사항을 집계합니다.
    ///
    /// # Returns
    ///
    /// 위반이 있으면 `EmsError::Validation`에 `"필드: 메시지"` 목록을 담아 반환합니다.
    /// 목록 순서는 first_name, last_name, email 순입니다.
    pub fn validated(&self) -> Result<(), EmsError> {
        match self.validate() {
            Ok(()) => Ok(()),
            Err(errors) => Err(EmsError::Validation(collect_field_messages(&errors))),
        }
    }
}

/// 필드 선언 순서로 정렬된 `"필드: 메시지"` 목록을 생성합니다.
fn collect_field_messages(errors: &ValidationErrors) -> Vec<String> {
    const FIELD_ORDER: [&str; 3] = ["first_name", "last_name", "email"];

    let field_errors = errors.field_errors();
    let mut messages = Vec::new();

    for field in FIELD_ORDER {
        if let Some(list) = field_errors.get(field) {
            for error in list.iter() {
                let text = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("invalid value ({})", error.code));
                messages.push(format!("{}: {}", field, text));
            }
        }
    }

    messages
}

// =============================================================================
// 정렬
// =============================================================================

/// 정렬 가능한 필드 허용 목록.
///
/// 목록 밖의 필드는 `EmsError::InvalidSort`로 거부합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    /// 식별자
    Id,
    /// 이름
    FirstName,
    /// 성
    LastName,
    /// 이메일
    Email,
}

impl SortField {
    /// 쿼리 파라미터 표기에서 파싱.
    ///
    /// snake_case와 camelCase 표기를 모두 허용합니다 (`last_name`, `lastName`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "id" => Some(SortField::Id),
            "first_name" | "firstName" => Some(SortField::FirstName),
            "last_name" | "lastName" => Some(SortField::LastName),
            "email" => Some(SortField::Email),
            _ => None,
        }
    }

    /// 저장소 컬럼 이름을 반환합니다.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::FirstName => "first_name",
            SortField::LastName => "last_name",
            SortField::Email => "email",
        }
    }
}

/// 정렬 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// 오름차순
    #[default]
    Asc,
    /// 내림차순
    Desc,
}

impl SortDirection {
    /// SQL 키워드를 반환합니다.
    pub fn keyword(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// 정렬 지정 (`필드,방향`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    /// 정렬 필드
    pub field: SortField,
    /// 정렬 방향
    pub direction: SortDirection,
}

impl SortSpec {
    /// `"lastName,asc"` 형식의 쿼리 파라미터를 파싱합니다.
    ///
    /// 방향이 생략되면 오름차순입니다. 허용 목록에 없는 필드나
    /// `asc`/`desc` 이외의 방향은 `EmsError::InvalidSort`로 거부합니다.
    pub fn parse(raw: &str) -> Result<Self, EmsError> {
        let mut parts = raw.splitn(2, ',');
        let field_part = parts.next().unwrap_or_default();
        let direction_part = parts.next();

        let field = SortField::parse(field_part).ok_or_else(|| {
            EmsError::InvalidSort(format!("unknown sort field '{}'", field_part.trim()))
        })?;

        let direction = match direction_part {
            None => SortDirection::default(),
            Some(d) => match d.trim().to_lowercase().as_str() {
                "asc" => SortDirection::Asc,
                "desc" => SortDirection::Desc,
                other => {
                    return Err(EmsError::InvalidSort(format!(
                        "unknown sort direction '{}'",
                        other
                    )))
                }
            },
        };

        Ok(Self { field, direction })
    }
}

// =============================================================================
// 페이지네이션
// =============================================================================

/// 페이지 요청 (0부터 시작).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 페이지 번호 (0부터)
    pub page: u32,
    /// 페이지 크기 (1~100)
    pub size: u32,
    /// 정렬 지정 (없으면 id 오름차순)
    pub sort: Option<SortSpec>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: None,
        }
    }
}

impl PageRequest {
    /// 새 페이지 요청을 생성합니다. 크기는 1~100으로 보정됩니다.
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size: size.clamp(1, MAX_PAGE_SIZE),
            sort: None,
        }
    }

    /// 정렬을 설정합니다.
    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    /// 건너뛸 레코드 수를 반환합니다.
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

/// 페이지 조회 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Page<T> {
    /// 현재 페이지 항목
    pub items: Vec<T>,
    /// 전체 항목 수 (필터 적용 후)
    pub total: u64,
    /// 페이지 번호 (0부터)
    pub page: u32,
    /// 페이지 크기
    pub size: u32,
}

impl<T> Page<T> {
    /// 새 페이지를 생성합니다.
    pub fn new(items: Vec<T>, total: u64, request: &PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            size: request.size,
        }
    }

    /// 전체 페이지 수를 계산합니다.
    pub fn total_pages(&self) -> u64 {
        if self.total == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> EmployeeInput {
        EmployeeInput::new("Ana", "Silva", "ana.silva@example.com")
    }

    #[test]
    fn test_valid_input_passes() {
        assert!(valid_input().validated().is_ok());
    }

    #[test]
    fn test_blank_first_name_reports_field_message() {
        let mut input = valid_input();
        input.first_name = "   ".to_string();

        let err = input.validated().unwrap_err();
        match err {
            EmsError::Validation(messages) => {
                assert_eq!(
                    messages,
                    vec!["first_name: First name must not be blank".to_string()]
                );
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_all_violations_aggregated_in_field_order() {
        let input = EmployeeInput::new("", "", "not-an-email");

        let err = input.validated().unwrap_err();
        let EmsError::Validation(messages) = err else {
            panic!("expected validation error");
        };

        assert_eq!(
            messages,
            vec![
                "first_name: First name must not be blank".to_string(),
                "last_name: Last name must not be blank".to_string(),
                "email: Email must be a valid email address".to_string(),
            ]
        );
    }

    #[test]
    fn test_overlong_fields_rejected() {
        let long_name = "x".repeat(NAME_MAX_LEN + 1);
        let input = EmployeeInput::new(long_name.clone(), "Silva", "ana@example.com");

        let EmsError::Validation(messages) = input.validated().unwrap_err() else {
            panic!("expected validation error");
        };
        assert_eq!(
            messages,
            vec!["first_name: First name must be at most 45 characters".to_string()]
        );

        // 길이 상한을 넘는 이메일은 형식이 유효해도 거부됨
        let long_email = format!("{}@example.com", "a".repeat(EMAIL_MAX_LEN));
        let input = EmployeeInput::new("Ana", "Silva", long_email);
        let EmsError::Validation(messages) = input.validated().unwrap_err() else {
            panic!("expected validation error");
        };
        assert_eq!(
            messages,
            vec!["email: Email must be at most 45 characters".to_string()]
        );
    }

    #[test]
    fn test_boundary_length_accepted() {
        let name = "x".repeat(NAME_MAX_LEN);
        let input = EmployeeInput::new(name.clone(), name, "edge@example.com");
        assert!(input.validated().is_ok());
    }

    #[test]
    fn test_sort_spec_parse() {
        let spec = SortSpec::parse("lastName,asc").unwrap();
        assert_eq!(spec.field, SortField::LastName);
        assert_eq!(spec.direction, SortDirection::Asc);

        let spec = SortSpec::parse("email,DESC").unwrap();
        assert_eq!(spec.field, SortField::Email);
        assert_eq!(spec.direction, SortDirection::Desc);

        // 방향 생략 시 오름차순
        let spec = SortSpec::parse("first_name").unwrap();
        assert_eq!(spec.field, SortField::FirstName);
        assert_eq!(spec.direction, SortDirection::Asc);
    }

    #[test]
    fn test_sort_spec_rejects_unknown_field_and_direction() {
        assert!(matches!(
            SortSpec::parse("salary,asc"),
            Err(EmsError::InvalidSort(_))
        ));
        assert!(matches!(
            SortSpec::parse("email,sideways"),
            Err(EmsError::InvalidSort(_))
        ));
        // SQL 조각이 정렬 필드로 통과하지 않음
        assert!(matches!(
            SortSpec::parse("id; DROP TABLE employee"),
            Err(EmsError::InvalidSort(_))
        ));
    }

    #[test]
    fn test_page_request_clamps_size() {
        assert_eq!(PageRequest::new(0, 0).size, 1);
        assert_eq!(PageRequest::new(0, 500).size, MAX_PAGE_SIZE);
        assert_eq!(PageRequest::new(3, 25).offset(), 75);
    }

    #[test]
    fn test_page_total_pages() {
        let request = PageRequest::new(0, 20);
        let page: Page<i32> = Page::new(vec![], 0, &request);
        assert_eq!(page.total_pages(), 0);

        let page: Page<i32> = Page::new(vec![1; 20], 41, &request);
        assert_eq!(page.total_pages(), 3);
    }
}
