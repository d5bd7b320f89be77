//! # EMS Core
//!
//! 직원 관리 백엔드의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 HTTP 계층과 무관하게 사용되는 기본 구성 요소를 제공합니다:
//! - 직원 레코드와 입력 검증
//! - 사용자 계정 및 역할 정의
//! - 페이지/정렬 요청 타입
//! - 저장소 트레이트와 인메모리 구현
//! - 직원 관리 유스케이스 서비스
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod service;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use service::EmployeeService;
