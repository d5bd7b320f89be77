//! Repository pattern for database operations.
//!
//! 데이터베이스 접근 로직을 라우트 핸들러에서 분리하여 관리합니다.
//! 각 저장소는 `ems-core`의 store 트레이트를 구현하므로 인메모리
//! 구현과 자유롭게 교체할 수 있습니다.
//!
//! # 기대하는 스키마
//!
//! ```sql
//! CREATE TABLE employee (
//!     id         SERIAL PRIMARY KEY,
//!     first_name VARCHAR(45) NOT NULL,
//!     last_name  VARCHAR(45) NOT NULL,
//!     email      VARCHAR(45) NOT NULL
//! );
//!
//! CREATE TABLE users (
//!     username      VARCHAR(50) PRIMARY KEY,
//!     password_hash TEXT        NOT NULL,
//!     enabled       BOOLEAN     NOT NULL DEFAULT TRUE
//! );
//!
//! CREATE TABLE user_authority (
//!     username  VARCHAR(50) NOT NULL REFERENCES users (username) ON DELETE CASCADE,
//!     authority VARCHAR(50) NOT NULL,
//!     PRIMARY KEY (username, authority)
//! );
//! ```

pub mod employees;
pub mod users;

pub use employees::PgEmployeeStore;
pub use users::PgUserStore;
