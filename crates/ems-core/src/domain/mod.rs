//! 직원 관리 도메인 모델.

mod employee;
mod memory;
mod store;
mod user;

pub use employee::*;
pub use memory::*;
pub use store::*;
pub use user::*;
