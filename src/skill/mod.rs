//! 캐릭터 스킬.
//!
//! 상속 대신 `(캐릭터, 생명주기)` 조회표로 오버라이드를 찾고,
//! 없으면 공용 기본 함수로 돌아갑니다.

pub mod book;
pub mod substitution;
pub mod table;

pub use book::SkillBook;
pub use table::{Activation, DiscardPlan, SkillHook, SkillTable, StrikeAllowance};
