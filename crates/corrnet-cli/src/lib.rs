//! CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - CSV 가격 데이터 로더
//! - 상관관계 네트워크 분석 및 결과 출력
//! - 종목 쌍 상관계수 / 커뮤니티 조회

pub mod commands;

pub use commands::*;
