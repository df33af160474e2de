//! # CorrNet Core
//!
//! 상관관계 네트워크 분석의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 파이프라인 전반에서 사용되는 기본 타입을 제공합니다:
//! - 종목별 가격 시계열 및 기간 정의
//! - 정렬된 가격/수익률 행렬
//! - 상관행렬 및 상관관계 그래프
//! - 네트워크 지표 리포트
//! - 데이터 소스 경계 (`PriceSource`, 호출자 소유 캐시)
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
