//! 상관관계 네트워크 분석 엔진.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 시계열 정렬 (교집합 / 합집합)
//! - 가격 → 수익률 변환 (단순 / 로그)
//! - 결측을 고려한 쌍별 Pearson 상관행렬 (`parallel` feature로 병렬화)
//! - 임계값 / top-k / 부호 정책 기반 그래프 생성
//! - 네트워크 지표 (차수, 군집 계수, 중심성, 연결 요소, 커뮤니티)
//!
//! # Re-exports
//!
//! - [`pipeline`]: 전체 단계를 묶은 [`CorrelationPipeline`]
//! - [`network`]: [`NetworkAnalyzer`]

pub mod alignment;
pub mod correlation;
pub mod graph_builder;
pub mod network;
pub mod pipeline;
pub mod returns;

// 단계별 re-exports
pub use alignment::SeriesAligner;
pub use correlation::{calculate_correlation, pairwise_correlation, CorrelationEngine};
pub use graph_builder::{EdgePolicy, GraphBuilder};
pub use network::NetworkAnalyzer;
pub use returns::ReturnTransformer;

// Pipeline 모듈 re-exports
pub use pipeline::{CorrelationPipeline, PipelineOutput};
