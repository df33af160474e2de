//! 상관관계 네트워크 도메인 모델.
//!
//! 파이프라인의 각 단계가 주고받는 불변 값 타입을 정의합니다:
//! - `InstrumentSeries` - 종목별 가격 시계열 (입력)
//! - `AlignedMatrix` - 공통 시점 인덱스로 정렬된 가격/수익률 행렬
//! - `CorrelationMatrix` - 종목 쌍별 상관계수 (정의됨/미정의 구분)
//! - `Graph` - 상관관계 가중치 무방향 그래프
//! - `MetricReport` - 노드별 네트워크 지표
//! - `PriceSource`, `SeriesCache` - 외부 데이터 소스 경계

pub mod aligned;
pub mod correlation;
pub mod graph;
pub mod report;
pub mod series;
pub mod source;

pub use aligned::*;
pub use correlation::*;
pub use graph::*;
pub use report::*;
pub use series::*;
pub use source::*;
