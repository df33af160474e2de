//! 상관관계 네트워크 파이프라인의 에러 타입.
//!
//! 모든 에러는 잘못된 입력 또는 설정을 의미하며 내부에서 재시도하지 않습니다.
//! 종목 쌍의 상관계수가 정의되지 않는 경우(관측치 부족, 분산 0)는 에러가 아니라
//! [`Correlation::Undefined`](crate::Correlation) 값으로 표현됩니다.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// 파이프라인 에러.
#[derive(Debug, Error)]
pub enum CorrNetError {
    /// 교집합 정렬 결과 공통 시점이 부족함
    #[error("공통 시점 부족: {common}개 (최소 {required}개 필요)")]
    InsufficientOverlap { common: usize, required: usize },

    /// 로그 수익률 계산 시 0 이하 가격
    #[error("양수가 아닌 가격: {instrument} @ {timestamp} = {price}")]
    NonPositivePrice {
        instrument: String,
        timestamp: DateTime<Utc>,
        price: f64,
    },

    /// 종목 집합이 비어 있음
    #[error("종목이 없어 그래프를 만들 수 없습니다")]
    EmptyGraph,

    /// 잘못된 가격 시계열
    #[error("잘못된 시계열 {instrument}: {reason}")]
    InvalidSeries { instrument: String, reason: String },

    /// 중복 종목
    #[error("중복 종목: {0}")]
    DuplicateInstrument(String),

    /// 잘못된 그래프 구성
    #[error("잘못된 그래프: {0}")]
    InvalidGraph(String),

    /// 설정 에러
    #[error("설정 에러: {0}")]
    InvalidConfig(String),

    /// 데이터 소스 에러
    #[error("데이터 에러: {0}")]
    Data(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),
}

/// 파이프라인 작업을 위한 Result 타입.
pub type CorrNetResult<T> = Result<T, CorrNetError>;

impl CorrNetError {
    /// 설정 문제로 인한 에러인지 확인합니다.
    pub fn is_config_error(&self) -> bool {
        matches!(self, CorrNetError::InvalidConfig(_))
    }

    /// 입력 데이터 문제로 인한 에러인지 확인합니다.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CorrNetError::InsufficientOverlap { .. }
                | CorrNetError::NonPositivePrice { .. }
                | CorrNetError::EmptyGraph
                | CorrNetError::InvalidSeries { .. }
                | CorrNetError::DuplicateInstrument(_)
                | CorrNetError::Data(_)
        )
    }
}

impl From<serde_json::Error> for CorrNetError {
    fn from(err: serde_json::Error) -> Self {
        CorrNetError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let err = CorrNetError::InvalidConfig("top_k = 0".to_string());
        assert!(err.is_config_error());
        assert!(!err.is_input_error());

        let err = CorrNetError::InsufficientOverlap {
            common: 1,
            required: 2,
        };
        assert!(err.is_input_error());
        assert!(!err.is_config_error());
    }

    #[test]
    fn test_error_display() {
        let err = CorrNetError::InsufficientOverlap {
            common: 1,
            required: 2,
        };
        assert!(err.to_string().contains("1"));
        assert!(err.to_string().contains("2"));
    }
}
