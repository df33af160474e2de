//! 종목별 가격 시계열.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CorrNetError, CorrNetResult};
use crate::types::{DateRange, InstrumentId};

/// 특정 시점의 종가.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// 시점
    pub timestamp: DateTime<Utc>,
    /// 종가
    pub price: f64,
}

impl PricePoint {
    pub fn new(timestamp: DateTime<Utc>, price: f64) -> Self {
        Self { timestamp, price }
    }
}

/// 한 종목의 시간순 가격 시계열.
///
/// 생성 시 검증되며 이후 변경되지 않습니다:
/// - 식별자는 비어 있지 않음
/// - 시점은 엄격하게 증가 (중복 없음)
/// - 가격은 유한한 값
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstrumentSeries {
    instrument: InstrumentId,
    points: Vec<PricePoint>,
}

impl InstrumentSeries {
    /// 새 시계열을 생성합니다.
    pub fn new(instrument: impl Into<InstrumentId>, points: Vec<PricePoint>) -> CorrNetResult<Self> {
        let instrument = instrument.into();
        if instrument.trim().is_empty() {
            return Err(CorrNetError::InvalidSeries {
                instrument,
                reason: "빈 종목 식별자".to_string(),
            });
        }

        for w in points.windows(2) {
            if w[1].timestamp <= w[0].timestamp {
                return Err(CorrNetError::InvalidSeries {
                    instrument,
                    reason: format!(
                        "시점이 증가하지 않음: {} 다음에 {}",
                        w[0].timestamp, w[1].timestamp
                    ),
                });
            }
        }

        if let Some(bad) = points.iter().find(|p| !p.price.is_finite()) {
            return Err(CorrNetError::InvalidSeries {
                instrument,
                reason: format!("유한하지 않은 가격 @ {}", bad.timestamp),
            });
        }

        Ok(Self { instrument, points })
    }

    /// (시점, 가격) 쌍 목록에서 생성합니다.
    pub fn from_pairs(
        instrument: impl Into<InstrumentId>,
        pairs: impl IntoIterator<Item = (DateTime<Utc>, f64)>,
    ) -> CorrNetResult<Self> {
        let points = pairs
            .into_iter()
            .map(|(timestamp, price)| PricePoint::new(timestamp, price))
            .collect();
        Self::new(instrument, points)
    }

    /// Decimal 가격에서 생성합니다.
    pub fn from_decimal(
        instrument: impl Into<InstrumentId>,
        pairs: impl IntoIterator<Item = (DateTime<Utc>, Decimal)>,
    ) -> CorrNetResult<Self> {
        let instrument = instrument.into();
        let mut points = Vec::new();
        for (timestamp, price) in pairs {
            let price = price.to_f64().ok_or_else(|| CorrNetError::InvalidSeries {
                instrument: instrument.clone(),
                reason: format!("f64로 변환할 수 없는 가격: {}", price),
            })?;
            points.push(PricePoint::new(timestamp, price));
        }
        Self::new(instrument, points)
    }

    /// 종목 식별자.
    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    /// 가격 포인트 (시간순).
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// 포인트 수.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// 포인트가 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 기간 내 포인트만 남긴 새 시계열을 반환합니다.
    pub fn window(&self, range: &DateRange) -> Self {
        Self {
            instrument: self.instrument.clone(),
            points: self
                .points
                .iter()
                .filter(|p| range.contains(p.timestamp))
                .copied()
                .collect(),
        }
    }

    /// 첫 시점과 마지막 시점.
    pub fn span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => Some((first.timestamp, last.timestamp)),
            _ => None,
        }
    }
}
