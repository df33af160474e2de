//! 분석 기간 정의.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CorrNetError, CorrNetResult};

/// 분석 기간 `[start, end)`.
///
/// 시작 시점은 포함, 종료 시점은 제외합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DateRange {
    /// 새 기간을 생성합니다. `start < end`가 아니면 에러를 반환합니다.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> CorrNetResult<Self> {
        if start >= end {
            return Err(CorrNetError::InvalidConfig(format!(
                "시작 시점({})이 종료 시점({})보다 앞서야 합니다",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// 날짜 단위로 기간을 생성합니다 (자정 UTC 기준).
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> CorrNetResult<Self> {
        Self::new(start_of_day(start), start_of_day(end))
    }

    /// 시작 시점.
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// 종료 시점 (제외).
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// 시점이 기간에 포함되는지 확인합니다.
    #[inline]
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start && ts < self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ~ {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// 날짜를 해당일 자정(UTC) 시점으로 변환합니다.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .unwrap_or_default()
}
