//! 외부 가격 데이터 소스 경계.
//!
//! 코어 파이프라인은 I/O를 수행하지 않습니다. 데이터 조회는 파이프라인 호출 전에
//! [`PriceSource`] 구현체가 담당하고, 중복 조회는 호출자가 소유한
//! [`SeriesCache`]로 방지합니다. 프로세스 전역 캐시는 두지 않습니다.
//!
//! ```text
//! 요청 (instrument, range)
//!         │
//!         ▼
//!   ┌───────────┐  HIT
//!   │SeriesCache├──────────► 복사본 반환
//!   └─────┬─────┘
//!         │ MISS
//!         ▼
//!   ┌───────────┐
//!   │PriceSource│ ── fetch ──► 캐시에 저장 후 반환
//!   └───────────┘
//! ```

use std::collections::HashMap;

use tracing::debug;

use crate::domain::series::InstrumentSeries;
use crate::error::CorrNetResult;
use crate::types::{DateRange, InstrumentId};

/// 종목별 가격 시계열을 공급하는 외부 데이터 소스.
pub trait PriceSource {
    /// 소스 이름 (로그용).
    fn name(&self) -> &str;

    /// 기간 내 종가 시계열을 조회합니다.
    fn fetch(&self, instrument: &str, range: &DateRange) -> CorrNetResult<InstrumentSeries>;
}

/// 호출자가 소유하는 시계열 캐시.
///
/// (종목, 기간) 단위로 조회 결과를 보관합니다.
#[derive(Debug, Default)]
pub struct SeriesCache {
    entries: HashMap<(InstrumentId, DateRange), InstrumentSeries>,
    hits: usize,
    misses: usize,
}

impl SeriesCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 캐시에 있으면 반환하고, 없으면 소스에서 조회해 저장합니다.
    pub fn get_or_fetch(
        &mut self,
        source: &dyn PriceSource,
        instrument: &str,
        range: &DateRange,
    ) -> CorrNetResult<InstrumentSeries> {
        let key = (instrument.to_string(), *range);
        if let Some(series) = self.entries.get(&key) {
            self.hits += 1;
            debug!(instrument, source = source.name(), "Series cache hit");
            return Ok(series.clone());
        }

        self.misses += 1;
        let series = source.fetch(instrument, range)?;
        debug!(
            instrument,
            source = source.name(),
            points = series.len(),
            "Series fetched"
        );
        self.entries.insert(key, series.clone());
        Ok(series)
    }

    /// 캐시된 항목 수.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (적중, 미스) 횟수.
    pub fn stats(&self) -> (usize, usize) {
        (self.hits, self.misses)
    }

    /// 모든 항목을 제거합니다.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CorrNetError;
    use chrono::{TimeZone, Utc};
    use std::cell::Cell;

    struct CountingSource {
        calls: Cell<usize>,
    }

    impl PriceSource for CountingSource {
        fn name(&self) -> &str {
            "counting"
        }

        fn fetch(&self, instrument: &str, range: &DateRange) -> CorrNetResult<InstrumentSeries> {
            self.calls.set(self.calls.get() + 1);
            if instrument == "MISSING" {
                return Err(CorrNetError::Data(format!("{} not found", instrument)));
            }
            InstrumentSeries::from_pairs(instrument, vec![(range.start(), 100.0)])
        }
    }

    fn range() -> DateRange {
        DateRange::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_cache_serves_repeated_requests() {
        let source = CountingSource {
            calls: Cell::new(0),
        };
        let mut cache = SeriesCache::new();

        let first = cache.get_or_fetch(&source, "AAPL", &range()).unwrap();
        let second = cache.get_or_fetch(&source, "AAPL", &range()).unwrap();

        assert_eq!(first, second);
        assert_eq!(source.calls.get(), 1);
        assert_eq!(cache.stats(), (1, 1));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_does_not_store_failures() {
        let source = CountingSource {
            calls: Cell::new(0),
        };
        let mut cache = SeriesCache::new();

        assert!(cache.get_or_fetch(&source, "MISSING", &range()).is_err());
        assert!(cache.get_or_fetch(&source, "MISSING", &range()).is_err());
        assert_eq!(source.calls.get(), 2);
        assert!(cache.is_empty());
    }
}
