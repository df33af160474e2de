//! CSV 가격 데이터 로더.
//!
//! `<data_dir>/<SYMBOL>.csv` 파일을 읽어 종가 시계열을 만듭니다.
//!
//! ```text
//! date,open,high,low,close,volume
//! 2024-01-02,185.64,188.44,183.89,185.64,82488700
//! ```
//!
//! `date`와 `close` 열만 사용하며, 나머지 열은 없어도 됩니다.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

use corrnet_core::{
    start_of_day, CorrNetError, CorrNetResult, DateRange, InstrumentId, InstrumentSeries,
    PriceSource, SeriesCache,
};

/// 디렉토리 기반 CSV 가격 소스.
#[derive(Debug, Clone)]
pub struct CsvPriceSource {
    data_dir: PathBuf,
}

impl CsvPriceSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// 종목의 CSV 파일 경로.
    pub fn path_for(&self, instrument: &str) -> PathBuf {
        self.data_dir.join(format!("{}.csv", instrument))
    }

    fn read_rows(path: &Path, instrument: &str) -> CorrNetResult<Vec<(NaiveDate, Decimal)>> {
        let data_err = |msg: String| CorrNetError::Data(format!("{}: {}", instrument, msg));

        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| data_err(format!("파일을 열 수 없음 ({}): {}", path.display(), e)))?;

        let headers = reader
            .headers()
            .map_err(|e| data_err(format!("헤더 읽기 실패: {}", e)))?
            .clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| data_err(format!("'{}' 열이 없음", name)))
        };
        let date_idx = column("date")?;
        let close_idx = column("close")?;

        let mut rows = Vec::new();
        let mut skipped = 0usize;
        for (line, record) in reader.records().enumerate() {
            let record = record.map_err(|e| data_err(format!("{}행 읽기 실패: {}", line + 2, e)))?;
            let date_str = record.get(date_idx).unwrap_or("").trim();
            let close_str = record.get(close_idx).unwrap_or("").trim();

            // 빈 종가는 거래 정지일 등으로 간주하고 건너뜀
            if close_str.is_empty() {
                skipped += 1;
                continue;
            }

            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
                .map_err(|_| data_err(format!("{}행 잘못된 날짜: {}", line + 2, date_str)))?;
            let close = Decimal::from_str(close_str)
                .map_err(|_| data_err(format!("{}행 잘못된 종가: {}", line + 2, close_str)))?;
            rows.push((date, close));
        }

        if skipped > 0 {
            warn!(instrument, skipped, "Rows without close price skipped");
        }
        Ok(rows)
    }
}

impl PriceSource for CsvPriceSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(&self, instrument: &str, range: &DateRange) -> CorrNetResult<InstrumentSeries> {
        let path = self.path_for(instrument);
        let mut rows = Self::read_rows(&path, instrument)?;
        rows.sort_by_key(|(date, _)| *date);

        let in_range = rows
            .into_iter()
            .map(|(date, close)| (start_of_day(date), close))
            .filter(|(ts, _)| range.contains(*ts));
        let series = InstrumentSeries::from_decimal(instrument, in_range)?;

        debug!(
            instrument,
            path = %path.display(),
            points = series.len(),
            "CSV series loaded"
        );
        Ok(series)
    }
}

/// 종목 목록의 시계열을 캐시를 거쳐 로드합니다.
///
/// 중복 종목은 캐시에서 제공되고 결과에서는 한 번만 나타납니다 (첫 등장 순서).
pub fn load_series(
    source: &dyn PriceSource,
    cache: &mut SeriesCache,
    symbols: &[InstrumentId],
    range: &DateRange,
) -> Result<Vec<InstrumentSeries>> {
    let pb = ProgressBar::new(symbols.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut seen = HashSet::with_capacity(symbols.len());
    let mut loaded = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        pb.set_message(symbol.clone());
        let series = cache
            .get_or_fetch(source, symbol, range)
            .with_context(|| format!("Failed to load price series for {}", symbol))?;
        if seen.insert(symbol.as_str()) {
            loaded.push(series);
        } else {
            debug!(symbol = %symbol, "Duplicate symbol served from cache");
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    let (hits, misses) = cache.stats();
    info!(
        source = source.name(),
        requested = symbols.len(),
        loaded = loaded.len(),
        cache_hits = hits,
        cache_misses = misses,
        "Price series loaded"
    );
    Ok(loaded)
}
