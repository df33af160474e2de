//! 시계열 정렬 유틸리티.
//!
//! 거래일이 서로 다른 여러 종목의 가격 시계열을 하나의 공통 시점 인덱스로
//! 정렬하여 종목을 열로 하는 직사각형 행렬을 만듭니다.
//!
//! # 정렬 방식
//!
//! - **교집합**: 모든 종목에 존재하는 시점만 남깁니다. 결측이 없지만 데이터가 버려질 수 있습니다.
//! - **합집합**: 모든 시점을 남기고, 종목에 없는 시점은 결측(`None`)으로 표시합니다.
//!
//! ## 예시
//!
//! - A: 1/2, 1/3, 1/4
//! - B: 1/2, 1/4, 1/5
//! - **교집합**: 1/2, 1/4
//! - **합집합**: 1/2, 1/3(B 결측), 1/4, 1/5(A 결측)
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! use corrnet_analytics::alignment::SeriesAligner;
//! use corrnet_core::AlignmentMode;
//!
//! let aligner = SeriesAligner::new(AlignmentMode::Intersection, 2);
//! let prices = aligner.align(&series)?;
//! ```

use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, warn};

use corrnet_core::{
    AlignedMatrix, AlignmentMode, Column, CorrNetError, CorrNetResult, InstrumentSeries,
    PipelineConfig, MIN_OBSERVATIONS,
};

/// 시계열 정렬기.
#[derive(Debug, Clone, Copy)]
pub struct SeriesAligner {
    mode: AlignmentMode,
    min_common: usize,
}

impl Default for SeriesAligner {
    fn default() -> Self {
        Self::new(AlignmentMode::Intersection, MIN_OBSERVATIONS)
    }
}

impl SeriesAligner {
    /// 새 정렬기를 생성합니다.
    ///
    /// # 인자
    ///
    /// * `mode` - 교집합 또는 합집합
    /// * `min_common` - 교집합 정렬 시 필요한 최소 공통 시점 수
    pub fn new(mode: AlignmentMode, min_common: usize) -> Self {
        Self { mode, min_common }
    }

    /// 파이프라인 설정에서 생성합니다.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.alignment_mode, config.min_common_timestamps)
    }

    pub fn mode(&self) -> AlignmentMode {
        self.mode
    }

    /// 시계열들을 공통 시점 인덱스로 정렬합니다.
    ///
    /// 열은 종목 식별자 순서로 정렬됩니다. 종목이 없으면 빈 행렬을 반환합니다.
    ///
    /// # 에러
    ///
    /// - `DuplicateInstrument`: 같은 종목이 두 번 이상 주어진 경우
    /// - `InsufficientOverlap`: 교집합 시점 수가 `min_common`보다 적은 경우
    pub fn align(&self, series: &[InstrumentSeries]) -> CorrNetResult<AlignedMatrix> {
        if series.is_empty() {
            return Ok(AlignedMatrix::empty());
        }

        let mut seen = HashSet::with_capacity(series.len());
        for s in series {
            if !seen.insert(s.instrument()) {
                return Err(CorrNetError::DuplicateInstrument(s.instrument().to_string()));
            }
        }

        let timestamps = match self.mode {
            AlignmentMode::Intersection => Self::intersect_timestamps(series),
            AlignmentMode::Union => Self::union_timestamps(series),
        };

        if self.mode == AlignmentMode::Intersection && timestamps.len() < self.min_common {
            return Err(CorrNetError::InsufficientOverlap {
                common: timestamps.len(),
                required: self.min_common,
            });
        }

        let total_points: usize = series.iter().map(|s| s.len()).sum();
        let kept_points = timestamps.len() * series.len();
        if self.mode == AlignmentMode::Intersection && kept_points < total_points {
            warn!(
                dropped = total_points - kept_points,
                common = timestamps.len(),
                "Intersection alignment dropped observations"
            );
        }

        let mut ordered: Vec<&InstrumentSeries> = series.iter().collect();
        ordered.sort_by(|a, b| a.instrument().cmp(b.instrument()));

        let columns = ordered
            .into_iter()
            .map(|s| Column::new(s.instrument(), Self::project(s, &timestamps)))
            .collect();

        let matrix = AlignedMatrix::new(timestamps, columns)?;
        debug!(
            mode = %self.mode,
            instruments = matrix.n_columns(),
            rows = matrix.n_rows(),
            missing = matrix.missing_count(),
            "Series aligned"
        );
        Ok(matrix)
    }

    /// 모든 시계열에 존재하는 시점 (시간순).
    fn intersect_timestamps(series: &[InstrumentSeries]) -> Vec<DateTime<Utc>> {
        // 가장 짧은 시계열을 기준으로 나머지 시계열에 모두 있는지 확인
        let Some(shortest) = series.iter().min_by_key(|s| s.len()) else {
            return Vec::new();
        };
        let others: Vec<HashSet<DateTime<Utc>>> = series
            .iter()
            .map(|s| s.points().iter().map(|p| p.timestamp).collect())
            .collect();

        shortest
            .points()
            .iter()
            .map(|p| p.timestamp)
            .filter(|ts| others.iter().all(|set| set.contains(ts)))
            .collect()
    }

    /// 어느 시계열에라도 존재하는 시점 (시간순).
    fn union_timestamps(series: &[InstrumentSeries]) -> Vec<DateTime<Utc>> {
        series
            .iter()
            .flat_map(|s| s.points().iter().map(|p| p.timestamp))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// 시계열을 공통 인덱스에 투영합니다. 없는 시점은 `None`.
    fn project(series: &InstrumentSeries, timestamps: &[DateTime<Utc>]) -> Vec<Option<f64>> {
        let by_time: HashMap<DateTime<Utc>, f64> = series
            .points()
            .iter()
            .map(|p| (p.timestamp, p.price))
            .collect();
        timestamps.iter().map(|ts| by_time.get(ts).copied()).collect()
    }
}
