//! 공통 시점 인덱스로 정렬된 행렬.
//!
//! 가격 행렬과 수익률 행렬 모두 이 타입으로 표현합니다.
//! 셀 값은 `Option<f64>`이며 `None`이 명시적인 결측 표시입니다.
//! 결측을 0으로 채우지 않습니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{CorrNetError, CorrNetResult};
use crate::types::InstrumentId;

/// 행렬의 한 열 (종목 하나).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// 종목 식별자
    pub instrument: InstrumentId,
    /// 시점별 값 (`None` = 결측)
    pub values: Vec<Option<f64>>,
}

impl Column {
    pub fn new(instrument: impl Into<InstrumentId>, values: Vec<Option<f64>>) -> Self {
        Self {
            instrument: instrument.into(),
            values,
        }
    }

    /// 결측이 아닌 값의 수.
    pub fn present_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}

/// 정렬된 행렬.
///
/// 불변 조건: 모든 열의 길이는 시점 인덱스 길이와 같고, 종목 식별자는 중복되지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedMatrix {
    timestamps: Vec<DateTime<Utc>>,
    columns: Vec<Column>,
}

impl AlignedMatrix {
    /// 새 행렬을 생성합니다.
    pub fn new(timestamps: Vec<DateTime<Utc>>, columns: Vec<Column>) -> CorrNetResult<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if column.values.len() != timestamps.len() {
                return Err(CorrNetError::InvalidSeries {
                    instrument: column.instrument.clone(),
                    reason: format!(
                        "열 길이 {}가 시점 인덱스 길이 {}와 다름",
                        column.values.len(),
                        timestamps.len()
                    ),
                });
            }
            if !seen.insert(column.instrument.as_str()) {
                return Err(CorrNetError::DuplicateInstrument(column.instrument.clone()));
            }
        }
        Ok(Self {
            timestamps,
            columns,
        })
    }

    /// 종목도 시점도 없는 빈 행렬.
    pub fn empty() -> Self {
        Self {
            timestamps: Vec::new(),
            columns: Vec::new(),
        }
    }

    /// 공통 시점 인덱스.
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// 열 목록 (종목 순서).
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// 종목 식별자 목록 (열 순서).
    pub fn instruments(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.instrument.as_str()).collect()
    }

    /// 종목 식별자로 열을 조회합니다.
    pub fn column(&self, instrument: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.instrument == instrument)
    }

    /// 특정 셀 값. 종목이 없거나 범위를 벗어나면 `None`, 결측이면 `Some(None)`.
    pub fn value(&self, instrument: &str, row: usize) -> Option<Option<f64>> {
        self.column(instrument)
            .and_then(|c| c.values.get(row).copied())
    }

    /// 행 수 (시점 수).
    pub fn n_rows(&self) -> usize {
        self.timestamps.len()
    }

    /// 열 수 (종목 수).
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// 종목이 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// 전체 결측 셀 수.
    pub fn missing_count(&self) -> usize {
        self.columns
            .iter()
            .map(|c| c.values.len() - c.present_count())
            .sum()
    }
}
