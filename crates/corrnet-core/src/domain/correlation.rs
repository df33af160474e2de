//! 상관계수 값과 상관행렬.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{CorrNetError, CorrNetResult};
use crate::types::InstrumentId;

/// 상관계수가 정의되지 않은 이유.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndefinedReason {
    /// 두 종목이 함께 관측된 시점이 부족함
    InsufficientOverlap { observations: usize, required: usize },
    /// 중첩 구간에서 한쪽 이상의 분산이 0
    ZeroVariance,
}

impl std::fmt::Display for UndefinedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UndefinedReason::InsufficientOverlap {
                observations,
                required,
            } => write!(f, "공통 관측치 부족 ({}/{})", observations, required),
            UndefinedReason::ZeroVariance => write!(f, "분산 0"),
        }
    }
}

/// 종목 쌍의 상관계수.
///
/// 미정의 값은 0으로 대체하지 않으며, 그래프 간선을 만들 수 없습니다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Correlation {
    /// Pearson 상관계수 (-1.0 ~ 1.0)
    Defined { value: f64 },
    /// 계산 불가
    Undefined { reason: UndefinedReason },
}

impl Correlation {
    pub fn defined(value: f64) -> Self {
        Correlation::Defined { value }
    }

    pub fn undefined(reason: UndefinedReason) -> Self {
        Correlation::Undefined { reason }
    }

    /// 정의된 값이면 반환합니다.
    pub fn value(&self) -> Option<f64> {
        match self {
            Correlation::Defined { value } => Some(*value),
            Correlation::Undefined { .. } => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, Correlation::Defined { .. })
    }
}

/// N×N 상관행렬.
///
/// 대칭이며, 값은 행 우선 순서로 저장됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    instruments: Vec<InstrumentId>,
    values: Vec<Correlation>,
    #[serde(skip)]
    index: HashMap<InstrumentId, usize>,
}

impl CorrelationMatrix {
    /// 종목 목록과 행 우선 값으로 생성합니다.
    ///
    /// 값의 개수가 N×N이 아니거나 대칭이 아니면 에러를 반환합니다.
    pub fn new(instruments: Vec<InstrumentId>, values: Vec<Correlation>) -> CorrNetResult<Self> {
        let n = instruments.len();
        if values.len() != n * n {
            return Err(CorrNetError::InvalidGraph(format!(
                "상관행렬 크기 불일치: {}개 종목에 {}개 값",
                n,
                values.len()
            )));
        }
        for i in 0..n {
            for j in (i + 1)..n {
                if values[i * n + j] != values[j * n + i] {
                    return Err(CorrNetError::InvalidGraph(format!(
                        "비대칭 상관행렬: ({}, {})",
                        instruments[i], instruments[j]
                    )));
                }
            }
        }

        let mut index = HashMap::with_capacity(n);
        for (i, id) in instruments.iter().enumerate() {
            if index.insert(id.clone(), i).is_some() {
                return Err(CorrNetError::DuplicateInstrument(id.clone()));
            }
        }

        Ok(Self {
            instruments,
            values,
            index,
        })
    }

    /// 종목 목록 (행/열 순서).
    pub fn instruments(&self) -> &[InstrumentId] {
        &self.instruments
    }

    /// 종목 수.
    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// 종목 식별자의 행/열 인덱스.
    pub fn index_of(&self, instrument: &str) -> Option<usize> {
        // 역직렬화된 행렬은 인덱스 맵이 비어 있음
        if self.index.is_empty() {
            return self.instruments.iter().position(|id| id == instrument);
        }
        self.index.get(instrument).copied()
    }

    /// 인덱스로 상관계수를 조회합니다. 범위를 벗어나면 `None`.
    pub fn get_by_index(&self, i: usize, j: usize) -> Option<Correlation> {
        let n = self.instruments.len();
        (i < n && j < n).then(|| self.values[i * n + j])
    }

    /// 식별자로 상관계수를 조회합니다. 알 수 없는 종목이면 `None`.
    pub fn get(&self, a: &str, b: &str) -> Option<Correlation> {
        self.get_by_index(self.index_of(a)?, self.index_of(b)?)
    }

    /// 상삼각(i < j) 쌍을 순회합니다.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize, Correlation)> + '_ {
        let n = self.instruments.len();
        (0..n).flat_map(move |i| {
            ((i + 1)..n).map(move |j| (i, j, self.values[i * n + j]))
        })
    }

    /// 정의된 종목 쌍의 수 (대각선 제외).
    pub fn defined_pair_count(&self) -> usize {
        self.pairs().filter(|(_, _, c)| c.is_defined()).count()
    }
}

impl PartialEq for CorrelationMatrix {
    fn eq(&self, other: &Self) -> bool {
        self.instruments == other.instruments && self.values == other.values
    }
}
