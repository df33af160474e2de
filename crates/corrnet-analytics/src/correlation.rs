//! 상관계수 계산 모듈.
//!
//! 종목 간 수익률 움직임의 상관관계를 계산합니다.
//!
//! # 주요 기능
//!
//! - **Pearson 상관계수**: 두 종목 간 선형 상관관계 측정 (쌍별 결측 제거)
//! - **상관행렬**: 여러 종목 간 상관관계를 N×N 행렬로 표현
//!
//! 관측치가 부족하거나 분산이 0인 쌍은 0으로 대체하지 않고
//! [`Correlation::Undefined`]로 표시합니다.
//!
//! # 예시
//!
//! ```rust,ignore
//! use corrnet_analytics::correlation::calculate_correlation;
//!
//! let returns_a = vec![0.01, -0.02, 0.015, 0.005];
//! let returns_b = vec![0.008, -0.015, 0.012, 0.003];
//!
//! let corr = calculate_correlation(&returns_a, &returns_b);
//! println!("상관계수: {:.4}", corr.unwrap_or(0.0));
//! ```

use tracing::debug;

use corrnet_core::{
    AlignedMatrix, Correlation, CorrelationMatrix, CorrNetResult, PipelineConfig,
    UndefinedReason, MIN_OBSERVATIONS,
};

/// Pearson 상관계수 계산.
///
/// 두 수익률 시계열 간의 상관계수를 계산합니다.
///
/// # 반환
///
/// 상관계수 (-1.0 ~ 1.0), 길이가 다르거나 데이터 부족/분산 0이면 None
pub fn calculate_correlation(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() {
        return None;
    }
    let pairs: Vec<(f64, f64)> = x.iter().copied().zip(y.iter().copied()).collect();
    pearson(&pairs, MIN_OBSERVATIONS).value()
}

/// 결측을 포함한 두 열의 상관계수.
///
/// 두 값이 모두 존재하는 시점만 사용합니다.
pub fn pairwise_correlation(
    x: &[Option<f64>],
    y: &[Option<f64>],
    min_overlap: usize,
) -> Correlation {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y.iter())
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .collect();
    pearson(&pairs, min_overlap)
}

/// 2-pass Pearson 계산 (평균 먼저, 이후 편차 합).
fn pearson(pairs: &[(f64, f64)], min_overlap: usize) -> Correlation {
    let required = min_overlap.max(MIN_OBSERVATIONS);
    if pairs.len() < required {
        return Correlation::undefined(UndefinedReason::InsufficientOverlap {
            observations: pairs.len(),
            required,
        });
    }

    // 모든 값이 같으면 합산 오차와 무관하게 분산 0
    let (first_x, first_y) = pairs[0];
    if pairs.iter().all(|p| p.0 == first_x) || pairs.iter().all(|p| p.1 == first_y) {
        return Correlation::undefined(UndefinedReason::ZeroVariance);
    }

    let n = pairs.len() as f64;

    // 평균 계산
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    // 공분산 및 분산 계산
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;

    for &(x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    // 분산이 0인 경우 (변동 없음)
    if var_x == 0.0 || var_y == 0.0 {
        return Correlation::undefined(UndefinedReason::ZeroVariance);
    }

    let r = cov / (var_x.sqrt() * var_y.sqrt());
    if !r.is_finite() {
        return Correlation::undefined(UndefinedReason::ZeroVariance);
    }
    Correlation::defined(r.clamp(-1.0, 1.0))
}

/// 상관행렬 계산기.
#[derive(Debug, Clone, Copy)]
pub struct CorrelationEngine {
    min_overlap: usize,
}

impl Default for CorrelationEngine {
    fn default() -> Self {
        Self::new(MIN_OBSERVATIONS)
    }
}

impl CorrelationEngine {
    /// 새 계산기를 생성합니다. `min_overlap`은 2 미만이면 2로 올립니다.
    pub fn new(min_overlap: usize) -> Self {
        Self {
            min_overlap: min_overlap.max(MIN_OBSERVATIONS),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.min_overlap)
    }

    pub fn min_overlap(&self) -> usize {
        self.min_overlap
    }

    /// 수익률 행렬의 전체 상관행렬을 계산합니다.
    ///
    /// 상삼각만 계산하고 대칭으로 복사합니다. 대각선은 열 자신과의 상관계수로,
    /// 관측치가 충분하고 분산이 0이 아니면 1.0입니다.
    pub fn compute(&self, returns: &AlignedMatrix) -> CorrNetResult<CorrelationMatrix> {
        let columns = returns.columns();
        let n = columns.len();

        let upper: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .collect();
        let upper_values = self.compute_pairs(returns, &upper);

        let mut values = vec![Correlation::defined(1.0); n * n];
        for (i, column) in columns.iter().enumerate() {
            values[i * n + i] = self.diagonal(&column.values);
        }
        for (&(i, j), &corr) in upper.iter().zip(upper_values.iter()) {
            values[i * n + j] = corr;
            values[j * n + i] = corr; // 대칭
        }

        let instruments = columns.iter().map(|c| c.instrument.clone()).collect();
        let matrix = CorrelationMatrix::new(instruments, values)?;
        debug!(
            instruments = n,
            pairs = upper.len(),
            defined = matrix.defined_pair_count(),
            "Correlation matrix computed"
        );
        Ok(matrix)
    }

    /// 대각선 값: 관측치가 충분하고 분산이 있으면 1.0.
    fn diagonal(&self, values: &[Option<f64>]) -> Correlation {
        match pairwise_correlation(values, values, self.min_overlap) {
            Correlation::Defined { .. } => Correlation::defined(1.0),
            undefined => undefined,
        }
    }

    fn compute_pairs(&self, returns: &AlignedMatrix, pairs: &[(usize, usize)]) -> Vec<Correlation> {
        #[cfg(feature = "parallel")]
        {
            self.compute_pairs_parallel(returns, pairs)
        }
        #[cfg(not(feature = "parallel"))]
        {
            self.compute_pairs_sequential(returns, pairs)
        }
    }

    #[cfg_attr(all(feature = "parallel", not(test)), allow(dead_code))]
    fn compute_pairs_sequential(
        &self,
        returns: &AlignedMatrix,
        pairs: &[(usize, usize)],
    ) -> Vec<Correlation> {
        let columns = returns.columns();
        pairs
            .iter()
            .map(|&(i, j)| pairwise_correlation(&columns[i].values, &columns[j].values, self.min_overlap))
            .collect()
    }

    #[cfg(any(feature = "parallel", test))]
    fn compute_pairs_parallel(
        &self,
        returns: &AlignedMatrix,
        pairs: &[(usize, usize)],
    ) -> Vec<Correlation> {
        use rayon::prelude::*;

        // 쌍별 계산은 서로 독립이며, collect가 입력 순서를 유지함
        let columns = returns.columns();
        pairs
            .par_iter()
            .map(|&(i, j)| pairwise_correlation(&columns[i].values, &columns[j].values, self.min_overlap))
            .collect()
    }
}
