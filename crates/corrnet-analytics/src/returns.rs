//! 가격 → 수익률 변환.
//!
//! 가격 수준은 비정상(non-stationary) 시계열이라 가짜 상관관계를 만들기 때문에
//! 상관계수는 수익률 기준으로 계산합니다.
//!
//! - **단순 수익률**: `p_t / p_{t-1} - 1`
//! - **로그 수익률**: `ln(p_t / p_{t-1})`
//!
//! 첫 시점은 수익률이 없으므로 결과 행렬은 입력보다 한 행 짧습니다.

use tracing::debug;

use corrnet_core::{
    AlignedMatrix, Column, CorrNetError, CorrNetResult, PipelineConfig, ReturnMethod,
};

/// 수익률 변환기.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReturnTransformer {
    method: ReturnMethod,
}

impl ReturnTransformer {
    pub fn new(method: ReturnMethod) -> Self {
        Self { method }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.return_method)
    }

    pub fn method(&self) -> ReturnMethod {
        self.method
    }

    /// 가격 행렬을 수익률 행렬로 변환합니다.
    ///
    /// 두 가격 중 하나라도 결측이면 해당 수익률도 결측입니다.
    ///
    /// # 에러
    ///
    /// 로그 수익률에서 0 이하 가격이 있으면 `NonPositivePrice`.
    pub fn transform(&self, prices: &AlignedMatrix) -> CorrNetResult<AlignedMatrix> {
        if self.method == ReturnMethod::Log {
            Self::check_positive(prices)?;
        }

        let timestamps = prices.timestamps().iter().skip(1).copied().collect();
        let columns = prices
            .columns()
            .iter()
            .map(|c| Column::new(c.instrument.clone(), self.column_returns(&c.values)))
            .collect();

        let returns = AlignedMatrix::new(timestamps, columns)?;
        debug!(
            method = %self.method,
            rows = returns.n_rows(),
            missing = returns.missing_count(),
            "Returns computed"
        );
        Ok(returns)
    }

    /// 한 열의 가격을 수익률로 변환합니다 (길이: prices.len() - 1).
    fn column_returns(&self, prices: &[Option<f64>]) -> Vec<Option<f64>> {
        prices
            .windows(2)
            .map(|w| match (w[0], w[1]) {
                (Some(prev), Some(curr)) => self.single_return(prev, curr),
                _ => None,
            })
            .collect()
    }

    fn single_return(&self, prev: f64, curr: f64) -> Option<f64> {
        // 직전 가격이 0이면 비율이 정의되지 않음
        if prev == 0.0 {
            return None;
        }
        let r = match self.method {
            ReturnMethod::Simple => curr / prev - 1.0,
            ReturnMethod::Log => (curr / prev).ln(),
        };
        r.is_finite().then_some(r)
    }

    fn check_positive(prices: &AlignedMatrix) -> CorrNetResult<()> {
        for column in prices.columns() {
            for (row, value) in column.values.iter().enumerate() {
                if let Some(price) = *value {
                    if price <= 0.0 {
                        return Err(CorrNetError::NonPositivePrice {
                            instrument: column.instrument.clone(),
                            timestamp: prices.timestamps()[row],
                            price,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
    }

    fn matrix(columns: Vec<(&str, Vec<Option<f64>>)>) -> AlignedMatrix {
        let n = columns.first().map(|c| c.1.len()).unwrap_or(0);
        AlignedMatrix::new(
            (1..=n as u32).map(day).collect(),
            columns
                .into_iter()
                .map(|(id, values)| Column::new(id, values))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_simple_returns() {
        let prices = matrix(vec![("A", vec![Some(100.0), Some(101.0), Some(99.0), Some(102.0)])]);
        let returns = ReturnTransformer::new(ReturnMethod::Simple)
            .transform(&prices)
            .unwrap();

        assert_eq!(returns.n_rows(), 3);
        assert_eq!(returns.timestamps()[0], day(2));
        let values = &returns.column("A").unwrap().values;
        assert!((values[0].unwrap() - 0.01).abs() < 1e-12); // (101-100)/100
        assert!((values[1].unwrap() - (99.0 / 101.0 - 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_log_returns() {
        let prices = matrix(vec![("A", vec![Some(100.0), Some(110.0)])]);
        let returns = ReturnTransformer::new(ReturnMethod::Log)
            .transform(&prices)
            .unwrap();
        let r = returns.value("A", 0).unwrap().unwrap();
        assert!((r - (1.1f64).ln()).abs() < 1e-12);
    }

    #[test]
    fn test_log_rejects_non_positive_price() {
        let prices = matrix(vec![
            ("A", vec![Some(100.0), Some(101.0)]),
            ("B", vec![Some(0.0), Some(5.0)]),
        ]);
        let err = ReturnTransformer::new(ReturnMethod::Log)
            .transform(&prices)
            .unwrap_err();
        match err {
            CorrNetError::NonPositivePrice {
                instrument, price, ..
            } => {
                assert_eq!(instrument, "B");
                assert_eq!(price, 0.0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_prices_propagate() {
        let prices = matrix(vec![("A", vec![Some(100.0), None, Some(102.0), Some(103.0)])]);
        let returns = ReturnTransformer::default().transform(&prices).unwrap();
        let values = &returns.column("A").unwrap().values;
        assert_eq!(values[0], None);
        assert_eq!(values[1], None);
        assert!(values[2].is_some());
    }

    #[test]
    fn test_simple_return_after_zero_price_is_missing() {
        let prices = matrix(vec![("A", vec![Some(0.0), Some(1.0), Some(2.0)])]);
        let returns = ReturnTransformer::new(ReturnMethod::Simple)
            .transform(&prices)
            .unwrap();
        let values = &returns.column("A").unwrap().values;
        assert_eq!(values[0], None);
        assert_eq!(values[1], Some(1.0));
    }

    #[test]
    fn test_empty_matrix() {
        let returns = ReturnTransformer::default()
            .transform(&AlignedMatrix::empty())
            .unwrap();
        assert!(returns.is_empty());
        assert_eq!(returns.n_rows(), 0);
    }
}
