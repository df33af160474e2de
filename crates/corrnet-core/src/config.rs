//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.
//! 설정은 파이프라인 생성 시 한 번 주입되며 이후 변경되지 않습니다.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use crate::error::{CorrNetError, CorrNetResult};
use crate::types::{AlignmentMode, CentralityKind, CommunityWeighting, EdgeSign, ReturnMethod};

/// 상관계수 계산에 필요한 최소 관측치 수.
pub const MIN_OBSERVATIONS: usize = 2;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 파이프라인 설정
    pub pipeline: PipelineConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// 데이터 소스 설정
    pub data: DataConfig,
}

/// 파이프라인 설정.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// 시계열 정렬 방식
    pub alignment_mode: AlignmentMode,
    /// 수익률 계산 방식
    pub return_method: ReturnMethod,
    /// 종목 쌍별 최소 중첩 관측치 수 (>= 2)
    pub min_overlap: usize,
    /// 교집합 정렬 시 최소 공통 시점 수 (>= 2)
    pub min_common_timestamps: usize,
    /// 간선 포함 |상관계수| 임계값 (>= 0)
    pub edge_threshold: f64,
    /// 노드별 상위 k개 간선 유지 (미설정 시 비활성)
    pub top_k: Option<usize>,
    /// 간선으로 허용할 상관계수 부호
    pub edge_sign: EdgeSign,
    /// 계산할 중심성 지표
    pub centrality_kinds: BTreeSet<CentralityKind>,
    /// 커뮤니티 탐지 가중치 방식
    pub community_weighting: CommunityWeighting,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            alignment_mode: AlignmentMode::Intersection,
            return_method: ReturnMethod::Simple,
            min_overlap: MIN_OBSERVATIONS,
            min_common_timestamps: MIN_OBSERVATIONS,
            edge_threshold: 0.0,
            top_k: None,
            edge_sign: EdgeSign::Both,
            centrality_kinds: [CentralityKind::Closeness, CentralityKind::Betweenness]
                .into_iter()
                .collect(),
            community_weighting: CommunityWeighting::Unweighted,
        }
    }
}

impl PipelineConfig {
    /// 설정 값의 유효성을 검사합니다.
    pub fn validate(&self) -> CorrNetResult<()> {
        if self.min_overlap < MIN_OBSERVATIONS {
            return Err(CorrNetError::InvalidConfig(format!(
                "min_overlap은 {} 이상이어야 합니다 (현재: {})",
                MIN_OBSERVATIONS, self.min_overlap
            )));
        }
        if self.min_common_timestamps < MIN_OBSERVATIONS {
            return Err(CorrNetError::InvalidConfig(format!(
                "min_common_timestamps는 {} 이상이어야 합니다 (현재: {})",
                MIN_OBSERVATIONS, self.min_common_timestamps
            )));
        }
        if !self.edge_threshold.is_finite() || self.edge_threshold < 0.0 {
            return Err(CorrNetError::InvalidConfig(format!(
                "edge_threshold는 0 이상의 유한한 값이어야 합니다 (현재: {})",
                self.edge_threshold
            )));
        }
        if self.top_k == Some(0) {
            return Err(CorrNetError::InvalidConfig(
                "top_k는 1 이상이어야 합니다".to_string(),
            ));
        }
        Ok(())
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 데이터 소스 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DataConfig {
    /// 종목별 CSV 파일 디렉토리
    pub data_dir: String,
    /// 분석 대상 종목 목록
    pub symbols: Vec<String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            symbols: Vec::new(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("pipeline.alignment_mode", "intersection")?
            .set_default("pipeline.return_method", "simple")?
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("CORRNET")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pipeline_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_overlap, 2);
        assert_eq!(config.edge_threshold, 0.0);
        assert!(config.top_k.is_none());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = PipelineConfig {
            min_overlap: 1,
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().is_config_error());

        let config = PipelineConfig {
            edge_threshold: -0.1,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = PipelineConfig {
            edge_threshold: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = PipelineConfig {
            top_k: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let raw = r#"
            [pipeline]
            alignment_mode = "union"
            edge_threshold = 0.68
            top_k = 3
            centrality_kinds = ["betweenness"]

            [data]
            symbols = ["AAPL", "MSFT"]
        "#;
        let config: AppConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.pipeline.alignment_mode, AlignmentMode::Union);
        assert_eq!(config.pipeline.return_method, ReturnMethod::Simple);
        assert_eq!(config.pipeline.top_k, Some(3));
        assert_eq!(config.pipeline.centrality_kinds.len(), 1);
        assert_eq!(config.data.symbols.len(), 2);
        assert_eq!(config.logging.level, "info");
    }
}
