//! 상관관계 네트워크 파이프라인.
//!
//! 정렬 → 수익률 → 상관행렬 → 그래프 → 네트워크 지표 순서로 실행하는
//! 순수 배치 파이프라인입니다. 각 단계는 새 값을 만들 뿐 입력을 변경하지
//! 않으므로, 같은 입력과 설정이면 항상 같은 결과가 나옵니다.
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! use corrnet_analytics::CorrelationPipeline;
//! use corrnet_core::PipelineConfig;
//!
//! let pipeline = CorrelationPipeline::new(PipelineConfig::default())?;
//! let output = pipeline.run(&series)?;
//! println!("modularity = {:.4}", output.report.summary.modularity);
//! ```

use serde::Serialize;
use tracing::{info, instrument};

use corrnet_core::{
    pipeline_span, AlignedMatrix, CorrNetError, CorrNetResult, Correlation, CorrelationMatrix,
    Graph, InstrumentId, InstrumentSeries, MetricReport, PipelineConfig,
};

use crate::alignment::SeriesAligner;
use crate::correlation::CorrelationEngine;
use crate::graph_builder::GraphBuilder;
use crate::network::NetworkAnalyzer;
use crate::returns::ReturnTransformer;

/// 파이프라인 전체 결과.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineOutput {
    /// 정렬된 가격 행렬
    pub prices: AlignedMatrix,
    /// 수익률 행렬
    pub returns: AlignedMatrix,
    /// 상관행렬
    pub correlations: CorrelationMatrix,
    /// 상관관계 그래프
    pub graph: Graph,
    /// 네트워크 지표
    pub report: MetricReport,
}

impl PipelineOutput {
    /// 두 종목 사이 상관계수. 종목이 없으면 `None`.
    pub fn correlation_between(&self, a: &str, b: &str) -> Option<Correlation> {
        self.correlations.get(a, b)
    }

    /// 같은 커뮤니티에 속하면서 `instrument`와 간선으로 직접 연결된 종목 (식별자 순서).
    ///
    /// 종목이 그래프에 없으면 `None`.
    pub fn connected_in_community(&self, instrument: &str) -> Option<Vec<InstrumentId>> {
        let community = self.report.community_of(instrument)?;
        Some(
            self.graph
                .neighbors(instrument)
                .into_iter()
                .filter(|(other, _)| community.members.iter().any(|m| m == other))
                .map(|(other, _)| other.to_string())
                .collect(),
        )
    }
}

/// 상관관계 네트워크 파이프라인.
#[derive(Debug, Clone)]
pub struct CorrelationPipeline {
    config: PipelineConfig,
    aligner: SeriesAligner,
    transformer: ReturnTransformer,
    engine: CorrelationEngine,
    builder: GraphBuilder,
    analyzer: NetworkAnalyzer,
}

impl CorrelationPipeline {
    /// 설정을 검증하고 파이프라인을 생성합니다.
    ///
    /// # 에러
    ///
    /// 설정 값이 허용 범위를 벗어나면 `InvalidConfig`.
    pub fn new(config: PipelineConfig) -> CorrNetResult<Self> {
        config.validate()?;
        Ok(Self {
            aligner: SeriesAligner::from_config(&config),
            transformer: ReturnTransformer::from_config(&config),
            engine: CorrelationEngine::from_config(&config),
            builder: GraphBuilder::from_config(&config),
            analyzer: NetworkAnalyzer::from_config(&config),
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// 가격 시계열 집합에서 전체 파이프라인을 실행합니다.
    ///
    /// 어느 단계에서든 실패하면 부분 결과 없이 에러를 반환합니다.
    #[instrument(skip_all, fields(instruments = series.len()))]
    pub fn run(&self, series: &[InstrumentSeries]) -> CorrNetResult<PipelineOutput> {
        if series.is_empty() {
            return Err(CorrNetError::EmptyGraph);
        }

        let prices = pipeline_span!("align", series.len()).in_scope(|| self.aligner.align(series))?;
        let returns = pipeline_span!("returns").in_scope(|| self.transformer.transform(&prices))?;
        let correlations =
            pipeline_span!("correlation").in_scope(|| self.engine.compute(&returns))?;
        let graph = pipeline_span!("graph").in_scope(|| self.builder.build(&correlations))?;
        let report = pipeline_span!("network").in_scope(|| self.analyzer.analyze(&graph));

        info!(
            instruments = graph.node_count(),
            observations = returns.n_rows(),
            defined_pairs = correlations.defined_pair_count(),
            edges = graph.edge_count(),
            components = report.summary.component_count,
            communities = report.communities.len(),
            "Correlation network built"
        );

        Ok(PipelineOutput {
            prices,
            returns,
            correlations,
            graph,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn series(id: &str, prices: &[f64]) -> InstrumentSeries {
        InstrumentSeries::from_pairs(
            id,
            prices
                .iter()
                .enumerate()
                .map(|(i, &p)| (Utc.with_ymd_and_hms(2024, 3, 1 + i as u32, 0, 0, 0).unwrap(), p)),
        )
        .unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PipelineConfig {
            edge_threshold: -0.1,
            ..Default::default()
        };
        assert!(matches!(
            CorrelationPipeline::new(config),
            Err(CorrNetError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_empty_input_is_empty_graph() {
        let pipeline = CorrelationPipeline::new(PipelineConfig::default()).unwrap();
        assert!(matches!(pipeline.run(&[]), Err(CorrNetError::EmptyGraph)));
    }

    #[test]
    fn test_query_helpers() {
        let config = PipelineConfig {
            edge_threshold: 0.9,
            ..Default::default()
        };
        let pipeline = CorrelationPipeline::new(config).unwrap();
        let output = pipeline
            .run(&[
                series("A", &[100.0, 101.0, 99.0, 102.0, 103.0]),
                series("B", &[50.0, 50.5, 49.5, 51.0, 51.5]),
                series("C", &[10.0, 9.0, 11.0, 9.5, 12.0]),
            ])
            .unwrap();

        assert!(output.correlation_between("A", "B").unwrap().is_defined());
        assert!(output.correlation_between("A", "Z").is_none());
        assert_eq!(output.connected_in_community("A"), Some(vec!["B".to_string()]));
        assert_eq!(output.connected_in_community("C"), Some(Vec::new()));
        assert!(output.connected_in_community("Z").is_none());
    }
}
