//! 파이프라인 통합 테스트.
//!
//! 가격 시계열 입력부터 네트워크 지표 리포트까지 전체 단계를 검증합니다.

use chrono::{DateTime, TimeZone, Utc};

use corrnet_analytics::{
    CorrelationEngine, CorrelationPipeline, EdgePolicy, GraphBuilder, NetworkAnalyzer,
};
use corrnet_core::{
    AlignedMatrix, AlignmentMode, Column, CorrNetError, Correlation, EdgeSign, InstrumentSeries,
    PipelineConfig, ReturnMethod, UndefinedReason,
};

fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
}

/// 첫 가격과 수익률 목록으로 가격 시계열을 만듭니다.
fn series_from_returns(id: &str, start: f64, returns: &[f64]) -> InstrumentSeries {
    let mut price = start;
    let mut pairs = vec![(day(1), price)];
    for (i, r) in returns.iter().enumerate() {
        price *= 1.0 + r;
        pairs.push((day(2 + i as u32), price));
    }
    InstrumentSeries::from_pairs(id, pairs).unwrap()
}

fn series(id: &str, points: &[(u32, f64)]) -> InstrumentSeries {
    InstrumentSeries::from_pairs(id, points.iter().map(|&(d, p)| (day(d), p))).unwrap()
}

fn config(threshold: f64) -> PipelineConfig {
    PipelineConfig {
        edge_threshold: threshold,
        ..Default::default()
    }
}

#[test]
fn test_perfectly_correlated_pair_forms_single_edge() {
    // 수익률 행렬을 직접 구성: A=[0.01,-0.02,0.03], B=[0.02,-0.04,0.06]
    let returns = AlignedMatrix::new(
        vec![day(2), day(3), day(4)],
        vec![
            Column::new("A", vec![Some(0.01), Some(-0.02), Some(0.03)]),
            Column::new("B", vec![Some(0.02), Some(-0.04), Some(0.06)]),
        ],
    )
    .unwrap();

    let correlations = CorrelationEngine::default().compute(&returns).unwrap();
    let corr = correlations.get("A", "B").unwrap().value().unwrap();
    assert!((corr - 1.0).abs() < 1e-12);

    let graph = GraphBuilder::new(EdgePolicy::threshold(0.5))
        .build(&correlations)
        .unwrap();
    assert_eq!(graph.edge_count(), 1);
    let edge = &graph.edges()[0];
    assert_eq!((edge.source.as_str(), edge.target.as_str()), ("A", "B"));
    assert!((edge.weight - 1.0).abs() < 1e-12);
}

#[test]
fn test_constant_price_instrument_is_isolated() {
    let a = series_from_returns("A", 100.0, &[0.01, -0.02, 0.03]);
    let b = series_from_returns("B", 100.0, &[0.02, -0.04, 0.06]);
    let c = series("C", &[(1, 50.0), (2, 50.0), (3, 50.0), (4, 50.0)]);

    let pipeline = CorrelationPipeline::new(config(0.5)).unwrap();
    let output = pipeline.run(&[a, b, c]).unwrap();

    let ab = output.correlation_between("A", "B").unwrap().value().unwrap();
    assert!((ab - 1.0).abs() < 1e-9);
    assert_eq!(
        output.correlation_between("A", "C"),
        Some(Correlation::undefined(UndefinedReason::ZeroVariance))
    );
    assert!(!output.correlation_between("B", "C").unwrap().is_defined());

    // 노드 집합 = 종목 집합, C는 고립
    assert_eq!(output.graph.nodes(), &["A", "B", "C"]);
    assert_eq!(output.graph.edge_count(), 1);
    assert_eq!(output.graph.isolated_nodes(), vec!["C"]);

    let c_metrics = output.report.node("C").unwrap();
    assert_eq!(c_metrics.degree, 0);
    assert_eq!(c_metrics.component, "C");
    assert_eq!(output.report.node("B").unwrap().component, "A");
}

#[test]
fn test_union_alignment_marks_missing_dates() {
    let a = series("A", &[(1, 10.0), (2, 11.0), (4, 12.0), (5, 11.5)]);
    let b = series("B", &[(1, 20.0), (2, 21.0), (3, 22.0), (4, 23.0), (5, 22.0)]);

    let pipeline = CorrelationPipeline::new(PipelineConfig {
        alignment_mode: AlignmentMode::Union,
        ..Default::default()
    })
    .unwrap();
    let output = pipeline.run(&[a, b]).unwrap();

    assert_eq!(output.prices.n_rows(), 5);
    assert_eq!(output.prices.value("A", 2), Some(None));
    // 1/3 결측 → 1/3, 1/4 수익률 모두 결측
    assert_eq!(output.returns.value("A", 1), Some(None));
    assert_eq!(output.returns.value("A", 2), Some(None));
    assert!(output.returns.value("B", 1).unwrap().is_some());
}

#[test]
fn test_intersection_drops_non_common_dates() {
    let a = series("A", &[(1, 10.0), (2, 11.0), (3, 12.0), (5, 11.0)]);
    let b = series("B", &[(1, 20.0), (3, 22.0), (4, 23.0), (5, 21.0)]);

    let pipeline = CorrelationPipeline::new(PipelineConfig::default()).unwrap();
    let output = pipeline.run(&[a, b]).unwrap();

    assert_eq!(output.prices.timestamps(), &[day(1), day(3), day(5)]);
    assert_eq!(output.prices.missing_count(), 0);
    assert_eq!(output.returns.n_rows(), 2);
}

#[test]
fn test_insufficient_overlap_fails_whole_run() {
    let a = series("A", &[(1, 10.0), (2, 11.0)]);
    let b = series("B", &[(3, 20.0), (4, 21.0)]);

    let pipeline = CorrelationPipeline::new(PipelineConfig::default()).unwrap();
    assert!(matches!(
        pipeline.run(&[a, b]),
        Err(CorrNetError::InsufficientOverlap {
            common: 0,
            required: 2
        })
    ));
}

#[test]
fn test_log_returns_reject_non_positive_price() {
    let a = series("A", &[(1, 10.0), (2, -1.0), (3, 12.0)]);
    let b = series("B", &[(1, 20.0), (2, 21.0), (3, 22.0)]);

    let pipeline = CorrelationPipeline::new(PipelineConfig {
        return_method: ReturnMethod::Log,
        ..Default::default()
    })
    .unwrap();
    assert!(matches!(
        pipeline.run(&[a, b]),
        Err(CorrNetError::NonPositivePrice { .. })
    ));
}

#[test]
fn test_negative_sign_filter_keeps_only_inverse_pairs() {
    let a = series_from_returns("A", 100.0, &[0.01, -0.02, 0.03, 0.01]);
    let b = series_from_returns("B", 100.0, &[0.02, -0.04, 0.06, 0.02]);
    let c = series_from_returns("C", 100.0, &[-0.01, 0.02, -0.03, -0.01]);

    let pipeline = CorrelationPipeline::new(PipelineConfig {
        edge_threshold: 0.5,
        edge_sign: EdgeSign::Negative,
        ..Default::default()
    })
    .unwrap();
    let output = pipeline.run(&[a, b, c]).unwrap();

    assert_eq!(output.graph.edge_count(), 2);
    assert!(output.graph.edge_weight("A", "B").is_none());
    assert!(output.graph.edge_weight("A", "C").unwrap() < -0.9);
    assert!(output.graph.edge_weight("B", "C").unwrap() < -0.9);
}

#[test]
fn test_pipeline_is_idempotent() {
    let input = vec![
        series_from_returns("X", 10.0, &[0.03, -0.01, 0.02, -0.04, 0.01]),
        series_from_returns("Y", 20.0, &[0.02, -0.02, 0.01, -0.03, 0.02]),
        series_from_returns("Z", 30.0, &[-0.01, 0.02, 0.00, 0.01, -0.02]),
        series_from_returns("W", 40.0, &[0.01, 0.01, -0.02, 0.02, 0.00]),
    ];
    let pipeline = CorrelationPipeline::new(config(0.3)).unwrap();

    let first = pipeline.run(&input).unwrap();
    let second = pipeline.run(&input).unwrap();
    assert_eq!(first, second);

    // 입력 순서와 무관
    let mut reversed = input.clone();
    reversed.reverse();
    let third = pipeline.run(&reversed).unwrap();
    assert_eq!(first, third);
}

#[test]
fn test_components_and_communities_are_deterministic() {
    // 두 개의 강한 상관 그룹: {A, B, C}, {D, E, F}
    let up = [0.01, -0.02, 0.03, -0.01, 0.02, -0.03];
    let other = [0.02, 0.01, -0.02, -0.03, 0.01, 0.03];
    let scaled = |base: &[f64], k: f64| base.iter().map(|r| r * k).collect::<Vec<_>>();

    let input = vec![
        series_from_returns("A", 10.0, &up),
        series_from_returns("B", 10.0, &scaled(&up, 1.5)),
        series_from_returns("C", 10.0, &scaled(&up, 0.5)),
        series_from_returns("D", 10.0, &other),
        series_from_returns("E", 10.0, &scaled(&other, 2.0)),
        series_from_returns("F", 10.0, &scaled(&other, 0.7)),
    ];
    let pipeline = CorrelationPipeline::new(config(0.9)).unwrap();
    let output = pipeline.run(&input).unwrap();

    let components: Vec<&str> = output
        .report
        .components
        .iter()
        .map(|c| c.id.as_str())
        .collect();
    assert_eq!(components, vec!["A", "D"]);
    assert_eq!(output.report.communities[0].members, vec!["A", "B", "C"]);
    assert_eq!(output.report.communities[1].members, vec!["D", "E", "F"]);
    assert_eq!(
        output.connected_in_community("A"),
        Some(vec!["B".to_string(), "C".to_string()])
    );
}

#[test]
fn test_analyzer_on_pipeline_graph_matches_report() {
    let input = vec![
        series_from_returns("A", 10.0, &[0.01, -0.02, 0.03, 0.01]),
        series_from_returns("B", 10.0, &[0.02, -0.04, 0.06, 0.02]),
        series_from_returns("C", 10.0, &[-0.01, 0.01, 0.02, -0.03]),
    ];
    let output = CorrelationPipeline::new(config(0.0))
        .unwrap()
        .run(&input)
        .unwrap();
    let report = NetworkAnalyzer::default().analyze(&output.graph);
    assert_eq!(report, output.report);
}
