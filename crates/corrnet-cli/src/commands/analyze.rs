//! 상관관계 네트워크 분석 명령.
//!
//! CSV 가격 데이터를 로드하고 파이프라인을 실행한 뒤, 결과를 테이블 또는
//! JSON으로 출력합니다. 상관행렬을 CSV로 별도 저장할 수도 있습니다.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

use corrnet_analytics::{CorrelationPipeline, PipelineOutput};
use corrnet_core::{
    CorrelationMatrix, DateRange, Edge, GraphSummary, InstrumentId, MetricReport, NodeMetrics,
    PipelineConfig, SeriesCache,
};

use super::loader::{load_series, CsvPriceSource};

/// 테이블 출력의 지표별 상위 종목 수.
const TOP_RANKED: usize = 5;

/// 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            _ => Err(anyhow::anyhow!("Invalid format: {}. Use: table, json", s)),
        }
    }
}

/// 네트워크 구성에 필요한 입력.
#[derive(Debug, Clone)]
pub struct NetworkRequest {
    /// 요청 종목 (중복 허용, 로드 시 제거)
    pub symbols: Vec<InstrumentId>,
    /// CSV 데이터 디렉토리
    pub data_dir: PathBuf,
    /// 조회 기간 [from, to)
    pub range: DateRange,
    /// 파이프라인 설정
    pub pipeline: PipelineConfig,
}

/// 분석 결과 출력 설정.
#[derive(Debug, Clone)]
pub struct AnalyzeConfig {
    pub request: NetworkRequest,
    pub format: OutputFormat,
    /// 출력 파일 경로 (지정하지 않으면 stdout)
    pub output: Option<String>,
    /// 상관행렬 CSV 저장 경로
    pub matrix_csv: Option<String>,
}

/// 날짜 문자열 파싱 (YYYY-MM-DD)
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date format: {}. Expected YYYY-MM-DD", s))
}

/// 시작/종료 날짜 문자열로 조회 기간을 만듭니다.
pub fn parse_range(from: &str, to: &str) -> Result<DateRange> {
    let start = parse_date(from)?;
    let end = parse_date(to)?;
    if start >= end {
        anyhow::bail!("Start date must be before end date ({} >= {})", start, end);
    }
    Ok(DateRange::from_dates(start, end)?)
}

/// 데이터를 로드하고 파이프라인을 실행합니다.
pub fn build_network(request: &NetworkRequest) -> Result<PipelineOutput> {
    if request.symbols.is_empty() {
        anyhow::bail!("No symbols given. Use --symbols or set data.symbols in the config file");
    }

    let pipeline =
        CorrelationPipeline::new(request.pipeline.clone()).context("Invalid pipeline config")?;

    let source = CsvPriceSource::new(&request.data_dir);
    let mut cache = SeriesCache::new();
    let series = load_series(&source, &mut cache, &request.symbols, &request.range)?;

    pipeline
        .run(&series)
        .with_context(|| format!("Correlation pipeline failed for {}", request.range))
}

/// JSON 출력 본문.
#[derive(Debug, Serialize)]
struct AnalysisDocument<'a> {
    range: String,
    summary: &'a GraphSummary,
    edges: &'a [Edge],
    report: &'a MetricReport,
    correlations: &'a CorrelationMatrix,
}

/// 분석 명령 실행.
pub fn run_analyze(config: AnalyzeConfig) -> Result<PipelineOutput> {
    let output = build_network(&config.request)?;

    let content = match config.format {
        OutputFormat::Table => format_table(&output, &config.request.range),
        OutputFormat::Json => format_json(&output, &config.request.range)?,
    };
    write_output(&content, config.output.as_deref())?;

    if let Some(path) = config.matrix_csv.as_deref() {
        write_matrix_csv(&output.correlations, path)?;
        info!("Correlation matrix written to: {}", path);
    }

    Ok(output)
}

/// 파일 또는 stdout에 출력.
fn write_output(content: &str, output_path: Option<&str>) -> Result<()> {
    if let Some(path) = output_path {
        let mut file =
            File::create(path).with_context(|| format!("Failed to create output file: {}", path))?;
        file.write_all(content.as_bytes())
            .context("Failed to write to file")?;
        info!("Output written to: {}", path);
    } else {
        println!("{}", content);
    }
    Ok(())
}

/// 상관행렬을 CSV로 저장합니다. 미정의 값은 빈 칸입니다.
pub fn write_matrix_csv(matrix: &CorrelationMatrix, path: &str) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path).context("Failed to create CSV writer")?;

    let mut header = vec!["instrument".to_string()];
    header.extend(matrix.instruments().iter().cloned());
    wtr.write_record(&header)?;

    for (i, id) in matrix.instruments().iter().enumerate() {
        let mut row = vec![id.clone()];
        row.extend((0..matrix.len()).map(|j| {
            matrix
                .get_by_index(i, j)
                .and_then(|c| c.value())
                .map(|v| format!("{:.6}", v))
                .unwrap_or_default()
        }));
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

fn format_json(output: &PipelineOutput, range: &DateRange) -> Result<String> {
    let document = AnalysisDocument {
        range: range.to_string(),
        summary: &output.report.summary,
        edges: output.graph.edges(),
        report: &output.report,
        correlations: &output.correlations,
    };
    serde_json::to_string_pretty(&document).context("Failed to serialize analysis")
}

fn optional(v: Option<f64>) -> String {
    v.map(|x| format!("{:.4}", x)).unwrap_or_else(|| "-".to_string())
}

/// 테이블 형식 출력.
fn format_table(output: &PipelineOutput, range: &DateRange) -> String {
    let summary = &output.report.summary;
    let mut out = String::new();

    out.push_str(&format!("Period: {}\n", range));
    out.push_str(&format!(
        "Nodes: {}  Edges: {}  Density: {:.4}  Avg clustering: {:.4}\n",
        summary.node_count, summary.edge_count, summary.density, summary.average_clustering
    ));
    out.push_str(&format!(
        "Components: {}  Isolated: {}  Communities: {}  Modularity: {:.4}\n\n",
        summary.component_count,
        summary.isolated_count,
        output.report.communities.len(),
        summary.modularity
    ));

    // 노드 지표
    out.push_str(&format!(
        "{:<10} {:>6} {:>10} {:>10} {:>10} {:>10} {:>10} {:<10} {:>9}\n",
        "SYMBOL", "DEGREE", "W_DEGREE", "ABS_W_DEG", "CLOSENESS", "BETWEEN", "CLUSTER", "COMPONENT", "COMMUNITY"
    ));
    out.push_str(&"-".repeat(95));
    out.push('\n');
    for (id, m) in &output.report.nodes {
        out.push_str(&format!(
            "{:<10} {:>6} {:>10.4} {:>10.4} {:>10} {:>10} {:>10.4} {:<10} {:>9}\n",
            id,
            m.degree,
            m.weighted_degree,
            m.absolute_weighted_degree,
            optional(m.closeness),
            optional(m.betweenness),
            m.clustering,
            m.component,
            m.community
        ));
    }

    // 간선
    out.push_str(&format!("\nEdges ({}):\n", output.graph.edge_count()));
    for edge in output.graph.edges() {
        out.push_str(&format!(
            "  {:<10} ↔ {:<10} {:>8.4}\n",
            edge.source, edge.target, edge.weight
        ));
    }

    // 중심성 상위 종목
    let rankings: [(&str, fn(&NodeMetrics) -> Option<f64>); 3] = [
        ("Betweenness", |m| m.betweenness),
        ("Closeness", |m| m.closeness),
        ("Abs weighted degree", |m| Some(m.absolute_weighted_degree)),
    ];
    for (label, key) in rankings {
        let top = output.report.top_by(TOP_RANKED, key);
        if top.is_empty() {
            continue;
        }
        let ranked: Vec<String> = top
            .iter()
            .map(|(id, v)| format!("{} ({:.4})", id, v))
            .collect();
        out.push_str(&format!("\nTop {}: {}\n", label, ranked.join(", ")));
    }

    // 커뮤니티
    out.push_str("\nCommunities:\n");
    for community in &output.report.communities {
        out.push_str(&format!(
            "  #{:<3} {}\n",
            community.id,
            community.members.join(", ")
        ));
    }

    out
}
