//! 상관관계 네트워크 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # data/<SYMBOL>.csv 파일로 네트워크 분석 (|상관계수| >= 0.68)
//! corrnet analyze --symbols AAPL,MSFT,NVDA,JPM -f 2023-01-01 -t 2024-01-01 --threshold 0.68
//!
//! # 양의 상관관계만, 종목별 상위 3개 간선, JSON 저장
//! corrnet analyze --symbols AAPL,MSFT,NVDA --sign positive --top-k 3 --format json -o report.json
//!
//! # 두 종목 상관계수 조회
//! corrnet correlation AAPL MSFT --symbols AAPL,MSFT,NVDA -f 2023-01-01 -t 2024-01-01
//!
//! # 같은 커뮤니티에서 직접 연결된 종목 조회
//! corrnet community AAPL --symbols AAPL,MSFT,NVDA -f 2023-01-01 -t 2024-01-01
//! ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{error, info};

use corrnet_cli::commands::analyze::{
    build_network, parse_range, run_analyze, AnalyzeConfig, NetworkRequest, OutputFormat,
};
use corrnet_cli::commands::query::{describe_community, describe_correlation};
use corrnet_core::{
    init_logging, normalize_symbol, parse_symbol_list, AppConfig, LogConfig, PipelineConfig,
};

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Parser)]
#[command(name = "corrnet")]
#[command(about = "Correlation network CLI - 종목 수익률 상관관계 네트워크 분석", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 (기본: config/default.toml, 없으면 내장 기본값)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// 데이터 로드 인자.
#[derive(Args, Debug, Clone)]
struct DataArgs {
    /// 종목 목록 (쉼표로 구분, 예: AAPL,MSFT,NVDA)
    #[arg(short, long)]
    symbols: Option<String>,

    /// CSV 데이터 디렉토리 (<dir>/<SYMBOL>.csv)
    #[arg(long)]
    data_dir: Option<String>,

    /// 시작 날짜 (YYYY-MM-DD)
    #[arg(short = 'f', long)]
    from: String,

    /// 종료 날짜 (YYYY-MM-DD, 미포함)
    #[arg(short, long)]
    to: String,
}

/// 파이프라인 설정 오버라이드.
#[derive(Args, Debug, Clone, Default)]
struct PipelineArgs {
    /// 정렬 방식 (intersection, union)
    #[arg(long)]
    mode: Option<String>,

    /// 수익률 방식 (simple, log)
    #[arg(long)]
    returns: Option<String>,

    /// 간선 임계값 (|상관계수| >= threshold)
    #[arg(long)]
    threshold: Option<f64>,

    /// 종목별 상위 k개 간선만 유지
    #[arg(long)]
    top_k: Option<usize>,

    /// 허용 부호 (both, positive, negative)
    #[arg(long)]
    sign: Option<String>,

    /// 상관계수 계산 최소 공통 관측치
    #[arg(long)]
    min_overlap: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// 상관관계 네트워크 분석
    Analyze {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        pipeline: PipelineArgs,

        /// 출력 형식 (table, json)
        #[arg(long, default_value = "table")]
        format: String,

        /// 출력 파일 경로 (지정하지 않으면 stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// 상관행렬 CSV 저장 경로
        #[arg(long)]
        matrix_csv: Option<String>,
    },

    /// 두 종목의 상관계수 조회
    Correlation {
        /// 첫 번째 종목
        first: String,

        /// 두 번째 종목
        second: String,

        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// 같은 커뮤니티에서 직접 연결된 종목 조회
    Community {
        /// 조회할 종목
        symbol: String,

        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },
}

/// 설정 파일 로드. 경로를 지정하지 않았고 기본 파일도 없으면 내장 기본값.
fn load_app_config(path: Option<&str>) -> Result<AppConfig> {
    match path {
        Some(path) => {
            AppConfig::load(path).with_context(|| format!("Failed to load config: {}", path))
        }
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => AppConfig::load_default()
            .with_context(|| format!("Failed to load config: {}", DEFAULT_CONFIG_PATH)),
        None => Ok(AppConfig::default()),
    }
}

/// 설정 파일 값에 CLI 인자를 덮어씁니다.
fn apply_overrides(mut config: PipelineConfig, args: &PipelineArgs) -> Result<PipelineConfig> {
    if let Some(mode) = &args.mode {
        config.alignment_mode = mode.parse().map_err(anyhow::Error::msg)?;
    }
    if let Some(method) = &args.returns {
        config.return_method = method.parse().map_err(anyhow::Error::msg)?;
    }
    if let Some(threshold) = args.threshold {
        config.edge_threshold = threshold;
    }
    if let Some(k) = args.top_k {
        config.top_k = Some(k);
    }
    if let Some(sign) = &args.sign {
        config.edge_sign = sign.parse().map_err(anyhow::Error::msg)?;
    }
    if let Some(min_overlap) = args.min_overlap {
        config.min_overlap = min_overlap;
    }
    Ok(config)
}

/// 인자와 설정으로 네트워크 요청을 구성합니다.
///
/// `required` 종목은 목록에 없으면 추가됩니다.
fn network_request(
    app: &AppConfig,
    data: &DataArgs,
    pipeline: &PipelineArgs,
    required: &[&str],
) -> Result<NetworkRequest> {
    let mut symbols = match &data.symbols {
        Some(list) => parse_symbol_list(list),
        None => app.data.symbols.iter().map(|s| normalize_symbol(s)).collect(),
    };
    for symbol in required.iter().map(|s| normalize_symbol(s)) {
        if !symbols.contains(&symbol) {
            symbols.push(symbol);
        }
    }

    Ok(NetworkRequest {
        symbols,
        data_dir: PathBuf::from(data.data_dir.as_deref().unwrap_or(&app.data.data_dir)),
        range: parse_range(&data.from, &data.to)?,
        pipeline: apply_overrides(app.pipeline.clone(), pipeline)?,
    })
}

fn run(cli: Cli, app: AppConfig) -> Result<()> {
    match cli.command {
        Commands::Analyze {
            data,
            pipeline,
            format,
            output,
            matrix_csv,
        } => {
            let config = AnalyzeConfig {
                request: network_request(&app, &data, &pipeline, &[])?,
                format: OutputFormat::parse(&format)?,
                output,
                matrix_csv,
            };
            let result = run_analyze(config)?;
            info!(
                nodes = result.graph.node_count(),
                edges = result.graph.edge_count(),
                "✅ Analysis complete"
            );
        }

        Commands::Correlation {
            first,
            second,
            data,
            pipeline,
        } => {
            let request = network_request(&app, &data, &pipeline, &[first.as_str(), second.as_str()])?;
            let output = build_network(&request)?;
            println!(
                "{}",
                describe_correlation(&output, &normalize_symbol(&first), &normalize_symbol(&second))?
            );
        }

        Commands::Community {
            symbol,
            data,
            pipeline,
        } => {
            let request = network_request(&app, &data, &pipeline, &[symbol.as_str()])?;
            let output = build_network(&request)?;
            println!("{}", describe_community(&output, &normalize_symbol(&symbol))?);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    // .env 파일은 선택 사항
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let app = load_app_config(cli.config.as_deref())?;

    init_logging(LogConfig::from_settings(&app.logging).with_env_overrides())
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    if let Err(e) = run(cli, app) {
        error!("Command failed: {:#}", e);
        return Err(e);
    }
    Ok(())
}
