//! tracing을 사용한 로깅 인프라.
//!
//! 이 모듈은 다양한 출력 형식을 지원하는 구조화된 로깅을 제공합니다:
//! - **pretty**: 개발용 사람이 읽기 쉬운 형식
//! - **json**: 로그 집계용 JSON 형식
//! - **compact**: 로그 크기를 줄이기 위한 간결한 형식

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::config::LoggingConfig;

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 색상이 포함된 사람이 읽기 쉬운 형식 (개발용)
    #[default]
    Pretty,
    /// 로그 집계용 JSON 형식
    Json,
    /// 간결한 한 줄 형식
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// 로그 레벨 필터 (예: "info", "debug", "corrnet_analytics=debug")
    pub level: String,
    /// 출력 형식
    pub format: LogFormat,
    /// span 이벤트 포함 여부 (진입/종료)
    pub with_span_events: bool,
    /// 파일명과 줄 번호 포함 여부
    pub with_file: bool,
    /// 대상(모듈 경로) 포함 여부
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            with_span_events: false,
            with_file: false,
            with_target: true,
        }
    }
}

impl LogConfig {
    /// 새 로그 설정을 생성합니다.
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Default::default()
        }
    }

    /// 로그 형식을 설정합니다.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// span 이벤트를 활성화합니다.
    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.with_span_events = enabled;
        self
    }

    /// 애플리케이션 설정의 로깅 섹션에서 생성합니다.
    ///
    /// 알 수 없는 형식 문자열은 pretty로 처리합니다.
    pub fn from_settings(settings: &LoggingConfig) -> Self {
        Self {
            level: settings.level.clone(),
            format: settings.format.parse().unwrap_or_default(),
            ..Default::default()
        }
    }

    /// 환경 변수로 레벨과 형식을 덮어씁니다.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(level) = std::env::var("RUST_LOG") {
            self.level = level;
        }
        if let Some(format) = std::env::var("LOG_FORMAT")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            self.format = format;
        }
        self
    }
}

/// 주어진 설정으로 로깅 시스템을 초기화합니다.
///
/// 로그는 stderr로 출력합니다. stdout은 분석 결과 전용입니다.
///
/// # 예제
///
/// ```no_run
/// use corrnet_core::logging::{init_logging, LogConfig, LogFormat};
///
/// let config = LogConfig::new("debug").with_format(LogFormat::Json);
/// init_logging(config).unwrap();
/// ```
pub fn init_logging(config: LogConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.level))?;

    tracing_subscriber::registry()
        .with(fmt_layer(&config))
        .with(env_filter)
        .try_init()?;

    tracing::debug!(
        format = ?config.format,
        level = %config.level,
        "Logging initialized"
    );

    Ok(())
}

/// 설정된 형식의 stderr 출력 레이어.
fn fmt_layer(config: &LogConfig) -> Box<dyn Layer<Registry> + Send + Sync> {
    let span_events = if config.with_span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_file(config.with_file)
        .with_line_number(config.with_file)
        .with_target(config.with_target)
        .with_span_events(span_events);

    match config.format {
        LogFormat::Pretty => layer.pretty().boxed(),
        LogFormat::Json => layer.json().boxed(),
        LogFormat::Compact => layer.compact().boxed(),
    }
}

/// 파이프라인 단계 컨텍스트 필드가 포함된 span을 생성하는 매크로.
#[macro_export]
macro_rules! pipeline_span {
    ($stage:expr) => {
        tracing::debug_span!("pipeline_stage", stage = %$stage)
    };
    ($stage:expr, $instruments:expr) => {
        tracing::debug_span!("pipeline_stage", stage = %$stage, instruments = $instruments)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("COMPACT".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert!("invalid".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_log_config_builder() {
        let config = LogConfig::new("debug")
            .with_format(LogFormat::Json)
            .with_span_events(true);

        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Json);
        assert!(config.with_span_events);
    }

    #[test]
    fn test_fmt_layer_builds_for_every_format() {
        for format in [LogFormat::Pretty, LogFormat::Json, LogFormat::Compact] {
            let config = LogConfig::new("info")
                .with_format(format)
                .with_span_events(true);
            let _subscriber = tracing_subscriber::registry().with(fmt_layer(&config));
        }
    }

    #[test]
    fn test_log_config_from_settings() {
        let settings = LoggingConfig {
            level: "warn".to_string(),
            format: "nonsense".to_string(),
        };
        let config = LogConfig::from_settings(&settings);
        assert_eq!(config.level, "warn");
        assert_eq!(config.format, LogFormat::Pretty);
    }
}
