//! 파이프라인 단계별 선택 옵션.
//!
//! 설정 파일(TOML)과 CLI 인자에서 모두 사용되므로 serde 직렬화와
//! `FromStr`을 함께 제공합니다.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 시계열 정렬 방식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentMode {
    /// 모든 종목에 존재하는 시점만 사용 (결측 없음)
    #[default]
    Intersection,
    /// 모든 시점을 사용하고 없는 값은 결측으로 표시
    Union,
}

impl fmt::Display for AlignmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlignmentMode::Intersection => write!(f, "intersection"),
            AlignmentMode::Union => write!(f, "union"),
        }
    }
}

impl FromStr for AlignmentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "intersection" | "inner" => Ok(Self::Intersection),
            "union" | "outer" => Ok(Self::Union),
            _ => Err(format!("Unknown alignment mode: {}", s)),
        }
    }
}

/// 수익률 계산 방식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnMethod {
    /// 단순 수익률: p_t / p_{t-1} - 1
    #[default]
    Simple,
    /// 로그 수익률: ln(p_t / p_{t-1})
    Log,
}

impl fmt::Display for ReturnMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnMethod::Simple => write!(f, "simple"),
            ReturnMethod::Log => write!(f, "log"),
        }
    }
}

impl FromStr for ReturnMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simple" | "pct" => Ok(Self::Simple),
            "log" => Ok(Self::Log),
            _ => Err(format!("Unknown return method: {}", s)),
        }
    }
}

/// 간선으로 허용할 상관계수 부호.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeSign {
    /// 부호와 무관하게 |상관계수|로 판단
    #[default]
    Both,
    /// 양의 상관관계만 허용
    Positive,
    /// 음의 상관관계만 허용
    Negative,
}

impl EdgeSign {
    /// 상관계수의 부호가 허용되는지 확인합니다.
    #[inline]
    pub fn accepts(&self, value: f64) -> bool {
        match self {
            EdgeSign::Both => true,
            EdgeSign::Positive => value >= 0.0,
            EdgeSign::Negative => value <= 0.0,
        }
    }
}

impl fmt::Display for EdgeSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeSign::Both => write!(f, "both"),
            EdgeSign::Positive => write!(f, "positive"),
            EdgeSign::Negative => write!(f, "negative"),
        }
    }
}

impl FromStr for EdgeSign {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "both" | "abs" => Ok(Self::Both),
            "positive" | "pos" => Ok(Self::Positive),
            "negative" | "neg" => Ok(Self::Negative),
            _ => Err(format!("Unknown edge sign: {}", s)),
        }
    }
}

/// 중심성 지표 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CentralityKind {
    /// 근접 중심성
    Closeness,
    /// 매개 중심성
    Betweenness,
}

impl fmt::Display for CentralityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CentralityKind::Closeness => write!(f, "closeness"),
            CentralityKind::Betweenness => write!(f, "betweenness"),
        }
    }
}

impl FromStr for CentralityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "closeness" => Ok(Self::Closeness),
            "betweenness" => Ok(Self::Betweenness),
            _ => Err(format!("Unknown centrality kind: {}", s)),
        }
    }
}

/// 커뮤니티 탐지 시 간선 가중치 해석 방식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommunityWeighting {
    /// 모든 간선 가중치를 1로 취급
    #[default]
    Unweighted,
    /// |상관계수|를 가중치로 사용
    Absolute,
}

impl fmt::Display for CommunityWeighting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommunityWeighting::Unweighted => write!(f, "unweighted"),
            CommunityWeighting::Absolute => write!(f, "absolute"),
        }
    }
}

impl FromStr for CommunityWeighting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unweighted" => Ok(Self::Unweighted),
            "absolute" | "abs" => Ok(Self::Absolute),
            _ => Err(format!("Unknown community weighting: {}", s)),
        }
    }
}
