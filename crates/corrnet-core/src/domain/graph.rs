//! 상관관계 그래프.
//!
//! 특정 그래프 라이브러리의 내부 표현과 분리된 명시적 값 타입입니다.
//! 노드는 종목 식별자이며, 간선 가중치는 부호가 있는 원래 상관계수입니다.
//! 음수가 아닌 가중치가 필요한 소비자는 직접 변환해야 합니다.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{CorrNetError, CorrNetResult};
use crate::types::InstrumentId;

/// 무방향 간선. `source < target` (식별자 순서).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: InstrumentId,
    pub target: InstrumentId,
    /// 부호가 있는 상관계수
    pub weight: f64,
}

impl Edge {
    /// 간선을 생성합니다. 두 끝점은 식별자 순서로 정렬됩니다.
    pub fn new(a: impl Into<InstrumentId>, b: impl Into<InstrumentId>, weight: f64) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b {
            Self {
                source: a,
                target: b,
                weight,
            }
        } else {
            Self {
                source: b,
                target: a,
                weight,
            }
        }
    }

    /// 주어진 끝점의 반대편 끝점.
    pub fn other(&self, node: &str) -> Option<&str> {
        if self.source == node {
            Some(&self.target)
        } else if self.target == node {
            Some(&self.source)
        } else {
            None
        }
    }
}

/// 가중치 무방향 그래프.
///
/// 불변 조건:
/// - 노드는 식별자 순서로 정렬되어 있고 중복이 없음
/// - 자기 루프가 없고, 종목 쌍마다 간선은 최대 하나
/// - 모든 간선의 끝점은 노드 집합에 포함됨
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    nodes: Vec<InstrumentId>,
    edges: Vec<Edge>,
}

impl Graph {
    /// 노드와 간선으로 그래프를 생성하고 불변 조건을 검증합니다.
    pub fn new(mut nodes: Vec<InstrumentId>, edges: Vec<Edge>) -> CorrNetResult<Self> {
        nodes.sort();
        if let Some(w) = nodes.windows(2).find(|w| w[0] == w[1]) {
            return Err(CorrNetError::DuplicateInstrument(w[0].clone()));
        }

        let mut seen = HashSet::with_capacity(edges.len());
        for edge in &edges {
            if edge.source == edge.target {
                return Err(CorrNetError::InvalidGraph(format!(
                    "자기 루프: {}",
                    edge.source
                )));
            }
            if !edge.weight.is_finite() {
                return Err(CorrNetError::InvalidGraph(format!(
                    "유한하지 않은 가중치: {}-{}",
                    edge.source, edge.target
                )));
            }
            for end in [&edge.source, &edge.target] {
                if nodes.binary_search(end).is_err() {
                    return Err(CorrNetError::InvalidGraph(format!(
                        "노드 집합에 없는 끝점: {}",
                        end
                    )));
                }
            }
            let key = if edge.source < edge.target {
                (edge.source.as_str(), edge.target.as_str())
            } else {
                (edge.target.as_str(), edge.source.as_str())
            };
            if !seen.insert(key) {
                return Err(CorrNetError::InvalidGraph(format!(
                    "중복 간선: {}-{}",
                    key.0, key.1
                )));
            }
        }

        let mut edges: Vec<Edge> = edges
            .into_iter()
            .map(|e| Edge::new(e.source, e.target, e.weight))
            .collect();
        edges.sort_by(|a, b| (&a.source, &a.target).cmp(&(&b.source, &b.target)));

        Ok(Self { nodes, edges })
    }

    /// 노드 목록 (식별자 순서).
    pub fn nodes(&self) -> &[InstrumentId] {
        &self.nodes
    }

    /// 간선 목록 (끝점 순서).
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// 노드 인덱스.
    pub fn index_of(&self, node: &str) -> Option<usize> {
        self.nodes
            .binary_search_by(|n| n.as_str().cmp(node))
            .ok()
    }

    pub fn contains_node(&self, node: &str) -> bool {
        self.index_of(node).is_some()
    }

    /// 두 노드 사이 간선의 가중치.
    pub fn edge_weight(&self, a: &str, b: &str) -> Option<f64> {
        let (s, t) = if a <= b { (a, b) } else { (b, a) };
        self.edges
            .binary_search_by(|e| (e.source.as_str(), e.target.as_str()).cmp(&(s, t)))
            .ok()
            .map(|i| self.edges[i].weight)
    }

    /// 이웃 노드와 간선 가중치 (식별자 순서).
    pub fn neighbors(&self, node: &str) -> Vec<(&str, f64)> {
        let mut out: Vec<(&str, f64)> = self
            .edges
            .iter()
            .filter_map(|e| e.other(node).map(|o| (o, e.weight)))
            .collect();
        out.sort_by(|a, b| a.0.cmp(b.0));
        out
    }

    /// 인덱스 기반 인접 리스트. 각 목록은 이웃 인덱스 순으로 정렬됩니다.
    pub fn adjacency(&self) -> Vec<Vec<(usize, f64)>> {
        let mut adj = vec![Vec::new(); self.nodes.len()];
        for edge in &self.edges {
            if let (Some(i), Some(j)) = (self.index_of(&edge.source), self.index_of(&edge.target))
            {
                adj[i].push((j, edge.weight));
                adj[j].push((i, edge.weight));
            }
        }
        for list in &mut adj {
            list.sort_by_key(|&(j, _)| j);
        }
        adj
    }

    /// 간선이 없는 노드 목록.
    pub fn isolated_nodes(&self) -> Vec<&str> {
        let adj = self.adjacency();
        self.nodes
            .iter()
            .zip(adj.iter())
            .filter(|(_, list)| list.is_empty())
            .map(|(n, _)| n.as_str())
            .collect()
    }
}
