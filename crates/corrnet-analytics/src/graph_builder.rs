//! 상관행렬 → 상관관계 그래프 변환.
//!
//! 간선 포함 정책은 다음 순서로 적용됩니다:
//!
//! 1. **부호/임계값**: 정의된 상관계수 중 부호 조건을 통과하고 `|corr| >= threshold`인 쌍
//! 2. **top-k** (선택): 각 노드가 |가중치| 기준 상위 k개 간선을 선택하고,
//!    양 끝점 중 한쪽이라도 선택한 간선은 유지 (비대칭 제외 방지)
//!
//! 미정의 상관계수는 어떤 정책에서도 간선이 되지 않으며, 간선이 없는 종목도
//! 고립 노드로 남아 노드 집합은 항상 종목 집합과 같습니다.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use tracing::debug;

use corrnet_core::{
    CorrNetError, CorrNetResult, CorrelationMatrix, Edge, EdgeSign, Graph, PipelineConfig,
};

/// 간선 포함 정책.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgePolicy {
    /// |상관계수| 최소값
    pub threshold: f64,
    /// 노드별 상위 k개 간선 (None이면 비활성)
    pub top_k: Option<usize>,
    /// 허용 부호
    pub sign: EdgeSign,
}

impl Default for EdgePolicy {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            top_k: None,
            sign: EdgeSign::Both,
        }
    }
}

impl EdgePolicy {
    /// 임계값 정책.
    pub fn threshold(threshold: f64) -> Self {
        Self {
            threshold,
            ..Default::default()
        }
    }

    /// top-k 제한을 추가합니다.
    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = Some(k);
        self
    }

    /// 허용 부호를 설정합니다.
    pub fn with_sign(mut self, sign: EdgeSign) -> Self {
        self.sign = sign;
        self
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            threshold: config.edge_threshold,
            top_k: config.top_k,
            sign: config.edge_sign,
        }
    }

    #[inline]
    fn admits(&self, value: f64) -> bool {
        self.sign.accepts(value) && value.abs() >= self.threshold
    }
}

/// 그래프 빌더.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphBuilder {
    policy: EdgePolicy,
}

/// 인덱스 기반 후보 간선.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    i: usize,
    j: usize,
    weight: f64,
}

impl GraphBuilder {
    pub fn new(policy: EdgePolicy) -> Self {
        Self { policy }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(EdgePolicy::from_config(config))
    }

    pub fn policy(&self) -> &EdgePolicy {
        &self.policy
    }

    /// 상관행렬에서 그래프를 생성합니다.
    ///
    /// # 에러
    ///
    /// 종목이 하나도 없으면 `EmptyGraph`.
    pub fn build(&self, correlations: &CorrelationMatrix) -> CorrNetResult<Graph> {
        if correlations.is_empty() {
            return Err(CorrNetError::EmptyGraph);
        }

        let candidates: Vec<Candidate> = correlations
            .pairs()
            .filter_map(|(i, j, corr)| {
                let weight = corr.value()?;
                self.policy.admits(weight).then_some(Candidate { i, j, weight })
            })
            .collect();
        let candidate_count = candidates.len();

        let selected = match self.policy.top_k {
            Some(k) => Self::select_top_k(correlations.len(), candidates, k),
            None => candidates,
        };

        let ids = correlations.instruments();
        let edges = selected
            .iter()
            .map(|c| Edge::new(ids[c.i].clone(), ids[c.j].clone(), c.weight))
            .collect();
        let graph = Graph::new(ids.to_vec(), edges)?;

        debug!(
            nodes = graph.node_count(),
            candidates = candidate_count,
            edges = graph.edge_count(),
            threshold = self.policy.threshold,
            top_k = ?self.policy.top_k,
            "Graph built"
        );
        Ok(graph)
    }

    /// 각 노드의 상위 k개 간선의 합집합.
    fn select_top_k(n: usize, candidates: Vec<Candidate>, k: usize) -> Vec<Candidate> {
        let mut incident: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (idx, c) in candidates.iter().enumerate() {
            incident[c.i].push(idx);
            incident[c.j].push(idx);
        }

        let mut keep = BTreeSet::new();
        for (node, edges) in incident.iter_mut().enumerate() {
            // |가중치| 내림차순, 동점은 반대편 노드 식별자 순서
            edges.sort_by(|&a, &b| {
                let (ca, cb) = (&candidates[a], &candidates[b]);
                cb.weight
                    .abs()
                    .partial_cmp(&ca.weight.abs())
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| other_end(ca, node).cmp(&other_end(cb, node)))
            });
            keep.extend(edges.iter().take(k).copied());
        }

        keep.into_iter().map(|idx| candidates[idx]).collect()
    }
}

/// 후보 간선에서 `node`의 반대편 인덱스.
///
/// 노드 인덱스는 식별자 순서와 같으므로 인덱스 비교가 곧 식별자 비교입니다.
fn other_end(c: &Candidate, node: usize) -> usize {
    if c.i == node {
        c.j
    } else {
        c.i
    }
}
