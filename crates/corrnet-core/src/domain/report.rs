//! 네트워크 지표 리포트.
//!
//! 그래프 스냅샷 하나에 대해 한 번 계산되며 점진적으로 갱신하지 않습니다.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::InstrumentId;

/// 노드별 지표.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeMetrics {
    /// 연결된 간선 수
    pub degree: usize,
    /// 연결된 간선 가중치(부호 포함)의 합
    pub weighted_degree: f64,
    /// 연결된 간선 |가중치|의 합
    pub absolute_weighted_degree: f64,
    /// 근접 중심성 (요청하지 않으면 `None`)
    pub closeness: Option<f64>,
    /// 매개 중심성 (요청하지 않으면 `None`)
    pub betweenness: Option<f64>,
    /// 국소 군집 계수
    pub clustering: f64,
    /// |가중치| 기반 가중 군집 계수
    pub weighted_clustering: f64,
    /// 연결 요소 ID (요소 내 가장 작은 식별자)
    pub component: InstrumentId,
    /// 커뮤니티 번호
    pub community: usize,
}

/// 연결 요소.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// 요소 ID (가장 작은 식별자)
    pub id: InstrumentId,
    /// 구성 노드 (식별자 순서)
    pub members: Vec<InstrumentId>,
}

/// 모듈러리티 커뮤니티.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Community {
    /// 커뮤니티 번호 (크기 내림차순)
    pub id: usize,
    /// 구성 노드 (식별자 순서)
    pub members: Vec<InstrumentId>,
}

/// 그래프 전체 요약.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSummary {
    pub node_count: usize,
    pub edge_count: usize,
    /// 간선 밀도: 2E / (N(N-1))
    pub density: f64,
    /// 평균 국소 군집 계수
    pub average_clustering: f64,
    pub component_count: usize,
    pub isolated_count: usize,
    /// 커뮤니티 분할의 모듈러리티
    pub modularity: f64,
}

/// 네트워크 지표 리포트.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricReport {
    pub summary: GraphSummary,
    /// 노드별 지표 (식별자 순서)
    pub nodes: BTreeMap<InstrumentId, NodeMetrics>,
    /// 연결 요소 (ID 순서)
    pub components: Vec<Component>,
    /// 커뮤니티 (번호 순서)
    pub communities: Vec<Community>,
}

impl MetricReport {
    /// 노드 지표 조회.
    pub fn node(&self, id: &str) -> Option<&NodeMetrics> {
        self.nodes.get(id)
    }

    /// 노드가 속한 커뮤니티.
    pub fn community_of(&self, id: &str) -> Option<&Community> {
        let metrics = self.nodes.get(id)?;
        self.communities.iter().find(|c| c.id == metrics.community)
    }

    /// 노드가 속한 연결 요소.
    pub fn component_of(&self, id: &str) -> Option<&Component> {
        let metrics = self.nodes.get(id)?;
        self.components.iter().find(|c| c.id == metrics.component)
    }

    /// 지정한 지표 기준 상위 n개 노드.
    ///
    /// 동점은 식별자 순서로 정렬합니다.
    pub fn top_by<F>(&self, n: usize, key: F) -> Vec<(&str, f64)>
    where
        F: Fn(&NodeMetrics) -> Option<f64>,
    {
        let mut ranked: Vec<(&str, f64)> = self
            .nodes
            .iter()
            .filter_map(|(id, m)| key(m).map(|v| (id.as_str(), v)))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(n);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(betweenness: Option<f64>) -> NodeMetrics {
        NodeMetrics {
            degree: 1,
            weighted_degree: 0.9,
            absolute_weighted_degree: 0.9,
            closeness: None,
            betweenness,
            clustering: 0.0,
            weighted_clustering: 0.0,
            component: "A".to_string(),
            community: 0,
        }
    }

    fn report(nodes: Vec<(&str, Option<f64>)>) -> MetricReport {
        MetricReport {
            summary: GraphSummary {
                node_count: nodes.len(),
                edge_count: 0,
                density: 0.0,
                average_clustering: 0.0,
                component_count: 1,
                isolated_count: 0,
                modularity: 0.0,
            },
            nodes: nodes
                .into_iter()
                .map(|(id, b)| (id.to_string(), metrics(b)))
                .collect(),
            components: Vec::new(),
            communities: Vec::new(),
        }
    }

    #[test]
    fn test_top_by_orders_descending_with_id_tie_break() {
        let r = report(vec![
            ("C", Some(0.5)),
            ("A", Some(0.5)),
            ("B", Some(0.9)),
            ("D", Some(0.1)),
        ]);
        let top = r.top_by(3, |m| m.betweenness);
        assert_eq!(top, vec![("B", 0.9), ("A", 0.5), ("C", 0.5)]);
    }

    #[test]
    fn test_top_by_skips_missing_values() {
        let r = report(vec![("A", None), ("B", Some(0.2))]);
        assert_eq!(r.top_by(5, |m| m.betweenness), vec![("B", 0.2)]);
        assert!(r.top_by(0, |m| m.betweenness).is_empty());
    }
}
