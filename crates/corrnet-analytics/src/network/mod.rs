//! 상관관계 네트워크 분석.
//!
//! 그래프 스냅샷 하나에 대해 노드별 지표와 전체 요약을 한 번에 계산합니다.
//!
//! # 지표
//!
//! - **차수**: 간선 수, 부호 포함 가중 차수, |가중치| 가중 차수
//! - **군집 계수**: 비가중 / 가중 국소 군집 계수 (`clustering`)
//! - **중심성**: 근접 / 매개 중심성, 거리 = `1 / |가중치|` (`centrality`)
//! - **연결 요소**: BFS, 요소 ID = 최소 식별자 (`components`)
//! - **커뮤니티**: 탐욕적 모듈러리티 병합 (`community`)

mod centrality;
mod clustering;
mod community;
mod components;

use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use corrnet_core::{
    CentralityKind, Community, CommunityWeighting, Component, Graph, GraphSummary, MetricReport,
    NodeMetrics, PipelineConfig,
};

/// 네트워크 분석기.
#[derive(Debug, Clone)]
pub struct NetworkAnalyzer {
    centrality_kinds: BTreeSet<CentralityKind>,
    community_weighting: CommunityWeighting,
}

impl Default for NetworkAnalyzer {
    fn default() -> Self {
        Self::new(
            [CentralityKind::Closeness, CentralityKind::Betweenness]
                .into_iter()
                .collect(),
            CommunityWeighting::default(),
        )
    }
}

impl NetworkAnalyzer {
    /// 새 분석기를 생성합니다.
    ///
    /// # 인자
    ///
    /// * `centrality_kinds` - 계산할 중심성 종류 (나머지는 `None`으로 보고)
    /// * `community_weighting` - 커뮤니티 탐지 시 간선 가중치 해석
    pub fn new(
        centrality_kinds: BTreeSet<CentralityKind>,
        community_weighting: CommunityWeighting,
    ) -> Self {
        Self {
            centrality_kinds,
            community_weighting,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.centrality_kinds.clone(), config.community_weighting)
    }

    pub fn centrality_kinds(&self) -> &BTreeSet<CentralityKind> {
        &self.centrality_kinds
    }

    /// 그래프 지표를 계산합니다.
    pub fn analyze(&self, graph: &Graph) -> MetricReport {
        let nodes = graph.nodes();
        let n = nodes.len();
        let adj = graph.adjacency();

        let clustering = clustering::clustering_coefficients(&adj);

        let distances = centrality::to_distances(&adj);
        let closeness = self
            .centrality_kinds
            .contains(&CentralityKind::Closeness)
            .then(|| centrality::closeness_centrality(&distances));
        let betweenness = self
            .centrality_kinds
            .contains(&CentralityKind::Betweenness)
            .then(|| centrality::betweenness_centrality(&distances));

        let (component_of, component_members) = components::connected_components(&adj);
        let components: Vec<Component> = component_members
            .iter()
            .map(|members| Component {
                id: nodes[members[0]].clone(),
                members: members.iter().map(|&i| nodes[i].clone()).collect(),
            })
            .collect();

        let partition = community::greedy_modularity(&adj, self.community_weighting);
        let mut community_of = vec![0usize; n];
        for (id, members) in partition.iter().enumerate() {
            for &i in members {
                community_of[i] = id;
            }
        }
        let modularity =
            community::modularity(&adj, self.community_weighting, &community_of, partition.len());
        let communities: Vec<Community> = partition
            .iter()
            .enumerate()
            .map(|(id, members)| Community {
                id,
                members: members.iter().map(|&i| nodes[i].clone()).collect(),
            })
            .collect();

        let mut metrics = BTreeMap::new();
        for (i, node) in nodes.iter().enumerate() {
            let incident = &adj[i];
            let (c, wc) = clustering[i];
            metrics.insert(
                node.clone(),
                NodeMetrics {
                    degree: incident.len(),
                    weighted_degree: incident.iter().map(|(_, w)| w).sum(),
                    absolute_weighted_degree: incident.iter().map(|(_, w)| w.abs()).sum(),
                    closeness: closeness.as_ref().map(|v| v[i]),
                    betweenness: betweenness.as_ref().map(|v| v[i]),
                    clustering: c,
                    weighted_clustering: wc,
                    component: components[component_of[i]].id.clone(),
                    community: community_of[i],
                },
            );
        }

        let summary = GraphSummary {
            node_count: n,
            edge_count: graph.edge_count(),
            density: density(n, graph.edge_count()),
            average_clustering: if n == 0 {
                0.0
            } else {
                clustering.iter().map(|(c, _)| c).sum::<f64>() / n as f64
            },
            component_count: components.len(),
            isolated_count: adj.iter().filter(|list| list.is_empty()).count(),
            modularity,
        };

        debug!(
            nodes = summary.node_count,
            edges = summary.edge_count,
            components = summary.component_count,
            communities = communities.len(),
            modularity = summary.modularity,
            "Network analyzed"
        );

        MetricReport {
            summary,
            nodes: metrics,
            components,
            communities,
        }
    }
}

/// 간선 밀도 `2E / (N(N-1))`. 노드가 2개 미만이면 0.
fn density(nodes: usize, edges: usize) -> f64 {
    if nodes < 2 {
        return 0.0;
    }
    2.0 * edges as f64 / (nodes * (nodes - 1)) as f64
}
