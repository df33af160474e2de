//! 탐욕적 모듈러리티 커뮤니티 탐지.
//!
//! 모든 노드를 단독 커뮤니티로 시작해, 모듈러리티 증가량이 가장 큰 인접
//! 커뮤니티 쌍을 반복해서 병합합니다 (Clauset–Newman–Moore 방식).
//!
//! 병합 이득: `ΔQ = W_ab / m - D_a · D_b / (2m²)`
//!
//! - `W_ab`: 두 커뮤니티 사이 간선 가중치 합
//! - `D_a`: 커뮤니티 a에 속한 노드들의 가중 차수 합
//! - `m`: 전체 간선 가중치 합
//!
//! 이득이 양수인 쌍이 없으면 멈춥니다. 동점은 번호가 작은 쌍을 먼저 병합하므로
//! 결과는 입력 순서에 대해 결정적입니다.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use corrnet_core::CommunityWeighting;

const GAIN_EPSILON: f64 = 1e-12;

/// 간선 가중치를 커뮤니티 탐지용 가중치로 변환.
fn community_weight(weight: f64, weighting: CommunityWeighting) -> f64 {
    match weighting {
        CommunityWeighting::Unweighted => 1.0,
        CommunityWeighting::Absolute => weight.abs(),
    }
}

/// `i < j` 간선만 나열.
fn weighted_edges(
    adj: &[Vec<(usize, f64)>],
    weighting: CommunityWeighting,
) -> Vec<(usize, usize, f64)> {
    adj.iter()
        .enumerate()
        .flat_map(|(i, list)| {
            list.iter()
                .filter(move |&&(j, _)| i < j)
                .map(move |&(j, w)| (i, j, community_weight(w, weighting)))
        })
        .filter(|&(_, _, w)| w > 0.0)
        .collect()
}

/// 커뮤니티 분할.
///
/// 반환되는 커뮤니티는 크기 내림차순, 동점이면 최소 구성원 순서이며
/// 각 커뮤니티 구성원은 인덱스 순서입니다.
pub(crate) fn greedy_modularity(
    adj: &[Vec<(usize, f64)>],
    weighting: CommunityWeighting,
) -> Vec<Vec<usize>> {
    let n = adj.len();
    let edges = weighted_edges(adj, weighting);
    let total: f64 = edges.iter().map(|e| e.2).sum();

    let mut members: Vec<Option<Vec<usize>>> = (0..n).map(|i| Some(vec![i])).collect();

    if total > 0.0 {
        let mut strength = vec![0.0; n];
        let mut between: BTreeMap<(usize, usize), f64> = BTreeMap::new();
        for &(i, j, w) in &edges {
            strength[i] += w;
            strength[j] += w;
            *between.entry((i, j)).or_insert(0.0) += w;
        }

        loop {
            let mut best: Option<((usize, usize), f64)> = None;
            for (&(a, b), &w) in &between {
                let gain = w / total - strength[a] * strength[b] / (2.0 * total * total);
                match best {
                    Some((_, g)) if gain <= g + GAIN_EPSILON => {}
                    _ => best = Some(((a, b), gain)),
                }
            }

            let Some(((a, b), gain)) = best else { break };
            if gain <= GAIN_EPSILON {
                break;
            }

            // b를 a로 병합 (a < b)
            let moved: Vec<((usize, usize), f64)> = between
                .iter()
                .filter(|(key, _)| key.0 == b || key.1 == b)
                .map(|(&key, &w)| (key, w))
                .collect();
            for (key, w) in moved {
                between.remove(&key);
                let other = if key.0 == b { key.1 } else { key.0 };
                if other != a {
                    *between.entry((a.min(other), a.max(other))).or_insert(0.0) += w;
                }
            }
            strength[a] += strength[b];
            strength[b] = 0.0;
            if let Some(absorbed) = members[b].take() {
                if let Some(target) = members[a].as_mut() {
                    target.extend(absorbed);
                }
            }
        }
    }

    let mut communities: Vec<Vec<usize>> = members
        .into_iter()
        .flatten()
        .map(|mut m| {
            m.sort_unstable();
            m
        })
        .collect();
    communities.sort_by_key(|m| (Reverse(m.len()), m.first().copied()));
    communities
}

/// 분할의 모듈러리티 `Q = Σ_c [L_c/m - (D_c/2m)²]`.
///
/// 간선이 없으면 0입니다.
pub(crate) fn modularity(
    adj: &[Vec<(usize, f64)>],
    weighting: CommunityWeighting,
    community_of: &[usize],
    community_count: usize,
) -> f64 {
    let edges = weighted_edges(adj, weighting);
    let total: f64 = edges.iter().map(|e| e.2).sum();
    if total <= 0.0 {
        return 0.0;
    }

    let mut internal = vec![0.0; community_count];
    let mut degree = vec![0.0; community_count];
    for &(i, j, w) in &edges {
        let (ci, cj) = (community_of[i], community_of[j]);
        degree[ci] += w;
        degree[cj] += w;
        if ci == cj {
            internal[ci] += w;
        }
    }

    internal
        .iter()
        .zip(degree.iter())
        .map(|(l, d)| l / total - (d / (2.0 * total)).powi(2))
        .sum()
}
