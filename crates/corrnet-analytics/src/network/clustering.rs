//! 국소 군집 계수.

/// 정렬된 인접 리스트에서 간선 가중치 조회.
fn weight_between(adj: &[Vec<(usize, f64)>], a: usize, b: usize) -> Option<f64> {
    adj[a]
        .binary_search_by_key(&b, |&(j, _)| j)
        .ok()
        .map(|pos| adj[a][pos].1)
}

/// 노드별 (비가중, 가중) 군집 계수.
///
/// 가중 군집 계수는 |가중치|를 그래프 최대 |가중치|로 나눈 값의 기하평균을
/// 삼각형마다 합산합니다. 차수가 2 미만이면 둘 다 0입니다.
pub(crate) fn clustering_coefficients(adj: &[Vec<(usize, f64)>]) -> Vec<(f64, f64)> {
    let max_weight = adj
        .iter()
        .flat_map(|list| list.iter().map(|(_, w)| w.abs()))
        .fold(0.0_f64, f64::max);

    adj.iter()
        .map(|neighbors| {
            let k = neighbors.len();
            if k < 2 {
                return (0.0, 0.0);
            }

            let mut triangles = 0usize;
            let mut intensity = 0.0;
            for (a, &(v, w_uv)) in neighbors.iter().enumerate() {
                for &(w, w_uw) in &neighbors[a + 1..] {
                    if let Some(w_vw) = weight_between(adj, v, w) {
                        triangles += 1;
                        if max_weight > 0.0 {
                            let product = (w_uv.abs() / max_weight)
                                * (w_uw.abs() / max_weight)
                                * (w_vw.abs() / max_weight);
                            intensity += product.cbrt();
                        }
                    }
                }
            }

            let pairs = (k * (k - 1) / 2) as f64;
            (triangles as f64 / pairs, intensity / pairs)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(n: usize, edges: &[(usize, usize, f64)]) -> Vec<Vec<(usize, f64)>> {
        let mut adj = vec![Vec::new(); n];
        for &(i, j, w) in edges {
            adj[i].push((j, w));
            adj[j].push((i, w));
        }
        for list in &mut adj {
            list.sort_by_key(|&(j, _)| j);
        }
        adj
    }

    #[test]
    fn test_triangle_is_fully_clustered() {
        let adj = build(3, &[(0, 1, 0.9), (1, 2, 0.9), (0, 2, -0.9)]);
        for (c, wc) in clustering_coefficients(&adj) {
            assert!((c - 1.0).abs() < 1e-12);
            assert!((wc - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_star_has_no_triangles() {
        let adj = build(4, &[(0, 1, 0.5), (0, 2, 0.5), (0, 3, 0.5)]);
        let cc = clustering_coefficients(&adj);
        assert_eq!(cc[0], (0.0, 0.0));
        // 차수 1
        assert_eq!(cc[1], (0.0, 0.0));
    }

    #[test]
    fn test_partial_clustering() {
        // 0의 이웃 1, 2, 3 중 1-2만 연결 → 1/3
        let adj = build(
            4,
            &[(0, 1, 1.0), (0, 2, 1.0), (0, 3, 1.0), (1, 2, 1.0)],
        );
        let cc = clustering_coefficients(&adj);
        assert!((cc[0].0 - 1.0 / 3.0).abs() < 1e-12);
        assert!((cc[0].1 - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_weighted_clustering_scales_with_weights() {
        // 최대 |w| = 1.0, 삼각형 가중치 곱 0.5 * 1 * 1 → cbrt(0.5)
        let adj = build(3, &[(0, 1, 0.5), (1, 2, 1.0), (0, 2, 1.0)]);
        let cc = clustering_coefficients(&adj);
        assert!((cc[0].1 - 0.5f64.cbrt()).abs() < 1e-12);
        assert_eq!(cc[0].0, 1.0);
    }
}
