//! 연결 요소 탐색.

use std::collections::VecDeque;

/// 노드별 연결 요소 번호와 요소 목록.
///
/// 노드 인덱스 순서로 BFS를 시작하므로 각 요소의 시작 노드가 요소 내 최소
/// 인덱스(= 최소 식별자)이며, 요소 목록도 그 순서로 나열됩니다.
pub(crate) fn connected_components(adj: &[Vec<(usize, f64)>]) -> (Vec<usize>, Vec<Vec<usize>>) {
    let n = adj.len();
    let mut label = vec![usize::MAX; n];
    let mut components: Vec<Vec<usize>> = Vec::new();

    for start in 0..n {
        if label[start] != usize::MAX {
            continue;
        }
        let id = components.len();
        let mut members = vec![start];
        let mut queue = VecDeque::from([start]);
        label[start] = id;

        while let Some(v) = queue.pop_front() {
            for &(w, _) in &adj[v] {
                if label[w] == usize::MAX {
                    label[w] = id;
                    members.push(w);
                    queue.push_back(w);
                }
            }
        }

        members.sort_unstable();
        components.push(members);
    }

    (label, components)
}
