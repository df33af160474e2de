//! 도메인 값 타입 불변 조건 테스트.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use corrnet_core::{
    normalize_symbol, parse_symbol_list, DateRange, Edge, Graph, InstrumentSeries,
};

fn node_names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("N{:02}", i)).collect()
}

proptest! {
    #[test]
    fn prop_graph_is_canonical_regardless_of_input_order(
        n in 2usize..10,
        raw_edges in prop::collection::vec((0usize..10, 0usize..10, -1.0f64..1.0), 0..30),
    ) {
        let names = node_names(n);
        let mut seen = std::collections::HashSet::new();
        let edges: Vec<Edge> = raw_edges
            .into_iter()
            .filter(|&(a, b, _)| a < n && b < n && a != b)
            .filter(|&(a, b, _)| seen.insert((a.min(b), a.max(b))))
            .map(|(a, b, w)| Edge::new(names[a].clone(), names[b].clone(), w))
            .collect();

        let forward = Graph::new(names.clone(), edges.clone()).unwrap();

        let mut reversed_nodes = names.clone();
        reversed_nodes.reverse();
        let mut reversed_edges = edges;
        reversed_edges.reverse();
        let backward = Graph::new(reversed_nodes, reversed_edges).unwrap();

        prop_assert_eq!(&forward, &backward);
        for edge in forward.edges() {
            prop_assert!(edge.source < edge.target);
            prop_assert_eq!(forward.edge_weight(&edge.target, &edge.source), Some(edge.weight));
        }
        let degree_sum: usize = forward.adjacency().iter().map(|l| l.len()).sum();
        prop_assert_eq!(degree_sum, 2 * forward.edge_count());
    }

    #[test]
    fn prop_series_window_stays_in_range(
        prices in prop::collection::vec(1.0f64..500.0, 1..60),
        from in 0i64..60,
        len in 1i64..60,
    ) {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let series = InstrumentSeries::from_pairs(
            "S",
            prices.iter().enumerate().map(|(i, &p)| (start + Duration::days(i as i64), p)),
        )
        .unwrap();
        let range = DateRange::new(start + Duration::days(from), start + Duration::days(from + len)).unwrap();

        let window = series.window(&range);
        prop_assert!(window.len() <= series.len());
        prop_assert!(window.points().iter().all(|p| range.contains(p.timestamp)));
    }

    #[test]
    fn prop_symbol_normalization_is_idempotent(raw in "[ a-zA-Z.]{0,12}") {
        let once = normalize_symbol(&raw);
        prop_assert_eq!(normalize_symbol(&once), once.clone());
        for symbol in parse_symbol_list(&raw) {
            prop_assert!(!symbol.is_empty());
        }
    }
}
