//! 분석 결과 조회 명령 (종목 쌍 상관계수, 커뮤니티 연결 종목).

use anyhow::{anyhow, Result};

use corrnet_analytics::PipelineOutput;
use corrnet_core::Correlation;

/// 두 종목의 상관계수를 설명하는 문자열.
pub fn describe_correlation(output: &PipelineOutput, a: &str, b: &str) -> Result<String> {
    let corr = output
        .correlation_between(a, b)
        .ok_or_else(|| anyhow!("Unknown symbol pair: {} / {}", a, b))?;

    let line = match corr {
        Correlation::Defined { value } => {
            let edge = if output.graph.edge_weight(a, b).is_some() {
                "edge"
            } else {
                "no edge"
            };
            format!("{} ↔ {}: {:.4} ({})", a, b, value, edge)
        }
        Correlation::Undefined { reason } => format!("{} ↔ {}: undefined ({})", a, b, reason),
    };
    Ok(line)
}

/// 같은 커뮤니티에서 직접 연결된 종목을 설명하는 문자열.
pub fn describe_community(output: &PipelineOutput, symbol: &str) -> Result<String> {
    if !output.graph.contains_node(symbol) {
        anyhow::bail!("Unknown symbol: {}", symbol);
    }
    let connected = output
        .connected_in_community(symbol)
        .ok_or_else(|| anyhow!("Unknown symbol: {}", symbol))?;
    let community = output
        .report
        .community_of(symbol)
        .map(|c| c.id)
        .unwrap_or_default();

    if connected.is_empty() {
        return Ok(format!(
            "{} (community #{}): no connected symbols in its community",
            symbol, community
        ));
    }

    let mut lines = vec![format!(
        "{} (community #{}) is connected to {} symbol(s):",
        symbol,
        community,
        connected.len()
    )];
    for other in &connected {
        let weight = output.graph.edge_weight(symbol, other).unwrap_or_default();
        lines.push(format!("  {:<10} {:>8.4}", other, weight));
    }
    Ok(lines.join("\n"))
}
